pub mod dataset;
pub mod domain;
pub mod loader;
pub mod record;
pub mod sample_index;
