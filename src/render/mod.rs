pub mod painter;
pub mod scene;
