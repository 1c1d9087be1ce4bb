pub mod color_scale;
pub mod kd_tree;
pub mod statistics;
pub mod sweep;
pub mod waveform;
