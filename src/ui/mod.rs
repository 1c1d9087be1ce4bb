pub mod controls;
pub mod heatmap_panel;
pub mod settings_dialog;
pub mod sweep_dialog;
pub mod waveform_panel;
