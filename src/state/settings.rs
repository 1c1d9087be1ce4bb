use serde::{Deserialize, Serialize};

use crate::processing::waveform::PhaseConvention;

/// Published sweep: amplitudes 0.5..2 step 0.1, phases 0..1 step 0.05.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/j2kun/harmonic-phase-space/master/phase_space_0.5_2_0.1_0_1_0.05.csv";

pub const MIN_SAMPLE_COUNT: usize = 8;
pub const MAX_SAMPLE_COUNT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Points per waveform curve.
    pub sample_count: usize,
    pub convention: PhaseConvention,
    /// Overlay the individual harmonics on the waveform.
    pub show_components: bool,
    /// Heat-map color for the smallest response (RGBA, unmultiplied).
    pub low_color: [u8; 4],
    /// Heat-map color for the largest response.
    pub high_color: [u8; 4],
    pub default_url: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            sample_count: 200,
            convention: PhaseConvention::default(),
            show_components: true,
            low_color: [0, 0, 255, 255],
            high_color: [255, 0, 0, 255],
            default_url: DEFAULT_DATA_URL.to_string(),
        }
    }
}

impl ViewerSettings {
    pub fn low_color32(&self) -> egui::Color32 {
        let [r, g, b, a] = self.low_color;
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn high_color32(&self) -> egui::Color32 {
        let [r, g, b, a] = self.high_color;
        egui::Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    /// Sample count clamped to the supported range.
    pub fn samples(&self) -> usize {
        self.sample_count.clamp(MIN_SAMPLE_COUNT, MAX_SAMPLE_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: ViewerSettings = serde_json::from_str(r#"{"sample_count": 50}"#).unwrap();
        assert_eq!(settings.sample_count, 50);
        assert!(settings.show_components);
        assert_eq!(settings.convention, PhaseConvention::Additive);
        assert_eq!(settings.default_url, DEFAULT_DATA_URL);
    }

    #[test]
    fn sample_count_is_clamped() {
        let mut settings = ViewerSettings::default();
        settings.sample_count = 0;
        assert_eq!(settings.samples(), MIN_SAMPLE_COUNT);
        settings.sample_count = 1_000_000;
        assert_eq!(settings.samples(), MAX_SAMPLE_COUNT);
    }
}
