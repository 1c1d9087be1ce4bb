use egui::{Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

use crate::render::scene::{NoticeKind, PathStyle};

/// Waveform colors for the fundamental and the two overtones.
const COMPONENT_COLORS: [Color32; 3] = [
    Color32::from_rgb(86, 180, 233),
    Color32::from_rgb(0, 158, 115),
    Color32::from_rgb(230, 159, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_premultiplied(100, 100, 100, 60),
            Theme::Light => Color32::from_rgba_premultiplied(180, 180, 180, 80),
        }
    }

    /// Outline of the cell under the pointer.
    pub fn highlight(&self) -> Stroke {
        match self {
            Theme::Dark => Stroke::new(2.0, Color32::WHITE),
            Theme::Light => Stroke::new(2.0, Color32::BLACK),
        }
    }

    pub fn path_stroke(&self, style: PathStyle) -> Stroke {
        match style {
            PathStyle::Total => match self {
                Theme::Dark => Stroke::new(2.0, Color32::from_gray(235)),
                Theme::Light => Stroke::new(2.0, Color32::from_gray(25)),
            },
            PathStyle::Component(harmonic) => {
                let color = COMPONENT_COLORS[harmonic.saturating_sub(1) % COMPONENT_COLORS.len()];
                Stroke::new(1.0, color.gamma_multiply(0.8))
            }
        }
    }

    /// Color of the 1-based `harmonic`, the same as its waveform path.
    pub fn component_color(&self, harmonic: usize) -> Color32 {
        self.path_stroke(PathStyle::Component(harmonic)).color
    }

    pub fn notice_color(&self, kind: NoticeKind) -> Color32 {
        match kind {
            NoticeKind::Info => match self {
                Theme::Dark => Color32::from_gray(190),
                Theme::Light => Color32::from_gray(70),
            },
            NoticeKind::Warning => Color32::from_rgb(230, 160, 40),
            NoticeKind::Error => Color32::from_rgb(255, 80, 80),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}
