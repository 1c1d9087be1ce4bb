//! Render instructions for the heat map and waveform views.
//!
//! Everything here is a pure function of the dataset, the selection and the
//! viewer settings. Painting happens in [`crate::render::painter`].

use egui::Color32;

use crate::data::dataset::Dataset;
use crate::data::record::{value_bits, GroupKey, Record};
use crate::error::QueryError;
use crate::processing::color_scale::ColorScale;
use crate::processing::statistics::SliceStats;
use crate::processing::waveform::{Harmonics, PhaseConvention, HARMONIC_COUNT};
use crate::state::selection::{query_slice, Selection};

/// Axis-aligned rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRect {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl DataRect {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    pub fn unit() -> Self {
        Self::new([0.0, 0.0], [1.0, 1.0])
    }

    pub fn center(&self) -> [f64; 2] {
        [(self.min[0] + self.max[0]) / 2.0, (self.min[1] + self.max[1]) / 2.0]
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub side: AxisSide,
    pub title: String,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Total,
    /// 1-based harmonic index.
    Component(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// One primitive handed to the painter.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect { rect: DataRect, fill: Color32 },
    Axis(Axis),
    Path { points: Vec<[f64; 2]>, style: PathStyle },
    Notice { text: String, kind: NoticeKind },
}

/// Maps a sorted set of discrete values onto equal bands of `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    values: Vec<f64>,
}

impl BandScale {
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn bandwidth(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            1.0 / self.values.len() as f64
        }
    }

    /// `(start, width)` of the band holding exactly `value`.
    pub fn band(&self, value: f64) -> Option<(f64, f64)> {
        let bits = value_bits(value);
        let i = self.values.iter().position(|v| value_bits(*v) == bits)?;
        Some((i as f64 * self.bandwidth(), self.bandwidth()))
    }

    /// Value whose band contains the unit coordinate `u`.
    pub fn value_at(&self, u: f64) -> Option<f64> {
        if !(0.0..=1.0).contains(&u) || self.values.is_empty() {
            return None;
        }
        let i = ((u / self.bandwidth()) as usize).min(self.values.len() - 1);
        self.values.get(i).copied()
    }

    /// Tick per band center; labels are thinned to at most `max_labels`.
    pub fn ticks(&self, max_labels: usize) -> Vec<Tick> {
        let stride = self.values.len().div_ceil(max_labels.max(1)).max(1);
        self.values
            .iter()
            .enumerate()
            .filter(|(i, _)| i % stride == 0)
            .map(|(i, v)| Tick {
                position: (i as f64 + 0.5) * self.bandwidth(),
                label: format_tick(*v),
            })
            .collect()
    }
}

fn format_tick(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub record: Record,
    pub rect: DataRect,
    pub fill: Color32,
}

/// Everything needed to draw the slice of one (A2, A3) pair.
#[derive(Debug, Clone)]
pub struct GridView {
    pub key: GroupKey,
    pub cells: Vec<GridCell>,
    pub scale: Option<ColorScale>,
    pub stats: Option<SliceStats>,
    pub x_scale: BandScale,
    pub y_scale: BandScale,
}

impl GridView {
    /// The cell containing the unit-space point `(x, y)`.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&GridCell> {
        let p2 = self.x_scale.value_at(x)?;
        let p3 = self.y_scale.value_at(y)?;
        let (p2, p3) = (value_bits(p2), value_bits(p3));
        self.cells
            .iter()
            .find(|c| value_bits(c.record.p2) == p2 && value_bits(c.record.p3) == p3)
    }

    pub fn centers(&self) -> Vec<[f64; 2]> {
        self.cells.iter().map(|c| c.rect.center()).collect()
    }
}

/// Resolve the selection into positioned, colored cells.
///
/// p2 runs along x and p3 along y, both in numeric order over the whole
/// dataset so the grid geometry does not change between slices.
pub fn grid_view(
    dataset: &Dataset,
    selection: &Selection,
    low: Color32,
    high: Color32,
) -> Result<GridView, QueryError> {
    let slice = query_slice(&dataset.index, selection)?;
    let x_scale = BandScale::new(dataset.domains.p2.values());
    let y_scale = BandScale::new(dataset.domains.p3.values());
    let scale = ColorScale::from_slice(slice, low, high);

    let cells = slice
        .iter()
        .filter_map(|r| {
            let (x0, w) = x_scale.band(r.p2)?;
            let (y0, h) = y_scale.band(r.p3)?;
            let fill = scale.map(|s| s.color32(r.max)).unwrap_or(low);
            Some(GridCell {
                record: *r,
                rect: DataRect::new([x0, y0], [x0 + w, y0 + h]),
                fill,
            })
        })
        .collect();

    Ok(GridView {
        key: selection.current(),
        cells,
        scale,
        stats: SliceStats::compute(slice),
        x_scale,
        y_scale,
    })
}

const MAX_TICK_LABELS: usize = 11;

/// Rectangles and axes for a resolved grid, or a notice for a missing slice.
pub fn grid_commands(view: &Result<GridView, QueryError>) -> Vec<DrawCommand> {
    let view = match view {
        Ok(view) => view,
        Err(e) => {
            return vec![DrawCommand::Notice {
                text: e.to_string(),
                kind: NoticeKind::Warning,
            }]
        }
    };

    let mut commands: Vec<DrawCommand> = view
        .cells
        .iter()
        .map(|c| DrawCommand::Rect {
            rect: c.rect,
            fill: c.fill,
        })
        .collect();

    commands.push(DrawCommand::Axis(Axis {
        side: AxisSide::Bottom,
        title: "p2".to_string(),
        ticks: view.x_scale.ticks(MAX_TICK_LABELS),
    }));
    commands.push(DrawCommand::Axis(Axis {
        side: AxisSide::Left,
        title: "p3".to_string(),
        ticks: view.y_scale.ticks(MAX_TICK_LABELS),
    }));

    if let Some(scale) = view.scale.filter(ColorScale::is_degenerate) {
        let (value, _) = scale.range();
        commands.push(DrawCommand::Notice {
            text: format!("Uniform response: every cell has max = {value:.4}"),
            kind: NoticeKind::Info,
        });
    }
    commands
}

/// Notice drawn in place of the heat map when no data could be loaded.
pub fn load_error_commands(error: &str) -> Vec<DrawCommand> {
    vec![DrawCommand::Notice {
        text: format!("Could not load data: {error}"),
        kind: NoticeKind::Error,
    }]
}

/// Total waveform path, preceded by one path per harmonic when requested.
pub fn waveform_commands(
    harmonics: &Harmonics,
    sample_count: usize,
    convention: PhaseConvention,
    show_components: bool,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(HARMONIC_COUNT + 1);
    if show_components {
        for (i, points) in harmonics.components(sample_count, convention).into_iter().enumerate() {
            commands.push(DrawCommand::Path {
                points,
                style: PathStyle::Component(i + 1),
            });
        }
    }
    commands.push(DrawCommand::Path {
        points: harmonics.evaluate(sample_count, convention),
        style: PathStyle::Total,
    });
    commands
}

/// Bounding box of every rectangle and path point, or `None` if there are none.
pub fn data_bounds(commands: &[DrawCommand]) -> Option<DataRect> {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    let mut include = |p: [f64; 2]| {
        if p[0].is_finite() && p[1].is_finite() {
            for i in 0..2 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
    };
    for command in commands {
        match command {
            DrawCommand::Rect { rect, .. } => {
                include(rect.min);
                include(rect.max);
            }
            DrawCommand::Path { points, .. } => points.iter().for_each(|p| include(*p)),
            DrawCommand::Axis(_) | DrawCommand::Notice { .. } => {}
        }
    }
    (min[0].is_finite() && min[1].is_finite()).then(|| DataRect::new(min, max))
}
