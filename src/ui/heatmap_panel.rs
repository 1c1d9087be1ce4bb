use egui::{Pos2, Rect, Sense, Vec2};

use crate::data::record::GroupKey;
use crate::processing::color_scale::ColorScale;
use crate::processing::kd_tree::HoverTree;
use crate::render::painter::{self, PlotTransform};
use crate::render::scene::{self, DataRect, GridView};
use crate::state::app_state::AppState;
use crate::state::selection::HoverPoint;
use crate::state::theme::Theme;

/// Frame-to-frame state of the heat-map panel.
#[derive(Default)]
pub struct HeatmapPanelState {
    /// Hover tree for the slice it was built from, tagged with the dataset
    /// generation so a reload with the same (A2, A3) pair rebuilds it.
    tree: Option<(u64, GroupKey, HoverTree)>,
}

impl HeatmapPanelState {
    fn tree_for(&mut self, generation: u64, view: &GridView) -> &HoverTree {
        let stale = !matches!(
            &self.tree,
            Some((built, key, _)) if *built == generation && *key == view.key
        );
        if stale {
            self.tree = None;
        }
        &self
            .tree
            .get_or_insert_with(|| (generation, view.key, HoverTree::build(&view.centers())))
            .2
    }
}

/// What happened in the panel this frame.
#[derive(Default)]
pub struct HeatmapResponse {
    pub hovered: Option<HoverPoint>,
    pub clicked: Option<HoverPoint>,
}

const LEFT_MARGIN: f32 = 70.0;
const BOTTOM_MARGIN: f32 = 44.0;
const TOP_MARGIN: f32 = 10.0;
const RIGHT_MARGIN: f32 = 80.0;
const TOOLTIP_SIZE: Vec2 = Vec2::new(260.0, 140.0);

/// Draw the heat map of the selected slice and resolve pointer interaction.
pub fn show_heatmap_panel(ui: &mut egui::Ui, app: &AppState, panel: &mut HeatmapPanelState) -> HeatmapResponse {
    let mut response = HeatmapResponse::default();

    let (dataset, selection) = match (&app.dataset, &app.selection) {
        (Some(d), Some(s)) => (d, s),
        _ => return response,
    };

    let settings = &app.settings;
    let view = scene::grid_view(dataset, selection, settings.low_color32(), settings.high_color32());
    let commands = scene::grid_commands(&view);

    // Square plot area that fits the panel.
    let available = ui.available_size();
    let side = (available.x - LEFT_MARGIN - RIGHT_MARGIN)
        .min(available.y - TOP_MARGIN - BOTTOM_MARGIN)
        .max(120.0);
    let total_rect = ui
        .allocate_space(Vec2::new(side + LEFT_MARGIN + RIGHT_MARGIN, side + TOP_MARGIN + BOTTOM_MARGIN))
        .1;
    let plot_rect = Rect::from_min_size(
        Pos2::new(total_rect.left() + LEFT_MARGIN, total_rect.top() + TOP_MARGIN),
        Vec2::splat(side),
    );

    let transform = PlotTransform::new(DataRect::unit(), plot_rect);
    let painter = ui.painter_at(total_rect);
    painter::paint(&painter, &commands, &transform, &app.theme);

    let view = match view {
        Ok(view) => view,
        Err(_) => {
            panel.tree = None;
            return response;
        }
    };

    if let Some(scale) = &view.scale {
        draw_legend(&painter, scale, plot_rect, app);
    }

    let interact = ui.interact(plot_rect, ui.id().with("heatmap"), Sense::click());
    let Some(pointer) = interact.hover_pos() else {
        return response;
    };

    let (x, y) = transform.screen_to_data(pointer);
    let tree = panel.tree_for(app.generation, &view);
    let hovered = tree
        .nearest(x, y)
        .and_then(|(i, _)| view.cells.get(i))
        .filter(|cell| cell.rect.contains(x, y))
        .or_else(|| view.cell_at(x, y));

    if let Some(cell) = hovered {
        let point = HoverPoint::from(&cell.record);
        painter.rect_stroke(
            transform.screen_rect(&cell.rect),
            0.0,
            app.theme.highlight(),
            egui::StrokeKind::Inside,
        );

        if interact.clicked() {
            response.clicked = Some(point);
        }
        interact.on_hover_ui_at_pointer(|ui| {
            ui.label(egui::RichText::new(point.describe()).monospace());
            draw_tooltip_waveform(ui, app, &point);
        });
        response.hovered = Some(point);
    }

    response
}

/// Fill the panel with the load failure instead of a heat map.
pub fn show_load_error(ui: &mut egui::Ui, theme: &Theme, error: &str) {
    let rect = ui.available_rect_before_wrap();
    let transform = PlotTransform::new(DataRect::unit(), rect);
    painter::paint(ui.painter(), &scene::load_error_commands(error), &transform, theme);
}

/// Small waveform graph inside the hover tooltip.
fn draw_tooltip_waveform(ui: &mut egui::Ui, app: &AppState, point: &HoverPoint) {
    let settings = &app.settings;
    let commands = scene::waveform_commands(
        &point.harmonics(),
        settings.samples(),
        settings.convention,
        settings.show_components,
    );
    let Some(bounds) = scene::data_bounds(&commands) else {
        return;
    };
    let (rect, _) = ui.allocate_exact_size(TOOLTIP_SIZE, Sense::hover());
    let transform = PlotTransform::padded(bounds, rect, 0.05);
    painter::paint(ui.painter(), &commands, &transform, &app.theme);
}

/// Vertical color bar right of the grid with the slice's response range.
fn draw_legend(painter: &egui::Painter, scale: &ColorScale, plot_rect: Rect, app: &AppState) {
    let bar = Rect::from_min_max(
        Pos2::new(plot_rect.right() + 16.0, plot_rect.top()),
        Pos2::new(plot_rect.right() + 30.0, plot_rect.bottom()),
    );
    let steps = 64;
    let (min, max) = scale.range();
    for i in 0..steps {
        let t0 = i as f32 / steps as f32;
        let t1 = (i + 1) as f32 / steps as f32;
        let value = min + (max - min) * (i as f64 + 0.5) / steps as f64;
        let segment = Rect::from_min_max(
            Pos2::new(bar.left(), bar.bottom() - t1 * bar.height()),
            Pos2::new(bar.right(), bar.bottom() - t0 * bar.height()),
        );
        painter.rect_filled(segment, 0.0, scale.color32(value));
    }

    let text_color = painter.ctx().style().visuals.text_color();
    let font = egui::FontId::proportional(10.0);
    painter.text(
        Pos2::new(bar.right() + 4.0, bar.top()),
        egui::Align2::LEFT_TOP,
        format!("{max:.3}"),
        font.clone(),
        text_color,
    );
    painter.text(
        Pos2::new(bar.right() + 4.0, bar.bottom()),
        egui::Align2::LEFT_BOTTOM,
        format!("{min:.3}"),
        font,
        text_color,
    );
    painter.rect_stroke(bar, 0.0, egui::Stroke::new(1.0, app.theme.grid_color()), egui::StrokeKind::Outside);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use crate::data::loader::DataSource;
    use crate::data::record::Record;
    use crate::state::selection::Selection;
    use egui::Color32;

    fn view_of(records: Vec<Record>) -> GridView {
        let ds = Dataset::new(DataSource::Url("mem://heatmap".into()), records);
        scene::grid_view(&ds, &Selection::new(0.5, 0.5), Color32::BLUE, Color32::RED).unwrap()
    }

    #[test]
    fn tree_is_rebuilt_for_new_dataset_with_same_pair() {
        let coarse = view_of(vec![
            Record::new(0.5, 0.5, 0.0, 0.0, 1.0),
            Record::new(0.5, 0.5, 0.5, 0.0, 1.5),
        ]);
        let fine = view_of(vec![
            Record::new(0.5, 0.5, 0.0, 0.0, 1.0),
            Record::new(0.5, 0.5, 0.25, 0.0, 1.1),
            Record::new(0.5, 0.5, 0.5, 0.0, 1.2),
            Record::new(0.5, 0.5, 0.75, 0.0, 1.3),
        ]);
        assert_eq!(coarse.key, fine.key);

        let mut panel = HeatmapPanelState::default();
        let (i, _) = panel.tree_for(1, &coarse).nearest(0.875, 0.5).unwrap();
        assert_eq!(i, 1);

        // Same generation and key: the cached tree is reused.
        let (i, _) = panel.tree_for(1, &fine).nearest(0.875, 0.5).unwrap();
        assert_eq!(i, 1);

        let (i, d) = panel.tree_for(2, &fine).nearest(0.875, 0.5).unwrap();
        assert_eq!(fine.cells[i].record.p2, 0.75);
        assert!(d.abs() < 1e-12);
    }
}
