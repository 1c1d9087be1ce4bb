use crate::data::domain::Domain;
use crate::data::record::Field;
use crate::state::app_state::AppState;

/// Sliders for A2 and A3 plus a summary of the selected slice.
pub fn show_selection_controls(ui: &mut egui::Ui, app: &mut AppState) {
    let (dataset, selection) = match (&app.dataset, app.selection) {
        (Some(d), Some(s)) => (d, s),
        _ => {
            ui.label(egui::RichText::new("No data loaded.").weak());
            return;
        }
    };

    let mut changes: Vec<(Field, f64)> = Vec::new();
    for field in [Field::A2, Field::A3] {
        let domain = dataset.domains.get(field);
        let current = selection.get(field).unwrap_or_default();
        if let Some(value) = tick_slider(ui, field, domain, current) {
            changes.push((field, value));
        }
        ui.add_space(6.0);
    }

    for (field, value) in changes {
        if let Err(e) = app.select(field, value) {
            tracing::error!("{e}");
        }
    }

    ui.separator();
    ui.label(egui::RichText::new("Slice").strong());
    match app.current_slice() {
        Ok(slice) => match crate::processing::statistics::SliceStats::compute(slice) {
            Some(stats) => {
                ui.label(egui::RichText::new(stats.report()).monospace().size(12.0));
            }
            None => {
                ui.label(egui::RichText::new("Empty slice.").weak());
            }
        },
        Err(e) => {
            ui.colored_label(app.theme.notice_color(crate::render::scene::NoticeKind::Warning), e.to_string());
        }
    }
}

/// A continuous slider over `[min, max]` whose value snaps to the domain's
/// ticks, with step buttons. Returns the new value when it changed.
fn tick_slider(ui: &mut egui::Ui, field: Field, domain: &Domain, current: f64) -> Option<f64> {
    let (min, max) = match (domain.min(), domain.max()) {
        (Some(min), Some(max)) => (min, max),
        _ => return None,
    };

    ui.label(egui::RichText::new(field.label()).strong());

    let mut chosen = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(domain.len() > 1, egui::Button::new("<").min_size(egui::vec2(24.0, 22.0)))
            .on_hover_text("Previous value")
            .clicked()
        {
            chosen = domain.step(current, -1);
        }

        let mut value = current;
        let slider = egui::Slider::new(&mut value, min..=max)
            .clamping(egui::SliderClamping::Always)
            .fixed_decimals(3);
        if ui.add_enabled(domain.len() > 1, slider).changed() {
            chosen = domain.nearest(value);
        }

        if ui
            .add_enabled(domain.len() > 1, egui::Button::new(">").min_size(egui::vec2(24.0, 22.0)))
            .on_hover_text("Next value")
            .clicked()
        {
            chosen = domain.step(current, 1);
        }
    });

    match domain.position(current) {
        Some(i) => ui.label(egui::RichText::new(format!("{} of {}", i + 1, domain.len())).weak().small()),
        None => ui.label(egui::RichText::new("not in dataset").weak().small()),
    };

    chosen.filter(|v| v.to_bits() != current.to_bits())
}
