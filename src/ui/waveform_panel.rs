use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::processing::waveform::HARMONIC_COUNT;
use crate::state::app_state::AppState;
use crate::state::selection::HoverPoint;

/// Interactive plot of one period of the waveform behind `point`.
pub fn show_waveform_panel(ui: &mut egui::Ui, app: &AppState, point: Option<&HoverPoint>) {
    let Some(point) = point else {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Hover a cell to preview its waveform. Click to pin it.").weak());
        });
        return;
    };

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(point.describe()).monospace());
        if app.pinned.as_ref() == Some(point) {
            ui.label(egui::RichText::new("(pinned)").weak());
        }
    });

    let settings = &app.settings;
    let harmonics = point.harmonics();
    let samples = settings.samples();
    let total = harmonics.evaluate(samples, settings.convention);

    Plot::new("waveform_plot")
        .legend(Legend::default())
        .include_x(0.0)
        .include_x(1.0)
        .allow_scroll(false)
        .x_axis_label("x (periods)")
        .y_axis_label("f(x)")
        .show(ui, |plot_ui| {
            if settings.show_components {
                for (i, curve) in harmonics.components(samples, settings.convention).into_iter().enumerate() {
                    let name = match i {
                        0 => "sin(2πx)".to_string(),
                        _ => format!("harmonic {}", i + 1),
                    };
                    plot_ui.line(
                        Line::new(PlotPoints::from(curve))
                            .name(name)
                            .color(app.theme.component_color(i + 1))
                            .width(1.0),
                    );
                }
            }
            plot_ui.line(
                Line::new(PlotPoints::from(total))
                    .name(format!("sum of {HARMONIC_COUNT}"))
                    .color(app.theme.path_stroke(crate::render::scene::PathStyle::Total).color)
                    .width(2.0),
            );
        });
}
