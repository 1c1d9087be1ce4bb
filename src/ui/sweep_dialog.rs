use crate::processing::sweep::{RangeSpec, SweepSpec};
use crate::processing::waveform::PhaseConvention;

/// Sweeps above this many records get a warning in the dialog.
const LARGE_SWEEP: usize = 200_000;

/// State for the sweep generator dialog.
#[derive(Default)]
pub struct SweepDialogState {
    pub spec: SweepSpec,
}

/// Result of the sweep dialog interaction each frame.
pub enum SweepDialogResult {
    Start(SweepSpec),
    Cancel,
}

/// Show the sweep generator as an egui window.
///
/// Returns `Some(SweepDialogResult)` when the user presses Generate or Cancel,
/// or `None` while the dialog is still open.
pub fn show_sweep_dialog(ctx: &egui::Context, state: &mut SweepDialogState) -> Option<SweepDialogResult> {
    let mut result = None;

    egui::Window::new("Generate Sweep")
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new("Each record holds the peak of sin(2πx) plus two overtones.").weak(),
            );
            ui.add_space(8.0);

            egui::Grid::new("sweep_ranges")
                .num_columns(4)
                .spacing([10.0, 6.0])
                .show(ui, |ui| {
                    ui.label("");
                    ui.label(egui::RichText::new("Start").strong());
                    ui.label(egui::RichText::new("Stop").strong());
                    ui.label(egui::RichText::new("Step").strong());
                    ui.end_row();

                    range_row(ui, "Amplitudes (A2, A3)", &mut state.spec.amplitude);
                    range_row(ui, "Phases (p2, p3)", &mut state.spec.phase);
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label("Search seeds:");
                ui.add(egui::DragValue::new(&mut state.spec.seeds).range(1..=200));
            });
            ui.horizontal(|ui| {
                ui.label("Phase:");
                egui::ComboBox::from_id_salt("sweep_convention")
                    .selected_text(state.spec.convention.label())
                    .show_ui(ui, |ui| {
                        for convention in [PhaseConvention::Additive, PhaseConvention::TimeShift] {
                            ui.selectable_value(&mut state.spec.convention, convention, convention.label());
                        }
                    });
            });

            ui.add_space(8.0);
            let validation = state.spec.validate();
            match &validation {
                Ok(()) => {
                    let total = state.spec.total();
                    ui.label(format!("{total} records"));
                    if total > LARGE_SWEEP {
                        ui.colored_label(
                            egui::Color32::from_rgb(230, 160, 40),
                            "This sweep will take a while.",
                        );
                    }
                }
                Err(e) => {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), e.to_string());
                }
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let start = ui.add_enabled(
                    validation.is_ok(),
                    egui::Button::new(egui::RichText::new("Generate").strong())
                        .min_size(egui::vec2(100.0, 32.0)),
                );
                if start.clicked() {
                    result = Some(SweepDialogResult::Start(state.spec));
                }
                if ui
                    .add(egui::Button::new("Cancel").min_size(egui::vec2(100.0, 32.0)))
                    .clicked()
                {
                    result = Some(SweepDialogResult::Cancel);
                }
            });
        });

    result
}

fn range_row(ui: &mut egui::Ui, label: &str, range: &mut RangeSpec) {
    ui.label(label);
    ui.add(egui::DragValue::new(&mut range.start).speed(0.01).max_decimals(4));
    ui.add(egui::DragValue::new(&mut range.stop).speed(0.01).max_decimals(4));
    ui.add(egui::DragValue::new(&mut range.step).speed(0.001).max_decimals(4));
    ui.end_row();
}
