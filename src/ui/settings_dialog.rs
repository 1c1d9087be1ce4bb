use crate::processing::waveform::PhaseConvention;
use crate::state::settings::{ViewerSettings, DEFAULT_DATA_URL, MAX_SAMPLE_COUNT, MIN_SAMPLE_COUNT};

/// Show the viewer settings window. Returns `true` while it should stay open,
/// `false` when the user closes it.
pub fn show_settings_dialog(ctx: &egui::Context, settings: &mut ViewerSettings) -> bool {
    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new("Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Waveform").strong().size(15.0));
            ui.add_space(4.0);

            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    egui::Grid::new("waveform_settings")
                        .num_columns(2)
                        .spacing([12.0, 6.0])
                        .show(ui, |ui| {
                            ui.label("Samples:");
                            ui.add(
                                egui::DragValue::new(&mut settings.sample_count)
                                    .range(MIN_SAMPLE_COUNT..=MAX_SAMPLE_COUNT)
                                    .speed(4.0),
                            );
                            ui.end_row();

                            ui.label("Phase:");
                            egui::ComboBox::from_id_salt("phase_convention")
                                .selected_text(settings.convention.label())
                                .width(200.0)
                                .show_ui(ui, |ui| {
                                    for convention in [PhaseConvention::Additive, PhaseConvention::TimeShift] {
                                        ui.selectable_value(
                                            &mut settings.convention,
                                            convention,
                                            convention.label(),
                                        );
                                    }
                                });
                            ui.end_row();

                            ui.label("Harmonics:");
                            ui.checkbox(&mut settings.show_components, "Show components");
                            ui.end_row();
                        });
                });

            ui.add_space(10.0);
            ui.label(egui::RichText::new("Heat map").strong().size(15.0));
            ui.add_space(4.0);

            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    egui::Grid::new("color_settings")
                        .num_columns(2)
                        .spacing([12.0, 6.0])
                        .show(ui, |ui| {
                            ui.label("Low:");
                            ui.color_edit_button_srgba_unmultiplied(&mut settings.low_color);
                            ui.end_row();

                            ui.label("High:");
                            ui.color_edit_button_srgba_unmultiplied(&mut settings.high_color);
                            ui.end_row();
                        });
                });

            ui.add_space(10.0);
            ui.label(egui::RichText::new("Data").strong().size(15.0));
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Default URL:");
                ui.add(egui::TextEdit::singleline(&mut settings.default_url).desired_width(220.0));
            });
            if ui.small_button("Reset URL").clicked() {
                settings.default_url = DEFAULT_DATA_URL.to_string();
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Restore Defaults").clicked() {
                    *settings = ViewerSettings::default();
                }
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            });
        });

    open && !close_clicked
}
