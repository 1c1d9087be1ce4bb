use eframe::egui;
use crate::data::dataset::Dataset;
use crate::data::loader::{self, DataSource};
use crate::data::record::Record;
use crate::error::{DataLoadError, SweepError};
use crate::processing::sweep::{self, SweepSpec};
use crate::render::scene::NoticeKind;
use crate::state::app_state::{AppState, Session, VERSION};
use crate::state::selection::HoverPoint;
use crate::ui::controls;
use crate::ui::heatmap_panel::{self, HeatmapPanelState};
use crate::ui::settings_dialog;
use crate::ui::sweep_dialog::{SweepDialogResult, SweepDialogState};
use crate::ui::waveform_panel;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Work running on a background thread. The result is handed back through
/// the shared slot and polled once per frame.
struct PendingJob<T> {
    label: String,
    result: Arc<Mutex<Option<T>>>,
    progress: Arc<AtomicUsize>,
    total: usize,
}

impl<T: Send + 'static> PendingJob<T> {
    fn spawn<F>(label: String, total: usize, work: F) -> Self
    where
        F: FnOnce(&AtomicUsize) -> T + Send + 'static,
    {
        let result: Arc<Mutex<Option<T>>> = Arc::new(Mutex::new(None));
        let progress = Arc::new(AtomicUsize::new(0));
        let result_clone = Arc::clone(&result);
        let progress_clone = Arc::clone(&progress);

        std::thread::spawn(move || {
            let value = work(&progress_clone);
            match result_clone.lock() {
                Ok(mut slot) => *slot = Some(value),
                Err(_) => tracing::error!("Result slot poisoned; background result dropped"),
            }
        });

        Self {
            label,
            result,
            progress,
            total,
        }
    }

    /// Take the finished result, if any.
    fn poll(&self) -> Option<T> {
        self.result.lock().ok().and_then(|mut slot| slot.take())
    }

    fn fraction(&self) -> Option<f32> {
        (self.total > 0).then(|| self.progress.load(Ordering::Relaxed) as f32 / self.total as f32)
    }
}

/// The phase-space viewer application.
pub struct PhaseSpaceApp {
    pub state: AppState,
    /// Text of the URL box in the header.
    pub url_input: String,
    /// Active sweep generator dialog.
    pub sweep_dialog: Option<SweepDialogState>,
    pub show_settings: bool,
    /// An error message shown in the footer until dismissed.
    pub error_message: Option<String>,
    /// Last load failure, shown in the central panel while no data is loaded.
    pub load_error: Option<String>,
    /// Sample under the pointer during the previous frame.
    hovered: Option<HoverPoint>,
    heatmap: HeatmapPanelState,
    pending_load: Option<PendingJob<Result<Dataset, DataLoadError>>>,
    pending_sweep: Option<PendingJob<Result<Dataset, SweepError>>>,
}

impl PhaseSpaceApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial: Option<DataSource>) -> Self {
        let state = AppState::new();

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            egui::FontId::proportional(12.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Monospace,
            egui::FontId::monospace(13.5),
        );

        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        style.spacing.slider_width = 180.0;

        ctx.set_style(style);
        ctx.set_visuals(styled_visuals(&state));

        let url_input = state.settings.default_url.clone();
        let mut app = Self {
            state,
            url_input,
            sweep_dialog: None,
            show_settings: false,
            error_message: None,
            load_error: None,
            hovered: None,
            heatmap: HeatmapPanelState::default(),
            pending_load: None,
            pending_sweep: None,
        };

        let initial = initial.unwrap_or_else(|| DataSource::Url(app.state.settings.default_url.clone()));
        app.start_load(initial);
        app
    }

    /// Load and index a data source on a background thread.
    fn start_load(&mut self, source: DataSource) {
        if matches!(source, DataSource::Generated { .. }) {
            return;
        }
        tracing::info!("Loading {source}");
        let label = format!("Loading {source}...");
        self.pending_load = Some(PendingJob::spawn(label, 0, move |_| -> Result<Dataset, DataLoadError> {
            let records = loader::load(&source)?;
            Ok(Dataset::new(source, records))
        }));
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Sweep Tables", &["csv"])
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.start_load(DataSource::File(path));
        }
    }

    /// Run the sweep generator on a background thread.
    fn start_sweep(&mut self, spec: SweepSpec) {
        let total = spec.total();
        tracing::info!("Generating sweep {} ({total} records)", spec.describe());
        let label = format!("Generating {total} samples...");
        self.pending_sweep = Some(PendingJob::spawn(label, total, move |progress| -> Result<Dataset, SweepError> {
            let mut last_percent = 0;
            let records = sweep::compute_space(&spec, |done, total| {
                progress.store(done, Ordering::Relaxed);
                let percent = done * 100 / total.max(1);
                if percent > last_percent {
                    last_percent = percent;
                    tracing::info!("Sweep {percent}% ({done}/{total})");
                }
            })?;
            let source = DataSource::Generated {
                description: spec.describe(),
            };
            Ok(Dataset::new(source, records))
        }));
    }

    /// Export the loaded records as a sweep CSV via a save dialog.
    fn export_csv(&mut self) {
        let dataset = match &self.state.dataset {
            Some(d) => d,
            None => return,
        };

        let filename = match &dataset.source {
            DataSource::Generated { description } => format!("phase_space_{description}.csv"),
            _ => "phase_space.csv".to_string(),
        };
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(&filename)
            .add_filter("CSV Files", &["csv"])
            .save_file()
        {
            let records: Vec<Record> = dataset.records().copied().collect();
            let written = std::fs::File::create(&path)
                .map_err(SweepError::from)
                .and_then(|file| sweep::write_csv(&records, std::io::BufWriter::new(file)));
            match written {
                Ok(()) => tracing::info!("Exported {} records to {:?}", records.len(), path),
                Err(e) => {
                    tracing::error!("Export failed: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
        }
    }

    /// Save the current session to a JSON file.
    fn save_session(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name("session.json")
            .add_filter("Phase Space Session", &["json"])
            .save_file()
        {
            match serde_json::to_string_pretty(&self.state.session()) {
                Ok(json) => {
                    if let Err(e) = std::fs::write(&path, json) {
                        tracing::error!("Failed to save session: {e}");
                        self.error_message = Some(format!("Failed to save session: {e}"));
                    } else {
                        tracing::info!("Session saved to {:?}", path);
                    }
                }
                Err(e) => tracing::error!("Failed to serialize session: {e}"),
            }
        }
    }

    /// Load a session from a JSON file, reloading its data source if needed.
    fn load_session(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Phase Space Session", &["json"])
            .pick_file()
        {
            match std::fs::read_to_string(&path) {
                Ok(json) => match serde_json::from_str::<Session>(&json) {
                    Ok(session) => {
                        if let Some(source) = self.state.apply_session(session) {
                            self.start_load(source);
                        }
                        tracing::info!("Session loaded from {:?}", path);
                    }
                    Err(e) => {
                        self.error_message = Some(format!("Failed to parse session: {e}"));
                    }
                },
                Err(e) => {
                    self.error_message = Some(format!("Failed to read file: {e}"));
                }
            }
        }
    }

    fn poll_jobs(&mut self) {
        if let Some(result) = self.pending_load.as_ref().and_then(PendingJob::poll) {
            self.pending_load = None;
            match result {
                Ok(dataset) => {
                    tracing::info!("Loaded {}", dataset.summary());
                    self.load_error = None;
                    self.hovered = None;
                    self.state.install_dataset(dataset);
                }
                Err(e) => {
                    tracing::error!("Failed to load data: {e}");
                    self.load_error = Some(e.to_string());
                    self.error_message = Some(format!("Failed to load data: {e}"));
                }
            }
        }

        if let Some(result) = self.pending_sweep.as_ref().and_then(PendingJob::poll) {
            self.pending_sweep = None;
            match result {
                Ok(dataset) => {
                    tracing::info!("Generated {}", dataset.summary());
                    self.load_error = None;
                    self.hovered = None;
                    self.state.install_dataset(dataset);
                }
                Err(e) => {
                    tracing::error!("Sweep failed: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
        }
    }

    fn busy(&self) -> bool {
        self.pending_load.is_some() || self.pending_sweep.is_some()
    }
}

/// Theme visuals with the application's rounding applied.
fn styled_visuals(state: &AppState) -> egui::Visuals {
    let mut vis = state.theme.visuals();
    vis.window_corner_radius = egui::CornerRadius::same(8);
    vis.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.active.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.open.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.bg_stroke = egui::Stroke::new(1.5, egui::Color32::from_gray(160));
    vis.widgets.active.bg_stroke = egui::Stroke::new(2.0, egui::Color32::from_gray(200));
    vis
}

impl eframe::App for PhaseSpaceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(styled_visuals(&self.state));

        self.poll_jobs();

        // ------------------------------------------------------------------
        // Dropped files
        // ------------------------------------------------------------------
        let mut dropped_paths: Vec<std::path::PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    let is_csv = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
                    if is_csv {
                        dropped_paths.push(path.clone());
                    }
                }
            }
        });
        // Only the last dropped table is kept.
        if let Some(path) = dropped_paths.pop() {
            self.start_load(DataSource::File(path));
        }

        // ------------------------------------------------------------------
        // Header
        // ------------------------------------------------------------------
        let mut open_file = false;
        let mut load_url = false;
        let mut export = false;
        let mut save_session = false;
        let mut load_session = false;
        let busy = self.busy();
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.visuals_mut().override_text_color = Some(ui.visuals().strong_text_color());
                ui.heading("Phase Space");
                ui.visuals_mut().override_text_color = None;

                ui.separator();

                if ui.add_enabled(!busy, egui::Button::new("Open CSV")).clicked() {
                    open_file = true;
                }
                let url_box = ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .hint_text("https://...")
                        .desired_width(280.0),
                );
                let submitted = url_box.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.add_enabled(!busy, egui::Button::new("Load URL")).clicked() || (submitted && !busy) {
                    load_url = true;
                }

                ui.separator();

                if ui.add_enabled(!busy, egui::Button::new("Generate Sweep")).clicked() {
                    self.sweep_dialog = Some(SweepDialogState::default());
                }
                if ui
                    .add_enabled(self.state.dataset.is_some(), egui::Button::new("Export CSV"))
                    .clicked()
                {
                    export = true;
                }

                ui.separator();

                if ui.button("Save Session").clicked() {
                    save_session = true;
                }
                if ui.button("Load Session").clicked() {
                    load_session = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.state.theme {
                        crate::state::theme::Theme::Dark => "Light Mode",
                        crate::state::theme::Theme::Light => "Dark Mode",
                    };
                    if ui.button(theme_label).clicked() {
                        self.state.theme = self.state.theme.toggle();
                    }
                    if ui.button("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }

                    ui.separator();
                    ui.small(format!("v{VERSION}"));
                });
            });
        });

        if open_file {
            self.open_file_dialog();
        }
        if load_url && !self.url_input.trim().is_empty() {
            let source = DataSource::parse(&self.url_input);
            self.start_load(source);
        }
        if export {
            self.export_csv();
        }
        if save_session {
            self.save_session();
        }
        if load_session {
            self.load_session();
        }

        // ------------------------------------------------------------------
        // Footer
        // ------------------------------------------------------------------
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.state.dataset {
                    Some(dataset) => {
                        ui.label(egui::RichText::new(dataset.source.to_string()).strong());
                        ui.separator();
                        ui.label(egui::RichText::new(dataset.summary()).weak());
                    }
                    None => {
                        ui.label(egui::RichText::new("No data loaded").weak());
                    }
                }

                if let Some(msg) = &self.error_message {
                    ui.separator();
                    ui.colored_label(self.state.theme.notice_color(NoticeKind::Error), msg);
                    if ui.small_button("dismiss").clicked() {
                        self.error_message = None;
                    }
                }
            });
        });

        // ------------------------------------------------------------------
        // Selection controls and waveform
        // ------------------------------------------------------------------
        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                controls::show_selection_controls(ui, &mut self.state);
                if self.state.pinned.is_some() {
                    ui.add_space(8.0);
                    if ui.button("Unpin waveform").clicked() {
                        self.state.pinned = None;
                    }
                }
            });

        egui::SidePanel::right("waveform")
            .resizable(true)
            .default_width(420.0)
            .min_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.label(egui::RichText::new("Waveform").strong().size(15.0));
                let shown = self.state.pinned.or(self.hovered);
                waveform_panel::show_waveform_panel(ui, &self.state, shown.as_ref());
            });

        // ------------------------------------------------------------------
        // Heat map
        // ------------------------------------------------------------------
        let busy = self.busy();
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                match &self.load_error {
                    Some(e) => heatmap_panel::show_load_error(ui, &self.state.theme, e),
                    None => {
                        ui.centered_and_justified(|ui| {
                            if busy {
                                ui.spinner();
                            } else {
                                ui.label(
                                    egui::RichText::new("Open a sweep CSV, drop one here, or generate a sweep.")
                                        .weak(),
                                );
                            }
                        });
                    }
                }
                return;
            }

            let response = heatmap_panel::show_heatmap_panel(ui, &self.state, &mut self.heatmap);
            self.hovered = response.hovered;
            if let Some(clicked) = response.clicked {
                self.state.pinned = if self.state.pinned == Some(clicked) {
                    None
                } else {
                    Some(clicked)
                };
            }
        });

        // ------------------------------------------------------------------
        // Dialogs
        // ------------------------------------------------------------------
        if let Some(ref mut dialog) = self.sweep_dialog {
            match crate::ui::sweep_dialog::show_sweep_dialog(ctx, dialog) {
                Some(SweepDialogResult::Start(spec)) => {
                    self.sweep_dialog = None;
                    self.start_sweep(spec);
                }
                Some(SweepDialogResult::Cancel) => {
                    self.sweep_dialog = None;
                }
                None => {}
            }
        }

        if self.show_settings {
            self.show_settings = settings_dialog::show_settings_dialog(ctx, &mut self.state.settings);
        }

        // Progress window while background work runs.
        let job = self
            .pending_sweep
            .as_ref()
            .map(|j| (j.label.clone(), j.fraction()))
            .or_else(|| self.pending_load.as_ref().map(|j| (j.label.clone(), j.fraction())));
        if let Some((label, fraction)) = job {
            egui::Window::new("Working")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(label);
                    });
                    if let Some(fraction) = fraction {
                        ui.add(egui::ProgressBar::new(fraction).show_percentage());
                    }
                });
            ctx.request_repaint();
        }
    }
}
