use std::path::Path;

use egui::{Color32, Painter, Rect, Response};

use crate::canvas::CanvasSurface;
use crate::color;
use crate::export::ExportJob;
use crate::file_handler::FileHandler;
use crate::input::{self, InputHandler};
use crate::panels;
use crate::raster;
use crate::renderer::Renderer;
use crate::settings::Settings;

/// How long a save notice stays on screen, in seconds
const NOTICE_DURATION: f64 = 4.0;

/// A short message shown over the canvas
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    pub expires_at: f64,
}

/// Transient UI state; nothing here is persisted
#[derive(Debug, Default)]
pub struct UiState {
    /// Index into the settings palette of the highlighted swatch
    pub selected_color: Option<usize>,
    pub show_brush_dialog: bool,
    /// Path typed into the background field
    pub background_path: String,
    pub notice: Option<Notice>,
}

pub struct DrawingApp {
    settings: Settings,
    canvas: CanvasSurface,
    renderer: Renderer,
    input: InputHandler,
    file_handler: FileHandler,
    ui_state: UiState,
    // Save running in the background, if any
    export_job: Option<ExportJob>,
    // Scale factor the brush size was last converted with
    brush_density: f32,
}

impl DrawingApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::from_env()
            .or_else(|| cc.storage.and_then(|storage| eframe::get_value(storage, eframe::APP_KEY)))
            .unwrap_or_default();

        Self::with_settings(&cc.egui_ctx, settings)
    }

    pub fn with_settings(ctx: &egui::Context, settings: Settings) -> Self {
        let mut canvas = CanvasSurface::new();
        if let Err(err) = canvas.set_brush_color(&settings.brush_color) {
            log::warn!("Keeping default brush color: {err}");
        }
        if let Err(err) = canvas.set_brush_thickness(settings.brush_size, ctx) {
            log::warn!("Keeping default brush size: {err}");
        }

        let selected_color = settings
            .palette
            .iter()
            .position(|entry| color::parse_color(entry).ok() == Some(canvas.brush_color()));

        Self {
            settings,
            canvas,
            renderer: Renderer::new(ctx),
            input: InputHandler::default(),
            file_handler: FileHandler::new(),
            ui_state: UiState {
                selected_color,
                ..Default::default()
            },
            export_job: None,
            brush_density: ctx.pixels_per_point(),
        }
    }

    pub fn canvas(&self) -> &CanvasSurface {
        &self.canvas
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui_state
    }

    pub fn ui_state_mut(&mut self) -> &mut UiState {
        &mut self.ui_state
    }

    pub fn is_saving(&self) -> bool {
        self.export_job.is_some()
    }

    /// Pick a palette entry as the brush color
    pub fn select_color(&mut self, index: usize) {
        if self.ui_state.selected_color == Some(index) {
            return;
        }
        let Some(entry) = self.settings.palette.get(index).cloned() else {
            return;
        };

        match self.canvas.set_brush_color(&entry) {
            Ok(()) => {
                self.settings.brush_color = entry;
                self.ui_state.selected_color = Some(index);
            }
            Err(err) => log::warn!("Palette entry {index} rejected: {err}"),
        }
    }

    pub fn select_brush_size(&mut self, ctx: &egui::Context, size: f32) {
        match self.canvas.set_brush_thickness(size, ctx) {
            Ok(()) => {
                self.settings.brush_size = size;
                self.brush_density = ctx.pixels_per_point();
            }
            Err(err) => log::warn!("Brush size rejected: {err}"),
        }
    }

    /// Re-apply the brush size when the scale factor changed since it was
    /// last converted to pixels (first frame, zoom, moving between monitors).
    pub fn sync_brush_density(&mut self, ctx: &egui::Context) {
        let density = ctx.pixels_per_point();
        if density == self.brush_density {
            return;
        }
        log::debug!("Scale factor changed from {} to {density}", self.brush_density);
        self.brush_density = density;
        if let Err(err) = self.canvas.set_brush_thickness(self.settings.brush_size, &density) {
            log::warn!("Keeping brush size: {err}");
        }
    }

    pub fn undo(&mut self) {
        self.canvas.undo();
    }

    pub fn load_background_from_path(&mut self, ctx: &egui::Context) {
        let path = self.ui_state.background_path.trim().to_owned();
        if path.is_empty() {
            return;
        }
        match crate::file_handler::load_image_from_path(Path::new(&path)) {
            Ok(image) => self.canvas.set_background(image),
            Err(err) => {
                log::error!("Failed to load background {path}: {err}");
                self.show_notice(ctx, format!("Could not open {path}"), true);
            }
        }
    }

    pub fn clear_background(&mut self) {
        self.canvas.clear_background();
    }

    /// Flatten the canvas and write it out on a background thread
    pub fn save_drawing(&mut self, ctx: &egui::Context) {
        if self.export_job.is_some() {
            return;
        }

        match raster::capture(&self.canvas) {
            Ok(image) => {
                log::info!("Saving {}x{} drawing", image.width(), image.height());
                let job = ExportJob::spawn(image, self.settings.export_settings(), ctx.clone());
                self.export_job = Some(job);
            }
            Err(err) => {
                log::error!("Failed to capture canvas: {err}");
                self.show_notice(ctx, "Something went wrong while saving the file.".to_owned(), true);
            }
        }
    }

    /// Pick up a finished save, if any
    fn poll_export(&mut self, ctx: &egui::Context) {
        let Some(outcome) = self.export_job.as_mut().and_then(ExportJob::poll) else {
            return;
        };
        self.export_job = None;

        if outcome.is_success() {
            let text = format!("File saved successfully: {}", outcome.path_string());
            self.show_notice(ctx, text, false);
        } else {
            self.show_notice(ctx, "Something went wrong while saving the file.".to_owned(), true);
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context, text: String, is_error: bool) {
        let now = ctx.input(|i| i.time);
        self.ui_state.notice = Some(Notice {
            text,
            is_error,
            expires_at: now + NOTICE_DURATION,
        });
        ctx.request_repaint_after(std::time::Duration::from_secs_f64(NOTICE_DURATION));
    }

    /// Feed this frame's pointer and keyboard input to the canvas
    pub fn handle_input(&mut self, ctx: &egui::Context, response: &Response) {
        let rect = response.rect;
        let pixels_per_point = ctx.pixels_per_point();
        self.canvas.resize(
            (rect.width() * pixels_per_point).round() as u32,
            (rect.height() * pixels_per_point).round() as u32,
        );
        self.input.set_canvas_rect(rect, pixels_per_point);

        for event in self.input.process_input(ctx, response.hovered()) {
            self.canvas.handle_gesture(event);
        }

        if input::undo_requested(ctx) {
            self.undo();
        }
    }

    pub fn render_canvas(&mut self, painter: &Painter, rect: Rect) {
        self.renderer.render(painter, rect, &self.canvas);
    }

    fn show_notice_overlay(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if self.ui_state.notice.as_ref().is_some_and(|n| n.expires_at <= now) {
            self.ui_state.notice = None;
        }
        let Some(notice) = &self.ui_state.notice else {
            return;
        };

        egui::Area::new(egui::Id::new("save_notice"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let color = if notice.is_error { Color32::RED } else { ui.visuals().text_color() };
                    ui.colored_label(color, &notice.text);
                });
            });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        match self.file_handler.take_dropped_image(ctx) {
            Some(Ok(image)) => self.canvas.set_background(image),
            Some(Err(err)) => {
                log::error!("Failed to load dropped image: {err}");
                self.show_notice(ctx, "Could not open the dropped picture".to_owned(), true);
            }
            None => {}
        }
    }
}

impl eframe::App for DrawingApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_brush_density(ctx);
        self.poll_export(ctx);
        self.handle_dropped_files(ctx);

        panels::tools_panel(self, ctx);
        panels::brush_size_window(self, ctx);
        panels::central_panel(self, ctx);

        self.show_notice_overlay(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_applied_to_canvas() {
        let ctx = egui::Context::default();
        let settings = Settings {
            brush_color: "#FFFF0000".to_owned(),
            brush_size: 10.0,
            ..Default::default()
        };
        let app = DrawingApp::with_settings(&ctx, settings);

        assert_eq!(app.canvas().brush_color(), Color32::RED);
        assert_eq!(app.canvas().brush_thickness(), 10.0 * ctx.pixels_per_point());
        assert_eq!(app.ui_state().selected_color, Some(2));
    }

    #[test]
    fn test_select_color_updates_highlight() {
        let ctx = egui::Context::default();
        let mut app = DrawingApp::with_settings(&ctx, Settings::default());
        assert_eq!(app.ui_state().selected_color, Some(1));

        app.select_color(4);
        assert_eq!(app.ui_state().selected_color, Some(4));
        assert_eq!(app.canvas().brush_color(), Color32::BLUE);
        assert_eq!(app.settings().brush_color, "#FF0000FF");

        // out of range leaves everything alone
        app.select_color(99);
        assert_eq!(app.ui_state().selected_color, Some(4));
    }

    #[test]
    fn test_bad_settings_fall_back() {
        let ctx = egui::Context::default();
        let settings = Settings {
            brush_color: "nope".to_owned(),
            brush_size: -1.0,
            ..Default::default()
        };
        let app = DrawingApp::with_settings(&ctx, settings);
        assert_eq!(app.canvas().brush_color(), crate::canvas::DEFAULT_BRUSH_COLOR);
        assert_eq!(app.canvas().brush_thickness(), crate::canvas::DEFAULT_BRUSH_SIZE);
    }

    #[test]
    fn test_save_without_area_reports_failure() {
        let ctx = egui::Context::default();
        let mut app = DrawingApp::with_settings(&ctx, Settings::default());
        app.save_drawing(&ctx);
        assert!(!app.is_saving());
        assert!(app.ui_state().notice.as_ref().is_some_and(|n| n.is_error));
    }

    fn wait_for_export(app: &mut DrawingApp, ctx: &egui::Context) {
        for _ in 0..500 {
            app.poll_export(ctx);
            if !app.is_saving() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        panic!("export did not finish");
    }

    #[test]
    fn test_save_reports_saved_path() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = egui::Context::default();
        let settings = Settings {
            export_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let mut app = DrawingApp::with_settings(&ctx, settings);
        app.canvas.resize(40, 30);
        app.canvas.begin_stroke(5.0, 5.0);
        app.canvas.extend_stroke(30.0, 20.0).unwrap();
        app.canvas.commit_stroke().unwrap();

        app.save_drawing(&ctx);
        assert!(app.is_saving());
        wait_for_export(&mut app, &ctx);

        let notice = app.ui_state().notice.clone().unwrap();
        assert!(!notice.is_error);
        assert!(notice.text.contains(&dir.path().display().to_string()));

        let saved: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(saved.len(), 1);
    }

    #[test]
    fn test_save_write_failure_shows_error() {
        // A regular file where the export directory should be
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let ctx = egui::Context::default();
        let settings = Settings {
            export_dir: Some(blocker.path().join("drawings")),
            ..Default::default()
        };
        let mut app = DrawingApp::with_settings(&ctx, settings);
        app.canvas.resize(10, 10);

        app.save_drawing(&ctx);
        wait_for_export(&mut app, &ctx);

        let notice = app.ui_state().notice.clone().unwrap();
        assert!(notice.is_error);
        assert!(!notice.text.contains("saved successfully"));
    }

    #[test]
    fn test_brush_follows_scale_factor() {
        let ctx = egui::Context::default();
        let mut app = DrawingApp::with_settings(&ctx, Settings::default());
        assert_eq!(app.canvas().brush_thickness(), 20.0);

        let mut raw = egui::RawInput::default();
        raw.viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(2.0);
        let _ = ctx.run(raw, |ctx| app.sync_brush_density(ctx));

        assert_eq!(app.canvas().brush_thickness(), 40.0);
        assert_eq!(app.settings().brush_size, 20.0);
    }
}
