use std::path::Path;

use eframe::egui;
use image::RgbaImage;

use crate::error::Result;

/// Decode an image from memory into RGBA
pub fn load_image_from_bytes(bytes: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    log::debug!("Decoded image: {}x{}", img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Read and decode an image file into RGBA
pub fn load_image_from_path(path: &Path) -> Result<RgbaImage> {
    log::info!("Loading image from path: {}", path.display());
    let bytes = std::fs::read(path)?;
    load_image_from_bytes(&bytes)
}

/// Check if a dropped file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else if let Some(ext) = file.path.as_ref().and_then(|path| path.extension()) {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    } else {
        false
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Picks background pictures out of files dropped onto the window
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }

    /// Decode the first image among this frame's dropped files, if any
    pub fn take_dropped_image(&mut self, ctx: &egui::Context) -> Option<Result<RgbaImage>> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in &dropped {
            let name = display_name(file);
            if !is_image_file(file) {
                log::warn!("Dropped file is not a supported type: {name}");
                continue;
            }

            if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {name} ({} bytes)", bytes.len());
                return Some(load_image_from_bytes(bytes));
            }
            if let Some(path) = &file.path {
                return Some(load_image_from_path(path));
            }
            log::warn!("Dropped file has no accessible data: {name}");
        }

        None
    }

    /// Dim the window while files are dragged over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop a picture to use it as background",
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}
