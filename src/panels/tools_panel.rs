use egui::{Color32, Stroke, vec2};

use crate::app::DrawingApp;
use crate::color;

const SWATCH_SIZE: f32 = 28.0;

pub fn tools_panel(app: &mut DrawingApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("tools_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            palette(app, ui);
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("🖌 Brush size").clicked() {
                    app.ui_state_mut().show_brush_dialog = true;
                }

                if ui
                    .add_enabled(app.canvas().can_undo(), egui::Button::new("⟲ Undo"))
                    .clicked()
                {
                    app.undo();
                }

                ui.separator();

                let saving = app.is_saving();
                if ui.add_enabled(!saving, egui::Button::new("💾 Save")).clicked() {
                    app.save_drawing(ctx);
                }
                if saving {
                    ui.spinner();
                    ui.label("Saving...");
                }
            });

            ui.horizontal(|ui| {
                ui.label("Background:");
                let field = egui::TextEdit::singleline(&mut app.ui_state_mut().background_path)
                    .hint_text("path to a picture, or drop one here")
                    .desired_width(220.0);
                let response = ui.add(field);
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if ui.button("🖼 Load").clicked() || submitted {
                    app.load_background_from_path(ctx);
                }
                if ui
                    .add_enabled(app.canvas().background().is_some(), egui::Button::new("✖ Clear"))
                    .clicked()
                {
                    app.clear_background();
                }
            });
            ui.add_space(4.0);
        });
}

fn palette(app: &mut DrawingApp, ui: &mut egui::Ui) {
    let entries: Vec<Option<Color32>> = app
        .settings()
        .palette
        .iter()
        .map(|entry| color::parse_color(entry).ok())
        .collect();
    let selected = app.ui_state().selected_color;

    ui.horizontal_wrapped(|ui| {
        for (index, entry) in entries.into_iter().enumerate() {
            // Broken palette entries are skipped, not fatal
            let Some(fill) = entry else {
                continue;
            };

            let outline = if selected == Some(index) {
                Stroke::new(3.0, ui.visuals().strong_text_color())
            } else {
                Stroke::new(1.0, Color32::GRAY)
            };
            let swatch = egui::Button::new("")
                .fill(fill)
                .stroke(outline)
                .min_size(vec2(SWATCH_SIZE, SWATCH_SIZE));

            if ui.add(swatch).clicked() {
                app.select_color(index);
            }
        }
    });
}

/// The brush-size chooser: one button per preset
pub fn brush_size_window(app: &mut DrawingApp, ctx: &egui::Context) {
    let mut open = app.ui_state().show_brush_dialog;
    if !open {
        return;
    }

    let presets = app.settings().brush_presets;
    let mut chosen = None;
    egui::Window::new("Brush size")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for (label, size) in presets.iter() {
                    if ui.button(format!("{label} ({size})")).clicked() {
                        chosen = Some(size);
                    }
                }
            });
        });

    if let Some(size) = chosen {
        log::info!("Brush size selected from UI: {size}");
        app.select_brush_size(ctx, size);
        open = false;
    }
    app.ui_state_mut().show_brush_dialog = open;
}
