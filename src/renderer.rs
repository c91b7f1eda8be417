// src/renderer.rs
use eframe::egui::{self, Color32, Painter, Pos2, Rect, Shape, TextureHandle, vec2};

use crate::canvas::{Background, CanvasSurface};
use crate::geometry;
use crate::stroke::StrokeView;
use crate::surface::Surface;

/// Paper color behind the drawing
pub const PAPER: Color32 = Color32::WHITE;

/// Draws the canvas with egui and keeps the background picture uploaded
pub struct Renderer {
    ctx: egui::Context,
    // Uploaded background and the generation it was made from
    background_texture: Option<(u64, TextureHandle)>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("background_generation", &self.background_texture.as_ref().map(|(g, _)| *g))
            .finish()
    }
}

impl Renderer {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            background_texture: None,
        }
    }

    /// Make sure the uploaded background matches the canvas
    fn sync_background(&mut self, background: Option<&Background>) {
        match background {
            None => self.background_texture = None,
            Some(bg) => {
                let current = self.background_texture.as_ref().map(|(generation, _)| *generation);
                if current != Some(bg.generation) {
                    let size = [bg.image.width() as usize, bg.image.height() as usize];
                    let image = egui::ColorImage::from_rgba_unmultiplied(size, bg.image.as_raw());
                    let texture = self.ctx.load_texture(
                        format!("canvas_background_{}", bg.generation),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    log::debug!("Uploaded background texture {}", bg.generation);
                    self.background_texture = Some((bg.generation, texture));
                }
            }
        }
    }

    /// Paint paper, background and strokes into `rect`
    pub fn render(&mut self, painter: &Painter, rect: Rect, canvas: &CanvasSurface) {
        painter.rect_filled(rect, 0.0, PAPER);
        self.sync_background(canvas.background());

        let mut surface = EguiSurface {
            painter,
            origin: rect.min,
            pixels_per_point: self.ctx.pixels_per_point(),
            canvas_size: canvas.size(),
            background_texture: self.background_texture.as_ref().map(|(_, texture)| texture),
        };
        canvas.render(&mut surface);
    }
}

/// `Surface` over an egui painter. Canvas coordinates are device pixels
/// relative to `origin`; egui works in points.
pub struct EguiSurface<'a> {
    pub painter: &'a Painter,
    pub origin: Pos2,
    pub pixels_per_point: f32,
    pub canvas_size: [u32; 2],
    pub background_texture: Option<&'a TextureHandle>,
}

impl EguiSurface<'_> {
    pub fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() / self.pixels_per_point
    }
}

impl Surface for EguiSurface<'_> {
    fn draw_background(&mut self, background: &Background) {
        let Some(texture) = self.background_texture else {
            return;
        };

        let placement = geometry::fit_center(
            vec2(background.image.width() as f32, background.image.height() as f32),
            vec2(self.canvas_size[0] as f32, self.canvas_size[1] as f32),
        );
        if !placement.is_positive() {
            return;
        }

        let screen_rect = Rect::from_min_max(self.to_screen(placement.min), self.to_screen(placement.max));
        self.painter.image(
            texture.id(),
            screen_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn draw_stroke(&mut self, stroke: StrokeView<'_>) {
        if !stroke.is_paintable() {
            return;
        }

        let width = stroke.thickness / self.pixels_per_point;
        let points: Vec<Pos2> = stroke.points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter.extend(stroke_shapes(points, width, stroke.color));
    }
}

/// Shapes for one polyline in screen points.
///
/// Opaque strokes get a disc at every vertex for round joins and caps.
/// Translucent strokes are a single line so each pixel is blended once.
fn stroke_shapes(points: Vec<Pos2>, width: f32, color: Color32) -> Vec<Shape> {
    let mut shapes = Vec::new();
    if color.is_opaque() {
        shapes.extend(
            points
                .iter()
                .map(|point| Shape::circle_filled(*point, width / 2.0, color)),
        );
    }
    shapes.push(Shape::line(points, egui::Stroke::new(width, color)));
    shapes
}
