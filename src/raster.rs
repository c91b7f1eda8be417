//! Software rendering of the canvas into an `RgbaImage`, used for export.

use egui::{Color32, Pos2, Rect, vec2};
use image::{Rgba, RgbaImage, imageops};

use crate::canvas::{Background, CanvasSurface};
use crate::error::{DrawingError, Result};
use crate::geometry;
use crate::stroke::StrokeView;
use crate::surface::Surface;

/// Fill used where neither background nor strokes cover the canvas
pub const PAPER_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// `Surface` that paints into an in-memory image.
///
/// Strokes are hard edged: a pixel belongs to a stroke when its center lies
/// within half the stroke width of one of its segments, which gives round
/// joins and caps. Opaque strokes therefore reproduce their exact color.
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, fill: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, fill),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn bounds(&self) -> Rect {
        Rect::from_min_size(
            Pos2::ZERO,
            vec2(self.image.width() as f32, self.image.height() as f32),
        )
    }
}

impl Surface for RasterSurface {
    fn draw_background(&mut self, background: &Background) {
        let source: &RgbaImage = &background.image;
        let placement = geometry::fit_center(
            vec2(source.width() as f32, source.height() as f32),
            self.bounds().size(),
        );
        if !placement.is_positive() {
            return;
        }

        let width = placement.width().round().max(1.0) as u32;
        let height = placement.height().round().max(1.0) as u32;
        let scaled = imageops::resize(source, width, height, imageops::FilterType::Triangle);
        imageops::overlay(
            &mut self.image,
            &scaled,
            placement.min.x.round() as i64,
            placement.min.y.round() as i64,
        );
    }

    fn draw_stroke(&mut self, stroke: StrokeView<'_>) {
        if !stroke.is_paintable() {
            return;
        }

        // A hairline still covers the pixel its center passes through
        let radius = (stroke.thickness / 2.0).max(0.5);
        let area = geometry::calculate_bounds(stroke.points, radius).intersect(self.bounds());
        if !area.is_positive() {
            return;
        }

        let x0 = area.min.x.floor() as u32;
        let y0 = area.min.y.floor() as u32;
        let x1 = (area.max.x.ceil() as u32).min(self.image.width());
        let y1 = (area.max.y.ceil() as u32).min(self.image.height());
        let mask_width = (x1 - x0) as usize;
        let mut mask = vec![false; mask_width * (y1 - y0) as usize];

        // Coverage is collected per stroke first so translucent strokes
        // blend once where their own segments overlap.
        for segment in stroke.points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            let segment_area = geometry::calculate_bounds(&[a, b], radius).intersect(area);
            if !segment_area.is_positive() {
                continue;
            }
            let sx0 = (segment_area.min.x.floor() as u32).max(x0);
            let sy0 = (segment_area.min.y.floor() as u32).max(y0);
            let sx1 = (segment_area.max.x.ceil() as u32).min(x1);
            let sy1 = (segment_area.max.y.ceil() as u32).min(y1);

            for y in sy0..sy1 {
                for x in sx0..sx1 {
                    let index = (y - y0) as usize * mask_width + (x - x0) as usize;
                    if mask[index] {
                        continue;
                    }
                    let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                    if geometry::distance_to_line_segment(center, a, b) <= radius {
                        mask[index] = true;
                    }
                }
            }
        }

        let source = stroke.color.to_srgba_unmultiplied();
        for (index, covered) in mask.iter().enumerate() {
            if *covered {
                let x = x0 + (index % mask_width) as u32;
                let y = y0 + (index / mask_width) as u32;
                let pixel = self.image.get_pixel_mut(x, y);
                *pixel = blend_over(source, *pixel);
            }
        }
    }
}

/// Source-over compositing of unmultiplied RGBA
fn blend_over(source: [u8; 4], dest: Rgba<u8>) -> Rgba<u8> {
    let sa = source[3] as f32 / 255.0;
    if sa >= 1.0 {
        return Rgba(source);
    }
    if sa <= 0.0 {
        return dest;
    }

    let da = dest[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(source[0], dest[0]),
        channel(source[1], dest[1]),
        channel(source[2], dest[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Flatten the canvas (paper, background picture, strokes) into one image.
///
/// Fails with `DrawingError::Capture` while the surface has no area.
pub fn capture(canvas: &CanvasSurface) -> Result<RgbaImage> {
    let [width, height] = canvas.size();
    if width == 0 || height == 0 {
        return Err(DrawingError::Capture { width, height });
    }

    let mut surface = RasterSurface::new(width, height, PAPER_COLOR);
    canvas.render(&mut surface);
    log::debug!(
        "Captured {width}x{height} canvas with {} strokes",
        canvas.committed().len()
    );
    Ok(surface.into_image())
}

/// Color of a stroke as it lands in an exported image
pub fn to_pixel(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}
