use std::sync::Arc;

use egui::{Color32, Pos2};
use image::RgbaImage;

use crate::color;
use crate::error::{DrawingError, Result};
use crate::input::GestureEvent;
use crate::stroke::{OpenStroke, Stroke};
use crate::surface::Surface;

/// Brush color used until the user picks one
pub const DEFAULT_BRUSH_COLOR: Color32 = Color32::BLACK;

/// Brush size in dp used until the user picks one
pub const DEFAULT_BRUSH_SIZE: f32 = 20.0;

/// Source of the display's dp-to-pixel scale factor
pub trait DisplayDensity {
    fn scale_factor(&self) -> f32;
}

impl DisplayDensity for f32 {
    fn scale_factor(&self) -> f32 {
        *self
    }
}

impl DisplayDensity for egui::Context {
    fn scale_factor(&self) -> f32 {
        self.pixels_per_point()
    }
}

/// Picture layered beneath the strokes.
///
/// `generation` changes whenever the picture is replaced, so renderers that
/// cache an uploaded copy know when to refresh it.
#[derive(Debug, Clone)]
pub struct Background {
    pub image: Arc<RgbaImage>,
    pub generation: u64,
}

/// The drawing canvas: brush state, the stroke under the user's finger, the
/// committed strokes in paint order and the strokes taken back by undo.
///
/// Everything here runs on the UI thread and never blocks. Rendering is
/// immediate mode: `render` replays the whole history each time.
#[derive(Debug)]
pub struct CanvasSurface {
    brush_color: Color32,
    brush_thickness: f32,
    open_stroke: Option<OpenStroke>,
    committed: Vec<Stroke>,
    undone: Vec<Stroke>,
    background: Option<Background>,
    next_background_generation: u64,
    size: [u32; 2],
}

impl Default for CanvasSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasSurface {
    pub fn new() -> Self {
        Self {
            brush_color: DEFAULT_BRUSH_COLOR,
            brush_thickness: DEFAULT_BRUSH_SIZE,
            open_stroke: None,
            committed: Vec::new(),
            undone: Vec::new(),
            background: None,
            next_background_generation: 1,
            size: [0, 0],
        }
    }

    /// Parse `color` and use it for strokes started from now on.
    ///
    /// The open stroke, if any, keeps the color it was started with. On error
    /// the brush is left untouched.
    pub fn set_brush_color(&mut self, color: &str) -> Result<()> {
        let parsed = color::parse_color(color)?;
        self.set_brush_color_rgba(parsed);
        Ok(())
    }

    pub fn set_brush_color_rgba(&mut self, color: Color32) {
        log::debug!("Brush color set to {}", color::to_hex(color));
        self.brush_color = color;
    }

    /// Set the brush size in dp; it is stored in device pixels.
    ///
    /// Strokes read their own thickness when drawn, so the open stroke keeps
    /// the width it was started with.
    pub fn set_brush_thickness(&mut self, size: f32, density: &impl DisplayDensity) -> Result<()> {
        if !size.is_finite() || size <= 0.0 {
            return Err(DrawingError::InvalidThickness(size));
        }
        let pixels = size * density.scale_factor();
        if !pixels.is_finite() || pixels <= 0.0 {
            return Err(DrawingError::InvalidThickness(pixels));
        }

        log::debug!("Brush size set to {size}dp ({pixels}px)");
        self.brush_thickness = pixels;
        Ok(())
    }

    /// Start a stroke at (x, y), dropping whatever was open before
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        if self.open_stroke.is_some() {
            log::debug!("Gesture start while a stroke was open; resetting it");
        }
        self.open_stroke = Some(OpenStroke::new(
            self.brush_color,
            self.brush_thickness,
            Pos2::new(x, y),
        ));
    }

    /// Add a segment from the open stroke's last point to (x, y)
    pub fn extend_stroke(&mut self, x: f32, y: f32) -> Result<()> {
        let stroke = self.open_stroke.as_mut().ok_or(DrawingError::NoOpenStroke)?;
        stroke.line_to(Pos2::new(x, y));
        Ok(())
    }

    /// Move the open stroke to the end of the committed list.
    ///
    /// A tap without movement still commits a single-point stroke. The undone
    /// list is left alone.
    pub fn commit_stroke(&mut self) -> Result<()> {
        let stroke = self.open_stroke.take().ok_or(DrawingError::NoOpenStroke)?;
        let stroke = stroke.commit();
        log::info!(
            "Committed stroke {} ({} points, {}px)",
            stroke.id(),
            stroke.points().len(),
            stroke.thickness()
        );
        self.committed.push(stroke);
        Ok(())
    }

    /// Move the most recent committed stroke to the undone list.
    ///
    /// Returns false, changing nothing, when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.committed.pop() {
            Some(stroke) => {
                log::info!("Undo stroke {}", stroke.id());
                self.undone.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Route a gesture to begin/extend/commit.
    ///
    /// Moves and ends without a start are dropped; they are an input glitch,
    /// not something to report to the user.
    pub fn handle_gesture(&mut self, event: GestureEvent) {
        let result = match event {
            GestureEvent::Start(pos) => {
                self.begin_stroke(pos.x, pos.y);
                Ok(())
            }
            GestureEvent::Move(pos) => self.extend_stroke(pos.x, pos.y),
            GestureEvent::End(_) => self.commit_stroke(),
        };

        if let Err(err) = result {
            log::debug!("Ignoring {event:?}: {err}");
        }
    }

    /// Replay the canvas onto `surface`: background, committed strokes in
    /// order, then the open stroke.
    pub fn render(&self, surface: &mut impl Surface) {
        if let Some(background) = &self.background {
            surface.draw_background(background);
        }

        for stroke in &self.committed {
            surface.draw_stroke(stroke.view());
        }

        if let Some(open) = self.open_stroke.as_ref().filter(|s| s.has_content()) {
            surface.draw_stroke(open.view());
        }
    }

    /// Layer `image` beneath the strokes, replacing any previous picture
    pub fn set_background(&mut self, image: RgbaImage) {
        let generation = self.next_background_generation;
        self.next_background_generation += 1;
        log::info!("Background set ({}x{})", image.width(), image.height());
        self.background = Some(Background {
            image: Arc::new(image),
            generation,
        });
    }

    pub fn clear_background(&mut self) {
        self.background = None;
    }

    /// Update the surface size in device pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size != [width, height] {
            log::debug!("Canvas resized to {width}x{height}");
            self.size = [width, height];
        }
    }

    pub fn brush_color(&self) -> Color32 {
        self.brush_color
    }

    pub fn brush_thickness(&self) -> f32 {
        self.brush_thickness
    }

    pub fn open_stroke(&self) -> Option<&OpenStroke> {
        self.open_stroke.as_ref()
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn undone(&self) -> &[Stroke] {
        &self.undone
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }
}
