use egui::{Color32, Pos2};
use uuid::Uuid;

/// Borrowed view of a stroke's geometry and paint, shared by committed and
/// open strokes so renderers only deal with one shape.
#[derive(Debug, Clone, Copy)]
pub struct StrokeView<'a> {
    pub points: &'a [Pos2],
    pub color: Color32,
    pub thickness: f32,
}

impl StrokeView<'_> {
    /// A polyline needs at least one segment to paint anything
    pub fn is_paintable(&self) -> bool {
        self.points.len() >= 2
    }
}

// Committed stroke, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: Uuid,
    points: Vec<Pos2>,
    color: Color32,
    thickness: f32,
}

// Stroke being extended by the current gesture
#[derive(Debug, Clone)]
pub struct OpenStroke {
    id: Uuid,
    points: Vec<Pos2>,
    color: Color32,
    thickness: f32,
}

impl Stroke {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn view(&self) -> StrokeView<'_> {
        StrokeView {
            points: &self.points,
            color: self.color,
            thickness: self.thickness,
        }
    }
}

impl OpenStroke {
    /// Start a stroke at `start` with the brush settings of this moment
    pub fn new(color: Color32, thickness: f32, start: Pos2) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            color,
            thickness,
        }
    }

    /// Add a line from the last point to `point`
    pub fn line_to(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    /// True once at least one segment has been drawn
    pub fn has_content(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn view(&self) -> StrokeView<'_> {
        StrokeView {
            points: &self.points,
            color: self.color,
            thickness: self.thickness,
        }
    }

    /// Freeze into a committed stroke, keeping the id
    pub fn commit(self) -> Stroke {
        Stroke {
            id: self.id,
            points: self.points,
            color: self.color,
            thickness: self.thickness,
        }
    }
}
