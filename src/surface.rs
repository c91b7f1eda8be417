use crate::canvas::Background;
use crate::stroke::StrokeView;

/// A render target the canvas replays itself onto.
///
/// `CanvasSurface::render` calls `draw_background` at most once and then
/// `draw_stroke` once per stroke, in paint order. Implementations draw
/// polylines with round joins and caps and skip strokes without a segment.
pub trait Surface {
    /// Draw the background picture beneath all strokes
    fn draw_background(&mut self, background: &Background);

    /// Draw one stroke on top of everything drawn so far
    fn draw_stroke(&mut self, stroke: StrokeView<'_>);
}
