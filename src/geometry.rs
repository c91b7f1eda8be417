use egui::{Pos2, Rect, Vec2};

/// Distance from a point to a line segment
pub fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Bounding box of a polyline grown by `padding` on every side
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Place an image of `image_size` inside `bounds`, scaled uniformly to fit
/// and centered on both axes.
pub fn fit_center(image_size: Vec2, bounds: Vec2) -> Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 || bounds.x <= 0.0 || bounds.y <= 0.0 {
        return Rect::NOTHING;
    }

    let scale = (bounds.x / image_size.x).min(bounds.y / image_size.y);
    let size = image_size * scale;
    let min = ((bounds - size) / 2.0).to_pos2();
    Rect::from_min_size(min, size)
}
