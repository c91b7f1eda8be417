use egui::Color32;
use kids_drawing::{CanvasSurface, DrawingError, GestureEvent};

// Helper to draw one straight stroke through the gesture API
fn draw(canvas: &mut CanvasSurface, from: (f32, f32), to: (f32, f32)) {
    canvas.handle_gesture(GestureEvent::Start(egui::pos2(from.0, from.1)));
    canvas.handle_gesture(GestureEvent::Move(egui::pos2(to.0, to.1)));
    canvas.handle_gesture(GestureEvent::End(egui::pos2(to.0, to.1)));
}

#[test]
fn test_single_stroke_scenario() {
    let mut canvas = CanvasSurface::new();
    canvas.set_brush_color("#FF00FF00").unwrap();
    canvas.set_brush_thickness(12.0, &1.5_f32).unwrap();

    canvas.begin_stroke(0.0, 0.0);
    canvas.extend_stroke(10.0, 0.0).unwrap();
    canvas.commit_stroke().unwrap();

    assert_eq!(canvas.committed().len(), 1);
    let stroke = &canvas.committed()[0];
    assert_eq!(stroke.color(), canvas.brush_color());
    assert_eq!(stroke.thickness(), canvas.brush_thickness());
    assert_eq!(stroke.thickness(), 18.0);
    assert!(canvas.open_stroke().is_none());
}

#[test]
fn test_each_commit_adds_exactly_one() {
    let mut canvas = CanvasSurface::new();
    for i in 0..10 {
        let before = canvas.committed().len();
        canvas.begin_stroke(0.0, 0.0);
        for step in 0..i {
            canvas.extend_stroke(step as f32, 1.0).unwrap();
        }
        canvas.commit_stroke().unwrap();
        assert_eq!(canvas.committed().len(), before + 1);
        assert!(canvas.open_stroke().is_none_or(|open| !open.has_content()));
    }
}

#[test]
fn test_three_commits_one_undo() {
    let mut canvas = CanvasSurface::new();
    draw(&mut canvas, (0.0, 0.0), (1.0, 0.0));
    draw(&mut canvas, (0.0, 1.0), (1.0, 1.0));
    draw(&mut canvas, (0.0, 2.0), (1.0, 2.0));
    let third_id = canvas.committed()[2].id();

    assert!(canvas.undo());

    assert_eq!(canvas.committed().len(), 2);
    assert_eq!(canvas.undone().len(), 1);
    assert_eq!(canvas.undone().last().map(|s| s.id()), Some(third_id));
}

#[test]
fn test_undo_preserves_total_count() {
    let mut canvas = CanvasSurface::new();
    for i in 0..4 {
        draw(&mut canvas, (0.0, i as f32), (5.0, i as f32));
    }

    for expected_undone in 1..=4 {
        assert!(canvas.undo());
        assert_eq!(canvas.committed().len() + canvas.undone().len(), 4);
        assert_eq!(canvas.undone().len(), expected_undone);
    }

    // now empty: no-op
    assert!(!canvas.undo());
    assert_eq!(canvas.committed().len(), 0);
    assert_eq!(canvas.undone().len(), 4);
}

#[test]
fn test_undone_stack_order() {
    let mut canvas = CanvasSurface::new();
    draw(&mut canvas, (0.0, 0.0), (1.0, 0.0));
    draw(&mut canvas, (0.0, 1.0), (1.0, 1.0));
    let ids: Vec<_> = canvas.committed().iter().map(|s| s.id()).collect();

    canvas.undo();
    canvas.undo();

    // most recently removed is last
    let undone: Vec<_> = canvas.undone().iter().map(|s| s.id()).collect();
    assert_eq!(undone, vec![ids[1], ids[0]]);
}

#[test]
fn test_thickness_change_only_affects_later_strokes() {
    let mut canvas = CanvasSurface::new();
    draw(&mut canvas, (0.0, 0.0), (1.0, 0.0));
    draw(&mut canvas, (0.0, 1.0), (1.0, 1.0));
    let original = canvas.committed()[0].thickness();

    canvas.set_brush_thickness(30.0, &1.0_f32).unwrap();
    draw(&mut canvas, (0.0, 2.0), (1.0, 2.0));

    assert_eq!(canvas.committed()[0].thickness(), original);
    assert_eq!(canvas.committed()[1].thickness(), original);
    assert_eq!(canvas.committed()[2].thickness(), 30.0);
}

#[test]
fn test_invalid_color_does_not_disturb_surface() {
    let mut canvas = CanvasSurface::new();
    draw(&mut canvas, (0.0, 0.0), (1.0, 0.0));
    canvas.begin_stroke(5.0, 5.0);

    let err = canvas.set_brush_color("#12").unwrap_err();
    assert!(matches!(err, DrawingError::InvalidColor(ref s) if s == "#12"));

    assert_eq!(canvas.brush_color(), Color32::BLACK);
    assert_eq!(canvas.committed().len(), 1);
    assert!(canvas.open_stroke().is_some());
}

#[test]
fn test_stray_gestures_are_ignored() {
    let mut canvas = CanvasSurface::new();
    canvas.handle_gesture(GestureEvent::End(egui::pos2(0.0, 0.0)));
    canvas.handle_gesture(GestureEvent::Move(egui::pos2(3.0, 3.0)));
    assert!(canvas.committed().is_empty());
    assert!(canvas.open_stroke().is_none());
}
