use egui::Color32;
use image::Rgba;
use kids_drawing::export::{self, ExportJob, ExportSettings};
use kids_drawing::raster::{self, PAPER_COLOR};
use kids_drawing::{CanvasSurface, DrawingError};

fn stroke(canvas: &mut CanvasSurface, color: &str, width: f32, from: (f32, f32), to: (f32, f32)) {
    canvas.set_brush_color(color).unwrap();
    canvas.set_brush_thickness(width, &1.0_f32).unwrap();
    canvas.begin_stroke(from.0, from.1);
    canvas.extend_stroke(to.0, to.1).unwrap();
    canvas.commit_stroke().unwrap();
}

fn test_canvas() -> CanvasSurface {
    let mut canvas = CanvasSurface::new();
    canvas.resize(64, 48);
    stroke(&mut canvas, "red", 6.0, (8.0, 10.0), (56.0, 10.0));
    stroke(&mut canvas, "blue", 1.0, (8.0, 24.0), (56.0, 24.0));
    stroke(&mut canvas, "#FF2C6B10", 4.0, (8.0, 38.0), (56.0, 38.0));
    canvas
}

#[test]
fn test_non_overlapping_strokes_keep_their_color() {
    let canvas = test_canvas();
    let image = raster::capture(&canvas).unwrap();

    assert_eq!(image.dimensions(), (64, 48));
    for x in 8..56 {
        assert_eq!(*image.get_pixel(x, 10), raster::to_pixel(Color32::RED));
        assert_eq!(*image.get_pixel(x, 24), raster::to_pixel(Color32::BLUE));
        assert_eq!(*image.get_pixel(x, 38), Rgba([0x2C, 0x6B, 0x10, 255]));
    }
    // between strokes the paper shows
    assert_eq!(*image.get_pixel(30, 17), PAPER_COLOR);
    assert_eq!(*image.get_pixel(30, 31), PAPER_COLOR);
}

#[test]
fn test_later_stroke_paints_on_top() {
    let mut canvas = CanvasSurface::new();
    canvas.resize(20, 20);
    stroke(&mut canvas, "red", 4.0, (2.0, 10.0), (18.0, 10.0));
    stroke(&mut canvas, "blue", 4.0, (10.0, 2.0), (10.0, 18.0));

    let image = raster::capture(&canvas).unwrap();
    assert_eq!(*image.get_pixel(10, 10), raster::to_pixel(Color32::BLUE));

    canvas.undo();
    let image = raster::capture(&canvas).unwrap();
    assert_eq!(*image.get_pixel(10, 10), raster::to_pixel(Color32::RED));
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ExportSettings {
        directory: dir.path().join("exports"),
        file_prefix: "KidDrawingApp".to_owned(),
    };

    let image = raster::capture(&test_canvas()).unwrap();
    let path = export::save_png(&image, &settings).unwrap();

    assert!(path.is_absolute());
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("KidDrawingApp_"));
    assert!(name.ends_with(".png"));
    let stamp = &name["KidDrawingApp_".len()..name.len() - ".png".len()];
    assert!(stamp.parse::<u64>().is_ok(), "{name}");

    let reloaded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(reloaded, image);
}

#[test]
fn test_export_job_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let settings = ExportSettings {
        directory: dir.path().to_path_buf(),
        file_prefix: "Job".to_owned(),
    };

    let image = raster::capture(&test_canvas()).unwrap();
    let outcome = ExportJob::spawn(image, settings, ()).wait();

    assert!(outcome.is_success());
    let path = outcome.path_string();
    assert!(path.starts_with(&dir.path().display().to_string()));
    assert!(std::path::Path::new(&path).exists());
}

#[test]
fn test_export_job_failure_gives_empty_path() {
    let dir = tempfile::tempdir().unwrap();
    // a file where the export directory should be
    let blocker = dir.path().join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();
    let settings = ExportSettings {
        directory: blocker,
        file_prefix: "Job".to_owned(),
    };

    let image = raster::capture(&test_canvas()).unwrap();
    let mut job = ExportJob::spawn(image, settings, ());
    let outcome = loop {
        if let Some(outcome) = job.poll() {
            break outcome;
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    };

    assert!(!outcome.is_success());
    assert!(matches!(outcome.result, Err(DrawingError::Io(_))));
    assert_eq!(outcome.path_string(), "");
}

#[test]
fn test_capture_of_unsized_canvas_fails() {
    let canvas = CanvasSurface::new();
    assert!(matches!(raster::capture(&canvas), Err(DrawingError::Capture { .. })));
}
