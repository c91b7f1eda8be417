#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod color;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod geometry;
pub mod input;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod settings;
pub mod stroke;
pub mod surface;
pub mod util;

pub use app::DrawingApp;
pub use canvas::{CanvasSurface, DisplayDensity};
pub use error::{DrawingError, Result};
pub use export::{ExportJob, ExportOutcome, ExportSettings};
pub use input::{GestureEvent, InputHandler};
pub use renderer::Renderer;
pub use settings::Settings;
pub use stroke::{OpenStroke, Stroke};
pub use surface::Surface;
