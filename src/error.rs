use thiserror::Error;

/// Errors produced by the canvas, the rasterizer and the export path.
#[derive(Debug, Error)]
pub enum DrawingError {
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Invalid brush thickness: {0}")]
    InvalidThickness(f32),

    /// Extend or commit arrived without a preceding gesture start
    #[error("No stroke is open")]
    NoOpenStroke,

    #[error("Cannot capture a {width}x{height} surface")]
    Capture { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    /// The export worker went away before reporting back
    #[error("Export was cancelled")]
    ExportCancelled,

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, DrawingError>;
