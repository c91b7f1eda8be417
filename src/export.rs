use std::io::Cursor;
use std::path::PathBuf;

use futures::channel::oneshot;
use image::{ImageFormat, RgbaImage};

use crate::error::{DrawingError, Result};
use crate::util::time;

/// Where exported pictures go and how they are named
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub directory: PathBuf,
    pub file_prefix: String,
}

/// `<prefix>_<unixSeconds>.png`
pub fn file_name(prefix: &str, unix_secs: u64) -> String {
    format!("{prefix}_{unix_secs}.png")
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Write `image` as a timestamped PNG into the export directory and return
/// its absolute path. The directory is created when missing.
pub fn save_png(image: &RgbaImage, settings: &ExportSettings) -> Result<PathBuf> {
    let bytes = encode_png(image)?;

    std::fs::create_dir_all(&settings.directory)?;
    let path = settings
        .directory
        .join(file_name(&settings.file_prefix, time::timestamp_secs()));
    std::fs::write(&path, &bytes)?;

    let path = std::path::absolute(&path)?;
    log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// Result of a finished save
#[derive(Debug)]
pub struct ExportOutcome {
    pub result: Result<PathBuf>,
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Absolute path of the saved file, or an empty string if saving failed
    pub fn path_string(&self) -> String {
        match &self.result {
            Ok(path) => path.display().to_string(),
            Err(_) => String::new(),
        }
    }
}

/// Something to poke when a background save finishes, so the UI thread
/// comes around to collect the outcome.
pub trait CompletionNotifier: Send + 'static {
    fn notify(&self);
}

impl CompletionNotifier for egui::Context {
    fn notify(&self) {
        self.request_repaint();
    }
}

impl CompletionNotifier for () {
    fn notify(&self) {}
}

/// A PNG save running off the UI thread.
///
/// The captured image is moved into the worker; the UI keeps drawing and
/// calls `poll` each frame until the outcome arrives.
pub struct ExportJob {
    receiver: oneshot::Receiver<Result<PathBuf>>,
}

impl ExportJob {
    pub fn spawn(image: RgbaImage, settings: ExportSettings, notifier: impl CompletionNotifier) -> Self {
        let (sender, receiver) = oneshot::channel();

        let spawned = std::thread::Builder::new()
            .name("png-export".to_owned())
            .spawn(move || {
                let result = save_png(&image, &settings);
                if let Err(err) = &result {
                    log::error!("Failed to save drawing: {err}");
                }
                // The receiver may already be gone if the app is closing
                let _ = sender.send(result);
                notifier.notify();
            });

        if let Err(err) = spawned {
            // The closure, and with it the sender, was dropped: poll reports cancellation
            log::error!("Failed to start export thread: {err}");
        }

        Self { receiver }
    }

    /// Collect the outcome if the save has finished
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(ExportOutcome { result }),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(ExportOutcome {
                result: Err(DrawingError::ExportCancelled),
            }),
        }
    }

    /// Block until the save has finished
    pub fn wait(self) -> ExportOutcome {
        let result = futures::executor::block_on(self.receiver)
            .unwrap_or(Err(DrawingError::ExportCancelled));
        ExportOutcome { result }
    }
}
