use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::export::ExportSettings;

/// Environment variable naming a JSON file with settings overrides
pub const SETTINGS_ENV_VAR: &str = "KIDS_DRAWING_SETTINGS";

/// The three sizes offered by the brush-size chooser, in dp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushPresets {
    pub small: f32,
    pub medium: f32,
    pub large: f32,
}

impl Default for BrushPresets {
    fn default() -> Self {
        Self {
            small: 10.0,
            medium: 20.0,
            large: 30.0,
        }
    }
}

impl BrushPresets {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        [("Small", self.small), ("Medium", self.medium), ("Large", self.large)].into_iter()
    }
}

/// User-facing configuration, persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct Settings {
    /// Selected palette entry, as a color string
    pub brush_color: String,
    /// Brush size in dp
    pub brush_size: f32,
    pub palette: Vec<String>,
    pub brush_presets: BrushPresets,
    pub file_prefix: String,
    /// Defaults to a directory under the system temp dir
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            brush_color: "#FF000000".to_owned(),
            brush_size: 20.0,
            palette: [
                "#FFFCAB88", // skin
                "#FF000000",
                "#FFFF0000",
                "#FF2C6B10",
                "#FF0000FF",
                "#FFFFFF00",
                "#FF22FF00",
                "#FFFFFFFF",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            brush_presets: BrushPresets::default(),
            file_prefix: "KidDrawingApp".to_owned(),
            export_dir: None,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Settings from the file named by `KIDS_DRAWING_SETTINGS`, if set.
    ///
    /// A missing or broken file is logged and ignored.
    pub fn from_env() -> Option<Self> {
        let path = std::env::var_os(SETTINGS_ENV_VAR)?;
        let path = PathBuf::from(path);
        match Self::load_from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                Some(settings)
            }
            Err(err) => {
                log::warn!("Ignoring settings file {}: {err}", path.display());
                None
            }
        }
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            directory: self
                .export_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("kids_drawing")),
            file_prefix: self.file_prefix.clone(),
        }
    }
}
