//! Viewer configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use timebox_common::{CsvLayout, LoggingConfig, Result, load_config};
use timebox_engine::EngineConfig;

/// Complete viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Chart geometry and interaction settings.
    #[serde(flatten)]
    pub engine: EngineConfig,

    /// CSV column layout.
    #[serde(default)]
    pub data: CsvLayout,

    /// Target of the Export button.
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
}

fn default_export_path() -> PathBuf {
    PathBuf::from("timeboxes.json")
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            engine: EngineConfig::default(),
            data: CsvLayout::default(),
            export_path: default_export_path(),
        }
    }
}

impl ViewerConfig {
    /// Default location: `<config dir>/timebox/viewer.json5`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("timebox").join("viewer.json5"))
    }

    /// Load `path`, or the default location if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return load_config(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => load_config(path),
            _ => Ok(Self::default()),
        }
    }
}
