//! Editor configuration.
//!
//! Read once at startup from `<data dir>/formcraft/config.json`. Every field
//! is optional in the file; missing fields take their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const APP_DIR: &str = "formcraft";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Directory holding one `<key>.json` file per saved form.
    pub storage_dir: PathBuf,
    pub autosave: bool,
    /// Seconds of inactivity before an autosave.
    pub autosave_cooldown_secs: f64,
    /// Length of the simulated submission.
    pub submit_delay_secs: f64,
    pub success_toast_secs: f64,
    /// Lifetime of save/import/export notifications.
    pub status_toast_secs: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_dir: app_dir().join("forms"),
            autosave: true,
            autosave_cooldown_secs: 2.0,
            submit_delay_secs: 1.0,
            success_toast_secs: 6.0,
            status_toast_secs: 3.0,
        }
    }
}

fn app_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl EditorConfig {
    pub fn default_path() -> PathBuf {
        app_dir().join(CONFIG_FILE)
    }

    /// Reads `path`. A missing file is not an error and yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like `load`, but any failure is logged and replaced by the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "configuration loaded");
                config
            }
            Err(err) => {
                warn!("{}; using default configuration", err);
                Self::default()
            }
        }
    }
}
