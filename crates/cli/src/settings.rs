use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use gazeguard_core::detection::infrastructure::onnx_blazeface_detector::DEFAULT_CONFIDENCE;
use gazeguard_core::gaze::domain::head_pose::DEFAULT_DEADBAND;
use gazeguard_core::gaze::domain::iris_offset::{DEFAULT_LEFT_THRESHOLD, DEFAULT_RIGHT_THRESHOLD};
use gazeguard_core::shared::constants::{APP_DIR_NAME, DEFAULT_LOG_FILE};

/// Values read from `settings.json`. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub detection_confidence: f64,
    pub mesh_confidence: f64,
    pub head_deadband: f64,
    pub iris_left: f64,
    pub iris_right: f64,
    pub log_file: PathBuf,
    /// Checked for model files after the user cache.
    pub models_dir: Option<PathBuf>,
    pub detector_model_url: Option<String>,
    pub face_mesh_model_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            detection_confidence: DEFAULT_CONFIDENCE,
            mesh_confidence: DEFAULT_CONFIDENCE,
            head_deadband: DEFAULT_DEADBAND,
            iris_left: DEFAULT_LEFT_THRESHOLD,
            iris_right: DEFAULT_RIGHT_THRESHOLD,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            models_dir: None,
            detector_model_url: None,
            face_mesh_model_url: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Loads an explicitly requested file; a missing or malformed file is
    /// an error.
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read settings {}: {e}", path.display()))?;
        let settings = serde_json::from_str(&json)
            .map_err(|e| format!("Invalid settings {}: {e}", path.display()))?;
        Ok(settings)
    }

    /// Loads the per-user settings file, falling back to defaults when it is
    /// absent or unreadable.
    pub fn load_default() -> Self {
        let Some(path) = Self::default_path().filter(|p| p.exists()) else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => {
                log::debug!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }
}
