//! Editor preferences and settings.
//!
//! Persistent settings that survive editor restarts, stored as TOML in the
//! platform config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors raised while loading or saving preferences.
#[derive(Debug)]
pub enum PreferencesError {
    /// File could not be read or written
    Io(std::io::Error),
    /// File contents were not valid TOML
    Parse(String),
}

impl std::fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferencesError::Io(err) => write!(f, "preferences I/O error: {}", err),
            PreferencesError::Parse(msg) => write!(f, "preferences parse error: {}", msg),
        }
    }
}

impl std::error::Error for PreferencesError {}

impl From<std::io::Error> for PreferencesError {
    fn from(err: std::io::Error) -> Self {
        PreferencesError::Io(err)
    }
}

/// Editor preferences and settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorPreferences {
    // Camera
    pub orbit_sensitivity: f32,
    pub pan_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub invert_y: bool,

    // Interaction
    /// Pointer travel in pixels before a press becomes a rubber-band drag
    pub drag_threshold_px: f32,
    /// Discrete keyboard rotation step (degrees)
    pub rotate_step_degrees: f32,

    // Focus
    /// Extra distance factor when framing a selection
    pub focus_margin: f32,
    pub min_focus_distance: f32,
    pub max_focus_distance: f32,

    // Viewport
    pub gizmo_size: f32,
    pub show_editor_sprites: bool,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.01,
            zoom_sensitivity: 0.1,
            invert_y: false,

            drag_threshold_px: 5.0,
            rotate_step_degrees: 90.0,

            focus_margin: 2.0,
            min_focus_distance: 1.0,
            max_focus_distance: 10_000.0,

            gizmo_size: 1.0,
            show_editor_sprites: true,
        }
    }
}

impl EditorPreferences {
    /// Load preferences from a TOML file.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        if !path.exists() {
            log::info!("No preferences at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let prefs =
            toml::from_str(&content).map_err(|e| PreferencesError::Parse(e.to_string()))?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(prefs)
    }

    /// Save preferences to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| PreferencesError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Default preferences path in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("vista_editor");
            p.push("preferences.toml");
            p
        })
    }
}
