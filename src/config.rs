//! Editor configuration.
//!
//! A plain value handed to [`crate::session::EditorSession`] at session start.
//! Nothing here is global; hosts load and persist it however they like.

use crate::core::line::{hex_color, Language};
use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

/// Editor version reported to hosts
pub const VERSION: &str = "1.5";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid zoom range: min {min} must be positive and below max {max}")]
    ZoomRange { min: f32, max: f32 },
    #[error("Invalid zoom strength: {0}")]
    ZoomStrength(f32),
    #[error("Invalid marker size: {0:?}")]
    MarkerSize([f32; 2]),
}

/// Zoom behaviour of the timeline view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Zoom change per wheel notch
    pub strength: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            strength: 0.1,
            min: 1.0,
            max: 5.0,
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Colour of a marker whose line continues the current sentence
    #[serde(with = "hex_color")]
    pub line_marker_color: Color32,

    /// Colour of a marker whose line starts a new sentence
    #[serde(with = "hex_color")]
    pub new_line_marker_color: Color32,

    /// Colour handed to the waveform renderer
    #[serde(with = "hex_color")]
    pub waveform_color: Color32,

    /// Live playback position indicator
    #[serde(with = "hex_color")]
    pub playback_playhead_color: Color32,

    /// Selection start indicator
    #[serde(with = "hex_color")]
    pub selection_playhead_color: Color32,

    pub zoom: ZoomConfig,

    /// Marker head size in points, `[width, height]`
    pub marker_size: [f32; 2],

    /// Language shown in the timeline and text preview
    pub language: Language,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_marker_color: Color32::from_rgb(76, 153, 127),
            new_line_marker_color: Color32::from_rgb(150, 153, 127),
            waveform_color: Color32::from_rgb(144, 209, 255),
            playback_playhead_color: Color32::RED,
            selection_playhead_color: Color32::WHITE,
            zoom: ZoomConfig::default(),
            marker_size: [20.0, 15.0],
            language: Language::English,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    /// Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the value ranges the view relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ZoomConfig { strength, min, max } = self.zoom;
        if !(min > 0.0 && min < max) {
            return Err(ConfigError::ZoomRange { min, max });
        }
        if !(strength > 0.0 && strength.is_finite()) {
            return Err(ConfigError::ZoomStrength(strength));
        }
        if self.marker_size.iter().any(|v| !(*v > 0.0)) {
            return Err(ConfigError::MarkerSize(self.marker_size));
        }
        Ok(())
    }

    pub fn marker_size(&self) -> Vec2 {
        Vec2::new(self.marker_size[0], self.marker_size[1])
    }
}
