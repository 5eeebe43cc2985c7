//! Tool configuration and engine tunables.

use crate::elements::{ElementStyle, SerializableColor, Text};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The `(tool, color, stroke width, font)` tuple supplied by the toolbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Currently selected tool.
    pub tool: ToolKind,
    /// Color applied to new elements, as `#rrggbb` in JSON.
    #[serde(with = "hex_color")]
    pub color: SerializableColor,
    /// Stroke width applied to new elements.
    pub stroke_width: f64,
    /// Font size applied to new text.
    pub font_size: f64,
    /// Font family applied to new text.
    pub font_family: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: SerializableColor::red(),
            stroke_width: 2.0,
            font_size: Text::DEFAULT_FONT_SIZE,
            font_family: Text::DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl ToolConfig {
    /// Parse a (possibly partial) JSON object. Missing fields take defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Style for a freshly created element.
    pub fn element_style(&self) -> ElementStyle {
        ElementStyle::new(self.color, self.stroke_width)
    }

    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }
}

/// Engine tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Pen points closer than this to the last recorded point are dropped.
    pub pen_min_distance: f64,
    /// Delay between placing a new text element and opening its editor.
    pub text_edit_delay: Duration,
    /// Pointer tolerance used when routing stage clicks to elements.
    pub hit_tolerance: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pen_min_distance: 2.0,
            text_edit_delay: Duration::from_millis(50),
            hit_tolerance: 4.0,
        }
    }
}

mod hex_color {
    use crate::elements::SerializableColor;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(color: &SerializableColor, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SerializableColor, D::Error> {
        let hex = String::deserialize(d)?;
        SerializableColor::from_hex(&hex)
            .ok_or_else(|| de::Error::custom(format!("invalid color: {hex}")))
    }
}
