//! Configuration for the annotation engine
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Interaction settings (hit tolerance, drag sensitivities)
//! - Rendering settings (ellipse tessellation, label placement)
//! - Transform settings (change-detection precision)

use serde::{Deserialize, Serialize};
use sonoview_core::constants::{
    ELLIPSE_SEGMENTS, HIT_TOLERANCE_PX, LABEL_OFFSET, PAN_SENSITIVITY, TRANSFORM_GATE_DECIMALS,
    WINDOW_LEVEL_SENSITIVITY,
};
use sonoview_core::{ConfigError, Error, Result};
use std::path::{Path, PathBuf};

/// Pointer interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Selection hit tolerance in screen pixels
    pub hit_tolerance_px: f64,
    /// Multiplier applied to window/level drag deltas
    pub window_level_sensitivity: f64,
    /// Multiplier applied to pan drag deltas
    pub pan_sensitivity: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            hit_tolerance_px: HIT_TOLERANCE_PX,
            window_level_sensitivity: WINDOW_LEVEL_SENSITIVITY,
            pan_sensitivity: PAN_SENSITIVITY,
        }
    }
}

/// Render data settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingSettings {
    /// Segments used to approximate ellipse outlines
    pub ellipse_segments: usize,
    /// Offset in image pixels used to lift labels off their geometry
    pub label_offset_px: f64,
}

impl Default for RenderingSettings {
    fn default() -> Self {
        Self {
            ellipse_segments: ELLIPSE_SEGMENTS,
            label_offset_px: LABEL_OFFSET,
        }
    }
}

/// View transform settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    /// Decimal places compared when deciding whether a transform changed
    pub gate_decimals: u32,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            gate_decimals: TRANSFORM_GATE_DECIMALS,
        }
    }
}

/// Complete engine configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Interaction settings
    pub interaction: InteractionSettings,
    /// Rendering settings
    pub rendering: RenderingSettings,
    /// Transform settings
    pub transform: TransformSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat {
            extension: other.unwrap_or("").to_string(),
        }
        .into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file, under the platform config dir
    ///
    /// Returns `None` when the platform has no config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sonoview").join("config.toml"))
    }

    /// Load the config from [`Config::default_path`], falling back to defaults
    /// when the file does not exist.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                reason: e.to_string(),
            })?,
            Format::Toml => toml::from_str(&content).map_err(|e| ConfigError::Parse {
                reason: e.to_string(),
            })?,
        };

        config.validate()?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    ///
    /// Parent directories are created as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => {
                serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
                    reason: e.to_string(),
                })?
            }
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
                reason: e.to_string(),
            })?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        positive(
            "interaction.hit_tolerance_px",
            self.interaction.hit_tolerance_px,
        )?;
        positive(
            "interaction.window_level_sensitivity",
            self.interaction.window_level_sensitivity,
        )?;
        positive("interaction.pan_sensitivity", self.interaction.pan_sensitivity)?;

        if self.rendering.ellipse_segments < 8 {
            return Err(invalid("rendering.ellipse_segments", "must be at least 8"));
        }
        if !self.rendering.label_offset_px.is_finite() || self.rendering.label_offset_px < 0.0 {
            return Err(invalid("rendering.label_offset_px", "must be >= 0"));
        }

        if self.transform.gate_decimals > 12 {
            return Err(invalid("transform.gate_decimals", "must be at most 12"));
        }

        Ok(())
    }
}

fn positive(setting: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(setting, "must be > 0"))
    }
}

fn invalid(setting: &str, reason: &str) -> Error {
    ConfigError::InvalidValue {
        setting: setting.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
