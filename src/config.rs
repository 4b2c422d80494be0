use std::fs;
use std::path::{Path, PathBuf};

use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::common::error::{QRError, QRResult};
use crate::common::metadata::ECLevel;
use crate::compose::Anchor;

// Persisted settings
//------------------------------------------------------------------------------

/// Settings persisted between runs as a small JSON file. Missing keys fall
/// back to their defaults; a missing or malformed file falls back entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    #[serde(default = "default_back_color")]
    pub back_color: String,
    #[serde(default = "default_error_level")]
    pub error_level: ECLevel,
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    #[serde(default)]
    pub use_logo: bool,
    #[serde(default = "default_logo_position")]
    pub logo_position: Anchor,
}

fn default_fill_color() -> String {
    "black".to_string()
}

fn default_back_color() -> String {
    "white".to_string()
}

fn default_error_level() -> ECLevel {
    ECLevel::H
}

fn default_logo_position() -> Anchor {
    Anchor::Center
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fill_color: default_fill_color(),
            back_color: default_back_color(),
            error_level: default_error_level(),
            logo_path: None,
            use_logo: false,
            logo_position: default_logo_position(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Config {
    /// Loads settings, recovering to defaults when the file is missing or
    /// malformed. Load failures are logged, never surfaced.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                if path.exists() {
                    warn!(path = %path.display(), error = %e, "could not read settings, using defaults");
                }
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed settings, using defaults");
                Self::default()
            }
        }
    }

    /// Writes settings atomically: the JSON goes to a sibling temp file which
    /// then replaces the original, so a failed write leaves the previous
    /// settings intact.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn fill(&self) -> QRResult<Rgba<u8>> {
        parse_color(&self.fill_color)
    }

    pub fn back(&self) -> QRResult<Rgba<u8>> {
        parse_color(&self.back_color)
    }
}

// Color parsing
//------------------------------------------------------------------------------

/// Parses `#RRGGBB`, `#RRGGBBAA` or a basic color name.
pub fn parse_color(s: &str) -> QRResult<Rgba<u8>> {
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 && hex.len() != 8 {
            return Err(QRError::InvalidColor);
        }
        let parse = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| QRError::InvalidColor)
        };
        let (r, g, b) = (parse(0)?, parse(2)?, parse(4)?);
        let a = if hex.len() == 8 { parse(6)? } else { 255 };
        return Ok(Rgba([r, g, b, a]));
    }

    let rgb = match s.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        _ => return Err(QRError::InvalidColor),
    };
    Ok(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}
