use crate::core::io::writer::{JsonWriter, MAX_INDENT, WriterMode};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Doubles carry at most 17 significant decimal digits.
const MAX_DECIMAL_PLACES: usize = 17;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Options of one save pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaverConfig {
    pub mode: WriterMode,
    /// Spaces per nesting level in pretty mode.
    pub indent: usize,
    /// Round coordinates and other floats to this many decimals.
    pub max_decimal_places: Option<usize>,
    /// Write CIP descriptors on atoms as `stereoLabel`.
    pub add_stereo_desc: bool,
}

impl Default for SaverConfig {
    fn default() -> Self {
        Self {
            mode: WriterMode::Compact,
            indent: 4,
            max_decimal_places: None,
            add_stereo_desc: true,
        }
    }
}

impl SaverConfig {
    pub fn pretty() -> Self {
        Self {
            mode: WriterMode::Pretty,
            ..Self::default()
        }
    }

    /// Loads a config from a TOML file. Missing keys take their defaults,
    /// unknown keys are rejected.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: SaverConfig = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indent > MAX_INDENT {
            return Err(ConfigError::InvalidParameter {
                name: "indent",
                reason: format!("{} exceeds the maximum of {}", self.indent, MAX_INDENT),
            });
        }
        if let Some(places) = self.max_decimal_places {
            if places > MAX_DECIMAL_PLACES {
                return Err(ConfigError::InvalidParameter {
                    name: "max_decimal_places",
                    reason: format!("{} exceeds the maximum of {}", places, MAX_DECIMAL_PLACES),
                });
            }
        }
        Ok(())
    }

    /// Creates a writer over `out` configured for this pass.
    pub fn writer<W: Write>(&self, out: W) -> JsonWriter<W> {
        let mut writer = JsonWriter::with_mode(self.mode, self.indent, Some(out));
        writer.set_max_decimal_places(self.max_decimal_places);
        writer
    }
}

#[derive(Default)]
pub struct SaverConfigBuilder {
    mode: Option<WriterMode>,
    indent: Option<usize>,
    max_decimal_places: Option<usize>,
    add_stereo_desc: Option<bool>,
}

impl SaverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: WriterMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }
    pub fn max_decimal_places(mut self, places: usize) -> Self {
        self.max_decimal_places = Some(places);
        self
    }
    pub fn add_stereo_desc(mut self, enabled: bool) -> Self {
        self.add_stereo_desc = Some(enabled);
        self
    }

    /// Builds the config. The output mode must be chosen explicitly; every other
    /// option falls back to its default.
    pub fn build(self) -> Result<SaverConfig, ConfigError> {
        let defaults = SaverConfig::default();
        let config = SaverConfig {
            mode: self.mode.ok_or(ConfigError::MissingParameter("mode"))?,
            indent: self.indent.unwrap_or(defaults.indent),
            max_decimal_places: self.max_decimal_places.or(defaults.max_decimal_places),
            add_stereo_desc: self.add_stereo_desc.unwrap_or(defaults.add_stereo_desc),
        };
        config.validate()?;
        Ok(config)
    }
}
