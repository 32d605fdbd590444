//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tapewarm_tape::TapeParams;

use crate::error::ConfigError;
use crate::validation::{RangeIssue, validate_params};

/// A named set of tape machine controls.
///
/// Presets are stored as TOML. Controls missing from the `[params]` table
/// take their defaults; unknown keys are rejected.
///
/// # TOML Format
///
/// ```toml
/// name = "Warm Ferric"
/// description = "Slow ferric tape pushed into saturation"
/// sample_rate = 48000
///
/// [params]
/// saturation = 75.0
/// warmth = 70.0
/// speed = "7.5ips"
/// formulation = "ferric"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TapePreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Rate the preset was voiced at (defaults to 48000). Informational;
    /// rendering uses the rate of the audio being processed.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Control values as written in the file, not yet clamped.
    #[serde(default)]
    pub params: TapeParams,
}

fn default_sample_rate() -> u32 {
    48000
}

impl TapePreset {
    /// Create a preset holding the default controls.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            params: TapeParams::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Replace the controls.
    pub fn with_params(mut self, params: TapeParams) -> Self {
        self.params = params;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating missing parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Controls that lie outside their ranges.
    pub fn validate(&self) -> Vec<RangeIssue> {
        validate_params(&self.params)
    }

    /// Controls ready for a machine, every value clamped to its range.
    pub fn machine_params(&self) -> TapeParams {
        self.params.clamped()
    }
}

impl Default for TapePreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
