//! Viewer options with TOML preset support.
//!
//! Outline tunables, camera framing, and the demo scene's look are grouped
//! into sections. Every section uses `#[serde(default)]`, so a preset may
//! override a single field and inherit the rest.

mod camera;
mod display;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, InklineError};
use crate::renderer::postprocess::OutlineSettings;

/// Top-level options container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Outline pass tunables.
    pub outline: OutlineSettings,
    /// Camera projection and framing.
    pub camera: CameraOptions,
    /// Demo scene look.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing every option.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.outline.validate()?;
        self.camera.validate()?;
        self.display.validate()
    }

    /// Load and validate options from a TOML file. Missing fields use
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::Io`] if the file cannot be read,
    /// [`InklineError::OptionsParse`] if it is not valid TOML, and
    /// [`InklineError::Config`] if a value is out of range.
    pub fn load(path: &Path) -> Result<Self, InklineError> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| InklineError::OptionsParse(e.to_string()))?;
        options.validate()?;
        log::info!("options: loaded {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`InklineError::OptionsParse`] if serialization fails and
    /// [`InklineError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), InklineError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| InklineError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        log::info!("options: saved {}", path.display());
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
