//! JSON config file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document on disk. Missing
//! fields take their defaults, so a file only needs the keys it overrides:
//!
//! ```json
//! { "port": "COM17", "warning_threshold_c": 28.0 }
//! ```

use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::ConsoleConfig;
use crate::error::ConfigError;

/// Config stored as JSON at `path`.
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<ConsoleConfig, ConfigError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(self.path.display().to_string())
            } else {
                ConfigError::Io(e)
            }
        })?;
        let config: ConsoleConfig = serde_json::from_str(&text)?;
        config.validate()?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &ConsoleConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, text)?;
        info!("Config saved to {}", self.path.display());
        Ok(())
    }
}
