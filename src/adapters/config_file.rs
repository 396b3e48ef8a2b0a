//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document. A missing file
//! means first run and yields defaults; a file that does not parse or
//! fails validation is rejected, never patched up.

use std::path::{Path, PathBuf};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::GreenhouseConfig;

pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigStore {
    fn load(&self) -> Result<GreenhouseConfig, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!(
                    "No config at {}, using defaults",
                    self.path.display()
                );
                return Ok(GreenhouseConfig::default());
            }
            Err(_) => return Err(ConfigError::IoError),
        };
        let config: GreenhouseConfig =
            serde_json::from_str(&text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        log::info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &GreenhouseConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::IoError)?;
        std::fs::write(&self.path, text).map_err(|_| ConfigError::IoError)
    }
}
