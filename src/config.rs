use crate::error::ConfigError;
use crate::vocabulary::DEFAULT_TAGS;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Folder shown on the last run, empty if none.
    pub last_folder: String,
    pub tags: Vec<String>,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub max_lines: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_folder: String::new(),
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "replay_names.log".to_string(),
            max_lines: 10000,
        }
    }
}

impl Config {
    /// Read `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {}", path.display());
        let config_str = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut config: Config = toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.tags.is_empty() {
            config.tags = Self::default().tags;
        }
        info!("Config loaded successfully");
        Ok(config)
    }

    /// [`Config::load`], logging any error and falling back to defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            error!("{}; using defaults", e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str).map_err(io_err)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn last_folder(&self) -> Option<PathBuf> {
        if self.last_folder.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.last_folder))
        }
    }
}
