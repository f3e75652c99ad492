use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use timer_core::{Settings, SettingsError};

use crate::alerts::AlertConfig;

const FILE_NAME: &str = "settings.toml";

/// Everything remembered between runs. Timer progress is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredPrefs {
    pub sound_enabled: bool,
    pub pomodoro: Settings,
    pub alerts: AlertConfig,
}

impl Default for StoredPrefs {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            pomodoro: Settings::default(),
            alerts: AlertConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine a config directory")]
    NoConfigDir,
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid pomodoro settings in {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        source: SettingsError,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self, StorageError> {
        ProjectDirs::from("com", "pomodoro", "pomodoro")
            .map(|dirs| Self::new(dirs.config_dir().join(FILE_NAME)))
            .ok_or(StorageError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is not an error; it just means stock defaults.
    pub fn load(&self) -> Result<StoredPrefs, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", self.path.display());
                return Ok(StoredPrefs::default());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let prefs: StoredPrefs = toml::from_str(&text).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })?;
        prefs.pomodoro.validate().map_err(|source| StorageError::Invalid {
            path: self.path.clone(),
            source,
        })?;
        Ok(prefs)
    }

    pub fn save(&self, prefs: &StoredPrefs) -> Result<(), StorageError> {
        let text = toml::to_string_pretty(prefs)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|source| StorageError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved settings to {}", self.path.display());
        Ok(())
    }
}
