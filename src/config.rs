use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::task::{Language, PomodoroLength};

pub const CONFIG_FILE: &str = "pomotask.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage root. Relative paths resolve against the working directory.
    pub data_dir: PathBuf,
    /// Defaults to `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,
    pub default_duration: PomodoroLength,
    pub default_language: Language,
    pub tick_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            log_dir: None,
            default_duration: PomodoroLength::default(),
            default_language: Language::default(),
            tick_millis: 1000,
        }
    }
}

impl Config {
    /// Read `path`, or fall back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&data).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write a default config to `path`. Returns `false` without touching
    /// anything if a file is already there.
    pub fn init(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let data = serde_json::to_string_pretty(&Self::default()).map_err(|source| {
            Error::Config {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, data).map_err(|e| Error::io(path, e))?;
        Ok(true)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }
}
