//! Application configuration
//!
//! A small JSON file, every field optional:
//!
//! ```json
//! { "dataDir": "/var/lib/movein", "backend": "sqlite" }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where slots are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Lost when the process exits
    Memory,
    /// One JSON file per slot
    #[default]
    Files,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub backend: Backend,
    /// File name under `data_dir` for the sqlite backend
    pub database_file: String,
    /// Relative to `data_dir`
    pub attachments_dir: String,
    /// Relative to `data_dir`
    pub log_dir: String,
    /// Log file prefix
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./movein-data"),
            backend: Backend::default(),
            database_file: "movein.db".to_string(),
            attachments_dir: "attachments".to_string(),
            log_dir: "logs".to_string(),
            app_name: "MoveIn".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn slots_dir(&self) -> PathBuf {
        self.data_dir.join("slots")
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn attachments_path(&self) -> PathBuf {
        self.data_dir.join(&self.attachments_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("movein.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.backend, Backend::Files);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movein.json");
        fs::write(&path, r#"{ "dataDir": "/srv/movein", "backend": "sqlite" }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.database_path(), PathBuf::from("/srv/movein/movein.db"));
        assert_eq!(config.attachments_path(), PathBuf::from("/srv/movein/attachments"));
        assert_eq!(config.app_name, "MoveIn");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movein.json");
        fs::write(&path, r#"{ "backend": "cloud" }"#).unwrap();

        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }
}
