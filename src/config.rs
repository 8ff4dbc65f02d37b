//! Configuration: which backend backs the store, and where it lives.
//!
//! One explicit struct, constructed once at process start and passed by
//! reference into whichever component needs it. Written by `init`, read
//! by `import` and `query`. Persisted as TOML under the user config
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TermqueryError;
use crate::storage::BackendKind;

/// Persisted store location and backend choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which storage strategy backs the store.
    pub kind: BackendKind,
    /// Filesystem path of the store.
    pub path: PathBuf,
}

impl StoreConfig {
    /// Default configuration file location:
    /// `<user config dir>/termquery/config.toml`.
    ///
    /// # Errors
    /// Fails when the platform exposes no user config directory.
    pub fn default_path() -> Result<PathBuf, TermqueryError> {
        let base = dirs::config_dir()
            .ok_or_else(|| TermqueryError::config("could not determine user config directory"))?;
        Ok(base.join("termquery").join("config.toml"))
    }

    /// Load the configuration from a file.
    ///
    /// # Errors
    /// Fails when the file is missing or not valid TOML of this shape.
    pub fn load(path: &Path) -> Result<Self, TermqueryError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            TermqueryError::config(format!(
                "could not read config {}: {e} (run 'termquery init' first?)",
                path.display()
            ))
        })?;
        toml::from_str(&raw).map_err(|e| {
            TermqueryError::config(format!("could not parse config {}: {e}", path.display()))
        })
    }

    /// Write the configuration to a file, creating parent directories.
    ///
    /// # Errors
    /// Fails on I/O or serialization errors.
    pub fn save(&self, path: &Path) -> Result<(), TermqueryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TermqueryError::config(format!(
                    "could not create config directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let raw = toml::to_string_pretty(self)
            .map_err(|e| TermqueryError::config(format!("could not serialize config: {e}")))?;
        fs::write(path, raw).map_err(|e| {
            TermqueryError::config(format!("could not write config {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let config = StoreConfig {
            kind: BackendKind::Lazy,
            path: PathBuf::from("/tmp/glossary"),
        };
        config.save(&config_path).unwrap();

        let loaded = StoreConfig::load(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "kind = \"shelve\"\n").unwrap();

        assert!(StoreConfig::load(&path).is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let config = StoreConfig {
            kind: BackendKind::Snapshot,
            path: PathBuf::from("store.tq"),
        };
        let raw = toml::to_string(&config).unwrap();
        assert!(raw.contains("kind = \"snapshot\""));
    }
}
