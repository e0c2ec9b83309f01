use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PartitionError, Result};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "SPLIT_DATASET_CONFIG";

/// Seed shared by both split stages unless configured otherwise
pub const DEFAULT_SEED: u64 = 7;

pub const DEFAULT_ANNOTATION_FILE_NAME: &str = "faces.csv";

/// Partitioning configuration.
///
/// Every field is optional in the JSON file; missing fields take their
/// default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Seed for the group shuffle
    pub seed: u64,

    /// File name of the annotation table written into each partition
    pub annotation_file_name: String,

    /// Directory for log files; no log file is written when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            annotation_file_name: DEFAULT_ANNOTATION_FILE_NAME.to_string(),
            log_dir: None,
        }
    }
}

impl PartitionConfig {
    /// Path of the configuration file: `$SPLIT_DATASET_CONFIG`, or
    /// `config.json` in the platform config directory
    pub fn get_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "split-dataset").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load the configuration, or defaults when no file exists.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        Self::load_with_source().map(|(config, _)| config)
    }

    /// Like [`PartitionConfig::load`], also returning the file the
    /// configuration came from (`None` when defaults were used)
    pub fn load_with_source() -> Result<(Self, Option<PathBuf>)> {
        let Some(path) = Self::get_config_path() else {
            return Ok((Self::default(), None));
        };
        match Self::load_from(&path)? {
            Some(config) => Ok((config, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Load from `path`; `Ok(None)` when the file does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PartitionError::io(path, e)),
        };

        let config = serde_json::from_str(&contents).map_err(|source| PartitionError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PartitionConfig::default();
        assert_eq!(config.seed, 7);
        assert_eq!(config.annotation_file_name, "faces.csv");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "seed": 42 }"#).unwrap();

        let config = PartitionConfig::load_from(&path).unwrap().unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.annotation_file_name, "faces.csv");
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PartitionConfig::load_from(&dir.path().join("absent.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ seed: ").unwrap();

        let err = PartitionConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, PartitionError::Config { .. }));
    }

    #[test]
    fn test_load_with_source_reports_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "seed": 99 }"#).unwrap();

        std::env::set_var(CONFIG_ENV_VAR, &path);
        let loaded = PartitionConfig::load_with_source();
        std::env::set_var(CONFIG_ENV_VAR, dir.path().join("absent.json"));
        let defaults = PartitionConfig::load_with_source();
        std::env::remove_var(CONFIG_ENV_VAR);

        let (config, source) = loaded.unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(source, Some(path));

        let (config, source) = defaults.unwrap();
        assert_eq!(config, PartitionConfig::default());
        assert!(source.is_none());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = PartitionConfig {
            seed: 1234,
            annotation_file_name: "boxes.csv".to_string(),
            log_dir: Some(PathBuf::from("logs")),
        };

        let json = serde_json::to_string(&config).unwrap();
        let loaded: PartitionConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, config);
    }
}
