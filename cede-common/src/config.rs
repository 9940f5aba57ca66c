//! Configuration loading and database path resolution

use crate::params::{AnalyzerParams, StoreParams, TransitionParams};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Engine configuration loaded from TOML
///
/// Every section is optional; missing sections take compiled defaults so an
/// empty (or absent) config file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the manifest database file
    pub database_path: Option<PathBuf>,

    /// Analyzer tuning parameters
    pub analyzer: AnalyzerParams,

    /// Transition policy tuning parameters
    pub transitions: TransitionParams,

    /// Manifest store tuning parameters
    pub store: StoreParams,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Resolve the manifest database path, priority order:
    /// 1. Explicit caller argument
    /// 2. `CEDE_DATABASE` environment variable
    /// 3. `database_path` from the loaded config
    /// 4. OS-dependent default (`<data dir>/cede/manifests.db`)
    pub fn resolve_database_path(&self, cli_arg: Option<&str>) -> PathBuf {
        if let Some(path) = cli_arg {
            return PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CEDE_DATABASE") {
            return PathBuf::from(path);
        }
        if let Some(path) = &self.database_path {
            return path.clone();
        }
        default_database_path()
    }
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cede")
        .join("manifests.db")
}

/// Locate the default config file (`<config dir>/cede/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cede").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_takes_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.analyzer.trim_buffer, 0.15);
    }

    #[test]
    fn test_partial_config() {
        let config: EngineConfig = toml::from_str(
            r#"
            database_path = "/tmp/cede-test.db"

            [transitions]
            crossfade_duration = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(
            config.database_path.as_deref(),
            Some(Path::new("/tmp/cede-test.db"))
        );
        assert_eq!(config.transitions.crossfade_duration, 0.75);
        // Untouched sections keep defaults
        assert_eq!(config.transitions.tension_high, 0.7);
        assert_eq!(config.store.keyframe_tolerance, 0.5);
    }

    #[test]
    fn test_explicit_arg_wins() {
        let config = EngineConfig {
            database_path: Some(PathBuf::from("/from/config.db")),
            ..Default::default()
        };
        let resolved = config.resolve_database_path(Some("/from/arg.db"));
        assert_eq!(resolved, PathBuf::from("/from/arg.db"));
    }

    #[test]
    fn test_config_file_fallback() {
        let config = EngineConfig {
            database_path: Some(PathBuf::from("/from/config.db")),
            ..Default::default()
        };
        // No arg; env var may be unset in the test environment
        if std::env::var("CEDE_DATABASE").is_err() {
            assert_eq!(
                config.resolve_database_path(None),
                PathBuf::from("/from/config.db")
            );
        }
    }

    #[test]
    fn test_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = EngineConfig {
            database_path: Some(PathBuf::from("/tmp/m.db")),
            ..Default::default()
        };
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
