//! Configuration loading and data directory resolution
//!
//! Settings come from a TOML file with environment-variable and
//! command-line overrides applied by the caller. Resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default HTTP port for verdia-api
pub const DEFAULT_PORT: u16 = 5731;

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP listen port (default 5731)
    pub port: Option<u16>,
    /// Path to the SQLite database file
    pub database_path: Option<PathBuf>,
    /// Research provider settings
    #[serde(default)]
    pub research: ResearchConfig,
}

/// External research provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// API key for the summarization endpoint
    pub summary_api_key: Option<String>,
    /// Text-generation model name
    pub summary_model: Option<String>,
    /// Base URL for the evidence search API
    pub evidence_base_url: Option<String>,
    /// Base URL for the summarization API
    pub summary_base_url: Option<String>,
    /// Per-call timeout for provider requests, in seconds
    pub timeout_secs: Option<u64>,
}

/// Default configuration file path for the platform
/// (e.g. `~/.config/verdia/verdia-api.toml` on Linux)
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("verdia").join("verdia-api.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// OS-dependent default data directory (holds the SQLite database)
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("verdia"))
        .unwrap_or_else(|| PathBuf::from("./verdia_data"))
}

/// Load TOML configuration from `path`, or from the platform default path.
///
/// A missing file is not an error: the service runs with compiled defaults
/// and environment overrides. A file that exists but fails to parse is a
/// configuration error.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write TOML configuration to `path`, creating parent directories
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolve the HTTP listen port: CLI > TOML > default
pub fn resolve_port(cli_arg: Option<u16>, config: &TomlConfig) -> u16 {
    cli_arg.or(config.port).unwrap_or(DEFAULT_PORT)
}

/// Resolve the database path: CLI > env > TOML > default data dir
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("VERDIA_DATABASE_PATH") {
        return PathBuf::from(path);
    }
    if let Some(path) = &config.database_path {
        return path.clone();
    }
    default_data_dir().join("verdia.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.toml");

        let config = load_toml_config(Some(&path)).unwrap();
        assert!(config.port.is_none());
        assert!(config.research.summary_api_key.is_none());
    }

    #[test]
    fn config_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("verdia-api.toml");

        let config = TomlConfig {
            port: Some(8080),
            database_path: Some(PathBuf::from("/tmp/verdia.db")),
            research: ResearchConfig {
                summary_api_key: Some("test-key".to_string()),
                summary_model: None,
                evidence_base_url: None,
                summary_base_url: None,
                timeout_secs: Some(10),
            },
        };

        write_toml_config(&config, &path).unwrap();
        let loaded = load_toml_config(Some(&path)).unwrap();

        assert_eq!(loaded.port, Some(8080));
        assert_eq!(loaded.database_path, Some(PathBuf::from("/tmp/verdia.db")));
        assert_eq!(loaded.research.summary_api_key, Some("test-key".to_string()));
        assert_eq!(loaded.research.timeout_secs, Some(10));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "port = \"not a number").unwrap();

        assert!(load_toml_config(Some(&path)).is_err());
    }

    #[test]
    fn port_resolution_priority() {
        let config = TomlConfig {
            port: Some(9000),
            ..Default::default()
        };
        assert_eq!(resolve_port(Some(7000), &config), 7000);
        assert_eq!(resolve_port(None, &config), 9000);
        assert_eq!(resolve_port(None, &TomlConfig::default()), DEFAULT_PORT);
    }
}
