//! Configuration loading for the topology fixture.
//!
//! Configuration is loaded from a TOML file; every field has a default, so an
//! empty file (or [`FixtureConfig::default`]) is a working local setup.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixture configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    /// Ensemble-control binary (default: `zkctl`).
    #[serde(default = "default_zkctl_binary")]
    pub zkctl_binary: PathBuf,
    /// Data-path binary (default: `zk`).
    #[serde(default = "default_zk_binary")]
    pub zk_binary: PathBuf,
    /// Directory passed to `zkctl -log_dir` (default: `<tmp>/vtlogroot`).
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Directory the client config file is written to (default: `<tmp>/vttmp`).
    #[serde(default = "default_tmp_root")]
    pub tmp_root: PathBuf,
    /// First port handed out by the sequential allocator (default: 6700).
    #[serde(default = "default_port_start")]
    pub port_start: u16,
    /// Highest port the sequential allocator may hand out (default: 65535).
    #[serde(default = "default_port_limit")]
    pub port_limit: u16,
    /// Path prefix for every znode the fixture touches (default: `/zk`).
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Host written into cell endpoint strings (default: `localhost`).
    #[serde(default = "default_client_host")]
    pub client_host: String,
    /// Hostname for the ensemble spec. Looked up from the system when unset.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Stop the ensemble with `shutdown` and keep its on-disk state, instead
    /// of removing it with `teardown` (default: false).
    #[serde(default)]
    pub keep_logs: bool,
}

// Default value functions
fn default_zkctl_binary() -> PathBuf {
    PathBuf::from("zkctl")
}

fn default_zk_binary() -> PathBuf {
    PathBuf::from("zk")
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("vtlogroot")
}

fn default_tmp_root() -> PathBuf {
    std::env::temp_dir().join("vttmp")
}

fn default_port_start() -> u16 {
    6700
}

fn default_port_limit() -> u16 {
    u16::MAX
}

fn default_namespace() -> String {
    "/zk".to_string()
}

fn default_client_host() -> String {
    "localhost".to_string()
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            zkctl_binary: default_zkctl_binary(),
            zk_binary: default_zk_binary(),
            log_dir: default_log_dir(),
            tmp_root: default_tmp_root(),
            port_start: default_port_start(),
            port_limit: default_port_limit(),
            namespace: default_namespace(),
            client_host: default_client_host(),
            hostname: None,
            keep_logs: false,
        }
    }
}

impl FixtureConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Absolute znode path for `relative` under the configured namespace.
    pub fn znode(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.namespace.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FixtureConfig::default();
        assert_eq!(config.zkctl_binary, PathBuf::from("zkctl"));
        assert_eq!(config.zk_binary, PathBuf::from("zk"));
        assert_eq!(config.port_start, 6700);
        assert_eq!(config.namespace, "/zk");
        assert_eq!(config.client_host, "localhost");
        assert!(config.hostname.is_none());
        assert!(!config.keep_logs);
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
zkctl_binary = "/opt/vt/bin/zkctl"
zk_binary = "/opt/vt/bin/zk"
log_dir = "/var/tmp/vtlogs"
tmp_root = "/var/tmp/vttmp"
port_start = 16000
port_limit = 16100
hostname = "ci-runner-3"
keep_logs = true
"#;

        let config: FixtureConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.zkctl_binary, PathBuf::from("/opt/vt/bin/zkctl"));
        assert_eq!(config.zk_binary, PathBuf::from("/opt/vt/bin/zk"));
        assert_eq!(config.log_dir, PathBuf::from("/var/tmp/vtlogs"));
        assert_eq!(config.tmp_root, PathBuf::from("/var/tmp/vttmp"));
        assert_eq!(config.port_start, 16000);
        assert_eq!(config.port_limit, 16100);
        assert_eq!(config.hostname.as_deref(), Some("ci-runner-3"));
        assert!(config.keep_logs);
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let config: FixtureConfig = toml::from_str("").unwrap();
        assert_eq!(config.port_start, 6700);
        assert_eq!(config.port_limit, u16::MAX);
        assert_eq!(config.namespace, "/zk");
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = FixtureConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn from_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "port_start = \"not a number\"").unwrap();
        let err = FixtureConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn znode_joins_namespace() {
        let mut config = FixtureConfig::default();
        assert_eq!(config.znode("test_nj/vt"), "/zk/test_nj/vt");
        assert_eq!(config.znode("/global/vt/*"), "/zk/global/vt/*");

        config.namespace = "/zk/".into();
        assert_eq!(config.znode("test_ca/vt"), "/zk/test_ca/vt");
    }
}
