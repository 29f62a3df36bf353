//! Fixture settings for zk-topo.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use zk_topo_fixture::FixtureConfig;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Force `shutdown` instead of `teardown`.
    pub keep_logs: bool,
    /// First port to reserve.
    pub port_start: Option<u16>,
    /// Client config directory.
    pub tmp_root: Option<PathBuf>,
    /// ZooKeeper log directory.
    pub log_dir: Option<PathBuf>,
    /// Ensemble hostname.
    pub hostname: Option<String>,
}

/// Defaults, then the config file if given, then overrides.
pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<FixtureConfig> {
    let mut config = match path {
        Some(path) => FixtureConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => FixtureConfig::default(),
    };

    if overrides.keep_logs {
        config.keep_logs = true;
    }
    if let Some(port) = overrides.port_start {
        config.port_start = port;
    }
    if let Some(dir) = overrides.tmp_root {
        config.tmp_root = dir;
    }
    if let Some(dir) = overrides.log_dir {
        config.log_dir = dir;
    }
    if let Some(name) = overrides.hostname {
        config.hostname = Some(name);
    }

    Ok(config)
}
