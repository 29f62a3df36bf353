//! Client-side view of a running topology fixture.

use std::path::{Path, PathBuf};

/// Environment variable topology clients read the config path from.
pub const ZK_CLIENT_CONFIG_ENV: &str = "ZK_CLIENT_CONFIG";

/// Everything a system-under-test needs to reach the fixture's ensemble.
///
/// Returned from setup and handed to whatever builds the client. The binding
/// is applied per child process; the fixture never mutates its own
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopoClientContext {
    config_path: PathBuf,
}

impl TopoClientContext {
    /// Create a context for a written client config.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Path of the JSON client config.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Name of the environment variable clients read.
    pub fn env_var(&self) -> &'static str {
        ZK_CLIENT_CONFIG_ENV
    }

    /// `(name, value)` pair for the client config binding.
    pub fn env_pair(&self) -> (&'static str, String) {
        (ZK_CLIENT_CONFIG_ENV, self.config_path.display().to_string())
    }

    /// Set the client config binding on a command about to be spawned.
    pub fn apply<'a>(
        &self,
        command: &'a mut tokio::process::Command,
    ) -> &'a mut tokio::process::Command {
        command.env(ZK_CLIENT_CONFIG_ENV, &self.config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_pair_uses_config_path() {
        let ctx = TopoClientContext::new("/tmp/vttmp/test-zk-client-conf.json");
        assert_eq!(ctx.env_var(), "ZK_CLIENT_CONFIG");
        assert_eq!(
            ctx.env_pair(),
            (
                "ZK_CLIENT_CONFIG",
                "/tmp/vttmp/test-zk-client-conf.json".to_string()
            )
        );
    }

    #[tokio::test]
    async fn apply_sets_child_env() {
        let ctx = TopoClientContext::new("/tmp/some/conf.json");
        let mut cmd = tokio::process::Command::new("sh");
        cmd.args(["-c", "printf %s \"$ZK_CLIENT_CONFIG\""]);
        let output = ctx.apply(&mut cmd).output().await.unwrap();

        assert_eq!(String::from_utf8_lossy(&output.stdout), "/tmp/some/conf.json");
    }
}
