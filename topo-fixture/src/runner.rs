//! Subprocess execution.
//!
//! [`ProcessRunner`] shells out with `tokio::process::Command`. The fixture
//! only talks to a [`CommandRunner`], so tests can record invocations instead
//! (see [`RecordingRunner`](crate::testing::RecordingRunner)).

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::FixtureError;

/// Result of running an external command.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
    /// Exit code (0 = success, -1 if killed by a signal).
    pub exit_code: i32,
}

impl RunOutput {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// `envs` is set on the child on top of whatever the runner itself
    /// passes. Does NOT fail on non-zero exit; use `run_ok` for that.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<RunOutput, FixtureError>;

    /// Run a command, failing on non-zero exit.
    async fn run_ok(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<RunOutput, FixtureError> {
        let output = self.run(program, args, envs).await?;
        if !output.success() {
            return Err(FixtureError::CommandFailed {
                program: program.to_path_buf(),
                args: args.to_vec(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim_end().to_string(),
            });
        }
        Ok(output)
    }
}

/// Runs commands as local child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    envs: Vec<(String, String)>,
}

impl ProcessRunner {
    /// Create a runner that inherits this process's environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an extra environment variable on every spawned command.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<RunOutput, FixtureError> {
        tracing::debug!("Running: {} {}", program.display(), args.join(" "));

        let output = tokio::process::Command::new(program)
            .args(args)
            .envs(self.envs.iter().chain(envs).map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| FixtureError::Spawn {
                program: PathBuf::from(program),
                source,
            })?;

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
