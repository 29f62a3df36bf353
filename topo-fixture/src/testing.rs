//! Test doubles for the fixture's collaborators.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::FixtureError;
use crate::ports::{PortAllocator, PortBlock};
use crate::runner::{CommandRunner, RunOutput};

/// One captured command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program that would have been spawned.
    pub program: PathBuf,
    /// Its arguments.
    pub args: Vec<String>,
    /// Environment set on the call, in the order given.
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    /// Value the call set for `key`, if any.
    pub fn env(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Program and arguments joined with spaces.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// A [`CommandRunner`] that records every call instead of spawning anything.
///
/// Calls succeed with empty output unless their command line contains a
/// substring registered with [`RecordingRunner::fail_matching`].
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    failures: Mutex<Vec<String>>,
}

impl RecordingRunner {
    /// Create a runner with no scripted failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every command whose line contains `pattern` exit with status 1.
    pub fn fail_matching(&self, pattern: &str) {
        self.lock_failures().push(pattern.into());
    }

    /// Everything run so far, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.lock_calls().clone()
    }

    /// Command lines run so far, in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.lock_calls().iter().map(Invocation::command_line).collect()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.lock_calls().clear();
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<Invocation>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_failures(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.failures.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<RunOutput, FixtureError> {
        let invocation = Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            envs: envs.to_vec(),
        };
        let line = invocation.command_line();
        self.lock_calls().push(invocation);

        if self.lock_failures().iter().any(|p| line.contains(p.as_str())) {
            return Ok(RunOutput {
                stderr: format!("scripted failure: {}", line),
                exit_code: 1,
                ..Default::default()
            });
        }
        Ok(RunOutput::default())
    }
}

/// A [`PortAllocator`] that hands out a fixed list of blocks, in order.
#[derive(Debug, Clone)]
pub struct FixedPorts {
    blocks: std::collections::VecDeque<PortBlock>,
}

impl FixedPorts {
    /// Hand out the bases of `blocks` in order, then fail.
    pub fn new(blocks: impl IntoIterator<Item = PortBlock>) -> Self {
        Self {
            blocks: blocks.into_iter().collect(),
        }
    }
}

impl PortAllocator for FixedPorts {
    fn reserve(&mut self, count: u16) -> Result<PortBlock, FixtureError> {
        match self.blocks.pop_front() {
            Some(block) => PortBlock::try_new(block.base(), count),
            None => Err(FixtureError::PortsExhausted {
                requested: count,
                next: 0,
                limit: 0,
            }),
        }
    }
}
