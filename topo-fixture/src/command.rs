//! Command-line builders for the `zkctl` and `zk` binaries.
//!
//! Each invocation is a typed value rendered to an argument vector only at
//! the point where it is handed to a [`CommandRunner`](crate::CommandRunner).

use std::fmt;
use std::path::PathBuf;

use crate::ports::PortBlock;

/// Single-server ensemble description passed as `-zk.cfg`.
///
/// Renders as `<server_id>@<hostname>:<port>:<port>:<port>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsembleSpec {
    /// ZooKeeper server id (`myid`).
    pub server_id: u32,
    /// Hostname the server advertises.
    pub hostname: String,
    /// Peer, election and client ports, in that order.
    pub ports: PortBlock,
}

impl EnsembleSpec {
    /// Create a spec for server 1 of a single-node ensemble.
    pub fn single(hostname: &str, ports: PortBlock) -> Self {
        Self {
            server_id: 1,
            hostname: hostname.into(),
            ports,
        }
    }

    /// Port clients connect to: the last port of the block.
    pub fn client_port(&self) -> u16 {
        self.ports.last()
    }
}

impl fmt::Display for EnsembleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.server_id, self.hostname)?;
        for port in self.ports.ports() {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

/// Action passed to `zkctl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZkCtlAction {
    /// Create the data directory and start the server.
    Init,
    /// Stop the server, keeping its on-disk state.
    Shutdown,
    /// Stop the server and remove its on-disk state.
    Teardown,
}

impl ZkCtlAction {
    /// Get the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ZkCtlAction::Init => "init",
            ZkCtlAction::Shutdown => "shutdown",
            ZkCtlAction::Teardown => "teardown",
        }
    }

    /// Stop action for the given log retention policy.
    pub fn stop(keep_logs: bool) -> Self {
        if keep_logs {
            ZkCtlAction::Shutdown
        } else {
            ZkCtlAction::Teardown
        }
    }
}

/// One `zkctl` invocation.
#[derive(Debug, Clone)]
pub struct ZkCtl {
    /// Directory for server logs.
    pub log_dir: PathBuf,
    /// Ensemble to act on.
    pub ensemble: EnsembleSpec,
    /// What to do.
    pub action: ZkCtlAction,
}

impl ZkCtl {
    /// Create a new `zkctl` invocation.
    pub fn new(log_dir: impl Into<PathBuf>, ensemble: EnsembleSpec, action: ZkCtlAction) -> Self {
        Self {
            log_dir: log_dir.into(),
            ensemble,
            action,
        }
    }

    /// Build the command arguments.
    ///
    /// Returns args for: `-log_dir <dir> -zk.cfg <spec> <action>`
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "-log_dir".into(),
            self.log_dir.display().to_string(),
            "-zk.cfg".into(),
            self.ensemble.to_string(),
            self.action.as_str().into(),
        ]
    }
}

/// One `zk` data-path invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZkCommand {
    /// `touch [-p] <path>`: create a node.
    Touch {
        /// Node to create.
        path: String,
        /// Create missing parents.
        parents: bool,
    },
    /// `rm [-r] [-f] <target>`: delete a node or a glob of nodes.
    Remove {
        /// Node path or glob.
        target: String,
        /// Delete children too.
        recursive: bool,
        /// Ignore missing nodes.
        force: bool,
    },
}

impl ZkCommand {
    /// `touch -p <path>`.
    pub fn touch(path: &str) -> Self {
        ZkCommand::Touch {
            path: path.into(),
            parents: true,
        }
    }

    /// `rm -rf <target>`.
    pub fn remove_tree(target: &str) -> Self {
        ZkCommand::Remove {
            target: target.into(),
            recursive: true,
            force: true,
        }
    }

    /// `rm -f <target>`.
    pub fn remove(target: &str) -> Self {
        ZkCommand::Remove {
            target: target.into(),
            recursive: false,
            force: true,
        }
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        match self {
            ZkCommand::Touch { path, parents } => {
                let mut args = vec!["touch".to_string()];
                if *parents {
                    args.push("-p".into());
                }
                args.push(path.clone());
                args
            }
            ZkCommand::Remove {
                target,
                recursive,
                force,
            } => {
                let mut args = vec!["rm".to_string()];
                let mut opts = String::new();
                if *recursive {
                    opts.push('r');
                }
                if *force {
                    opts.push('f');
                }
                if !opts.is_empty() {
                    args.push(format!("-{}", opts));
                }
                args.push(target.clone());
                args
            }
        }
    }
}
