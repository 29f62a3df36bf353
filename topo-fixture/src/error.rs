//! Error types for the topology fixture.

use std::path::PathBuf;

/// Main error type for fixture operations.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The external binary could not be launched.
    #[error("failed to spawn {}: {source}", .program.display())]
    Spawn {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The external binary exited with a non-zero status.
    #[error("{} {} failed: exit={exit_code}, stderr={stderr}", .program.display(), .args.join(" "))]
    CommandFailed {
        /// Program that was run.
        program: PathBuf,
        /// Arguments it was given.
        args: Vec<String>,
        /// Exit code (-1 if killed by a signal).
        exit_code: i32,
        /// Standard error output.
        stderr: String,
    },

    /// No block of the requested size fits below the port limit.
    #[error("port range exhausted: requested {requested} ports at {next} (limit: {limit})")]
    PortsExhausted {
        /// Number of ports requested.
        requested: u16,
        /// First port that would have been handed out.
        next: u32,
        /// Highest usable port.
        limit: u16,
    },

    /// A port block would be empty or run past port 65535.
    #[error("invalid port block: {count} ports from {base} do not fit below 65536")]
    InvalidPortBlock {
        /// First port of the block.
        base: u16,
        /// Number of ports requested.
        count: u16,
    },

    /// An operation that needs a running ensemble was called before `setup`.
    #[error("topology server not set up")]
    NotSetUp,

    /// `setup` was called while an ensemble from an earlier `setup` is
    /// still running.
    #[error("topology server already set up: {ensemble}")]
    AlreadySetUp {
        /// The running ensemble spec.
        ensemble: String,
    },

    /// The local hostname could not be determined.
    #[error("hostname lookup failed: {0}")]
    Hostname(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Client config serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
