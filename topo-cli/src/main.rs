//! # zk-topo
//!
//! Stand up a throwaway ZooKeeper topology around a test command.
//!
//! ## Commands
//!
//! - `flags`: Print the flags that select the ZooKeeper topology backend
//! - `cells`: Print the client config setup would write
//! - `run`: Set up, run a command against the topology, wipe, tear down
//!
//! ## Example
//!
//! ```bash
//! # Run an integration test binary against a fresh ensemble
//! zk-topo --port-start 16000 run -- ./target/debug/topo_test
//!
//! # Keep ZooKeeper's on-disk state for post-mortem
//! zk-topo --keep-logs run --add-bad-host -- ./topo_failover_test
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;

use commands::{cells, flags, run};

/// Stand up a throwaway ZooKeeper topology around a test command.
#[derive(Parser, Debug)]
#[command(name = "zk-topo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML file with fixture settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Stop ZooKeeper with `shutdown` and keep its state instead of `teardown`
    #[arg(long, global = true)]
    keep_logs: bool,

    /// First port to reserve
    #[arg(long, global = true)]
    port_start: Option<u16>,

    /// Directory for the client config file
    #[arg(long, global = true)]
    tmp_root: Option<PathBuf>,

    /// Directory for ZooKeeper logs
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Hostname for the ensemble spec (default: system hostname)
    #[arg(long, global = true)]
    hostname: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the topology backend flags, one per line
    Flags,

    /// Print the client config JSON setup would write
    Cells {
        /// Append an unreachable endpoint to test_ca
        #[arg(long)]
        add_bad_host: bool,

        /// Ensemble client port (default: port start + 2)
        #[arg(long)]
        client_port: Option<u16>,

        /// First zkocc port (default: port start + 3)
        #[arg(long)]
        zkocc_port: Option<u16>,
    },

    /// Set up ZooKeeper, run a command against it, then tear it down
    Run {
        /// Append an unreachable endpoint to test_ca
        #[arg(long)]
        add_bad_host: bool,

        /// Leave test data in place after the command exits
        #[arg(long)]
        no_wipe: bool,

        /// Command to run, with the topology flags appended
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let fixture_config = config::load(
        cli.config.as_deref(),
        config::Overrides {
            keep_logs: cli.keep_logs,
            port_start: cli.port_start,
            tmp_root: cli.tmp_root,
            log_dir: cli.log_dir,
            hostname: cli.hostname,
        },
    )?;

    match cli.command {
        Commands::Flags => {
            flags::run();
        }
        Commands::Cells {
            add_bad_host,
            client_port,
            zkocc_port,
        } => {
            cells::run(&fixture_config, client_port, zkocc_port, add_bad_host)?;
        }
        Commands::Run {
            add_bad_host,
            no_wipe,
            command,
        } => {
            return run::run(fixture_config, &command, add_bad_host, !no_wipe).await;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
