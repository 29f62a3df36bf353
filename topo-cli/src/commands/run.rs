//! Run a command against a fresh topology.

use anyhow::{Context, Result};
use std::process::ExitCode;
use zk_topo_fixture::{FixtureConfig, TopoClientContext, TopoServer, ZkTopoServer};

/// Run the run command.
///
/// Teardown always runs once setup has started the ensemble, whatever the
/// command's outcome.
pub async fn run(
    config: FixtureConfig,
    command: &[String],
    add_bad_host: bool,
    wipe: bool,
) -> Result<ExitCode> {
    let mut server = ZkTopoServer::new(config);

    let ctx = match server.setup(add_bad_host).await {
        Ok(ctx) => ctx,
        Err(e) => {
            server.teardown().await;
            return Err(e).context("Failed to set up ZooKeeper topology");
        }
    };

    let outcome = run_command(&ctx, command, &server.flags()).await;

    let wiped = if wipe { server.wipe().await } else { Ok(()) };
    server.teardown().await;

    let status = outcome?;
    wiped.context("Failed to wipe topology data")?;
    Ok(status)
}

async fn run_command(
    ctx: &TopoClientContext,
    command: &[String],
    flags: &[String],
) -> Result<ExitCode> {
    let (program, args) = command.split_first().context("No command given")?;

    let mut child = tokio::process::Command::new(program);
    child.args(args).args(flags);
    ctx.apply(&mut child);

    tracing::info!("Running {} with {}", program, flags.join(" "));
    let status = child
        .status()
        .await
        .with_context(|| format!("Failed to run {}", program))?;

    Ok(match status.code() {
        Some(0) => ExitCode::SUCCESS,
        Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        None => ExitCode::FAILURE,
    })
}
