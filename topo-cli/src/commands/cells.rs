//! Print the client config without starting anything.

use anyhow::{Context, Result};
use zk_topo_fixture::{CellMap, FixtureConfig, PortBlock};

/// Cell map for the given ports, defaulting to the first two blocks a fresh
/// sequential allocator would hand out.
pub fn preview(
    config: &FixtureConfig,
    client_port: Option<u16>,
    zkocc_port: Option<u16>,
    add_bad_host: bool,
) -> Result<CellMap> {
    let client_port = match client_port {
        Some(port) => port,
        None => PortBlock::try_new(config.port_start, 3)
            .context("Ensemble ports do not fit below 65536")?
            .last(),
    };
    let zkocc_base = match zkocc_port {
        Some(port) => port,
        None => config
            .port_start
            .checked_add(3)
            .context("zkocc ports do not fit below 65536")?,
    };
    let zkocc_ports =
        PortBlock::try_new(zkocc_base, 3).context("zkocc ports do not fit below 65536")?;

    Ok(CellMap::for_ensemble(
        &config.client_host,
        client_port,
        zkocc_ports,
        add_bad_host,
    ))
}

/// Run the cells command.
pub fn run(
    config: &FixtureConfig,
    client_port: Option<u16>,
    zkocc_port: Option<u16>,
    add_bad_host: bool,
) -> Result<()> {
    let cells = preview(config, client_port, zkocc_port, add_bad_host)?;
    println!("{}", cells.to_json()?);
    Ok(())
}
