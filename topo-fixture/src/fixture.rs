//! ZooKeeper topology fixture.
//!
//! Lifecycle is strictly `setup -> (wipe)* -> teardown`. Every step blocks on
//! its subprocesses before returning; nothing runs in the background and
//! nothing is cleaned up on drop, so callers must call `teardown`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::cells::CellMap;
use crate::command::{EnsembleSpec, ZkCommand, ZkCtl, ZkCtlAction};
use crate::config::FixtureConfig;
use crate::context::TopoClientContext;
use crate::error::FixtureError;
use crate::flavor::Flavor;
use crate::host;
use crate::ports::{PortAllocator, PortBlock, SequentialPorts};
use crate::runner::{CommandRunner, ProcessRunner};

/// Ports per ensemble server: peer, election, client.
const ENSEMBLE_PORTS: u16 = 3;

/// Ports per zkocc block.
const ZKOCC_PORTS: u16 = 3;

/// Cells whose `vt` root is created on setup.
const SEEDED_CELLS: [&str; 3] = ["test_nj", "test_ny", "test_ca"];

/// Cells whose `vt` tree is removed on wipe.
const WIPED_CELLS: [&str; 3] = ["test_nj", "test_ny", "global"];

/// A disposable topology backend for integration tests.
#[async_trait]
pub trait TopoServer: Send + Sync {
    /// Which backend this is.
    fn flavor(&self) -> Flavor;

    /// Start the backend and write its client config.
    ///
    /// With `add_bad_host`, one cell also lists an unreachable endpoint.
    async fn setup(&mut self, add_bad_host: bool) -> Result<TopoClientContext, FixtureError>;

    /// Flags that point the system under test at this backend.
    fn flags(&self) -> Vec<String> {
        self.flavor().flags()
    }

    /// Remove all test data, leaving the backend running.
    async fn wipe(&self) -> Result<(), FixtureError>;

    /// Stop the backend. Best effort: failures are logged, never returned.
    async fn teardown(&mut self);
}

/// State of a started ensemble.
#[derive(Debug, Clone)]
struct Running {
    ensemble: EnsembleSpec,
    zkocc_ports: PortBlock,
    context: Option<TopoClientContext>,
}

/// Single-node ZooKeeper ensemble managed through `zkctl` and `zk`.
pub struct ZkTopoServer {
    config: FixtureConfig,
    runner: Arc<dyn CommandRunner>,
    ports: Box<dyn PortAllocator>,
    running: Option<Running>,
}

impl std::fmt::Debug for ZkTopoServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZkTopoServer")
            .field("config", &self.config)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl ZkTopoServer {
    /// Create a fixture that spawns real processes and allocates ports
    /// sequentially from `config.port_start`.
    pub fn new(config: FixtureConfig) -> Self {
        let ports = SequentialPorts::new(config.port_start, config.port_limit);
        Self::with_collaborators(config, Arc::new(ProcessRunner::new()), Box::new(ports))
    }

    /// Create a fixture with explicit collaborators.
    pub fn with_collaborators(
        config: FixtureConfig,
        runner: Arc<dyn CommandRunner>,
        ports: Box<dyn PortAllocator>,
    ) -> Self {
        Self {
            config,
            runner,
            ports,
            running: None,
        }
    }

    /// The fixture's configuration.
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Ensemble spec (available after setup).
    pub fn ensemble(&self) -> Option<&EnsembleSpec> {
        self.running.as_ref().map(|r| &r.ensemble)
    }

    /// zkocc port block (available after setup).
    pub fn zkocc_ports(&self) -> Option<PortBlock> {
        self.running.as_ref().map(|r| r.zkocc_ports)
    }

    /// Client context (available once setup has written the client config).
    pub fn context(&self) -> Option<&TopoClientContext> {
        self.running.as_ref().and_then(|r| r.context.as_ref())
    }

    async fn zkctl(&self, ensemble: &EnsembleSpec, action: ZkCtlAction) -> Result<(), FixtureError> {
        let cmd = ZkCtl::new(&self.config.log_dir, ensemble.clone(), action);
        self.runner
            .run_ok(&self.config.zkctl_binary, &cmd.build_args(), &[])
            .await?;
        Ok(())
    }

    /// Run `zk` with the client config bound, so it can resolve cell paths.
    async fn zk(&self, context: &TopoClientContext, cmd: ZkCommand) -> Result<(), FixtureError> {
        let (key, value) = context.env_pair();
        let envs = [(key.to_string(), value)];
        self.runner
            .run_ok(&self.config.zk_binary, &cmd.build_args(), &envs)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TopoServer for ZkTopoServer {
    fn flavor(&self) -> Flavor {
        Flavor::Zookeeper
    }

    async fn setup(&mut self, add_bad_host: bool) -> Result<TopoClientContext, FixtureError> {
        if let Some(running) = &self.running {
            return Err(FixtureError::AlreadySetUp {
                ensemble: running.ensemble.to_string(),
            });
        }

        let zk_ports = self.ports.reserve(ENSEMBLE_PORTS)?;
        let zkocc_ports = self.ports.reserve(ZKOCC_PORTS)?;
        let hostname = host::resolve_hostname(self.config.hostname.as_deref()).await?;
        let ensemble = EnsembleSpec::single(&hostname, zk_ports);

        self.zkctl(&ensemble, ZkCtlAction::Init).await?;
        tracing::info!("ZooKeeper started: {}", ensemble);

        // From here on the ensemble is running and teardown must stop it.
        self.running = Some(Running {
            ensemble: ensemble.clone(),
            zkocc_ports,
            context: None,
        });

        let cells = CellMap::for_ensemble(
            &self.config.client_host,
            ensemble.client_port(),
            zkocc_ports,
            add_bad_host,
        );
        let config_path = cells.write_to(&self.config.tmp_root).await?;
        let context = TopoClientContext::new(config_path);
        if let Some(running) = self.running.as_mut() {
            running.context = Some(context.clone());
        }

        for cell in SEEDED_CELLS {
            let path = self.config.znode(&format!("{}/vt", cell));
            self.zk(&context, ZkCommand::touch(&path)).await?;
        }

        Ok(context)
    }

    async fn wipe(&self) -> Result<(), FixtureError> {
        let Some(context) = self.context() else {
            return Err(FixtureError::NotSetUp);
        };

        // zk refuses to remove a non-empty node, so clear the children by glob
        // first and then remove the emptied parents.
        for cell in WIPED_CELLS {
            let children = self.config.znode(&format!("{}/vt/*", cell));
            self.zk(context, ZkCommand::remove_tree(&children)).await?;
        }
        for cell in WIPED_CELLS {
            let parent = self.config.znode(&format!("{}/vt", cell));
            self.zk(context, ZkCommand::remove(&parent)).await?;
        }

        tracing::info!("Wiped topology data for {}", WIPED_CELLS.join(", "));
        Ok(())
    }

    async fn teardown(&mut self) {
        let Some(running) = self.running.take() else {
            tracing::warn!("Teardown called before setup; nothing to stop");
            return;
        };

        let action = ZkCtlAction::stop(self.config.keep_logs);
        match self.zkctl(&running.ensemble, action).await {
            Ok(()) => tracing::info!("ZooKeeper stopped ({}): {}", action.as_str(), running.ensemble),
            Err(e) => tracing::warn!("ZooKeeper {} failed (ignored): {}", action.as_str(), e),
        }
    }
}
