//! # zk-topo-fixture
//!
//! Disposable ZooKeeper topology for integration tests.
//!
//! This crate stands up a single-node ZooKeeper ensemble by shelling out to the
//! `zkctl` and `zk` binaries, writes the cell-to-endpoint client config those
//! binaries' clients read, and tears everything down again:
//! - [`ZkTopoServer`] - The fixture itself (setup, flags, wipe, teardown)
//! - [`ZkCtl`], [`ZkCommand`] - Typed command lines for the two binaries
//! - [`CellMap`] - The JSON client config
//! - [`TopoClientContext`] - Where the config was written, passed on explicitly
//! - [`CommandRunner`], [`PortAllocator`] - Injected collaborators

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cells;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod flavor;
pub mod host;
pub mod ports;
pub mod runner;
pub mod testing;

pub use cells::CellMap;
pub use command::{EnsembleSpec, ZkCommand, ZkCtl, ZkCtlAction};
pub use config::{ConfigError, FixtureConfig};
pub use context::TopoClientContext;
pub use error::FixtureError;
pub use fixture::{TopoServer, ZkTopoServer};
pub use flavor::Flavor;
pub use ports::{PortAllocator, PortBlock, SequentialPorts};
pub use runner::{CommandRunner, ProcessRunner, RunOutput};
