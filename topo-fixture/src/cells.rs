//! Cell-to-endpoint client configuration.
//!
//! Topology clients find ZooKeeper by looking their cell up in a JSON object
//! of `cell name -> "host:port[,host:port...]"`. The fixture writes that
//! object once per setup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::FixtureError;
use crate::ports::PortBlock;

/// File name of the client config under the temp root.
pub const CLIENT_CONFIG_FILE: &str = "test-zk-client-conf.json";

/// Cells served directly by the ensemble.
pub const CELLS: [&str; 4] = ["test_nj", "test_ny", "test_ca", "global"];

/// Suffix naming the zkocc view of a cell.
pub const ZKOCC_SUFFIX: &str = ":_zkocc";

/// Cell that receives the unreachable endpoint.
pub const BAD_HOST_CELL: &str = "test_ca";

/// Endpoint that never resolves, for failover tests.
pub const BAD_HOST: &str = "does.not.exist:1234";

/// Every cell name setup writes: the plain cells, then their zkocc views.
pub fn expected_cells() -> Vec<String> {
    let mut cells: Vec<String> = CELLS.iter().map(|c| c.to_string()).collect();
    cells.extend(CELLS.iter().map(|c| format!("{}{}", c, ZKOCC_SUFFIX)));
    cells
}

/// Mapping from cell name to a comma-joined endpoint list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellMap {
    cells: BTreeMap<String, String>,
}

impl CellMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the eight-cell map for one ensemble and one zkocc block.
    ///
    /// The four plain cells point at the ensemble client port. `test_nj`'s
    /// zkocc cell lists all three zkocc ports; the other zkocc cells get only
    /// the first one.
    pub fn for_ensemble(
        host: &str,
        client_port: u16,
        zkocc_ports: PortBlock,
        add_bad_host: bool,
    ) -> Self {
        let mut map = Self::new();
        let zk = endpoint(host, client_port);

        for cell in CELLS {
            if add_bad_host && cell == BAD_HOST_CELL {
                map.insert(cell, format!("{},{}", zk, BAD_HOST));
            } else {
                map.insert(cell, zk.clone());
            }
        }

        let all_zkocc = zkocc_ports
            .ports()
            .map(|p| endpoint(host, p))
            .collect::<Vec<_>>()
            .join(",");
        let first_zkocc = endpoint(host, zkocc_ports.base());
        for cell in CELLS {
            let value = if cell == "test_nj" {
                all_zkocc.clone()
            } else {
                first_zkocc.clone()
            };
            map.insert(&format!("{}{}", cell, ZKOCC_SUFFIX), value);
        }

        map
    }

    /// Set the endpoints for a cell.
    pub fn insert(&mut self, cell: &str, endpoints: impl Into<String>) {
        self.cells.insert(cell.into(), endpoints.into());
    }

    /// Endpoint string for a cell.
    pub fn get(&self, cell: &str) -> Option<&str> {
        self.cells.get(cell).map(String::as_str)
    }

    /// Individual endpoints for a cell.
    pub fn endpoints(&self, cell: &str) -> Vec<&str> {
        self.get(cell)
            .map(|s| s.split(',').filter(|e| !e.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Cell names, sorted.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the map has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Serialize to a JSON object string.
    pub fn to_json(&self) -> Result<String, FixtureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the map to `dir/test-zk-client-conf.json`, creating `dir` if
    /// needed, and return the file's path.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf, FixtureError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(CLIENT_CONFIG_FILE);
        tokio::fs::write(&path, self.to_json()?).await?;
        tracing::info!("Wrote zk client config ({} cells) to {}", self.len(), path.display());
        Ok(path)
    }

    /// Load a map previously written with [`CellMap::write_to`].
    pub async fn read_from(path: &Path) -> Result<Self, FixtureError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn endpoint(host: &str, port: u16) -> String {
    format!("{}:{}", host, port)
}
