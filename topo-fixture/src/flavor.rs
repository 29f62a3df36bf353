//! Registered topology backends.

use std::fmt;
use std::str::FromStr;

/// Flag that selects the topology backend on a server's command line.
pub const TOPO_IMPLEMENTATION_FLAG: &str = "-topo_implementation";

/// A topology backend a test run can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// ZooKeeper, driven through `zkctl` and `zk`.
    Zookeeper,
}

impl Flavor {
    /// All registered flavors.
    pub const ALL: [Flavor; 1] = [Flavor::Zookeeper];

    /// Get the flavor name as passed to `-topo_implementation`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavor::Zookeeper => "zookeeper",
        }
    }

    /// Flags that select this backend for the system under test.
    pub fn flags(&self) -> Vec<String> {
        vec![TOPO_IMPLEMENTATION_FLAG.into(), self.as_str().into()]
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown flavor name.
#[derive(Debug, thiserror::Error)]
#[error("unknown topology flavor: {0}")]
pub struct UnknownFlavor(pub String);

impl FromStr for Flavor {
    type Err = UnknownFlavor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flavor::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFlavor(s.to_string()))
    }
}
