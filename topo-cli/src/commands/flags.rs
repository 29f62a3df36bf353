//! Print topology backend flags.

use zk_topo_fixture::Flavor;

/// Run the flags command.
pub fn run() {
    for flag in Flavor::Zookeeper.flags() {
        println!("{}", flag);
    }
}
