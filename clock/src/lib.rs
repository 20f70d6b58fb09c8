//! Routing-resource graph synthesis for global clock networks.
//!
//! A clock network is a repeating pattern of trunk wires (horizontal ribs,
//! vertical spines, or H-trees) tiled over the device grid.  Generation
//! appends the trunk nodes and their drive switches to the routing graph and
//! records, per network, the grid locations where the trunks can be driven
//! and tapped.

use rrforge_grid::DeviceGrid;
use rrforge_rrgraph::RrGraph;
use tracing::info;

pub mod arch;
mod error;
pub mod htree;
pub mod network;
pub mod registry;
pub mod rib;
pub mod spine;

pub use error::{ClockError, Result};
pub use network::{ClockNetwork, ClockNetworkKind, ClockType};
pub use registry::{ClockRrGraph, SwitchPointKind};

/// Generates every instance of every network, in order, recording drive and
/// tap points in `clock_graph`.
///
/// On failure, both `rr_graph` and `clock_graph` keep what the networks
/// before the failing one produced.
pub fn create_and_append_clock_rr_graph(
    networks: &[ClockNetwork],
    grid: &DeviceGrid,
    rr_graph: &mut RrGraph,
    clock_graph: &mut ClockRrGraph,
) -> Result<()> {
    for network in networks {
        let (nodes, edges) = (rr_graph.num_nodes(), rr_graph.num_edges());
        network.create_rr_nodes_for_clock_network_wires(grid, rr_graph, clock_graph)?;
        info!(
            "clock network {name} ({kind}, {inst} instances): {n} nodes, {e} edges",
            name = network.name(),
            kind = network.network_type(),
            inst = network.num_inst(),
            n = rr_graph.num_nodes() - nodes,
            e = rr_graph.num_edges() - edges,
        );
    }
    Ok(())
}
