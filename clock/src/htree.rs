use rrforge_grid::DeviceGrid;
use rrforge_rrgraph::RrGraph;
use serde::{Deserialize, Serialize};

use crate::{ClockError, ClockType, Result, registry::ClockRrGraph};

/// Hierarchical H-tree clock network.  Accepted in architectures, but any
/// attempt to generate one fails.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClockHTree {}

impl ClockHTree {
    pub fn create_rr_nodes_for_one_instance(
        &self,
        network: &str,
        _inst: usize,
        _grid: &DeviceGrid,
        _rr_graph: &mut RrGraph,
        _clock_graph: &mut ClockRrGraph,
    ) -> Result<()> {
        // TODO: generate H-tree levels once the architecture format describes them
        Err(ClockError::UnsupportedTopology {
            network: network.to_string(),
            kind: ClockType::HTree,
        })
    }
}
