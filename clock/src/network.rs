use rrforge_grid::DeviceGrid;
use rrforge_rrgraph::{MetalLayer, RrGraph, SwitchId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    ClockError, Result, htree::ClockHTree, registry::ClockRrGraph, rib::ClockRib,
    spine::ClockSpine,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum ClockType {
    Rib,
    Spine,
    HTree,
}

impl std::fmt::Display for ClockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ClockType::Rib => "rib",
                ClockType::Spine => "spine",
                ClockType::HTree => "htree",
            }
        )
    }
}

/// A straight trunk segment.  `start` and `end` run along the wire's own
/// axis, `position` is the fixed coordinate on the other one.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    #[serde(default)]
    pub layer: MetalLayer,
    pub start: usize,
    pub end: usize,
    pub position: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct WireRepeat {
    pub x: usize,
    pub y: usize,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub offset: usize,
    pub switch: SwitchId,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Taps {
    pub offset: usize,
    pub increment: usize,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ClockNetworkKind {
    Rib(ClockRib),
    Spine(ClockSpine),
    HTree(ClockHTree),
}

/// One logical clock network, replicated `num_inst` times on the device.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClockNetwork {
    pub name: String,
    pub num_inst: usize,
    pub kind: ClockNetworkKind,
}

impl ClockNetwork {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_inst(&self) -> usize {
        self.num_inst
    }

    pub fn network_type(&self) -> ClockType {
        match self.kind {
            ClockNetworkKind::Rib(_) => ClockType::Rib,
            ClockNetworkKind::Spine(_) => ClockType::Spine,
            ClockNetworkKind::HTree(_) => ClockType::HTree,
        }
    }

    /// Appends the wires of every instance of this network to `rr_graph` and
    /// records their drive and tap points in `clock_graph`.
    ///
    /// Nothing is rolled back on failure: nodes of the instances generated
    /// before the failing one stay in the graph.
    pub fn create_rr_nodes_for_clock_network_wires(
        &self,
        grid: &DeviceGrid,
        rr_graph: &mut RrGraph,
        clock_graph: &mut ClockRrGraph,
    ) -> Result<()> {
        for inst in 0..self.num_inst {
            self.create_rr_nodes_for_one_instance(inst, grid, rr_graph, clock_graph)?;
        }
        Ok(())
    }

    pub fn create_rr_nodes_for_one_instance(
        &self,
        inst: usize,
        grid: &DeviceGrid,
        rr_graph: &mut RrGraph,
        clock_graph: &mut ClockRrGraph,
    ) -> Result<()> {
        debug!(
            "creating {kind} wires for {name} instance {inst}",
            kind = self.network_type(),
            name = self.name
        );
        match self.kind {
            ClockNetworkKind::Rib(ref rib) => {
                rib.create_rr_nodes_for_one_instance(&self.name, inst, grid, rr_graph, clock_graph)
            }
            ClockNetworkKind::Spine(ref spine) => {
                spine.create_rr_nodes_for_one_instance(&self.name, inst, grid, rr_graph, clock_graph)
            }
            ClockNetworkKind::HTree(ref htree) => {
                htree.create_rr_nodes_for_one_instance(&self.name, inst, grid, rr_graph, clock_graph)
            }
        }
    }
}

pub(crate) fn ptc_for(network: &str, ptc: usize) -> Result<u16> {
    u16::try_from(ptc)
        .map_err(|_| ClockError::inconsistent(network, format!("track number {ptc} out of range")))
}

pub(crate) fn check_steps(network: &str, repeat: WireRepeat, tap: Taps) -> Result<()> {
    if repeat.x == 0 || repeat.y == 0 {
        return Err(ClockError::inconsistent(
            network,
            format!(
                "wire repeat ({x}, {y}) must be positive in both directions",
                x = repeat.x,
                y = repeat.y
            ),
        ));
    }
    if tap.increment == 0 {
        return Err(ClockError::inconsistent(
            network,
            "tap increment must be positive",
        ));
    }
    Ok(())
}
