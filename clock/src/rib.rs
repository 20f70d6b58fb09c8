use rrforge_grid::{ColId, DeviceGrid, RowId};
use rrforge_rrgraph::{RrGraph, RrNode, RrNodeId, RrNodeKind};
use serde::{Deserialize, Serialize};
use unnamed_entity::EntityId;

use crate::{
    ClockError, Result,
    network::{Drive, Taps, Wire, WireRepeat, check_steps, ptc_for},
    registry::{ClockRrGraph, SwitchPointKind},
};

/// Rib track numbers start here, clear of the ordinary routing tracks.
pub const RIB_PTC_OFFSET: usize = 50;

/// Horizontal clock trunk.  Each tile is a zero-length drive node feeding a
/// left and a right half-wire through the drive switch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClockRib {
    pub x_chan_wire: Wire,
    pub repeat: WireRepeat,
    pub drive: Drive,
    pub tap: Taps,
}

impl ClockRib {
    pub fn validate(&self, network: &str) -> Result<()> {
        check_steps(network, self.repeat, self.tap)?;
        let wire = &self.x_chan_wire;
        if wire.start + 1 > wire.end {
            return Err(ClockError::inconsistent(
                network,
                format!(
                    "rib from {start} to {end} is empty",
                    start = wire.start,
                    end = wire.end
                ),
            ));
        }
        if wire.start + 1 + self.drive.offset > wire.end {
            return Err(ClockError::inconsistent(
                network,
                format!(
                    "drive offset {offset} lies beyond the rib end {end}",
                    offset = self.drive.offset,
                    end = wire.end
                ),
            ));
        }
        Ok(())
    }

    pub fn create_rr_nodes_for_one_instance(
        &self,
        network: &str,
        inst: usize,
        grid: &DeviceGrid,
        rr_graph: &mut RrGraph,
        clock_graph: &mut ClockRrGraph,
    ) -> Result<()> {
        self.validate(network)?;
        let ptc = ptc_for(network, inst + RIB_PTC_OFFSET)?;
        let wire = &self.x_chan_wire;
        let span = wire.end - (wire.start + 1);

        // the outermost ring of the grid is reserved for I/O
        let x_limit = grid.width().saturating_sub(1);
        let y_limit = grid.height().saturating_sub(1);
        for x_end in (wire.end..x_limit).step_by(self.repeat.x) {
            let x_start = x_end - span;
            for y in (wire.position..y_limit).step_by(self.repeat.y) {
                let drive_x = x_start + self.drive.offset;

                let drive_node = self.create_chanx_wire(drive_x, drive_x, y, ptc, rr_graph);
                clock_graph.add_switch_location(
                    network,
                    SwitchPointKind::Drive,
                    ColId::from_idx(drive_x),
                    RowId::from_idx(y),
                    drive_node,
                );

                let left_node = self.create_chanx_wire(x_start, drive_x, y, ptc, rr_graph);
                let right_node = self.create_chanx_wire(drive_x, x_end, y, ptc, rr_graph);

                self.record_tap_locations(
                    network,
                    (x_start, x_end, y),
                    left_node,
                    right_node,
                    clock_graph,
                );

                for half in [left_node, right_node] {
                    rr_graph
                        .add_edge(drive_node, half, self.drive.switch)
                        .map_err(|source| ClockError::Graph {
                            network: network.to_string(),
                            source,
                        })?;
                }
            }
        }
        Ok(())
    }

    fn create_chanx_wire(
        &self,
        x_start: usize,
        x_end: usize,
        y: usize,
        ptc: u16,
        rr_graph: &mut RrGraph,
    ) -> RrNodeId {
        let mut node = RrNode::new(RrNodeKind::ChanX);
        node.set_coordinates(
            ColId::from_idx(x_start),
            RowId::from_idx(y),
            ColId::from_idx(x_end),
            RowId::from_idx(y),
        );
        node.set_capacity(1);
        node.set_ptc(ptc);
        node.set_metal(self.x_chan_wire.layer);
        rr_graph.add_node(node)
    }

    /// Taps left of the drive point hang off the left half-wire, the rest
    /// (including the drive point itself) off the right one.
    fn record_tap_locations(
        &self,
        network: &str,
        (x_start, x_end, y): (usize, usize, usize),
        left_node: RrNodeId,
        right_node: RrNodeId,
        clock_graph: &mut ClockRrGraph,
    ) {
        let drive_x = x_start + self.drive.offset;
        for x in (x_start + self.tap.offset..=x_end).step_by(self.tap.increment) {
            let node = if x < drive_x { left_node } else { right_node };
            clock_graph.add_switch_location(
                network,
                SwitchPointKind::Tap,
                ColId::from_idx(x),
                RowId::from_idx(y),
                node,
            );
        }
    }
}
