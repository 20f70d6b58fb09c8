use rrforge_grid::{ColId, DeviceGrid, RowId};
use rrforge_rrgraph::{RrGraph, RrNode, RrNodeId, RrNodeKind};
use serde::{Deserialize, Serialize};
use unnamed_entity::EntityId;

use crate::{
    ClockError, Result,
    network::{Drive, Taps, Wire, WireRepeat, check_steps, ptc_for},
    registry::{ClockRrGraph, SwitchPointKind},
};

/// Vertical clock trunk, one CHANY node per tile.
///
/// Unlike ribs, spines may run up to the last row and column of the grid and
/// use the bare instance number as their track.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClockSpine {
    pub y_chan_wire: Wire,
    pub repeat: WireRepeat,
    pub drive: Drive,
    pub tap: Taps,
}

impl ClockSpine {
    pub fn validate(&self, network: &str) -> Result<()> {
        check_steps(network, self.repeat, self.tap)?;
        let wire = &self.y_chan_wire;
        if wire.start > wire.end {
            return Err(ClockError::inconsistent(
                network,
                format!(
                    "spine start {start} lies past its end {end}",
                    start = wire.start,
                    end = wire.end
                ),
            ));
        }
        if wire.start + self.drive.offset > wire.end {
            return Err(ClockError::inconsistent(
                network,
                format!(
                    "drive offset {offset} lies beyond the spine end {end}",
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
        let ptc = ptc_for(network, inst)?;
        let wire = &self.y_chan_wire;
        let span = wire.end - wire.start;

        for y_end in (wire.end..grid.height()).step_by(self.repeat.y) {
            let y_start = y_end - span;
            for x in (wire.position..grid.width()).step_by(self.repeat.x) {
                let node = self.create_chany_wire(y_start, y_end, x, ptc, rr_graph);
                self.record_switch_point_locations_for_rr_node(
                    network,
                    (y_start, y_end, x),
                    node,
                    clock_graph,
                );
            }
        }
        Ok(())
    }

    fn create_chany_wire(
        &self,
        y_start: usize,
        y_end: usize,
        x: usize,
        ptc: u16,
        rr_graph: &mut RrGraph,
    ) -> RrNodeId {
        let mut node = RrNode::new(RrNodeKind::ChanY);
        node.set_coordinates(
            ColId::from_idx(x),
            RowId::from_idx(y_start),
            ColId::from_idx(x),
            RowId::from_idx(y_end),
        );
        node.set_capacity(1);
        node.set_ptc(ptc);
        node.set_metal(self.y_chan_wire.layer);
        rr_graph.add_node(node)
    }

    /// The spine is not split at its drive point, so the drive point and
    /// every tap resolve to the same node.
    fn record_switch_point_locations_for_rr_node(
        &self,
        network: &str,
        (y_start, y_end, x): (usize, usize, usize),
        node: RrNodeId,
        clock_graph: &mut ClockRrGraph,
    ) {
        let col = ColId::from_idx(x);
        clock_graph.add_switch_location(
            network,
            SwitchPointKind::Drive,
            col,
            RowId::from_idx(y_start + self.drive.offset),
            node,
        );
        for y in (y_start + self.tap.offset..=y_end).step_by(self.tap.increment) {
            clock_graph.add_switch_location(
                network,
                SwitchPointKind::Tap,
                col,
                RowId::from_idx(y),
                node,
            );
        }
    }
}
