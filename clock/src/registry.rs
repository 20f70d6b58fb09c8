use std::collections::BTreeMap;

use rrforge_grid::{ColId, Coord, RowId};
use rrforge_rrgraph::RrNodeId;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum SwitchPointKind {
    Drive,
    Tap,
}

impl std::fmt::Display for SwitchPointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SwitchPointKind::Drive => "drive",
                SwitchPointKind::Tap => "tap",
            }
        )
    }
}

/// Where each clock network may be driven or tapped, and by which RR nodes.
///
/// A location holds one node per network instance that covers it.
#[derive(Clone, Debug, Default)]
pub struct ClockRrGraph {
    switch_locations: BTreeMap<String, BTreeMap<SwitchPointKind, BTreeMap<Coord, Vec<RrNodeId>>>>,
}

impl ClockRrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_switch_location(
        &mut self,
        network: &str,
        kind: SwitchPointKind,
        x: ColId,
        y: RowId,
        node: RrNodeId,
    ) {
        let nodes = self
            .switch_locations
            .entry(network.to_string())
            .or_default()
            .entry(kind)
            .or_default()
            .entry((x, y))
            .or_default();
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }

    pub fn switch_locations(
        &self,
        network: &str,
        kind: SwitchPointKind,
        x: ColId,
        y: RowId,
    ) -> &[RrNodeId] {
        self.switch_locations
            .get(network)
            .and_then(|kinds| kinds.get(&kind))
            .and_then(|locs| locs.get(&(x, y)))
            .map(|nodes| nodes.as_slice())
            .unwrap_or(&[])
    }

    pub fn switch_points(
        &self,
        network: &str,
        kind: SwitchPointKind,
    ) -> impl Iterator<Item = (Coord, &[RrNodeId])> {
        self.switch_locations
            .get(network)
            .and_then(|kinds| kinds.get(&kind))
            .into_iter()
            .flat_map(|locs| locs.iter().map(|(&crd, nodes)| (crd, nodes.as_slice())))
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.switch_locations.keys().map(|name| name.as_str())
    }

    /// Total number of (location, node) entries over all networks.
    pub fn num_entries(&self) -> usize {
        self.switch_locations
            .values()
            .flat_map(|kinds| kinds.values())
            .flat_map(|locs| locs.values())
            .map(|nodes| nodes.len())
            .sum()
    }

    pub fn print(&self, o: &mut dyn std::io::Write) -> std::io::Result<()> {
        for (name, kinds) in &self.switch_locations {
            writeln!(o, "\tCLOCK {name}")?;
            for (kind, locs) in kinds {
                for (&(x, y), nodes) in locs {
                    write!(o, "\t\t{kind:5} X{x}Y{y}:", kind = kind.to_string())?;
                    for node in nodes {
                        write!(o, " {node}")?;
                    }
                    writeln!(o)?;
                }
            }
        }
        Ok(())
    }
}
