use std::{fs::File, ops::Index, path::Path};

use rrforge_grid::{ColId, RowId};
use serde::{Deserialize, Serialize};
use unnamed_entity::{EntityId, EntityMap, EntityVec, entity_id};

mod error;
mod print;

pub use error::{Result, RrGraphError};

entity_id! {
    pub id RrNodeId u32;
    pub id SwitchId u16;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum RrNodeKind {
    Source,
    Sink,
    IPin,
    OPin,
    ChanX,
    ChanY,
}

impl std::fmt::Display for RrNodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RrNodeKind::Source => "SOURCE",
                RrNodeKind::Sink => "SINK",
                RrNodeKind::IPin => "IPIN",
                RrNodeKind::OPin => "OPIN",
                RrNodeKind::ChanX => "CHANX",
                RrNodeKind::ChanY => "CHANY",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchKind {
    Mux,
    Buffer,
    Tristate,
    PassGate,
    Short,
}

/// Indices into the resistance and capacitance tables of the metal layer a
/// wire is routed on.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MetalLayer {
    pub r_metal: u16,
    pub c_metal: u16,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RrEdge {
    pub target: RrNodeId,
    pub switch: SwitchId,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RrNode {
    pub kind: RrNodeKind,
    pub xlow: ColId,
    pub ylow: RowId,
    pub xhigh: ColId,
    pub yhigh: RowId,
    pub capacity: u16,
    pub ptc: u16,
    pub metal: Option<MetalLayer>,
    pub edges: Vec<RrEdge>,
}

impl RrNode {
    pub fn new(kind: RrNodeKind) -> Self {
        RrNode {
            kind,
            xlow: ColId::from_idx(0),
            ylow: RowId::from_idx(0),
            xhigh: ColId::from_idx(0),
            yhigh: RowId::from_idx(0),
            capacity: 0,
            ptc: 0,
            metal: None,
            edges: vec![],
        }
    }

    pub fn set_kind(&mut self, kind: RrNodeKind) {
        self.kind = kind;
    }

    /// Sets the span of the node; the two corners may be given in any order.
    pub fn set_coordinates(&mut self, x1: ColId, y1: RowId, x2: ColId, y2: RowId) {
        self.xlow = x1.min(x2);
        self.xhigh = x1.max(x2);
        self.ylow = y1.min(y2);
        self.yhigh = y1.max(y2);
    }

    pub fn set_capacity(&mut self, capacity: u16) {
        self.capacity = capacity;
    }

    pub fn set_ptc(&mut self, ptc: u16) {
        self.ptc = ptc;
    }

    pub fn set_metal(&mut self, metal: MetalLayer) {
        self.metal = Some(metal);
    }

    pub fn add_edge(&mut self, target: RrNodeId, switch: SwitchId) {
        self.edges.push(RrEdge { target, switch });
    }

    pub fn length(&self) -> usize {
        match self.kind {
            RrNodeKind::ChanX => self.xhigh.to_idx() - self.xlow.to_idx(),
            RrNodeKind::ChanY => self.yhigh.to_idx() - self.ylow.to_idx(),
            _ => 0,
        }
    }
}

/// The routing-resource graph.  Nodes are only ever appended; a node id,
/// once handed out, refers to the same node for the life of the graph.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RrGraph {
    pub switches: EntityMap<SwitchId, String, SwitchKind>,
    nodes: EntityVec<RrNodeId, RrNode>,
}

impl RrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a switch model by name.  Adding an identical definition
    /// twice returns the existing id.
    pub fn add_switch(&mut self, name: &str, kind: SwitchKind) -> Result<SwitchId> {
        if let Some((id, &prev)) = self.switches.get(name) {
            if prev != kind {
                return Err(RrGraphError::SwitchRedefined(name.to_string()));
            }
            return Ok(id);
        }
        Ok(self.switches.insert(name.to_string(), kind).0)
    }

    pub fn find_switch(&self, name: &str) -> Result<SwitchId> {
        self.switches
            .get(name)
            .map(|(id, _)| id)
            .ok_or_else(|| RrGraphError::UnknownSwitch(name.to_string()))
    }

    pub fn add_node(&mut self, node: RrNode) -> RrNodeId {
        self.nodes.push(node)
    }

    pub fn add_edge(&mut self, from: RrNodeId, to: RrNodeId, switch: SwitchId) -> Result<()> {
        if self.nodes.get(to).is_none() {
            return Err(RrGraphError::NoSuchNode(to));
        }
        if switch.to_idx() >= self.switches.len() {
            return Err(RrGraphError::NoSuchSwitch(switch));
        }
        let Some(node) = self.nodes.get_mut(from) else {
            return Err(RrGraphError::NoSuchNode(from));
        };
        node.add_edge(to, switch);
        Ok(())
    }

    pub fn node(&self, id: RrNodeId) -> &RrNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: RrNodeId) -> &mut RrNode {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &EntityVec<RrNodeId, RrNode> {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.nodes.values().map(|node| node.edges.len()).sum()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path)?;
        let mut cf = zstd::stream::Decoder::new(f)?;
        let config = bincode::config::standard();
        Ok(bincode::serde::decode_from_std_read(&mut cf, config)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let f = File::create(path)?;
        let mut cf = zstd::stream::Encoder::new(f, 9)?;
        let config = bincode::config::standard();
        bincode::serde::encode_into_std_write(self, &mut cf, config)?;
        cf.finish()?;
        Ok(())
    }
}

impl Index<RrNodeId> for RrGraph {
    type Output = RrNode;

    fn index(&self, index: RrNodeId) -> &RrNode {
        &self.nodes[index]
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn chanx(graph: &mut RrGraph, x1: usize, x2: usize, y: usize) -> RrNodeId {
        let mut node = RrNode::new(RrNodeKind::ChanX);
        node.set_coordinates(
            ColId::from_idx(x1),
            RowId::from_idx(y),
            ColId::from_idx(x2),
            RowId::from_idx(y),
        );
        node.set_capacity(1);
        graph.add_node(node)
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut graph = RrGraph::new();
        let a = chanx(&mut graph, 1, 3, 1);
        let b = chanx(&mut graph, 3, 5, 1);
        assert_eq!(a.to_idx(), 0);
        assert_eq!(b.to_idx(), 1);
        assert_eq!(graph.num_nodes(), 2);
        assert_eq!(graph[b].xlow.to_idx(), 3);
    }

    #[test]
    fn test_coordinates_normalized() {
        let mut graph = RrGraph::new();
        let a = chanx(&mut graph, 5, 2, 1);
        assert_eq!(graph[a].xlow.to_idx(), 2);
        assert_eq!(graph[a].xhigh.to_idx(), 5);
        assert_eq!(graph[a].length(), 3);
    }

    #[test]
    fn test_edges() {
        let mut graph = RrGraph::new();
        let sw = graph.add_switch("buf", SwitchKind::Buffer).unwrap();
        let a = chanx(&mut graph, 1, 1, 1);
        let b = chanx(&mut graph, 1, 3, 1);
        graph.add_edge(a, b, sw).unwrap();
        assert_eq!(graph[a].edges, vec![RrEdge { target: b, switch: sw }]);
        assert_eq!(graph.num_edges(), 1);
        assert_matches!(
            graph.add_edge(a, RrNodeId::from_idx(7), sw),
            Err(RrGraphError::NoSuchNode(_))
        );
        assert_matches!(
            graph.add_edge(a, b, SwitchId::from_idx(3)),
            Err(RrGraphError::NoSuchSwitch(_))
        );
    }

    #[test]
    fn test_switches() {
        let mut graph = RrGraph::new();
        let buf = graph.add_switch("buf", SwitchKind::Buffer).unwrap();
        let mux = graph.add_switch("mux", SwitchKind::Mux).unwrap();
        assert_ne!(buf, mux);
        assert_eq!(graph.add_switch("buf", SwitchKind::Buffer).unwrap(), buf);
        assert_matches!(
            graph.add_switch("buf", SwitchKind::Short),
            Err(RrGraphError::SwitchRedefined(_))
        );
        assert_eq!(graph.find_switch("mux").unwrap(), mux);
        assert_matches!(graph.find_switch("nope"), Err(RrGraphError::UnknownSwitch(_)));
    }

    #[test]
    fn test_file() {
        let mut graph = RrGraph::new();
        let sw = graph.add_switch("buf", SwitchKind::Buffer).unwrap();
        let a = chanx(&mut graph, 1, 1, 2);
        let b = chanx(&mut graph, 1, 4, 2);
        graph.node_mut(b).set_metal(MetalLayer {
            r_metal: 1,
            c_metal: 2,
        });
        graph.add_edge(a, b, sw).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.rrg");
        graph.to_file(&path).unwrap();
        assert_eq!(RrGraph::from_file(&path).unwrap(), graph);
    }
}
