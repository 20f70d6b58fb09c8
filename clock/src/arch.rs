use std::{fs::read_to_string, path::Path};

use itertools::Itertools;
use rrforge_rrgraph::{RrGraph, SwitchKind};
use serde::Deserialize;

use crate::{
    ClockError, Result,
    htree::ClockHTree,
    network::{ClockNetwork, ClockNetworkKind, Drive, Taps, Wire, WireRepeat},
    rib::ClockRib,
    spine::ClockSpine,
};

/// The clock section of an architecture description, as read from TOML.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClockArch {
    #[serde(default, rename = "switch")]
    pub switches: Vec<SwitchDecl>,
    #[serde(default, rename = "network")]
    pub networks: Vec<NetworkDecl>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SwitchDecl {
    pub name: String,
    pub kind: SwitchKind,
}

/// Exactly one of `rib`, `spine` and `htree` must be given.
#[derive(Clone, Debug, Deserialize)]
pub struct NetworkDecl {
    pub name: String,
    pub num_inst: usize,
    #[serde(default)]
    pub rib: Option<TrunkDecl>,
    #[serde(default)]
    pub spine: Option<TrunkDecl>,
    #[serde(default)]
    pub htree: Option<ClockHTree>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TrunkDecl {
    pub wire: Wire,
    pub repeat: WireRepeat,
    pub drive: DriveDecl,
    pub tap: Taps,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DriveDecl {
    pub offset: usize,
    pub switch: String,
}

impl ClockArch {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(|source| ClockError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| ClockError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Registers the declared switches with `rr_graph` and resolves every
    /// network declaration against them.
    pub fn build_networks(&self, rr_graph: &mut RrGraph) -> Result<Vec<ClockNetwork>> {
        for switch in &self.switches {
            rr_graph.add_switch(&switch.name, switch.kind)?;
        }
        if let Some(name) = self.networks.iter().map(|n| &n.name).duplicates().next() {
            return Err(ClockError::inconsistent(name, "network declared twice"));
        }
        self.networks
            .iter()
            .map(|decl| decl.resolve(rr_graph))
            .collect()
    }
}

impl NetworkDecl {
    fn resolve(&self, rr_graph: &RrGraph) -> Result<ClockNetwork> {
        let kind = match (&self.rib, &self.spine, &self.htree) {
            (Some(trunk), None, None) => {
                let (wire, repeat, drive, tap) = self.resolve_trunk(trunk, rr_graph)?;
                ClockNetworkKind::Rib(ClockRib {
                    x_chan_wire: wire,
                    repeat,
                    drive,
                    tap,
                })
            }
            (None, Some(trunk), None) => {
                let (wire, repeat, drive, tap) = self.resolve_trunk(trunk, rr_graph)?;
                ClockNetworkKind::Spine(ClockSpine {
                    y_chan_wire: wire,
                    repeat,
                    drive,
                    tap,
                })
            }
            (None, None, Some(htree)) => ClockNetworkKind::HTree(htree.clone()),
            _ => {
                return Err(ClockError::inconsistent(
                    &self.name,
                    "exactly one of rib, spine or htree must be given",
                ));
            }
        };
        Ok(ClockNetwork {
            name: self.name.clone(),
            num_inst: self.num_inst,
            kind,
        })
    }

    fn resolve_trunk(
        &self,
        trunk: &TrunkDecl,
        rr_graph: &RrGraph,
    ) -> Result<(Wire, WireRepeat, Drive, Taps)> {
        let switch = rr_graph
            .find_switch(&trunk.drive.switch)
            .map_err(|source| ClockError::Graph {
                network: self.name.clone(),
                source,
            })?;
        let drive = Drive {
            offset: trunk.drive.offset,
            switch,
        };
        Ok((trunk.wire, trunk.repeat, drive, trunk.tap))
    }
}
