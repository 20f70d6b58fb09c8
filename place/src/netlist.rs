use std::{fs::read_to_string, path::Path};

use serde::{Deserialize, Serialize};
use unnamed_entity::{EntityMap, entity_id};

use crate::{PlaceError, Result, digest::digest_bytes};

entity_id! {
    pub id BlockId u32;
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub block_type: String,
}

/// A clustered netlist: the blocks a placement assigns to grid locations.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    pub id: String,
    pub blocks: EntityMap<BlockId, String, Block>,
}

#[derive(Deserialize)]
struct NetlistDecl {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "block")]
    blocks: Vec<BlockDecl>,
}

#[derive(Deserialize)]
struct BlockDecl {
    name: String,
    #[serde(rename = "type")]
    block_type: String,
}

impl Netlist {
    pub fn new(id: impl Into<String>) -> Self {
        Netlist {
            id: id.into(),
            blocks: EntityMap::new(),
        }
    }

    /// Reads a netlist from TOML.  Without an explicit `id`, the netlist is
    /// identified by the digest of the file contents.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(|source| PlaceError::Open {
            path: path.to_path_buf(),
            what: "netlist",
            source,
        })?;
        let decl: NetlistDecl = toml::from_str(&s).map_err(|source| PlaceError::NetlistToml {
            path: path.to_path_buf(),
            source,
        })?;
        let mut netlist = Netlist::new(decl.id.unwrap_or_else(|| digest_bytes(s.as_bytes())));
        for block in decl.blocks {
            let (_, prev) = netlist.blocks.insert(
                block.name.clone(),
                Block {
                    block_type: block.block_type,
                },
            );
            if prev.is_some() {
                return Err(PlaceError::DuplicateNetlistBlock {
                    path: path.to_path_buf(),
                    name: block.name,
                });
            }
        }
        Ok(netlist)
    }

    pub fn add_block(&mut self, name: impl Into<String>, block_type: impl Into<String>) -> BlockId {
        self.blocks
            .insert(
                name.into(),
                Block {
                    block_type: block_type.into(),
                },
            )
            .0
    }

    pub fn find_block(&self, name: &str) -> Option<BlockId> {
        self.blocks.get(name).map(|(id, _)| id)
    }

    pub fn block_name(&self, block: BlockId) -> &str {
        self.blocks.key(block)
    }

    pub fn block_type(&self, block: BlockId) -> &str {
        &self.blocks[block].block_type
    }
}
