use ndarray::Array2;
use rrforge_grid::{ColId, DeviceGrid, RowId};
use unnamed_entity::{EntityId, EntityVec};

use crate::netlist::{BlockId, Netlist};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlockLoc {
    pub col: ColId,
    pub row: RowId,
    pub sub_tile: usize,
    /// Set for blocks locked down by a constraints file.
    pub is_fixed: bool,
}

/// Occupancy of one grid cell, one slot per sub-tile.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GridUsage {
    pub blocks: Vec<Option<BlockId>>,
    pub usage: usize,
}

#[derive(Clone, Debug)]
pub struct PlacementState {
    pub block_locs: EntityVec<BlockId, Option<BlockLoc>>,
    // indexed [row, col]
    pub grid_blocks: Array2<GridUsage>,
    /// Digest of the placement file last read or written.
    pub placement_id: Option<String>,
}

impl PlacementState {
    pub fn new(grid: &DeviceGrid, netlist: &Netlist) -> Self {
        PlacementState {
            block_locs: netlist.blocks.ids().map(|_| None).collect(),
            grid_blocks: Array2::from_shape_fn((grid.height(), grid.width()), |(row, col)| {
                let capacity = grid
                    .tile_type(ColId::from_idx(col), RowId::from_idx(row))
                    .capacity;
                GridUsage {
                    blocks: vec![None; capacity],
                    usage: 0,
                }
            }),
            placement_id: None,
        }
    }

    pub fn block_loc(&self, block: BlockId) -> Option<BlockLoc> {
        self.block_locs.get(block).copied().flatten()
    }

    pub fn grid_usage(&self, col: ColId, row: RowId) -> &GridUsage {
        &self.grid_blocks[(row.to_idx(), col.to_idx())]
    }

    pub fn grid_usage_mut(&mut self, col: ColId, row: RowId) -> &mut GridUsage {
        &mut self.grid_blocks[(row.to_idx(), col.to_idx())]
    }

    pub fn num_placed(&self) -> usize {
        self.block_locs.values().filter(|loc| loc.is_some()).count()
    }

    pub fn num_fixed(&self) -> usize {
        self.block_locs
            .values()
            .filter(|loc| loc.is_some_and(|loc| loc.is_fixed))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use rrforge_grid::{TileType, TileTypeId};
    use unnamed_entity::EntityMap;

    use super::*;

    #[test]
    fn test_new() {
        let mut types: EntityMap<TileTypeId, String, TileType> = EntityMap::new();
        let (clb, _) = types.insert(
            "clb".to_string(),
            TileType {
                capacity: 2,
                equivalent_blocks: ["clb".to_string()].into(),
            },
        );
        let grid = DeviceGrid::new("test", types, 3, 2, clb).unwrap();
        let mut netlist = Netlist::new("id");
        let a = netlist.add_block("a", "clb");
        netlist.add_block("b", "clb");
        let state = PlacementState::new(&grid, &netlist);
        assert_eq!(state.block_locs.len(), 2);
        assert_eq!(state.block_loc(a), None);
        assert_eq!(state.grid_blocks.dim(), (2, 3));
        let usage = state.grid_usage(ColId::from_idx(2), RowId::from_idx(1));
        assert_eq!(usage.blocks, vec![None, None]);
        assert_eq!(usage.usage, 0);
        assert_eq!(state.num_placed(), 0);
    }
}
