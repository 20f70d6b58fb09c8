use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use unnamed_entity::{EntityId, EntityMap, entity_id};

mod error;
pub mod layout;

pub use error::{GridError, Result};

entity_id! {
    pub id ColId u16, delta;
    pub id RowId u16, delta;
    pub id TileTypeId u16;
}

pub type Coord = (ColId, RowId);

/// Largest width or height a grid may have: every column and row must be
/// addressable by a `ColId` or `RowId`.
pub const MAX_GRID_DIM: usize = u16::MAX as usize + 1;

/// A physical tile type: how many blocks it can hold, and which logical
/// block types may be placed in its sub-tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    pub capacity: usize,
    pub equivalent_blocks: BTreeSet<String>,
}

impl TileType {
    pub fn accepts(&self, block_type: &str) -> bool {
        self.equivalent_blocks.contains(block_type)
    }

    pub fn is_sub_tile_compatible(&self, block_type: &str, sub_tile: usize) -> bool {
        self.accepts(block_type) && sub_tile < self.capacity
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGrid {
    pub name: String,
    pub tile_types: EntityMap<TileTypeId, String, TileType>,
    // indexed [row, col]
    tiles: Array2<TileTypeId>,
}

impl DeviceGrid {
    pub fn new(
        name: impl Into<String>,
        tile_types: EntityMap<TileTypeId, String, TileType>,
        width: usize,
        height: usize,
        fill: TileTypeId,
    ) -> Result<Self> {
        if width > MAX_GRID_DIM || height > MAX_GRID_DIM {
            return Err(GridError::TooLarge { width, height });
        }
        Ok(DeviceGrid {
            name: name.into(),
            tile_types,
            tiles: Array2::from_elem((height, width), fill),
        })
    }

    pub fn width(&self) -> usize {
        self.tiles.ncols()
    }

    pub fn height(&self) -> usize {
        self.tiles.nrows()
    }

    pub fn cols(&self) -> impl DoubleEndedIterator<Item = ColId> + ExactSizeIterator + use<> {
        (0..self.width()).map(ColId::from_idx)
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = RowId> + ExactSizeIterator + use<> {
        (0..self.height()).map(RowId::from_idx)
    }

    pub fn contains(&self, col: ColId, row: RowId) -> bool {
        col.to_idx() < self.width() && row.to_idx() < self.height()
    }

    pub fn tile(&self, col: ColId, row: RowId) -> TileTypeId {
        self.tiles[[row.to_idx(), col.to_idx()]]
    }

    pub fn tile_type(&self, col: ColId, row: RowId) -> &TileType {
        &self.tile_types[self.tile(col, row)]
    }

    pub fn tile_type_name(&self, col: ColId, row: RowId) -> &str {
        self.tile_types.key(self.tile(col, row))
    }

    pub fn set_tile(&mut self, col: ColId, row: RowId, tt: TileTypeId) {
        self.tiles[[row.to_idx(), col.to_idx()]] = tt;
    }

    pub fn get_tile_type(&self, name: &str) -> Result<TileTypeId> {
        self.tile_types
            .get(name)
            .map(|(id, _)| id)
            .ok_or_else(|| GridError::UnknownTileType(name.to_string()))
    }
}

impl std::fmt::Display for DeviceGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "GRID {name} {w}x{h}",
            name = self.name,
            w = self.width(),
            h = self.height()
        )?;
        for (id, name, tt) in &self.tile_types {
            write!(f, "\tTILE {id} {name} CAP {cap}:", cap = tt.capacity)?;
            for block in &tt.equivalent_blocks {
                write!(f, " {block}")?;
            }
            writeln!(f)?;
        }
        for row in self.rows().rev() {
            write!(f, "\tROW {row}:")?;
            for col in self.cols() {
                write!(f, " {tt}", tt = self.tile(col, row))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn two_types() -> EntityMap<TileTypeId, String, TileType> {
        let mut types = EntityMap::new();
        types.insert("empty".to_string(), TileType::default());
        types.insert(
            "clb".to_string(),
            TileType {
                capacity: 1,
                equivalent_blocks: BTreeSet::from(["clb".to_string()]),
            },
        );
        types
    }

    #[test]
    fn test_dimensions() {
        let grid = DeviceGrid::new("t", two_types(), 5, 3, TileTypeId::from_idx(1)).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cols().len(), 5);
        assert_eq!(grid.rows().len(), 3);
        assert!(grid.contains(ColId::from_idx(4), RowId::from_idx(2)));
        assert!(!grid.contains(ColId::from_idx(5), RowId::from_idx(0)));
    }

    #[test]
    fn test_too_large() {
        let fill = TileTypeId::from_idx(1);
        let grid = DeviceGrid::new("t", two_types(), MAX_GRID_DIM, 1, fill).unwrap();
        assert_eq!(grid.cols().next_back(), Some(ColId::from_idx(MAX_GRID_DIM - 1)));
        assert_matches!(
            DeviceGrid::new("t", two_types(), 70000, 3, fill),
            Err(GridError::TooLarge { width: 70000, height: 3 })
        );
        assert_matches!(
            DeviceGrid::new("t", two_types(), 3, MAX_GRID_DIM + 1, fill),
            Err(GridError::TooLarge { .. })
        );
    }

    #[test]
    fn test_set_tile() {
        let mut grid = DeviceGrid::new("t", two_types(), 4, 4, TileTypeId::from_idx(1)).unwrap();
        let empty = grid.get_tile_type("empty").unwrap();
        grid.set_tile(ColId::from_idx(3), RowId::from_idx(1), empty);
        assert_eq!(grid.tile_type_name(ColId::from_idx(3), RowId::from_idx(1)), "empty");
        assert_eq!(grid.tile_type_name(ColId::from_idx(1), RowId::from_idx(3)), "clb");
        assert!(grid.get_tile_type("dsp").is_err());
    }

    #[test]
    fn test_sub_tile_compatible() {
        let types = two_types();
        let (_, clb) = types.get("clb").unwrap();
        assert!(clb.is_sub_tile_compatible("clb", 0));
        assert!(!clb.is_sub_tile_compatible("clb", 1));
        assert!(!clb.is_sub_tile_compatible("io", 0));
    }
}
