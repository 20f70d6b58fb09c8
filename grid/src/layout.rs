use std::{fs::read_to_string, path::Path};

use serde::Deserialize;
use unnamed_entity::{EntityId, EntityMap};

use crate::{ColId, DeviceGrid, GridError, Result, RowId, TileType};

/// Textual grid description, read from TOML.
///
/// Every cell starts out as `fill`; `[[column]]` entries then override whole
/// columns (skipping the perimeter rows when a perimeter is given), after
/// which the perimeter ring and finally the four corners are applied.
#[derive(Clone, Debug, Deserialize)]
pub struct GridLayout {
    pub name: String,
    pub width: usize,
    pub height: usize,
    #[serde(rename = "tile")]
    pub tiles: Vec<TileDecl>,
    pub fill: String,
    #[serde(default)]
    pub perimeter: Option<String>,
    #[serde(default)]
    pub corner: Option<String>,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnDecl>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TileDecl {
    pub name: String,
    pub capacity: usize,
    #[serde(default)]
    pub blocks: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ColumnDecl {
    pub tile: String,
    pub start: usize,
    #[serde(default)]
    pub repeat: Option<usize>,
}

impl GridLayout {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| GridError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DeviceGrid {
    pub fn from_layout(layout: &GridLayout) -> Result<Self> {
        let mut tile_types = EntityMap::new();
        for decl in &layout.tiles {
            let tt = TileType {
                capacity: decl.capacity,
                equivalent_blocks: decl.blocks.iter().cloned().collect(),
            };
            let (_, prev) = tile_types.insert(decl.name.clone(), tt);
            if prev.is_some() {
                return Err(GridError::DuplicateTileType(decl.name.clone()));
            }
        }
        let fill = match tile_types.get(&layout.fill) {
            Some((id, _)) => id,
            None => return Err(GridError::UnknownTileType(layout.fill.clone())),
        };
        let mut grid = DeviceGrid::new(
            layout.name.clone(),
            tile_types,
            layout.width,
            layout.height,
            fill,
        )?;
        let (w, h) = (layout.width, layout.height);

        let rows = if layout.perimeter.is_some() {
            1..h.saturating_sub(1)
        } else {
            0..h
        };
        for column in &layout.columns {
            let tt = grid.get_tile_type(&column.tile)?;
            if column.start >= w {
                return Err(GridError::BadColumn {
                    tile: column.tile.clone(),
                    start: column.start,
                    reason: "starts outside the grid",
                });
            }
            let step = match column.repeat {
                Some(0) => {
                    return Err(GridError::BadColumn {
                        tile: column.tile.clone(),
                        start: column.start,
                        reason: "repeat must be positive",
                    });
                }
                Some(step) => step,
                None => w,
            };
            for col in (column.start..w).step_by(step) {
                if layout.perimeter.is_some() && (col == 0 || col == w - 1) {
                    continue;
                }
                for row in rows.clone() {
                    grid.set_tile(ColId::from_idx(col), RowId::from_idx(row), tt);
                }
            }
        }

        if w == 0 || h == 0 {
            return Ok(grid);
        }
        if let Some(ref perimeter) = layout.perimeter {
            let tt = grid.get_tile_type(perimeter)?;
            for col in grid.cols() {
                grid.set_tile(col, RowId::from_idx(0), tt);
                grid.set_tile(col, RowId::from_idx(h - 1), tt);
            }
            for row in grid.rows() {
                grid.set_tile(ColId::from_idx(0), row, tt);
                grid.set_tile(ColId::from_idx(w - 1), row, tt);
            }
        }
        if let Some(ref corner) = layout.corner {
            let tt = grid.get_tile_type(corner)?;
            for (col, row) in [(0, 0), (0, h - 1), (w - 1, 0), (w - 1, h - 1)] {
                grid.set_tile(ColId::from_idx(col), RowId::from_idx(row), tt);
            }
        }
        Ok(grid)
    }
}
