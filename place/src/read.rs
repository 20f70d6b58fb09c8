use std::{collections::HashSet, fs::read_to_string, path::Path};

use rrforge_grid::{ColId, DeviceGrid, RowId};
use tracing::{info, warn};
use unnamed_entity::EntityId;

use crate::{
    PlaceError, Result,
    digest::secure_digest_file,
    netlist::{BlockId, Netlist},
    state::{BlockLoc, PlacementState},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum FileKind {
    Placement,
    Constraints,
}

impl FileKind {
    fn describe(self) -> &'static str {
        match self {
            FileKind::Placement => "placement",
            FileKind::Constraints => "constraints",
        }
    }
}

/// Reads a placement file into `state`.
///
/// The header must state the grid size `grid` was built with.  A header
/// naming a different netlist ID than `netlist` is only fatal when
/// `verify_file_digests` is set.  On success, `state.placement_id` is the
/// digest of `place_file`.
pub fn read_place(
    net_file: &str,
    place_file: &Path,
    verify_file_digests: bool,
    grid: &DeviceGrid,
    netlist: &Netlist,
    state: &mut PlacementState,
) -> Result<()> {
    let text = open(place_file, FileKind::Placement)?;
    info!("reading placement {}", place_file.display());
    let reader = PlaceReader {
        path: place_file,
        grid,
        netlist,
    };
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
    reader.read_header(&mut lines, net_file, verify_file_digests)?;
    reader.read_body(lines, FileKind::Placement, state)?;
    state.placement_id = Some(secure_digest_file(place_file)?);
    Ok(())
}

/// Reads a constraints file: placement lines without a header.  Every block
/// it names is locked at its location and occupies its sub-tile.
pub fn read_constraints(
    constraints_file: &Path,
    grid: &DeviceGrid,
    netlist: &Netlist,
    state: &mut PlacementState,
) -> Result<()> {
    let text = open(constraints_file, FileKind::Constraints)?;
    info!("reading constraints {}", constraints_file.display());
    let reader = PlaceReader {
        path: constraints_file,
        grid,
        netlist,
    };
    let lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
    reader.read_body(lines, FileKind::Constraints, state)
}

fn open(path: &Path, kind: FileKind) -> Result<String> {
    read_to_string(path).map_err(|source| PlaceError::Open {
        path: path.to_path_buf(),
        what: kind.describe(),
        source,
    })
}

struct PlaceReader<'a> {
    path: &'a Path,
    grid: &'a DeviceGrid,
    netlist: &'a Netlist,
}

impl PlaceReader<'_> {
    fn error(&self, line: usize, message: impl Into<String>) -> PlaceError {
        PlaceError::Syntax {
            path: self.path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    fn parse_int(&self, line: usize, token: &str) -> Result<i64> {
        token
            .parse()
            .map_err(|_| self.error(line, format!("invalid integer '{token}'")))
    }

    fn read_header<'t>(
        &self,
        lines: &mut impl Iterator<Item = (usize, &'t str)>,
        net_file: &str,
        verify_file_digests: bool,
    ) -> Result<()> {
        let mut seen_netlist_id = false;
        let mut last_line = 0;
        for (lineno, line) in lines.by_ref() {
            last_line = lineno;
            let tokens: Vec<_> = line.split_whitespace().collect();
            match tokens[..] {
                [] => (),
                [first, ..] if first.starts_with('#') => (),
                ["Netlist_File:", place_net_file, "Netlist_ID:", place_net_id] => {
                    if seen_netlist_id {
                        return Err(
                            self.error(lineno, "duplicate Netlist_File/Netlist_ID specification")
                        );
                    }
                    seen_netlist_id = true;
                    if place_net_id != self.netlist.id {
                        let msg = format!(
                            "the netlist that generated this placement (file '{place_net_file}', ID '{place_net_id}') \
                             does not match the current netlist (file '{net_file}', ID '{id}')",
                            id = self.netlist.id,
                        );
                        if verify_file_digests {
                            return Err(self.error(lineno, msg));
                        }
                        warn!("{}:{lineno}: {msg}", self.path.display());
                    }
                }
                ["Array", "size:", width, "x", height, "logic", "blocks"] => {
                    let width = self.parse_int(lineno, width)?;
                    let height = self.parse_int(lineno, height)?;
                    if width != self.grid.width() as i64 || height != self.grid.height() as i64 {
                        return Err(self.error(
                            lineno,
                            format!(
                                "current grid size ({w} x {h}) differs from the size the placement was generated for ({width} x {height})",
                                w = self.grid.width(),
                                h = self.grid.height(),
                            ),
                        ));
                    }
                    return Ok(());
                }
                _ => {
                    return Err(self.error(lineno, format!("invalid line '{line}' in placement file header")));
                }
            }
        }
        Err(self.error(last_line, "missing 'Array size' line in placement file header"))
    }

    fn read_body<'t>(
        &self,
        lines: impl Iterator<Item = (usize, &'t str)>,
        kind: FileKind,
        state: &mut PlacementState,
    ) -> Result<()> {
        let mut seen_blocks: HashSet<BlockId> = HashSet::new();
        for (lineno, line) in lines {
            let tokens: Vec<_> = line.split_whitespace().collect();
            let (name, x, y, sub_tile) = match tokens[..] {
                [] => continue,
                [first, ..] if first.starts_with('#') => continue,
                [name, x, y, sub_tile] => (name, x, y, sub_tile),
                [name, x, y, sub_tile, comment] if comment.starts_with('#') => (name, x, y, sub_tile),
                _ => {
                    return Err(self.error(
                        lineno,
                        format!("invalid line '{line}' in {} file", kind.describe()),
                    ));
                }
            };
            let Some(block) = self.netlist.find_block(name) else {
                return Err(self.error(lineno, format!("unknown block {name}")));
            };
            let x = self.parse_int(lineno, x)?;
            let y = self.parse_int(lineno, y)?;
            let sub_tile = self.parse_int(lineno, sub_tile)?;
            if !seen_blocks.insert(block) {
                return Err(self.error(lineno, format!("block {name} is listed twice")));
            }
            if x < 0 || x >= self.grid.width() as i64 || y < 0 || y >= self.grid.height() as i64 {
                return Err(self.error(
                    lineno,
                    format!("block {name} is out of range at location ({x}, {y})"),
                ));
            }
            let (col, row) = (ColId::from_idx(x as usize), RowId::from_idx(y as usize));
            let tile = self.grid.tile_type(col, row);
            if !tile.accepts(self.netlist.block_type(block)) {
                return Err(self.error(
                    lineno,
                    format!(
                        "attempt to place block {name} at illegal location ({x}, {y}) of tile type {tt}",
                        tt = self.grid.tile_type_name(col, row),
                    ),
                ));
            }
            if sub_tile < 0 || sub_tile >= tile.capacity as i64 {
                return Err(self.error(
                    lineno,
                    format!("block {name} sub-tile number ({sub_tile}) is out of range"),
                ));
            }
            let sub_tile = sub_tile as usize;
            // a placement never unlocks what a constraints file locked
            let is_fixed = match kind {
                FileKind::Constraints => true,
                FileKind::Placement => state.block_loc(block).is_some_and(|loc| loc.is_fixed),
            };
            if kind == FileKind::Constraints {
                let usage = state.grid_usage_mut(col, row);
                if let Some(other) = usage.blocks[sub_tile] {
                    return Err(self.error(
                        lineno,
                        format!(
                            "block {name} placed on sub-tile {sub_tile} of ({x}, {y}), already occupied by {other}",
                            other = self.netlist.block_name(other),
                        ),
                    ));
                }
                usage.blocks[sub_tile] = Some(block);
                usage.usage += 1;
            }
            state.block_locs[block] = Some(BlockLoc {
                col,
                row,
                sub_tile,
                is_fixed,
            });
        }
        Ok(())
    }
}
