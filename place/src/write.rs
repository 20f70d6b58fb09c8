use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use rrforge_grid::DeviceGrid;
use tracing::info;

use crate::{
    PlaceError, Result, digest::secure_digest_file, netlist::Netlist, state::PlacementState,
};

/// Writes the placement in `state` to `place_file`, recording `net_file` and
/// `net_id` in the header, then stores the digest of the written file in
/// `state.placement_id`.
pub fn print_place(
    net_file: &str,
    net_id: &str,
    place_file: &Path,
    grid: &DeviceGrid,
    netlist: &Netlist,
    state: &mut PlacementState,
) -> Result<()> {
    let f = File::create(place_file).map_err(|source| PlaceError::Open {
        path: place_file.to_path_buf(),
        what: "placement",
        source,
    })?;
    let mut o = BufWriter::new(f);
    write_place(&mut o, net_file, net_id, grid, netlist, state)?;
    o.flush()?;
    drop(o);
    info!(
        "wrote {n} blocks to {path}",
        n = state.num_placed(),
        path = place_file.display()
    );
    state.placement_id = Some(secure_digest_file(place_file)?);
    Ok(())
}

pub fn write_place(
    o: &mut dyn Write,
    net_file: &str,
    net_id: &str,
    grid: &DeviceGrid,
    netlist: &Netlist,
    state: &PlacementState,
) -> std::io::Result<()> {
    writeln!(o, "Netlist_File: {net_file} Netlist_ID: {net_id}")?;
    writeln!(
        o,
        "Array size: {w} x {h} logic blocks",
        w = grid.width(),
        h = grid.height()
    )?;
    writeln!(o)?;
    writeln!(o, "#block name\tx\ty\tsubblk\tblock number")?;
    writeln!(o, "#----------\t--\t--\t------\t------------")?;
    for (block, name, _) in netlist.blocks.iter() {
        let Some(loc) = state.block_loc(block) else {
            continue;
        };
        write!(o, "{name}\t")?;
        if name.len() < 8 {
            write!(o, "\t")?;
        }
        writeln!(o, "{x}\t{y}\t{s}\t#{block}", x = loc.col, y = loc.row, s = loc.sub_tile)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rrforge_grid::{ColId, RowId, TileType, TileTypeId};
    use unnamed_entity::{EntityId, EntityMap};

    use super::*;
    use crate::state::BlockLoc;

    #[test]
    fn test_write_place() {
        let mut types: EntityMap<TileTypeId, String, TileType> = EntityMap::new();
        let (clb, _) = types.insert(
            "clb".to_string(),
            TileType {
                capacity: 1,
                equivalent_blocks: ["clb".to_string()].into(),
            },
        );
        let grid = DeviceGrid::new("test", types, 5, 4, clb).unwrap();
        let mut netlist = Netlist::new("net0");
        let short = netlist.add_block("lut", "clb");
        netlist.add_block("unplaced", "clb");
        let long = netlist.add_block("long_block_name", "clb");
        let mut state = PlacementState::new(&grid, &netlist);
        state.block_locs[short] = Some(BlockLoc {
            col: ColId::from_idx(1),
            row: RowId::from_idx(2),
            sub_tile: 0,
            is_fixed: false,
        });
        state.block_locs[long] = Some(BlockLoc {
            col: ColId::from_idx(4),
            row: RowId::from_idx(3),
            sub_tile: 0,
            is_fixed: true,
        });
        let mut out = vec![];
        write_place(&mut out, "design.toml", "net0", &grid, &netlist, &state).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Netlist_File: design.toml Netlist_ID: net0\n\
             Array size: 5 x 4 logic blocks\n\
             \n\
             #block name\tx\ty\tsubblk\tblock number\n\
             #----------\t--\t--\t------\t------------\n\
             lut\t\t1\t2\t0\t#0\n\
             long_block_name\t4\t3\t0\t#2\n"
        );
    }
}
