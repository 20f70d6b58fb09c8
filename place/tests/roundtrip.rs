use std::fs;

use assert_matches::assert_matches;
use rrforge_grid::{ColId, DeviceGrid, RowId, layout::GridLayout};
use rrforge_place::{
    BlockLoc, Netlist, PlaceError, PlacementState, print_place, read_constraints, read_place,
    secure_digest_file,
};
use unnamed_entity::EntityId;

const LAYOUT: &str = r#"
name = "small"
width = 6
height = 5
fill = "clb"
perimeter = "io"
corner = "empty"

[[tile]]
name = "empty"
capacity = 0

[[tile]]
name = "io"
capacity = 2
blocks = ["io"]

[[tile]]
name = "clb"
capacity = 1
blocks = ["clb"]
"#;

const NETLIST: &str = r#"
[[block]]
name = "clk_in"
type = "io"

[[block]]
name = "counter_lut_0"
type = "clb"

[[block]]
name = "q"
type = "io"

[[block]]
name = "spare"
type = "clb"
"#;

fn setup(dir: &std::path::Path) -> (DeviceGrid, Netlist) {
    let layout: GridLayout = toml::from_str(LAYOUT).unwrap();
    let grid = DeviceGrid::from_layout(&layout).unwrap();
    let net_path = dir.join("design.toml");
    fs::write(&net_path, NETLIST).unwrap();
    let netlist = Netlist::from_file(&net_path).unwrap();
    (grid, netlist)
}

fn loc(col: usize, row: usize, sub_tile: usize) -> BlockLoc {
    BlockLoc {
        col: ColId::from_idx(col),
        row: RowId::from_idx(row),
        sub_tile,
        is_fixed: false,
    }
}

fn locs(state: &PlacementState) -> Vec<Option<BlockLoc>> {
    state.block_locs.values().copied().collect()
}

#[test]
fn placement_survives_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (grid, netlist) = setup(dir.path());
    let mut state = PlacementState::new(&grid, &netlist);
    let clk = netlist.find_block("clk_in").unwrap();
    let lut = netlist.find_block("counter_lut_0").unwrap();
    let q = netlist.find_block("q").unwrap();
    state.block_locs[clk] = Some(loc(0, 2, 1));
    state.block_locs[lut] = Some(loc(3, 2, 0));
    state.block_locs[q] = Some(loc(5, 1, 0));

    let place = dir.path().join("design.place");
    print_place("design.toml", &netlist.id, &place, &grid, &netlist, &mut state).unwrap();
    let written_id = state.placement_id.clone().unwrap();
    assert_eq!(written_id, secure_digest_file(&place).unwrap());

    let mut reread = PlacementState::new(&grid, &netlist);
    read_place("design.toml", &place, true, &grid, &netlist, &mut reread).unwrap();
    assert_eq!(locs(&reread), locs(&state));
    assert_eq!(reread.placement_id, Some(written_id));
    assert_eq!(reread.num_placed(), 3);
}

#[test]
fn stale_netlist_id_is_fatal_only_when_verifying() {
    let dir = tempfile::tempdir().unwrap();
    let (grid, netlist) = setup(dir.path());
    let mut state = PlacementState::new(&grid, &netlist);
    state.block_locs[netlist.find_block("spare").unwrap()] = Some(loc(2, 3, 0));

    let place = dir.path().join("old.place");
    print_place("design.toml", "SHA256:stale", &place, &grid, &netlist, &mut state).unwrap();

    let mut reread = PlacementState::new(&grid, &netlist);
    assert_matches!(
        read_place("design.toml", &place, true, &grid, &netlist, &mut reread),
        Err(PlaceError::Syntax { line: 1, .. })
    );
    read_place("design.toml", &place, false, &grid, &netlist, &mut reread).unwrap();
    assert_eq!(locs(&reread), locs(&state));
}

#[test]
fn grid_size_must_match() {
    let dir = tempfile::tempdir().unwrap();
    let (grid, netlist) = setup(dir.path());
    let place = dir.path().join("big.place");
    fs::write(
        &place,
        format!("Netlist_File: design.toml Netlist_ID: {}\nArray size: 8 x 5 logic blocks\n", netlist.id),
    )
    .unwrap();
    let mut state = PlacementState::new(&grid, &netlist);
    assert_matches!(
        read_place("design.toml", &place, true, &grid, &netlist, &mut state),
        Err(PlaceError::Syntax { line: 2, .. })
    );
    assert_eq!(state.placement_id, None);
}

#[test]
fn constraints_lock_blocks_before_placement() {
    let dir = tempfile::tempdir().unwrap();
    let (grid, netlist) = setup(dir.path());
    let constraints = dir.path().join("fixed.place");
    fs::write(&constraints, "# pads\nclk_in 0 2 1\nq\t5\t1\t0\t#2\n").unwrap();
    let mut state = PlacementState::new(&grid, &netlist);
    read_constraints(&constraints, &grid, &netlist, &mut state).unwrap();
    assert_eq!(state.num_fixed(), 2);
    let clk = netlist.find_block("clk_in").unwrap();
    let usage = state.grid_usage(ColId::from_idx(0), RowId::from_idx(2));
    assert_eq!(usage.blocks, vec![None, Some(clk)]);
    assert_eq!(usage.usage, 1);

    let place = dir.path().join("design.place");
    print_place("design.toml", &netlist.id, &place, &grid, &netlist, &mut state).unwrap();
    let text = fs::read_to_string(&place).unwrap();
    assert!(text.contains("clk_in\t\t0\t2\t1\t#0\n"));
    assert!(text.contains("q\t\t5\t1\t0\t#2\n"));
    assert!(!text.contains("spare"));
}

#[test]
fn incompatible_tile_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (grid, netlist) = setup(dir.path());
    let constraints = dir.path().join("bad.place");
    // io block on a clb tile, then a clb block on the empty corner
    for body in ["clk_in 2 2 0\n", "spare 0 0 0\n"] {
        fs::write(&constraints, body).unwrap();
        let mut state = PlacementState::new(&grid, &netlist);
        assert_matches!(
            read_constraints(&constraints, &grid, &netlist, &mut state),
            Err(PlaceError::Syntax { line: 1, .. })
        );
    }
}

#[test]
fn placement_keeps_constraint_locks() {
    let dir = tempfile::tempdir().unwrap();
    let (grid, netlist) = setup(dir.path());
    let constraints = dir.path().join("fixed.place");
    fs::write(&constraints, "clk_in 0 2 1\n").unwrap();
    let place = dir.path().join("design.place");
    fs::write(
        &place,
        format!(
            "Netlist_File: design.toml Netlist_ID: {}\nArray size: 6 x 5 logic blocks\n\n\
             clk_in 0 2 1\ncounter_lut_0 3 2 0\n",
            netlist.id
        ),
    )
    .unwrap();

    let mut state = PlacementState::new(&grid, &netlist);
    read_constraints(&constraints, &grid, &netlist, &mut state).unwrap();
    assert_eq!(state.num_fixed(), 1);
    read_place("design.toml", &place, true, &grid, &netlist, &mut state).unwrap();
    assert_eq!(state.num_fixed(), 1);
    assert_eq!(state.num_placed(), 2);
    let clk = netlist.find_block("clk_in").unwrap();
    let lut = netlist.find_block("counter_lut_0").unwrap();
    assert!(state.block_loc(clk).unwrap().is_fixed);
    assert!(!state.block_loc(lut).unwrap().is_fixed);
}
