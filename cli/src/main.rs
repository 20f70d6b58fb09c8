use std::{
    error::Error,
    io::{Write, stdout},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use rrforge_clock::{ClockRrGraph, arch::ClockArch, create_and_append_clock_rr_graph};
use rrforge_grid::{DeviceGrid, layout::GridLayout};
use rrforge_place::{Netlist, PlacementState, print_place, read_constraints, read_place};
use rrforge_rrgraph::RrGraph;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "rrforge",
    about = "Clock network synthesis and placement files for island-style FPGAs."
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Synthesize the clock networks of an architecture into a routing graph.
    Clock {
        grid: PathBuf,
        arch: PathBuf,
        /// Print the routing graph and the switch locations.
        #[arg(short, long)]
        print: bool,
        /// Write the routing graph to a compressed database file.
        #[arg(short, long)]
        dump: Option<PathBuf>,
    },
    /// Read (and optionally rewrite) a placement.
    Place {
        grid: PathBuf,
        netlist: PathBuf,
        place: PathBuf,
        #[arg(short, long)]
        constraints: Option<PathBuf>,
        /// Reject placements generated for a different netlist.
        #[arg(long)]
        verify_digests: bool,
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
}

fn load_grid(path: &Path) -> Result<DeviceGrid, Box<dyn Error>> {
    let layout = GridLayout::from_file(path)?;
    let grid = DeviceGrid::from_layout(&layout)?;
    info!(
        "grid {name}: {w}x{h}, {n} tile types",
        name = grid.name,
        w = grid.width(),
        h = grid.height(),
        n = grid.tile_types.len()
    );
    Ok(grid)
}

fn run_clock(
    grid: &Path,
    arch: &Path,
    print: bool,
    dump: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let grid = load_grid(grid)?;
    let arch = ClockArch::from_file(arch)?;
    let mut rr_graph = RrGraph::new();
    let networks = arch.build_networks(&mut rr_graph)?;
    let mut clock_graph = ClockRrGraph::new();
    create_and_append_clock_rr_graph(&networks, &grid, &mut rr_graph, &mut clock_graph)?;
    info!(
        "{nn} clock networks: {n} nodes, {e} edges, {s} switch locations",
        nn = networks.len(),
        n = rr_graph.num_nodes(),
        e = rr_graph.num_edges(),
        s = clock_graph.num_entries()
    );
    if print {
        let mut o = stdout().lock();
        rr_graph.print(&mut o)?;
        clock_graph.print(&mut o)?;
        o.flush()?;
    }
    if let Some(dump) = dump {
        rr_graph.to_file(dump)?;
        info!("routing graph written to {}", dump.display());
    }
    Ok(())
}

fn run_place(
    grid: &Path,
    netlist: &Path,
    place: &Path,
    constraints: Option<&Path>,
    verify_digests: bool,
    write: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let grid = load_grid(grid)?;
    let net_file = netlist.display().to_string();
    let netlist = Netlist::from_file(netlist)?;
    info!(
        "netlist {net_file}: {n} blocks, ID {id}",
        n = netlist.blocks.len(),
        id = netlist.id
    );
    let mut state = PlacementState::new(&grid, &netlist);
    if let Some(constraints) = constraints {
        read_constraints(constraints, &grid, &netlist, &mut state)?;
        info!("{n} blocks locked", n = state.num_fixed());
    }
    read_place(&net_file, place, verify_digests, &grid, &netlist, &mut state)?;
    info!(
        "{n} of {t} blocks placed, placement ID {id}",
        n = state.num_placed(),
        t = netlist.blocks.len(),
        id = state.placement_id.as_deref().unwrap_or("-")
    );
    if let Some(out) = write {
        print_place(&net_file, &netlist.id, out, &grid, &netlist, &mut state)?;
        info!(
            "placement ID {id}",
            id = state.placement_id.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match args.command {
        Command::Clock {
            grid,
            arch,
            print,
            dump,
        } => run_clock(&grid, &arch, print, dump.as_deref()),
        Command::Place {
            grid,
            netlist,
            place,
            constraints,
            verify_digests,
            write,
        } => run_place(
            &grid,
            &netlist,
            &place,
            constraints.as_deref(),
            verify_digests,
            write.as_deref(),
        ),
    }
}
