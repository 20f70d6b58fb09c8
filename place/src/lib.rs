//! Placement persistence: reading and writing the textual placement format,
//! and placement-constraint files that lock blocks to fixed locations.
//!
//! A placement file starts with a header naming the netlist it was produced
//! for and the grid size, followed by one line per block:
//!
//! ```text
//! Netlist_File: design.toml Netlist_ID: SHA256:...
//! Array size: 12 x 10 logic blocks
//!
//! #block name	x	y	subblk	block number
//! clk_in		0	3	0	#0
//! ```
//!
//! Constraints files use the same block lines without the header.

mod digest;
mod error;
pub mod netlist;
mod read;
pub mod state;
mod write;

pub use digest::{digest_bytes, secure_digest_file};
pub use error::{PlaceError, Result};
pub use netlist::{Block, BlockId, Netlist};
pub use read::{read_constraints, read_place};
pub use state::{BlockLoc, GridUsage, PlacementState};
pub use write::{print_place, write_place};
