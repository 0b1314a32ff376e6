//! Technology mapping of and-inverter graphs onto 6-input lookup tables.
//!
//! Two subsystems make up the crate: a generic netlist substrate
//! ([`netlist::Netlist`]) — a paged, typed gate graph with literal-valued
//! edges, automatic numbering, garbage collection with compaction, a
//! listener bus and mode-restricted gate alphabets — and a priority-cut
//! mapper ([`lutmap::lut_map`]) that covers the AND layer with 6-feasible
//! cones over several delay/area refinement rounds, then rewrites the
//! chosen cover into LUT6 gates carrying 64-bit function tables.

pub mod ftb;
pub mod gate;
pub mod lit;
pub mod lutmap;
pub mod netlist;

pub use gate::{GateKind, Mode};
pub use lit::Lit;
pub use lutmap::{lut_map, MapStats, Params};
pub use netlist::Netlist;
