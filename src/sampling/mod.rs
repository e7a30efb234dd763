//! RR-set sampling: table storage, coverage bookkeeping, and parallel
//! generation.

mod engine;
mod table;

pub use engine::{add_rr_simulation, add_value_simulation, counter_rng_seed, SampleStats};
pub use table::{CoverageIndex, RrTable};
