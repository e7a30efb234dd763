//! Seed selection: greedy max-coverage, spread estimation, and per-node
//! value accumulation.

mod estimate;
mod greedy;
mod shapley;

pub use estimate::{estimate_spread, estimate_spread_timed};
pub use greedy::{run_greedy, GreedySelection};
pub use shapley::{CreditMode, NodeValue, ValueAccumulator};
