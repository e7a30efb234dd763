//! Named constants used throughout the crate.

/// Default deterministic seed for RNG operations.
///
/// Same seed + same graph + same parameters = same result (with one
/// sampling worker). The value `0x696E666C` is "infl" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x696E666C;

/// 1 - 1/e, the factor lost to greedy submodular maximization.
pub const ONE_MINUS_INV_E: f64 = 1.0 - 1.0 / std::f64::consts::E;

/// Hard cap on adaptive sampling rounds. Doubling from the initial batch
/// for this many rounds exceeds any practical table size, so hitting the
/// cap means the stopping criterion is unsatisfiable and the run ends
/// with a `BoundNotMet` warning instead of looping.
pub const MAX_ADAPTIVE_ROUNDS: usize = 48;

/// RR sets generated by the first adaptive-doubling batch.
pub const INITIAL_ADAPTIVE_BATCH: usize = 512;

/// Default sampling weight for time step zero when splitting a sample
/// budget across time steps. Empirically chosen default, overridable via
/// [`crate::config::TimeSplit`].
pub const DEFAULT_PROMOTE_WEIGHT: f64 = 990.0;

/// Default sampling weight for every later time step.
pub const DEFAULT_BASE_WEIGHT: f64 = 10.0;

/// Default minimum RR sets per time step, so sparse steps still receive
/// enough draws for a stable coverage estimate.
pub const DEFAULT_MIN_SETS_PER_STEP: usize = 50;
