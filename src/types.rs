//! Shared value types for the influence-maximization core.

use serde::{Deserialize, Serialize};

/// Node identifier. Nodes are dense integers in `0..node_count`.
pub type NodeId = u32;

/// One reverse-reachable set: the nodes whose activation could have caused
/// a randomly chosen target to activate under one stochastic draw of the
/// diffusion process. Immutable once generated; may be empty.
pub type RrSet = Box<[NodeId]>;

/// Algorithm family selector.
///
/// The families share one sampling/coverage/selection core and differ only
/// in their stopping rule and selection pass, so they are a tagged variant
/// rather than a trait hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Strategy {
    /// One sampling call of a caller-specified size, one greedy pass
    /// (Borgs et al. 2014 baseline).
    Fixed {
        /// Number of RR sets to generate.
        num_samples: usize,
    },

    /// Exponentially growing sample batches with a coverage-based error
    /// criterion checked after each batch.
    AdaptiveDoubling,

    /// Two-phase schedule (Tang et al. 2014, TIM+): a cheap doubling
    /// estimate of a lower bound on optimal spread, then one exactly
    /// sized final sample.
    TwoPhase,

    /// Geometric doubling with a martingale stopping test
    /// (Tang et al. 2015, IMM). The bound fix applied in the final phase
    /// is chosen by [`crate::Config::bound_fix`].
    Martingale,

    /// Time-indexed extension: per-time-step RR tables, seeds are
    /// (node, time) pairs, spread combined across steps by a weighting
    /// function.
    TimeIndexed,

    /// Per-node value accumulation during sampling (Shapley credits, or
    /// plain hit counts for single-node influence); no retained RR table.
    ValueAccumulation,

    /// Continuous activation budget allocated by stepwise water-filling
    /// greedy under a monotone concave activation function.
    ContinuousBudget,
}

impl Strategy {
    /// Short lower-case label used for default report file names.
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Fixed { .. } => "fixed",
            Strategy::AdaptiveDoubling => "adaptive",
            Strategy::TwoPhase => "two_phase",
            Strategy::Martingale => "martingale",
            Strategy::TimeIndexed => "time_indexed",
            Strategy::ValueAccumulation => "value",
            Strategy::ContinuousBudget => "continuous",
        }
    }
}

/// Published correction applied to the martingale stopping analysis.
///
/// Both variants must remain available: they are documented fixes for the
/// same statistical dependence issue (arXiv:1808.09363) and are not known
/// to be equivalent, so callers pick one and tests exercise each
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundFix {
    /// Discard the estimation-phase RR sets and regenerate the final
    /// sample from scratch, restoring independence between phases.
    Regenerate,

    /// Reuse the estimation-phase RR sets but tighten the confidence
    /// exponent (a union bound over the two phases).
    ConfidenceSplit,
}

/// Weighting applied per time step when combining time-indexed spread
/// estimates. Default is uniform weight 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum WeightMode {
    /// Every time step contributes equally.
    #[default]
    Uniform,
    /// Weight 1/(t+1): earlier steps dominate.
    Harmonic,
    /// Weight 2^-t: sharply front-loaded.
    Geometric,
}

impl WeightMode {
    /// Weight assigned to time step `t`.
    pub fn weight(&self, t: usize) -> f64 {
        match self {
            WeightMode::Uniform => 1.0,
            WeightMode::Harmonic => 1.0 / (t as f64 + 1.0),
            WeightMode::Geometric => 0.5_f64.powi(t as i32),
        }
    }
}

/// Seed-placement rule used by the time-indexed orchestrator. All rules
/// operate on the same per-time coverage indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelectionRule {
    /// Joint lazy greedy over all (node, time) candidates; exact top-k by
    /// weighted marginal coverage.
    #[default]
    ExactTopK,
    /// Split the budget evenly across time steps, greedy within each.
    Uniform,
    /// Split the budget proportionally to decreasing weights across time
    /// steps, greedy within each.
    Decreasing,
    /// Assign each budget slot a uniformly random time step, greedy
    /// within each.
    Random,
    /// Build one merged coverage index over all time steps, greedy once,
    /// then place each chosen node at its best-scoring time.
    IndexReuse,
}

/// Worker count and base randomness source for RR-set generation.
///
/// With one worker, generation is sequential and the RR-set sequence is a
/// deterministic function of `seed`. With more workers, each worker owns a
/// private oracle reseeded from a counter-derived stream; the merged table
/// order is stable but the assignment of draws to workers makes the
/// sequence differ from the serial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPolicy {
    /// Number of concurrent sampling workers (minimum 1).
    pub workers: usize,
    /// Base seed from which all target and diffusion streams derive.
    pub seed: u64,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            workers: 1,
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}
