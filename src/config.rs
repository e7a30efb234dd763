//! Run configuration and validation.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_WEIGHT, DEFAULT_MIN_SETS_PER_STEP, DEFAULT_PROMOTE_WEIGHT, DEFAULT_SEED,
    MAX_ADAPTIVE_ROUNDS,
};
use crate::error::{invalid, BuildResult};
use crate::types::{BoundFix, ExecutionPolicy, SelectionRule, Strategy, WeightMode};

/// How a sample budget is split across time steps in the time-indexed
/// family.
///
/// The default weights front-load step zero heavily; they are an
/// empirically chosen policy, not an invariant, and callers may replace
/// them freely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSplit {
    /// Relative sampling weight of time step zero.
    pub promote_weight: f64,
    /// Relative sampling weight of every later step.
    pub base_weight: f64,
    /// Minimum RR sets drawn per step regardless of weight.
    pub min_sets_per_step: usize,
}

impl Default for TimeSplit {
    fn default() -> Self {
        Self {
            promote_weight: DEFAULT_PROMOTE_WEIGHT,
            base_weight: DEFAULT_BASE_WEIGHT,
            min_sets_per_step: DEFAULT_MIN_SETS_PER_STEP,
        }
    }
}

/// Configuration for an influence-maximization run.
///
/// Every strategy reads `seed_budget`, `epsilon`, `ell`, `workers` and
/// `seed`; the remaining knobs apply to the strategy families that
/// mention them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Number of seeds to select (k). For the continuous family this is
    /// superseded by `budget`.
    pub seed_budget: usize,

    /// Approximation slack: the result carries a (1 - 1/e - epsilon)
    /// guarantee. Must lie in (0, 1).
    pub epsilon: f64,

    /// Confidence exponent: the guarantee fails with probability at most
    /// 1/n^ell. Must be positive.
    pub ell: f64,

    /// Which published correction the martingale family applies in its
    /// final phase.
    pub bound_fix: BoundFix,

    /// Number of discrete time steps for the time-indexed family.
    pub horizon: usize,

    /// Per-time-step weighting for combined spread estimates.
    pub weight_mode: WeightMode,

    /// Seed-placement rule for the time-indexed family.
    pub selection_rule: SelectionRule,

    /// Sample-budget split across time steps.
    pub time_split: TimeSplit,

    /// Total activation budget for the continuous family.
    pub budget: f64,

    /// Water-filling step size for the continuous family.
    pub step: f64,

    /// Accumulate plain hit counts (single-node influence) instead of
    /// Shapley credits in the value-accumulation family.
    pub single_node_influence: bool,

    /// Sampling worker count (minimum 1; 1 means fully deterministic
    /// generation).
    pub workers: usize,

    /// Base seed for every randomness stream of the run.
    pub seed: u64,

    /// Cap on adaptive sampling rounds before giving up with a warning.
    pub max_rounds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_budget: 50,
            epsilon: 0.1,
            ell: 1.0,
            bound_fix: BoundFix::Regenerate,
            horizon: 1,
            weight_mode: WeightMode::default(),
            selection_rule: SelectionRule::default(),
            time_split: TimeSplit::default(),
            budget: 10.0,
            step: 0.1,
            single_node_influence: false,
            workers: 1,
            seed: DEFAULT_SEED,
            max_rounds: MAX_ADAPTIVE_ROUNDS,
        }
    }
}

impl Config {
    /// Reject invalid parameter combinations before any sampling starts.
    pub fn validate(&self, node_count: usize, strategy: &Strategy) -> BuildResult<()> {
        if node_count == 0 {
            return Err(invalid("graph", "graph must contain at least one node"));
        }
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(invalid(
                "epsilon",
                format!("must lie in (0, 1), got {}", self.epsilon),
            ));
        }
        if !(self.ell > 0.0 && self.ell.is_finite()) {
            return Err(invalid(
                "ell",
                format!("must be positive and finite, got {}", self.ell),
            ));
        }
        if self.workers == 0 {
            return Err(invalid("workers", "worker count must be at least 1"));
        }
        if self.max_rounds == 0 {
            return Err(invalid("max_rounds", "round cap must be at least 1"));
        }

        match strategy {
            Strategy::ContinuousBudget => {
                if !(self.budget > 0.0 && self.budget.is_finite()) {
                    return Err(invalid(
                        "budget",
                        format!("must be positive and finite, got {}", self.budget),
                    ));
                }
                if !(self.step > 0.0 && self.step.is_finite()) {
                    return Err(invalid(
                        "step",
                        format!("must be positive and finite, got {}", self.step),
                    ));
                }
            }
            _ => {
                if self.seed_budget == 0 {
                    return Err(invalid("seed_budget", "must select at least one seed"));
                }
                if self.seed_budget > node_count {
                    return Err(invalid(
                        "seed_budget",
                        format!(
                            "budget {} exceeds node count {}",
                            self.seed_budget, node_count
                        ),
                    ));
                }
            }
        }

        if matches!(strategy, Strategy::TimeIndexed) {
            if self.horizon == 0 {
                return Err(invalid("horizon", "time horizon must be at least 1"));
            }
            if !(self.time_split.promote_weight > 0.0 && self.time_split.base_weight > 0.0) {
                return Err(invalid(
                    "time_split",
                    "budget-split weights must be positive",
                ));
            }
        }

        Ok(())
    }

    /// Sampling execution policy derived from this configuration.
    pub fn policy(&self) -> ExecutionPolicy {
        ExecutionPolicy {
            workers: self.workers,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        assert!(config.validate(100, &Strategy::Martingale).is_ok());
    }

    #[test]
    fn rejects_bad_epsilon() {
        let config = Config {
            epsilon: 1.0,
            ..Config::default()
        };
        assert!(config.validate(100, &Strategy::Martingale).is_err());
    }

    #[test]
    fn rejects_budget_exceeding_population() {
        let config = Config {
            seed_budget: 11,
            ..Config::default()
        };
        assert!(config.validate(10, &Strategy::TwoPhase).is_err());
        assert!(config.validate(11, &Strategy::TwoPhase).is_ok());
    }

    #[test]
    fn continuous_checks_budget_not_seed_count() {
        let config = Config {
            seed_budget: 0,
            budget: 2.5,
            step: 0.5,
            ..Config::default()
        };
        assert!(config
            .validate(10, &Strategy::ContinuousBudget)
            .is_ok());
        let bad = Config {
            step: 0.0,
            ..config
        };
        assert!(bad.validate(10, &Strategy::ContinuousBudget).is_err());
    }

    #[test]
    fn time_indexed_requires_horizon() {
        let config = Config {
            seed_budget: 2,
            horizon: 0,
            ..Config::default()
        };
        assert!(config.validate(10, &Strategy::TimeIndexed).is_err());
    }

    #[test]
    fn zero_node_graph_rejected() {
        let config = Config::default();
        assert!(config.validate(0, &Strategy::AdaptiveDoubling).is_err());
    }
}
