//! Result types for influence-maximization runs.

use serde::{Deserialize, Serialize};

use crate::error::BuildWarning;
use crate::selection::NodeValue;
use crate::types::{NodeId, Strategy};

/// Work and termination record attached to every outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Strategy that produced the outcome.
    pub strategy: Strategy,
    /// RR sets generated over the whole run.
    pub rr_sets: usize,
    /// Nodes placed into generated sets.
    pub nodes_visited: u64,
    /// Edges examined by the cascade oracle.
    pub edges_visited: u64,
    /// Sampling rounds executed by the stopping state machine.
    pub rounds: usize,
    /// Wall-clock runtime of the run in seconds.
    pub runtime_secs: f64,
    /// Non-fatal conditions encountered; empty on a clean run.
    pub warnings: Vec<BuildWarning>,
}

impl Diagnostics {
    pub(crate) fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            rr_sets: 0,
            nodes_visited: 0,
            edges_visited: 0,
            rounds: 0,
            runtime_secs: 0.0,
            warnings: Vec::new(),
        }
    }

    /// True when the run completed without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// One chosen seed with its cumulative spread estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeedScore {
    /// The seed node.
    pub node: NodeId,
    /// Estimated spread of the seed prefix ending here, in expected
    /// nodes.
    pub cumulative_spread: f64,
}

/// One chosen (node, time) seed with its cumulative weighted spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSeedScore {
    /// The seed node.
    pub node: NodeId,
    /// Discrete time step at which the node is seeded.
    pub time: usize,
    /// Weighted cumulative spread of the prefix ending here.
    pub cumulative_spread: f64,
}

/// Continuous activation budget assigned to one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeBudget {
    /// The node.
    pub node: NodeId,
    /// Budget allocated to the node.
    pub budget: f64,
    /// Resulting activation probability under the concave activation
    /// function.
    pub activation: f64,
}

/// Completed result of a run. Only fully completed runs produce an
/// outcome; partial state is never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Discrete seed selection (fixed, adaptive-doubling, two-phase and
    /// martingale families).
    Seeds {
        /// Ordered seeds with cumulative spread per prefix.
        seeds: Vec<SeedScore>,
        /// Run record.
        diagnostics: Diagnostics,
    },

    /// Time-tagged seed selection (time-indexed family).
    TimedSeeds {
        /// Ordered (node, time) seeds with weighted cumulative spread.
        seeds: Vec<TimedSeedScore>,
        /// Run record.
        diagnostics: Diagnostics,
    },

    /// Per-node value ranking (Shapley / single-node-influence family).
    Ranking {
        /// Nodes ordered by accumulated value, descending.
        nodes: Vec<NodeValue>,
        /// Run record.
        diagnostics: Diagnostics,
    },

    /// Continuous budget allocation (continuous family).
    Allocation {
        /// Nodes holding nonzero budget.
        allocation: Vec<NodeBudget>,
        /// Expected spread of the full allocation, in expected nodes.
        expected_spread: f64,
        /// Run record.
        diagnostics: Diagnostics,
    },
}

impl Outcome {
    /// Run record of any outcome variant.
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Outcome::Seeds { diagnostics, .. }
            | Outcome::TimedSeeds { diagnostics, .. }
            | Outcome::Ranking { diagnostics, .. }
            | Outcome::Allocation { diagnostics, .. } => diagnostics,
        }
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        match self {
            Outcome::Seeds { diagnostics, .. }
            | Outcome::TimedSeeds { diagnostics, .. }
            | Outcome::Ranking { diagnostics, .. }
            | Outcome::Allocation { diagnostics, .. } => diagnostics,
        }
    }

    /// Estimated spread of the complete result, zero for empty results.
    pub fn total_spread(&self) -> f64 {
        match self {
            Outcome::Seeds { seeds, .. } => seeds
                .last()
                .map(|s| s.cumulative_spread)
                .unwrap_or(0.0),
            Outcome::TimedSeeds { seeds, .. } => seeds
                .last()
                .map(|s| s.cumulative_spread)
                .unwrap_or(0.0),
            Outcome::Ranking { nodes, .. } => {
                nodes.first().map(|n| n.value).unwrap_or(0.0)
            }
            Outcome::Allocation {
                expected_spread, ..
            } => *expected_spread,
        }
    }

    /// Number of selected entries (seeds, ranked nodes, or funded
    /// nodes).
    pub fn len(&self) -> usize {
        match self {
            Outcome::Seeds { seeds, .. } => seeds.len(),
            Outcome::TimedSeeds { seeds, .. } => seeds.len(),
            Outcome::Ranking { nodes, .. } => nodes.len(),
            Outcome::Allocation { allocation, .. } => allocation.len(),
        }
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_spread_of_empty_outcome_is_zero() {
        let outcome = Outcome::Seeds {
            seeds: vec![],
            diagnostics: Diagnostics::new(Strategy::AdaptiveDoubling),
        };
        assert_eq!(outcome.total_spread(), 0.0);
        assert!(outcome.is_empty());
        assert!(outcome.diagnostics().is_clean());
    }

    #[test]
    fn seeds_report_last_cumulative() {
        let outcome = Outcome::Seeds {
            seeds: vec![
                SeedScore {
                    node: 3,
                    cumulative_spread: 4.0,
                },
                SeedScore {
                    node: 1,
                    cumulative_spread: 5.5,
                },
            ],
            diagnostics: Diagnostics::new(Strategy::TwoPhase),
        };
        assert_eq!(outcome.total_spread(), 5.5);
        assert_eq!(outcome.len(), 2);
    }
}
