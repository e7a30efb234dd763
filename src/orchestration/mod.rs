//! Per-algorithm stopping-rule state machines.
//!
//! Every family walks the same shape: INIT -> SAMPLE(round) ->
//! CHECK_BOUND -> {loop | FINAL_SAMPLE} -> SELECT -> DONE, bounded by a
//! round cap so termination never depends on the stopping test
//! succeeding. The families differ only in how CHECK_BOUND decides the
//! required table size:
//!
//! - fixed: caller supplies the size, no check
//! - adaptive-doubling: coverage-based escalation check each batch
//! - two-phase: cheap lower-bound phase, then one exactly sized sample
//! - martingale: geometric doubling with a per-iteration test
//! - time-indexed: the martingale loop over per-time-step tables
//! - value-accumulation: the martingale loop over per-node credits
//! - continuous-budget: the martingale loop, then water-filling
//!
//! All shared mutable state (table, coverage index, accumulators) is
//! owned by one [`InfluenceMaximizer`] call at a time; `run` takes
//! `&mut self` so overlapping runs on one instance cannot compile.

mod continuous;
mod fixed;
mod martingale;
mod time_indexed;
mod two_phase;
mod value;

use std::time::Instant;

use crate::cascade::CascadeOracle;
use crate::config::Config;
use crate::error::{BuildResult, BuildWarning};
use crate::graph::Graph;
use crate::result::{Diagnostics, Outcome, SeedScore};
use crate::sampling::{add_rr_simulation, CoverageIndex, RrTable, SampleStats};
use crate::selection::GreedySelection;
use crate::types::{BoundFix, ExecutionPolicy, SelectionRule, Strategy, WeightMode};

/// Influence-maximization entry point.
///
/// Configure with the builder methods, then call [`run`](Self::run) with
/// a graph, a cascade oracle and a strategy tag.
///
/// # Example
///
/// ```ignore
/// use influence_oracle::{InfluenceMaximizer, ReverseIcCascade, Strategy};
///
/// let oracle = ReverseIcCascade::new(&graph, 7);
/// let outcome = InfluenceMaximizer::new()
///     .seed_budget(10)
///     .epsilon(0.1)
///     .run(&graph, &oracle, Strategy::Martingale)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InfluenceMaximizer {
    config: Config,
}

impl InfluenceMaximizer {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the number of seeds to select.
    pub fn seed_budget(mut self, k: usize) -> Self {
        self.config.seed_budget = k;
        self
    }

    /// Set the approximation slack epsilon.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set the confidence exponent ell.
    pub fn ell(mut self, ell: f64) -> Self {
        self.config.ell = ell;
        self
    }

    /// Choose the martingale bound fix.
    pub fn bound_fix(mut self, fix: BoundFix) -> Self {
        self.config.bound_fix = fix;
        self
    }

    /// Set the time horizon for the time-indexed family.
    pub fn horizon(mut self, steps: usize) -> Self {
        self.config.horizon = steps;
        self
    }

    /// Set the per-time-step weighting mode.
    pub fn weight_mode(mut self, mode: WeightMode) -> Self {
        self.config.weight_mode = mode;
        self
    }

    /// Set the time-indexed seed-placement rule.
    pub fn selection_rule(mut self, rule: SelectionRule) -> Self {
        self.config.selection_rule = rule;
        self
    }

    /// Set the continuous activation budget.
    pub fn budget(mut self, budget: f64) -> Self {
        self.config.budget = budget;
        self
    }

    /// Set the continuous water-filling step size.
    pub fn step(mut self, step: f64) -> Self {
        self.config.step = step;
        self
    }

    /// Accumulate plain hit counts instead of Shapley credits.
    pub fn single_node_influence(mut self, enabled: bool) -> Self {
        self.config.single_node_influence = enabled;
        self
    }

    /// Set the sampling worker count.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the base randomness seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the adaptive round cap.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.config.max_rounds = rounds;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute one full run. Parameters are validated before any
    /// sampling; the returned outcome is always complete (partial
    /// results are never exposed).
    pub fn run<G, C>(&mut self, graph: &G, oracle: &C, strategy: Strategy) -> BuildResult<Outcome>
    where
        G: Graph,
        C: CascadeOracle + Send + Sync,
    {
        self.config.validate(graph.node_count(), &strategy)?;
        let start = Instant::now();

        let mut outcome = match strategy {
            Strategy::Fixed { num_samples } => {
                fixed::run_fixed(&self.config, graph, oracle, num_samples)?
            }
            Strategy::AdaptiveDoubling => fixed::run_adaptive(&self.config, graph, oracle)?,
            Strategy::TwoPhase => two_phase::run(&self.config, graph, oracle)?,
            Strategy::Martingale => martingale::run(&self.config, graph, oracle)?,
            Strategy::TimeIndexed => time_indexed::run(&self.config, graph, oracle)?,
            Strategy::ValueAccumulation => value::run(&self.config, graph, oracle)?,
            Strategy::ContinuousBudget => continuous::run(&self.config, graph, oracle)?,
        };

        let diagnostics = outcome.diagnostics_mut();
        diagnostics.strategy = strategy;
        diagnostics.runtime_secs = start.elapsed().as_secs_f64();
        Ok(outcome)
    }
}

/// Owned sampling state threaded through a state machine: the RR table,
/// cumulative work counters, and the per-call round counter that keeps
/// every batch on a fresh randomness stream.
pub(crate) struct Sampler<'a, C: CascadeOracle + Send + Sync> {
    oracle: &'a C,
    policy: ExecutionPolicy,
    population: usize,
    pub(crate) table: RrTable,
    pub(crate) stats: SampleStats,
    round: u64,
}

impl<'a, C: CascadeOracle + Send + Sync> Sampler<'a, C> {
    pub(crate) fn new(population: usize, oracle: &'a C, policy: ExecutionPolicy) -> Self {
        Self {
            oracle,
            policy,
            population,
            table: RrTable::new(),
            stats: SampleStats::default(),
            round: 0,
        }
    }

    /// Append `count` fresh RR sets.
    pub(crate) fn sample(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let batch = add_rr_simulation(
            &mut self.table,
            self.population,
            count,
            self.oracle,
            &self.policy,
            self.round,
        );
        self.stats.merge(&batch);
        self.round += 1;
    }

    /// Grow the table to at least `target` sets. Sample counts never
    /// shrink.
    pub(crate) fn extend_to(&mut self, target: usize) {
        let current = self.table.len();
        if target > current {
            self.sample(target - current);
        }
    }

    /// Discard every stored set (the regenerate bound fix). Work
    /// counters are kept: discarded sampling still happened.
    pub(crate) fn discard_sets(&mut self) {
        self.table.clear();
    }

    /// Rebuild the coverage index wholesale from the current table.
    pub(crate) fn rebuild(&self) -> CoverageIndex {
        CoverageIndex::build(self.population, &self.table)
    }
}

/// Number of doubling iterations available before the geometric loop
/// must give up: ceil(log2 n) - 1, but at least one.
pub(crate) fn doubling_rounds(n: usize) -> usize {
    ((n as f64).log2().ceil() as usize).saturating_sub(1).max(1)
}

pub(crate) fn seed_scores(selection: &GreedySelection) -> Vec<SeedScore> {
    selection
        .seeds
        .iter()
        .zip(&selection.cumulative_spread)
        .map(|(&node, &cumulative_spread)| SeedScore {
            node,
            cumulative_spread,
        })
        .collect()
}

/// Fill a [`Diagnostics`] from sampler state and warnings gathered by a
/// state machine. Degenerate sampling (sets were drawn but none held a
/// single node) is flagged here so every family reports it uniformly.
pub(crate) fn finish_diagnostics(
    strategy: Strategy,
    stats: &SampleStats,
    rounds: usize,
    mut warnings: Vec<BuildWarning>,
) -> Diagnostics {
    if stats.sets_generated > 0 && stats.nodes_visited == 0 {
        warnings.push(BuildWarning::DegenerateSampling);
    }
    let mut diagnostics = Diagnostics::new(strategy);
    diagnostics.rr_sets = stats.sets_generated;
    diagnostics.nodes_visited = stats.nodes_visited;
    diagnostics.edges_visited = stats.edges_visited;
    diagnostics.rounds = rounds;
    diagnostics.warnings = warnings;
    diagnostics
}
