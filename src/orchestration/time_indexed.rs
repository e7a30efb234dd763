//! Time-indexed state machine: seeds are (node, time) pairs.
//!
//! Coverage and RR tables are kept per discrete time step; a seed placed
//! at time t only covers time-t sets, and per-time spread estimates are
//! combined through the configured weighting function. The sampling
//! budget is split across steps by the configurable promote/base
//! weights. Five seed-placement rules share the same per-time coverage
//! indices; the stopping loop is the shared geometric-martingale shape
//! evaluated with the exact top-k rule.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::bounds;
use crate::cascade::CascadeOracle;
use crate::config::Config;
use crate::error::{BuildResult, BuildWarning};
use crate::graph::Graph;
use crate::orchestration::{doubling_rounds, finish_diagnostics};
use crate::result::{Outcome, TimedSeedScore};
use crate::sampling::{
    add_rr_simulation, counter_rng_seed, CoverageIndex, RrTable, SampleStats,
};
use crate::selection::{estimate_spread_timed, run_greedy};
use crate::types::{ExecutionPolicy, NodeId, SelectionRule, Strategy};

// stream index reserved for the random placement rule, distinct from
// any sampling round
const PLACEMENT_STREAM: u64 = u64::MAX;

struct TimeTables<'a, C: CascadeOracle + Send + Sync> {
    oracle: &'a C,
    policy: ExecutionPolicy,
    population: usize,
    shares: Vec<f64>,
    min_sets: usize,
    tables: Vec<RrTable>,
    stats: SampleStats,
    engine_round: u64,
}

impl<'a, C: CascadeOracle + Send + Sync> TimeTables<'a, C> {
    fn new(config: &Config, population: usize, oracle: &'a C) -> Self {
        let horizon = config.horizon;
        let split = &config.time_split;
        let raw: Vec<f64> = (0..horizon)
            .map(|t| {
                if t == 0 {
                    split.promote_weight
                } else {
                    split.base_weight
                }
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        Self {
            oracle,
            policy: config.policy(),
            population,
            shares: raw.iter().map(|w| w / sum).collect(),
            min_sets: split.min_sets_per_step,
            tables: (0..horizon).map(|_| RrTable::new()).collect(),
            stats: SampleStats::default(),
            engine_round: 0,
        }
    }

    /// Grow every per-time table to its share of `target_total` sets.
    fn extend_to_total(&mut self, target_total: usize) {
        for t in 0..self.tables.len() {
            let target = ((target_total as f64 * self.shares[t]).ceil() as usize)
                .max(self.min_sets);
            let current = self.tables[t].len();
            if target > current {
                let batch = add_rr_simulation(
                    &mut self.tables[t],
                    self.population,
                    target - current,
                    self.oracle,
                    &self.policy,
                    self.engine_round,
                );
                self.stats.merge(&batch);
                self.engine_round += 1;
            }
        }
    }

    fn rebuild(&self) -> Vec<CoverageIndex> {
        self.tables
            .iter()
            .map(|table| CoverageIndex::build(self.population, table))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimedCandidate {
    weight: f64,
    gain: u32,
    time: u32,
    node: NodeId,
}

impl Eq for TimedCandidate {}

impl Ord for TimedCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.time.cmp(&self.time))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for TimedCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Joint lazy greedy over every (node, time) candidate, gains weighted
/// per time step.
fn select_exact_topk(
    k: usize,
    tables: &[RrTable],
    indices: &[CoverageIndex],
    weights: &[f64],
    population: usize,
) -> Vec<(NodeId, usize)> {
    let horizon = tables.len();
    let mut degrees: Vec<Vec<u32>> = indices.iter().map(|i| i.degrees().to_vec()).collect();
    let mut covered: Vec<Vec<bool>> = tables.iter().map(|t| vec![false; t.len()]).collect();
    let mut selected: Vec<Vec<bool>> = (0..horizon).map(|_| vec![false; population]).collect();
    let scales: Vec<f64> = (0..horizon)
        .map(|t| {
            let m = tables[t].len();
            if m == 0 {
                0.0
            } else {
                weights[t] * population as f64 / m as f64
            }
        })
        .collect();

    let mut heap = BinaryHeap::new();
    for t in 0..horizon {
        if scales[t] == 0.0 {
            continue;
        }
        for (v, &d) in degrees[t].iter().enumerate() {
            if d > 0 {
                heap.push(TimedCandidate {
                    weight: d as f64 * scales[t],
                    gain: d,
                    time: t as u32,
                    node: v as NodeId,
                });
            }
        }
    }

    let mut seeds = Vec::with_capacity(k);
    while seeds.len() < k {
        let candidate = match heap.pop() {
            Some(c) => c,
            None => break,
        };
        let t = candidate.time as usize;
        if selected[t][candidate.node as usize] {
            continue;
        }
        let current = degrees[t][candidate.node as usize];
        if current == 0 {
            continue;
        }
        if candidate.gain != current {
            heap.push(TimedCandidate {
                weight: current as f64 * scales[t],
                gain: current,
                time: candidate.time,
                node: candidate.node,
            });
            continue;
        }

        selected[t][candidate.node as usize] = true;
        for &set_idx in indices[t].sets_containing(candidate.node) {
            if covered[t][set_idx as usize] {
                continue;
            }
            covered[t][set_idx as usize] = true;
            for &member in tables[t].set(set_idx as usize) {
                if member != candidate.node {
                    degrees[t][member as usize] -= 1;
                }
            }
        }
        degrees[t][candidate.node as usize] = 0;
        seeds.push((candidate.node, t));
    }
    seeds
}

/// Greedy within each time step under a fixed per-step budget.
fn select_per_time(
    counts: &[usize],
    tables: &[RrTable],
    indices: &[CoverageIndex],
    population: usize,
) -> Vec<(NodeId, usize)> {
    let mut seeds = Vec::new();
    for (t, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let selection = run_greedy(count, &tables[t], &indices[t], population);
        seeds.extend(selection.seeds.iter().map(|&v| (v, t)));
    }
    seeds
}

fn uniform_counts(k: usize, horizon: usize) -> Vec<usize> {
    let base = k / horizon;
    let rem = k % horizon;
    (0..horizon).map(|t| base + usize::from(t < rem)).collect()
}

fn decreasing_counts(k: usize, horizon: usize) -> Vec<usize> {
    let total: usize = (1..=horizon).sum();
    let mut counts: Vec<usize> = (0..horizon)
        .map(|t| k * (horizon - t) / total)
        .collect();
    let mut assigned: usize = counts.iter().sum();
    let mut t = 0;
    while assigned < k {
        counts[t] += 1;
        assigned += 1;
        t = (t + 1) % horizon;
    }
    counts
}

fn random_counts(k: usize, horizon: usize, seed: u64) -> Vec<usize> {
    let mut rng =
        Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, PLACEMENT_STREAM));
    let mut counts = vec![0usize; horizon];
    for _ in 0..k {
        counts[rng.random_range(0..horizon)] += 1;
    }
    counts
}

/// Greedy once over the merged table, then place each chosen node at its
/// best-scoring time step.
fn select_index_reuse(
    k: usize,
    tables: &[RrTable],
    indices: &[CoverageIndex],
    weights: &[f64],
    population: usize,
) -> Vec<(NodeId, usize)> {
    let mut merged = RrTable::new();
    for table in tables {
        for (i, set) in table.sets().iter().enumerate() {
            merged.push(set.clone(), table.targets()[i], table.widths()[i]);
        }
    }
    let merged_index = CoverageIndex::build(population, &merged);
    let selection = run_greedy(k, &merged, &merged_index, population);

    selection
        .seeds
        .iter()
        .map(|&v| {
            let best = (0..tables.len())
                .max_by(|&a, &b| {
                    let score = |t: usize| {
                        let m = tables[t].len();
                        if m == 0 {
                            0.0
                        } else {
                            weights[t] * indices[t].degree(v) as f64 / m as f64
                        }
                    };
                    score(a)
                        .total_cmp(&score(b))
                        .then_with(|| b.cmp(&a)) // prefer the earlier step on ties
                })
                .unwrap_or(0);
            (v, best)
        })
        .collect()
}

pub(crate) fn run<G, C>(config: &Config, graph: &G, oracle: &C) -> BuildResult<Outcome>
where
    G: Graph,
    C: CascadeOracle + Send + Sync,
{
    let population = graph.node_count();
    let n = population as f64;
    let k = config.seed_budget;
    let horizon = config.horizon;
    let weights: Vec<f64> = (0..horizon).map(|t| config.weight_mode.weight(t)).collect();

    let eps_prime = std::f64::consts::SQRT_2 * config.epsilon;
    let lambda_prime = bounds::lambda_prime(eps_prime, k, config.ell, population)?;
    let lambda_star = bounds::lambda_star(config.epsilon, k, config.ell, population)?;

    let mut time_tables = TimeTables::new(config, population, oracle);
    let mut warnings = Vec::new();
    let mut rounds = 0;
    let mut lower_bound = None;
    let mut last_estimate = 0.0;

    let max_rounds = doubling_rounds(population).min(config.max_rounds);
    for i in 1..=max_rounds as i32 {
        rounds += 1;
        let x = n / 2f64.powi(i);
        let theta_i = (lambda_prime / x).ceil() as usize;
        time_tables.extend_to_total(theta_i);

        let indices = time_tables.rebuild();
        let seeds = select_exact_topk(k, &time_tables.tables, &indices, &weights, population);
        let spread =
            estimate_spread_timed(&seeds, &time_tables.tables, &weights, population);
        last_estimate = spread.last().copied().unwrap_or(0.0);

        if last_estimate >= (1.0 + eps_prime) * x {
            lower_bound = Some(last_estimate / (1.0 + eps_prime));
            break;
        }
    }

    let lower_bound = match lower_bound {
        Some(lb) => lb,
        None => {
            warnings.push(BuildWarning::BoundNotMet { rounds });
            (last_estimate / (1.0 + eps_prime)).max(1.0)
        }
    };

    let theta = (lambda_star / lower_bound).ceil() as usize;
    time_tables.extend_to_total(theta);
    rounds += 1;

    let indices = time_tables.rebuild();
    let seeds = match config.selection_rule {
        SelectionRule::ExactTopK => {
            select_exact_topk(k, &time_tables.tables, &indices, &weights, population)
        }
        SelectionRule::Uniform => select_per_time(
            &uniform_counts(k, horizon),
            &time_tables.tables,
            &indices,
            population,
        ),
        SelectionRule::Decreasing => select_per_time(
            &decreasing_counts(k, horizon),
            &time_tables.tables,
            &indices,
            population,
        ),
        SelectionRule::Random => select_per_time(
            &random_counts(k, horizon, config.seed),
            &time_tables.tables,
            &indices,
            population,
        ),
        SelectionRule::IndexReuse => {
            select_index_reuse(k, &time_tables.tables, &indices, &weights, population)
        }
    };

    let cumulative = estimate_spread_timed(&seeds, &time_tables.tables, &weights, population);
    let seeds: Vec<TimedSeedScore> = seeds
        .iter()
        .zip(&cumulative)
        .map(|(&(node, time), &cumulative_spread)| TimedSeedScore {
            node,
            time,
            cumulative_spread,
        })
        .collect();

    let diagnostics =
        finish_diagnostics(Strategy::TimeIndexed, &time_tables.stats, rounds, warnings);
    Ok(Outcome::TimedSeeds { seeds, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_counts_split_evenly() {
        assert_eq!(uniform_counts(7, 3), vec![3, 2, 2]);
        assert_eq!(uniform_counts(2, 4), vec![1, 1, 0, 0]);
    }

    #[test]
    fn decreasing_counts_front_load() {
        let counts = decreasing_counts(6, 3);
        assert_eq!(counts.iter().sum::<usize>(), 6);
        assert!(counts[0] >= counts[1] && counts[1] >= counts[2]);
    }

    #[test]
    fn random_counts_are_deterministic_per_seed() {
        let a = random_counts(10, 4, 7);
        let b = random_counts(10, 4, 7);
        assert_eq!(a, b);
        assert_eq!(a.iter().sum::<usize>(), 10);
    }

    #[test]
    fn exact_topk_prefers_weighted_step() {
        // identical coverage at both steps, but step 0 carries twice the
        // weight, so the first seed lands there
        let table0 = {
            let mut t = RrTable::new();
            t.push(Box::new([1]), 1, 0);
            t.push(Box::new([1]), 1, 0);
            t
        };
        let table1 = table0.clone();
        let tables = [table0, table1];
        let indices = [
            CoverageIndex::build(3, &tables[0]),
            CoverageIndex::build(3, &tables[1]),
        ];
        let seeds = select_exact_topk(1, &tables, &indices, &[1.0, 0.5], 3);
        assert_eq!(seeds, vec![(1, 0)]);
    }
}
