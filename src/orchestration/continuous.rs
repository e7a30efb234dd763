//! Continuous-budget state machine.
//!
//! Instead of k discrete seeds, a total activation budget is spread over
//! nodes in `step`-sized increments. A node holding budget b activates
//! with probability p(b) = 1 - e^-b: monotone, concave, and saturating,
//! so water-filling greedy applies. An RR set survives an allocation
//! with probability prod (1 - p(b_v)) = e^-(sum of member budgets), and
//! the expected spread is the population-scaled average of 1 - survival
//! over the table. Each step therefore goes to the node maximizing the
//! summed survival of its sets, with stale heap entries re-validated on
//! pop exactly like the discrete greedy.
//!
//! The sample size is fixed by the martingale loop run with the ceiling
//! of the budget as a discrete proxy for k.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::bounds;
use crate::cascade::CascadeOracle;
use crate::config::Config;
use crate::error::{BuildResult, BuildWarning};
use crate::graph::Graph;
use crate::orchestration::{doubling_rounds, finish_diagnostics, Sampler};
use crate::result::{NodeBudget, Outcome};
use crate::sampling::{CoverageIndex, RrTable};
use crate::selection::run_greedy;
use crate::types::{NodeId, Strategy};

/// Activation probability of a node holding budget `b`.
fn activation(b: f64) -> f64 {
    1.0 - (-b).exp()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    weight: f64,
    node: NodeId,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stepwise water-filling allocation of `budget` over the table.
///
/// Returns per-node budgets and the expected spread of the final
/// allocation.
fn water_fill(
    table: &RrTable,
    index: &CoverageIndex,
    population: usize,
    budget: f64,
    step: f64,
) -> (Vec<f64>, f64) {
    let m = table.len();
    let mut allocation = vec![0.0; population];
    if m == 0 {
        return (allocation, 0.0);
    }

    // survival[i] = probability set i is missed by the current
    // allocation; cover[v] = sum of survival over sets containing v,
    // the exact marginal-rank of v (up to the shared 1 - e^-step
    // factor).
    let mut survival = vec![1.0f64; m];
    let mut cover: Vec<f64> = (0..population)
        .map(|v| index.degree(v as NodeId) as f64)
        .collect();

    let mut heap = BinaryHeap::with_capacity(population);
    for (v, &c) in cover.iter().enumerate() {
        if c > 0.0 {
            heap.push(Candidate {
                weight: c,
                node: v as NodeId,
            });
        }
    }

    let mut remaining = budget;
    while remaining > 1e-12 {
        let delta = step.min(remaining);
        let keep = (-delta).exp();

        // pop until a fresh entry surfaces; cover only decreases, so a
        // mismatched weight means the entry is stale
        let node = loop {
            match heap.pop() {
                Some(candidate) => {
                    let current = cover[candidate.node as usize];
                    if current <= 0.0 {
                        continue;
                    }
                    if candidate.weight > current + 1e-9 {
                        heap.push(Candidate {
                            weight: current,
                            node: candidate.node,
                        });
                        continue;
                    }
                    break Some(candidate.node);
                }
                None => break None,
            }
        };
        let node = match node {
            Some(v) => v,
            None => break, // nothing left with positive marginal value
        };

        for &set_idx in index.sets_containing(node) {
            let old = survival[set_idx as usize];
            let drop = old * (1.0 - keep);
            if drop == 0.0 {
                continue;
            }
            survival[set_idx as usize] = old * keep;
            for &member in table.set(set_idx as usize) {
                cover[member as usize] = (cover[member as usize] - drop).max(0.0);
            }
        }

        allocation[node as usize] += delta;
        remaining -= delta;
        if cover[node as usize] > 0.0 {
            heap.push(Candidate {
                weight: cover[node as usize],
                node,
            });
        }
    }

    let missed: f64 = survival.iter().sum();
    let expected = (m as f64 - missed) / m as f64 * population as f64;
    (allocation, expected)
}

pub(crate) fn run<G, C>(config: &Config, graph: &G, oracle: &C) -> BuildResult<Outcome>
where
    G: Graph,
    C: CascadeOracle + Send + Sync,
{
    let population = graph.node_count();
    let n = population as f64;
    // discrete proxy for the sample-complexity bounds
    let k = (config.budget.ceil() as usize).clamp(1, population);

    let eps_prime = std::f64::consts::SQRT_2 * config.epsilon;
    let lambda_prime = bounds::lambda_prime(eps_prime, k, config.ell, population)?;
    let lambda_star = bounds::lambda_star(config.epsilon, k, config.ell, population)?;

    let mut sampler = Sampler::new(population, oracle, config.policy());
    let mut warnings = Vec::new();
    let mut rounds = 0;
    let mut lower_bound = None;
    let mut last_estimate = 0.0;

    let max_rounds = doubling_rounds(population).min(config.max_rounds);
    for i in 1..=max_rounds as i32 {
        rounds += 1;
        let x = n / 2f64.powi(i);
        let theta_i = (lambda_prime / x).ceil() as usize;
        sampler.extend_to(theta_i);

        let index = sampler.rebuild();
        let selection = run_greedy(k, &sampler.table, &index, population);
        last_estimate = selection.total_spread();

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
    sampler.extend_to(theta);
    rounds += 1;

    let index = sampler.rebuild();
    let (budgets, expected_spread) = water_fill(
        &sampler.table,
        &index,
        population,
        config.budget,
        config.step,
    );

    let allocation: Vec<NodeBudget> = budgets
        .iter()
        .enumerate()
        .filter(|(_, &b)| b > 0.0)
        .map(|(v, &b)| NodeBudget {
            node: v as NodeId,
            budget: b,
            activation: activation(b),
        })
        .collect();

    let diagnostics =
        finish_diagnostics(Strategy::ContinuousBudget, &sampler.stats, rounds, warnings);
    Ok(Outcome::Allocation {
        allocation,
        expected_spread,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(sets: &[&[NodeId]]) -> RrTable {
        let mut table = RrTable::new();
        for s in sets {
            table.push((*s).into(), s.first().copied().unwrap_or(0), 0);
        }
        table
    }

    #[test]
    fn activation_is_concave_and_bounded() {
        assert_eq!(activation(0.0), 0.0);
        assert!(activation(100.0) < 1.0);
        let first = activation(1.0) - activation(0.0);
        let second = activation(2.0) - activation(1.0);
        assert!(second < first);
    }

    #[test]
    fn water_fill_favors_the_covering_node() {
        let table = table_of(&[&[1], &[1], &[1, 2], &[2], &[3]]);
        let index = CoverageIndex::build(5, &table);
        let (allocation, expected) = water_fill(&table, &index, 5, 2.0, 0.5);
        // node 1 has the largest initial marginal rank
        assert!(allocation[1] > 0.0);
        let total: f64 = allocation.iter().sum();
        assert!((total - 2.0).abs() < 1e-9);
        assert!(expected > 0.0);
        assert!(expected <= 5.0 + 1e-9);
    }

    #[test]
    fn water_fill_spends_the_whole_budget() {
        let table = table_of(&[&[0, 1], &[2]]);
        let index = CoverageIndex::build(3, &table);
        let (allocation, _) = water_fill(&table, &index, 3, 1.3, 0.5);
        let total: f64 = allocation.iter().sum();
        assert!((total - 1.3).abs() < 1e-9);
    }

    #[test]
    fn water_fill_empty_table_is_zero() {
        let table = RrTable::new();
        let index = CoverageIndex::build(3, &table);
        let (allocation, expected) = water_fill(&table, &index, 3, 1.0, 0.25);
        assert!(allocation.iter().all(|&b| b == 0.0));
        assert_eq!(expected, 0.0);
    }

    #[test]
    fn end_to_end_allocation_on_chain() {
        use crate::cascade::ReverseIcCascade;
        use crate::graph::AdjacencyGraph;
        use crate::{InfluenceMaximizer, Outcome};

        let g = AdjacencyGraph::from_edges(5, (0..4).map(|i| (i, i + 1, 1.0))).unwrap();
        let oracle = ReverseIcCascade::new(&g, 31);
        let outcome = InfluenceMaximizer::new()
            .budget(2.0)
            .step(0.25)
            .epsilon(0.3)
            .run(&g, &oracle, Strategy::ContinuousBudget)
            .unwrap();
        match outcome {
            Outcome::Allocation {
                allocation,
                expected_spread,
                ..
            } => {
                // the chain head soaks up budget first
                assert_eq!(allocation[0].node, 0);
                assert!(allocation[0].budget > 0.0);
                assert!(expected_spread > 0.0);
                assert!(expected_spread <= 5.0 + 1e-9);
                for entry in &allocation {
                    assert!(entry.activation > 0.0 && entry.activation < 1.0);
                }
            }
            other => panic!("expected Allocation, got {:?}", other),
        }
    }
}
