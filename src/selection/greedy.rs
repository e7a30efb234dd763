//! Lazy greedy max-coverage over the coverage index.
//!
//! Selecting the node with maximum remaining coverage degree k times
//! achieves the (1 - 1/e) guarantee for monotone submodular objectives
//! (Nemhauser, Wolsey, Fisher 1978). Degrees always reflect marginal
//! coverage: covering a set decrements every other member's degree
//! exactly once, so total work is bounded by the sum of RR-set sizes.
//! Stale heap entries are re-validated on pop instead of rescanning all
//! nodes each round.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::sampling::{CoverageIndex, RrTable};
use crate::types::NodeId;

/// Ordered greedy outcome.
#[derive(Debug, Clone, Default)]
pub struct GreedySelection {
    /// Chosen seeds in selection order; duplicate-free, possibly shorter
    /// than the budget when coverage runs out.
    pub seeds: Vec<NodeId>,
    /// Cumulative spread estimate after each seed, in expected-node
    /// units (coverage fraction scaled by population). Per-step
    /// increments are non-increasing.
    pub cumulative_spread: Vec<f64>,
    /// RR sets covered by the full selection.
    pub covered_sets: usize,
}

impl GreedySelection {
    /// Spread estimate of the complete selection, zero when empty.
    pub fn total_spread(&self) -> f64 {
        self.cumulative_spread.last().copied().unwrap_or(0.0)
    }
}

// Max-heap entry: higher degree wins, ties broken toward the smaller
// node id so selection is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    gain: u32,
    node: NodeId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gain
            .cmp(&other.gain)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Select up to `k` seeds maximizing RR-set coverage.
///
/// Stops early when every remaining node has zero marginal coverage;
/// callers treat a short selection as a degenerate-sampling signal.
pub fn run_greedy(
    k: usize,
    table: &RrTable,
    index: &CoverageIndex,
    population: usize,
) -> GreedySelection {
    let m = table.len();
    let mut selection = GreedySelection::default();
    if k == 0 || m == 0 {
        return selection;
    }

    let mut degrees = index.degrees().to_vec();
    let mut covered = vec![false; m];
    let mut selected = vec![false; population];

    let mut heap = BinaryHeap::with_capacity(population);
    for (v, &d) in degrees.iter().enumerate() {
        if d > 0 {
            heap.push(Candidate {
                gain: d,
                node: v as NodeId,
            });
        }
    }

    let scale = population as f64 / m as f64;
    let mut cumulative = 0.0;

    while selection.seeds.len() < k {
        let candidate = match heap.pop() {
            Some(c) => c,
            None => break,
        };
        if selected[candidate.node as usize] {
            continue;
        }
        let current = degrees[candidate.node as usize];
        if current == 0 {
            continue;
        }
        if candidate.gain != current {
            // stale entry: degree shrank since it was pushed
            heap.push(Candidate {
                gain: current,
                node: candidate.node,
            });
            continue;
        }

        selected[candidate.node as usize] = true;
        let mut newly_covered = 0u32;
        for &set_idx in index.sets_containing(candidate.node) {
            if covered[set_idx as usize] {
                continue;
            }
            covered[set_idx as usize] = true;
            newly_covered += 1;
            for &member in table.set(set_idx as usize) {
                if member != candidate.node {
                    degrees[member as usize] -= 1;
                }
            }
        }
        degrees[candidate.node as usize] = 0;

        selection.covered_sets += newly_covered as usize;
        cumulative += newly_covered as f64 * scale;
        selection.seeds.push(candidate.node);
        selection.cumulative_spread.push(cumulative);
    }

    selection
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
    fn picks_max_degree_with_exact_gain() {
        // degrees {1:3, 2:2, 3:1}; k=1 must select node 1 with gain 3/5
        let table = table_of(&[&[1], &[1], &[1, 2], &[2], &[3]]);
        let index = CoverageIndex::build(5, &table);
        let selection = run_greedy(1, &table, &index, 5);
        assert_eq!(selection.seeds, vec![1]);
        assert!((selection.total_spread() - 3.0).abs() < 1e-12); // (3/5) * 5
    }

    #[test]
    fn degrees_reflect_marginal_coverage() {
        // after node 1 covers sets {0,1,2}, node 2's remaining degree is
        // 1 (set 3 only), so it is picked second with gain 1
        let table = table_of(&[&[1], &[1], &[1, 2], &[2], &[3]]);
        let index = CoverageIndex::build(5, &table);
        let selection = run_greedy(3, &table, &index, 5);
        assert_eq!(selection.seeds, vec![1, 2, 3]);
        assert_eq!(selection.covered_sets, 5);
        let gains: Vec<f64> = std::iter::once(selection.cumulative_spread[0])
            .chain(
                selection
                    .cumulative_spread
                    .windows(2)
                    .map(|w| w[1] - w[0]),
            )
            .collect();
        assert!((gains[0] - 3.0).abs() < 1e-12);
        assert!((gains[1] - 1.0).abs() < 1e-12);
        assert!((gains[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gains_are_non_increasing() {
        use rand::{Rng, SeedableRng};
        use rand_xoshiro::Xoshiro256PlusPlus;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let mut table = RrTable::new();
        for _ in 0..300 {
            let len = rng.random_range(0..6);
            let set: Vec<NodeId> = {
                let mut s: Vec<NodeId> = (0..len).map(|_| rng.random_range(0..40)).collect();
                s.sort_unstable();
                s.dedup();
                s
            };
            table.push(set.into(), 0, 0);
        }
        let index = CoverageIndex::build(40, &table);
        let selection = run_greedy(40, &table, &index, 40);
        let mut prev = f64::INFINITY;
        let mut last_cumulative = 0.0;
        for &c in &selection.cumulative_spread {
            let gain = c - last_cumulative;
            assert!(
                gain <= prev + 1e-9,
                "marginal gains must not increase: {} after {}",
                gain,
                prev
            );
            prev = gain;
            last_cumulative = c;
        }
    }

    #[test]
    fn deterministic_tie_break_smallest_id() {
        let table = table_of(&[&[7], &[3], &[9]]);
        let index = CoverageIndex::build(10, &table);
        let selection = run_greedy(1, &table, &index, 10);
        assert_eq!(selection.seeds, vec![3]);
    }

    #[test]
    fn never_reselects_and_stops_when_exhausted() {
        let table = table_of(&[&[0], &[0], &[1]]);
        let index = CoverageIndex::build(4, &table);
        let selection = run_greedy(4, &table, &index, 4);
        assert_eq!(selection.seeds, vec![0, 1]); // 2 and 3 gain nothing
        assert_eq!(selection.covered_sets, 3);
    }

    #[test]
    fn empty_table_yields_empty_selection() {
        let table = RrTable::new();
        let index = CoverageIndex::build(4, &table);
        let selection = run_greedy(2, &table, &index, 4);
        assert!(selection.seeds.is_empty());
        assert_eq!(selection.total_spread(), 0.0);
    }
}
