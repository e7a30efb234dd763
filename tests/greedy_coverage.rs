//! Coverage bookkeeping and greedy selection invariants exercised
//! through the public API.

use influence_oracle::sampling::{CoverageIndex, RrTable};
use influence_oracle::selection::{estimate_spread, run_greedy};
use influence_oracle::NodeId;

fn table_of(sets: &[&[NodeId]]) -> RrTable {
    let mut table = RrTable::new();
    for s in sets {
        table.push((*s).into(), s.first().copied().unwrap_or(0), 0);
    }
    table
}

#[test]
fn degrees_equal_membership_after_every_rebuild() {
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(404);
    let mut table = RrTable::new();
    for batch in 0..5 {
        for _ in 0..50 {
            let len = rng.random_range(0..5);
            let mut set: Vec<NodeId> = (0..len).map(|_| rng.random_range(0..20)).collect();
            set.sort_unstable();
            set.dedup();
            table.push(set.into(), 0, 0);
        }
        // rebuild wholesale after each batch and verify exactly
        let index = CoverageIndex::build(20, &table);
        for v in 0..20u32 {
            let expected = table.sets().iter().filter(|s| s.contains(&v)).count() as u32;
            assert_eq!(index.degree(v), expected, "batch {} node {}", batch, v);
        }
    }
}

#[test]
fn documented_selection_scenario() {
    // degrees {1:3, 2:2, 3:1}; greedy with k=1 selects node 1 with
    // marginal gain 3/5 of the population
    let table = table_of(&[&[1], &[1], &[1, 2], &[2], &[3]]);
    let index = CoverageIndex::build(5, &table);
    assert_eq!(index.degree(1), 3);
    assert_eq!(index.degree(2), 2);
    assert_eq!(index.degree(3), 1);

    let selection = run_greedy(1, &table, &index, 5);
    assert_eq!(selection.seeds, vec![1]);
    assert!((selection.cumulative_spread[0] - 3.0 / 5.0 * 5.0).abs() < 1e-12);
}

#[test]
fn marginal_gains_never_increase() {
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256PlusPlus;

    for seed in [1u64, 17, 99] {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let mut table = RrTable::new();
        for _ in 0..400 {
            let len = rng.random_range(1..7);
            let mut set: Vec<NodeId> = (0..len).map(|_| rng.random_range(0..50)).collect();
            set.sort_unstable();
            set.dedup();
            table.push(set.into(), 0, 0);
        }
        let index = CoverageIndex::build(50, &table);
        for k in [1usize, 5, 25, 50] {
            let selection = run_greedy(k, &table, &index, 50);
            let mut previous_gain = f64::INFINITY;
            let mut last = 0.0;
            for &cumulative in &selection.cumulative_spread {
                let gain = cumulative - last;
                assert!(gain <= previous_gain + 1e-9);
                previous_gain = gain;
                last = cumulative;
            }
        }
    }
}

#[test]
fn estimator_agrees_with_selection_record() {
    let table = table_of(&[&[0, 1], &[1], &[2, 3], &[3], &[4, 0]]);
    let index = CoverageIndex::build(5, &table);
    let selection = run_greedy(4, &table, &index, 5);
    let estimate = estimate_spread(&selection.seeds, &table, 5);
    assert_eq!(estimate.len(), selection.cumulative_spread.len());
    for (a, b) in estimate.iter().zip(&selection.cumulative_spread) {
        assert!((a - b).abs() < 1e-12);
    }
}
