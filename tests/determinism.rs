//! Reproducibility guarantees: fixed seeds reproduce draws, serial runs
//! reproduce results, and parallel generation preserves the estimate.

use influence_oracle::sampling::{add_rr_simulation, RrTable};
use influence_oracle::{
    AdjacencyGraph, CascadeOracle, ExecutionPolicy, InfluenceMaximizer, Outcome,
    ReverseIcCascade, Strategy,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn random_graph(n: usize, edge_prob: f64, weight: f64, seed: u64) -> AdjacencyGraph {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut graph = AdjacencyGraph::new(n);
    for u in 0..n as u32 {
        for v in 0..n as u32 {
            if u != v && rng.random::<f64>() < edge_prob {
                graph.add_edge(u, v, weight).unwrap();
            }
        }
    }
    graph
}

#[test]
fn reverse_sample_is_deterministic_under_fixed_seed() {
    let graph = random_graph(30, 0.15, 0.4, 1);
    let mut oracle = ReverseIcCascade::new(&graph, 12345);

    let mut first = Vec::new();
    let mut second = Vec::new();
    for target in [0u32, 7, 13, 29] {
        oracle.reseed(999);
        let mut out = Vec::new();
        oracle.reverse_sample(target, &mut out);
        first.push(out.clone());
        oracle.reseed(999);
        oracle.reverse_sample(target, &mut out);
        second.push(out);
    }
    assert_eq!(first, second);
}

#[test]
fn serial_runs_reproduce_identical_outcomes() {
    let graph = random_graph(25, 0.2, 0.3, 2);
    let oracle = ReverseIcCascade::new(&graph, 0);

    let run = || {
        InfluenceMaximizer::new()
            .seed_budget(3)
            .epsilon(0.3)
            .seed(777)
            .run(&graph, &oracle, Strategy::Fixed { num_samples: 2000 })
            .unwrap()
    };
    let (a, b) = (run(), run());
    match (a, b) {
        (Outcome::Seeds { seeds: sa, .. }, Outcome::Seeds { seeds: sb, .. }) => {
            assert_eq!(sa, sb);
        }
        other => panic!("expected Seeds outcomes, got {:?}", other),
    }
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_generation_preserves_the_estimate() {
    let graph = random_graph(30, 0.2, 0.25, 3);
    let oracle = ReverseIcCascade::new(&graph, 0);

    let spread = |workers: usize| {
        let outcome = InfluenceMaximizer::new()
            .seed_budget(3)
            .workers(workers)
            .seed(42)
            .run(&graph, &oracle, Strategy::Fixed { num_samples: 4000 })
            .unwrap();
        outcome.total_spread()
    };

    let serial = spread(1);
    let parallel = spread(4);
    assert!(serial > 0.0);
    // same estimator over the same distribution; only sampling noise
    // differs between worker layouts
    let relative = (serial - parallel).abs() / serial;
    assert!(
        relative < 0.2,
        "serial {} vs parallel {} diverged by {}",
        serial,
        parallel,
        relative
    );
}

#[test]
fn engine_table_is_reproducible_per_policy_seed() {
    let graph = random_graph(20, 0.2, 0.5, 4);
    let oracle = ReverseIcCascade::new(&graph, 0);
    let policy = ExecutionPolicy {
        workers: 1,
        seed: 31,
    };

    let generate = || {
        let mut table = RrTable::new();
        add_rr_simulation(&mut table, 20, 500, &oracle, &policy, 0);
        table
    };
    let (a, b) = (generate(), generate());
    assert_eq!(a.sets(), b.sets());
    assert_eq!(a.targets(), b.targets());

    // a different seed produces a different sequence
    let other_policy = ExecutionPolicy {
        workers: 1,
        seed: 32,
    };
    let mut c = RrTable::new();
    add_rr_simulation(&mut c, 20, 500, &oracle, &other_policy, 0);
    assert_ne!(a.targets(), c.targets());
}
