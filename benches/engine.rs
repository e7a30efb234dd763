use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use influence_oracle::sampling::{add_rr_simulation, CoverageIndex, RrTable};
use influence_oracle::selection::run_greedy;
use influence_oracle::{AdjacencyGraph, ExecutionPolicy, ReverseIcCascade};

fn random_graph(n: usize, out_degree: usize, weight: f64) -> AdjacencyGraph {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let mut graph = AdjacencyGraph::new(n);
    for u in 0..n as u32 {
        for _ in 0..out_degree {
            let v = rng.random_range(0..n as u32);
            if v != u {
                graph.add_edge(u, v, weight).unwrap();
            }
        }
    }
    graph
}

fn bench_sampling(c: &mut Criterion) {
    let graph = random_graph(2000, 5, 0.1);
    let oracle = ReverseIcCascade::new(&graph, 0);
    let policy = ExecutionPolicy {
        workers: 1,
        seed: 7,
    };

    let mut group = c.benchmark_group("sampling");
    group.sample_size(20);
    group.bench_function("generate_10k_rr_sets", |b| {
        b.iter(|| {
            let mut table = RrTable::new();
            let stats = add_rr_simulation(&mut table, 2000, 10_000, &oracle, &policy, 0);
            black_box(stats.edges_visited)
        });
    });
    group.finish();
}

fn bench_greedy(c: &mut Criterion) {
    let graph = random_graph(2000, 5, 0.1);
    let oracle = ReverseIcCascade::new(&graph, 0);
    let policy = ExecutionPolicy {
        workers: 1,
        seed: 7,
    };
    let mut table = RrTable::new();
    add_rr_simulation(&mut table, 2000, 20_000, &oracle, &policy, 0);
    let index = CoverageIndex::build(2000, &table);

    let mut group = c.benchmark_group("selection");
    group.sample_size(20);
    group.bench_function("greedy_50_of_20k_sets", |b| {
        b.iter(|| {
            let selection = run_greedy(50, &table, &index, 2000);
            black_box(selection.total_spread())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_greedy);
criterion_main!(benches);
