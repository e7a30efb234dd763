//! RR-set generation.
//!
//! Generation is embarrassingly parallel: each worker owns a private,
//! counter-reseeded cascade oracle and a private target RNG, fills a
//! private buffer, and the buffers are concatenated into the shared
//! table at a synchronization barrier. With one worker the produced
//! sequence is a deterministic function of the policy seed; with more
//! workers the sequence order changes but the statistical guarantee is
//! unaffected.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cascade::CascadeOracle;
use crate::sampling::RrTable;
use crate::selection::{CreditMode, ValueAccumulator};
use crate::types::ExecutionPolicy;

/// Work performed by one sampling call, consumed by the bound formulas
/// and the time-weighting policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// RR sets generated.
    pub sets_generated: usize,
    /// Total nodes placed into generated sets.
    pub nodes_visited: u64,
    /// Total edges examined by the cascade oracle.
    pub edges_visited: u64,
}

impl SampleStats {
    /// Fold another batch's counters into this one.
    pub fn merge(&mut self, other: &SampleStats) {
        self.sets_generated += other.sets_generated;
        self.nodes_visited += other.nodes_visited;
        self.edges_visited += other.edges_visited;
    }
}

/// Derive a well-distributed seed for stream `index` of a base seed.
///
/// Splitmix-style finalizer: consecutive indices give statistically
/// independent Xoshiro streams, and the mapping is deterministic so
/// reruns with the same base seed reproduce every worker's stream.
pub fn counter_rng_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn generate_into<C: CascadeOracle>(
    batch: &mut RrTable,
    stats: &mut SampleStats,
    population: usize,
    count: usize,
    oracle: &mut C,
    rng: &mut Xoshiro256PlusPlus,
) {
    let mut buf = Vec::new();
    for _ in 0..count {
        let target = rng.random_range(0..population as u32);
        let width = oracle.reverse_sample(target, &mut buf);
        stats.sets_generated += 1;
        stats.nodes_visited += buf.len() as u64;
        stats.edges_visited += width;
        batch.push(buf.as_slice().into(), target, width);
    }
}

fn accumulate_into<C: CascadeOracle>(
    acc: &mut ValueAccumulator,
    stats: &mut SampleStats,
    population: usize,
    count: usize,
    mode: CreditMode,
    oracle: &mut C,
    rng: &mut Xoshiro256PlusPlus,
) {
    let mut buf = Vec::new();
    for _ in 0..count {
        let target = rng.random_range(0..population as u32);
        let width = oracle.reverse_sample(target, &mut buf);
        stats.sets_generated += 1;
        stats.nodes_visited += buf.len() as u64;
        stats.edges_visited += width;
        acc.credit_set(&buf, mode);
    }
}

/// Append `num_iter` freshly generated RR sets (plus their targets and
/// widths) to `table`.
///
/// Targets are drawn uniformly from `0..population` by the engine's own
/// seeded RNG; diffusion randomness stays inside the oracle. `round`
/// distinguishes successive calls so every batch consumes a fresh
/// portion of the seed's stream space. Degenerate draws (empty sets)
/// are appended like any other.
pub fn add_rr_simulation<C: CascadeOracle + Send + Sync>(
    table: &mut RrTable,
    population: usize,
    num_iter: usize,
    oracle: &C,
    policy: &ExecutionPolicy,
    round: u64,
) -> SampleStats {
    debug_assert!(population > 0, "population must be validated upstream");
    let stream_base = counter_rng_seed(policy.seed, round);

    #[cfg(feature = "parallel")]
    if policy.workers > 1 && num_iter >= policy.workers {
        let workers = policy.workers;
        let per = num_iter / workers;
        let rem = num_iter % workers;
        let batches: Vec<(RrTable, SampleStats)> = (0..workers)
            .into_par_iter()
            .map(|w| {
                let count = per + usize::from(w < rem);
                let mut worker_oracle = oracle.clone();
                worker_oracle.reseed(counter_rng_seed(stream_base, 2 * w as u64 + 1));
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(
                    stream_base,
                    2 * w as u64,
                ));
                let mut batch = RrTable::new();
                let mut stats = SampleStats::default();
                generate_into(
                    &mut batch,
                    &mut stats,
                    population,
                    count,
                    &mut worker_oracle,
                    &mut rng,
                );
                (batch, stats)
            })
            .collect();

        // barrier: merge per-worker buffers into the shared table
        let mut stats = SampleStats::default();
        for (mut batch, batch_stats) in batches {
            table.append(&mut batch);
            stats.merge(&batch_stats);
        }
        return stats;
    }

    let mut worker_oracle = oracle.clone();
    worker_oracle.reseed(counter_rng_seed(stream_base, 1));
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(stream_base, 0));
    let mut stats = SampleStats::default();
    generate_into(
        table,
        &mut stats,
        population,
        num_iter,
        &mut worker_oracle,
        &mut rng,
    );
    stats
}

/// Generate `num_iter` RR sets and fold them directly into a per-node
/// value accumulator without retaining any set membership.
///
/// This is the sampling path for the value-accumulation family, whose
/// memory stays O(population) regardless of how many sets are drawn.
pub fn add_value_simulation<C: CascadeOracle + Send + Sync>(
    acc: &mut ValueAccumulator,
    population: usize,
    num_iter: usize,
    mode: CreditMode,
    oracle: &C,
    policy: &ExecutionPolicy,
    round: u64,
) -> SampleStats {
    debug_assert!(population > 0, "population must be validated upstream");
    let stream_base = counter_rng_seed(policy.seed, round);

    #[cfg(feature = "parallel")]
    if policy.workers > 1 && num_iter >= policy.workers {
        let workers = policy.workers;
        let per = num_iter / workers;
        let rem = num_iter % workers;
        let partials: Vec<(ValueAccumulator, SampleStats)> = (0..workers)
            .into_par_iter()
            .map(|w| {
                let count = per + usize::from(w < rem);
                let mut worker_oracle = oracle.clone();
                worker_oracle.reseed(counter_rng_seed(stream_base, 2 * w as u64 + 1));
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(
                    stream_base,
                    2 * w as u64,
                ));
                let mut partial = ValueAccumulator::new(population);
                let mut stats = SampleStats::default();
                accumulate_into(
                    &mut partial,
                    &mut stats,
                    population,
                    count,
                    mode,
                    &mut worker_oracle,
                    &mut rng,
                );
                (partial, stats)
            })
            .collect();

        let mut stats = SampleStats::default();
        for (partial, partial_stats) in partials {
            acc.merge(&partial);
            stats.merge(&partial_stats);
        }
        return stats;
    }

    let mut worker_oracle = oracle.clone();
    worker_oracle.reseed(counter_rng_seed(stream_base, 1));
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(stream_base, 0));
    let mut stats = SampleStats::default();
    accumulate_into(
        acc,
        &mut stats,
        population,
        num_iter,
        mode,
        &mut worker_oracle,
        &mut rng,
    );
    stats
}
