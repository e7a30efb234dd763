//! Fixed-sample and adaptive-doubling state machines.
//!
//! The fixed variant is the Borgs et al. 2014 baseline: one sampling
//! call of a caller-specified size, one greedy pass. The
//! adaptive-doubling variant grows the table geometrically and stops as
//! soon as the table is large enough for the current (deflated) spread
//! estimate to certify the approximation, per the TIM escalation bound.

use crate::bounds;
use crate::cascade::CascadeOracle;
use crate::config::Config;
use crate::constants::INITIAL_ADAPTIVE_BATCH;
use crate::error::{BuildResult, BuildWarning};
use crate::graph::Graph;
use crate::orchestration::{finish_diagnostics, seed_scores, Sampler};
use crate::result::Outcome;
use crate::selection::run_greedy;
use crate::types::Strategy;

pub(crate) fn run_fixed<G, C>(
    config: &Config,
    graph: &G,
    oracle: &C,
    num_samples: usize,
) -> BuildResult<Outcome>
where
    G: Graph,
    C: CascadeOracle + Send + Sync,
{
    let population = graph.node_count();
    let mut sampler = Sampler::new(population, oracle, config.policy());
    sampler.sample(num_samples);

    let index = sampler.rebuild();
    let selection = run_greedy(config.seed_budget, &sampler.table, &index, population);

    let diagnostics = finish_diagnostics(
        Strategy::Fixed { num_samples },
        &sampler.stats,
        1,
        Vec::new(),
    );
    Ok(Outcome::Seeds {
        seeds: seed_scores(&selection),
        diagnostics,
    })
}

pub(crate) fn run_adaptive<G, C>(config: &Config, graph: &G, oracle: &C) -> BuildResult<Outcome>
where
    G: Graph,
    C: CascadeOracle + Send + Sync,
{
    let population = graph.node_count();
    let k = config.seed_budget;
    let mut sampler = Sampler::new(population, oracle, config.policy());

    // the Borgs et al. fixed-sample size is always sufficient, so the
    // escalation never needs to double past it
    let ceiling = bounds::default_rounds(population, graph.edge_count(), config.epsilon)?;

    let mut warnings = Vec::new();
    let mut rounds = 0;
    let mut target = INITIAL_ADAPTIVE_BATCH;
    let mut selection;

    loop {
        rounds += 1;
        sampler.extend_to(target);
        let index = sampler.rebuild();
        selection = run_greedy(k, &sampler.table, &index, population);

        if sampler.table.len() as f64 >= ceiling {
            break;
        }
        let estimate = selection.total_spread();
        if estimate > 0.0 {
            // Deflate the greedy estimate before using it as a lower
            // bound on optimal spread: the same sets that were selected
            // on are being used to score the selection.
            let lower = estimate / (1.0 + config.epsilon);
            let required =
                bounds::r_threshold(config.epsilon, lower, k, config.ell, population)?;
            if sampler.table.len() as f64 >= required {
                break;
            }
        }

        if rounds >= config.max_rounds {
            warnings.push(BuildWarning::BoundNotMet { rounds });
            break;
        }
        target *= 2;
    }

    let diagnostics =
        finish_diagnostics(Strategy::AdaptiveDoubling, &sampler.stats, rounds, warnings);
    Ok(Outcome::Seeds {
        seeds: seed_scores(&selection),
        diagnostics,
    })
}
