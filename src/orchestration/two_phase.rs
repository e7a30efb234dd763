//! Two-phase state machine (Tang et al. 2014, TIM+).
//!
//! Phase 1 estimates a cheap lower bound on optimal spread from RR-set
//! generation widths: a set generated by examining w edges would be hit
//! by a random k-seed with probability about 1 - (1 - w/m)^k, so the
//! batch average of that quantity scales to a spread estimate. The
//! doubling loop stops at the first round whose average clears 1/2^i.
//! Phase 2 refines the bound with the adjusted epsilon, computes the
//! exact required table size, samples the remaining delta and runs
//! greedy once.

use crate::bounds;
use crate::cascade::CascadeOracle;
use crate::config::Config;
use crate::error::{BuildResult, BuildWarning};
use crate::graph::Graph;
use crate::orchestration::{finish_diagnostics, seed_scores, Sampler};
use crate::result::Outcome;
use crate::selection::run_greedy;
use crate::types::Strategy;

/// Probability that a random k-seed hits a set of generation width `w`
/// on a graph with `m` edges.
fn hit_probability(width: u64, m: usize, k: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }
    let miss = 1.0 - width as f64 / m as f64;
    1.0 - miss.max(0.0).powi(k as i32)
}

pub(crate) fn run<G, C>(config: &Config, graph: &G, oracle: &C) -> BuildResult<Outcome>
where
    G: Graph,
    C: CascadeOracle + Send + Sync,
{
    let population = graph.node_count();
    let edge_count = graph.edge_count();
    let k = config.seed_budget;
    let mut sampler = Sampler::new(population, oracle, config.policy());

    let mut warnings = Vec::new();
    let mut rounds = 0;
    let mut lower_bound = None;

    // Phase 1: doubling estimate of the optimal-spread lower bound.
    let phase1_rounds = crate::orchestration::doubling_rounds(population).min(config.max_rounds);
    for i in 1..=phase1_rounds as i32 {
        rounds += 1;
        let x = 2f64.powi(i);
        let threshold = bounds::step_threshold(population, x, config.ell)?.ceil() as usize;
        let batch_start = sampler.table.len();
        sampler.extend_to(threshold);
        let batch = &sampler.table.widths()[batch_start..];
        if batch.is_empty() {
            continue;
        }
        let kappa: f64 = batch
            .iter()
            .map(|&w| hit_probability(w, edge_count, k))
            .sum::<f64>()
            / batch.len() as f64;
        if kappa > 1.0 / x {
            lower_bound = Some(population as f64 * kappa / 2.0);
            break;
        }
    }

    let mut lower_bound = match lower_bound {
        Some(lb) => lb,
        None => {
            // every width-based estimate failed (e.g. an edgeless
            // graph); k self-activated seeds are always achievable
            warnings.push(BuildWarning::BoundNotMet { rounds });
            k as f64
        }
    };

    // Refinement with the adjusted epsilon: greedy on the phase-1 table
    // gives a second, usually tighter bound once deflated.
    let eps_prime = bounds::eps_prime(config.epsilon, k, config.ell)?;
    let index = sampler.rebuild();
    let refine = run_greedy(k, &sampler.table, &index, population);
    if refine.total_spread() > 0.0 {
        lower_bound = lower_bound.max(refine.total_spread() / (1.0 + eps_prime));
    }

    // Phase 2: one exactly sized final sample.
    let theta = bounds::r_threshold(config.epsilon, lower_bound, k, config.ell, population)?
        .ceil() as usize;
    sampler.extend_to(theta);
    rounds += 1;

    let index = sampler.rebuild();
    let selection = run_greedy(k, &sampler.table, &index, population);

    let diagnostics = finish_diagnostics(Strategy::TwoPhase, &sampler.stats, rounds, warnings);
    Ok(Outcome::Seeds {
        seeds: seed_scores(&selection),
        diagnostics,
    })
}
