//! Value-accumulation state machine (Shapley values / single-node
//! influence, Chen & Teng 2017).
//!
//! Replaces the coverage-degree greedy entirely: every RR set credits
//! its members during sampling and the ranking falls out of the
//! accumulators, so no set membership is ever retained. The stopping
//! loop is the shared geometric-martingale shape with the k-th largest
//! accumulated value standing in as the evolving lower bound.

use crate::bounds;
use crate::cascade::CascadeOracle;
use crate::config::Config;
use crate::error::{BuildResult, BuildWarning};
use crate::graph::Graph;
use crate::orchestration::{doubling_rounds, finish_diagnostics};
use crate::result::Outcome;
use crate::sampling::{add_value_simulation, SampleStats};
use crate::selection::{CreditMode, ValueAccumulator};
use crate::types::Strategy;

pub(crate) fn run<G, C>(config: &Config, graph: &G, oracle: &C) -> BuildResult<Outcome>
where
    G: Graph,
    C: CascadeOracle + Send + Sync,
{
    let population = graph.node_count();
    let k = config.seed_budget;
    let n = population as f64;
    let mode = if config.single_node_influence {
        CreditMode::SingleNode
    } else {
        CreditMode::Shapley
    };

    let eps_prime = std::f64::consts::SQRT_2 * config.epsilon;
    let lambda_prime = bounds::lambda_prime(eps_prime, k, config.ell, population)?;
    let lambda_star = bounds::lambda_star(config.epsilon, k, config.ell, population)?;

    let policy = config.policy();
    let mut acc = ValueAccumulator::new(population);
    let mut stats = SampleStats::default();
    let mut warnings = Vec::new();
    let mut rounds = 0;
    let mut engine_round = 0u64;
    let mut lower_bound = None;

    let max_rounds = doubling_rounds(population).min(config.max_rounds);
    for i in 1..=max_rounds as i32 {
        rounds += 1;
        let x = n / 2f64.powi(i);
        let theta_i = (lambda_prime / x).ceil() as usize;
        let current = acc.sets_seen() as usize;
        if theta_i > current {
            let batch = add_value_simulation(
                &mut acc,
                population,
                theta_i - current,
                mode,
                oracle,
                &policy,
                engine_round,
            );
            stats.merge(&batch);
            engine_round += 1;
        }

        let kth = acc.kth_value(k, population);
        if kth >= (1.0 + eps_prime) * x {
            lower_bound = Some(kth / (1.0 + eps_prime));
            break;
        }
    }

    let lower_bound = match lower_bound {
        Some(lb) => lb,
        None => {
            warnings.push(BuildWarning::BoundNotMet { rounds });
            (acc.kth_value(k, population) / (1.0 + eps_prime)).max(1.0)
        }
    };

    let theta = (lambda_star / lower_bound).ceil() as usize;
    let current = acc.sets_seen() as usize;
    if theta > current {
        let batch = add_value_simulation(
            &mut acc,
            population,
            theta - current,
            mode,
            oracle,
            &policy,
            engine_round,
        );
        stats.merge(&batch);
    }
    rounds += 1;

    let nodes = acc.top_k(k, population);
    let diagnostics = finish_diagnostics(Strategy::ValueAccumulation, &stats, rounds, warnings);
    Ok(Outcome::Ranking { nodes, diagnostics })
}
