//! Spread estimation from RR-set coverage fractions.
//!
//! The unbiased estimator: a seed set S covers an RR set with the same
//! probability that the diffusion from S reaches the set's target, so
//! (covered / m) * population estimates the expected spread of S. Both
//! estimators here report the cumulative value per seed prefix, which is
//! what makes the diminishing-returns record meaningful.

use crate::sampling::RrTable;
use crate::types::NodeId;

/// Cumulative spread estimate for each prefix of `seeds`.
///
/// Each RR set is attributed to the earliest seed that covers it, so the
/// whole table is walked once regardless of prefix count. Duplicate
/// seeds keep their earliest position. Returns zeros when the table is
/// empty.
pub fn estimate_spread(seeds: &[NodeId], table: &RrTable, population: usize) -> Vec<f64> {
    let m = table.len();
    let mut cumulative = vec![0.0; seeds.len()];
    if m == 0 || seeds.is_empty() {
        return cumulative;
    }

    let mut position = vec![usize::MAX; population];
    for (i, &s) in seeds.iter().enumerate() {
        let slot = &mut position[s as usize];
        if *slot == usize::MAX {
            *slot = i;
        }
    }

    // first_hit[i] = number of sets whose earliest covering seed is i
    let mut first_hit = vec![0u32; seeds.len()];
    for set in table.sets() {
        let earliest = set
            .iter()
            .map(|&v| position[v as usize])
            .min()
            .unwrap_or(usize::MAX);
        if earliest != usize::MAX {
            first_hit[earliest] += 1;
        }
    }

    let scale = population as f64 / m as f64;
    let mut covered = 0u32;
    for (i, &hits) in first_hit.iter().enumerate() {
        covered += hits;
        cumulative[i] = covered as f64 * scale;
    }
    cumulative
}

/// Cumulative weighted spread estimate for each prefix of time-tagged
/// seeds.
///
/// A seed (v, t) covers only the RR sets of time step t. Each time
/// step's coverage fraction is scaled by the population and its weight,
/// then summed: the estimate after seed i is
/// sum_t w_t * (covered_t by seeds[..=i]) / m_t * population.
/// Time steps with empty tables contribute nothing.
pub fn estimate_spread_timed(
    seeds: &[(NodeId, usize)],
    tables: &[RrTable],
    weights: &[f64],
    population: usize,
) -> Vec<f64> {
    debug_assert_eq!(tables.len(), weights.len());
    let mut increments = vec![0.0; seeds.len()];
    if seeds.is_empty() {
        return increments;
    }

    for (t, table) in tables.iter().enumerate() {
        let m = table.len();
        if m == 0 {
            continue;
        }
        let mut position = vec![usize::MAX; population];
        for (i, &(s, st)) in seeds.iter().enumerate() {
            if st != t {
                continue;
            }
            let slot = &mut position[s as usize];
            if *slot == usize::MAX {
                *slot = i;
            }
        }
        let per_set = weights[t] * population as f64 / m as f64;
        for set in table.sets() {
            let earliest = set
                .iter()
                .map(|&v| position[v as usize])
                .min()
                .unwrap_or(usize::MAX);
            if earliest != usize::MAX {
                increments[earliest] += per_set;
            }
        }
    }

    let mut cumulative = 0.0;
    for value in increments.iter_mut() {
        cumulative += *value;
        *value = cumulative;
    }
    increments
}
