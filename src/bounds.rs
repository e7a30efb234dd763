//! Sample-complexity bounds for RR-set influence maximization.
//!
//! Pure, stateless functions of (n, k, epsilon, ell). Downstream
//! approximation guarantees depend on these matching the published closed
//! forms exactly, so each function names its source:
//!
//! - Borgs, Brautbar, Chayes, Lucier, "Maximizing Social Influence in
//!   Nearly Optimal Time", SODA 2014 (baseline round count).
//! - Tang, Xiao, Shi, "Influence Maximization: Near-Optimal Time
//!   Complexity Meets Practical Efficiency", SIGMOD 2014 (TIM/TIM+
//!   thresholds).
//! - Tang, Shi, Xiao, "Influence Maximization in Near-Linear Time: A
//!   Martingale Approach", SIGMOD 2015 (IMM lambda bounds).
//!
//! Everything combinatorial is evaluated in log space; a non-finite
//! intermediate is reported as [`BuildError::NumericOverflow`] rather
//! than silently saturating.

use statrs::function::gamma::ln_gamma;

use crate::constants::ONE_MINUS_INV_E;
use crate::error::{invalid, BuildError, BuildResult};

const LN_2: f64 = std::f64::consts::LN_2;

fn check_node_count(n: usize) -> BuildResult<()> {
    if n == 0 {
        return Err(invalid("n", "graph must contain at least one node"));
    }
    Ok(())
}

/// The doubly-logarithmic terms ln(log2 n) are only defined for n >= 2.
fn check_node_count_log(n: usize) -> BuildResult<()> {
    check_node_count(n)?;
    if n < 2 {
        return Err(invalid("n", "bound requires at least two nodes"));
    }
    Ok(())
}

fn check_budget(k: usize, n: usize) -> BuildResult<()> {
    if k > n {
        return Err(invalid(
            "k",
            format!("seed budget {} exceeds node count {}", k, n),
        ));
    }
    Ok(())
}

fn check_epsilon(epsilon: f64) -> BuildResult<()> {
    if !(epsilon > 0.0 && epsilon < 1.0) {
        return Err(invalid(
            "epsilon",
            format!("must lie in (0, 1), got {}", epsilon),
        ));
    }
    Ok(())
}

fn check_ell(ell: f64) -> BuildResult<()> {
    if !(ell > 0.0 && ell.is_finite()) {
        return Err(invalid(
            "ell",
            format!("confidence exponent must be positive and finite, got {}", ell),
        ));
    }
    Ok(())
}

fn check_opt(opt: f64) -> BuildResult<()> {
    if !(opt > 0.0 && opt.is_finite()) {
        return Err(invalid(
            "opt",
            format!("spread lower bound must be positive and finite, got {}", opt),
        ));
    }
    Ok(())
}

fn finite(value: f64, context: &'static str) -> BuildResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BuildError::NumericOverflow { context })
    }
}

/// ln C(n, k) via the log-gamma function.
///
/// Exact up to floating-point rounding for n up to ~1e7, where a naive
/// product would overflow long before.
pub fn log_n_choose_k(n: usize, k: usize) -> BuildResult<f64> {
    check_node_count(n)?;
    check_budget(k, n)?;
    let n = n as f64;
    let k = k as f64;
    finite(
        ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0),
        "log_n_choose_k",
    )
}

/// Baseline round count for the fixed-sample algorithm:
/// 144 (n + m) eps^-3 ln n (Borgs et al. 2014).
pub fn default_rounds(n: usize, m: usize, epsilon: f64) -> BuildResult<f64> {
    check_node_count(n)?;
    check_epsilon(epsilon)?;
    let rounds = 144.0 * (n as f64 + m as f64) * (n as f64).ln() / epsilon.powi(3);
    finite(rounds, "default_rounds")
}

/// Adjusted epsilon for multi-phase bounding:
/// eps' = 5 * cbrt(ell * eps^2 / (k + ell)) (TIM+ section 4.1, last
/// equation).
pub fn eps_prime(epsilon: f64, k: usize, ell: f64) -> BuildResult<f64> {
    check_epsilon(epsilon)?;
    check_ell(ell)?;
    if k == 0 {
        return Err(invalid("k", "seed budget must be positive"));
    }
    let value = 5.0 * (ell * epsilon * epsilon / (k as f64 + ell)).cbrt();
    finite(value, "eps_prime")
}

/// Sample-size escalation without the combinatorial term:
/// (8 + 2 eps) n (ell ln n + ln 2) / (opt eps^2).
pub fn r_threshold_0(epsilon: f64, opt: f64, ell: f64, n: usize) -> BuildResult<f64> {
    check_node_count(n)?;
    check_epsilon(epsilon)?;
    check_ell(ell)?;
    check_opt(opt)?;
    let ln_n = (n as f64).ln();
    let value = (8.0 + 2.0 * epsilon) * n as f64 * (ell * ln_n + LN_2)
        / (opt * epsilon * epsilon);
    finite(value, "r_threshold_0")
}

/// Sample-size escalation given a lower bound `opt` on optimal spread:
/// (8 + 2 eps) n (ell ln n + ln C(n,k) + ln 2) / (opt eps^2)
/// (TIM Lemma 3).
pub fn r_threshold(epsilon: f64, opt: f64, k: usize, ell: f64, n: usize) -> BuildResult<f64> {
    check_node_count(n)?;
    check_budget(k, n)?;
    check_epsilon(epsilon)?;
    check_ell(ell)?;
    check_opt(opt)?;
    let ln_n = (n as f64).ln();
    let log_choose = log_n_choose_k(n, k)?;
    let value = (8.0 + 2.0 * epsilon) * n as f64 * (ell * ln_n + log_choose + LN_2)
        / (opt * epsilon * epsilon);
    finite(value, "r_threshold")
}

/// Per-round stopping threshold for the cheap phase-1 lower-bound
/// estimate: (6 ell ln n + 6 ln log2 n) * x, where the caller passes
/// x = 2^i for round i (TIM+ KPT estimation).
pub fn step_threshold(n: usize, x: f64, ell: f64) -> BuildResult<f64> {
    check_node_count_log(n)?;
    check_ell(ell)?;
    if !(x >= 1.0 && x.is_finite()) {
        return Err(invalid("x", format!("round scale must be >= 1, got {}", x)));
    }
    let ln_n = (n as f64).ln();
    let value = (6.0 * ell * ln_n + 6.0 * (n as f64).log2().ln()) * x;
    finite(value, "step_threshold")
}

/// Chernoff-derived per-iteration sample bound for the martingale loop:
/// (2 + 2/3 eps') (ln C(n,k) + ell ln n + ln log2 n) n / eps'^2
/// (IMM equation 9).
///
/// `epsilon_prime` is the already-adjusted phase-1 epsilon (sqrt(2) times
/// the target epsilon), so it is only required to be positive, not below
/// one.
pub fn lambda_prime(epsilon_prime: f64, k: usize, ell: f64, n: usize) -> BuildResult<f64> {
    check_node_count_log(n)?;
    check_budget(k, n)?;
    check_ell(ell)?;
    if !(epsilon_prime > 0.0 && epsilon_prime.is_finite()) {
        return Err(invalid(
            "epsilon_prime",
            format!("must be positive and finite, got {}", epsilon_prime),
        ));
    }
    let ln_n = (n as f64).ln();
    let log_choose = log_n_choose_k(n, k)?;
    let value = (2.0 + 2.0 / 3.0 * epsilon_prime)
        * (log_choose + ell * ln_n + (n as f64).log2().ln())
        * n as f64
        / (epsilon_prime * epsilon_prime);
    finite(value, "lambda_prime")
}

/// Final-phase sample bound guaranteeing the (1 - 1/e - eps)
/// approximation with probability 1 - 1/n^ell:
/// 2n ((1 - 1/e) alpha + beta)^2 eps^-2 with
/// alpha = sqrt(ell ln n + ln 2) and
/// beta = sqrt((1 - 1/e)(ell ln n + ln C(n,k) + ln 2))
/// (IMM equation 6).
pub fn lambda_star(epsilon: f64, k: usize, ell: f64, n: usize) -> BuildResult<f64> {
    check_node_count(n)?;
    check_budget(k, n)?;
    check_epsilon(epsilon)?;
    check_ell(ell)?;
    let ln_n = (n as f64).ln();
    let log_choose = log_n_choose_k(n, k)?;
    let alpha = (ell * ln_n + LN_2).sqrt();
    let beta = (ONE_MINUS_INV_E * (ell * ln_n + log_choose + LN_2)).sqrt();
    let combined = ONE_MINUS_INV_E * alpha + beta;
    let value = 2.0 * n as f64 * combined * combined / (epsilon * epsilon);
    finite(value, "lambda_star")
}
