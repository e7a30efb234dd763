//! Human-readable terminal summary with colors.

use colored::Colorize;

use crate::result::Outcome;

/// Format a completed outcome for terminal display.
pub fn format_summary(outcome: &Outcome) -> String {
    let d = outcome.diagnostics();
    let mut out = String::new();

    let header = if d.is_clean() {
        format!(
            "{} {}",
            "\u{2713}".green().bold(),
            d.strategy.label().to_uppercase().green().bold()
        )
    } else {
        format!(
            "{} {}",
            "\u{26A0}".yellow().bold(),
            d.strategy.label().to_uppercase().yellow().bold()
        )
    };
    out.push_str(&header);
    out.push('\n');

    out.push_str(&format!(
        "  spread estimate: {:.3}\n",
        outcome.total_spread()
    ));
    out.push_str(&format!("  selected: {}\n", outcome.len()));
    out.push_str(&format!(
        "  rr sets: {} over {} rounds ({:.2}s)\n",
        d.rr_sets, d.rounds, d.runtime_secs
    ));

    for warning in &d.warnings {
        out.push_str(&format!("  {}\n", warning.to_string().yellow()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildWarning;
    use crate::result::{Diagnostics, SeedScore};
    use crate::types::Strategy;

    #[test]
    fn summary_mentions_spread_and_warnings() {
        let mut diagnostics = Diagnostics::new(Strategy::AdaptiveDoubling);
        diagnostics.warnings.push(BuildWarning::BoundNotMet { rounds: 3 });
        let outcome = Outcome::Seeds {
            seeds: vec![SeedScore {
                node: 0,
                cumulative_spread: 2.0,
            }],
            diagnostics,
        };
        let text = format_summary(&outcome);
        assert!(text.contains("spread estimate: 2.000"));
        assert!(text.contains("3 rounds") || text.contains("after 3 rounds"));
    }
}
