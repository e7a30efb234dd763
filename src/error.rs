//! Error and warning types for influence-maximization runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a run cannot start or a bound formula cannot be
/// evaluated.
///
/// Parameter errors are raised before any sampling begins; a run that has
/// started sampling only fails on numeric pathologies in the bound
/// formulas. Degenerate sampling (a cascade that only ever returns empty
/// sets) is not an error: it yields a zero-spread result with a
/// [`BuildWarning::DegenerateSampling`] attached.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A caller-supplied parameter is out of its valid range.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Description of the violated constraint.
        message: String,
    },

    /// A bound formula produced a non-finite value. The formulas work in
    /// log space precisely to avoid this for realistic inputs, so this
    /// fails loudly instead of silently saturating.
    NumericOverflow {
        /// The formula that overflowed.
        context: &'static str,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidParameter { name, message } => {
                write!(f, "invalid parameter `{}`: {}", name, message)
            }
            BuildError::NumericOverflow { context } => {
                write!(f, "numeric overflow evaluating {}", context)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Non-fatal condition recorded in [`crate::result::Diagnostics`].
///
/// Warnings never abort a run; they flag that the returned result carries
/// a weaker guarantee than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildWarning {
    /// An adaptive stopping criterion was still unsatisfied when the
    /// round cap was reached; the best available result was returned.
    BoundNotMet {
        /// Rounds completed before giving up.
        rounds: usize,
    },

    /// Sampling produced only empty reverse-reachable sets, so the
    /// result has zero estimated spread.
    DegenerateSampling,
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::BoundNotMet { rounds } => write!(
                f,
                "stopping criterion unmet after {} rounds; returning best available result",
                rounds
            ),
            BuildWarning::DegenerateSampling => {
                write!(f, "all sampled reverse-reachable sets were empty")
            }
        }
    }
}

/// Convenience alias for fallible operations in this crate.
pub type BuildResult<T> = Result<T, BuildError>;

pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> BuildError {
    BuildError::InvalidParameter {
        name,
        message: message.into(),
    }
}
