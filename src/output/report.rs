//! Plain-text result files.
//!
//! One line per selected entry: `node_id estimated_cumulative_spread`,
//! with a time column inserted for time-indexed results. A companion
//! timing file records the run's work counters. Default file names are
//! derived per strategy here; the algorithmic core knows nothing about
//! file naming.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::result::Outcome;
use crate::types::Strategy;

/// Writes a completed outcome to a seeds file and a timing file.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    seeds_path: PathBuf,
    timing_path: PathBuf,
}

impl ReportWriter {
    /// Default per-strategy file names inside `dir`:
    /// `rr_<label>_seeds.txt` and `time_rr_<label>.txt`.
    pub fn for_strategy(dir: &Path, strategy: Strategy) -> Self {
        Self {
            seeds_path: dir.join(format!("rr_{}_seeds.txt", strategy.label())),
            timing_path: dir.join(format!("time_rr_{}.txt", strategy.label())),
        }
    }

    /// Explicit file locations.
    pub fn with_paths(seeds_path: PathBuf, timing_path: PathBuf) -> Self {
        Self {
            seeds_path,
            timing_path,
        }
    }

    /// Location of the seeds file.
    pub fn seeds_path(&self) -> &Path {
        &self.seeds_path
    }

    /// Location of the timing file.
    pub fn timing_path(&self) -> &Path {
        &self.timing_path
    }

    /// Write both files. Only complete outcomes exist, so a partially
    /// written result can only arise from an I/O failure, which is
    /// propagated.
    pub fn write(&self, outcome: &Outcome) -> io::Result<()> {
        let mut seeds = BufWriter::new(File::create(&self.seeds_path)?);
        write_entries(&mut seeds, outcome)?;
        seeds.flush()?;

        let mut timing = BufWriter::new(File::create(&self.timing_path)?);
        write_timing(&mut timing, outcome)?;
        timing.flush()
    }
}

/// Render the per-entry lines of an outcome.
pub fn write_entries<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::Seeds { seeds, .. } => {
            for seed in seeds {
                writeln!(out, "{} {:.6}", seed.node, seed.cumulative_spread)?;
            }
        }
        Outcome::TimedSeeds { seeds, .. } => {
            for seed in seeds {
                writeln!(
                    out,
                    "{} {} {:.6}",
                    seed.node, seed.time, seed.cumulative_spread
                )?;
            }
        }
        Outcome::Ranking { nodes, .. } => {
            for entry in nodes {
                writeln!(out, "{} {:.6}", entry.node, entry.value)?;
            }
        }
        Outcome::Allocation { allocation, .. } => {
            for entry in allocation {
                writeln!(
                    out,
                    "{} {:.6} {:.6}",
                    entry.node, entry.budget, entry.activation
                )?;
            }
        }
    }
    Ok(())
}

fn write_timing<W: Write>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    let d = outcome.diagnostics();
    writeln!(out, "runtime_secs {:.6}", d.runtime_secs)?;
    writeln!(out, "rr_sets {}", d.rr_sets)?;
    writeln!(out, "rounds {}", d.rounds)?;
    writeln!(out, "edges_visited {}", d.edges_visited)?;
    writeln!(out, "nodes_visited {}", d.nodes_visited)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Diagnostics, SeedScore, TimedSeedScore};

    #[test]
    fn seeds_render_as_node_spread_lines() {
        let outcome = Outcome::Seeds {
            seeds: vec![
                SeedScore {
                    node: 4,
                    cumulative_spread: 12.5,
                },
                SeedScore {
                    node: 1,
                    cumulative_spread: 15.25,
                },
            ],
            diagnostics: Diagnostics::new(Strategy::TwoPhase),
        };
        let mut buf = Vec::new();
        write_entries(&mut buf, &outcome).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "4 12.500000\n1 15.250000\n"
        );
    }

    #[test]
    fn timed_seeds_carry_a_time_column() {
        let outcome = Outcome::TimedSeeds {
            seeds: vec![TimedSeedScore {
                node: 9,
                time: 2,
                cumulative_spread: 3.0,
            }],
            diagnostics: Diagnostics::new(Strategy::TimeIndexed),
        };
        let mut buf = Vec::new();
        write_entries(&mut buf, &outcome).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "9 2 3.000000\n");
    }

    #[test]
    fn default_names_follow_the_strategy() {
        let writer = ReportWriter::for_strategy(Path::new("/tmp"), Strategy::Martingale);
        assert!(writer
            .seeds_path()
            .ends_with("rr_martingale_seeds.txt"));
        assert!(writer.timing_path().ends_with("time_rr_martingale.txt"));
    }
}
