//! # influence-oracle
//!
//! Near-optimal seed sets for influence maximization on large graphs,
//! estimated by reverse-reachable (RR) set sampling instead of
//! exhaustive cascade simulation.
//!
//! One shared core (seeded RR-set generation, coverage bookkeeping,
//! lazy greedy selection, and exact published sample-complexity bounds)
//! drives a family of stopping-rule state machines selected by a
//! [`Strategy`] tag: the fixed-sample baseline (Borgs et al. 2014),
//! adaptive doubling, the two-phase schedule (TIM+, Tang et al. 2014),
//! the geometric-martingale schedule (IMM, Tang et al. 2015), a
//! time-indexed extension, Shapley/single-node value accumulation, and
//! continuous-budget allocation. Every discrete result carries a
//! (1 - 1/e - epsilon) guarantee holding with probability 1 - 1/n^ell;
//! exact influence computation is out of scope.
//!
//! The graph and the diffusion model stay behind two small traits:
//! [`Graph`] (read-only counts and in-edges) and [`CascadeOracle`] (one
//! backward-reachability draw per call, owning all diffusion
//! randomness). Reference implementations for weighted
//! independent-cascade diffusion are included.
//!
//! ## Quick start
//!
//! ```
//! use influence_oracle::{
//!     AdjacencyGraph, InfluenceMaximizer, Outcome, ReverseIcCascade, Strategy,
//! };
//!
//! // a directed chain 0 -> 1 -> 2 -> 3 -> 4 that always transmits
//! let graph = AdjacencyGraph::from_edges(5, (0..4).map(|i| (i, i + 1, 1.0))).unwrap();
//! let oracle = ReverseIcCascade::new(&graph, 7);
//!
//! let outcome = InfluenceMaximizer::new()
//!     .seed_budget(1)
//!     .epsilon(0.2)
//!     .run(&graph, &oracle, Strategy::Martingale)
//!     .unwrap();
//!
//! match outcome {
//!     Outcome::Seeds { seeds, .. } => assert_eq!(seeds[0].node, 0),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! ## Concurrency
//!
//! RR-set generation fans out over `workers` threads (rayon, behind the
//! default `parallel` feature); each worker owns a private cascade
//! oracle forked and reseeded from a counter-derived stream, and worker
//! buffers merge into the shared table at a barrier. Coverage-index
//! rebuilds and greedy selection are strictly sequential. With one
//! worker, results are a deterministic function of the configured seed.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bounds;
mod cascade;
mod config;
pub mod constants;
mod error;
mod graph;
mod orchestration;
pub mod output;
pub mod sampling;
pub mod selection;
mod result;
mod types;

pub use cascade::{sample_to_set, CascadeOracle, ReverseIcCascade};
pub use config::{Config, TimeSplit};
pub use error::{BuildError, BuildResult, BuildWarning};
pub use graph::{AdjacencyGraph, Graph, WeightedEdge};
pub use orchestration::InfluenceMaximizer;
pub use result::{Diagnostics, NodeBudget, Outcome, SeedScore, TimedSeedScore};
pub use selection::NodeValue;
pub use types::{
    BoundFix, ExecutionPolicy, NodeId, RrSet, SelectionRule, Strategy, WeightMode,
};
