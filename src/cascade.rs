//! Cascade oracle collaborator.
//!
//! The oracle owns all diffusion randomness and model semantics: the core
//! hands it a target node and receives the set of nodes whose activation
//! could have caused that target to activate under one stochastic draw.
//! Oracles are `Clone` so the sampling engine can fork one private
//! instance per worker; each fork is reseeded from a counter-derived
//! stream before use.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::graph::Graph;
use crate::types::{NodeId, RrSet};

/// One-draw backward-reachability oracle.
pub trait CascadeOracle: Clone {
    /// Produce one reverse-reachable set for `target` into `out`
    /// (cleared first; `target` itself is included when reachable sets
    /// are nonempty by model definition). Returns the number of edges
    /// examined during the draw, which feeds the two-phase lower-bound
    /// estimate.
    fn reverse_sample(&mut self, target: NodeId, out: &mut Vec<NodeId>) -> u64;

    /// Reset the oracle's private randomness. Two oracles reseeded with
    /// the same value produce identical draw sequences.
    fn reseed(&mut self, seed: u64);
}

/// Reverse sampler for the weighted independent-cascade model.
///
/// Walks the graph backward from the target with one Bernoulli coin per
/// in-edge: the edge `u -> v` is live with its activation probability,
/// and every node reaching the target over live edges joins the set.
/// Equivalent to forward-simulating one cascade realization and asking
/// which single-node seeds would have activated the target.
pub struct ReverseIcCascade<'g, G: Graph> {
    graph: &'g G,
    rng: Xoshiro256PlusPlus,
    // epoch-stamped visited marks, so clearing between draws is O(1)
    visited: Vec<u32>,
    epoch: u32,
    frontier: VecDeque<NodeId>,
}

impl<'g, G: Graph> ReverseIcCascade<'g, G> {
    /// Create an oracle over `graph` with the given seed.
    pub fn new(graph: &'g G, seed: u64) -> Self {
        Self {
            graph,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            visited: vec![0; graph.node_count()],
            epoch: 0,
            frontier: VecDeque::new(),
        }
    }
}

impl<'g, G: Graph> Clone for ReverseIcCascade<'g, G> {
    fn clone(&self) -> Self {
        // Forks share the graph but nothing else; scratch state starts
        // fresh and the RNG stream is expected to be reseeded by the
        // caller before use.
        Self {
            graph: self.graph,
            rng: self.rng.clone(),
            visited: vec![0; self.visited.len()],
            epoch: 0,
            frontier: VecDeque::new(),
        }
    }
}

impl<'g, G: Graph> CascadeOracle for ReverseIcCascade<'g, G> {
    fn reverse_sample(&mut self, target: NodeId, out: &mut Vec<NodeId>) -> u64 {
        out.clear();
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            // stamp wrapped; all marks are stale anyway, reset them
            self.visited.iter_mut().for_each(|s| *s = 0);
            self.epoch = 1;
        }

        let mut edges_examined = 0u64;
        self.visited[target as usize] = self.epoch;
        out.push(target);
        self.frontier.clear();
        self.frontier.push_back(target);

        while let Some(v) = self.frontier.pop_front() {
            for edge in self.graph.in_edges(v) {
                edges_examined += 1;
                if self.visited[edge.source as usize] == self.epoch {
                    continue;
                }
                if self.rng.random::<f64>() < edge.probability {
                    self.visited[edge.source as usize] = self.epoch;
                    out.push(edge.source);
                    self.frontier.push_back(edge.source);
                }
            }
        }

        edges_examined
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    }
}

/// Collect one draw into a freshly allocated set.
pub fn sample_to_set<C: CascadeOracle>(oracle: &mut C, target: NodeId) -> RrSet {
    let mut buf = Vec::new();
    oracle.reverse_sample(target, &mut buf);
    buf.into_boxed_slice()
}
