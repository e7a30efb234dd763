//! Read-only graph collaborator.
//!
//! The core never traverses the graph itself: traversal belongs to the
//! cascade oracle. What the core needs is the node and edge counts (they
//! appear in the sample-complexity bounds) and, for the two-phase lower
//! bound, in-degree queries. [`AdjacencyGraph`] is a reference
//! implementation backed by weighted in-adjacency lists, sufficient for
//! the bundled independent-cascade oracle and the test suite.

use crate::error::{invalid, BuildResult};
use crate::types::NodeId;

/// An incoming edge: `source -> v` with an activation probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    /// Origin of the edge.
    pub source: NodeId,
    /// Probability that the edge transmits activation in one draw.
    pub probability: f64,
}

/// Read-only view of a directed influence graph.
pub trait Graph {
    /// Number of nodes; node ids are `0..node_count`.
    fn node_count(&self) -> usize;

    /// Number of directed edges.
    fn edge_count(&self) -> usize;

    /// Incoming edges of `v`.
    fn in_edges(&self, v: NodeId) -> &[WeightedEdge];

    /// In-degree of `v`.
    fn in_degree(&self, v: NodeId) -> usize {
        self.in_edges(v).len()
    }
}

/// Weighted directed graph stored as in-adjacency lists.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    incoming: Vec<Vec<WeightedEdge>>,
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Create an edgeless graph with `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            incoming: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    /// Add a directed edge `source -> target` with the given activation
    /// probability.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        probability: f64,
    ) -> BuildResult<()> {
        let n = self.incoming.len();
        if source as usize >= n || target as usize >= n {
            return Err(invalid(
                "edge",
                format!(
                    "edge ({}, {}) references a node outside 0..{}",
                    source, target, n
                ),
            ));
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(invalid(
                "probability",
                format!("must lie in [0, 1], got {}", probability),
            ));
        }
        self.incoming[target as usize].push(WeightedEdge {
            source,
            probability,
        });
        self.edge_count += 1;
        Ok(())
    }

    /// Build a graph from `(source, target, probability)` triples.
    pub fn from_edges(
        node_count: usize,
        edges: impl IntoIterator<Item = (NodeId, NodeId, f64)>,
    ) -> BuildResult<Self> {
        let mut graph = Self::new(node_count);
        for (source, target, probability) in edges {
            graph.add_edge(source, target, probability)?;
        }
        Ok(graph)
    }
}

impl Graph for AdjacencyGraph {
    fn node_count(&self) -> usize {
        self.incoming.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn in_edges(&self, v: NodeId) -> &[WeightedEdge] {
        &self.incoming[v as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_degrees() {
        let g = AdjacencyGraph::from_edges(3, [(0, 1, 0.5), (1, 2, 0.25), (0, 2, 1.0)]).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.in_degree(0), 0);
        assert_eq!(g.in_degree(2), 2);
        assert_eq!(g.in_edges(1)[0].source, 0);
    }

    #[test]
    fn rejects_out_of_range_edge() {
        let mut g = AdjacencyGraph::new(2);
        assert!(g.add_edge(0, 5, 0.5).is_err());
    }

    #[test]
    fn rejects_bad_probability() {
        let mut g = AdjacencyGraph::new(2);
        assert!(g.add_edge(0, 1, 1.5).is_err());
        assert!(g.add_edge(0, 1, -0.1).is_err());
    }
}
