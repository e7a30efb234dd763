//! RR-set storage and coverage bookkeeping.
//!
//! [`RrTable`] is append-only: sets, their generation targets, and their
//! generation widths (edges examined) grow in lockstep and are never
//! mutated in place. [`CoverageIndex`] is rebuilt wholesale from the
//! table after each sampling batch; it is never patched incrementally
//! while sampling runs, which keeps the exact-degree invariant trivial
//! to maintain at scale.

use crate::types::{NodeId, RrSet};

/// Append-only table of reverse-reachable sets.
///
/// Invariant: `sets`, `targets` and `widths` always have equal length.
#[derive(Debug, Default, Clone)]
pub struct RrTable {
    sets: Vec<RrSet>,
    targets: Vec<NodeId>,
    widths: Vec<u64>,
}

impl RrTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// True when no sets have been generated yet.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Append one set with the target that produced it and the number of
    /// edges examined while generating it.
    pub fn push(&mut self, set: RrSet, target: NodeId, width: u64) {
        self.sets.push(set);
        self.targets.push(target);
        self.widths.push(width);
    }

    /// Append every entry of `other`, preserving order.
    pub fn append(&mut self, other: &mut RrTable) {
        self.sets.append(&mut other.sets);
        self.targets.append(&mut other.targets);
        self.widths.append(&mut other.widths);
    }

    /// Drop all entries, keeping allocations.
    pub fn clear(&mut self) {
        self.sets.clear();
        self.targets.clear();
        self.widths.clear();
    }

    /// The members of set `i`.
    pub fn set(&self, i: usize) -> &[NodeId] {
        &self.sets[i]
    }

    /// All stored sets in generation order.
    pub fn sets(&self) -> &[RrSet] {
        &self.sets
    }

    /// Target node that produced each set.
    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    /// Edges examined while generating each set.
    pub fn widths(&self) -> &[u64] {
        &self.widths
    }
}

/// Mapping from node to the RR sets containing it.
///
/// `degree(v)` equals the exact membership count of `v` over the table
/// the index was built from, for every node, immediately after
/// [`CoverageIndex::build`].
#[derive(Debug, Clone)]
pub struct CoverageIndex {
    degrees: Vec<u32>,
    members: Vec<Vec<u32>>,
}

impl CoverageIndex {
    /// Build the index from scratch for a population of `node_count`
    /// nodes.
    pub fn build(node_count: usize, table: &RrTable) -> Self {
        let mut degrees = vec![0u32; node_count];
        let mut members = vec![Vec::new(); node_count];
        for (i, set) in table.sets().iter().enumerate() {
            for &v in set.iter() {
                degrees[v as usize] += 1;
                members[v as usize].push(i as u32);
            }
        }
        Self { degrees, members }
    }

    /// Number of RR sets containing `v`.
    pub fn degree(&self, v: NodeId) -> u32 {
        self.degrees[v as usize]
    }

    /// Degrees of every node, indexed by node id.
    pub fn degrees(&self) -> &[u32] {
        &self.degrees
    }

    /// Indices of the RR sets containing `v`.
    pub fn sets_containing(&self, v: NodeId) -> &[u32] {
        &self.members[v as usize]
    }

    /// Population size the index was built for.
    pub fn node_count(&self) -> usize {
        self.degrees.len()
    }
}
