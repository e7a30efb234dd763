//! Per-node value accumulation for the Shapley and single-node-influence
//! families.
//!
//! Every RR set credits each of its members directly during sampling:
//! 1/|R| for Shapley values (a node's expected marginal contribution over
//! random coalitions collapses to this under the RR-set distribution,
//! Chen & Teng 2017) or 1 for plain single-node influence. No set
//! membership is retained, so memory stays O(population) however many
//! sets are drawn. Accumulators merge associatively, which is what the
//! parallel sampling barrier relies on.

use crate::types::NodeId;

/// How much credit each member of an RR set receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditMode {
    /// Credit 1/|R| per member: Shapley value estimation.
    Shapley,
    /// Credit 1 per member: single-node influence estimation.
    SingleNode,
}

/// Ranked per-node value produced by the value-accumulation family.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeValue {
    /// The node.
    pub node: NodeId,
    /// Estimated value in expected-node units.
    pub value: f64,
}

/// Running per-node weighted credit and hit counts.
#[derive(Debug, Clone)]
pub struct ValueAccumulator {
    values: Vec<f64>,
    hits: Vec<u64>,
    sets_seen: u64,
}

impl ValueAccumulator {
    /// Create a zeroed accumulator for `population` nodes.
    pub fn new(population: usize) -> Self {
        Self {
            values: vec![0.0; population],
            hits: vec![0; population],
            sets_seen: 0,
        }
    }

    /// Credit every member of one RR set. Empty sets count toward the
    /// total draw count but credit nobody.
    pub fn credit_set(&mut self, members: &[NodeId], mode: CreditMode) {
        self.sets_seen += 1;
        if members.is_empty() {
            return;
        }
        let credit = match mode {
            CreditMode::Shapley => 1.0 / members.len() as f64,
            CreditMode::SingleNode => 1.0,
        };
        for &v in members {
            self.values[v as usize] += credit;
            self.hits[v as usize] += 1;
        }
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &ValueAccumulator) {
        debug_assert_eq!(self.values.len(), other.values.len());
        for (a, b) in self.values.iter_mut().zip(&other.values) {
            *a += b;
        }
        for (a, b) in self.hits.iter_mut().zip(&other.hits) {
            *a += b;
        }
        self.sets_seen += other.sets_seen;
    }

    /// Total RR sets credited so far.
    pub fn sets_seen(&self) -> u64 {
        self.sets_seen
    }

    /// Number of sets that contained `v`.
    pub fn hits(&self, v: NodeId) -> u64 {
        self.hits[v as usize]
    }

    /// Estimated value of `v`, scaled to expected-node units:
    /// population * credit(v) / sets_seen.
    pub fn scaled_value(&self, v: NodeId, population: usize) -> f64 {
        if self.sets_seen == 0 {
            return 0.0;
        }
        self.values[v as usize] * population as f64 / self.sets_seen as f64
    }

    /// The k-th largest scaled value (1-based), or zero when fewer than
    /// k nodes have any credit. Used as the evolving lower bound in the
    /// adaptive stopping loop.
    pub fn kth_value(&self, k: usize, population: usize) -> f64 {
        if k == 0 || self.sets_seen == 0 {
            return 0.0;
        }
        let mut scaled: Vec<f64> = self
            .values
            .iter()
            .map(|&v| v * population as f64 / self.sets_seen as f64)
            .collect();
        if k > scaled.len() {
            return 0.0;
        }
        let idx = k - 1;
        scaled.select_nth_unstable_by(idx, |a, b| b.total_cmp(a));
        scaled[idx]
    }

    /// Top `k` nodes by scaled value, descending; ties broken toward the
    /// smaller node id.
    pub fn top_k(&self, k: usize, population: usize) -> Vec<NodeValue> {
        let mut ranked: Vec<NodeValue> = (0..self.values.len())
            .map(|v| NodeValue {
                node: v as NodeId,
                value: self.scaled_value(v as NodeId, population),
            })
            .collect();
        ranked.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.node.cmp(&b.node)));
        ranked.truncate(k);
        ranked
    }
}
