//! Immutable verdict records handed to reporting layers.

use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// Per-pair detail behind a [`Verdict`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairVerdict {
    /// First endpoint.
    pub node1: NodeId,
    /// Second endpoint.
    pub node2: NodeId,
    /// Relay path, absent when the pair is disconnected.
    pub path: Option<Vec<NodeId>>,
    /// Both endpoints hold the same non-null key.
    pub sound: bool,
    /// Minimum s-t edge cut in the graph.
    pub min_cut_size: usize,
    /// The adversary is an exact minimum cut for this pair.
    pub min_cut_passed: bool,
    /// The relay key is independent of the adversary's observations.
    pub secrecy_holds: bool,
}

/// Outcome of evaluating one (graph, user pairs, adversary) triple.
///
/// Aggregate flags are conjunctions over all pairs. Fields are read-only
/// after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    sound: bool,
    min_cut_passed: bool,
    secrecy_holds: bool,
    adversary_edge_count: usize,
    log: Vec<String>,
    pairs: Vec<PairVerdict>,
}

impl Verdict {
    pub(crate) fn from_pairs(pairs: Vec<PairVerdict>, adversary_edge_count: usize, log: Vec<String>) -> Self {
        Self {
            sound: pairs.iter().all(|p| p.sound),
            min_cut_passed: pairs.iter().all(|p| p.min_cut_passed),
            secrecy_holds: pairs.iter().all(|p| p.secrecy_holds),
            adversary_edge_count,
            log,
            pairs,
        }
    }

    /// Every pair agreed on a non-null key.
    pub fn sound(&self) -> bool {
        self.sound
    }

    /// The adversary is an exact minimum cut for every pair.
    pub fn min_cut_passed(&self) -> bool {
        self.min_cut_passed
    }

    /// Secrecy was established for every pair.
    pub fn secrecy_holds(&self) -> bool {
        self.secrecy_holds
    }

    /// Size of the adversary's wiretap set.
    pub fn adversary_edge_count(&self) -> usize {
        self.adversary_edge_count
    }

    /// Ordered trace of the evaluation.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Per-pair results, in input order.
    pub fn pairs(&self) -> &[PairVerdict] {
        &self.pairs
    }

    /// Serialize the verdict to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
