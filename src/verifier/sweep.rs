//! Scenarios and reports for sweeping every graph on `N` nodes.

use serde::{Deserialize, Serialize};

use super::verdict::Verdict;
use crate::graph::{Edge, Graph};
use crate::protocol::{Adversary, UserPair};

/// User pairs and adversary to evaluate on one candidate graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioInstance {
    /// Communicating pairs.
    pub pairs: Vec<UserPair>,
    /// Wiretapped edges.
    pub adversary: Adversary,
}

/// Builds the evaluation inputs for each candidate graph.
///
/// Returning `None` skips the graph. Implemented for closures of the form
/// `Fn(&Graph) -> Option<ScenarioInstance>`.
pub trait Scenario: Sync {
    /// Inputs for `graph`, or `None` to skip it.
    fn instantiate(&self, graph: &Graph) -> Option<ScenarioInstance>;
}

impl<F> Scenario for F
where
    F: Fn(&Graph) -> Option<ScenarioInstance> + Sync,
{
    fn instantiate(&self, graph: &Graph) -> Option<ScenarioInstance> {
        self(graph)
    }
}

/// One fixed pair against an adversary that wiretaps every edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullWiretap {
    pair: UserPair,
}

impl FullWiretap {
    /// Scenario for `pair`.
    pub fn new(pair: UserPair) -> Self {
        Self { pair }
    }
}

impl Scenario for FullWiretap {
    fn instantiate(&self, graph: &Graph) -> Option<ScenarioInstance> {
        self.pair.validate_against(graph).ok()?;
        Some(ScenarioInstance {
            pairs: vec![self.pair],
            adversary: Adversary::wiretap_all(graph),
        })
    }
}

/// Verdict for one candidate graph of a sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepEntry {
    /// Position of the graph in enumeration order.
    pub graph_index: usize,
    /// Edges of the candidate graph.
    pub edges: Vec<Edge>,
    /// Evaluation result.
    pub verdict: Verdict,
}

/// Collected verdicts from a sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    /// Node count swept.
    pub n_nodes: usize,
    /// Non-isomorphic candidate graphs enumerated.
    pub candidates: usize,
    /// Verdicts in enumeration order.
    pub entries: Vec<SweepEntry>,
    /// The sweep stopped early; `entries` holds what finished.
    pub cancelled: bool,
}

impl SweepReport {
    /// Number of evaluated graphs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no graph was evaluated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Graphs where every pair was sound.
    pub fn sound_count(&self) -> usize {
        self.entries.iter().filter(|e| e.verdict.sound()).count()
    }

    /// Graphs where secrecy held for every pair.
    pub fn secrecy_count(&self) -> usize {
        self.entries.iter().filter(|e| e.verdict.secrecy_holds()).count()
    }
}
