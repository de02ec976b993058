//! Key Relay Protocol simulation.
//!
//! Every edge of the graph is given an independent random local key. Each
//! user pair then relays a key along one deterministic shortest path: the
//! relay key is the XOR of the local keys on that path, and both endpoints
//! end up holding that same value.
//!
//! The simulation never mutates its inputs. It returns a [`Simulation`]
//! holding one [`PairOutcome`] per user pair plus the ordered trace.

pub mod keys;

pub use keys::LocalKeySet;

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MAX_KEY_LENGTH;
use crate::error::KrpError;
use crate::graph::{path_edges, Edge, Graph, NodeId};
use crate::math::BitVector;
use crate::verification::TraceLog;

/// Two distinct communicating endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserPair {
    node1: NodeId,
    node2: NodeId,
}

impl UserPair {
    /// Create a pair; endpoints must differ.
    pub fn new(node1: NodeId, node2: NodeId) -> Result<Self, KrpError> {
        if node1 == node2 {
            return Err(KrpError::DegeneratePair(node1));
        }
        Ok(Self { node1, node2 })
    }

    /// First endpoint.
    pub fn node1(&self) -> NodeId {
        self.node1
    }

    /// Second endpoint.
    pub fn node2(&self) -> NodeId {
        self.node2
    }

    /// Check both endpoints exist in `graph`.
    pub fn validate_against(&self, graph: &Graph) -> Result<(), KrpError> {
        for n in [self.node1, self.node2] {
            if !graph.contains_node(n) {
                return Err(KrpError::UnknownNode(n));
            }
        }
        Ok(())
    }
}

impl fmt::Display for UserPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.node1, self.node2)
    }
}

/// Wiretapped edge set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adversary {
    wiretapped: BTreeSet<Edge>,
}

impl Adversary {
    /// Build from endpoint pairs; edges are canonicalized and deduplicated.
    pub fn new<E>(edges: E) -> Result<Self, KrpError>
    where
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let wiretapped = edges
            .into_iter()
            .map(|(a, b)| Edge::new(a, b))
            .collect::<Result<_, _>>()?;
        Ok(Self { wiretapped })
    }

    /// Adversary that observes nothing.
    pub fn passive() -> Self {
        Self::default()
    }

    /// Adversary that wiretaps every edge of `graph`.
    pub fn wiretap_all(graph: &Graph) -> Self {
        Self {
            wiretapped: graph.edges().collect(),
        }
    }

    /// Check every wiretapped edge exists in `graph`.
    pub fn validate_against(&self, graph: &Graph) -> Result<(), KrpError> {
        match self.wiretapped.iter().find(|e| !graph.contains_edge(e)) {
            Some(edge) => Err(KrpError::EdgeNotInGraph(*edge)),
            None => Ok(()),
        }
    }

    /// Wiretapped edges in canonical order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.wiretapped.iter()
    }

    /// Whether `edge` is wiretapped.
    pub fn observes(&self, edge: &Edge) -> bool {
        self.wiretapped.contains(edge)
    }

    /// Number of wiretapped edges.
    pub fn len(&self) -> usize {
        self.wiretapped.len()
    }

    /// Whether no edge is wiretapped.
    pub fn is_empty(&self) -> bool {
        self.wiretapped.is_empty()
    }
}

impl fmt::Display for Adversary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<String> = self.wiretapped.iter().map(Edge::to_string).collect();
        write!(f, "{{{}}}", edges.join(", "))
    }
}

/// Result of relaying a key for one user pair.
///
/// Either both key slots are `None` (no path) or both hold the same value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairOutcome {
    pair: UserPair,
    path: Option<Vec<NodeId>>,
    k1: Option<BitVector>,
    k2: Option<BitVector>,
}

impl PairOutcome {
    /// The user pair.
    pub fn pair(&self) -> UserPair {
        self.pair
    }

    /// Node path the key was relayed along, if any.
    pub fn path(&self) -> Option<&[NodeId]> {
        self.path.as_deref()
    }

    /// Canonical edges of the relay path (empty when unsound).
    pub fn path_edges(&self) -> Vec<Edge> {
        self.path.as_deref().map(path_edges).unwrap_or_default()
    }

    /// Key derived at the first endpoint.
    pub fn k1(&self) -> Option<&BitVector> {
        self.k1.as_ref()
    }

    /// Key derived at the second endpoint.
    pub fn k2(&self) -> Option<&BitVector> {
        self.k2.as_ref()
    }

    /// Both endpoints hold the identical non-null key.
    pub fn is_sound(&self) -> bool {
        matches!((&self.k1, &self.k2), (Some(a), Some(b)) if a == b)
    }
}

/// Output of one protocol run.
#[derive(Clone, Debug)]
pub struct Simulation {
    local_keys: LocalKeySet,
    outcomes: Vec<PairOutcome>,
    observed: Vec<(Edge, BitVector)>,
    log: TraceLog,
}

impl Simulation {
    /// Local keys drawn for this run.
    pub fn local_keys(&self) -> &LocalKeySet {
        &self.local_keys
    }

    /// One outcome per user pair, in input order.
    pub fn outcomes(&self) -> &[PairOutcome] {
        &self.outcomes
    }

    /// Local keys seen by the adversary, in canonical edge order.
    pub fn observed_keys(&self) -> &[(Edge, BitVector)] {
        &self.observed
    }

    /// Every pair is sound.
    pub fn is_sound(&self) -> bool {
        self.outcomes.iter().all(PairOutcome::is_sound)
    }

    /// Ordered trace of the run.
    pub fn log(&self) -> &TraceLog {
        &self.log
    }

    /// Split into outcomes and trace.
    pub fn into_parts(self) -> (Vec<PairOutcome>, TraceLog) {
        (self.outcomes, self.log)
    }
}

/// Check a key length in bits.
pub fn validate_key_length(key_length: usize) -> Result<(), KrpError> {
    if key_length == 0 || key_length > MAX_KEY_LENGTH {
        return Err(KrpError::InvalidKeyLength(key_length));
    }
    Ok(())
}

/// Run the protocol once.
///
/// Inputs are validated before any key is drawn: `key_length` must be in
/// range, `pairs` non-empty with endpoints in `graph`, and every adversary
/// edge must be a graph edge. A pair with no connecting path is a normal
/// outcome with both keys `None`.
pub fn simulate<R>(
    graph: &Graph,
    pairs: &[UserPair],
    adversary: &Adversary,
    key_length: usize,
    rng: &mut R,
) -> Result<Simulation, KrpError>
where
    R: Rng + ?Sized,
{
    validate_key_length(key_length)?;
    if pairs.is_empty() {
        return Err(KrpError::NoUserPairs);
    }
    for pair in pairs {
        pair.validate_against(graph)?;
    }
    adversary.validate_against(graph)?;

    let mut log = TraceLog::new();

    let local_keys = LocalKeySet::draw(graph, key_length, rng);
    for (edge, key) in local_keys.iter() {
        log.record(format!("Local key for edge {}: {}", edge, key));
    }

    let outcomes: Vec<PairOutcome> = pairs
        .iter()
        .map(|&pair| relay(graph, pair, &local_keys, &mut log))
        .collect();

    let observed: Vec<(Edge, BitVector)> = adversary
        .edges()
        .filter_map(|e| local_keys.get(e).map(|k| (*e, k.clone())))
        .collect();
    let observed_display: Vec<String> = observed.iter().map(|(_, k)| k.to_string()).collect();
    log.record(format!(
        "Adversary wiretapped edges: {}, observed keys: [{}]",
        adversary,
        observed_display.join(", ")
    ));

    Ok(Simulation {
        local_keys,
        outcomes,
        observed,
        log,
    })
}

fn relay(graph: &Graph, pair: UserPair, keys: &LocalKeySet, log: &mut TraceLog) -> PairOutcome {
    let path = graph.shortest_path(pair.node1, pair.node2);
    let key = path.as_deref().and_then(|p| keys.xor_fold(&path_edges(p)));

    match (&path, &key) {
        (Some(p), Some(k)) => {
            debug!(pair = %pair, hops = p.len() - 1, "relay path found");
            log.record(format!("UserPair {} path: {:?}, key: {}", pair, p, k));
        }
        _ => {
            debug!(pair = %pair, "no relay path");
            log.record(format!("UserPair {} has no connecting path.", pair));
        }
    }

    // One derivation serves both endpoints
    PairOutcome {
        pair,
        path: key.as_ref().and(path),
        k1: key.clone(),
        k2: key,
    }
}
