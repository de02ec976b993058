//! Error types for krp-verify

use thiserror::Error;

use crate::graph::{Edge, NodeId};

/// All possible errors in krp-verify.
///
/// These are caller errors rejected at entry. Protocol outcomes such as
/// "no path between a user pair" are never reported through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KrpError {
    /// A node id was referenced that the graph does not contain
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// An edge joins a node to itself
    #[error("Self-loop on node {0} is not allowed")]
    SelfLoop(NodeId),

    /// An adversary edge is not an edge of the graph
    #[error("Adversary edge {0} is not present in the graph")]
    EdgeNotInGraph(Edge),

    /// A user pair names the same node twice
    #[error("User pair endpoints must be distinct, got ({0}, {0})")]
    DegeneratePair(NodeId),

    /// No user pairs were supplied for an evaluation
    #[error("At least one user pair is required")]
    NoUserPairs,

    /// Key length is outside the supported range
    #[error("Invalid key length: {0} (must be 1..={max})", max = crate::MAX_KEY_LENGTH)]
    InvalidKeyLength(usize),

    /// Enumeration requested for more nodes than allowed
    #[error("Node count {requested} exceeds enumeration limit {limit}")]
    NodeCountTooLarge {
        /// Requested node count
        requested: usize,
        /// Configured limit
        limit: usize,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Work was aborted through a cancellation token
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for KrpError {
    fn from(e: serde_json::Error) -> Self {
        KrpError::InvalidConfig(e.to_string())
    }
}
