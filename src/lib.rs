//! # krp-verify: Exhaustive Verification of Key Relay Protocols
//!
//! A Key Relay Protocol lets two endpoints of a communication graph derive
//! a shared secret by XOR-combining per-edge local keys along a path. This
//! crate checks such protocols exhaustively on small graphs:
//!
//! - **Soundness**: both endpoints of a user pair hold the same non-null key
//! - **Min-cut**: the adversary's wiretap set is an exact minimum s-t edge cut
//! - **Secrecy**: the relay path is linearly independent (over GF(2)) of
//!   the wiretapped edges
//!
//! ## Pipeline
//!
//! - [`enumerate_graphs()`] - Every non-isomorphic simple graph on N nodes
//! - [`simulate()`] - Local key draw and relay key derivation
//! - [`verification`] - Min-cut and GF(2) secrecy checks
//! - [`Verifier`] - Combines everything into an immutable [`Verdict`],
//!   and sweeps whole graph families in parallel
//!
//! Enumeration is brute force and exponential in the node count; it is
//! meant as an oracle for N <= 5.

#![deny(missing_docs)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod graph;
pub mod math;
pub mod protocol;
pub mod verification;
pub mod verifier;

// Re-exports
pub use cancel::CancelToken;
pub use config::{KrpConfig, MAX_KEY_LENGTH};
pub use error::KrpError;
pub use graph::{enumerate_graphs, Edge, Graph, NodeId, PetgraphBackend};
pub use protocol::{simulate, Adversary, PairOutcome, Simulation, UserPair};
pub use verifier::{FullWiretap, PairVerdict, Scenario, ScenarioInstance, SweepReport, Verdict, Verifier};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
