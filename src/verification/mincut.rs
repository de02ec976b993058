//! Exact minimum-cut check for an adversary's wiretap set.
//!
//! The secrecy claim is only tested against a worst-case adversary whose
//! power equals the minimum s-t edge cut: its edge set must separate the
//! pair and be no larger than the smallest such separator.

use serde::{Deserialize, Serialize};

use crate::error::KrpError;
use crate::graph::{Graph, MinCutSolver};
use crate::protocol::{Adversary, UserPair};

/// Outcome of checking one adversary against one user pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCutCheck {
    /// Removing the adversary's edges disconnects the pair.
    pub separates: bool,
    /// Minimum s-t edge cut in the original graph.
    pub min_cut_size: usize,
    /// Number of wiretapped edges.
    pub adversary_size: usize,
}

impl MinCutCheck {
    /// The adversary set is a cut of exactly minimum size.
    pub fn passed(&self) -> bool {
        self.separates && self.adversary_size == self.min_cut_size
    }
}

/// Check whether `adversary` is an exact minimum edge cut between the
/// endpoints of `pair`.
///
/// Both endpoints must be nodes of `graph` and every wiretapped edge an
/// edge of `graph`; otherwise the matching [`KrpError`] is returned.
/// Pure; `graph` is not modified.
pub fn check_min_cut<S>(
    solver: &S,
    graph: &Graph,
    pair: UserPair,
    adversary: &Adversary,
) -> Result<MinCutCheck, KrpError>
where
    S: MinCutSolver + ?Sized,
{
    pair.validate_against(graph)?;
    adversary.validate_against(graph)?;

    let reduced = graph.without_edges(adversary.edges());
    Ok(MinCutCheck {
        separates: !reduced.is_connected(pair.node1(), pair.node2()),
        min_cut_size: solver.min_edge_cut(graph, pair.node1(), pair.node2()),
        adversary_size: adversary.len(),
    })
}

/// Predicate form of [`check_min_cut`].
pub fn is_exact_min_cut<S>(
    solver: &S,
    graph: &Graph,
    pair: UserPair,
    adversary: &Adversary,
) -> Result<bool, KrpError>
where
    S: MinCutSolver + ?Sized,
{
    Ok(check_min_cut(solver, graph, pair, adversary)?.passed())
}
