//! Brute-force enumeration of non-isomorphic simple graphs.
//!
//! Every one of the `2^C(N,2)` edge subsets on nodes `0..N` is built and
//! kept only if it is not isomorphic to a graph already retained. With `k`
//! retained classes this costs up to `O(2^C(N,2) * k)` isomorphism tests,
//! which is why the node count is capped.
//!
//! | N | subsets | classes |
//! |---|---------|---------|
//! | 2 | 2 | 2 |
//! | 3 | 8 | 4 |
//! | 4 | 64 | 11 |
//! | 5 | 1024 | 34 |
//! | 6 | 32768 | 156 |

use tracing::debug;

use super::backend::{IsomorphismTest, PetgraphBackend};
use super::{Edge, Graph, NodeId};
use crate::cancel::CancelToken;
use crate::error::KrpError;

/// Largest node count the enumerator accepts.
pub const ENUMERATION_NODE_CEILING: usize = 6;

/// Enumerate isomorphism-class representatives on `n_nodes` nodes using
/// the default backend.
pub fn enumerate_graphs(n_nodes: usize) -> Result<Vec<Graph>, KrpError> {
    enumerate_graphs_with(n_nodes, &PetgraphBackend, &CancelToken::new())
}

/// Enumerate isomorphism-class representatives with an injected
/// isomorphism test and a cancellation token.
///
/// Graphs are produced in increasing edge-mask order. A cheap invariant
/// check (edge count and degree sequence) runs before `iso` is consulted.
/// Returns [`KrpError::Cancelled`] if `cancel` fires mid-run.
pub fn enumerate_graphs_with<I>(
    n_nodes: usize,
    iso: &I,
    cancel: &CancelToken,
) -> Result<Vec<Graph>, KrpError>
where
    I: IsomorphismTest + ?Sized,
{
    if n_nodes > ENUMERATION_NODE_CEILING {
        return Err(KrpError::NodeCountTooLarge {
            requested: n_nodes,
            limit: ENUMERATION_NODE_CEILING,
        });
    }

    let all_edges = candidate_edges(n_nodes);
    let n_subsets: u64 = 1 << all_edges.len();

    let mut retained: Vec<((usize, Vec<usize>), Graph)> = Vec::new();
    for mask in 0..n_subsets {
        if cancel.is_cancelled() {
            return Err(KrpError::Cancelled);
        }

        let edges = all_edges
            .iter()
            .enumerate()
            .filter(|(i, _)| (mask >> i) & 1 == 1)
            .map(|(_, e)| *e);
        let candidate = Graph::from_canonical(n_nodes, edges);
        let invariant = (candidate.edge_count(), candidate.degree_sequence());

        let seen = retained
            .iter()
            .any(|(inv, g)| *inv == invariant && iso.is_isomorphic(&candidate, g));
        if !seen {
            retained.push((invariant, candidate));
        }
    }

    debug!(
        n_nodes,
        subsets = n_subsets,
        classes = retained.len(),
        "graph enumeration complete"
    );
    Ok(retained.into_iter().map(|(_, g)| g).collect())
}

/// All `C(n, 2)` possible edges on nodes `0..n`, in canonical order.
fn candidate_edges(n_nodes: usize) -> Vec<Edge> {
    let n = n_nodes as NodeId;
    (0..n)
        .flat_map(|a| (a + 1..n).filter_map(move |b| Edge::new(a, b).ok()))
        .collect()
}
