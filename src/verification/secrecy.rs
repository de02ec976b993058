//! GF(2) secrecy check for a relayed key.
//!
//! Each edge is a basis vector in `GF(2)^|E|` under the graph's canonical
//! edge order. The relay key is the XOR of the local keys on its path, so
//! the adversary learns something about it (in the linear sense) exactly
//! when the path's indicator vector lies in the span of the wiretapped
//! edges. Secrecy holds iff adding the path vector raises the rank.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, Graph};
use crate::math::{gf2_rank, BitVector};
use crate::protocol::Adversary;

/// Edge coordinate system fixed for one evaluation.
#[derive(Clone, Debug)]
pub struct EdgeSpace {
    index: BTreeMap<Edge, usize>,
}

impl EdgeSpace {
    /// Index the edges of `graph` in canonical order.
    pub fn new(graph: &Graph) -> Self {
        Self {
            index: graph.edges().enumerate().map(|(i, e)| (e, i)).collect(),
        }
    }

    /// Dimension `|E|`.
    pub fn dim(&self) -> usize {
        self.index.len()
    }

    /// Coordinate of `edge`, if it belongs to the graph.
    pub fn position(&self, edge: &Edge) -> Option<usize> {
        self.index.get(edge).copied()
    }

    /// Basis vector of a single edge.
    pub fn basis_vector(&self, edge: &Edge) -> Option<BitVector> {
        self.position(edge).map(|i| BitVector::unit(self.dim(), i))
    }

    /// Indicator vector of an edge subset. Unknown edges are ignored.
    pub fn indicator<'a, I>(&self, edges: I) -> BitVector
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let mut v = BitVector::zeros(self.dim());
        for i in edges.into_iter().filter_map(|e| self.position(e)) {
            v.set(i, true);
        }
        v
    }
}

/// Ranks computed for one secrecy check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecrecyCheck {
    /// Rank of the adversary's basis.
    pub adversary_rank: usize,
    /// Rank after adding the path vector.
    pub extended_rank: usize,
}

impl SecrecyCheck {
    /// The path vector is independent of the adversary's observations.
    pub fn holds(&self) -> bool {
        self.extended_rank > self.adversary_rank
    }
}

/// Test whether the key relayed along `path` stays hidden from `adversary`.
///
/// Callers are expected to have established soundness and an exact min-cut
/// adversary first; this function only performs the linear-algebra step.
pub fn check_secrecy(graph: &Graph, path: &[Edge], adversary: &Adversary) -> SecrecyCheck {
    let space = EdgeSpace::new(graph);

    let mut rows: Vec<BitVector> = adversary
        .edges()
        .filter_map(|e| space.basis_vector(e))
        .collect();
    let adversary_rank = gf2_rank(&rows);

    rows.push(space.indicator(path));
    let extended_rank = gf2_rank(&rows);

    SecrecyCheck {
        adversary_rank,
        extended_rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::path_edges;

    #[test]
    fn test_edge_space_order() {
        let g = Graph::from_edges([(2, 3), (0, 1), (1, 2)]).unwrap();
        let space = EdgeSpace::new(&g);
        assert_eq!(space.dim(), 3);
        assert_eq!(space.position(&Edge::new(0, 1).unwrap()), Some(0));
        assert_eq!(space.position(&Edge::new(2, 3).unwrap()), Some(2));
        assert_eq!(space.position(&Edge::new(0, 3).unwrap()), None);
    }

    #[test]
    fn test_indicator() {
        let g = Graph::path(4);
        let space = EdgeSpace::new(&g);
        let v = space.indicator(&path_edges(&[0, 1, 2]));
        assert_eq!(v.ones().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_middle_edge_leaves_path_secret() {
        let g = Graph::path(4);
        let adv = Adversary::new([(1, 2)]).unwrap();
        let check = check_secrecy(&g, &path_edges(&[0, 1, 2, 3]), &adv);
        assert_eq!(check.adversary_rank, 1);
        assert_eq!(check.extended_rank, 2);
        assert!(check.holds());
    }

    #[test]
    fn test_full_wiretap_breaks_secrecy() {
        let g = Graph::path(3);
        let adv = Adversary::wiretap_all(&g);
        let check = check_secrecy(&g, &path_edges(&[0, 1, 2]), &adv);
        assert_eq!(check.adversary_rank, check.extended_rank);
        assert!(!check.holds());
    }

    #[test]
    fn test_empty_adversary() {
        let g = Graph::path(2);
        let check = check_secrecy(&g, &path_edges(&[0, 1]), &Adversary::passive());
        assert_eq!(check.adversary_rank, 0);
        assert!(check.holds());
    }

    #[test]
    fn test_empty_path_never_secret() {
        let g = Graph::path(2);
        let check = check_secrecy(&g, &[], &Adversary::passive());
        assert_eq!(check.extended_rank, 0);
        assert!(!check.holds());
    }
}
