//! Graph-algorithm capabilities consumed by the verifier.
//!
//! Enumeration needs an exact isomorphism test and the min-cut validator
//! needs a unit-capacity s-t min cut. Both are traits so tests can inject
//! fakes and alternate graph libraries can be plugged in.

use std::collections::BTreeMap;

use petgraph::algo::ford_fulkerson;
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};

use super::{Graph, NodeId};

/// Exact isomorphism test over simple undirected graphs.
pub trait IsomorphismTest: Send + Sync {
    /// Whether `a` and `b` are isomorphic.
    fn is_isomorphic(&self, a: &Graph, b: &Graph) -> bool;
}

/// Minimum edge cut between two nodes with unit edge capacities.
pub trait MinCutSolver: Send + Sync {
    /// Size of the smallest edge set separating `source` from `sink`.
    fn min_edge_cut(&self, graph: &Graph, source: NodeId, sink: NodeId) -> usize;
}

/// Default backend: petgraph's VF2 isomorphism and Ford-Fulkerson max-flow.
#[derive(Clone, Copy, Debug, Default)]
pub struct PetgraphBackend;

impl PetgraphBackend {
    /// Create the default backend.
    pub fn new() -> Self {
        Self
    }
}

/// Convert to a petgraph `UnGraph` with node weights holding the original ids.
pub fn to_petgraph(graph: &Graph) -> UnGraph<NodeId, ()> {
    let mut g = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
    let index: BTreeMap<NodeId, NodeIndex> = graph.nodes().map(|n| (n, g.add_node(n))).collect();
    for e in graph.edges() {
        g.add_edge(index[&e.u()], index[&e.v()], ());
    }
    g
}

/// Flow network for `graph`: each undirected edge becomes two opposing
/// arcs of capacity 1.
pub fn to_flow_network(graph: &Graph) -> (DiGraph<NodeId, u32>, BTreeMap<NodeId, NodeIndex>) {
    let mut g = DiGraph::with_capacity(graph.node_count(), 2 * graph.edge_count());
    let index: BTreeMap<NodeId, NodeIndex> = graph.nodes().map(|n| (n, g.add_node(n))).collect();
    for e in graph.edges() {
        let (a, b) = (index[&e.u()], index[&e.v()]);
        g.add_edge(a, b, 1);
        g.add_edge(b, a, 1);
    }
    (g, index)
}

impl IsomorphismTest for PetgraphBackend {
    fn is_isomorphic(&self, a: &Graph, b: &Graph) -> bool {
        petgraph::algo::is_isomorphic(&to_petgraph(a), &to_petgraph(b))
    }
}

impl MinCutSolver for PetgraphBackend {
    /// Max-flow value on the unit-capacity network. Returns 0 when either
    /// node is missing or `source == sink`.
    fn min_edge_cut(&self, graph: &Graph, source: NodeId, sink: NodeId) -> usize {
        if source == sink {
            return 0;
        }
        let (network, index) = to_flow_network(graph);
        let (Some(&s), Some(&t)) = (index.get(&source), index.get(&sink)) else {
            return 0;
        };
        let (max_flow, _) = ford_fulkerson(&network, s, t);
        max_flow as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relabeled_paths_are_isomorphic() {
        let a = Graph::path(3);
        let b = Graph::new([0, 1, 2], [(0, 2), (2, 1)]).unwrap();
        assert!(PetgraphBackend.is_isomorphic(&a, &b));
    }

    #[test]
    fn test_path_and_triangle_differ() {
        let path = Graph::path(3);
        let triangle = Graph::from_edges([(0, 1), (1, 2), (0, 2)]).unwrap();
        assert!(!PetgraphBackend.is_isomorphic(&path, &triangle));
    }

    #[test]
    fn test_same_degrees_not_isomorphic() {
        // Hexagon vs two disjoint triangles: both 2-regular on 6 nodes
        let hexagon = Graph::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        let triangles = Graph::from_edges([(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap();
        assert!(!PetgraphBackend.is_isomorphic(&hexagon, &triangles));
    }

    #[test]
    fn test_to_petgraph_preserves_counts() {
        let g = to_petgraph(&Graph::path(5));
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn test_flow_network_has_opposing_arcs() {
        let (g, index) = to_flow_network(&Graph::path(3));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 4);
        assert!(g.find_edge(index[&1], index[&0]).is_some());
        assert!(g.find_edge(index[&0], index[&1]).is_some());
    }

    #[test]
    fn test_path_cut_is_one() {
        assert_eq!(PetgraphBackend.min_edge_cut(&Graph::path(4), 0, 3), 1);
    }

    #[test]
    fn test_cycle_cut_is_two() {
        let g = Graph::from_edges([(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        assert_eq!(PetgraphBackend.min_edge_cut(&g, 0, 2), 2);
    }

    #[test]
    fn test_complete_graph_cut() {
        // K4: every node has degree 3
        let g = Graph::from_edges([(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]).unwrap();
        assert_eq!(PetgraphBackend.min_edge_cut(&g, 0, 3), 3);
    }

    #[test]
    fn test_disconnected_cut_is_zero() {
        let g = Graph::new([0, 1, 2], [(0, 1)]).unwrap();
        assert_eq!(PetgraphBackend.min_edge_cut(&g, 0, 2), 0);
    }

    #[test]
    fn test_bridge_between_triangles() {
        // Two triangles joined by the single edge (2, 3)
        let g = Graph::from_edges([(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (3, 5)]).unwrap();
        assert_eq!(PetgraphBackend.min_edge_cut(&g, 0, 5), 1);
        assert_eq!(PetgraphBackend.min_edge_cut(&g, 0, 1), 2);
    }

    #[test]
    fn test_cut_with_unknown_or_equal_nodes() {
        assert_eq!(PetgraphBackend.min_edge_cut(&Graph::path(3), 0, 9), 0);
        assert_eq!(PetgraphBackend.min_edge_cut(&Graph::path(3), 1, 1), 0);
    }
}
