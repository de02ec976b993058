//! Simple undirected graphs over integer node ids.
//!
//! - [`Graph`]: immutable node and edge sets with canonical edges
//! - [`enumerate`]: brute-force enumeration of isomorphism classes
//! - [`backend`]: injected isomorphism and min-cut capabilities

pub mod backend;
pub mod enumerate;

pub use backend::{IsomorphismTest, MinCutSolver, PetgraphBackend};
pub use enumerate::{enumerate_graphs, enumerate_graphs_with, ENUMERATION_NODE_CEILING};

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KrpError;

/// Node identifier.
pub type NodeId = u32;

/// Undirected edge with the smaller endpoint first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    u: NodeId,
    v: NodeId,
}

impl Edge {
    /// Canonicalize `(a, b)` so the smaller id comes first.
    ///
    /// Rejects self-loops.
    pub fn new(a: NodeId, b: NodeId) -> Result<Self, KrpError> {
        if a == b {
            return Err(KrpError::SelfLoop(a));
        }
        Ok(Self::ordered(a, b))
    }

    fn ordered(a: NodeId, b: NodeId) -> Self {
        Self {
            u: a.min(b),
            v: a.max(b),
        }
    }

    /// Smaller endpoint.
    pub fn u(&self) -> NodeId {
        self.u
    }

    /// Larger endpoint.
    pub fn v(&self) -> NodeId {
        self.v
    }

    /// Whether `node` is an endpoint.
    pub fn touches(&self, node: NodeId) -> bool {
        self.u == node || self.v == node
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.u, self.v)
    }
}

impl TryFrom<(NodeId, NodeId)> for Edge {
    type Error = KrpError;

    fn try_from((a, b): (NodeId, NodeId)) -> Result<Self, Self::Error> {
        Edge::new(a, b)
    }
}

/// Immutable simple undirected graph.
///
/// Edges are stored in canonical order; that order is the edge ordering
/// used for GF(2) indicator vectors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    nodes: BTreeSet<NodeId>,
    edges: BTreeSet<Edge>,
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Graph {
    /// Build a graph from explicit nodes and edges.
    ///
    /// Edges are canonicalized and deduplicated. Every edge endpoint must
    /// be listed in `nodes`.
    pub fn new<N, E>(nodes: N, edges: E) -> Result<Self, KrpError>
    where
        N: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let nodes: BTreeSet<NodeId> = nodes.into_iter().collect();
        let mut canonical = BTreeSet::new();
        for (a, b) in edges {
            let edge = Edge::new(a, b)?;
            for n in [edge.u, edge.v] {
                if !nodes.contains(&n) {
                    return Err(KrpError::UnknownNode(n));
                }
            }
            canonical.insert(edge);
        }
        Ok(Self::build(nodes, canonical))
    }

    /// Build a graph whose node set is the endpoints of `edges`.
    pub fn from_edges<E>(edges: E) -> Result<Self, KrpError>
    where
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let edges: Vec<(NodeId, NodeId)> = edges.into_iter().collect();
        let nodes: Vec<NodeId> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        Self::new(nodes, edges)
    }

    /// Graph on nodes `0..n` with no edges.
    pub fn empty(n: usize) -> Self {
        Self::build((0..n as NodeId).collect(), BTreeSet::new())
    }

    /// Path graph `0 - 1 - ... - (n-1)`.
    pub fn path(n: usize) -> Self {
        let n = n as NodeId;
        let edges = (1..n).map(|i| Edge::ordered(i - 1, i)).collect();
        Self::build((0..n).collect(), edges)
    }

    /// Graph on nodes `0..n` keeping only the listed canonical edges.
    pub(crate) fn from_canonical(n: usize, edges: impl IntoIterator<Item = Edge>) -> Self {
        Self::build((0..n as NodeId).collect(), edges.into_iter().collect())
    }

    fn build(nodes: BTreeSet<NodeId>, edges: BTreeSet<Edge>) -> Self {
        let mut adjacency: BTreeMap<NodeId, BTreeSet<NodeId>> =
            nodes.iter().map(|&n| (n, BTreeSet::new())).collect();
        for e in &edges {
            adjacency.entry(e.u).or_default().insert(e.v);
            adjacency.entry(e.v).or_default().insert(e.u);
        }
        Self {
            nodes,
            edges,
            adjacency,
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Edges in canonical order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Whether `node` is in the graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Whether `edge` is in the graph.
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Neighbors of `node` in ascending order (empty for unknown nodes).
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&node).into_iter().flatten().copied()
    }

    /// Degree of `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency.get(&node).map_or(0, BTreeSet::len)
    }

    /// Sorted degree sequence, an isomorphism invariant.
    pub fn degree_sequence(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = self.nodes().map(|n| self.degree(n)).collect();
        degrees.sort_unstable();
        degrees
    }

    /// Copy of this graph with `removed` edges deleted.
    pub fn without_edges<'a, I>(&self, removed: I) -> Self
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let removed: BTreeSet<&Edge> = removed.into_iter().collect();
        let edges = self.edges.iter().filter(|e| !removed.contains(e)).copied().collect();
        Self::build(self.nodes.clone(), edges)
    }

    /// Hop distances from `source` to every reachable node.
    fn bfs_distances(&self, source: NodeId) -> BTreeMap<NodeId, usize> {
        let mut dist = BTreeMap::new();
        if !self.contains_node(source) {
            return dist;
        }
        let mut queue = VecDeque::from([source]);
        dist.insert(source, 0);
        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            for next in self.neighbors(current) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Whether `a` and `b` lie in the same connected component.
    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.bfs_distances(a).contains_key(&b)
    }

    /// Shortest path from `source` to `target`.
    ///
    /// Among all shortest paths, returns the lexicographically smallest
    /// node sequence. Returns `None` when no path exists.
    pub fn shortest_path(&self, source: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
        let to_target = self.bfs_distances(target);
        let mut remaining = *to_target.get(&source)?;

        let mut path = vec![source];
        let mut current = source;
        while remaining > 0 {
            // Greedy smallest neighbor one hop closer to the target
            current = self
                .neighbors(current)
                .find(|n| to_target.get(n) == Some(&(remaining - 1)))?;
            path.push(current);
            remaining -= 1;
        }
        Some(path)
    }
}

/// Canonical edges traversed by a node path.
pub fn path_edges(path: &[NodeId]) -> Vec<Edge> {
    path.windows(2).map(|w| Edge::ordered(w[0], w[1])).collect()
}
