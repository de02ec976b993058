//! Per-edge local keys for one protocol run.

use std::collections::BTreeMap;

use rand::Rng;

use crate::graph::{Edge, Graph};
use crate::math::BitVector;

/// Ephemeral map from edge to an `L`-bit local key.
///
/// Drawn fresh for every run and never reused.
#[derive(Clone, Debug)]
pub struct LocalKeySet {
    keys: BTreeMap<Edge, BitVector>,
    key_length: usize,
}

impl LocalKeySet {
    /// Draw an independent uniform key for every edge of `graph`.
    ///
    /// Keys are drawn in canonical edge order so a seeded RNG reproduces
    /// the same assignment.
    pub fn draw<R: Rng + ?Sized>(graph: &Graph, key_length: usize, rng: &mut R) -> Self {
        let keys = graph
            .edges()
            .map(|e| (e, BitVector::random(key_length, &mut *rng)))
            .collect();
        Self { keys, key_length }
    }

    /// Key on `edge`, if the edge exists.
    pub fn get(&self, edge: &Edge) -> Option<&BitVector> {
        self.keys.get(edge)
    }

    /// Bits per key.
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// `(edge, key)` pairs in canonical edge order.
    pub fn iter(&self) -> impl Iterator<Item = (&Edge, &BitVector)> + '_ {
        self.keys.iter()
    }

    /// Number of keyed edges.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no edge has a key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// XOR of the keys on `edges`.
    ///
    /// Order does not matter. Returns `None` if any edge has no key.
    pub fn xor_fold(&self, edges: &[Edge]) -> Option<BitVector> {
        edges.iter().try_fold(BitVector::zeros(self.key_length), |mut acc, e| {
            acc ^= self.keys.get(e)?;
            Some(acc)
        })
    }
}
