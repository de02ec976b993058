//! Linear algebra over GF(2).
//!
//! [`BitVector`] is a packed, fixed-length vector over the two-element
//! field where addition is XOR. It serves two roles: local and relay key
//! values, and indicator vectors of edge subsets for the secrecy check.

use std::fmt;
use std::ops::BitXorAssign;

use rand::Rng;
use serde::{Deserialize, Serialize};

const WORD_BITS: usize = 64;

/// Fixed-length vector over GF(2), packed into 64-bit words.
///
/// Bit `i` lives in word `i / 64` at position `i % 64`. Bits past `len`
/// are always zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    /// Create an all-zero vector of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Create the standard basis vector `e_index` of dimension `len`.
    ///
    /// Returns the zero vector if `index >= len`.
    pub fn unit(len: usize, index: usize) -> Self {
        let mut v = Self::zeros(len);
        v.set(index, true);
        v
    }

    /// Draw a uniformly random vector of `len` bits.
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut v = Self {
            words: (0..len.div_ceil(WORD_BITS)).map(|_| rng.gen::<u64>()).collect(),
            len,
        };
        v.mask_tail();
        v
    }

    /// Build a vector of `len` bits from the low bits of `value`.
    pub fn from_u64(len: usize, value: u64) -> Self {
        let mut v = Self::zeros(len);
        if let Some(first) = v.words.first_mut() {
            *first = value;
        }
        v.mask_tail();
        v
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector has dimension zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `index` (false when out of range).
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Write bit `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len {
            return;
        }
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Whether every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Hamming weight.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Indices of set bits, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    /// Value as `u64` when the vector fits in one word.
    pub fn to_u64(&self) -> Option<u64> {
        match self.words.len() {
            0 => Some(0),
            1 => Some(self.words[0]),
            _ => None,
        }
    }

    fn mask_tail(&mut self) {
        let rem = self.len % WORD_BITS;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }
}

impl BitXorAssign<&BitVector> for BitVector {
    /// Add `rhs` in GF(2). A shorter operand is treated as zero-padded;
    /// the result keeps `self`'s length.
    fn bitxor_assign(&mut self, rhs: &BitVector) {
        for (a, b) in self.words.iter_mut().zip(rhs.words.iter()) {
            *a ^= *b;
        }
        self.mask_tail();
    }
}

impl fmt::Display for BitVector {
    /// Hex, most significant nibble first, `0x`-prefixed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        let nibbles = self.len.div_ceil(4).max(1);
        for n in (0..nibbles).rev() {
            let value = (0..4).fold(0u8, |acc, b| acc | (u8::from(self.get(n * 4 + b)) << b));
            write!(f, "{:x}", value)?;
        }
        Ok(())
    }
}

/// Rank of a set of vectors over GF(2).
///
/// Gaussian elimination on a scratch copy: for each column, search for a
/// pivot at or below the current rank row, swap it into place, then clear
/// that column from every other row. The empty set and all-zero vectors
/// contribute rank 0.
pub fn gf2_rank(rows: &[BitVector]) -> usize {
    if rows.is_empty() {
        return 0;
    }

    let mut matrix: Vec<BitVector> = rows.to_vec();
    let n_cols = matrix.iter().map(BitVector::len).max().unwrap_or(0);
    let mut rank = 0;

    for col in 0..n_cols {
        if rank == matrix.len() {
            break;
        }

        let Some(pivot) = (rank..matrix.len()).find(|&r| matrix[r].get(col)) else {
            continue;
        };
        matrix.swap(rank, pivot);

        let pivot_row = matrix[rank].clone();
        for (i, row) in matrix.iter_mut().enumerate() {
            if i != rank && row.get(col) {
                *row ^= &pivot_row;
            }
        }
        rank += 1;
    }

    rank
}

/// Whether `v` lies outside the span of `basis`.
///
/// True iff appending `v` increases the rank.
pub fn is_independent_of(basis: &[BitVector], v: &BitVector) -> bool {
    let base_rank = gf2_rank(basis);
    let mut extended = Vec::with_capacity(basis.len() + 1);
    extended.extend_from_slice(basis);
    extended.push(v.clone());
    gf2_rank(&extended) > base_rank
}
