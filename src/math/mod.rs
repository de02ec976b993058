//! Mathematical primitives for krp-verify.
//!
//! Provides shared math utilities used by simulation and verification:
//!
//! - [`gf2`]: Bit vectors over GF(2) and Gaussian-elimination rank

pub mod gf2;

pub use gf2::{gf2_rank, is_independent_of, BitVector};
