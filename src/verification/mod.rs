//! Verification primitives for relayed keys.
//!
//! - [`mincut`]: Adversary must be an exact minimum s-t edge cut
//! - [`secrecy`]: GF(2) independence of the relay path from observed edges
//! - [`trace`]: Ordered evaluation log

pub mod mincut;
pub mod secrecy;
pub mod trace;

pub use mincut::{check_min_cut, is_exact_min_cut, MinCutCheck};
pub use secrecy::{check_secrecy, EdgeSpace, SecrecyCheck};
pub use trace::TraceLog;
