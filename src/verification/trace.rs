//! Ordered trace log for a single evaluation.
//!
//! Records each simulation and verification step as a human-readable
//! line. The finished log is moved into the verdict and handed to
//! reporting layers unchanged.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Append-only, ordered log of evaluation steps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceLog {
    entries: Vec<String>,
}

impl TraceLog {
    /// Create a new, empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a line, mirroring it to the `tracing` debug stream.
    pub fn record(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "krp_verify::trace", "{}", line);
        self.entries.push(line);
    }

    /// Append every line of `other`, preserving order.
    pub fn extend(&mut self, other: TraceLog) {
        self.entries.extend(other.entries);
    }

    /// Get all entries.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Whether any entry contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.contains(needle))
    }

    /// Number of recorded lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the log, returning its lines.
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}
