//! Verifier configuration.

use serde::{Deserialize, Serialize};

use crate::error::KrpError;
use crate::graph::ENUMERATION_NODE_CEILING;
use crate::protocol::validate_key_length;

/// Largest supported local key length, in bits.
pub const MAX_KEY_LENGTH: usize = 4096;

/// Default local key length, in bits.
pub const DEFAULT_KEY_LENGTH: usize = 1;

/// Default node limit for graph sweeps.
pub const DEFAULT_MAX_NODES: usize = 5;

/// Settings for a [`Verifier`](crate::Verifier).
///
/// Missing fields take their defaults when deserialized.
///
/// # Example
///
/// ```rust
/// use krp_verify::KrpConfig;
///
/// let config = KrpConfig::from_json(r#"{ "key_length": 8, "seed": 7 }"#).unwrap();
/// assert_eq!(config.key_length, 8);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.max_nodes, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KrpConfig {
    /// Bits per local edge key (1..=4096).
    pub key_length: usize,
    /// Base seed for reproducible key draws. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Largest node count a sweep may enumerate.
    pub max_nodes: usize,
}

impl Default for KrpConfig {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            seed: None,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl KrpConfig {
    /// Set the key length.
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the sweep node limit.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<(), KrpError> {
        validate_key_length(self.key_length)?;
        if self.max_nodes > ENUMERATION_NODE_CEILING {
            return Err(KrpError::InvalidConfig(format!(
                "max_nodes {} exceeds ceiling {}",
                self.max_nodes, ENUMERATION_NODE_CEILING
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, KrpError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
