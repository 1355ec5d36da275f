//! Core pipeline abstractions and types
//!
//! This module defines the block catalog, block instances and their store,
//! configuration values, and the data envelope threaded between blocks.

pub mod block;
pub mod catalog;
pub mod envelope;
pub mod parameter;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use block::{BlockCategory, BlockDefinition, BlockInstance, BlockType};
pub use envelope::{AudioClip, DataEnvelope, EnvelopeKind};
pub use parameter::{ConfigField, ConfigValue, FieldKind};
pub use store::BlockStore;

/// Unique identifier for a block instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Generate a new random block ID
    pub fn new() -> Self {
        BlockId(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BlockId(Uuid::parse_str(s)?))
    }
}
