//! Block Instance Store - the ordered blocks making up a pipeline
//!
//! The store is a single linear sequence. A block's order is its index in the
//! sequence; there is no separate order field to drift out of sync.

use tracing::debug;

use super::block::{BlockInstance, BlockType};
use super::parameter::ConfigValue;
use super::BlockId;
use crate::error::PipelineError;

/// Ordered collection of block instances
#[derive(Debug, Clone, Default)]
pub struct BlockStore {
    blocks: Vec<BlockInstance>,
}

impl BlockStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Append a new block of the named type with empty config
    ///
    /// # Returns
    /// * `Ok(BlockId)` of the created block
    /// * `Err(PipelineError::UnknownBlockType)` if the type is not in the catalog
    pub fn add_block(&mut self, type_name: &str) -> Result<BlockId, PipelineError> {
        let block_type: BlockType = type_name.parse()?;
        Ok(self.push(block_type))
    }

    /// Append a new block of a known type with empty config
    pub fn push(&mut self, block_type: BlockType) -> BlockId {
        let mut block = BlockInstance::new(block_type);
        while self.contains(block.id) {
            block.id = BlockId::new();
        }
        let id = block.id;
        self.blocks.push(block);
        debug!(block_id = %id, block_type = %block_type, len = self.blocks.len(), "block added");
        id
    }

    /// Remove a block and close the gap
    pub fn remove_block(&mut self, id: BlockId) -> Result<BlockInstance, PipelineError> {
        let index = self.position(id).ok_or(PipelineError::NotFound(id))?;
        let removed = self.blocks.remove(index);
        debug!(block_id = %id, index, "block removed");
        Ok(removed)
    }

    /// Set `config[key] = value` on a block
    ///
    /// Keys are not checked against the block's fields here; that happens
    /// when the pipeline runs.
    pub fn update_block_config(
        &mut self,
        id: BlockId,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Result<(), PipelineError> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(PipelineError::NotFound(id))?;
        block.config.insert(key.into(), value.into());
        Ok(())
    }

    /// Move a block to a new position, shifting the others
    ///
    /// An index past the end places the block last.
    pub fn move_block(&mut self, id: BlockId, to_index: usize) -> Result<(), PipelineError> {
        let from = self.position(id).ok_or(PipelineError::NotFound(id))?;
        let block = self.blocks.remove(from);
        let to = to_index.min(self.blocks.len());
        self.blocks.insert(to, block);
        debug!(block_id = %id, from, to, "block moved");
        Ok(())
    }

    /// Remove every block
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Get a block by id
    pub fn get(&self, id: BlockId) -> Option<&BlockInstance> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Position of a block in the sequence
    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == id)
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.position(id).is_some()
    }

    /// Blocks in execution order
    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockInstance> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Owned copy of the sequence, taken at the start of a run
    pub fn snapshot(&self) -> Vec<BlockInstance> {
        self.blocks.clone()
    }
}
