//! Error taxonomy for store mutations and pipeline runs

use crate::collaborator::CollaboratorError;
use crate::core::envelope::EnvelopeKind;
use crate::core::BlockId;

/// Errors raised by the catalog, the block store, and the execution engine.
///
/// `UnknownBlockType` and `NotFound` are returned synchronously by store
/// operations. The remaining variants only occur during a run and end up in
/// the run log and the returned report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// Block type outside the catalog
    #[error("Unknown block type: {0}")]
    UnknownBlockType(String),

    /// No block with the given id in the store
    #[error("Block not found: {0}")]
    NotFound(BlockId),

    /// Run requested on a pipeline without blocks
    #[error("Pipeline is empty, add at least one block")]
    EmptyPipeline,

    /// A required configuration field is absent or empty
    #[error("Block {block_id} is missing required config '{key}'")]
    MissingConfig { block_id: BlockId, key: String },

    /// The incoming envelope does not match the block's input kind
    #[error("Block {block_id} expects {expected} input but received {}", display_kind(.actual))]
    TypeMismatch {
        block_id: BlockId,
        expected: EnvelopeKind,
        actual: Option<EnvelopeKind>,
    },

    /// An external collaborator call failed
    #[error("Block {block_id} failed: {cause}")]
    CollaboratorFailure {
        block_id: BlockId,
        #[source]
        cause: CollaboratorError,
    },
}

impl PipelineError {
    /// Id of the block the error is attributed to, if any
    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            PipelineError::NotFound(id) => Some(*id),
            PipelineError::MissingConfig { block_id, .. }
            | PipelineError::TypeMismatch { block_id, .. }
            | PipelineError::CollaboratorFailure { block_id, .. } => Some(*block_id),
            PipelineError::UnknownBlockType(_) | PipelineError::EmptyPipeline => None,
        }
    }
}

fn display_kind(kind: &Option<EnvelopeKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "nothing".to_string(),
    }
}
