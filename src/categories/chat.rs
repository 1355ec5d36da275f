//! `llm` block: prompt in, model reply out

use async_trait::async_trait;
use tracing::debug;

use super::{collaborator_failure, BlockTransform, TransformContext, Transformed};
use crate::collaborator::{ChatRequest, CollaboratorError};
use crate::core::envelope::DataEnvelope;
use crate::error::PipelineError;

pub struct ChatBlock;

#[async_trait]
impl BlockTransform for ChatBlock {
    async fn apply(&self, mut ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let provider = ctx.required_str("provider")?.to_lowercase();
        let prompt = ctx.take_text()?;
        let block_id = ctx.block.id;
        let request = ChatRequest {
            prompt,
            provider,
            system_prompt: ctx.optional_str("system_prompt"),
            model: ctx.optional_str("model"),
        };

        debug!(block_id = %block_id, provider = %request.provider, "requesting chat completion");
        let provider = request.provider.clone();
        let response = ctx
            .collaborators
            .chat
            .generate(request)
            .await
            .map_err(collaborator_failure(block_id))?;

        if response.response.trim().is_empty() {
            return Err(collaborator_failure(block_id)(CollaboratorError::EmptyResponse("LLM")));
        }

        Ok(Transformed {
            summary: format!("Response via {}: \"{}\"", provider, ctx.preview(&response.response)),
            envelope: DataEnvelope::Text(response.response),
        })
    }
}
