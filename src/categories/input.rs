//! Source blocks
//!
//! Sources ignore whatever envelope reaches them and start a fresh one from
//! their own configuration.

use async_trait::async_trait;

use super::{BlockTransform, TransformContext, Transformed};
use crate::core::envelope::{AudioClip, DataEnvelope};
use crate::error::PipelineError;

/// `input-text`: configured literal text
pub struct TextInputBlock;

#[async_trait]
impl BlockTransform for TextInputBlock {
    async fn apply(&self, ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        // Leading/trailing whitespace is part of the literal.
        let text = ctx
            .block
            .config_str("text")
            .map(str::to_string)
            .ok_or_else(|| ctx.missing("text"))?;

        Ok(Transformed {
            summary: format!("\"{}\"", ctx.preview(&text)),
            envelope: DataEnvelope::Text(text),
        })
    }
}

/// `input-file`: configured file reference as audio
pub struct FileInputBlock;

#[async_trait]
impl BlockTransform for FileInputBlock {
    async fn apply(&self, ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let clip = AudioClip::file(ctx.required_str("file")?);

        Ok(Transformed {
            summary: format!("Loaded {}", clip),
            envelope: DataEnvelope::Audio(clip),
        })
    }
}

/// `input-mic`: recording captured by the host, stored as a file reference
pub struct MicInputBlock;

#[async_trait]
impl BlockTransform for MicInputBlock {
    async fn apply(&self, ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let clip = AudioClip::file(ctx.required_str("recording")?);

        Ok(Transformed {
            summary: format!("Using recording {}", clip),
            envelope: DataEnvelope::Audio(clip),
        })
    }
}
