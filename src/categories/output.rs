//! Sink blocks
//!
//! Sinks hand their envelope to the host and pass it through unchanged, so
//! consecutive sinks each render the same value.

use async_trait::async_trait;

use super::{BlockTransform, TransformContext, Transformed};
use crate::core::envelope::DataEnvelope;
use crate::error::PipelineError;

/// `output-text`: display text
pub struct TextOutputBlock;

#[async_trait]
impl BlockTransform for TextOutputBlock {
    async fn apply(&self, mut ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let text = ctx.take_text()?;
        ctx.collaborators.sink.display_text(ctx.block.id, &text);

        Ok(Transformed {
            summary: format!("Displayed \"{}\"", ctx.preview(&text)),
            envelope: DataEnvelope::Text(text),
        })
    }
}

/// `output-audio`: play the referenced audio
pub struct AudioOutputBlock;

#[async_trait]
impl BlockTransform for AudioOutputBlock {
    async fn apply(&self, mut ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let url = ctx.take_audio_url()?;
        ctx.collaborators.sink.play_audio(ctx.block.id, &url);

        Ok(Transformed {
            summary: format!("Playing {}", url),
            envelope: DataEnvelope::AudioUrl(url),
        })
    }
}
