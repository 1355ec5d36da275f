//! Speech blocks: `stt` and `tts`

use async_trait::async_trait;
use tracing::debug;

use super::{collaborator_failure, BlockTransform, TransformContext, Transformed};
use crate::collaborator::{CollaboratorError, SpeechOptions, SpeechRequest, TranscriptionRequest};
use crate::core::envelope::DataEnvelope;
use crate::error::PipelineError;

/// `stt`: audio in, transcript out
pub struct SpeechToTextBlock;

#[async_trait]
impl BlockTransform for SpeechToTextBlock {
    async fn apply(&self, mut ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let audio = ctx.take_audio()?;
        let block_id = ctx.block.id;
        let request = TranscriptionRequest {
            audio,
            language: ctx.optional_str("language"),
        };

        debug!(block_id = %block_id, audio = %request.audio, "requesting transcription");
        let response = ctx
            .collaborators
            .transcriber
            .transcribe(request)
            .await
            .map_err(collaborator_failure(block_id))?;

        if response.text.trim().is_empty() {
            return Err(collaborator_failure(block_id)(CollaboratorError::EmptyResponse(
                "transcription",
            )));
        }

        let detected = match (&response.language, response.language_probability) {
            (Some(lang), Some(p)) => format!(" ({}, {:.0}%)", lang, p * 100.0),
            (Some(lang), None) => format!(" ({})", lang),
            _ => String::new(),
        };

        Ok(Transformed {
            summary: format!("Transcribed{}: \"{}\"", detected, ctx.preview(&response.text)),
            envelope: DataEnvelope::Text(response.text),
        })
    }
}

/// `tts`: text in, playable URL out
pub struct TextToSpeechBlock;

impl TextToSpeechBlock {
    /// Voice options from block config; unset or unparsable values keep defaults
    pub fn options(ctx: &TransformContext<'_>) -> SpeechOptions {
        let defaults = SpeechOptions::default();
        let block = ctx.block;

        SpeechOptions {
            temperature: block.config_number("temperature").unwrap_or(defaults.temperature),
            exaggeration: block.config_number("exaggeration").unwrap_or(defaults.exaggeration),
            cfg_weight: block.config_number("cfg_weight").unwrap_or(defaults.cfg_weight),
            reference_audio: ctx.optional_str("reference_audio"),
            format: ctx
                .optional_str("format")
                .map(|f| f.to_lowercase())
                .unwrap_or(defaults.format),
        }
    }
}

#[async_trait]
impl BlockTransform for TextToSpeechBlock {
    async fn apply(&self, mut ctx: TransformContext<'_>) -> Result<Transformed, PipelineError> {
        let text = ctx.take_text()?;
        let block_id = ctx.block.id;
        let request = SpeechRequest {
            text,
            options: Self::options(&ctx),
        };

        debug!(block_id = %block_id, chars = request.text.chars().count(), "requesting speech synthesis");
        let response = ctx
            .collaborators
            .synthesizer
            .synthesize(request)
            .await
            .map_err(collaborator_failure(block_id))?;

        if response.audio_url.trim().is_empty() {
            return Err(collaborator_failure(block_id)(CollaboratorError::EmptyResponse(
                "speech synthesis",
            )));
        }

        let cloned = if response.voice_cloned { " (voice cloned)" } else { "" };
        Ok(Transformed {
            summary: format!("Generated audio{}: {}", cloned, response.audio_url),
            envelope: DataEnvelope::AudioUrl(response.audio_url),
        })
    }
}
