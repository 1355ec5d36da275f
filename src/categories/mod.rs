//! Per-type block transforms, grouped by category
//!
//! Every block type has exactly one transform: a function from the block's
//! config and the incoming envelope to a new envelope. [`transform_for`] is
//! the dispatch table the engine uses.

pub mod chat;
pub mod input;
pub mod output;
pub mod speech;

use async_trait::async_trait;

use crate::collaborator::{CollaboratorError, Collaborators};
use crate::core::block::{BlockInstance, BlockType};
use crate::core::envelope::{AudioClip, DataEnvelope, EnvelopeKind};
use crate::core::BlockId;
use crate::error::PipelineError;

/// Everything a transform may read
pub struct TransformContext<'a> {
    pub block: &'a BlockInstance,
    /// Envelope produced by the previous block, already kind-checked
    pub input: Option<DataEnvelope>,
    pub collaborators: &'a Collaborators,
    /// Maximum characters of text in the summary
    pub preview_chars: usize,
}

impl TransformContext<'_> {
    fn missing(&self, key: &str) -> PipelineError {
        PipelineError::MissingConfig {
            block_id: self.block.id,
            key: key.to_string(),
        }
    }

    fn mismatch(&self, expected: EnvelopeKind) -> PipelineError {
        PipelineError::TypeMismatch {
            block_id: self.block.id,
            expected,
            actual: self.input.as_ref().map(DataEnvelope::kind),
        }
    }

    /// Non-empty string config value, or `MissingConfig`
    fn required_str(&self, key: &str) -> Result<String, PipelineError> {
        self.block
            .config_str(key)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| self.missing(key))
    }

    fn optional_str(&self, key: &str) -> Option<String> {
        self.block.config_str(key).map(|s| s.trim().to_string())
    }

    fn take_text(&mut self) -> Result<String, PipelineError> {
        match self.input.take() {
            Some(DataEnvelope::Text(text)) => Ok(text),
            other => {
                self.input = other;
                Err(self.mismatch(EnvelopeKind::Text))
            }
        }
    }

    fn take_audio(&mut self) -> Result<AudioClip, PipelineError> {
        match self.input.take() {
            Some(DataEnvelope::Audio(clip)) => Ok(clip),
            other => {
                self.input = other;
                Err(self.mismatch(EnvelopeKind::Audio))
            }
        }
    }

    fn take_audio_url(&mut self) -> Result<String, PipelineError> {
        match self.input.take() {
            Some(DataEnvelope::AudioUrl(url)) => Ok(url),
            other => {
                self.input = other;
                Err(self.mismatch(EnvelopeKind::AudioUrl))
            }
        }
    }

    fn preview(&self, text: &str) -> String {
        crate::core::envelope::truncate(text, self.preview_chars)
    }
}

/// Result of a successful transform
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub envelope: DataEnvelope,
    /// One-line description for the run log
    pub summary: String,
}

/// Behaviour of one block type
#[async_trait]
pub trait BlockTransform: Send + Sync {
    async fn apply(&self, ctx: TransformContext<'_>) -> Result<Transformed, PipelineError>;
}

/// Wrap a collaborator error for the given block
pub(crate) fn collaborator_failure(block_id: BlockId) -> impl FnOnce(CollaboratorError) -> PipelineError {
    move |cause| PipelineError::CollaboratorFailure { block_id, cause }
}

static INPUT_MIC: input::MicInputBlock = input::MicInputBlock;
static INPUT_FILE: input::FileInputBlock = input::FileInputBlock;
static INPUT_TEXT: input::TextInputBlock = input::TextInputBlock;
static STT: speech::SpeechToTextBlock = speech::SpeechToTextBlock;
static LLM: chat::ChatBlock = chat::ChatBlock;
static TTS: speech::TextToSpeechBlock = speech::TextToSpeechBlock;
static OUTPUT_AUDIO: output::AudioOutputBlock = output::AudioOutputBlock;
static OUTPUT_TEXT: output::TextOutputBlock = output::TextOutputBlock;

/// Transform for a block type
pub fn transform_for(block_type: BlockType) -> &'static dyn BlockTransform {
    match block_type {
        BlockType::InputMic => &INPUT_MIC,
        BlockType::InputFile => &INPUT_FILE,
        BlockType::InputText => &INPUT_TEXT,
        BlockType::Stt => &STT,
        BlockType::Llm => &LLM,
        BlockType::Tts => &TTS,
        BlockType::OutputAudio => &OUTPUT_AUDIO,
        BlockType::OutputText => &OUTPUT_TEXT,
    }
}
