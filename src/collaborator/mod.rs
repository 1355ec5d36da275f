//! External collaborator contracts
//!
//! Blocks of type `stt`, `llm`, and `tts` call out to backend services through
//! these traits; the `output-*` sinks hand their result to the host through
//! [`OutputSink`]. The engine awaits each call and never retries.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::envelope::AudioClip;
use crate::core::BlockId;

pub use http::HttpBackend;

/// Errors reported by collaborators
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollaboratorError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a failure
    #[error("Service error{}: {message}", .status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    Service {
        status: Option<u16>,
        message: String,
    },

    /// The response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The service succeeded but returned nothing usable
    #[error("Empty response from {0}")]
    EmptyResponse(&'static str),

    /// Local I/O failed while preparing the request
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CollaboratorError {
    fn from(error: std::io::Error) -> Self {
        CollaboratorError::Io(error.to_string())
    }
}

/// Transcription request
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    pub audio: AudioClip,
    /// Optional language hint (e.g. "en")
    pub language: Option<String>,
}

/// Transcription result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub text: String,
    /// Detected language
    pub language: Option<String>,
    pub language_probability: Option<f32>,
}

/// Chat-generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Chat-generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Voice parameters for speech synthesis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeechOptions {
    pub temperature: f64,
    pub exaggeration: f64,
    pub cfg_weight: f64,
    /// Reference clip for voice cloning, by uploaded file name
    pub reference_audio: Option<String>,
    pub format: String,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            exaggeration: 0.5,
            cfg_weight: 0.5,
            reference_audio: None,
            format: "wav".to_string(),
        }
    }
}

/// Speech-synthesis request
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub options: SpeechOptions,
}

/// Speech-synthesis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechResponse {
    /// Playable reference to the generated audio
    pub audio_url: String,
    #[serde(default)]
    pub voice_cloned: bool,
}

/// Speech-to-text service
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, CollaboratorError>;
}

/// Language-model chat service
#[async_trait]
pub trait ChatGenerator: Send + Sync {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, CollaboratorError>;
}

/// Text-to-speech service
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse, CollaboratorError>;
}

/// Host-side rendering of sink blocks
pub trait OutputSink: Send + Sync {
    /// Surface text produced by an `output-text` block
    fn display_text(&self, block_id: BlockId, text: &str);

    /// Start playback for an `output-audio` block
    fn play_audio(&self, block_id: BlockId, audio_url: &str);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl OutputSink for NoopSink {
    fn display_text(&self, _block_id: BlockId, _text: &str) {}

    fn play_audio(&self, _block_id: BlockId, _audio_url: &str) {}
}

/// The set of collaborators a pipeline runs against
#[derive(Clone)]
pub struct Collaborators {
    pub transcriber: Arc<dyn Transcriber>,
    pub chat: Arc<dyn ChatGenerator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub sink: Arc<dyn OutputSink>,
}

impl Collaborators {
    /// Use one HTTP backend for all three services, with a no-op sink
    pub fn http(backend: HttpBackend) -> Self {
        let backend = Arc::new(backend);
        Self {
            transcriber: backend.clone(),
            chat: backend.clone(),
            synthesizer: backend,
            sink: Arc::new(NoopSink),
        }
    }

    /// Replace the output sink
    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }
}
