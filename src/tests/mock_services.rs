//! In-memory collaborators for exercising pipelines without a backend
//!
//! `MockBackend` plays all three services and records every request it
//! receives; `RecordingSink` records what sink blocks rendered; `GatedChat`
//! parks a run inside the `llm` block until the test releases it.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::collaborator::{
    ChatGenerator, ChatRequest, ChatResponse, CollaboratorError, Collaborators, OutputSink,
    SpeechRequest, SpeechResponse, SpeechSynthesizer, Transcriber, TranscriptionRequest,
    TranscriptionResponse,
};
use crate::core::BlockId;

pub const SPEECH_URL: &str = "http://localhost:5000/outputs/tts_1.wav";

/// Scripted stand-in for the transcription, chat, and synthesis services
pub struct MockBackend {
    transcript: Result<String, CollaboratorError>,
    /// `None` echoes the prompt back
    chat_reply: Option<Result<String, CollaboratorError>>,
    speech: Result<String, CollaboratorError>,
    pub transcriptions: Mutex<Vec<TranscriptionRequest>>,
    pub chats: Mutex<Vec<ChatRequest>>,
    pub syntheses: Mutex<Vec<SpeechRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            transcript: Ok("hello world".to_string()),
            chat_reply: None,
            speech: Ok(SPEECH_URL.to_string()),
            transcriptions: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
            syntheses: Mutex::new(Vec::new()),
        }
    }

    pub fn with_transcript(mut self, transcript: Result<&str, CollaboratorError>) -> Self {
        self.transcript = transcript.map(str::to_string);
        self
    }

    pub fn with_chat_reply(mut self, reply: Result<&str, CollaboratorError>) -> Self {
        self.chat_reply = Some(reply.map(str::to_string));
        self
    }

    pub fn with_speech(mut self, url: Result<&str, CollaboratorError>) -> Self {
        self.speech = url.map(str::to_string);
        self
    }

    /// Total number of service calls received
    pub fn call_count(&self) -> usize {
        self.transcriptions.lock().len() + self.chats.lock().len() + self.syntheses.lock().len()
    }
}

#[async_trait]
impl Transcriber for MockBackend {
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, CollaboratorError> {
        self.transcriptions.lock().push(request);
        let text = self.transcript.clone()?;
        Ok(TranscriptionResponse {
            text,
            language: Some("en".to_string()),
            language_probability: Some(0.98),
        })
    }
}

#[async_trait]
impl ChatGenerator for MockBackend {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        let response = match &self.chat_reply {
            Some(reply) => reply.clone()?,
            None => format!("Echo: {}", request.prompt),
        };
        self.chats.lock().push(request);
        Ok(ChatResponse { response })
    }
}

#[async_trait]
impl SpeechSynthesizer for MockBackend {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse, CollaboratorError> {
        let voice_cloned = request.options.reference_audio.is_some();
        self.syntheses.lock().push(request);
        Ok(SpeechResponse {
            audio_url: self.speech.clone()?,
            voice_cloned,
        })
    }
}

/// What a sink block rendered
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Text(BlockId, String),
    Audio(BlockId, String),
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }
}

impl OutputSink for RecordingSink {
    fn display_text(&self, block_id: BlockId, text: &str) {
        self.events.lock().push(SinkEvent::Text(block_id, text.to_string()));
    }

    fn play_audio(&self, block_id: BlockId, audio_url: &str) {
        self.events.lock().push(SinkEvent::Audio(block_id, audio_url.to_string()));
    }
}

/// Sink whose host rendering panics
pub struct PanickingSink;

impl OutputSink for PanickingSink {
    fn display_text(&self, _block_id: BlockId, _text: &str) {
        panic!("host display failed");
    }

    fn play_audio(&self, _block_id: BlockId, _audio_url: &str) {
        panic!("host playback failed");
    }
}

/// Chat service that blocks until released
#[derive(Default)]
pub struct GatedChat {
    /// Notified once a request has arrived
    pub entered: Notify,
    /// Notify to let the pending request complete
    pub release: Notify,
}

#[async_trait]
impl ChatGenerator for GatedChat {
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ChatResponse {
            response: format!("Echo: {}", request.prompt),
        })
    }
}

/// Collaborators that all route to `backend`, rendering into `sink`
pub fn collaborators(backend: &Arc<MockBackend>, sink: &Arc<RecordingSink>) -> Collaborators {
    Collaborators {
        transcriber: backend.clone(),
        chat: backend.clone(),
        synthesizer: backend.clone(),
        sink: sink.clone(),
    }
}
