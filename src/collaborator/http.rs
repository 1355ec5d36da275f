//! HTTP client for the speech/chat backend
//!
//! Speaks the backend's JSON endpoints. Every response carries a `success`
//! flag; failures come with a human-readable `message`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{
    ChatGenerator, ChatRequest, ChatResponse, CollaboratorError, SpeechRequest, SpeechResponse,
    SpeechSynthesizer, Transcriber, TranscriptionRequest, TranscriptionResponse,
};
use crate::config::BackendConfig;
use crate::core::envelope::AudioClip;

const TRANSCRIBE_PATH: &str = "/api/stt/transcribe";
const CHAT_PATH: &str = "/api/chat/generate";
const SPEECH_PATH: &str = "/api/tts/generate";

/// Collaborator implementation backed by the HTTP API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CollaboratorError::Transport(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path or an already absolute URL
    pub fn resolve_url(&self, path_or_url: &str) -> String {
        resolve_url(&self.base_url, path_or_url)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CollaboratorError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.resolve_url(path);
        debug!(url = %url, "sending JSON request");
        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            CollaboratorError::Transport(e.to_string())
        })?;
        read_envelope(response).await
    }
}

async fn read_envelope<R: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<R, CollaboratorError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "backend returned error status");
        let message = serde_json::from_str::<ApiEnvelope>(&body)
            .ok()
            .and_then(|env| env.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(CollaboratorError::Service {
            status: Some(status.as_u16()),
            message,
        });
    }

    parse_envelope(&body)
}

/// Decode a `{success, message, ...payload}` body
pub(crate) fn parse_envelope<R: DeserializeOwned>(body: &str) -> Result<R, CollaboratorError> {
    let envelope: ApiEnvelope =
        serde_json::from_str(body).map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))?;

    if !envelope.success {
        return Err(CollaboratorError::Service {
            status: None,
            message: envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        });
    }

    serde_json::from_value(serde_json::Value::Object(envelope.payload))
        .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))
}

pub(crate) fn resolve_url(base_url: &str, path_or_url: &str) -> String {
    if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
        path_or_url.to_string()
    } else if path_or_url.starts_with('/') {
        format!("{}{}", base_url, path_or_url)
    } else {
        format!("{}/{}", base_url, path_or_url)
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    payload: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TranscribeBody {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    language_probability: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatBody {
    response: String,
}

#[derive(Debug, Serialize)]
struct SpeechPayload<'a> {
    text: &'a str,
    temperature: f64,
    exaggeration: f64,
    cfg_weight: f64,
    reference_audio: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct SpeechBody {
    url: String,
    #[serde(default)]
    voice_cloned: bool,
}

async fn audio_part(clip: &AudioClip) -> Result<Part, CollaboratorError> {
    let data = match clip {
        AudioClip::File { path } => tokio::fs::read(path).await?,
        AudioClip::Bytes { data, .. } => data.clone(),
    };
    Ok(Part::bytes(data).file_name(clip.file_name()))
}

#[async_trait]
impl Transcriber for HttpBackend {
    #[instrument(skip(self, request), fields(audio = %request.audio))]
    async fn transcribe(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResponse, CollaboratorError> {
        let mut form = Form::new().part("file", audio_part(&request.audio).await?);
        if let Some(language) = request.language {
            form = form.text("language", language);
        }

        let url = self.resolve_url(TRANSCRIBE_PATH);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "transcription request failed");
                CollaboratorError::Transport(e.to_string())
            })?;

        let body: TranscribeBody = read_envelope(response).await?;
        Ok(TranscriptionResponse {
            text: body.text.trim().to_string(),
            language: body.language,
            language_probability: body.language_probability,
        })
    }
}

#[async_trait]
impl ChatGenerator for HttpBackend {
    #[instrument(skip(self, request), fields(provider = %request.provider))]
    async fn generate(&self, request: ChatRequest) -> Result<ChatResponse, CollaboratorError> {
        let body: ChatBody = self.post_json(CHAT_PATH, &request).await?;
        Ok(ChatResponse {
            response: body.response,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpBackend {
    #[instrument(skip(self, request), fields(chars = request.text.len()))]
    async fn synthesize(&self, request: SpeechRequest) -> Result<SpeechResponse, CollaboratorError> {
        let options = &request.options;
        let payload = SpeechPayload {
            text: &request.text,
            temperature: options.temperature,
            exaggeration: options.exaggeration,
            cfg_weight: options.cfg_weight,
            reference_audio: options.reference_audio.as_deref().unwrap_or_default(),
            format: &options.format,
        };

        let body: SpeechBody = self.post_json(SPEECH_PATH, &payload).await?;
        Ok(SpeechResponse {
            audio_url: self.resolve_url(&body.url),
            voice_cloned: body.voice_cloned,
        })
    }
}
