//! Data envelope flowing between consecutive blocks
//!
//! A run threads exactly one envelope through the pipeline. Each block
//! replaces it with a new one; nothing mutates an envelope in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Envelope kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// Plain text
    Text,
    /// Audio payload (file reference or blob)
    Audio,
    /// Playable URL of generated audio
    AudioUrl,
}

impl EnvelopeKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeKind::Text => "text",
            EnvelopeKind::Audio => "audio",
            EnvelopeKind::AudioUrl => "audio_url",
        }
    }
}

impl fmt::Display for EnvelopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio payload carried by an `audio` envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AudioClip {
    /// Reference to an uploaded or recorded file
    File { path: PathBuf },
    /// In-memory audio data
    Bytes { name: String, data: Vec<u8> },
}

impl AudioClip {
    /// Create a clip that refers to a file
    pub fn file(path: impl Into<PathBuf>) -> Self {
        AudioClip::File { path: path.into() }
    }

    /// File name used when uploading the clip
    pub fn file_name(&self) -> String {
        match self {
            AudioClip::File { path } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "audio.wav".to_string()),
            AudioClip::Bytes { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioClip::File { path } => write!(f, "{}", path.display()),
            AudioClip::Bytes { name, data } => write!(f, "{} ({} bytes)", name, data.len()),
        }
    }
}

/// Typed value passed between blocks during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum DataEnvelope {
    /// Text payload
    Text(String),
    /// Audio payload
    Audio(AudioClip),
    /// Playable audio URL
    AudioUrl(String),
}

impl DataEnvelope {
    /// Kind tag of the envelope
    pub fn kind(&self) -> EnvelopeKind {
        match self {
            DataEnvelope::Text(_) => EnvelopeKind::Text,
            DataEnvelope::Audio(_) => EnvelopeKind::Audio,
            DataEnvelope::AudioUrl(_) => EnvelopeKind::AudioUrl,
        }
    }

    /// Text content, if this is a text envelope
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataEnvelope::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Audio clip, if this is an audio envelope
    pub fn as_audio(&self) -> Option<&AudioClip> {
        match self {
            DataEnvelope::Audio(clip) => Some(clip),
            _ => None,
        }
    }

    /// URL, if this is an audio_url envelope
    pub fn as_audio_url(&self) -> Option<&str> {
        match self {
            DataEnvelope::AudioUrl(url) => Some(url),
            _ => None,
        }
    }

    /// Short human-readable rendering for log lines.
    ///
    /// Text longer than `max_chars` characters is cut and suffixed with `...`.
    pub fn preview(&self, max_chars: usize) -> String {
        match self {
            DataEnvelope::Text(text) => truncate(text, max_chars),
            DataEnvelope::Audio(clip) => clip.to_string(),
            DataEnvelope::AudioUrl(url) => url.clone(),
        }
    }
}

/// Cut `text` to at most `max_chars` characters, respecting char boundaries
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
