//! Block types, definitions, and instances
//!
//! A `BlockDefinition` is the immutable catalog entry for a block type. A
//! `BlockInstance` is one configured stage placed in a pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::envelope::EnvelopeKind;
use super::parameter::{ConfigField, ConfigValue};
use super::BlockId;
use crate::error::PipelineError;

/// Closed set of block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    /// Microphone recording
    InputMic,
    /// Uploaded audio file
    InputFile,
    /// Literal text
    InputText,
    /// Speech-to-text
    Stt,
    /// Language-model chat
    Llm,
    /// Text-to-speech
    Tts,
    /// Audio playback sink
    OutputAudio,
    /// Text display sink
    OutputText,
}

impl BlockType {
    /// Every block type, in palette order
    pub const ALL: [BlockType; 8] = [
        BlockType::InputMic,
        BlockType::InputFile,
        BlockType::InputText,
        BlockType::Stt,
        BlockType::Llm,
        BlockType::Tts,
        BlockType::OutputAudio,
        BlockType::OutputText,
    ];

    /// Wire identifier of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::InputMic => "input-mic",
            BlockType::InputFile => "input-file",
            BlockType::InputText => "input-text",
            BlockType::Stt => "stt",
            BlockType::Llm => "llm",
            BlockType::Tts => "tts",
            BlockType::OutputAudio => "output-audio",
            BlockType::OutputText => "output-text",
        }
    }

    /// Catalog entry for this type
    pub fn definition(&self) -> &'static BlockDefinition {
        super::catalog::definition(*self)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownBlockType(s.to_string()))
    }
}

/// Block categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    /// Sources that start a chain
    Input,
    /// Stages backed by an external collaborator
    Processing,
    /// Terminal sinks
    Output,
}

impl BlockCategory {
    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            BlockCategory::Input => "Input",
            BlockCategory::Processing => "Processing",
            BlockCategory::Output => "Output",
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Immutable catalog entry for a block type
#[derive(Debug, Serialize)]
pub struct BlockDefinition {
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub title: &'static str,
    pub description: &'static str,
    pub category: BlockCategory,
    /// Configuration fields, required ones first
    pub fields: &'static [ConfigField],
    /// Envelope kind consumed; `None` for sources
    pub input_kind: Option<EnvelopeKind>,
    /// Envelope kind produced
    pub output_kind: EnvelopeKind,
}

impl BlockDefinition {
    /// Keys that must be present and non-empty before the block executes
    pub fn required_config_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.key)
    }

    /// Field definition for a key, if the type declares it
    pub fn field(&self, key: &str) -> Option<&'static ConfigField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Source blocks ignore any incoming envelope
    pub fn is_source(&self) -> bool {
        self.input_kind.is_none()
    }

    pub fn is_sink(&self) -> bool {
        self.category == BlockCategory::Output
    }
}

/// One configured block placed in a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    pub id: BlockId,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub config: HashMap<String, ConfigValue>,
}

impl BlockInstance {
    /// Create an instance with a fresh id and empty config
    pub fn new(block_type: BlockType) -> Self {
        Self {
            id: BlockId::new(),
            block_type,
            config: HashMap::new(),
        }
    }

    /// Builder-style config setter
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    pub fn definition(&self) -> &'static BlockDefinition {
        self.block_type.definition()
    }

    /// Config value for `key`, treating empty values as absent
    pub fn config_value(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get(key).filter(|v| !v.is_empty())
    }

    /// Non-empty string config value for `key`
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config_value(key).and_then(|v| v.as_string())
    }

    /// Numeric config value for `key`
    pub fn config_number(&self, key: &str) -> Option<f64> {
        self.config_value(key).and_then(|v| v.as_number())
    }
}
