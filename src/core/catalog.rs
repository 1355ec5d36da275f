//! Block Catalog - static registry of every available block type
//!
//! The catalog is the single dispatch table for block metadata: display
//! strings, category, configuration fields, and the envelope kinds a block
//! consumes and produces. It supports:
//! - Lookup by type identifier
//! - Listing in palette order or by category
//! - Case-insensitive search

use super::block::{BlockCategory, BlockDefinition, BlockType};
use super::envelope::EnvelopeKind;
use super::parameter::{ConfigField, FieldKind};
use crate::error::PipelineError;

/// Chat providers accepted by the `llm` block
pub const CHAT_PROVIDERS: &[&str] = &["ollama", "openai", "anthropic"];

/// Output formats accepted by the `tts` block
pub const AUDIO_FORMATS: &[&str] = &["wav", "mp3", "ogg", "flac"];

const INPUT_MIC_FIELDS: &[ConfigField] = &[ConfigField::required(
    "recording",
    "Recording",
    FieldKind::File,
)];

const INPUT_FILE_FIELDS: &[ConfigField] =
    &[ConfigField::required("file", "Audio file", FieldKind::File)];

const INPUT_TEXT_FIELDS: &[ConfigField] =
    &[ConfigField::required("text", "Text", FieldKind::LongText)];

const STT_FIELDS: &[ConfigField] = &[ConfigField::optional(
    "language",
    "Language hint",
    FieldKind::Text,
)];

const LLM_FIELDS: &[ConfigField] = &[
    ConfigField::required(
        "provider",
        "Provider",
        FieldKind::Choice {
            options: CHAT_PROVIDERS,
        },
    ),
    ConfigField::optional("model", "Model", FieldKind::Text),
    ConfigField::optional("system_prompt", "System prompt", FieldKind::LongText),
];

const TTS_FIELDS: &[ConfigField] = &[
    ConfigField::optional(
        "temperature",
        "Temperature",
        FieldKind::Number { min: 0.05, max: 5.0 },
    ),
    ConfigField::optional(
        "exaggeration",
        "Exaggeration",
        FieldKind::Number { min: 0.25, max: 2.0 },
    ),
    ConfigField::optional(
        "cfg_weight",
        "CFG weight",
        FieldKind::Number { min: 0.0, max: 1.0 },
    ),
    ConfigField::optional("reference_audio", "Voice reference", FieldKind::File),
    ConfigField::optional(
        "format",
        "Output format",
        FieldKind::Choice {
            options: AUDIO_FORMATS,
        },
    ),
];

static CATALOG: [BlockDefinition; 8] = [
    BlockDefinition {
        block_type: BlockType::InputMic,
        title: "Microphone",
        description: "Record audio from the microphone",
        category: BlockCategory::Input,
        fields: INPUT_MIC_FIELDS,
        input_kind: None,
        output_kind: EnvelopeKind::Audio,
    },
    BlockDefinition {
        block_type: BlockType::InputFile,
        title: "Audio File",
        description: "Upload an audio file",
        category: BlockCategory::Input,
        fields: INPUT_FILE_FIELDS,
        input_kind: None,
        output_kind: EnvelopeKind::Audio,
    },
    BlockDefinition {
        block_type: BlockType::InputText,
        title: "Text Input",
        description: "Enter text directly",
        category: BlockCategory::Input,
        fields: INPUT_TEXT_FIELDS,
        input_kind: None,
        output_kind: EnvelopeKind::Text,
    },
    BlockDefinition {
        block_type: BlockType::Stt,
        title: "Speech to Text",
        description: "Transcribe audio to text",
        category: BlockCategory::Processing,
        fields: STT_FIELDS,
        input_kind: Some(EnvelopeKind::Audio),
        output_kind: EnvelopeKind::Text,
    },
    BlockDefinition {
        block_type: BlockType::Llm,
        title: "AI Chat",
        description: "Generate a reply with a language model",
        category: BlockCategory::Processing,
        fields: LLM_FIELDS,
        input_kind: Some(EnvelopeKind::Text),
        output_kind: EnvelopeKind::Text,
    },
    BlockDefinition {
        block_type: BlockType::Tts,
        title: "Text to Speech",
        description: "Synthesize speech from text",
        category: BlockCategory::Processing,
        fields: TTS_FIELDS,
        input_kind: Some(EnvelopeKind::Text),
        output_kind: EnvelopeKind::AudioUrl,
    },
    BlockDefinition {
        block_type: BlockType::OutputAudio,
        title: "Audio Output",
        description: "Play the generated audio",
        category: BlockCategory::Output,
        fields: &[],
        input_kind: Some(EnvelopeKind::AudioUrl),
        output_kind: EnvelopeKind::AudioUrl,
    },
    BlockDefinition {
        block_type: BlockType::OutputText,
        title: "Text Output",
        description: "Display the resulting text",
        category: BlockCategory::Output,
        fields: &[],
        input_kind: Some(EnvelopeKind::Text),
        output_kind: EnvelopeKind::Text,
    },
];

/// Catalog entry for a known block type
pub fn definition(block_type: BlockType) -> &'static BlockDefinition {
    // CATALOG is laid out in declaration order of BlockType.
    &CATALOG[block_type as usize]
}

/// Look up a block definition by its type identifier
///
/// # Returns
/// * `Ok(&BlockDefinition)` for a member of the closed type set
/// * `Err(PipelineError::UnknownBlockType)` otherwise
///
/// # Example
/// ```
/// use block_pipeline::core::catalog::definition_of;
///
/// let def = definition_of("tts").unwrap();
/// assert_eq!(def.title, "Text to Speech");
/// assert!(definition_of("video").is_err());
/// ```
pub fn definition_of(type_name: &str) -> Result<&'static BlockDefinition, PipelineError> {
    let block_type: BlockType = type_name.parse()?;
    Ok(definition(block_type))
}

/// All definitions in palette order
pub fn definitions() -> &'static [BlockDefinition] {
    &CATALOG
}

/// Definitions belonging to a category
pub fn by_category(category: BlockCategory) -> impl Iterator<Item = &'static BlockDefinition> {
    CATALOG.iter().filter(move |d| d.category == category)
}

/// Search definitions by query string
///
/// Matches the type identifier, title, and description, case-insensitively.
pub fn search(query: &str) -> Vec<&'static BlockDefinition> {
    let query = query.to_lowercase();

    CATALOG
        .iter()
        .filter(|d| {
            d.block_type.as_str().contains(&query)
                || d.title.to_lowercase().contains(&query)
                || d.description.to_lowercase().contains(&query)
        })
        .collect()
}
