//! Block Pipeline - block-based voice pipeline builder and runner
//!
//! A pipeline is an ordered list of typed blocks (sources, speech and chat
//! processors, sinks). Running it threads one data envelope through the
//! blocks in order, calling external speech-to-text, chat, and
//! text-to-speech services along the way, and records progress in a run log.

pub mod categories;
pub mod collaborator;
pub mod config;
pub mod core;
pub mod error;
pub mod runtime;
mod tests;

// Re-export commonly used types
pub use collaborator::{Collaborators, HttpBackend, OutputSink};
pub use config::PipelineConfig;
pub use crate::core::{BlockId, BlockInstance, BlockType, DataEnvelope, EnvelopeKind};
pub use error::PipelineError;
pub use runtime::{LogEntry, LogLevel, Pipeline, RunOutcome, RunReport, RunStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
