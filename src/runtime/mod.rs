//! Pipeline runtime
//!
//! [`Pipeline`] is the host-facing context: it owns the block store, the run
//! reporter, and the execution engine. Independent pipelines share nothing.

pub mod engine;
pub mod reporter;
pub mod timer;
pub mod validation;

use parking_lot::RwLock;
use tracing::info;

use crate::collaborator::{CollaboratorError, Collaborators, HttpBackend};
use crate::config::PipelineConfig;
use crate::core::block::BlockInstance;
use crate::core::parameter::ConfigValue;
use crate::core::store::BlockStore;
use crate::core::BlockId;
use crate::error::PipelineError;

pub use engine::{BlockMetrics, ExecutionEngine, RunOutcome, RunReport};
pub use reporter::{LogEntry, LogLevel, RunReporter, RunStatus};
pub use validation::{PipelineValidationResult, PipelineValidator, ValidationIssue};

/// A voice pipeline under construction and its run state
pub struct Pipeline {
    store: RwLock<BlockStore>,
    reporter: RunReporter,
    engine: ExecutionEngine,
    config: PipelineConfig,
}

impl Pipeline {
    /// Pipeline with default configuration
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_config(collaborators, PipelineConfig::default())
    }

    pub fn with_config(collaborators: Collaborators, config: PipelineConfig) -> Self {
        Self {
            store: RwLock::new(BlockStore::new()),
            reporter: RunReporter::new(),
            engine: ExecutionEngine::new(collaborators, config.preview_chars),
            config,
        }
    }

    /// Pipeline backed by the HTTP services named in `config`
    pub fn connect(config: PipelineConfig) -> Result<Self, CollaboratorError> {
        let backend = HttpBackend::new(&config.backend)?;
        info!(base_url = %backend.base_url(), "using HTTP backend");
        Ok(Self::with_config(Collaborators::http(backend), config))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ── Store ───────────────────────────────────────────────────────────────

    /// Append a block of the named type; see [`BlockStore::add_block`]
    pub fn add_block(&self, type_name: &str) -> Result<BlockId, PipelineError> {
        self.store.write().add_block(type_name)
    }

    pub fn remove_block(&self, id: BlockId) -> Result<BlockInstance, PipelineError> {
        self.store.write().remove_block(id)
    }

    pub fn update_block_config(
        &self,
        id: BlockId,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Result<(), PipelineError> {
        self.store.write().update_block_config(id, key, value)
    }

    pub fn move_block(&self, id: BlockId, to_index: usize) -> Result<(), PipelineError> {
        self.store.write().move_block(id, to_index)
    }

    /// Remove every block; the log and status are kept
    pub fn clear_pipeline(&self) {
        self.store.write().clear();
    }

    /// Copy of the blocks in execution order
    pub fn blocks(&self) -> Vec<BlockInstance> {
        self.store.read().snapshot()
    }

    pub fn block(&self, id: BlockId) -> Option<BlockInstance> {
        self.store.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    // ── Runs ────────────────────────────────────────────────────────────────

    /// Check the current blocks without running them
    pub fn validate(&self) -> PipelineValidationResult {
        PipelineValidator::validate(self.store.read().blocks())
    }

    /// Run the current blocks once.
    ///
    /// The run works on a snapshot; edits made while it is in flight apply
    /// to the next run. Returns [`RunOutcome::Rejected`] if a run is
    /// already in progress on this pipeline.
    pub async fn execute_pipeline(&self) -> RunOutcome {
        let snapshot = self.store.read().snapshot();
        self.engine.execute(snapshot, &self.reporter).await
    }

    // ── Reporter ────────────────────────────────────────────────────────────

    pub fn status(&self) -> RunStatus {
        self.reporter.status()
    }

    pub fn log(&self) -> Vec<LogEntry> {
        self.reporter.log()
    }

    pub fn clear_log(&self) {
        self.reporter.clear_log();
    }

    /// Shared handle to the status and log, for observers
    pub fn reporter(&self) -> RunReporter {
        self.reporter.clone()
    }
}
