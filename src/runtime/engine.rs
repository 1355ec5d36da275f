//! Execution engine
//!
//! Walks a snapshot of the pipeline in order, threading one data envelope
//! from block to block. Each block is checked (required config, input kind)
//! and then dispatched to its transform. The first failure halts the run.
//! Progress and the outcome are written to the [`RunReporter`]; per-block
//! timing is collected into the returned [`RunReport`].

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::categories::{transform_for, TransformContext, Transformed};
use crate::collaborator::Collaborators;
use crate::core::block::{BlockDefinition, BlockInstance, BlockType};
use crate::core::envelope::DataEnvelope;
use crate::core::BlockId;
use crate::error::PipelineError;

use super::reporter::{RunReporter, RunStatus};
use super::timer::Timer;
use super::validation::{check_config, check_input};

// ── Result types ────────────────────────────────────────────────────────────

/// Timing for one executed block
#[derive(Debug, Clone, Serialize)]
pub struct BlockMetrics {
    pub block_id: BlockId,
    pub block_type: BlockType,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: f64,
    /// Percentage of total run time.
    pub percentage: f64,
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// `Completed` or `Error`
    pub status: RunStatus,
    /// Envelope produced by the last successful block
    pub final_envelope: Option<DataEnvelope>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_error")]
    pub error: Option<PipelineError>,
    /// One entry per block the engine reached, including a failing one
    pub block_metrics: Vec<BlockMetrics>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: f64,
}

fn serialize_error<S: serde::Serializer>(
    error: &Option<PipelineError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// What a call to execute produced
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunReport),
    Failed(RunReport),
    /// A run was already in flight; nothing was changed
    Rejected,
}

impl RunOutcome {
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Completed(report) | RunOutcome::Failed(report) => Some(report),
            RunOutcome::Rejected => None,
        }
    }

    pub fn into_report(self) -> Option<RunReport> {
        match self {
            RunOutcome::Completed(report) | RunOutcome::Failed(report) => Some(report),
            RunOutcome::Rejected => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RunOutcome::Rejected)
    }

    /// The error that halted the run, if it failed
    pub fn error(&self) -> Option<&PipelineError> {
        self.report().and_then(|r| r.error.as_ref())
    }

    /// Final envelope of the run
    pub fn final_envelope(&self) -> Option<&DataEnvelope> {
        self.report().and_then(|r| r.final_envelope.as_ref())
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// Runs block sequences against a set of collaborators
#[derive(Clone)]
pub struct ExecutionEngine {
    collaborators: Collaborators,
    preview_chars: usize,
}

impl ExecutionEngine {
    pub fn new(collaborators: Collaborators, preview_chars: usize) -> Self {
        Self {
            collaborators,
            preview_chars,
        }
    }

    /// Execute `blocks` in order.
    ///
    /// 1. Claim the reporter (`Rejected` if a run is already in flight).
    /// 2. Fail with `EmptyPipeline` if there is nothing to run.
    /// 3. For each block: check config, check input kind, dispatch.
    /// 4. Close the run with `Completed`, or `Error` at the first failure.
    ///
    /// If the future is dropped or a transform panics before step 4, the
    /// run is closed as aborted with status `Error`.
    ///
    /// Errors never escape as `Err`; they are recorded in the reporter and
    /// carried in the returned report.
    #[instrument(skip_all, fields(blocks = blocks.len()))]
    pub async fn execute(&self, blocks: Vec<BlockInstance>, reporter: &RunReporter) -> RunOutcome {
        let Some(guard) = reporter.try_begin() else {
            warn!("run rejected, pipeline is already running");
            return RunOutcome::Rejected;
        };

        let run_timer = Timer::now();

        if blocks.is_empty() {
            let error = PipelineError::EmptyPipeline;
            guard.finish(RunStatus::Error, error.to_string(), None);
            return RunOutcome::Failed(RunReport {
                status: RunStatus::Error,
                final_envelope: None,
                error: Some(error),
                block_metrics: Vec::new(),
                duration_ms: run_timer.elapsed_ms(),
            });
        }

        reporter.info(format!("Starting pipeline with {} blocks", blocks.len()));

        let mut current: Option<DataEnvelope> = None;
        let mut block_metrics = Vec::with_capacity(blocks.len());
        let mut failure: Option<(PipelineError, String, BlockId)> = None;

        for block in &blocks {
            let def = block.definition();
            debug!(block_id = %block.id, block_type = %block.block_type, "executing block");

            let block_timer = Timer::now();
            let result = self.run_block(block, def, current.clone()).await;
            block_metrics.push(BlockMetrics {
                block_id: block.id,
                block_type: block.block_type,
                execution_time_ms: block_timer.elapsed_ms(),
                percentage: 0.0, // computed below
            });

            match result {
                Ok(Transformed { envelope, summary }) => {
                    reporter.success(format!("{}: {}", def.title, summary), Some(block.id));
                    current = Some(envelope);
                }
                Err(error) => {
                    let message = format!("{}: {}", def.title, error);
                    failure = Some((error, message, block.id));
                    break;
                }
            }
        }

        let error = match failure {
            Some((error, message, block_id)) => {
                guard.finish(RunStatus::Error, message, Some(block_id));
                Some(error)
            }
            None => {
                guard.finish(RunStatus::Completed, "Pipeline completed successfully", None);
                None
            }
        };

        let duration_ms = run_timer.elapsed_ms();
        for bm in &mut block_metrics {
            if duration_ms > 0.0 {
                bm.percentage = (bm.execution_time_ms / duration_ms) * 100.0;
            }
        }

        let report = RunReport {
            status: if error.is_some() { RunStatus::Error } else { RunStatus::Completed },
            final_envelope: current,
            error,
            block_metrics,
            duration_ms,
        };

        if report.is_success() {
            RunOutcome::Completed(report)
        } else {
            RunOutcome::Failed(report)
        }
    }

    async fn run_block(
        &self,
        block: &BlockInstance,
        def: &BlockDefinition,
        input: Option<DataEnvelope>,
    ) -> Result<Transformed, PipelineError> {
        check_config(block, def)?;
        check_input(block, def, input.as_ref())?;

        let ctx = TransformContext {
            block,
            input,
            collaborators: &self.collaborators,
            preview_chars: self.preview_chars,
        };
        transform_for(block.block_type).apply(ctx).await
    }
}
