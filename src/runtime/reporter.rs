//! Run Reporter - run status and the append-only run log
//!
//! The reporter is the only channel through which a run's outcome is
//! observable by the host. Each entry is also mirrored to `tracing`.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::BlockId;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Error,
}

impl RunStatus {
    /// Whether the status ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Error)
    }
}

/// Log entry levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

/// One timestamped log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Block the entry describes, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
}

#[derive(Debug, Default)]
struct RunState {
    status: RunStatus,
    log: Vec<LogEntry>,
    /// Latest timestamp handed out; survives `clear_log`
    last_timestamp: Option<DateTime<Utc>>,
}

/// Shared handle to a pipeline's run status and log
#[derive(Debug, Clone, Default)]
pub struct RunReporter {
    state: Arc<Mutex<RunState>>,
}

impl RunReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status
    pub fn status(&self) -> RunStatus {
        self.state.lock().status
    }

    /// Copy of the log in append order
    pub fn log(&self) -> Vec<LogEntry> {
        self.state.lock().log.clone()
    }

    pub fn log_len(&self) -> usize {
        self.state.lock().log.len()
    }

    /// Empty the log; status and the pipeline are untouched
    pub fn clear_log(&self) {
        self.state.lock().log.clear();
    }

    /// Atomically move to `Running` unless a run is already in flight.
    ///
    /// Returns `None` without any change when the status is `Running`. The
    /// returned guard closes the run; if it is dropped before
    /// [`RunGuard::finish`], the run is marked as aborted.
    pub(crate) fn try_begin(&self) -> Option<RunGuard> {
        let mut state = self.state.lock();
        if state.status == RunStatus::Running {
            return None;
        }
        state.status = RunStatus::Running;
        Some(RunGuard {
            reporter: self.clone(),
            finished: false,
        })
    }

    /// Set a terminal status and append the closing entry in one step
    fn finish(&self, status: RunStatus, message: String, block_id: Option<BlockId>) {
        let level = match status {
            RunStatus::Error => LogLevel::Error,
            _ => LogLevel::Success,
        };
        let mut state = self.state.lock();
        state.status = status;
        Self::append_locked(&mut state, level, message, block_id);
    }

    /// Close a run that ended without `finish` (cancelled future or panic)
    fn abort(&self) {
        let mut state = self.state.lock();
        if state.status.is_terminal() {
            return;
        }
        state.status = RunStatus::Error;
        Self::append_locked(&mut state, LogLevel::Error, "Pipeline run aborted".to_string(), None);
    }

    pub(crate) fn info(&self, message: impl Into<String>) {
        self.append(LogLevel::Info, message.into(), None);
    }

    pub(crate) fn success(&self, message: impl Into<String>, block_id: Option<BlockId>) {
        self.append(LogLevel::Success, message.into(), block_id);
    }

    fn append(&self, level: LogLevel, message: String, block_id: Option<BlockId>) {
        let mut state = self.state.lock();
        Self::append_locked(&mut state, level, message, block_id);
    }

    fn append_locked(state: &mut RunState, level: LogLevel, message: String, block_id: Option<BlockId>) {
        match level {
            LogLevel::Error => error!(block_id = ?block_id, "{}", message),
            LogLevel::Info | LogLevel::Success => info!(block_id = ?block_id, "{}", message),
        }

        // Wall-clock time can step backwards; keep the log monotonic.
        let now = Utc::now();
        let timestamp = match state.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        state.last_timestamp = Some(timestamp);

        state.log.push(LogEntry {
            timestamp,
            level,
            message,
            block_id,
        });
    }
}

/// Claim on a running pipeline, released by [`RunGuard::finish`] or on drop
#[must_use = "dropping the guard aborts the run"]
pub(crate) struct RunGuard {
    reporter: RunReporter,
    finished: bool,
}

impl RunGuard {
    /// Close the run with a terminal status and its closing entry
    pub(crate) fn finish(mut self, status: RunStatus, message: impl Into<String>, block_id: Option<BlockId>) {
        self.finished = true;
        self.reporter.finish(status, message.into(), block_id);
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.finished {
            warn!("pipeline run ended without a terminal status");
            self.reporter.abort();
        }
    }
}
