//! Execution engine
//!
//! Runs a generated program under a wall-clock limit. The program future is
//! raced against the timeout and an external cancel signal; the loser is
//! dropped at its next suspension point, so nothing runs after the race is
//! decided. Output printed before the end of the race is kept in the report.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{info, warn};

use super::interpreter::{check_syntax, Interpreter, OutputSink, Sleeper, SyntaxError, TokioSleeper};
use crate::codegen::GeneratedProgram;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ── Result types ────────────────────────────────────────────────────────────

/// What the execution wrapper returns: `{ success, output, error }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub success: bool,
    #[serde(default)]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionRecord {
    pub fn completed(output: Vec<String>) -> Self {
        Self {
            success: true,
            output,
            error: None,
        }
    }

    pub fn failed(output: Vec<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output,
            error: Some(error.into()),
        }
    }
}

/// Failures outside the program's own error handling
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("Execution timeout ({limit_secs}s limit)")]
    Timeout { limit_secs: u64 },

    #[error("Execution cancelled")]
    Cancelled,

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Outcome of one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: Result<ExecutionRecord, RunError>,
    /// Everything printed, including lines printed before a timeout
    pub captured: Vec<String>,
    pub duration: Duration,
}

impl RunReport {
    /// Ran to the end without an error
    pub fn is_success(&self) -> bool {
        matches!(&self.outcome, Ok(record) if record.success)
    }

    /// The program error or run error, as shown to the user
    pub fn error_message(&self) -> Option<String> {
        match &self.outcome {
            Ok(record) => record.error.clone(),
            Err(e) => Some(e.to_string()),
        }
    }
}

// ── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Wall-clock limit for one run, in seconds
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ── Cancellation ────────────────────────────────────────────────────────────

/// Stops a running program from another task.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Resolves once `cancel` has been called
    async fn cancelled(&self) {
        loop {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

// ── Runner ──────────────────────────────────────────────────────────────────

/// Executes generated programs.
pub struct Runner {
    config: RunnerConfig,
    sleeper: Arc<dyn Sleeper>,
    cancel: CancelHandle,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            sleeper: Arc::new(TokioSleeper),
            cancel: CancelHandle::default(),
        }
    }

    /// Replace the sleep primitive used by `delay`
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Get a handle that can cancel the current run.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Run a program.
    ///
    /// 1. Check the program parses.
    /// 2. Race the interpreter against the timeout and the cancel signal.
    /// 3. Collect the wrapper record, or the reason the race was lost.
    pub async fn run(&self, program: &GeneratedProgram) -> RunReport {
        let start = Instant::now();
        let sink = OutputSink::new();

        // Reset cancellation.
        self.cancel.reset();

        let outcome = match check_syntax(&program.script) {
            Err(e) => Err(RunError::from(e)),
            Ok(()) => {
                let mut interpreter = Interpreter::new(sink.clone(), self.sleeper.clone());
                let limit_secs = self.config.timeout_secs;

                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => Err(RunError::Cancelled),
                    result = tokio::time::timeout(self.timeout(), interpreter.execute(&program.script)) => {
                        match result {
                            Ok(Ok(())) => Ok(ExecutionRecord::completed(sink.lines())),
                            Ok(Err(e)) => Ok(ExecutionRecord::failed(sink.lines(), e.to_string())),
                            Err(_) => Err(RunError::Timeout { limit_secs }),
                        }
                    }
                }
            }
        };

        let report = RunReport {
            outcome,
            captured: sink.lines(),
            duration: start.elapsed(),
        };
        match &report.outcome {
            Ok(record) if record.success => {
                info!(lines = record.output.len(), duration = ?report.duration, "workflow executed")
            }
            Ok(record) => warn!(error = ?record.error, "workflow completed with errors"),
            Err(e) => warn!(error = %e, "workflow execution failed"),
        }
        report
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}
