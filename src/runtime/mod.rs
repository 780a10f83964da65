//! Program runtime
//!
//! This module provides the pre-generation validation gates, the native
//! interpreter for lowered scripts, the time-limited runner, and the hints
//! attached to execution errors.

pub mod engine;
pub mod hints;
pub mod interpreter;
pub mod validation;
pub mod value;

pub use engine::{CancelHandle, ExecutionRecord, RunError, RunReport, Runner, RunnerConfig};
pub use hints::{hint_suffix, ErrorHint};
pub use interpreter::{OutputSink, ProgramError, Sleeper, SyntaxError, TokioSleeper};
pub use validation::{Diagnostic, DiagnosticCode, Severity, WorkspaceValidator};
pub use value::Value;
