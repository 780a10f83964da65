//! Block Flow - backend for a visual block-programming editor
//!
//! Users snap blocks together on a canvas into a tree-shaped workflow. This
//! crate provides the block catalog the editor offers, the generator that
//! turns a workspace into a JavaScript-like program, a sandboxed runner with
//! validation gates and a time limit, workspace persistence and the text
//! shown in the editor's code and output panels.

pub mod categories;
pub mod codegen;
pub mod config;
pub mod core;
pub mod editor;
pub mod runtime;
pub mod storage;
mod tests;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

// Re-export commonly used types
pub use categories::BlockCategory;
pub use codegen::{GeneratedProgram, GenerationError};
pub use config::EditorConfig;
pub use core::{BlockCatalog, Node, NodeId, NodeKind, Workspace};
pub use editor::{EditorSession, Notification};
pub use runtime::{Runner, RunReport, WorkspaceValidator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
