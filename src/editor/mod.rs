//! Editor session
//!
//! Holds everything one editing surface works with: the workspace, the last
//! generated program, the text of both panels and the persistence store.
//! Each user action is a method that updates that state and returns the
//! notification to show. No action is fatal.

pub mod panels;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::codegen::{self, GeneratedProgram};
use crate::config::EditorConfig;
use crate::core::node::Workspace;
use crate::core::registry::BlockCatalog;
use crate::runtime::engine::{ExecutionRecord, RunReport, Runner};
use crate::runtime::validation::{Diagnostic, Severity, WorkspaceValidator};
use crate::storage::{MemoryStorage, Storage, WorkspaceStore};

/// Prompt shown before clearing the workspace
pub const CLEAR_CONFIRM_PROMPT: &str =
    "⚠️ Are you sure you want to clear the workspace? This will remove all blocks and reset everything.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl From<&Diagnostic> for Notification {
    fn from(diagnostic: &Diagnostic) -> Self {
        match diagnostic.severity {
            Severity::Warning => Notification::warning(diagnostic.message.clone()),
            Severity::Error => Notification::error(diagnostic.message.clone()),
        }
    }
}

pub struct EditorSession {
    catalog: BlockCatalog,
    workspace: Workspace,
    program: Option<GeneratedProgram>,
    diagnostic: Option<Diagnostic>,
    last_report: Option<RunReport>,
    code_panel: String,
    output_panel: String,
    store: WorkspaceStore,
    runner: Runner,
    autosave: bool,
}

impl EditorSession {
    pub fn new(config: EditorConfig, backend: Box<dyn Storage>) -> Self {
        Self {
            catalog: BlockCatalog::standard(),
            workspace: Workspace::new(),
            program: None,
            diagnostic: None,
            last_report: None,
            code_panel: panels::CODE_PLACEHOLDER.to_string(),
            output_panel: panels::OUTPUT_PLACEHOLDER.to_string(),
            store: WorkspaceStore::new(backend, config.storage),
            runner: Runner::new(config.runner),
            autosave: config.autosave,
        }
    }

    /// A session whose saves live only as long as it does
    pub fn in_memory(config: EditorConfig) -> Self {
        Self::new(config, Box::new(MemoryStorage::new()))
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn program(&self) -> Option<&GeneratedProgram> {
        self.program.as_ref()
    }

    /// Diagnostic from the last generate, if it was rejected
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    pub fn code_panel(&self) -> &str {
        &self.code_panel
    }

    pub fn output_panel(&self) -> &str {
        &self.output_panel
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }

    // ── Actions ─────────────────────────────────────────────────────────

    /// Replace the workspace after an edit
    pub fn set_workspace(&mut self, mut workspace: Workspace) {
        self.catalog.conform(&mut workspace);
        self.workspace = workspace;
        if self.autosave {
            self.store.autosave(&self.workspace);
        }
    }

    /// Validate and generate. The previous program is discarded either way.
    pub fn generate(&mut self) -> Notification {
        self.program = None;
        self.diagnostic = None;

        if let Err(diagnostic) = WorkspaceValidator::validate(&self.workspace) {
            warn!(code = ?diagnostic.code, "workspace rejected");
            self.code_panel = diagnostic.placeholder.clone();
            let notification = Notification::from(&diagnostic);
            self.diagnostic = Some(diagnostic);
            return notification;
        }

        match codegen::generate(&self.workspace) {
            Ok(program) => {
                info!(bytes = program.display.len(), "code generated");
                self.code_panel = panels::code_view(&program.display);
                self.program = Some(program);
                Notification::success("✅ Code generated successfully!")
            }
            Err(e) => {
                error!(error = %e, "code generation failed");
                self.code_panel = panels::generation_error(&e.to_string());
                Notification::error(format!("❌ Error generating code: {e}"))
            }
        }
    }

    /// Execute the last generated program
    pub async fn run(&mut self) -> Notification {
        let Some(program) = self.program.as_ref() else {
            self.output_panel = panels::NO_CODE.to_string();
            return Notification::warning("⚠️ Please generate code first!");
        };

        let report = self.runner.run(program).await;
        self.output_panel = panels::render_report(&report);
        let notification = match &report.outcome {
            Ok(record) => Self::record_notification(record),
            Err(e) => Notification::error(format!("❌ Error executing workflow: {e}")),
        };
        self.last_report = Some(report);
        notification
    }

    /// Show a record produced by a host that executed the wrapped program
    pub fn show_record(&mut self, record: &ExecutionRecord) -> Notification {
        self.output_panel = panels::render_record(record);
        Self::record_notification(record)
    }

    /// Show an error raised outside the wrapper by a host execution
    pub fn show_execution_error(&mut self, message: &str) -> Notification {
        self.output_panel = panels::render_execution_error(message);
        Notification::error(format!("❌ Error executing workflow: {message}"))
    }

    /// Clear everything. Does nothing unless the user confirmed.
    pub fn clear(&mut self, confirmed: bool) -> Option<Notification> {
        if !confirmed {
            return None;
        }
        self.workspace.clear();
        self.program = None;
        self.diagnostic = None;
        self.last_report = None;
        self.code_panel = panels::CODE_PLACEHOLDER.to_string();
        self.output_panel = panels::OUTPUT_PLACEHOLDER.to_string();
        if self.autosave {
            self.store.autosave(&self.workspace);
        }
        info!("workspace cleared");
        Some(Notification::success("🗑️ Workspace cleared successfully!"))
    }

    pub fn save(&self) -> Notification {
        match self.store.save(&self.workspace) {
            Ok(_) => Notification::success("💾 Workflow saved successfully!"),
            Err(e) => {
                warn!(error = %e, "save failed");
                Notification::error(format!("❌ Error saving workflow: {e}"))
            }
        }
    }

    /// Replace the workspace with the saved one.
    ///
    /// `confirm` receives the prompt naming the save time; declining leaves
    /// everything untouched and shows nothing.
    pub fn load<F>(&mut self, confirm: F) -> Option<Notification>
    where
        F: FnOnce(&str) -> bool,
    {
        match self.store.load() {
            Ok(None) => Some(Notification::warning("⚠️ No saved workflow found!")),
            Ok(Some(saved)) => {
                let prompt = format!(
                    "Load saved workflow from {}?\nThis will replace your current workspace.",
                    saved.saved_at
                );
                if !confirm(&prompt) {
                    return None;
                }
                self.set_workspace(saved.workspace);
                info!(saved_at = %saved.saved_at, "workflow loaded");
                Some(Notification::success("📂 Workflow loaded successfully!"))
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                Some(Notification::error(format!("❌ Error loading workflow: {e}")))
            }
        }
    }

    /// Restore the autosave into an empty workspace. Returns whether
    /// anything was restored.
    pub fn restore_autosave(&mut self) -> bool {
        if !self.workspace.is_empty() {
            return false;
        }
        match self.store.load_autosave() {
            Some(mut workspace) if !workspace.is_empty() => {
                self.catalog.conform(&mut workspace);
                self.workspace = workspace;
                info!("auto-saved workflow restored");
                true
            }
            _ => false,
        }
    }

    fn record_notification(record: &ExecutionRecord) -> Notification {
        if record.success {
            Notification::success("✅ Workflow executed successfully!")
        } else {
            Notification::warning("⚠️ Workflow completed with errors")
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::in_memory(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::Node;

    fn hello() -> Workspace {
        Workspace::new().with_block(Node::trigger().then(vec![
            Node::set_variable("x", Node::number(5.0)),
            Node::output(Node::variable("x")),
        ]))
    }

    #[tokio::test]
    async fn test_generate_then_run() {
        let mut session = EditorSession::default();
        session.set_workspace(hello());

        let notification = session.generate();
        assert_eq!(notification, Notification::success("✅ Code generated successfully!"));
        assert_eq!(
            session.code_panel(),
            "// Program Start\n\nvar x = 5;\nconsole.log(x);\n"
        );

        let notification = session.run().await;
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(session.output_panel(), "5\n\n✅ Workflow completed successfully!");
    }

    #[tokio::test]
    async fn test_run_without_program() {
        let mut session = EditorSession::default();
        let notification = session.run().await;
        assert_eq!(notification, Notification::warning("⚠️ Please generate code first!"));
        assert_eq!(session.output_panel(), panels::NO_CODE);
    }

    #[test]
    fn test_rejected_generate_discards_program() {
        let mut session = EditorSession::default();
        session.set_workspace(hello());
        session.generate();
        assert!(session.program().is_some());

        session.set_workspace(Workspace::new().with_block(Node::trigger()));
        let notification = session.generate();
        assert_eq!(notification.level, NotificationLevel::Warning);
        assert!(session.program().is_none());
        assert!(session
            .code_panel()
            .starts_with("// ⚠️ WARNING: Trigger has no connected blocks"));
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut session = EditorSession::default();
        session.set_workspace(hello());
        session.generate();

        assert_eq!(session.clear(false), None);
        assert!(!session.workspace().is_empty());
        assert!(session.program().is_some());

        let notification = session.clear(true).unwrap();
        assert_eq!(notification.message, "🗑️ Workspace cleared successfully!");
        assert!(session.workspace().is_empty());
        assert!(session.program().is_none());
        assert_eq!(session.code_panel(), panels::CODE_PLACEHOLDER);
        assert_eq!(session.output_panel(), panels::OUTPUT_PLACEHOLDER);
    }

    #[test]
    fn test_save_and_load_with_prompt() {
        let mut session = EditorSession::default();
        assert_eq!(
            session.load(|_| true),
            Some(Notification::warning("⚠️ No saved workflow found!"))
        );

        session.set_workspace(hello());
        assert_eq!(session.save().level, NotificationLevel::Success);
        session.clear(true);

        let mut seen = String::new();
        assert_eq!(
            session.load(|prompt| {
                seen = prompt.to_string();
                false
            }),
            None
        );
        assert!(seen.starts_with("Load saved workflow from "));
        assert!(seen.ends_with("?\nThis will replace your current workspace."));
        assert!(session.workspace().is_empty());

        let notification = session.load(|_| true).unwrap();
        assert_eq!(notification.message, "📂 Workflow loaded successfully!");
        assert_eq!(session.workspace().node_count(), 5);
    }

    #[test]
    fn test_show_host_results() {
        let mut session = EditorSession::default();
        let notification =
            session.show_record(&ExecutionRecord::failed(vec![], "boom"));
        assert_eq!(notification, Notification::warning("⚠️ Workflow completed with errors"));
        assert!(session.output_panel().starts_with("⚠️ No output generated\n\n❌ Runtime Error: boom"));

        let notification = session.show_execution_error("Unexpected token 'if'");
        assert_eq!(notification.level, NotificationLevel::Error);
        assert!(session
            .output_panel()
            .ends_with("💡 Tip: Code generation error. Try reconnecting your blocks."));
    }
}
