//! Workspace validation
//!
//! Runs the pre-generation gates against a workspace. Checks run in a fixed
//! order and the first failing one wins; a failure is reported as a
//! [`Diagnostic`] carrying the notification text and the placeholder code
//! shown in place of the program.

use serde::Serialize;

use crate::core::node::{slot_names, Node, NodeKind, Workspace};
use crate::core::NodeId;

// ── Result types ────────────────────────────────────────────────────────────

/// Which gate rejected the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    NoBlocks,
    MissingTrigger,
    DisconnectedBlocks,
    EmptyTrigger,
    IncompleteCondition,
    IncompleteAssignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A validation failure with everything needed to present it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Notification text
    pub message: String,
    /// Comment lines shown in the code panel instead of a program
    pub placeholder: String,
    /// Node needing attention, when one can be named
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    /// Kinds of the offending nodes, for disconnected blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<NodeKind>,
}

impl Diagnostic {
    fn new(
        code: DiagnosticCode,
        severity: Severity,
        message: impl Into<String>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            placeholder: placeholder.into(),
            node_id: None,
            kinds: Vec::new(),
        }
    }

    fn at(mut self, node: &Node) -> Self {
        self.node_id = Some(node.id.clone());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

// ── Validator ───────────────────────────────────────────────────────────────

/// Validates a workspace before generation.
pub struct WorkspaceValidator;

impl WorkspaceValidator {
    /// Run every gate in order, stopping at the first failure.
    pub fn validate(workspace: &Workspace) -> Result<(), Diagnostic> {
        let nodes = workspace.all_nodes();

        Self::check_has_blocks(&nodes)?;
        let trigger = Self::check_trigger_present(&nodes)?;
        Self::check_disconnected_blocks(workspace)?;
        Self::check_trigger_body(trigger)?;
        Self::check_conditions_complete(&nodes)?;
        Self::check_assignments_complete(&nodes)?;
        Ok(())
    }

    // ── Individual checks ───────────────────────────────────────────────

    fn check_has_blocks(nodes: &[&Node]) -> Result<(), Diagnostic> {
        if nodes.is_empty() {
            return Err(Diagnostic::new(
                DiagnosticCode::NoBlocks,
                Severity::Warning,
                "⚠️ Please add some blocks to the workspace first!",
                "// ❌ ERROR: No blocks in workspace\n\
                 // Add a \"When App Starts\" trigger block to begin",
            ));
        }
        Ok(())
    }

    /// The first trigger in traversal order is the program entry point.
    fn check_trigger_present<'a>(nodes: &[&'a Node]) -> Result<&'a Node, Diagnostic> {
        nodes
            .iter()
            .copied()
            .find(|n| n.kind == NodeKind::TriggerStart)
            .ok_or_else(|| {
                Diagnostic::new(
                    DiagnosticCode::MissingTrigger,
                    Severity::Error,
                    "❌ Missing trigger! Add \"When App Starts\" block first.",
                    "// ❌ ERROR: Missing workflow trigger\n\
                     // Every program must start with a \"When App Starts\" block\n\
                     // Find it in the Triggers category",
                )
            })
    }

    /// Every top-level node other than a trigger is an orphan.
    fn check_disconnected_blocks(workspace: &Workspace) -> Result<(), Diagnostic> {
        let orphans: Vec<NodeKind> = workspace
            .top_blocks_ordered()
            .into_iter()
            .filter(|n| n.kind != NodeKind::TriggerStart)
            .map(|n| n.kind)
            .collect();
        if orphans.is_empty() {
            return Ok(());
        }

        let listed = orphans
            .iter()
            .map(NodeKind::type_name)
            .collect::<Vec<_>>()
            .join(", ");
        let mut diagnostic = Diagnostic::new(
            DiagnosticCode::DisconnectedBlocks,
            Severity::Warning,
            "⚠️ Some blocks are not connected! Connect all blocks to the trigger.",
            format!(
                "// ⚠️ WARNING: Disconnected blocks found!\n\
                 // These blocks are not connected: {listed}\n\
                 // \n\
                 // Please connect ALL blocks to the \"When App Starts\" trigger.\n\
                 // Blocks must be snapped together like puzzle pieces."
            ),
        );
        diagnostic.kinds = orphans;
        Err(diagnostic)
    }

    fn check_trigger_body(trigger: &Node) -> Result<(), Diagnostic> {
        if trigger.next_node().is_none() {
            return Err(Diagnostic::new(
                DiagnosticCode::EmptyTrigger,
                Severity::Warning,
                "⚠️ Connect blocks below the trigger!",
                "// ⚠️ WARNING: Trigger has no connected blocks\n\
                 // \n\
                 // Connect blocks below \"When App Starts\":\n\
                 // 1. Drag a \"Set Variable\" block\n\
                 // 2. Snap it below the trigger\n\
                 // 3. Add more blocks as needed",
            )
            .at(trigger));
        }
        Ok(())
    }

    fn check_conditions_complete(nodes: &[&Node]) -> Result<(), Diagnostic> {
        match Self::first_missing(nodes, NodeKind::Condition, slot_names::COMPARE_VALUE) {
            Some(node) => Err(Diagnostic::new(
                DiagnosticCode::IncompleteCondition,
                Severity::Error,
                "❌ Condition block needs a comparison value!",
                "// ❌ ERROR: Incomplete condition block\n\
                 // \n\
                 // The \"If variable\" block needs a value to compare:\n\
                 // 1. Drag a Number block to the condition\n\
                 // 2. Set the number to compare against",
            )
            .at(node)),
            None => Ok(()),
        }
    }

    fn check_assignments_complete(nodes: &[&Node]) -> Result<(), Diagnostic> {
        match Self::first_missing(nodes, NodeKind::SetVariable, slot_names::VALUE) {
            Some(node) => Err(Diagnostic::new(
                DiagnosticCode::IncompleteAssignment,
                Severity::Error,
                "❌ Set Variable block needs a value!",
                "// ❌ ERROR: Incomplete \"Set Variable\" block\n\
                 // \n\
                 // Add a value to the variable:\n\
                 // 1. Drag a Number or Text block\n\
                 // 2. Connect it to \"Set variable ... to [here]\"",
            )
            .at(node)),
            None => Ok(()),
        }
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    /// First node of `kind` whose `slot` is empty. A shadow counts as filled.
    fn first_missing<'a>(nodes: &[&'a Node], kind: NodeKind, slot: &str) -> Option<&'a Node> {
        nodes
            .iter()
            .copied()
            .find(|n| n.kind == kind && n.input(slot).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(ws: &Workspace) -> Option<DiagnosticCode> {
        WorkspaceValidator::validate(ws).err().map(|d| d.code)
    }

    #[test]
    fn test_empty_workspace() {
        let diagnostic = WorkspaceValidator::validate(&Workspace::new()).unwrap_err();
        assert_eq!(diagnostic.code, DiagnosticCode::NoBlocks);
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert!(diagnostic.placeholder.starts_with("// ❌ ERROR: No blocks in workspace\n"));
    }

    #[test]
    fn test_missing_trigger() {
        let ws = Workspace::new().with_block(Node::output(Node::text("hi")));
        assert_eq!(code_of(&ws), Some(DiagnosticCode::MissingTrigger));
    }

    #[test]
    fn test_disconnected_lists_kinds_in_canvas_order() {
        let ws = Workspace::new()
            .with_block(Node::trigger().then(vec![Node::delay(1.0)]))
            .with_block(Node::number(1.0).at(0.0, 200.0))
            .with_block(Node::delay(2.0).at(0.0, 100.0));
        let diagnostic = WorkspaceValidator::validate(&ws).unwrap_err();
        assert_eq!(diagnostic.code, DiagnosticCode::DisconnectedBlocks);
        assert_eq!(diagnostic.kinds, vec![NodeKind::Delay, NodeKind::ValueNumber]);
        assert!(diagnostic
            .placeholder
            .contains("// These blocks are not connected: delay, value_number\n"));
    }

    #[test]
    fn test_trigger_without_body() {
        let trigger = Node::trigger().with_id("t1");
        let diagnostic = WorkspaceValidator::validate(&Workspace::new().with_block(trigger))
            .unwrap_err();
        assert_eq!(diagnostic.code, DiagnosticCode::EmptyTrigger);
        assert_eq!(diagnostic.node_id, Some(NodeId::from("t1")));
    }

    #[test]
    fn test_condition_checked_before_assignment() {
        let ws = Workspace::new().with_block(Node::trigger().then(vec![
            Node::new(NodeKind::SetVariable),
            Node::new(NodeKind::Condition).with_id("c1"),
        ]));
        let diagnostic = WorkspaceValidator::validate(&ws).unwrap_err();
        assert_eq!(diagnostic.code, DiagnosticCode::IncompleteCondition);
        assert_eq!(diagnostic.node_id, Some(NodeId::from("c1")));
    }

    #[test]
    fn test_incomplete_assignment_inside_branch() {
        let ws = Workspace::new().with_block(Node::trigger().then(vec![Node::condition(
            "x",
            "GT",
            Node::number(1.0),
        )
        .when_true(vec![Node::new(NodeKind::SetVariable)])]));
        assert_eq!(code_of(&ws), Some(DiagnosticCode::IncompleteAssignment));
    }

    #[test]
    fn test_shadow_fills_a_slot() {
        let mut assign = Node::new(NodeKind::SetVariable);
        assign.inputs.insert(
            slot_names::VALUE.to_string(),
            crate::core::node::Attachment {
                block: None,
                shadow: Some(Box::new(Node::number(3.0))),
            },
        );
        let ws = Workspace::new().with_block(Node::trigger().then(vec![assign]));
        assert_eq!(code_of(&ws), None);
    }
}
