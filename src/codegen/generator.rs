//! Workspace to program text
//!
//! Dispatch is exhaustive over [`NodeKind`]: every kind has exactly one rule,
//! owned by its category module. Statement nodes carry the code of their
//! `next` chain; statement slots are indented; the assembled text goes
//! through a final whitespace cleanup.

use tracing::debug;

use super::literals::{normalize_program, prefix_lines, INDENT};
use super::script::Script;
use super::wrapper;
use super::{check_slots, expect_fit, GeneratedProgram, GenerationError, Position, SlotResolver};
use crate::categories::{logic, output, timing, transform, trigger, variables};
use crate::core::node::{Node, NodeKind, Workspace};

/// Code produced for one node
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Statement(String),
    Expression(String),
}

#[derive(Debug, Default)]
pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Self
    }

    /// Produce display text, executable text and the lowered script
    pub fn generate(&mut self, workspace: &Workspace) -> Result<GeneratedProgram, GenerationError> {
        let display = self.workspace_to_code(workspace)?;
        let script = Script::lower(workspace)?;
        let executable = wrapper::wrap(&display);
        let bytes = display.len();
        debug!(
            bytes,
            statements = script.statements.len(),
            "program generated"
        );
        Ok(GeneratedProgram {
            display,
            executable,
            script,
        })
    }

    /// Generated text of every top-level tree, in canvas order
    pub fn workspace_to_code(&mut self, workspace: &Workspace) -> Result<String, GenerationError> {
        let mut parts = Vec::new();
        for node in workspace.top_blocks_ordered() {
            match self.node_code(node)? {
                Fragment::Statement(code) if !code.is_empty() => parts.push(code),
                Fragment::Statement(_) => {}
                Fragment::Expression(code) => parts.push(format!("{code};\n")),
            }
        }
        Ok(normalize_program(&parts.join("\n")))
    }

    /// Code of a node followed by its `next` chain, when it has one
    fn node_code(&mut self, node: &Node) -> Result<Fragment, GenerationError> {
        match self.own_code(node)? {
            Fragment::Statement(mut code) => {
                if let Some(next) = node.next_node() {
                    code.push_str(&self.chain_code(next)?);
                }
                Ok(Fragment::Statement(code))
            }
            expression => Ok(expression),
        }
    }

    /// Code of a single node, without what follows it
    fn own_code(&mut self, node: &Node) -> Result<Fragment, GenerationError> {
        check_slots(node)?;
        Ok(match node.kind {
            NodeKind::TriggerStart => Fragment::Statement(trigger::generate(node)),
            NodeKind::SetVariable => Fragment::Statement(variables::generate_assign(node, self)?),
            NodeKind::ValueNumber => Fragment::Expression(variables::generate_number(node)),
            NodeKind::ValueText => Fragment::Expression(variables::generate_text(node)),
            NodeKind::ValueVariable => Fragment::Expression(variables::generate_variable(node)),
            NodeKind::Condition => Fragment::Statement(logic::generate(node, self)?),
            NodeKind::Transform => Fragment::Statement(transform::generate(node)),
            NodeKind::Delay => Fragment::Statement(timing::generate(node)),
            NodeKind::Output => Fragment::Statement(output::generate(node, self)?),
        })
    }

    /// Code of a statement chain starting at `first`. The chain is walked in
    /// a loop; only statement slots recurse.
    fn chain_code(&mut self, first: &Node) -> Result<String, GenerationError> {
        let mut code = String::new();
        let mut current = Some(first);
        while let Some(node) = current {
            expect_fit(node, Position::StatementChain)?;
            match self.own_code(node)? {
                Fragment::Statement(part) => code.push_str(&part),
                Fragment::Expression(_) => return Err(misplaced(node, Position::StatementChain)),
            }
            current = node.next_node();
        }
        Ok(code)
    }
}

fn misplaced(node: &Node, position: Position) -> GenerationError {
    GenerationError::Misplaced {
        node_id: node.id.clone(),
        kind: node.kind,
        position,
    }
}

impl SlotResolver for Generator {
    fn value(&mut self, node: &Node, slot: &str) -> Result<Option<String>, GenerationError> {
        let Some(child) = node.input(slot) else {
            return Ok(None);
        };
        expect_fit(child, Position::ValueSlot)?;
        match self.own_code(child)? {
            Fragment::Expression(code) => Ok(Some(code)),
            Fragment::Statement(_) => Err(misplaced(child, Position::ValueSlot)),
        }
    }

    fn statements(&mut self, node: &Node, slot: &str) -> Result<String, GenerationError> {
        let Some(first) = node.input(slot) else {
            return Ok(String::new());
        };
        let code = self.chain_code(first)?;
        if code.is_empty() {
            Ok(code)
        } else {
            Ok(prefix_lines(&code, INDENT))
        }
    }
}
