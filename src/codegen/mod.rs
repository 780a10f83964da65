//! Code generation
//!
//! Turns a workspace into a [`GeneratedProgram`]: the readable display text,
//! the executable text wrapped with output capture and the `delay` helper,
//! and the lowered [`Script`] the native runner interprets. Generation is
//! pure and deterministic; validation happens before it, in the runtime.

pub mod generator;
pub mod literals;
pub mod script;
pub mod wrapper;

use serde::Serialize;

use crate::core::node::{Node, NodeKind, Workspace};
use crate::core::slot::SlotType;
use crate::core::NodeId;

pub use generator::Generator;
pub use script::{Expr, Script, Statement};

/// Gives a node's generator access to its children.
pub trait SlotResolver {
    /// Generated text of the expression in a value slot, `None` when empty
    fn value(&mut self, node: &Node, slot: &str) -> Result<Option<String>, GenerationError>;

    /// Generated and indented text of the chain in a statement slot, empty
    /// when the slot is empty
    fn statements(&mut self, node: &Node, slot: &str) -> Result<String, GenerationError>;
}

/// Where a misplaced node was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    ValueSlot,
    StatementChain,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::ValueSlot => f.write_str("a value slot"),
            Position::StatementChain => f.write_str("a statement chain"),
        }
    }
}

/// Failures while walking a structurally malformed tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("block '{node_id}' ({kind}) has no slot named '{slot}'")]
    UnknownSlot {
        node_id: NodeId,
        kind: NodeKind,
        slot: String,
    },

    #[error("block '{node_id}' ({kind}) cannot be placed in {position}")]
    Misplaced {
        node_id: NodeId,
        kind: NodeKind,
        position: Position,
    },
}

/// The result of one generation pass
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProgram {
    /// Unwrapped program text, as shown to the user
    pub display: String,
    /// Program text wrapped for execution by a script host
    pub executable: String,
    /// Lowered form for the native runner
    #[serde(skip)]
    pub script: Script,
}

/// Generate a program from an already validated workspace
pub fn generate(workspace: &Workspace) -> Result<GeneratedProgram, GenerationError> {
    Generator::new().generate(workspace)
}

/// Reject inputs the node's kind does not declare
pub(crate) fn check_slots(node: &Node) -> Result<(), GenerationError> {
    match node
        .inputs
        .keys()
        .find(|name| node.kind.slot_type(name).is_none())
    {
        Some(slot) => Err(GenerationError::UnknownSlot {
            node_id: node.id.clone(),
            kind: node.kind,
            slot: slot.clone(),
        }),
        None => Ok(()),
    }
}

/// Require a node to fit the position it was found in
pub(crate) fn expect_fit(node: &Node, position: Position) -> Result<(), GenerationError> {
    let slot_type = match position {
        Position::ValueSlot => SlotType::Value,
        Position::StatementChain => SlotType::Statement,
    };
    if node.kind.shape().fits(slot_type) {
        Ok(())
    } else {
        Err(GenerationError::Misplaced {
            node_id: node.id.clone(),
            kind: node.kind,
            position,
        })
    }
}
