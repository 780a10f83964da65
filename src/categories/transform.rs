//! Transform block: rewrite a variable in place

use serde::{Deserialize, Serialize};

use super::variables::identifier;
use super::{BlockCategory, DEFAULT_VAR_NAME};
use crate::core::definition::BlockDefinition;
use crate::core::field::{DropdownOption, FieldDefinition};
use crate::core::node::{field_names, Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransformOp {
    Multiply2,
    Multiply10,
    Divide2,
    Uppercase,
    Lowercase,
    Reverse,
    Add1,
    Sub1,
}

impl TransformOp {
    pub const ALL: [TransformOp; 8] = [
        TransformOp::Multiply2,
        TransformOp::Multiply10,
        TransformOp::Divide2,
        TransformOp::Uppercase,
        TransformOp::Lowercase,
        TransformOp::Reverse,
        TransformOp::Add1,
        TransformOp::Sub1,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TransformOp::Multiply2 => "MULTIPLY_2",
            TransformOp::Multiply10 => "MULTIPLY_10",
            TransformOp::Divide2 => "DIVIDE_2",
            TransformOp::Uppercase => "UPPERCASE",
            TransformOp::Lowercase => "LOWERCASE",
            TransformOp::Reverse => "REVERSE",
            TransformOp::Add1 => "ADD_1",
            TransformOp::Sub1 => "SUB_1",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransformOp::Multiply2 => "multiply by 2",
            TransformOp::Multiply10 => "multiply by 10",
            TransformOp::Divide2 => "divide by 2",
            TransformOp::Uppercase => "to uppercase",
            TransformOp::Lowercase => "to lowercase",
            TransformOp::Reverse => "reverse text",
            TransformOp::Add1 => "add 1",
            TransformOp::Sub1 => "subtract 1",
        }
    }

    /// `++`/`--` rather than an assignment
    pub fn is_step(&self) -> bool {
        matches!(self, TransformOp::Add1 | TransformOp::Sub1)
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    /// The statement this operation emits for variable `var`
    pub fn statement(&self, var: &str) -> String {
        match self {
            TransformOp::Multiply2 => format!("{var} = {var} * 2;"),
            TransformOp::Multiply10 => format!("{var} = {var} * 10;"),
            TransformOp::Divide2 => format!("{var} = {var} / 2;"),
            TransformOp::Add1 => format!("{var}++;"),
            TransformOp::Sub1 => format!("{var}--;"),
            TransformOp::Uppercase => format!("{var} = {var}.toUpperCase();"),
            TransformOp::Lowercase => format!("{var} = {var}.toLowerCase();"),
            TransformOp::Reverse => format!("{var} = {var}.split(\"\").reverse().join(\"\");"),
        }
    }
}

impl Default for TransformOp {
    fn default() -> Self {
        TransformOp::Multiply2
    }
}

pub fn definition() -> BlockDefinition {
    let options = TransformOp::ALL
        .iter()
        .map(|op| DropdownOption::new(op.label(), op.code()))
        .collect();

    BlockDefinition::new(NodeKind::Transform, "Transform Variable", BlockCategory::Transform)
        .describe("Applies an arithmetic or text operation to a variable in place.")
        .tooltip("Perform operations on a variable")
        .colour("#14B8A6")
        .icon("🔧")
        .label("Transform variable")
        .field(FieldDefinition::text(
            field_names::VAR_NAME,
            DEFAULT_VAR_NAME,
            "Variable to transform",
        ))
        .row()
        .label("operation:")
        .field(FieldDefinition::dropdown(
            field_names::OPERATION,
            options,
            TransformOp::Multiply2.code(),
            "Operation to apply",
        ))
}

/// Sanitized name of the transformed variable
pub fn target(node: &Node) -> String {
    identifier(node, field_names::VAR_NAME)
}

/// Operation of a transform node; unknown codes read as multiply by 2
pub fn operation(node: &Node) -> TransformOp {
    node.text_field(field_names::OPERATION)
        .and_then(|code| TransformOp::from_code(&code))
        .unwrap_or_default()
}

pub fn generate(node: &Node) -> String {
    format!("  {}\n", operation(node).statement(&target(node)))
}
