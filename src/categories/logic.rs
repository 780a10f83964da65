//! Condition block: compare a variable and branch

use serde::{Deserialize, Serialize};

use super::variables::identifier;
use super::{BlockCategory, DEFAULT_VAR_NAME};
use crate::codegen::{GenerationError, SlotResolver};
use crate::core::definition::BlockDefinition;
use crate::core::field::{DropdownOption, FieldDefinition};
use crate::core::node::{field_names, slot_names, Node, NodeKind};
use crate::core::slot::SlotDefinition;

/// Emitted when the comparison slot is empty
pub const DEFAULT_COMPARE_VALUE: &str = "0";

/// Comparison operators offered by the condition block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
    Neq,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Gt,
        ComparisonOp::Lt,
        ComparisonOp::Eq,
        ComparisonOp::Gte,
        ComparisonOp::Lte,
        ComparisonOp::Neq,
    ];

    /// Code stored in the `OPERATOR` field
    pub fn code(&self) -> &'static str {
        match self {
            ComparisonOp::Gt => "GT",
            ComparisonOp::Lt => "LT",
            ComparisonOp::Eq => "EQ",
            ComparisonOp::Gte => "GTE",
            ComparisonOp::Lte => "LTE",
            ComparisonOp::Neq => "NEQ",
        }
    }

    /// Operator as written in generated code (and shown in the dropdown)
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
            ComparisonOp::Eq => "==",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lte => "<=",
            ComparisonOp::Neq => "!=",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }
}

impl Default for ComparisonOp {
    fn default() -> Self {
        ComparisonOp::Gt
    }
}

pub fn definition() -> BlockDefinition {
    let options = ComparisonOp::ALL
        .iter()
        .map(|op| DropdownOption::new(op.symbol(), op.code()))
        .collect();

    BlockDefinition::new(NodeKind::Condition, "If Variable", BlockCategory::Logic)
        .describe("Compares a variable with a value and runs one of two branches.")
        .tooltip("Compare variable with a value and execute blocks based on result")
        .colour("#6366F1")
        .icon("⑂")
        .label("If variable")
        .field(FieldDefinition::text(
            field_names::VAR_NAME,
            DEFAULT_VAR_NAME,
            "Variable to compare",
        ))
        .row()
        .field(FieldDefinition::dropdown(
            field_names::OPERATOR,
            options,
            ComparisonOp::Gt.code(),
            "Comparison operator",
        ))
        .row()
        .slot(SlotDefinition::value(slot_names::COMPARE_VALUE, "Value to compare against").required())
        .slot(SlotDefinition::statement(slot_names::DO, "then", "Runs when the comparison holds"))
        .slot(SlotDefinition::statement(slot_names::ELSE, "else", "Runs otherwise"))
}

/// Sanitized name of the compared variable
pub fn subject(node: &Node) -> String {
    identifier(node, field_names::VAR_NAME)
}

/// Operator of a condition node; unknown codes read as `>`
pub fn operator(node: &Node) -> ComparisonOp {
    node.text_field(field_names::OPERATOR)
        .and_then(|code| ComparisonOp::from_code(&code))
        .unwrap_or_default()
}

pub fn generate(node: &Node, slots: &mut dyn SlotResolver) -> Result<String, GenerationError> {
    let compare = slots
        .value(node, slot_names::COMPARE_VALUE)?
        .unwrap_or_else(|| DEFAULT_COMPARE_VALUE.to_string());
    let then_code = slots.statements(node, slot_names::DO)?;
    let else_code = slots.statements(node, slot_names::ELSE)?;

    let mut code = format!(
        "if ({} {} {}) {{\n",
        subject(node),
        operator(node).symbol(),
        compare
    );
    if !then_code.trim().is_empty() {
        code.push_str(&then_code);
    }
    code.push('}');
    if !else_code.trim().is_empty() {
        code.push_str(" else {\n");
        code.push_str(&else_code);
        code.push('}');
    }
    code.push_str("\n\n");
    Ok(code)
}
