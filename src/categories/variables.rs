//! Variable blocks: assignment plus the three value blocks that feed slots

use super::{BlockCategory, DEFAULT_VAR_NAME};
use crate::codegen::literals::{escape_text_literal, format_number, sanitize_identifier};
use crate::codegen::{GenerationError, SlotResolver};
use crate::core::definition::BlockDefinition;
use crate::core::field::FieldDefinition;
use crate::core::node::{field_names, slot_names, Node, NodeKind};
use crate::core::slot::SlotDefinition;

/// Emitted when an assignment has nothing in its value slot
pub const DEFAULT_ASSIGNED_VALUE: &str = "0";

pub fn definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new(NodeKind::SetVariable, "Set Variable", BlockCategory::Variables)
            .describe("Stores a value under a variable name.")
            .tooltip("Set a variable to a specific value")
            .colour("#0EA5E9")
            .icon("💾")
            .label("Set variable")
            .field(FieldDefinition::text(
                field_names::VAR_NAME,
                DEFAULT_VAR_NAME,
                "Variable to assign",
            ))
            .label("to")
            .slot(SlotDefinition::value(slot_names::VALUE, "Value to store").required()),
        BlockDefinition::new(NodeKind::ValueNumber, "Number", BlockCategory::Variables)
            .describe("A number value.")
            .tooltip("A number value")
            .colour("#0EA5E9")
            .field(FieldDefinition::number(field_names::NUM, 0.0, "Number literal")),
        BlockDefinition::new(NodeKind::ValueText, "Text", BlockCategory::Variables)
            .describe("A text value.")
            .tooltip("A text value")
            .label("\"")
            .field(FieldDefinition::text(field_names::TEXT, DEFAULT_VAR_NAME, "Text literal"))
            .label("\""),
        BlockDefinition::new(NodeKind::ValueVariable, "Variable", BlockCategory::Variables)
            .describe("Reads the current value of a variable.")
            .tooltip("Reference to a variable - outputs the actual value")
            .colour("#10B981")
            .field(FieldDefinition::text(field_names::VAR, DEFAULT_VAR_NAME, "Variable to read")),
    ]
}

/// Sanitized name assigned by a `set_variable` node
pub fn assign_target(node: &Node) -> String {
    identifier(node, field_names::VAR_NAME)
}

/// Number held by a `value_number` node; unset and NaN read as zero
pub fn number_value(node: &Node) -> f64 {
    node.number_field(field_names::NUM)
        .filter(|n| !n.is_nan())
        .unwrap_or(0.0)
}

/// Raw text held by a `value_text` node
pub fn text_value(node: &Node) -> String {
    node.text_field(field_names::TEXT).unwrap_or_default()
}

/// Sanitized name read by a `value_variable` node
pub fn reference_name(node: &Node) -> String {
    identifier(node, field_names::VAR)
}

/// Sanitized identifier from a text field, defaulting when empty
pub(crate) fn identifier(node: &Node, field: &str) -> String {
    let raw = node.text_field(field);
    sanitize_identifier(raw.as_deref().unwrap_or(DEFAULT_VAR_NAME))
}

pub fn generate_assign(
    node: &Node,
    slots: &mut dyn SlotResolver,
) -> Result<String, GenerationError> {
    let value = slots
        .value(node, slot_names::VALUE)?
        .unwrap_or_else(|| DEFAULT_ASSIGNED_VALUE.to_string());
    Ok(format!("var {} = {};\n", assign_target(node), value))
}

pub fn generate_number(node: &Node) -> String {
    format_number(number_value(node))
}

pub fn generate_text(node: &Node) -> String {
    format!("\"{}\"", escape_text_literal(&text_value(node)))
}

pub fn generate_variable(node: &Node) -> String {
    reference_name(node)
}
