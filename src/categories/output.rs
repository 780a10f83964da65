//! Display block: print a value to the output panel

use super::BlockCategory;
use crate::codegen::{GenerationError, SlotResolver};
use crate::core::definition::BlockDefinition;
use crate::core::node::{slot_names, Node, NodeKind};
use crate::core::slot::SlotDefinition;

/// Printed when the message slot is empty
pub const DEFAULT_MESSAGE: &str = "\"\"";

pub fn definition() -> BlockDefinition {
    BlockDefinition::new(NodeKind::Output, "Display", BlockCategory::Output)
        .describe("Prints a value to the output panel.")
        .tooltip("Display a variable value in the output panel")
        .colour("#10B981")
        .icon("▶")
        .label("Display")
        .slot(SlotDefinition::value(slot_names::MESSAGE, "Value to print"))
}

pub fn generate(node: &Node, slots: &mut dyn SlotResolver) -> Result<String, GenerationError> {
    let message = slots
        .value(node, slot_names::MESSAGE)?
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
    Ok(format!("console.log({message});\n"))
}
