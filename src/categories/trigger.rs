//! "When App Starts" trigger block

use super::BlockCategory;
use crate::core::definition::BlockDefinition;
use crate::core::node::{Node, NodeKind};

/// Marker comment opening every program
pub const PROGRAM_START: &str = "// Program Start\n\n";

pub fn definition() -> BlockDefinition {
    BlockDefinition::new(NodeKind::TriggerStart, "When App Starts", BlockCategory::Triggers)
        .describe("Marks where the program begins; blocks snapped below it run in order.")
        .tooltip("Entry point for the workflow")
        .colour("#EF4444")
        .icon("⚡")
        .label("When App Starts")
}

pub fn generate(_node: &Node) -> String {
    PROGRAM_START.to_string()
}
