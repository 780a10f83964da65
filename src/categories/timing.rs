//! Delay block

use super::BlockCategory;
use crate::codegen::literals::format_number;
use crate::core::definition::BlockDefinition;
use crate::core::field::{FieldConstraints, FieldDefinition, FieldUiHint, WidgetType};
use crate::core::node::{field_names, Node, NodeKind};

pub const DEFAULT_SECONDS: f64 = 1.0;
pub const MIN_SECONDS: f64 = 0.0;
pub const MAX_SECONDS: f64 = 60.0;

pub fn definition() -> BlockDefinition {
    BlockDefinition::new(NodeKind::Delay, "Delay", BlockCategory::Timing)
        .describe("Suspends the program for a number of seconds.")
        .tooltip("Wait for a specified number of seconds")
        .colour("#F59E0B")
        .icon("🕐")
        .label("Wait for")
        .field(
            FieldDefinition::number(field_names::SECONDS, DEFAULT_SECONDS, "Seconds to wait")
                .with_constraints(
                    FieldConstraints::new()
                        .with_min(MIN_SECONDS)
                        .with_max(MAX_SECONDS),
                )
                .with_ui_hint(FieldUiHint::new(WidgetType::NumberInput).with_unit("seconds")),
        )
        .label("seconds")
}

/// Seconds of a delay node. Zero, NaN or a missing field means one second;
/// negative values pass through and sleep for nothing.
pub fn seconds(node: &Node) -> f64 {
    node.number_field(field_names::SECONDS)
        .filter(|s| *s != 0.0 && !s.is_nan())
        .unwrap_or(DEFAULT_SECONDS)
}

pub fn generate(node: &Node) -> String {
    let seconds = format_number(seconds(node));
    format!("// Wait {seconds} second(s)\nawait delay({seconds});\n\n")
}
