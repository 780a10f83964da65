//! Block categories
//!
//! Each submodule owns the blocks of one toolbox category: their catalog
//! definitions, the typed reading of their fields, and their code
//! generation rules.

use serde::{Deserialize, Serialize};

use crate::core::definition::BlockDefinition;

pub mod logic;
pub mod output;
pub mod timing;
pub mod toolbox;
pub mod transform;
pub mod trigger;
pub mod variables;

/// Name used when a variable field is left empty
pub const DEFAULT_VAR_NAME: &str = "myVar";

/// Block category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// Workflow entry points
    Triggers,
    /// Data storage and value blocks
    Variables,
    /// Conditional operations
    Logic,
    /// Data transformations
    Transform,
    /// Time-based operations
    Timing,
    /// Display operations
    Output,
}

impl BlockCategory {
    pub const ALL: [BlockCategory; 6] = [
        BlockCategory::Triggers,
        BlockCategory::Variables,
        BlockCategory::Logic,
        BlockCategory::Transform,
        BlockCategory::Timing,
        BlockCategory::Output,
    ];

    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            BlockCategory::Triggers => "Triggers",
            BlockCategory::Variables => "Variables",
            BlockCategory::Logic => "Logic",
            BlockCategory::Transform => "Transform",
            BlockCategory::Timing => "Timing",
            BlockCategory::Output => "Output",
        }
    }

    /// Toolbox colour of the category
    pub fn colour(&self) -> &'static str {
        match self {
            BlockCategory::Triggers => "#E74C3C",
            BlockCategory::Variables => "#3498DB",
            BlockCategory::Logic => "#9B59B6",
            BlockCategory::Transform => "#1ABC9C",
            BlockCategory::Timing => "#F39C12",
            BlockCategory::Output => "#2ECC71",
        }
    }
}

impl std::fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Every built-in definition, grouped by category in toolbox order
pub fn all_definitions() -> Vec<BlockDefinition> {
    let mut definitions = vec![trigger::definition()];
    definitions.extend(variables::definitions());
    definitions.push(logic::definition());
    definitions.push(transform::definition());
    definitions.push(timing::definition());
    definitions.push(output::definition());
    definitions
}
