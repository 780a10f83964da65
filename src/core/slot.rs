//! Slot system for node nesting
//!
//! A slot is a named attachment point on a node. Value slots hold a single
//! expression node; statement slots hold the first node of a statement chain.
//! Every node also has a connection shape that decides which slots it fits.

use serde::{Deserialize, Serialize};

/// Slot definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDefinition {
    /// Slot name as used in the serialized tree (e.g. `VALUE`)
    pub id: String,
    /// Label rendered in front of the slot, if any
    pub label: Option<String>,
    /// Kind of content the slot accepts
    pub slot_type: SlotType,
    /// Whether generation refuses to run while the slot is empty
    pub required: bool,
    /// Slot description
    pub description: String,
}

/// What a slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    /// A single expression node
    Value,
    /// A chain of statement nodes
    Statement,
}

/// Connection shape of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Program entry point: only a following statement, nothing above it
    Trigger,
    /// Chains above and below, fits statement slots
    Statement,
    /// Produces a value, fits value slots
    Expression,
}

impl Shape {
    /// Whether a node of this shape can be attached to the given slot type.
    pub fn fits(&self, slot_type: SlotType) -> bool {
        matches!(
            (self, slot_type),
            (Shape::Expression, SlotType::Value) | (Shape::Statement, SlotType::Statement)
        )
    }
}

impl SlotDefinition {
    /// Create an optional value slot
    pub fn value(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            slot_type: SlotType::Value,
            required: false,
            description: description.into(),
        }
    }

    /// Create a statement slot with a label
    pub fn statement(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            slot_type: SlotType::Statement,
            required: false,
            description: description.into(),
        }
    }

    /// Mark the slot as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Whether a node of the given shape may occupy this slot
    pub fn accepts(&self, shape: Shape) -> bool {
        shape.fits(self.slot_type)
    }
}
