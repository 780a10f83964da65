//! Block definitions
//!
//! A definition is the declarative description of one node kind: its label
//! layout, editable fields, slots, colour and tooltip. The editing surface
//! renders blocks from these definitions; nothing here has behaviour.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::field::{FieldDefinition, FieldType, FieldValue};
use super::node::NodeKind;
use super::slot::{Shape, SlotDefinition, SlotType};
use crate::categories::BlockCategory;

/// One element of a block's visual layout, left to right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutItem {
    /// Serializable icon label
    Icon(String),
    /// Static text
    Text(String),
    /// Editable field, by id
    Field(String),
    /// Slot, by id
    Slot(String),
    /// Start a new row
    RowBreak,
}

/// Block definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub kind: NodeKind,
    /// Human-readable block name
    pub name: String,
    pub category: BlockCategory,
    pub description: String,
    pub tooltip: String,
    /// Block colour (hex)
    pub colour: String,
    pub layout: Vec<LayoutItem>,
    pub fields: Vec<FieldDefinition>,
    pub slots: Vec<SlotDefinition>,
}

impl BlockDefinition {
    pub fn new(kind: NodeKind, name: impl Into<String>, category: BlockCategory) -> Self {
        Self {
            kind,
            name: name.into(),
            category,
            description: String::new(),
            tooltip: String::new(),
            colour: category.colour().to_string(),
            layout: Vec::new(),
            fields: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = colour.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.layout.push(LayoutItem::Icon(icon.into()));
        self
    }

    pub fn label(mut self, text: impl Into<String>) -> Self {
        self.layout.push(LayoutItem::Text(text.into()));
        self
    }

    pub fn row(mut self) -> Self {
        self.layout.push(LayoutItem::RowBreak);
        self
    }

    /// Add a field and place it in the layout
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.layout.push(LayoutItem::Field(field.id.clone()));
        self.fields.push(field);
        self
    }

    /// Add a slot and place it in the layout
    pub fn slot(mut self, slot: SlotDefinition) -> Self {
        if let Some(label) = &slot.label {
            self.layout.push(LayoutItem::Text(label.clone()));
        }
        self.layout.push(LayoutItem::Slot(slot.id.clone()));
        self.slots.push(slot);
        self
    }

    pub fn shape(&self) -> Shape {
        self.kind.shape()
    }

    pub fn find_field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn find_slot(&self, id: &str) -> Option<&SlotDefinition> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Default value of a field, if the block has it
    pub fn default_value(&self, field: &str) -> Option<&FieldValue> {
        self.find_field(field).map(|f| &f.default_value)
    }

    /// Export in the editing surface's JSON block-definition format
    pub fn to_editor_json(&self) -> JsonValue {
        let mut message = Vec::new();
        let mut args = Vec::new();
        let mut arg = |message: &mut Vec<String>, value: JsonValue| {
            args.push(value);
            message.push(format!("%{}", args.len()));
        };

        for item in &self.layout {
            match item {
                LayoutItem::Icon(icon) => arg(
                    &mut message,
                    json!({"type": "field_label_serializable", "text": icon}),
                ),
                LayoutItem::Text(text) => message.push(text.clone()),
                LayoutItem::RowBreak => arg(&mut message, json!({"type": "input_dummy"})),
                LayoutItem::Field(id) => {
                    if let Some(field) = self.find_field(id) {
                        arg(&mut message, field_json(field));
                    }
                }
                LayoutItem::Slot(id) => {
                    if let Some(slot) = self.find_slot(id) {
                        let input_type = match slot.slot_type {
                            SlotType::Value => "input_value",
                            SlotType::Statement => "input_statement",
                        };
                        arg(&mut message, json!({"type": input_type, "name": slot.id}));
                    }
                }
            }
        }

        let mut def = json!({
            "type": self.kind.type_name(),
            "message0": message.join(" "),
            "args0": args,
            "colour": self.colour,
            "tooltip": self.tooltip,
            "helpUrl": "",
        });
        match self.shape() {
            Shape::Trigger => {
                def["nextStatement"] = JsonValue::Null;
            }
            Shape::Statement => {
                def["previousStatement"] = JsonValue::Null;
                def["nextStatement"] = JsonValue::Null;
            }
            Shape::Expression => {
                def["output"] = JsonValue::Null;
            }
        }
        def
    }
}

fn field_json(field: &FieldDefinition) -> JsonValue {
    match field.field_type {
        FieldType::Text => json!({
            "type": "field_input",
            "name": field.id,
            "text": field.default_value.to_text(),
        }),
        FieldType::Number => {
            let mut value = json!({
                "type": "field_number",
                "name": field.id,
                "value": field.default_value.as_number().unwrap_or(0.0),
            });
            if let Some(c) = &field.constraints {
                if let Some(min) = c.min {
                    value["min"] = json!(min);
                }
                if let Some(max) = c.max {
                    value["max"] = json!(max);
                }
            }
            value
        }
        FieldType::Dropdown => {
            let options: Vec<[&str; 2]> = field
                .options()
                .iter()
                .map(|o| [o.label.as_str(), o.value.as_str()])
                .collect();
            json!({"type": "field_dropdown", "name": field.id, "options": options})
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldConstraints;

    #[test]
    fn test_editor_json_numbers_arguments() {
        let def = BlockDefinition::new(NodeKind::Delay, "Delay", BlockCategory::Timing)
            .icon("🕐")
            .label("Wait for")
            .field(
                FieldDefinition::number("SECONDS", 1.0, "seconds")
                    .with_constraints(FieldConstraints::new().with_min(0.0).with_max(60.0)),
            )
            .label("seconds");
        let json = def.to_editor_json();
        assert_eq!(json["message0"], "%1 Wait for %2 seconds");
        assert_eq!(json["args0"][1]["type"], "field_number");
        assert_eq!(json["args0"][1]["max"], 60.0);
        assert!(json.get("previousStatement").is_some());
        assert!(json.get("output").is_none());
    }

    #[test]
    fn test_slot_label_precedes_slot() {
        let def = BlockDefinition::new(NodeKind::Condition, "If", BlockCategory::Logic)
            .slot(SlotDefinition::statement("DO", "then", "runs when true"));
        assert_eq!(
            def.layout,
            vec![LayoutItem::Text("then".into()), LayoutItem::Slot("DO".into())]
        );
    }
}
