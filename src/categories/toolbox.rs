//! Toolbox layout: which blocks each category offers, with preset children

use serde_json::{json, Map, Value as JsonValue};

use super::BlockCategory;
use crate::core::node::{slot_names, Node, NodeKind};

/// One toolbox category and the block templates it offers
#[derive(Debug, Clone)]
pub struct ToolboxCategory {
    pub category: BlockCategory,
    pub entries: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct Toolbox {
    pub categories: Vec<ToolboxCategory>,
}

impl Toolbox {
    pub fn standard() -> Self {
        let entries = |category: BlockCategory| match category {
            BlockCategory::Triggers => vec![Node::trigger()],
            BlockCategory::Variables => vec![
                Node::new(NodeKind::SetVariable)
                    .with_input(slot_names::VALUE, Node::new(NodeKind::ValueNumber)),
                Node::new(NodeKind::ValueNumber),
                Node::new(NodeKind::ValueText),
                Node::new(NodeKind::ValueVariable),
            ],
            BlockCategory::Logic => vec![Node::new(NodeKind::Condition)
                .with_input(slot_names::COMPARE_VALUE, Node::new(NodeKind::ValueNumber))],
            BlockCategory::Transform => vec![Node::new(NodeKind::Transform)],
            BlockCategory::Timing => vec![Node::new(NodeKind::Delay)],
            BlockCategory::Output => vec![Node::new(NodeKind::Output)
                .with_input(slot_names::MESSAGE, Node::new(NodeKind::ValueVariable))],
        };

        Self {
            categories: BlockCategory::ALL
                .into_iter()
                .map(|category| ToolboxCategory {
                    category,
                    entries: entries(category),
                })
                .collect(),
        }
    }

    /// Kinds offered anywhere in the toolbox, as top-level entries
    pub fn kinds(&self) -> Vec<NodeKind> {
        self.categories
            .iter()
            .flat_map(|c| c.entries.iter().map(|n| n.kind))
            .collect()
    }

    /// Export in the editing surface's JSON toolbox format
    pub fn to_editor_json(&self) -> JsonValue {
        let contents: Vec<JsonValue> = self
            .categories
            .iter()
            .map(|c| {
                let blocks: Vec<JsonValue> = c
                    .entries
                    .iter()
                    .map(|node| {
                        let mut entry = template_json(node);
                        entry["kind"] = json!("block");
                        entry
                    })
                    .collect();
                json!({
                    "kind": "category",
                    "name": c.category.display_name(),
                    "colour": c.category.colour(),
                    "contents": blocks,
                })
            })
            .collect();
        json!({"kind": "categoryToolbox", "contents": contents})
    }
}

/// A template without ids or positions; fields are left to the block defaults
fn template_json(node: &Node) -> JsonValue {
    let mut entry = json!({"type": node.kind.type_name()});
    if !node.inputs.is_empty() {
        let inputs: Map<String, JsonValue> = node
            .inputs
            .iter()
            .filter_map(|(name, attachment)| {
                attachment
                    .target()
                    .map(|child| (name.clone(), json!({"block": template_json(child)})))
            })
            .collect();
        entry["inputs"] = JsonValue::Object(inputs);
    }
    entry
}
