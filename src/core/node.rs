//! Node tree model
//!
//! The tree mirrors the editing surface's JSON serialization: every node has a
//! `type`, an `id`, optional canvas coordinates, a `fields` map, an `inputs`
//! map of slot name to attachment, and an optional `next` attachment that
//! continues a statement chain.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::FieldValue;
use super::slot::{Shape, SlotType};
use super::NodeId;

/// Field names used by the catalog
pub mod field_names {
    pub const VAR_NAME: &str = "VAR_NAME";
    pub const NUM: &str = "NUM";
    pub const TEXT: &str = "TEXT";
    pub const VAR: &str = "VAR";
    pub const OPERATOR: &str = "OPERATOR";
    pub const OPERATION: &str = "OPERATION";
    pub const SECONDS: &str = "SECONDS";
}

/// Slot names used by the catalog
pub mod slot_names {
    pub const VALUE: &str = "VALUE";
    pub const COMPARE_VALUE: &str = "COMPARE_VALUE";
    pub const DO: &str = "DO";
    pub const ELSE: &str = "ELSE";
    pub const MESSAGE: &str = "MESSAGE";
}

/// The closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    TriggerStart,
    SetVariable,
    ValueNumber,
    ValueText,
    ValueVariable,
    Condition,
    Transform,
    Delay,
    Output,
}

impl NodeKind {
    pub const ALL: [NodeKind; 9] = [
        NodeKind::TriggerStart,
        NodeKind::SetVariable,
        NodeKind::ValueNumber,
        NodeKind::ValueText,
        NodeKind::ValueVariable,
        NodeKind::Condition,
        NodeKind::Transform,
        NodeKind::Delay,
        NodeKind::Output,
    ];

    /// Type tag used in the serialized tree
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::TriggerStart => "trigger_start",
            NodeKind::SetVariable => "set_variable",
            NodeKind::ValueNumber => "value_number",
            NodeKind::ValueText => "value_text",
            NodeKind::ValueVariable => "value_variable",
            NodeKind::Condition => "condition",
            NodeKind::Transform => "transform",
            NodeKind::Delay => "delay",
            NodeKind::Output => "output",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    pub fn shape(&self) -> Shape {
        match self {
            NodeKind::TriggerStart => Shape::Trigger,
            NodeKind::ValueNumber | NodeKind::ValueText | NodeKind::ValueVariable => {
                Shape::Expression
            }
            NodeKind::SetVariable
            | NodeKind::Condition
            | NodeKind::Transform
            | NodeKind::Delay
            | NodeKind::Output => Shape::Statement,
        }
    }

    /// Slots declared by this kind, in rendering order
    pub fn slots(&self) -> &'static [(&'static str, SlotType)] {
        match self {
            NodeKind::SetVariable => &[(slot_names::VALUE, SlotType::Value)],
            NodeKind::Condition => &[
                (slot_names::COMPARE_VALUE, SlotType::Value),
                (slot_names::DO, SlotType::Statement),
                (slot_names::ELSE, SlotType::Statement),
            ],
            NodeKind::Output => &[(slot_names::MESSAGE, SlotType::Value)],
            NodeKind::TriggerStart
            | NodeKind::ValueNumber
            | NodeKind::ValueText
            | NodeKind::ValueVariable
            | NodeKind::Transform
            | NodeKind::Delay => &[],
        }
    }

    pub fn slot_type(&self, slot: &str) -> Option<SlotType> {
        self.slots()
            .iter()
            .find(|(name, _)| *name == slot)
            .map(|(_, slot_type)| *slot_type)
    }

    /// Whether a node of this kind can be followed by another statement
    pub fn has_next(&self) -> bool {
        self.shape() != Shape::Expression
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Content of a slot or `next` link.
///
/// A shadow node is a placeholder the editor keeps in an empty slot; it
/// generates code exactly like a real node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Box<Node>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Box<Node>>,
}

impl Attachment {
    pub fn new(node: Node) -> Self {
        Self {
            block: Some(Box::new(node)),
            shadow: None,
        }
    }

    /// The node occupying the connection, a real block winning over a shadow
    pub fn target(&self) -> Option<&Node> {
        self.block.as_deref().or(self.shadow.as_deref())
    }
}

/// One block instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Attachment>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            id: NodeId::new(),
            x: None,
            y: None,
            fields: BTreeMap::new(),
            inputs: BTreeMap::new(),
            next: None,
        }
    }

    // ── Builders ────────────────────────────────────────────────────────

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = NodeId(id.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_input(mut self, slot: &str, child: Node) -> Self {
        self.inputs.insert(slot.to_string(), Attachment::new(child));
        self
    }

    pub fn with_next(mut self, next: Node) -> Self {
        self.next = Some(Attachment::new(next));
        self
    }

    /// Append a statement chain below this node. Does nothing for an empty list.
    pub fn then(self, chain: Vec<Node>) -> Self {
        match Node::chain(chain) {
            Some(first) => self.with_next(first),
            None => self,
        }
    }

    /// Link nodes through `next`, returning the head of the chain
    pub fn chain(nodes: Vec<Node>) -> Option<Node> {
        nodes
            .into_iter()
            .rev()
            .fold(None, |below: Option<Node>, node| {
                Some(match below {
                    Some(next) => node.with_next(next),
                    None => node,
                })
            })
    }

    pub fn trigger() -> Self {
        Node::new(NodeKind::TriggerStart)
    }

    pub fn set_variable(name: &str, value: Node) -> Self {
        Node::new(NodeKind::SetVariable)
            .with_field(field_names::VAR_NAME, name)
            .with_input(slot_names::VALUE, value)
    }

    pub fn number(n: f64) -> Self {
        Node::new(NodeKind::ValueNumber).with_field(field_names::NUM, n)
    }

    pub fn text(text: &str) -> Self {
        Node::new(NodeKind::ValueText).with_field(field_names::TEXT, text)
    }

    pub fn variable(name: &str) -> Self {
        Node::new(NodeKind::ValueVariable).with_field(field_names::VAR, name)
    }

    /// Condition with an operator code such as `GT`
    pub fn condition(name: &str, operator: &str, compare: Node) -> Self {
        Node::new(NodeKind::Condition)
            .with_field(field_names::VAR_NAME, name)
            .with_field(field_names::OPERATOR, operator)
            .with_input(slot_names::COMPARE_VALUE, compare)
    }

    /// Fill the `DO` branch of a condition
    pub fn when_true(self, chain: Vec<Node>) -> Self {
        self.with_branch(slot_names::DO, chain)
    }

    /// Fill the `ELSE` branch of a condition
    pub fn otherwise(self, chain: Vec<Node>) -> Self {
        self.with_branch(slot_names::ELSE, chain)
    }

    fn with_branch(self, slot: &str, chain: Vec<Node>) -> Self {
        match Node::chain(chain) {
            Some(first) => self.with_input(slot, first),
            None => self,
        }
    }

    /// Transform with an operation code such as `MULTIPLY_2`
    pub fn transform(name: &str, operation: &str) -> Self {
        Node::new(NodeKind::Transform)
            .with_field(field_names::VAR_NAME, name)
            .with_field(field_names::OPERATION, operation)
    }

    pub fn delay(seconds: f64) -> Self {
        Node::new(NodeKind::Delay).with_field(field_names::SECONDS, seconds)
    }

    pub fn output(message: Node) -> Self {
        Node::new(NodeKind::Output).with_input(slot_names::MESSAGE, message)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Field read as text; empty text counts as unset
    pub fn text_field(&self, name: &str) -> Option<String> {
        self.field(name)
            .map(|v| v.to_text().into_owned())
            .filter(|s| !s.is_empty())
    }

    /// Field read as a number; zero and NaN count as set
    pub fn number_field(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(FieldValue::as_number)
    }

    /// Node occupying a slot
    pub fn input(&self, slot: &str) -> Option<&Node> {
        self.inputs.get(slot).and_then(Attachment::target)
    }

    pub fn next_node(&self) -> Option<&Node> {
        self.next.as_ref().and_then(Attachment::target)
    }

    /// Children in rendering order: declared slots, stray slots, then `next`
    pub fn children(&self) -> Vec<&Node> {
        let declared = self.kind.slots();
        let mut children: Vec<&Node> = declared
            .iter()
            .filter_map(|(name, _)| self.input(name))
            .collect();
        children.extend(
            self.inputs
                .iter()
                .filter(|(name, _)| !declared.iter().any(|(d, _)| d == name))
                .filter_map(|(_, attachment)| attachment.target()),
        );
        children.extend(self.next_node());
        children
    }

    /// This node and every node below it, depth first
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().into_iter().rev());
        }
        out
    }
}

// Chains can be thousands of nodes long; unlink them instead of letting the
// boxes drop each other recursively.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_into(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_into(&mut pending);
        }
    }
}

impl Node {
    fn detach_into(&mut self, pending: &mut Vec<Box<Node>>) {
        let attachments = std::mem::take(&mut self.inputs)
            .into_values()
            .chain(self.next.take());
        for attachment in attachments {
            pending.extend(attachment.block);
            pending.extend(attachment.shadow);
        }
    }
}

/// Top-level list in the serialized form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopBlocks {
    #[serde(rename = "languageVersion", default)]
    pub language_version: u32,
    #[serde(default)]
    pub blocks: Vec<Node>,
}

/// The program tree: an ordered forest of top-level nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Workspace::no_blocks")]
    pub blocks: TopBlocks,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block(mut self, node: Node) -> Self {
        self.push(node);
        self
    }

    pub fn push(&mut self, node: Node) {
        self.blocks.blocks.push(node);
    }

    pub fn clear(&mut self) {
        self.blocks.blocks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.blocks.is_empty()
    }

    fn no_blocks(blocks: &TopBlocks) -> bool {
        blocks.blocks.is_empty()
    }

    /// Top-level nodes in stored order
    pub fn top_blocks(&self) -> &[Node] {
        &self.blocks.blocks
    }

    pub fn top_blocks_mut(&mut self) -> &mut Vec<Node> {
        &mut self.blocks.blocks
    }

    /// Top-level nodes in canvas order: top to bottom, then left to right.
    /// Nodes without coordinates sort as if placed at the origin.
    pub fn top_blocks_ordered(&self) -> Vec<&Node> {
        let mut ordered: Vec<&Node> = self.blocks.blocks.iter().collect();
        ordered.sort_by(|a, b| {
            let key = |n: &Node| (n.y.unwrap_or(0.0), n.x.unwrap_or(0.0));
            let (ay, ax) = key(a);
            let (by, bx) = key(b);
            ay.total_cmp(&by).then(ax.total_cmp(&bx))
        });
        ordered
    }

    /// Every node in the tree, each top-level node followed by its descendants
    pub fn all_nodes(&self) -> Vec<&Node> {
        self.blocks
            .blocks
            .iter()
            .flat_map(|node| node.descendants())
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.all_nodes().len()
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        self.all_nodes().into_iter().find(|n| &n.id == id)
    }

    /// Parse the editor's JSON. Every `next` link nests two objects deeper,
    /// so the parser's depth limit is lifted; natively the stack also grows
    /// on demand.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut parser = serde_json::Deserializer::from_str(json);
        parser.disable_recursion_limit();
        #[cfg(not(target_arch = "wasm32"))]
        let workspace = Self::deserialize(serde_stacker::Deserializer::new(&mut parser))?;
        #[cfg(target_arch = "wasm32")]
        let workspace = Self::deserialize(&mut parser)?;
        parser.end()?;
        Ok(workspace)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
