//! Block catalog - the registry of every available block definition
//!
//! The catalog supports:
//! - Registration with definition validation
//! - Lookup by kind, category, or search query
//! - Conforming a loaded workspace to the field constraints
//! - Export to the editing surface's JSON formats

use std::collections::HashMap;

use serde_json::Value as JsonValue;
use tracing::debug;

use super::definition::BlockDefinition;
use super::node::{Node, NodeKind, Workspace};
use crate::categories::{self, BlockCategory};

/// Catalog of block definitions, one per node kind
#[derive(Debug, Clone, Default)]
pub struct BlockCatalog {
    definitions: HashMap<NodeKind, BlockDefinition>,
    /// Registration order, used for listings
    order: Vec<NodeKind>,
}

impl BlockCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog with every built-in block registered
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for definition in categories::all_definitions() {
            // Built-in definitions are covered by tests; a failure here is a
            // programming error surfaced through the log.
            if let Err(err) = catalog.register(definition) {
                tracing::error!("built-in block rejected: {err}");
            }
        }
        catalog
    }

    /// Register a definition
    ///
    /// # Returns
    /// * `Ok(())` if registration succeeds
    /// * `Err(CatalogError)` if the kind is already registered or validation fails
    pub fn register(&mut self, definition: BlockDefinition) -> Result<(), CatalogError> {
        Self::validate_definition(&definition)?;
        let kind = definition.kind;
        if self.definitions.contains_key(&kind) {
            return Err(CatalogError::DuplicateBlock(kind));
        }
        self.definitions.insert(kind, definition);
        self.order.push(kind);
        Ok(())
    }

    pub fn get(&self, kind: NodeKind) -> Option<&BlockDefinition> {
        self.definitions.get(&kind)
    }

    pub fn contains(&self, kind: NodeKind) -> bool {
        self.definitions.contains_key(&kind)
    }

    /// All definitions in registration order
    pub fn all(&self) -> Vec<&BlockDefinition> {
        self.order
            .iter()
            .filter_map(|kind| self.definitions.get(kind))
            .collect()
    }

    pub fn by_category(&self, category: BlockCategory) -> Vec<&BlockDefinition> {
        self.all()
            .into_iter()
            .filter(|def| def.category == category)
            .collect()
    }

    /// Case-insensitive search over name, description and type tag
    pub fn search(&self, query: &str) -> Vec<&BlockDefinition> {
        let query = query.to_lowercase();
        self.all()
            .into_iter()
            .filter(|def| {
                def.name.to_lowercase().contains(&query)
                    || def.description.to_lowercase().contains(&query)
                    || def.kind.type_name().contains(&query)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Apply field constraints to every node the way the editor does on load:
    /// missing fields get defaults, numbers are clamped, unknown dropdown
    /// codes revert to the default. Fields the definition does not declare
    /// are left alone.
    pub fn conform(&self, workspace: &mut Workspace) {
        for node in workspace.top_blocks_mut() {
            self.conform_node(node);
        }
    }

    pub fn conform_node(&self, node: &mut Node) {
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if let Some(def) = self.get(node.kind) {
                for field in &def.fields {
                    let conformed = field.conform(node.fields.get(&field.id));
                    if node.fields.get(&field.id) != Some(&conformed) {
                        debug!(node = %node.id, field = %field.id, "field value conformed");
                    }
                    node.fields.insert(field.id.clone(), conformed);
                }
            }
            for attachment in node.inputs.values_mut().chain(node.next.as_mut()) {
                stack.extend(attachment.block.as_deref_mut());
                stack.extend(attachment.shadow.as_deref_mut());
            }
        }
    }

    /// Block definitions in the editing surface's JSON format
    pub fn to_editor_json(&self) -> JsonValue {
        JsonValue::Array(self.all().iter().map(|def| def.to_editor_json()).collect())
    }

    /// Definitions must agree with the structure of their kind
    fn validate_definition(def: &BlockDefinition) -> Result<(), CatalogError> {
        if def.name.trim().is_empty() {
            return Err(CatalogError::ValidationFailed(format!(
                "{}: name must not be empty",
                def.kind
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for field in &def.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(CatalogError::ValidationFailed(format!(
                    "{}: duplicate field '{}'",
                    def.kind, field.id
                )));
            }
            let check = field.validate(&field.default_value);
            if check.has_errors() {
                return Err(CatalogError::ValidationFailed(format!(
                    "{}: default of '{}' is invalid: {}",
                    def.kind,
                    field.id,
                    check.errors.join("; ")
                )));
            }
        }

        let declared = def.kind.slots();
        if def.slots.len() != declared.len() {
            return Err(CatalogError::ValidationFailed(format!(
                "{}: expected {} slots, found {}",
                def.kind,
                declared.len(),
                def.slots.len()
            )));
        }
        for slot in &def.slots {
            if def.kind.slot_type(&slot.id) != Some(slot.slot_type) {
                return Err(CatalogError::ValidationFailed(format!(
                    "{}: slot '{}' does not match the node structure",
                    def.kind, slot.id
                )));
            }
        }
        Ok(())
    }
}

/// Catalog errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// A block with this kind already exists
    #[error("Block already registered: {0}")]
    DuplicateBlock(NodeKind),

    /// Definition failed validation
    #[error("Block validation failed: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::node::field_names;

    #[test]
    fn test_standard_catalog_covers_every_kind() {
        let catalog = BlockCatalog::standard();
        assert_eq!(catalog.len(), NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            assert!(catalog.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = BlockCatalog::standard();
        let again = categories::trigger::definition();
        assert!(matches!(
            catalog.register(again),
            Err(CatalogError::DuplicateBlock(NodeKind::TriggerStart))
        ));
    }

    #[test]
    fn test_slot_mismatch_rejected() {
        let mut catalog = BlockCatalog::new();
        let def = BlockDefinition::new(NodeKind::Output, "Display", BlockCategory::Output);
        assert!(matches!(
            catalog.register(def),
            Err(CatalogError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_by_category_and_search() {
        let catalog = BlockCatalog::standard();
        let variables: Vec<NodeKind> = catalog
            .by_category(BlockCategory::Variables)
            .iter()
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            variables,
            vec![
                NodeKind::SetVariable,
                NodeKind::ValueNumber,
                NodeKind::ValueText,
                NodeKind::ValueVariable
            ]
        );
        assert!(catalog.search("WAIT").iter().any(|d| d.kind == NodeKind::Delay));
        assert!(catalog.search("no such block").is_empty());
    }

    #[test]
    fn test_conform_clamps_and_fills_defaults() {
        let catalog = BlockCatalog::standard();
        let mut ws = Workspace::new().with_block(
            Node::trigger().then(vec![
                Node::delay(100.0).with_id("slow"),
                Node::new(NodeKind::Transform).with_id("bare"),
                Node::condition("x", "BETWEEN", Node::number(1.0)).with_id("odd"),
            ]),
        );
        catalog.conform(&mut ws);

        let slow = ws.find(&"slow".into()).unwrap();
        assert_eq!(slow.field(field_names::SECONDS), Some(&FieldValue::Number(60.0)));

        let bare = ws.find(&"bare".into()).unwrap();
        assert_eq!(bare.field(field_names::VAR_NAME), Some(&FieldValue::from("myVar")));
        assert_eq!(bare.field(field_names::OPERATION), Some(&FieldValue::from("MULTIPLY_2")));

        let odd = ws.find(&"odd".into()).unwrap();
        assert_eq!(odd.field(field_names::OPERATOR), Some(&FieldValue::from("GT")));
    }
}
