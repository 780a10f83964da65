//! Core block abstractions and types
//!
//! This module defines the node tree edited by the visual surface, together
//! with the declarative pieces the catalog is built from: field and slot
//! definitions, block definitions, and the catalog itself.

pub mod definition;
pub mod field;
pub mod node;
pub mod registry;
pub mod slot;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use definition::BlockDefinition;
pub use field::{FieldDefinition, FieldValue};
pub use node::{Attachment, Node, NodeKind, Workspace};
pub use registry::{BlockCatalog, CatalogError};
pub use slot::{Shape, SlotDefinition, SlotType};

/// Unique identifier for a node.
///
/// The editing surface assigns its own opaque string ids, so this wraps a
/// string rather than a UUID. Nodes built in code get a fresh UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Generate a new random node ID
    pub fn new() -> Self {
        NodeId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
