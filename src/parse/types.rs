//! Serde types for the shading document JSON.
//!
//! A document is a flat list of nodes addressed by absolute path, the node
//! definitions they may reference, and optional rule settings. Hierarchy is
//! implied by the paths; connections are authored on the destination port as
//! port paths (`/Looks/Mat/Tex.outputs:rgb`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RuleConfig;
use crate::query::NodeKind;
use crate::registry::NodeDefinition;

// =============================================================================
// TOP-LEVEL DOCUMENT
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadingDocument {
    #[serde(default)]
    pub settings: RuleConfig,
    /// Material validated by [`validate_document`](crate::validate::validate_document).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default)]
    pub definitions: Vec<NodeDefinition>,
    pub nodes: Vec<NodeRecord>,
}

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub path: String,
    /// `Material`, `NodeGraph`, `Shader`, or any other schema name.
    pub schema: String,
    /// Shader identifier, resolved against the definitions.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
    #[serde(default)]
    pub inputs: Vec<PortRecord>,
    #[serde(default)]
    pub outputs: Vec<PortRecord>,
}

impl NodeRecord {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_schema(&self.schema)
    }

    /// Path of the enclosing node, `None` for top-level paths.
    pub fn parent_path(&self) -> Option<&str> {
        match self.path.rsplit_once('/') {
            Some(("", _)) | None => None,
            Some((parent, _)) => Some(parent),
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }
}

// =============================================================================
// PORTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default = "default_authored")]
    pub authored: bool,
    #[serde(default)]
    pub connections: Vec<String>,
}

fn default_authored() -> bool {
    true
}

impl PortRecord {
    pub fn float_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(serde_json::Value::as_f64)
    }
}
