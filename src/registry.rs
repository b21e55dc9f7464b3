//! Node definition lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Geometry stream the input reads when left unconnected (`UV0`, `Tworld`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_geomprop: Option<String>,
}

/// Declared interface of a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub id: String,
    /// Node family, e.g. `image`, `standard_surface`, `combine3`.
    #[serde(default)]
    pub family: String,
    /// Backend that realizes the node, e.g. `mtlx`, `arnold`, `glslfx`.
    #[serde(default)]
    pub source_backend: String,
    #[serde(default)]
    pub inputs: Vec<PortDefinition>,
    #[serde(default)]
    pub outputs: Vec<PortDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
}

impl NodeDefinition {
    pub fn input(&self, name: &str) -> Option<&PortDefinition> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&PortDefinition> {
        self.outputs.iter().find(|p| p.name == name)
    }
}

pub trait DefinitionRegistry {
    fn lookup(&self, type_id: &str) -> Option<&NodeDefinition>;
}

/// In-memory registry keyed by definition id.
#[derive(Debug, Default, Clone)]
pub struct DefinitionTable {
    definitions: HashMap<String, NodeDefinition>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(definitions: &[NodeDefinition]) -> Result<Self, LoadError> {
        let mut table = Self::new();
        for definition in definitions {
            if table.definitions.contains_key(&definition.id) {
                return Err(LoadError::DuplicateDefinition(definition.id.clone()));
            }
            table.insert(definition.clone());
        }
        Ok(table)
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, definition: NodeDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl DefinitionRegistry for DefinitionTable {
    fn lookup(&self, type_id: &str) -> Option<&NodeDefinition> {
        self.definitions.get(type_id)
    }
}
