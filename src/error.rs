//! Loader error types.
//!
//! Defects in a shading graph are never errors here: they are reported as
//! entries in a [`ValidationLog`](crate::validate::ValidationLog). These types
//! only cover input that cannot be turned into a graph at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse shading document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("node path '{0}' is declared more than once")]
    DuplicateNode(String),

    #[error("node definition '{0}' is declared more than once")]
    DuplicateDefinition(String),

    #[error("material '{0}' is not a material node of this document")]
    UnknownMaterial(String),

    #[error("document has no material node to validate")]
    NoMaterial,
}

impl LoadError {
    /// Stable code, mirrored by the wasm surface.
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Json(_) => "P001",
            LoadError::DuplicateNode(_) => "P002",
            LoadError::DuplicateDefinition(_) => "P003",
            LoadError::UnknownMaterial(_) => "P004",
            LoadError::NoMaterial => "P005",
        }
    }
}

/// Failure to split a connection path into node, direction and port name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortPathError {
    #[error("'{0}' has no '.' separating node path and attribute")]
    MissingSeparator(String),

    #[error("attribute '{0}' is not of the form inputs:<name> or outputs:<name>")]
    InvalidAttribute(String),
}
