//! Parse phase: JSON → document types + graph and registry construction.

pub mod graph;
pub mod types;

pub use graph::ShadingGraph;
pub use types::*;

use crate::error::LoadError;
use crate::registry::DefinitionTable;

/// Deserialize a shading document JSON string.
pub fn parse(json: &str) -> Result<ShadingDocument, LoadError> {
    Ok(serde_json::from_str::<ShadingDocument>(json)?)
}

/// Parse JSON and build the graph and definition registry in one step.
pub fn parse_and_build(
    json: &str,
) -> Result<(ShadingDocument, ShadingGraph, DefinitionTable), LoadError> {
    let document = parse(json)?;
    let graph = ShadingGraph::build(&document)?;
    let registry = DefinitionTable::build(&document.definitions)?;
    Ok((document, graph, registry))
}
