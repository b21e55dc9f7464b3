//! Shading network validation.
//!
//! Validates a material's network in two passes. Everything reachable from
//! the material's terminal outputs is checked at `Error` severity; nodes left
//! unreached afterwards are checked at `Warning` severity, since such
//! subgraphs may simply be unfinished.

mod backend_rules;
mod components;
mod connection_rules;
pub mod log;
pub mod messages;
mod node_rules;
mod state;
mod traversal;
pub mod types;

pub use log::{Entry, Location, Severity, ValidationLog};
pub use messages::MessageId;

use tracing::debug;

use crate::config::RuleConfig;
use crate::error::LoadError;
use crate::parse;
use crate::query::{Direction, GraphQuery, NodeKind, PortRef};
use crate::registry::DefinitionRegistry;
use state::Context;

/// Validates materials against a graph and a definition registry. Holds no
/// state between calls.
pub struct Validator<'a> {
    graph: &'a dyn GraphQuery,
    registry: &'a dyn DefinitionRegistry,
    config: &'a RuleConfig,
}

impl<'a> Validator<'a> {
    pub fn new(
        graph: &'a dyn GraphQuery,
        registry: &'a dyn DefinitionRegistry,
        config: &'a RuleConfig,
    ) -> Self {
        Self {
            graph,
            registry,
            config,
        }
    }

    /// Revalidate `material` from scratch and return every defect found.
    #[tracing::instrument(skip_all, fields(material = %material))]
    pub fn validate(&self, material: &str) -> ValidationLog {
        let mut cx = Context::new(self.graph, self.registry, self.config, material);

        node_rules::validated_node(&mut cx, material);
        traverse_terminal_outputs(&mut cx);
        traverse_unreached(&mut cx);

        debug!(
            entries = cx.log.len(),
            errors = cx.log.count(Severity::Error),
            "validation finished"
        );
        cx.log
    }
}

/// Phase 1: depth-first from each terminal output, at `Error` severity.
fn traverse_terminal_outputs(cx: &mut Context<'_>) {
    cx.state.severity = Severity::Error;

    for name in cx.graph.ports(&cx.material, Direction::Output) {
        let port = PortRef::output(cx.material.as_str(), name);
        let (qualifier, base) = port.qualifier();
        if !cx.config.is_terminal_output(base) {
            continue;
        }
        let family = qualifier
            .unwrap_or(cx.config.fallback_family.as_str())
            .to_string();
        debug!(%port, %family, "terminal output");
        cx.state.family = Some(family);
        traversal::visit_destination(cx, &port);
    }
}

/// Phase 2: nodes no terminal output reached, at `Warning` severity. Pack and
/// unpack nodes go last so their visible companion is traversed first.
fn traverse_unreached(cx: &mut Context<'_>) {
    cx.state.severity = Severity::Warning;
    cx.state.family = None;

    let (deferred, visible): (Vec<String>, Vec<String>) = cx
        .graph
        .descendants(&cx.material)
        .into_iter()
        .filter(|node| !cx.state.validated_nodes.contains_key(node))
        .partition(|node| components::role(cx, node).is_some());
    debug!(
        unreached = visible.len() + deferred.len(),
        "checking unreached nodes"
    );

    for node in visible.into_iter().chain(deferred) {
        if cx.state.validated_nodes.contains_key(&node) {
            continue;
        }
        let conformant = node_rules::validated_node(cx, &node);
        if !conformant || cx.graph.kind(&node) != Some(NodeKind::Shader) {
            continue;
        }
        for name in cx.graph.ports(&node, Direction::Input) {
            traversal::visit_destination(cx, &PortRef::input(node.as_str(), name));
        }
    }
}

/// Parse a shading document, build its graph and registry, and validate its
/// material (the `material` field, or the first material node).
pub fn validate_document(json: &str) -> Result<ValidationLog, LoadError> {
    let (document, graph, registry) = parse::parse_and_build(json)?;

    let material = match &document.material {
        Some(path) => path.clone(),
        None => document
            .nodes
            .iter()
            .find(|n| n.kind() == NodeKind::Material)
            .map(|n| n.path.clone())
            .ok_or(LoadError::NoMaterial)?,
    };
    if graph.kind(&material) != Some(NodeKind::Material) {
        return Err(LoadError::UnknownMaterial(material));
    }

    let validator = Validator::new(&graph, &registry, &document.settings);
    Ok(validator.validate(&material))
}
