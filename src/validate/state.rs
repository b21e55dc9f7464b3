//! Call-scoped traversal state. Created by each `validate()` call and
//! dropped when it returns.

use std::collections::{HashMap, HashSet};

use super::log::{Entry, Location, Severity, ValidationLog};
use super::messages::MessageId;
use crate::config::RuleConfig;
use crate::query::{Connection, GraphQuery, PortRef};
use crate::registry::{DefinitionRegistry, NodeDefinition};

pub(crate) struct TraversalState {
    /// Non-container destination ports already traversed.
    pub visited_destinations: HashSet<PortRef>,
    /// Node path → conformance result. Each node is checked once.
    pub validated_nodes: HashMap<String, bool>,
    /// The active DFS path of connections.
    pub connection_stack: Vec<Connection>,
    pub severity: Severity,
    /// Family established by the terminal output being traversed; `None`
    /// while traversing unreached islands.
    pub family: Option<String>,
    /// `(node, port)` pairs already reported as broken component setups.
    pub broken_components_seen: HashSet<(String, String)>,
    /// Pack node path → the connection through which it feeds a visible port.
    pub pending_pack_connections: HashMap<String, Connection>,
}

impl Default for TraversalState {
    fn default() -> Self {
        TraversalState {
            visited_destinations: HashSet::new(),
            validated_nodes: HashMap::new(),
            connection_stack: Vec::new(),
            severity: Severity::Error,
            family: None,
            broken_components_seen: HashSet::new(),
            pending_pack_connections: HashMap::new(),
        }
    }
}

/// Everything the rule functions need, threaded through the recursion.
pub(crate) struct Context<'a> {
    pub graph: &'a dyn GraphQuery,
    pub registry: &'a dyn DefinitionRegistry,
    pub config: &'a RuleConfig,
    pub material: String,
    pub state: TraversalState,
    pub log: ValidationLog,
}

impl<'a> Context<'a> {
    pub fn new(
        graph: &'a dyn GraphQuery,
        registry: &'a dyn DefinitionRegistry,
        config: &'a RuleConfig,
        material: &str,
    ) -> Self {
        Context {
            graph,
            registry,
            config,
            material: material.to_string(),
            state: TraversalState::default(),
            log: ValidationLog::new(),
        }
    }

    /// Resolved definition of a node's type identifier.
    pub fn definition(&self, node: &str) -> Option<&'a NodeDefinition> {
        let registry: &'a dyn DefinitionRegistry = self.registry;
        let type_id = self.graph.type_id(node)?;
        if type_id.is_empty() {
            return None;
        }
        registry.lookup(&type_id)
    }

    /// A rule's own severity, never above the current pass severity.
    pub fn capped(&self, severity: Severity) -> Severity {
        severity.min(self.state.severity)
    }

    pub fn report(
        &mut self,
        severity: Severity,
        id: MessageId,
        params: &[&str],
        locations: Vec<Location>,
    ) {
        self.log.push(Entry::new(severity, id, params, locations));
    }

    /// Report at the current pass severity.
    pub fn report_current(&mut self, id: MessageId, params: &[&str], locations: Vec<Location>) {
        let severity = self.state.severity;
        self.report(severity, id, params, locations);
    }
}
