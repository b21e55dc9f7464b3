//! petgraph-backed in-memory shading graph.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{NodeRecord, PortRecord, ShadingDocument};
use crate::error::LoadError;
use crate::query::{Connection, Direction, GraphQuery, NodeKind, PortRef, Upstream};

/// Nodes are graph vertices; every live connection is an edge from the
/// source node to the destination node, weighted by the port pair.
pub struct ShadingGraph {
    pub graph: DiGraph<NodeRecord, Connection>,
    pub node_indices: HashMap<String, NodeIndex>,
    children: HashMap<String, Vec<String>>,
    invalid_sources: HashMap<PortRef, Vec<String>>,
}

impl ShadingGraph {
    pub fn build(document: &ShadingDocument) -> Result<Self, LoadError> {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for node in &document.nodes {
            if node_indices.contains_key(&node.path) {
                return Err(LoadError::DuplicateNode(node.path.clone()));
            }
            let idx = graph.add_node(node.clone());
            node_indices.insert(node.path.clone(), idx);
        }

        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for node in &document.nodes {
            if let Some(parent) = node.parent_path() {
                if node_indices.contains_key(parent) {
                    children
                        .entry(parent.to_string())
                        .or_default()
                        .push(node.path.clone());
                }
            }
        }

        let mut built = ShadingGraph {
            graph,
            node_indices,
            children,
            invalid_sources: HashMap::new(),
        };

        for node in &document.nodes {
            for (direction, ports) in [
                (Direction::Input, &node.inputs),
                (Direction::Output, &node.outputs),
            ] {
                for port in ports {
                    let destination = PortRef {
                        node: node.path.clone(),
                        direction,
                        name: port.name.clone(),
                    };
                    for path in &port.connections {
                        built.add_connection(&destination, path);
                    }
                }
            }
        }

        Ok(built)
    }

    fn add_connection(&mut self, destination: &PortRef, path: &str) {
        let live = PortRef::parse(path)
            .ok()
            .filter(|source| self.is_authored(source))
            .and_then(|source| {
                let src_idx = *self.node_indices.get(&source.node)?;
                let dst_idx = *self.node_indices.get(&destination.node)?;
                Some((source, src_idx, dst_idx))
            });
        let Some((source, src_idx, dst_idx)) = live else {
            self.invalid_sources
                .entry(destination.clone())
                .or_default()
                .push(path.to_string());
            return;
        };
        self.graph.add_edge(
            src_idx,
            dst_idx,
            Connection {
                source,
                destination: destination.clone(),
            },
        );
    }

    pub fn node(&self, path: &str) -> Option<&NodeRecord> {
        self.node_indices.get(path).map(|&idx| &self.graph[idx])
    }

    fn port(&self, port: &PortRef) -> Option<&PortRecord> {
        let node = self.node(&port.node)?;
        let ports = match port.direction {
            Direction::Input => &node.inputs,
            Direction::Output => &node.outputs,
        };
        ports.iter().find(|p| p.name == port.name)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl GraphQuery for ShadingGraph {
    fn node_exists(&self, node: &str) -> bool {
        self.node_indices.contains_key(node)
    }

    fn kind(&self, node: &str) -> Option<NodeKind> {
        self.node(node).map(NodeRecord::kind)
    }

    fn type_id(&self, node: &str) -> Option<String> {
        self.node(node).map(|n| n.id.clone())
    }

    fn parent(&self, node: &str) -> Option<String> {
        let parent = self.node(node)?.parent_path()?;
        self.node_exists(parent).then(|| parent.to_string())
    }

    fn children(&self, node: &str) -> Vec<String> {
        self.children.get(node).cloned().unwrap_or_default()
    }

    fn ports(&self, node: &str, direction: Direction) -> Vec<String> {
        let Some(node) = self.node(node) else {
            return vec![];
        };
        let ports = match direction {
            Direction::Input => &node.inputs,
            Direction::Output => &node.outputs,
        };
        ports.iter().map(|p| p.name.clone()).collect()
    }

    fn declared_type(&self, port: &PortRef) -> Option<String> {
        self.port(port).map(|p| p.type_name.clone())
    }

    fn is_authored(&self, port: &PortRef) -> bool {
        self.port(port).is_some_and(|p| p.authored)
    }

    fn has_value(&self, port: &PortRef) -> bool {
        self.port(port).is_some_and(|p| p.value.is_some())
    }

    fn float_value(&self, port: &PortRef) -> Option<f64> {
        self.port(port).and_then(PortRecord::float_value)
    }

    fn upstream_sources(&self, port: &PortRef) -> Upstream {
        let invalid = self.invalid_sources.get(port).cloned().unwrap_or_default();
        let Some(&idx) = self.node_indices.get(&port.node) else {
            return Upstream {
                sources: vec![],
                invalid,
            };
        };
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .filter(|e| e.weight().destination == *port)
            .map(|e| (e.id(), e.weight().source.clone()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        Upstream {
            sources: edges.into_iter().map(|(_, source)| source).collect(),
            invalid,
        }
    }

    fn custom_flag(&self, node: &str, key: &str) -> bool {
        self.node(node).is_some_and(|n| n.flag(key))
    }
}
