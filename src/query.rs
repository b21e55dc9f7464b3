//! Read-only view over an externally owned shading graph.
//!
//! The validator never owns or mutates nodes. It reaches the graph only
//! through [`GraphQuery`], using path strings such as `/Looks/Mat/Tex` for
//! nodes and [`PortRef`] for ports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PortPathError;

/// The closed set of node kinds the validator dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// The root whose terminal outputs anchor Phase 1.
    Material,
    /// A compound that nests other nodes and may expose inputs/outputs.
    Container,
    Shader,
    /// Any other schema (scopes, backdrops, ...), keeping its schema name.
    Other(String),
}

impl NodeKind {
    pub fn from_schema(schema: &str) -> Self {
        match schema {
            "Material" => NodeKind::Material,
            "NodeGraph" => NodeKind::Container,
            "Shader" => NodeKind::Shader,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// Material or container: nodes whose ports only route connections through.
    pub fn is_container_like(&self) -> bool {
        matches!(self, NodeKind::Material | NodeKind::Container)
    }

    /// Nodes that may take part in connections.
    pub fn is_connectable(&self) -> bool {
        !matches!(self, NodeKind::Other(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    pub fn namespace(self) -> &'static str {
        match self {
            Direction::Input => "inputs",
            Direction::Output => "outputs",
        }
    }
}

/// A port identity: owning node path, direction and (possibly qualified) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRef {
    pub node: String,
    pub direction: Direction,
    pub name: String,
}

impl PortRef {
    pub fn input(node: impl Into<String>, name: impl Into<String>) -> Self {
        PortRef {
            node: node.into(),
            direction: Direction::Input,
            name: name.into(),
        }
    }

    pub fn output(node: impl Into<String>, name: impl Into<String>) -> Self {
        PortRef {
            node: node.into(),
            direction: Direction::Output,
            name: name.into(),
        }
    }

    /// Parse `"/path/to/node.inputs:name"` or `"/path/to/node.outputs:ns:name"`.
    pub fn parse(path: &str) -> Result<Self, PortPathError> {
        let Some((node, attribute)) = path.rsplit_once('.') else {
            return Err(PortPathError::MissingSeparator(path.to_string()));
        };
        if node.is_empty() {
            return Err(PortPathError::MissingSeparator(path.to_string()));
        }
        let (direction, name) = split_attribute(attribute)
            .ok_or_else(|| PortPathError::InvalidAttribute(attribute.to_string()))?;
        Ok(PortRef {
            node: node.to_string(),
            direction,
            name: name.to_string(),
        })
    }

    /// The node path part of a port path, even when the attribute part is invalid.
    pub fn node_of(path: &str) -> &str {
        path.rsplit_once('.').map(|(node, _)| node).unwrap_or(path)
    }

    /// Split a qualified name like `mtlx:surface` into `(Some("mtlx"), "surface")`.
    pub fn qualifier(&self) -> (Option<&str>, &str) {
        match self.name.rsplit_once(':') {
            Some((ns, base)) => (Some(ns), base),
            None => (None, self.name.as_str()),
        }
    }
}

fn split_attribute(attribute: &str) -> Option<(Direction, &str)> {
    let (namespace, name) = attribute.split_once(':')?;
    let direction = match namespace {
        "inputs" => Direction::Input,
        "outputs" => Direction::Output,
        _ => return None,
    };
    if name.is_empty() || name.split(':').any(|part| part.is_empty()) {
        return None;
    }
    Some((direction, name))
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.node, self.direction.namespace(), self.name)
    }
}

/// An ordered (source, destination) pair, reconstructed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub source: PortRef,
    pub destination: PortRef,
}

impl Connection {
    pub fn touches(&self, node: &str) -> bool {
        self.source.node == node || self.destination.node == node
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// What feeds a destination port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Upstream {
    /// Live sources, in authored order.
    pub sources: Vec<PortRef>,
    /// Authored connection paths that do not resolve to a live port.
    pub invalid: Vec<String>,
}

/// The minimal read-only capability set the validator needs.
pub trait GraphQuery {
    fn node_exists(&self, node: &str) -> bool;

    fn kind(&self, node: &str) -> Option<NodeKind>;

    /// Shader identifier, empty when the node has none authored.
    fn type_id(&self, node: &str) -> Option<String>;

    fn parent(&self, node: &str) -> Option<String>;

    fn children(&self, node: &str) -> Vec<String>;

    /// All nodes below `node`, parents before their children.
    fn descendants(&self, node: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut pending = self.children(node);
        pending.reverse();
        while let Some(next) = pending.pop() {
            let mut children = self.children(&next);
            children.reverse();
            pending.extend(children);
            out.push(next);
        }
        out
    }

    /// Port names declared on the node for one direction, in authored order.
    fn ports(&self, node: &str, direction: Direction) -> Vec<String>;

    fn declared_type(&self, port: &PortRef) -> Option<String>;

    fn is_authored(&self, port: &PortRef) -> bool;

    fn has_value(&self, port: &PortRef) -> bool;

    /// Literal value as a float, when the port holds a numeric scalar.
    fn float_value(&self, port: &PortRef) -> Option<f64>;

    fn upstream_sources(&self, port: &PortRef) -> Upstream;

    fn custom_flag(&self, node: &str, key: &str) -> bool;

    fn is_connected(&self, port: &PortRef) -> bool {
        !self.upstream_sources(port).sources.is_empty()
    }
}
