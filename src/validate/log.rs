//! The ordered, append-only diagnostic log returned by a validation call.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::messages::{self, MessageId};
use crate::query::{Connection, PortRef};

/// Ordered so that `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "Info"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

/// Where a diagnostic points. `node`/`port`/`component` are the user-facing
/// location (after pack/unpack remapping); `connection` is the raw graph
/// connection when the diagnostic is about one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
}

impl Location {
    pub fn node(path: impl Into<String>) -> Self {
        Location {
            node: path.into(),
            port: None,
            component: None,
            connection: None,
        }
    }

    /// `port` is the namespaced attribute name, e.g. `inputs:file`.
    pub fn port(port: &PortRef) -> Self {
        Location {
            node: port.node.clone(),
            port: Some(format!("{}:{}", port.direction.namespace(), port.name)),
            component: None,
            connection: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connection = Some(connection);
        self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.node)?;
        if let Some(port) = &self.port {
            write!(f, ".{}", port)?;
        }
        if let Some(component) = &self.component {
            write!(f, ".{}", component)?;
        }
        if let Some(connection) = &self.connection {
            write!(f, " [{}]", connection)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub severity: Severity,
    pub id: MessageId,
    pub message: String,
    pub locations: Vec<Location>,
}

impl Entry {
    pub fn new(
        severity: Severity,
        id: MessageId,
        params: &[&str],
        locations: Vec<Location>,
    ) -> Self {
        Entry {
            severity,
            id,
            message: messages::render(id, params),
            locations,
        }
    }

    pub fn code(&self) -> &'static str {
        self.id.code()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.severity, self.code(), self.message)?;
        match self.locations.as_slice() {
            [] => Ok(()),
            [only] => write!(f, " (at {})", only),
            many => {
                write!(f, " (at ")?;
                for (i, location) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", location)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// An empty log means the graph passed every applicable rule. Any
/// [`Severity::Error`] entry should block export or render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLog {
    entries: Vec<Entry>,
}

impl ValidationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    pub fn with_id(&self, id: MessageId) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.id == id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationLog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ValidationLog {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for ValidationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
