//! Depth-first traversal from destination ports to their upstream sources.
//!
//! The active path is kept on `connection_stack` so back-edges can be found
//! and sliced into cycle locations. A connection whose source is a material or
//! container is not itself tested for a back-edge: a compound may be
//! re-entered from another subgraph without that proving a cycle.

use tracing::{debug, trace};

use super::components::{self, ComponentRole};
use super::connection_rules;
use super::log::Location;
use super::messages::MessageId;
use super::node_rules::validated_node;
use super::state::Context;
use crate::query::{Connection, Direction, NodeKind, PortRef};

/// Visit a destination port and everything upstream of it.
pub(crate) fn visit_destination(cx: &mut Context<'_>, destination: &PortRef) {
    let container_like = cx
        .graph
        .kind(&destination.node)
        .is_some_and(|k| k.is_container_like());
    if container_like {
        // Compound ports are not memoized, but never re-entered on one path.
        if cx
            .state
            .connection_stack
            .iter()
            .any(|c| c.destination == *destination)
        {
            return;
        }
    } else if !cx.state.visited_destinations.insert(destination.clone()) {
        return;
    }
    trace!(port = %destination, "visiting destination");

    let upstream = cx.graph.upstream_sources(destination);
    report_invalid_sources(cx, destination, &upstream.invalid);

    for source in upstream.sources {
        visit_connection(
            cx,
            Connection {
                source,
                destination: destination.clone(),
            },
        );
    }
}

fn visit_connection(cx: &mut Context<'_>, connection: Connection) {
    let source_node = connection.source.node.clone();
    let source_kind = cx.graph.kind(&source_node);
    let source_role = components::role(cx, &source_node);

    if source_role == Some(ComponentRole::Pack) {
        cx.state
            .pending_pack_connections
            .entry(source_node.clone())
            .or_insert_with(|| connection.clone());
    }
    let conformant = validated_node(cx, &source_node);

    cx.state.connection_stack.push(connection.clone());

    let through_compound = source_kind.as_ref().is_some_and(NodeKind::is_container_like);
    if !through_compound {
        if let Some(start) = find_back_edge(cx, &source_node) {
            report_cycle(cx, start);
            cx.state.connection_stack.pop();
            return;
        }
    }

    connection_rules::check_connection(cx, &connection, conformant);
    route_upstream(cx, &connection.source, source_kind.as_ref(), source_role);

    cx.state.connection_stack.pop();
}

/// Index of the nearest stacked connection that already ends at `node`.
fn find_back_edge(cx: &Context<'_>, node: &str) -> Option<usize> {
    cx.state
        .connection_stack
        .iter()
        .rposition(|c| c.destination.node == node)
}

fn report_cycle(cx: &mut Context<'_>, start: usize) {
    let stack = &cx.state.connection_stack[start..];
    let component_nodes: Vec<&str> = stack
        .iter()
        .flat_map(|c| [c.source.node.as_str(), c.destination.node.as_str()])
        .filter(|node| components::role(cx, node).is_some())
        .collect();

    let mut locations = Vec::with_capacity(stack.len());
    for connection in stack.iter().rev() {
        if component_nodes.iter().any(|node| connection.touches(node)) {
            continue;
        }
        let location = Location::port(&connection.destination);
        locations.push(location.with_connection(connection.clone()));
    }
    debug!(length = stack.len(), "connection cycle");
    cx.report_current(MessageId::Cycle, &[], locations);
}

/// Continue into whatever feeds `source`.
fn route_upstream(
    cx: &mut Context<'_>,
    source: &PortRef,
    kind: Option<&NodeKind>,
    role: Option<ComponentRole>,
) {
    match kind {
        // A compound port is itself a destination: an output is bound to the
        // inner graph, an input to whatever feeds the compound from outside.
        Some(k) if k.is_container_like() => visit_destination(cx, source),
        Some(NodeKind::Shader) => {
            let inputs = cx.graph.ports(&source.node, Direction::Input);
            let inputs: Vec<String> = match role {
                Some(ComponentRole::Unpack) => inputs.into_iter().take(1).collect(),
                _ => inputs,
            };
            for name in inputs {
                visit_destination(cx, &PortRef::input(source.node.as_str(), name));
            }
        }
        _ => {}
    }
}

/// Authored connection paths that do not resolve to a live port.
fn report_invalid_sources(cx: &mut Context<'_>, destination: &PortRef, invalid: &[String]) {
    for path in invalid {
        let id = if !cx.graph.node_exists(PortRef::node_of(path)) {
            MessageId::ConnectedToMissingNode
        } else if PortRef::parse(path).is_err() {
            MessageId::ConnectedToInvalidAttribute
        } else {
            MessageId::ConnectedToMissingAttribute
        };
        let location = components::locate(cx, destination);
        cx.report_current(id, &[path.as_str()], vec![location]);
    }
}
