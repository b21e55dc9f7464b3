//! Type, containment and family consistency of a single connection.

use super::components::{self, ComponentRole};
use super::log::Location;
use super::messages::MessageId;
use super::state::Context;
use super::types::{representations_agree, types_agree};
use crate::query::{Connection, Direction, NodeKind};
use crate::registry::NodeDefinition;

/// The family rules are evaluated under for one connection.
struct ActiveFamily {
    name: Option<String>,
    /// True when taken from the destination node rather than from a
    /// terminal output (unreached islands).
    inferred: bool,
}

pub(crate) fn check_connection(
    cx: &mut Context<'_>,
    connection: &Connection,
    source_conformant: bool,
) {
    let source_definition = cx.definition(&connection.source.node);
    let destination_definition = cx.definition(&connection.destination.node);

    let family = match &cx.state.family {
        Some(family) => ActiveFamily {
            name: Some(family.clone()),
            inferred: false,
        },
        None => ActiveFamily {
            name: destination_definition
                .map(|d| d.source_backend.clone())
                .filter(|b| !b.is_empty()),
            inferred: true,
        },
    };

    check_types(cx, connection, &family, source_definition, destination_definition);
    check_parents(cx, connection);

    let source_is_shader = cx.graph.kind(&connection.source.node) == Some(NodeKind::Shader);
    if source_is_shader && source_conformant {
        check_source_family(cx, connection, &family, source_definition);
    }
}

fn check_types(
    cx: &mut Context<'_>,
    connection: &Connection,
    family: &ActiveFamily,
    source_definition: Option<&NodeDefinition>,
    destination_definition: Option<&NodeDefinition>,
) {
    let (Some(source_type), Some(destination_type)) = (
        cx.graph.declared_type(&connection.source),
        cx.graph.declared_type(&connection.destination),
    ) else {
        return;
    };

    let portable = family
        .name
        .as_deref()
        .is_some_and(|f| cx.config.is_portable(f));

    let agree = if portable {
        // Packed channels and unpack inputs are checked by the component
        // rules instead.
        if components::role(cx, &connection.source.node) == Some(ComponentRole::Pack)
            && same_backend(source_definition, destination_definition)
        {
            return;
        }
        if connection.destination.direction == Direction::Input
            && components::role(cx, &connection.destination.node) == Some(ComponentRole::Unpack)
        {
            return;
        }
        types_agree(cx.config, &source_type, &destination_type)
    } else {
        representations_agree(cx.config, &source_type, &destination_type)
    };

    if !agree {
        let locations = connection_locations(cx, connection);
        cx.report_current(
            MessageId::ConnectionTypeMismatch,
            &[source_type.as_str(), destination_type.as_str()],
            locations,
        );
    }
}

fn same_backend(a: Option<&NodeDefinition>, b: Option<&NodeDefinition>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.source_backend == b.source_backend,
        _ => false,
    }
}

/// Both ends must share a parent, or one must be the other's compound.
fn check_parents(cx: &mut Context<'_>, connection: &Connection) {
    let source = connection.source.node.as_str();
    let destination = connection.destination.node.as_str();
    let source_parent = cx.graph.parent(source);
    let destination_parent = cx.graph.parent(destination);

    let related = source_parent == destination_parent
        || source_parent.as_deref() == Some(destination)
        || destination_parent.as_deref() == Some(source);
    if related
        || cx
            .graph
            .custom_flag(destination, &cx.config.transient_override_flag)
    {
        return;
    }

    let locations = connection_locations(cx, connection);
    cx.report_current(MessageId::ParentMismatch, &[], locations);
}

fn check_source_family(
    cx: &mut Context<'_>,
    connection: &Connection,
    family: &ActiveFamily,
    source_definition: Option<&NodeDefinition>,
) {
    let Some(active) = family.name.as_deref() else {
        return;
    };
    if !cx.config.is_portable(active) && !cx.config.is_native(active) {
        return;
    }
    let Some(source_definition) = source_definition else {
        return;
    };
    let backend = source_definition.source_backend.as_str();
    if backend.is_empty() || backend == active {
        return;
    }

    let id = if family.inferred {
        MessageId::SourceIncompatibleWithDestination
    } else {
        MessageId::SourceCannotAssembleShader
    };
    let locations = connection_locations(cx, connection);
    cx.report_current(id, &[backend, active], locations);
}

/// Source end first, then the destination carrying the raw connection.
fn connection_locations(cx: &mut Context<'_>, connection: &Connection) -> Vec<Location> {
    let source = components::locate(cx, &connection.source);
    let destination = components::locate(cx, &connection.destination);
    vec![source, destination.with_connection(connection.clone())]
}
