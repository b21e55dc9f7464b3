//! Pack/unpack component nodes.
//!
//! Hidden `combine*` nodes pack scalar channels into one vector or color and
//! hidden `separate*` nodes split one apart. Users never see them, so any
//! location on one of their ports is rewritten to the visible port it stands
//! for, carrying the channel letter (`r`, `g`, `x`, ...): a pack input to the
//! port feeding it, an unpack output to the port feeding the unpack node.

use tracing::debug;

use super::log::Location;
use super::messages::MessageId;
use super::state::Context;
use super::types::component_letters;
use crate::query::{Direction, PortRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComponentRole {
    Pack,
    Unpack,
}

pub(crate) fn role(cx: &Context<'_>, node: &str) -> Option<ComponentRole> {
    if !cx.graph.custom_flag(node, &cx.config.hidden_flag) {
        return None;
    }
    let definition = cx.definition(node)?;
    if definition.family.starts_with(&cx.config.pack_family_prefix) {
        Some(ComponentRole::Pack)
    } else if definition.family.starts_with(&cx.config.unpack_family_prefix) {
        Some(ComponentRole::Unpack)
    } else {
        None
    }
}

/// User-facing location of a port.
pub(crate) fn locate(cx: &mut Context<'_>, port: &PortRef) -> Location {
    match role(cx, &port.node) {
        None => Location::port(port),
        Some(ComponentRole::Pack) => locate_pack_port(cx, port),
        Some(ComponentRole::Unpack) => locate_unpack_port(cx, port),
    }
}

/// Report a component node whose companion connection cannot be resolved.
pub(crate) fn check_companion(cx: &mut Context<'_>, node: &str) {
    match role(cx, node) {
        Some(ComponentRole::Pack) => {
            if !cx.state.pending_pack_connections.contains_key(node) {
                let port = pack_output(cx, node);
                report_broken(cx, &port);
            }
        }
        Some(ComponentRole::Unpack) => {
            if unpack_source(cx, node).is_none() {
                let port = unpack_input(cx, node);
                report_broken(cx, &port);
            }
        }
        None => {}
    }
}

fn locate_pack_port(cx: &mut Context<'_>, port: &PortRef) -> Location {
    let output = pack_output(cx, &port.node);

    if port.direction == Direction::Output {
        // The packed value as a whole stands for the visible port it feeds.
        let Some(feeds) = cx.state.pending_pack_connections.get(&port.node).cloned() else {
            report_broken(cx, &output);
            return Location::port(port);
        };
        return Location::port(&feeds.destination);
    }

    let Some(source) = cx.graph.upstream_sources(port).sources.into_iter().next() else {
        report_broken(cx, port);
        return Location::port(port);
    };
    let location = Location::port(&source);
    let packed_type = cx.graph.declared_type(&output).unwrap_or_default();
    match channel(cx, port, &packed_type) {
        Some(letter) => location.with_component(letter),
        None => location,
    }
}

fn locate_unpack_port(cx: &mut Context<'_>, port: &PortRef) -> Location {
    let Some(source) = unpack_source(cx, &port.node) else {
        let input = unpack_input(cx, &port.node);
        report_broken(cx, &input);
        return Location::port(port);
    };

    let location = Location::port(&source);
    if port.direction != Direction::Output {
        return location;
    }
    let input = unpack_input(cx, &port.node);
    let unpacked_type = cx.graph.declared_type(&input).unwrap_or_default();
    match channel(cx, port, &unpacked_type) {
        Some(letter) => location.with_component(letter),
        None => location,
    }
}

/// Letter for the port's position among the node's ports of its direction.
fn channel(cx: &Context<'_>, port: &PortRef, packed_type: &str) -> Option<&'static str> {
    let index = cx
        .graph
        .ports(&port.node, port.direction)
        .iter()
        .position(|name| *name == port.name)?;
    component_letters(packed_type).get(index).copied()
}

/// The single live source feeding an unpack node's input.
fn unpack_source(cx: &Context<'_>, node: &str) -> Option<PortRef> {
    let input = unpack_input(cx, node);
    let mut sources = cx.graph.upstream_sources(&input).sources;
    if sources.len() != 1 {
        return None;
    }
    sources.pop()
}

fn unpack_input(cx: &Context<'_>, node: &str) -> PortRef {
    let name = first_port(cx, node, Direction::Input).unwrap_or_else(|| "in".to_string());
    PortRef::input(node, name)
}

fn pack_output(cx: &Context<'_>, node: &str) -> PortRef {
    let name = first_port(cx, node, Direction::Output).unwrap_or_else(|| "out".to_string());
    PortRef::output(node, name)
}

fn first_port(cx: &Context<'_>, node: &str, direction: Direction) -> Option<String> {
    if let Some(name) = cx.graph.ports(node, direction).into_iter().next() {
        return Some(name);
    }
    let definition = cx.definition(node)?;
    let ports = match direction {
        Direction::Input => &definition.inputs,
        Direction::Output => &definition.outputs,
    };
    ports.first().map(|p| p.name.clone())
}

/// One report per `(node, port)`, however many call sites hit it.
fn report_broken(cx: &mut Context<'_>, port: &PortRef) {
    let key = (port.node.clone(), port.name.clone());
    if !cx.state.broken_components_seen.insert(key) {
        return;
    }
    debug!(%port, "broken component setup");
    cx.report_current(
        MessageId::BrokenComponent,
        &[port.node.as_str()],
        vec![Location::port(port)],
    );
}
