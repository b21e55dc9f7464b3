//! Per-node conformance, memoized by node path.
//! SYNC NOTE: Match arms here must track `NodeKind` in `src/query.rs`.

use super::backend_rules;
use super::components;
use super::log::{Location, Severity};
use super::messages::MessageId;
use super::state::Context;
use super::types::types_agree;
use crate::query::{Direction, NodeKind, PortRef};

/// Check a node once and return whether it is well-formed. Later calls
/// return the cached result without reporting again.
pub(crate) fn validated_node(cx: &mut Context<'_>, node: &str) -> bool {
    if let Some(&well_formed) = cx.state.validated_nodes.get(node) {
        return well_formed;
    }
    // Provisional entry so that location remapping during the checks
    // cannot re-enter this node.
    cx.state.validated_nodes.insert(node.to_string(), true);
    let well_formed = check_node(cx, node);
    cx.state.validated_nodes.insert(node.to_string(), well_formed);
    well_formed
}

fn check_node(cx: &mut Context<'_>, node: &str) -> bool {
    let mut well_formed = true;

    if node != cx.material && !is_descendant_of_material(cx, node) {
        let material = cx.material.clone();
        cx.report_current(
            MessageId::WrongChild,
            &[material.as_str()],
            vec![Location::node(node)],
        );
        well_formed = false;
    }

    match cx.graph.kind(node) {
        None => return false,
        Some(NodeKind::Shader) => {
            well_formed &= check_shader(cx, node);
        }
        Some(NodeKind::Material) => {
            well_formed &= check_material(cx, node);
        }
        Some(NodeKind::Container) => {
            well_formed &= check_inside_compound(cx, node);
        }
        Some(NodeKind::Other(schema)) => {
            if !cx.config.annotation_types.contains(&schema) {
                cx.report_current(
                    MessageId::NotAShadingPrimitive,
                    &[schema.as_str()],
                    vec![Location::node(node)],
                );
                well_formed = false;
            }
        }
    }

    well_formed
}

fn is_descendant_of_material(cx: &Context<'_>, node: &str) -> bool {
    let mut current = cx.graph.parent(node);
    while let Some(parent) = current {
        if parent == cx.material {
            return true;
        }
        current = cx.graph.parent(&parent);
    }
    false
}

fn check_inside_compound(cx: &mut Context<'_>, node: &str) -> bool {
    let parent_kind = cx.graph.parent(node).and_then(|p| cx.graph.kind(&p));
    if parent_kind.is_some_and(|k| k.is_container_like()) {
        return true;
    }
    cx.report_current(
        MessageId::NotInsideCompound,
        &[],
        vec![Location::node(node)],
    );
    false
}

fn check_shader(cx: &mut Context<'_>, node: &str) -> bool {
    let mut well_formed = check_inside_compound(cx, node);

    let type_id = cx.graph.type_id(node).unwrap_or_default();
    if type_id.is_empty() {
        cx.report_current(MessageId::MissingIdentifier, &[], vec![Location::node(node)]);
        return false;
    }
    let registry = cx.registry;
    let Some(definition) = registry.lookup(&type_id) else {
        cx.report_current(
            MessageId::NotInRegistry,
            &[type_id.as_str()],
            vec![Location::node(node)],
        );
        return false;
    };

    for direction in [Direction::Input, Direction::Output] {
        for name in cx.graph.ports(node, direction) {
            let port = PortRef {
                node: node.to_string(),
                direction,
                name,
            };
            let declared = match direction {
                Direction::Input => definition.input(&port.name),
                Direction::Output => definition.output(&port.name),
            };
            let Some(declared) = declared else {
                let location = components::locate(cx, &port);
                cx.report_current(
                    MessageId::NotInNodeDefinition,
                    &[port.name.as_str()],
                    vec![location],
                );
                well_formed = false;
                continue;
            };
            let actual = cx.graph.declared_type(&port).unwrap_or_default();
            if !types_agree(cx.config, &actual, &declared.type_name) {
                let location = components::locate(cx, &port);
                cx.report_current(
                    MessageId::DefinitionTypeMismatch,
                    &[actual.as_str(), declared.type_name.as_str()],
                    vec![location],
                );
                well_formed = false;
            }
        }
    }

    components::check_companion(cx, node);
    if well_formed {
        backend_rules::check_shader(cx, node, definition);
    }

    well_formed
}

/// Materials carry fixed-severity rules: an advisory about the parent and a
/// hard error for every connectable ancestor.
fn check_material(cx: &mut Context<'_>, node: &str) -> bool {
    let mut well_formed = true;

    let mut connectable_ancestors = Vec::new();
    let mut current = cx.graph.parent(node);
    while let Some(ancestor) = current {
        if cx.graph.kind(&ancestor).is_some_and(|k| k.is_connectable()) {
            connectable_ancestors.push(ancestor.clone());
        }
        current = cx.graph.parent(&ancestor);
    }

    if let Some(parent) = cx.graph.parent(node) {
        let grouping = match cx.graph.kind(&parent) {
            Some(NodeKind::Other(schema)) => cx.config.grouping_types.contains(&schema),
            _ => false,
        };
        if !grouping && !connectable_ancestors.contains(&parent) {
            cx.report(
                Severity::Info,
                MessageId::MaterialNotInScope,
                &[],
                vec![Location::node(node)],
            );
        }
    }

    for ancestor in connectable_ancestors {
        cx.report(
            Severity::Error,
            MessageId::MaterialUnderConnectable,
            &[ancestor.as_str()],
            vec![Location::node(node)],
        );
        well_formed = false;
    }

    well_formed
}
