//! Shader rules that only make sense for one backend. Dispatched on the
//! definition's source backend after generic conformance has run.

use super::components;
use super::log::{Location, Severity};
use super::messages::MessageId;
use super::state::Context;
use crate::query::{GraphQuery, PortRef};
use crate::registry::NodeDefinition;

// =============================================================================
// Native renderer
// =============================================================================

const NATIVE_IMAGE_FAMILY: &str = "image";
const NATIVE_UV_INPUT: &str = "uvcoords";
const NATIVE_READER_FAMILY_PREFIX: &str = "user_data";
const NATIVE_READER_NAME_INPUT: &str = "attribute";

// =============================================================================
// Portable (cross-renderer)
// =============================================================================

const PBR_SURFACE_FAMILIES: &[&str] = &["standard_surface", "open_pbr_surface"];

/// Anisotropy input → tangent input it needs.
const ANISOTROPY_TANGENTS: &[(&str, &str)] = &[
    ("specular_anisotropy", "tangent"),
    ("coat_anisotropy", "coat_tangent"),
    ("specular_roughness_anisotropy", "geometry_tangent"),
    ("coat_roughness_anisotropy", "geometry_coat_tangent"),
];

const SURFACE_COMBINER_FAMILY: &str = "surface";
const CLOSURE_INPUT_TYPES: &[&str] = &["BSDF", "EDF"];

/// Readers selecting a geometry stream by index instead of by name.
const INDEXED_STREAM_FAMILIES: &[&str] = &["texcoord", "tangent", "bitangent"];

pub(crate) fn check_shader(cx: &mut Context<'_>, node: &str, definition: &NodeDefinition) {
    let backend = definition.source_backend.as_str();
    if cx.config.is_native(backend) {
        check_native(cx, node, definition);
    } else if cx.config.is_portable(backend) {
        check_portable(cx, node, definition);
    }
}

fn check_native(cx: &mut Context<'_>, node: &str, definition: &NodeDefinition) {
    if definition.family == NATIVE_IMAGE_FAMILY && definition.input(NATIVE_UV_INPUT).is_some() {
        let uv = PortRef::input(node, NATIVE_UV_INPUT);
        if !cx.graph.is_connected(&uv) {
            let location = components::locate(cx, &uv);
            let severity = cx.capped(Severity::Warning);
            cx.report(severity, MessageId::RequiresUvReader, &[], vec![location]);
        }
    }

    if definition.family.starts_with(NATIVE_READER_FAMILY_PREFIX)
        && definition.input(NATIVE_READER_NAME_INPUT).is_some()
    {
        let varname = PortRef::input(node, NATIVE_READER_NAME_INPUT);
        if !cx.graph.is_connected(&varname) && !cx.graph.has_value(&varname) {
            let location = components::locate(cx, &varname);
            let severity = cx.capped(Severity::Warning);
            cx.report(severity, MessageId::VarnameUndefined, &[], vec![location]);
        }
    }
}

fn check_portable(cx: &mut Context<'_>, node: &str, definition: &NodeDefinition) {
    let family = definition.family.as_str();

    if PBR_SURFACE_FAMILIES.contains(&family) {
        check_anisotropy(cx, node, definition);
    }

    if family == SURFACE_COMBINER_FAMILY {
        for input in &definition.inputs {
            if !CLOSURE_INPUT_TYPES.contains(&input.type_name.as_str()) {
                continue;
            }
            let port = PortRef::input(node, input.name.as_str());
            if !cx.graph.is_connected(&port) {
                let location = components::locate(cx, &port);
                let severity = cx.capped(Severity::Error);
                cx.report(
                    severity,
                    MessageId::SurfaceMissingClosure,
                    &[input.name.as_str()],
                    vec![location],
                );
            }
        }
    }

    for input in &definition.inputs {
        let Some(reader) = input.default_geomprop.as_deref().and_then(reader_kind) else {
            continue;
        };
        let port = PortRef::input(node, input.name.as_str());
        if !cx.graph.is_connected(&port) {
            let location = components::locate(cx, &port);
            let severity = cx.capped(Severity::Warning);
            cx.report(
                severity,
                MessageId::RequiresGeometryReader,
                &[input.name.as_str(), reader],
                vec![location],
            );
        }
    }

    if INDEXED_STREAM_FAMILIES.contains(&family) {
        let severity = cx.capped(Severity::Warning);
        cx.report(
            severity,
            MessageId::IndexBasedStream,
            &[],
            vec![Location::node(node)],
        );
    }

    if let Some(replacement) = &definition.superseded_by {
        cx.report(
            Severity::Info,
            MessageId::SupersededDefinition,
            &[definition.id.as_str(), replacement.as_str()],
            vec![Location::node(node)],
        );
    }
}

fn check_anisotropy(cx: &mut Context<'_>, node: &str, definition: &NodeDefinition) {
    for (anisotropy, tangent) in ANISOTROPY_TANGENTS {
        if definition.input(anisotropy).is_none() || definition.input(tangent).is_none() {
            continue;
        }
        if !is_anisotropic(cx.graph, &PortRef::input(node, *anisotropy)) {
            continue;
        }
        let tangent = PortRef::input(node, *tangent);
        if !cx.graph.is_connected(&tangent) {
            let location = components::locate(cx, &tangent);
            let severity = cx.capped(Severity::Warning);
            cx.report(severity, MessageId::AnisotropyRequiresTangent, &[], vec![location]);
        }
    }
}

/// A connected anisotropy input counts as non-zero.
fn is_anisotropic(graph: &dyn GraphQuery, port: &PortRef) -> bool {
    graph.is_connected(port) || graph.float_value(port).is_some_and(|v| v != 0.0)
}

/// Reader kind for a default geometry stream; position and normal streams
/// are always available and need none.
fn reader_kind(geomprop: &str) -> Option<&'static str> {
    if geomprop.starts_with("UV") {
        Some("texcoord")
    } else if geomprop.starts_with('T') {
        Some("tangent")
    } else if geomprop.starts_with('B') {
        Some("bitangent")
    } else {
        None
    }
}
