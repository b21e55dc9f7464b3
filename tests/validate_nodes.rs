//! Integration tests for per-node conformance, material placement and
//! backend-specific shader rules.

mod helpers;

use helpers::*;
use serde_json::{Value, json};
use shadenet::validate::{MessageId, Severity};

fn mtlx_terminal() -> Vec<Value> {
    vec![wired("mtlx:surface", "token", &["/Looks/Mat/Surface.outputs:out"])]
}

// =============================================================================
// Materials
// =============================================================================

#[test]
fn material_under_scope_passes() {
    let log = run(&document(vec![], looks(vec![])));
    assert!(log.is_empty(), "{}", log);
}

#[test]
fn material_outside_scope_is_advisory() {
    let nodes = vec![prim("/World", "Xform"), material("/World/Mat", vec![])];
    let log = run(&document(vec![], nodes));

    let entry = single(&log, MessageId::MaterialNotInScope);
    assert_eq!(entry.severity, Severity::Info);
    assert!(!log.has_errors());
}

#[test]
fn material_nested_in_connectables_is_an_error_per_ancestor() {
    let json = json!({
        "material": "/Looks/Outer/Graph/Inner",
        "nodes": [
            { "path": "/Looks", "schema": "Scope" },
            { "path": "/Looks/Outer", "schema": "Material" },
            { "path": "/Looks/Outer/Graph", "schema": "NodeGraph" },
            { "path": "/Looks/Outer/Graph/Inner", "schema": "Material" }
        ]
    })
    .to_string();
    let log = run(&json);

    let found = log.with_id(MessageId::MaterialUnderConnectable);
    let ancestors: Vec<&str> = found.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        ancestors,
        vec![
            "Material cannot be nested under connectable node '/Looks/Outer/Graph'.",
            "Material cannot be nested under connectable node '/Looks/Outer'.",
        ]
    );
    assert!(found.iter().all(|e| e.severity == Severity::Error));
    assert!(log.with_id(MessageId::MaterialNotInScope).is_empty());
}

// =============================================================================
// Node conformance
// =============================================================================

#[test]
fn annotations_are_allowed_but_other_prims_are_not() {
    let mut nodes = looks(vec![]);
    nodes.push(prim("/Looks/Mat/Note", "Backdrop"));
    nodes.push(prim("/Looks/Mat/Ball", "Sphere"));
    let log = run(&document(vec![], nodes));

    let entry = single(&log, MessageId::NotAShadingPrimitive);
    assert_eq!(entry.message, "Node of type 'Sphere' is not a shading primitive.");
    assert_eq!(entry.locations[0].node, "/Looks/Mat/Ball");
    assert_eq!(log.len(), 1);
}

#[test]
fn shader_must_sit_in_material_or_compound() {
    let mut nodes = looks(vec![]);
    nodes.push(prim("/Looks/Mat/Group", "Scope"));
    nodes.push(shader(
        "/Looks/Mat/Group/Tex",
        "ND_constant_color3_mtlx",
        vec![],
        vec![port("out", "color3")],
    ));
    let log = run(&document(vec![constant("mtlx", "color3")], nodes));

    assert_eq!(codes(&log), vec!["N009", "N002"], "{}", log);
    assert!(log.iter().all(|e| e.severity == Severity::Warning));
}

#[test]
fn compound_must_sit_in_material_or_compound() {
    let mut nodes = looks(vec![]);
    nodes.push(prim("/Looks/Mat/Group", "Backdrop"));
    nodes.push(node_graph("/Looks/Mat/Group/Graph", vec![], vec![]));
    let log = run(&document(vec![], nodes));

    let entry = single(&log, MessageId::NotInsideCompound);
    assert_eq!(entry.locations[0].node, "/Looks/Mat/Group/Graph");
}

#[test]
fn shader_without_identifier_stops_checking() {
    let mut nodes = looks(mtlx_terminal());
    nodes.push(json!({
        "path": "/Looks/Mat/Surface",
        "schema": "Shader",
        "inputs": [{ "name": "bogus", "type": "float" }],
        "outputs": [{ "name": "out", "type": "surfaceshader" }]
    }));
    let log = run(&document(vec![], nodes));

    assert_eq!(codes(&log), vec!["N003"], "{}", log);
    assert_eq!(log.entries()[0].severity, Severity::Error);
}

#[test]
fn ports_are_checked_against_definition() {
    let mut nodes = looks(mtlx_terminal());
    nodes.push(shader(
        "/Looks/Mat/Surface",
        "ND_standard_surface_mtlx",
        vec![
            port("base_color", "float"),
            port("sheen", "float"),
            port("metalness", "token"),
        ],
        vec![port("out", "surfaceshader")],
    ));
    let log = run(&document(vec![standard_surface("mtlx")], nodes));

    assert_eq!(codes(&log), vec!["N006", "N005"], "{}", log);
    assert_eq!(
        log.entries()[0].message,
        "Attribute type 'float' does not match node definition type 'color3'."
    );
    assert_eq!(
        log.entries()[1].locations[0].port.as_deref(),
        Some("inputs:sheen")
    );
}

#[test]
fn nonconformant_source_skips_family_rule() {
    let mut nodes = looks(mtlx_terminal());
    nodes.push(shader(
        "/Looks/Mat/Surface",
        "ND_standard_surface_mtlx",
        vec![wired("base_color", "color3", &["/Looks/Mat/Noise.outputs:out"])],
        vec![port("out", "surfaceshader")],
    ));
    nodes.push(shader(
        "/Looks/Mat/Noise",
        "noise",
        vec![port("octaves", "int")],
        vec![port("out", "color3")],
    ));
    let log = run(&document(
        vec![
            standard_surface("mtlx"),
            definition("noise", "noise", "arnold", &[], &[("out", "color3")]),
        ],
        nodes,
    ));

    assert_eq!(codes(&log), vec!["N005"], "{}", log);
}

// =============================================================================
// Native backend rules
// =============================================================================

#[test]
fn native_image_needs_uv_reader() {
    let log = run(include_str!("fixtures/wood_arnold.json"));
    let entry = single(&log, MessageId::RequiresUvReader);
    assert_eq!(entry.severity, Severity::Warning);
    assert_eq!(entry.locations[0].node, "/Looks/Wood/Grain");
    assert_eq!(entry.locations[0].port.as_deref(), Some("inputs:uvcoords"));
}

fn user_data(attribute: Value) -> String {
    let nodes = vec![
        prim("/Looks", "Scope"),
        material("/Looks/Mat", vec![]),
        shader("/Looks/Mat/Cd", "user_data_rgb", vec![attribute], vec![port("out", "color3")]),
    ];
    document(
        vec![definition(
            "user_data_rgb",
            "user_data_rgb",
            "arnold",
            &[("attribute", "string")],
            &[("out", "color3")],
        )],
        nodes,
    )
}

#[test]
fn attribute_reader_needs_variable_name() {
    let log = run(&user_data(port("attribute", "string")));
    assert_eq!(codes(&log), vec!["A005"], "{}", log);
    assert_eq!(log.entries()[0].severity, Severity::Warning);

    let log = run(&user_data(valued("attribute", "string", json!("Cd"))));
    assert!(log.is_empty(), "{}", log);
}

// =============================================================================
// Portable backend rules
// =============================================================================

fn anisotropic_surface(anisotropy: f64) -> String {
    let mut nodes = looks(mtlx_terminal());
    nodes.push(shader(
        "/Looks/Mat/Surface",
        "ND_standard_surface_mtlx",
        vec![valued("specular_anisotropy", "float", json!(anisotropy))],
        vec![port("out", "surfaceshader")],
    ));
    document(vec![standard_surface("mtlx")], nodes)
}

#[test]
fn anisotropy_requires_tangent() {
    let log = run(&anisotropic_surface(0.6));
    let entry = single(&log, MessageId::AnisotropyRequiresTangent);
    assert_eq!(entry.severity, Severity::Warning);
    assert_eq!(entry.locations[0].port.as_deref(), Some("inputs:tangent"));

    let log = run(&anisotropic_surface(0.0));
    assert!(log.is_empty(), "{}", log);
}

fn surface_combiner(bsdf: Vec<Value>) -> String {
    let mut nodes = looks(mtlx_terminal());
    nodes.push(shader(
        "/Looks/Mat/Surface",
        "ND_surface",
        bsdf,
        vec![port("out", "surfaceshader")],
    ));
    nodes.push(shader(
        "/Looks/Mat/Diffuse",
        "ND_oren_nayar_diffuse_bsdf",
        vec![],
        vec![port("out", "BSDF")],
    ));
    document(
        vec![
            definition(
                "ND_surface",
                "surface",
                "mtlx",
                &[("bsdf", "BSDF"), ("edf", "EDF"), ("opacity", "float")],
                &[("out", "surfaceshader")],
            ),
            definition(
                "ND_oren_nayar_diffuse_bsdf",
                "oren_nayar_diffuse_bsdf",
                "mtlx",
                &[],
                &[("out", "BSDF")],
            ),
        ],
        nodes,
    )
}

#[test]
fn surface_combiner_requires_closures() {
    let log = run(&surface_combiner(vec![]));
    let found = log.with_id(MessageId::SurfaceMissingClosure);
    let messages: Vec<&str> = found.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Surface combiner requires a connected 'bsdf' input.",
            "Surface combiner requires a connected 'edf' input.",
        ]
    );
    assert!(found.iter().all(|e| e.severity == Severity::Error));

    let log = run(&surface_combiner(vec![wired(
        "bsdf",
        "BSDF",
        &["/Looks/Mat/Diffuse.outputs:out"],
    )]));
    assert_eq!(codes(&log), vec!["A007"], "{}", log);
}

#[test]
fn unreached_surface_combiner_is_capped_to_warning() {
    let json = surface_combiner(vec![]).replace("mtlx:surface", "mtlx:unused");
    let log = run(&json);
    assert!(!log.has_errors(), "{}", log);
    assert_eq!(log.with_id(MessageId::SurfaceMissingClosure).len(), 2);
}

fn geometry_readers() -> Vec<Value> {
    let mut image = definition(
        "ND_image_color3",
        "image",
        "mtlx",
        &[("file", "filename"), ("texcoord", "vector2")],
        &[("out", "color3")],
    );
    image["inputs"][1]["defaultGeomprop"] = json!("UV0");
    vec![
        image,
        definition(
            "ND_texcoord_vector2",
            "texcoord",
            "mtlx",
            &[("index", "integer")],
            &[("out", "vector2")],
        ),
    ]
}

#[test]
fn default_stream_requires_reader() {
    let mut nodes = looks(vec![]);
    nodes.push(shader(
        "/Looks/Mat/Tex",
        "ND_image_color3",
        vec![valued("file", "filename", json!("albedo.png"))],
        vec![port("out", "color3")],
    ));
    let log = run(&document(geometry_readers(), nodes));

    let entry = single(&log, MessageId::RequiresGeometryReader);
    assert_eq!(entry.message, "Input 'texcoord' requires a connected texcoord reader.");
    assert_eq!(entry.severity, Severity::Warning);
}

#[test]
fn index_based_reader_is_discouraged() {
    let mut nodes = looks(vec![]);
    nodes.push(shader(
        "/Looks/Mat/Tex",
        "ND_image_color3",
        vec![wired("texcoord", "vector2", &["/Looks/Mat/UV.outputs:out"])],
        vec![port("out", "color3")],
    ));
    nodes.push(shader("/Looks/Mat/UV", "ND_texcoord_vector2", vec![], vec![port("out", "vector2")]));
    let log = run(&document(geometry_readers(), nodes));

    assert_eq!(codes(&log), vec!["A009"], "{}", log);
    assert_eq!(log.entries()[0].locations[0].node, "/Looks/Mat/UV");
}

#[test]
fn superseded_definition_is_informational() {
    let mut legacy = standard_surface("mtlx");
    legacy["supersededBy"] = json!("ND_open_pbr_surface_surfaceshader");
    let mut nodes = looks(mtlx_terminal());
    nodes.push(shader(
        "/Looks/Mat/Surface",
        "ND_standard_surface_mtlx",
        vec![],
        vec![port("out", "surfaceshader")],
    ));
    let log = run(&document(vec![legacy], nodes));

    let entry = single(&log, MessageId::SupersededDefinition);
    assert_eq!(entry.severity, Severity::Info);
    assert_eq!(
        entry.message,
        "Node definition 'ND_standard_surface_mtlx' is superseded by 'ND_open_pbr_surface_surfaceshader'."
    );
    assert!(!log.has_errors());
}
