use serde_json::{Value, json};
use shadenet::validate::{self, Entry, MessageId, ValidationLog};

// =============================================================================
// Document builders
// =============================================================================

/// Assemble a document JSON string. The first material node is validated.
pub fn document(definitions: Vec<Value>, nodes: Vec<Value>) -> String {
    json!({ "definitions": definitions, "nodes": nodes }).to_string()
}

/// `/Looks` scope plus the `/Looks/Mat` material with the given outputs.
pub fn looks(outputs: Vec<Value>) -> Vec<Value> {
    vec![
        prim("/Looks", "Scope"),
        json!({ "path": "/Looks/Mat", "schema": "Material", "outputs": outputs }),
    ]
}

pub fn prim(path: &str, schema: &str) -> Value {
    json!({ "path": path, "schema": schema })
}

pub fn material(path: &str, outputs: Vec<Value>) -> Value {
    json!({ "path": path, "schema": "Material", "outputs": outputs })
}

pub fn node_graph(path: &str, inputs: Vec<Value>, outputs: Vec<Value>) -> Value {
    json!({ "path": path, "schema": "NodeGraph", "inputs": inputs, "outputs": outputs })
}

pub fn shader(path: &str, id: &str, inputs: Vec<Value>, outputs: Vec<Value>) -> Value {
    json!({ "path": path, "schema": "Shader", "id": id, "inputs": inputs, "outputs": outputs })
}

/// Set a boolean flag (`hidden`, `isolateOverride`, ...) on a node.
pub fn flagged(mut node: Value, flag: &str) -> Value {
    node["flags"][flag] = Value::Bool(true);
    node
}

// =============================================================================
// Port builders
// =============================================================================

pub fn port(name: &str, ty: &str) -> Value {
    json!({ "name": name, "type": ty })
}

pub fn wired(name: &str, ty: &str, sources: &[&str]) -> Value {
    json!({ "name": name, "type": ty, "connections": sources })
}

pub fn valued(name: &str, ty: &str, value: Value) -> Value {
    json!({ "name": name, "type": ty, "value": value })
}

// =============================================================================
// Definition builders
// =============================================================================

pub fn definition(
    id: &str,
    family: &str,
    backend: &str,
    inputs: &[(&str, &str)],
    outputs: &[(&str, &str)],
) -> Value {
    let ports = |list: &[(&str, &str)]| -> Vec<Value> {
        list.iter().map(|(name, ty)| port(name, ty)).collect()
    };
    json!({
        "id": id,
        "family": family,
        "sourceBackend": backend,
        "inputs": ports(inputs),
        "outputs": ports(outputs),
    })
}

pub fn standard_surface(backend: &str) -> Value {
    definition(
        &format!("ND_standard_surface_{}", backend),
        "standard_surface",
        backend,
        &[
            ("base_color", "color3"),
            ("metalness", "float"),
            ("specular_anisotropy", "float"),
            ("tangent", "vector3"),
        ],
        &[("out", "surfaceshader")],
    )
}

pub fn constant(backend: &str, ty: &str) -> Value {
    definition(
        &format!("ND_constant_{}_{}", ty, backend),
        "constant",
        backend,
        &[("value", ty)],
        &[("out", ty)],
    )
}

pub fn add_color3() -> Value {
    definition(
        "ND_add_color3",
        "add",
        "mtlx",
        &[("in1", "color3"), ("in2", "color3")],
        &[("out", "color3")],
    )
}

// =============================================================================
// Running and inspecting
// =============================================================================

pub fn run(json: &str) -> ValidationLog {
    validate::validate_document(json).expect("document should load")
}

pub fn codes(log: &ValidationLog) -> Vec<&'static str> {
    log.iter().map(Entry::code).collect()
}

/// The only entry with `id`, failing with the whole log otherwise.
pub fn single(log: &ValidationLog, id: MessageId) -> &Entry {
    let found = log.with_id(id);
    assert_eq!(found.len(), 1, "expected one {:?} entry, got:\n{}", id, log);
    found[0]
}
