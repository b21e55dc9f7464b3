//! Port type comparison.
//!
//! All generic-type leniency goes through [`types_agree`].

use crate::config::RuleConfig;

/// Storage category shared by nominally different types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Representation {
    Bool,
    Int,
    Float(u8),
    Matrix(u8),
    Text,
    Closure,
    Named(String),
}

pub fn representation(type_name: &str) -> Representation {
    match type_name {
        "bool" | "boolean" => Representation::Bool,
        "int" | "integer" => Representation::Int,
        "float" | "half" | "double" => Representation::Float(1),
        "float2" | "vector2" | "texcoord2" | "half2" => Representation::Float(2),
        "float3" | "vector3" | "color3" | "normal3" | "point3" | "color" | "vector" | "rgb"
        | "half3" => Representation::Float(3),
        "float4" | "vector4" | "color4" | "rgba" | "half4" => Representation::Float(4),
        "matrix33" => Representation::Matrix(3),
        "matrix44" | "matrix" => Representation::Matrix(4),
        "string" | "token" | "filename" | "asset" => Representation::Text,
        "BSDF" | "EDF" | "VDF" | "surfaceshader" | "displacementshader" | "volumeshader"
        | "closure" => Representation::Closure,
        other => Representation::Named(other.to_string()),
    }
}

pub fn is_generic(config: &RuleConfig, type_name: &str) -> bool {
    config.generic_types.iter().any(|t| t == type_name)
}

/// Declared-type equality, tolerating a generic type on either side.
pub fn types_agree(config: &RuleConfig, actual: &str, expected: &str) -> bool {
    actual == expected || is_generic(config, actual) || is_generic(config, expected)
}

/// Representation equality for renderer-native connections.
pub fn representations_agree(config: &RuleConfig, source: &str, destination: &str) -> bool {
    types_agree(config, source, destination) || representation(source) == representation(destination)
}

/// Channel names for a packed type: `rgba` for colors, `xyzw` otherwise.
pub fn component_letters(type_name: &str) -> &'static [&'static str] {
    if type_name.starts_with("color") || type_name == "rgb" || type_name == "rgba" {
        &["r", "g", "b", "a"]
    } else {
        &["x", "y", "z", "w"]
    }
}
