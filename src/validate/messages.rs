//! Diagnostic message catalog.
//!
//! One template per [`MessageId`], indexed by discriminant. Parameters are
//! substituted positionally into `{0}` and `{1}`.
//! SYNC NOTE: `TEMPLATES` must list every `MessageId` in declaration order.

use serde::{Deserialize, Serialize};

pub const OUT_OF_SYNC: &str = "<message catalog out of sync>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum MessageId {
    // Node-level
    WrongChild,
    NotInsideCompound,
    MissingIdentifier,
    NotInRegistry,
    NotInNodeDefinition,
    DefinitionTypeMismatch,
    MaterialNotInScope,
    MaterialUnderConnectable,
    NotAShadingPrimitive,
    SupersededDefinition,
    // Connection-level
    ConnectionTypeMismatch,
    SourceCannotAssembleShader,
    SourceIncompatibleWithDestination,
    Cycle,
    ParentMismatch,
    // Attribute-level
    ConnectedToMissingNode,
    ConnectedToMissingAttribute,
    ConnectedToInvalidAttribute,
    RequiresUvReader,
    VarnameUndefined,
    AnisotropyRequiresTangent,
    SurfaceMissingClosure,
    RequiresGeometryReader,
    IndexBasedStream,
    BrokenComponent,
}

impl MessageId {
    pub const ALL: [MessageId; 25] = [
        MessageId::WrongChild,
        MessageId::NotInsideCompound,
        MessageId::MissingIdentifier,
        MessageId::NotInRegistry,
        MessageId::NotInNodeDefinition,
        MessageId::DefinitionTypeMismatch,
        MessageId::MaterialNotInScope,
        MessageId::MaterialUnderConnectable,
        MessageId::NotAShadingPrimitive,
        MessageId::SupersededDefinition,
        MessageId::ConnectionTypeMismatch,
        MessageId::SourceCannotAssembleShader,
        MessageId::SourceIncompatibleWithDestination,
        MessageId::Cycle,
        MessageId::ParentMismatch,
        MessageId::ConnectedToMissingNode,
        MessageId::ConnectedToMissingAttribute,
        MessageId::ConnectedToInvalidAttribute,
        MessageId::RequiresUvReader,
        MessageId::VarnameUndefined,
        MessageId::AnisotropyRequiresTangent,
        MessageId::SurfaceMissingClosure,
        MessageId::RequiresGeometryReader,
        MessageId::IndexBasedStream,
        MessageId::BrokenComponent,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MessageId::WrongChild => "N001",
            MessageId::NotInsideCompound => "N002",
            MessageId::MissingIdentifier => "N003",
            MessageId::NotInRegistry => "N004",
            MessageId::NotInNodeDefinition => "N005",
            MessageId::DefinitionTypeMismatch => "N006",
            MessageId::MaterialNotInScope => "N007",
            MessageId::MaterialUnderConnectable => "N008",
            MessageId::NotAShadingPrimitive => "N009",
            MessageId::SupersededDefinition => "N010",
            MessageId::ConnectionTypeMismatch => "C001",
            MessageId::SourceCannotAssembleShader => "C002",
            MessageId::SourceIncompatibleWithDestination => "C003",
            MessageId::Cycle => "C004",
            MessageId::ParentMismatch => "C005",
            MessageId::ConnectedToMissingNode => "A001",
            MessageId::ConnectedToMissingAttribute => "A002",
            MessageId::ConnectedToInvalidAttribute => "A003",
            MessageId::RequiresUvReader => "A004",
            MessageId::VarnameUndefined => "A005",
            MessageId::AnisotropyRequiresTangent => "A006",
            MessageId::SurfaceMissingClosure => "A007",
            MessageId::RequiresGeometryReader => "A008",
            MessageId::IndexBasedStream => "A009",
            MessageId::BrokenComponent => "A010",
        }
    }
}

struct Template {
    id: MessageId,
    arity: usize,
    text: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template {
        id: MessageId::WrongChild,
        arity: 1,
        text: "Node is not a descendant of material '{0}'.",
    },
    Template {
        id: MessageId::NotInsideCompound,
        arity: 0,
        text: "Node must be placed directly inside a material or a compound.",
    },
    Template {
        id: MessageId::MissingIdentifier,
        arity: 0,
        text: "Shader node has no identifier.",
    },
    Template {
        id: MessageId::NotInRegistry,
        arity: 1,
        text: "Identifier '{0}' is not registered in the node definition registry.",
    },
    Template {
        id: MessageId::NotInNodeDefinition,
        arity: 1,
        text: "Attribute '{0}' is not declared by the node definition.",
    },
    Template {
        id: MessageId::DefinitionTypeMismatch,
        arity: 2,
        text: "Attribute type '{0}' does not match node definition type '{1}'.",
    },
    Template {
        id: MessageId::MaterialNotInScope,
        arity: 0,
        text: "Material should be placed inside a scope.",
    },
    Template {
        id: MessageId::MaterialUnderConnectable,
        arity: 1,
        text: "Material cannot be nested under connectable node '{0}'.",
    },
    Template {
        id: MessageId::NotAShadingPrimitive,
        arity: 1,
        text: "Node of type '{0}' is not a shading primitive.",
    },
    Template {
        id: MessageId::SupersededDefinition,
        arity: 2,
        text: "Node definition '{0}' is superseded by '{1}'.",
    },
    Template {
        id: MessageId::ConnectionTypeMismatch,
        arity: 2,
        text: "Cannot connect source of type '{0}' to destination of type '{1}'.",
    },
    Template {
        id: MessageId::SourceCannotAssembleShader,
        arity: 2,
        text: "Source of type '{0}' cannot assemble a shader of type '{1}'.",
    },
    Template {
        id: MessageId::SourceIncompatibleWithDestination,
        arity: 2,
        text: "Source of type '{0}' cannot work with destination node of type '{1}'.",
    },
    Template {
        id: MessageId::Cycle,
        arity: 0,
        text: "Connection cycle detected.",
    },
    Template {
        id: MessageId::ParentMismatch,
        arity: 0,
        text: "Source and destination are not inside the same compound.",
    },
    Template {
        id: MessageId::ConnectedToMissingNode,
        arity: 1,
        text: "Connected to missing node '{0}'.",
    },
    Template {
        id: MessageId::ConnectedToMissingAttribute,
        arity: 1,
        text: "Connected to missing attribute '{0}'.",
    },
    Template {
        id: MessageId::ConnectedToInvalidAttribute,
        arity: 1,
        text: "Connected to invalid attribute '{0}'.",
    },
    Template {
        id: MessageId::RequiresUvReader,
        arity: 0,
        text: "Image node requires a UV reader connected to its texture coordinates.",
    },
    Template {
        id: MessageId::VarnameUndefined,
        arity: 0,
        text: "Attribute reader has no variable name defined.",
    },
    Template {
        id: MessageId::AnisotropyRequiresTangent,
        arity: 0,
        text: "Anisotropic surface requires a connected tangent input.",
    },
    Template {
        id: MessageId::SurfaceMissingClosure,
        arity: 1,
        text: "Surface combiner requires a connected '{0}' input.",
    },
    Template {
        id: MessageId::RequiresGeometryReader,
        arity: 2,
        text: "Input '{0}' requires a connected {1} reader.",
    },
    Template {
        id: MessageId::IndexBasedStream,
        arity: 0,
        text: "Index-based geometry stream selection has limited portability; use a named stream reader.",
    },
    Template {
        id: MessageId::BrokenComponent,
        arity: 1,
        text: "Component connection setup on '{0}' is broken.",
    },
];

/// Render the template for `id` with positional `params`.
pub fn render(id: MessageId, params: &[&str]) -> String {
    let Some(template) = TEMPLATES.get(id as usize) else {
        return OUT_OF_SYNC.to_string();
    };

    if cfg!(debug_assertions) && (template.id != id || template.arity != params.len()) {
        tracing::error!(
            ?id,
            expected_arity = template.arity,
            given = params.len(),
            "message catalog out of sync"
        );
        return OUT_OF_SYNC.to_string();
    }

    substitute(template.text, params)
}

/// Replace `{0}`/`{1}` in one pass, so parameter text is never rescanned.
fn substitute(text: &str, params: &[&str]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let param = tail
            .get(1..2)
            .and_then(|digit| digit.parse::<usize>().ok())
            .filter(|_| tail.get(2..3) == Some("}"))
            .and_then(|i| params.get(i));
        match param {
            Some(param) => {
                out.push_str(param);
                rest = &tail[3..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
