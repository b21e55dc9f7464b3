//! Rule tuning shared by every validation call.

use serde::{Deserialize, Serialize};

/// Names and tags the rules key on. Loaded from a document's `settings`
/// object; every field falls back to its default when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleConfig {
    /// Base names of material outputs that start Phase 1.
    pub terminal_outputs: Vec<String>,
    /// Family assumed for unqualified terminal outputs.
    pub fallback_family: String,
    /// Cross-renderer family: strict declared-type equality.
    pub portable_family: String,
    /// Renderer-native family: representation-level type equality.
    pub native_family: String,
    /// Non-connectable schemas allowed inside a material.
    pub annotation_types: Vec<String>,
    /// Schemas a material may sit under without an advisory.
    pub grouping_types: Vec<String>,
    /// Port types that match any declared type.
    pub generic_types: Vec<String>,
    pub hidden_flag: String,
    /// Set by the preview/isolate feature on nodes it temporarily rewires.
    pub transient_override_flag: String,
    pub pack_family_prefix: String,
    pub unpack_family_prefix: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            terminal_outputs: vec![
                "surface".into(),
                "displacement".into(),
                "volume".into(),
            ],
            fallback_family: "glslfx".into(),
            portable_family: "mtlx".into(),
            native_family: "arnold".into(),
            annotation_types: vec!["Backdrop".into()],
            grouping_types: vec!["Scope".into()],
            generic_types: vec!["string".into(), "token".into()],
            hidden_flag: "hidden".into(),
            transient_override_flag: "isolateOverride".into(),
            pack_family_prefix: "combine".into(),
            unpack_family_prefix: "separate".into(),
        }
    }
}

impl RuleConfig {
    pub fn is_terminal_output(&self, base_name: &str) -> bool {
        self.terminal_outputs.iter().any(|t| t == base_name)
    }

    pub fn is_portable(&self, family: &str) -> bool {
        family == self.portable_family
    }

    pub fn is_native(&self, family: &str) -> bool {
        family == self.native_family
    }
}
