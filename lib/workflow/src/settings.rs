//! Editor settings.
//!
//! Policy knobs for the editing engine. Loaded by the embedding application
//! (see the CLI's `config`-based loader); every field has a default.

use serde::Deserialize;

/// What to do with config keys a node type does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Accept the payload and drop undeclared keys.
    #[default]
    Ignore,
    /// Fail with `UnknownConfigField`.
    Reject,
}

/// Settings for a [`FlowEditor`](crate::FlowEditor).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditorSettings {
    /// Policy for undeclared config keys.
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,

    /// Whether an edge may leave and enter the same node.
    #[serde(default)]
    pub allow_self_loops: bool,

    /// Appended to the label of a duplicated node.
    #[serde(default = "default_copy_label_suffix")]
    pub copy_label_suffix: String,
}

fn default_copy_label_suffix() -> String {
    " (copy)".to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::default(),
            allow_self_loops: false,
            copy_label_suffix: default_copy_label_suffix(),
        }
    }
}
