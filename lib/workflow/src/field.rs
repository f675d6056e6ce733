//! Config field kinds and per-node-type config schemas.
//!
//! Every node type exposes a fixed set of named, typed config slots. A
//! [`FieldKind`] knows how to check and normalize a value for its slot;
//! nothing else in the crate branches on field kinds.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};

/// The config payload and stored config of a node: field name to value.
///
/// Keys are kept sorted, which makes encoded flow definitions deterministic.
pub type ConfigMap = serde_json::Map<String, JsonValue>;

/// The kind of value a config field accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Free-form text that may span lines.
    MultilineText,
    /// A finite number. Numeric strings are accepted and normalized.
    Number,
    /// One of a fixed list of string options.
    Enum {
        /// The allowed values, in presentation order.
        options: Vec<String>,
    },
}

impl FieldKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::MultilineText => "multiline_text",
            Self::Number => "number",
            Self::Enum { .. } => "enum",
        }
    }

    /// Checks a value against this kind and returns the value to store.
    ///
    /// Returns `None` when the value has the wrong kind.
    #[must_use]
    pub fn coerce(&self, value: &JsonValue) -> Option<JsonValue> {
        match self {
            Self::Text => value
                .as_str()
                .filter(|s| !s.contains(['\n', '\r']))
                .map(|s| JsonValue::String(s.to_string())),
            Self::MultilineText => value.as_str().map(|s| JsonValue::String(s.to_string())),
            Self::Number => coerce_number(value),
            Self::Enum { options } => value
                .as_str()
                .filter(|s| options.iter().any(|o| o.as_str() == *s))
                .map(|s| JsonValue::String(s.to_string())),
        }
    }
}

fn coerce_number(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(n) => Some(JsonValue::Number(n.clone())),
        JsonValue::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                return Some(JsonValue::Number(n.into()));
            }
            if let Ok(n) = s.parse::<u64>() {
                return Some(JsonValue::Number(n.into()));
            }
            let parsed: f64 = s.parse().ok()?;
            // Integral values stay integers so "30.0" encodes as 30.
            if parsed.fract() == 0.0 && parsed.abs() < 9.0e15 {
                return Some(JsonValue::Number(Number::from(parsed as i64)));
            }
            Number::from_f64(parsed).map(JsonValue::Number)
        }
        _ => None,
    }
}

/// A named config slot on a node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The key used in the config map.
    pub name: String,
    /// Human-readable label for editing surfaces.
    pub label: String,
    /// The kind of value the field accepts.
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDefinition {
    /// Creates a field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }

    /// Creates a single-line text field.
    #[must_use]
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Creates a multi-line text field.
    #[must_use]
    pub fn multiline_text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::MultilineText)
    }

    /// Creates a numeric field.
    #[must_use]
    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    /// Creates an enum field with the given options.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            label,
            FieldKind::Enum {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }
}

/// The ordered set of config fields a node type declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSchema {
    fields: Vec<FieldDefinition>,
}

impl ConfigSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn push(&mut self, field: FieldDefinition) {
        self.fields.push(field);
    }

    /// Returns the field with the given name, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Returns true when the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
