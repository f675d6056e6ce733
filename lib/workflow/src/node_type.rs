//! Node categories and node type definitions.
//!
//! A node type is identified by its category and a type key unique within
//! that category. The definition fixes the node's output ports and config
//! schema; instances never change either.

use crate::field::{ConfigSchema, FieldDefinition};
use crate::port::OutputPortDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Entry points that start a flow when an event arrives.
    #[serde(rename = "triggers")]
    Trigger,
    /// Branching checks with one output port per outcome.
    #[serde(rename = "conditions")]
    Condition,
    /// Steps that do something and continue.
    #[serde(rename = "actions")]
    Action,
}

impl NodeCategory {
    /// All categories in presentation order.
    pub const ALL: [Self; 3] = [Self::Trigger, Self::Condition, Self::Action];

    /// Returns the wire name used in flow definitions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "triggers",
            Self::Condition => "conditions",
            Self::Action => "actions",
        }
    }

    /// Returns the presentation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trigger => "Triggers",
            Self::Condition => "Conditions",
            Self::Action => "Actions",
        }
    }

    /// Returns the presentation description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Trigger => "Start the flow when something happens",
            Self::Condition => "Route the flow down one branch or another",
            Self::Action => "Do something, then continue",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a category name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for NodeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The definition of a node type: what its instances look like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeDefinition {
    /// The category this type belongs to.
    pub category: NodeCategory,
    /// Key unique within the category (e.g. "sendMessage").
    pub type_key: String,
    /// Default label for new nodes of this type.
    pub label: String,
    /// What the node does.
    pub description: String,
    /// Output ports in display order.
    pub ports: Vec<OutputPortDefinition>,
    /// Config fields the node accepts.
    pub schema: ConfigSchema,
}

impl NodeTypeDefinition {
    /// Creates a definition with no ports and no config fields.
    #[must_use]
    pub fn new(category: NodeCategory, type_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            category,
            type_key: type_key.into(),
            label: label.into(),
            description: String::new(),
            ports: Vec::new(),
            schema: ConfigSchema::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an output port; its display order is its position.
    #[must_use]
    pub fn with_port(mut self, id: impl Into<String>) -> Self {
        let order = u32::try_from(self.ports.len()).unwrap_or(u32::MAX);
        self.ports.push(OutputPortDefinition::new(id, order));
        self
    }

    /// Appends a config field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.schema.push(field);
        self
    }

    /// Returns the output port with the given id, if any.
    #[must_use]
    pub fn output_port(&self, id: &str) -> Option<&OutputPortDefinition> {
        self.ports.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names_roundtrip() {
        for category in NodeCategory::ALL {
            let parsed: NodeCategory = category.as_str().parse().expect("parse");
            assert_eq!(parsed, category);
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "filters".parse::<NodeCategory>().unwrap_err();
        assert_eq!(err, UnknownCategory("filters".to_string()));
    }

    #[test]
    fn ports_get_display_order_from_position() {
        let def = NodeTypeDefinition::new(NodeCategory::Condition, "textContains", "Text contains")
            .with_port("yes")
            .with_port("no");
        assert_eq!(def.ports[0].order, 0);
        assert_eq!(def.ports[1].order, 1);
        assert!(def.output_port("no").is_some());
        assert!(def.output_port("maybe").is_none());
    }
}
