//! Config binding: checking and applying config payloads.
//!
//! A payload is validated in full before anything is written, so a failed
//! `set_node_config` leaves the node untouched. Applying is a shallow merge:
//! fields missing from the payload keep their stored value.

use crate::error::GraphError;
use crate::field::ConfigMap;
use crate::node::NodeInstance;
use crate::node_type::NodeTypeDefinition;
use crate::settings::UnknownFieldPolicy;
use flowdeck_core::NodeId;

/// A payload that passed validation, holding normalized values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedConfig {
    fields: ConfigMap,
}

impl ValidatedConfig {
    /// Returns the normalized fields that will be merged.
    #[must_use]
    pub fn fields(&self) -> &ConfigMap {
        &self.fields
    }
}

/// Validates payloads against node type schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigBinding {
    unknown_fields: UnknownFieldPolicy,
}

impl ConfigBinding {
    /// Creates a binding with the given policy for undeclared keys.
    #[must_use]
    pub const fn new(unknown_fields: UnknownFieldPolicy) -> Self {
        Self { unknown_fields }
    }

    /// Checks every payload field against the node type's schema.
    ///
    /// Fields are checked in key order and the first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns `FieldTypeError` when a value has the wrong kind, or
    /// `UnknownConfigField` for an undeclared key under the reject policy.
    pub fn validate(
        &self,
        node_id: NodeId,
        definition: &NodeTypeDefinition,
        payload: &ConfigMap,
    ) -> Result<ValidatedConfig, GraphError> {
        let mut fields = ConfigMap::new();
        for (name, value) in payload {
            let Some(field) = definition.schema.field(name) else {
                match self.unknown_fields {
                    UnknownFieldPolicy::Ignore => continue,
                    UnknownFieldPolicy::Reject => {
                        return Err(GraphError::UnknownConfigField {
                            node_id,
                            field: name.clone(),
                        });
                    }
                }
            };
            let coerced = field
                .kind
                .coerce(value)
                .ok_or_else(|| GraphError::FieldTypeError {
                    node_id,
                    field: name.clone(),
                    expected: field.kind.clone(),
                })?;
            fields.insert(name.clone(), coerced);
        }
        Ok(ValidatedConfig { fields })
    }

    /// Merges validated fields into the node's config.
    pub fn apply(node: &mut NodeInstance, validated: ValidatedConfig) {
        node.config.extend(validated.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldDefinition, FieldKind};
    use crate::node_type::NodeCategory;
    use serde_json::json;

    fn send_type() -> NodeTypeDefinition {
        NodeTypeDefinition::new(NodeCategory::Action, "sendMessage", "Send message")
            .with_port("success")
            .with_field(FieldDefinition::multiline_text("message", "Message"))
            .with_field(FieldDefinition::number("delay", "Delay"))
    }

    fn payload(value: serde_json::Value) -> ConfigMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[test]
    fn valid_payload_is_normalized() {
        let def = send_type();
        let validated = ConfigBinding::default()
            .validate(NodeId::new(), &def, &payload(json!({"message": "hi", "delay": "5"})))
            .expect("valid");
        assert_eq!(validated.fields().get("delay"), Some(&json!(5)));
    }

    #[test]
    fn wrong_kind_names_field_and_kind() {
        let def = send_type();
        let node_id = NodeId::new();
        let err = ConfigBinding::default()
            .validate(node_id, &def, &payload(json!({"delay": "later"})))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::FieldTypeError {
                node_id,
                field: "delay".to_string(),
                expected: FieldKind::Number,
            }
        );
    }

    #[test]
    fn unknown_keys_are_ignored_by_default() {
        let def = send_type();
        let validated = ConfigBinding::default()
            .validate(NodeId::new(), &def, &payload(json!({"colour": "red", "message": "hi"})))
            .expect("valid");
        assert!(validated.fields().get("colour").is_none());
        assert_eq!(validated.fields().len(), 1);
    }

    #[test]
    fn unknown_keys_fail_under_reject_policy() {
        let def = send_type();
        let err = ConfigBinding::new(UnknownFieldPolicy::Reject)
            .validate(NodeId::new(), &def, &payload(json!({"colour": "red"})))
            .unwrap_err();
        assert!(matches!(err, GraphError::UnknownConfigField { field, .. } if field == "colour"));
    }

    #[test]
    fn apply_preserves_absent_fields() {
        let def = send_type();
        let binding = ConfigBinding::default();
        let mut node = NodeInstance::new(NodeId::new(), &def, None);

        let first = binding
            .validate(node.id, &def, &payload(json!({"message": "hi", "delay": 1})))
            .expect("valid");
        ConfigBinding::apply(&mut node, first);
        let second = binding
            .validate(node.id, &def, &payload(json!({"delay": 2})))
            .expect("valid");
        ConfigBinding::apply(&mut node, second);

        assert_eq!(
            serde_json::Value::Object(node.config),
            json!({"message": "hi", "delay": 2})
        );
    }
}
