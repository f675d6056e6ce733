//! The built-in messaging automation catalog.

use crate::field::FieldDefinition;
use crate::node_type::{NodeCategory, NodeTypeDefinition};
use crate::registry::NodeTypeRegistry;

const CHANNELS: [&str; 4] = ["any", "sms", "whatsapp", "email"];

impl NodeTypeRegistry {
    /// Builds the registry of built-in triggers, conditions, and actions.
    #[must_use]
    pub fn builtin() -> Self {
        let mut builder = Self::builder();
        for definition in builtin_definitions() {
            if let Err(err) = builder.register(definition) {
                tracing::error!(error = %err, "skipping invalid built-in node type");
            }
        }
        builder.build()
    }
}

/// Returns the built-in node type definitions in presentation order.
#[must_use]
pub fn builtin_definitions() -> Vec<NodeTypeDefinition> {
    let mut definitions = triggers();
    definitions.extend(conditions());
    definitions.extend(actions());
    definitions
}

fn trigger(type_key: &str, label: &str) -> NodeTypeDefinition {
    NodeTypeDefinition::new(NodeCategory::Trigger, type_key, label).with_port("success")
}

fn condition(type_key: &str, label: &str) -> NodeTypeDefinition {
    NodeTypeDefinition::new(NodeCategory::Condition, type_key, label)
        .with_port("yes")
        .with_port("no")
}

fn action(type_key: &str, label: &str) -> NodeTypeDefinition {
    NodeTypeDefinition::new(NodeCategory::Action, type_key, label).with_port("success")
}

fn triggers() -> Vec<NodeTypeDefinition> {
    vec![
        trigger("messageReceived", "Message received")
            .with_description("Starts when a contact sends a message")
            .with_field(FieldDefinition::enumeration("channel", "Channel", CHANNELS)),
        trigger("keywordMatch", "Keyword match")
            .with_description("Starts when an incoming message contains a keyword")
            .with_field(FieldDefinition::text("keyword", "Keyword")),
        trigger("contactCreated", "Contact created")
            .with_description("Starts when a new contact is added"),
        trigger("scheduled", "Scheduled")
            .with_description("Starts on a fixed interval")
            .with_field(FieldDefinition::number("intervalMinutes", "Interval (minutes)")),
    ]
}

fn conditions() -> Vec<NodeTypeDefinition> {
    vec![
        condition("textContains", "Text contains")
            .with_description("Checks whether the message text contains a value")
            .with_field(FieldDefinition::text("text", "Text"))
            .with_field(FieldDefinition::enumeration(
                "matchCase",
                "Match case",
                ["insensitive", "sensitive"],
            )),
        condition("contactHasTag", "Contact has tag")
            .with_description("Checks whether the contact carries a tag")
            .with_field(FieldDefinition::text("tag", "Tag")),
        condition("timeWindow", "Time window")
            .with_description("Checks whether the current hour falls inside a window")
            .with_field(FieldDefinition::number("startHour", "Start hour"))
            .with_field(FieldDefinition::number("endHour", "End hour")),
    ]
}

fn actions() -> Vec<NodeTypeDefinition> {
    vec![
        action("sendMessage", "Send message")
            .with_description("Replies to the contact")
            .with_field(FieldDefinition::multiline_text("message", "Message"))
            .with_field(FieldDefinition::enumeration("channel", "Channel", CHANNELS)),
        action("wait", "Wait")
            .with_description("Pauses before the next step")
            .with_field(FieldDefinition::number("seconds", "Seconds")),
        action("addTag", "Add tag")
            .with_description("Tags the contact")
            .with_field(FieldDefinition::text("tag", "Tag")),
        action("sendEmail", "Send email")
            .with_description("Sends an email to the contact")
            .with_field(FieldDefinition::text("subject", "Subject"))
            .with_field(FieldDefinition::multiline_text("body", "Body")),
        action("httpRequest", "HTTP request")
            .with_description("Calls an external URL")
            .with_field(FieldDefinition::text("url", "URL"))
            .with_field(FieldDefinition::enumeration(
                "method",
                "Method",
                ["GET", "POST", "PUT", "DELETE"],
            ))
            .with_field(FieldDefinition::multiline_text("body", "Body")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_registers_every_definition() {
        let registry = NodeTypeRegistry::builtin();
        assert_eq!(registry.len(), builtin_definitions().len());
    }

    #[test]
    fn every_condition_branches_and_every_other_type_has_one_port() {
        let registry = NodeTypeRegistry::builtin();
        for category in registry.list_categories() {
            for def in registry.list_node_types(category) {
                let expected = if category == NodeCategory::Condition { 2 } else { 1 };
                assert_eq!(def.ports.len(), expected, "{}", def.type_key);
            }
        }
    }

    #[test]
    fn catalog_contains_message_flow_types() {
        let registry = NodeTypeRegistry::builtin();
        assert!(registry.contains(NodeCategory::Trigger, "messageReceived"));
        assert!(registry.contains(NodeCategory::Condition, "textContains"));
        assert!(registry.contains(NodeCategory::Action, "sendMessage"));
    }
}
