//! The node type catalog.
//!
//! The registry is assembled once at process start with [`RegistryBuilder`]
//! and is immutable afterwards. Lookups key on `(category, type_key)`;
//! listings follow category order, then registration order.

use crate::error::{GraphError, RegistryError};
use crate::field::FieldKind;
use crate::node_type::{NodeCategory, NodeTypeDefinition};
use indexmap::IndexMap;
use std::collections::HashSet;

/// An immutable catalog of node types.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: IndexMap<NodeCategory, IndexMap<String, NodeTypeDefinition>>,
}

impl NodeTypeRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks up a node type.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeType` if nothing is registered under the key.
    pub fn lookup(
        &self,
        category: NodeCategory,
        type_key: &str,
    ) -> Result<&NodeTypeDefinition, GraphError> {
        self.types
            .get(&category)
            .and_then(|types| types.get(type_key))
            .ok_or_else(|| GraphError::unknown_node_type(category, type_key))
    }

    /// Looks up a node type from wire names.
    ///
    /// # Errors
    ///
    /// Returns `UnknownNodeType` if the category name is not recognized or
    /// nothing is registered under the key.
    pub fn lookup_str(&self, category: &str, type_key: &str) -> Result<&NodeTypeDefinition, GraphError> {
        let category: NodeCategory = category
            .parse()
            .map_err(|_| GraphError::unknown_node_type(category, type_key))?;
        self.lookup(category, type_key)
    }

    /// Returns true if the node type is registered.
    #[must_use]
    pub fn contains(&self, category: NodeCategory, type_key: &str) -> bool {
        self.lookup(category, type_key).is_ok()
    }

    /// Lists categories in presentation order.
    pub fn list_categories(&self) -> impl Iterator<Item = NodeCategory> {
        NodeCategory::ALL.into_iter()
    }

    /// Lists the node types of a category in registration order.
    pub fn list_node_types(&self, category: NodeCategory) -> impl Iterator<Item = &NodeTypeDefinition> {
        self.types
            .get(&category)
            .into_iter()
            .flat_map(IndexMap::values)
    }

    /// Returns the number of registered node types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.values().map(IndexMap::len).sum()
    }

    /// Returns true if no node types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collects node type definitions before freezing them into a registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: IndexMap<NodeCategory, IndexMap<String, NodeTypeDefinition>>,
}

impl RegistryBuilder {
    /// Registers a node type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or already taken, the type has
    /// no output ports, or it declares a port or field twice, or an enum
    /// field without options.
    pub fn register(&mut self, definition: NodeTypeDefinition) -> Result<&mut Self, RegistryError> {
        check_definition(&definition)?;

        let types = self.types.entry(definition.category).or_default();
        if types.contains_key(&definition.type_key) {
            return Err(RegistryError::DuplicateNodeType {
                category: definition.category,
                type_key: definition.type_key,
            });
        }
        types.insert(definition.type_key.clone(), definition);
        Ok(self)
    }

    /// Freezes the collected definitions.
    #[must_use]
    pub fn build(mut self) -> NodeTypeRegistry {
        self.types.sort_keys();
        NodeTypeRegistry { types: self.types }
    }
}

fn check_definition(definition: &NodeTypeDefinition) -> Result<(), RegistryError> {
    let type_key = &definition.type_key;
    if type_key.is_empty() {
        return Err(RegistryError::EmptyTypeKey {
            category: definition.category,
        });
    }
    if definition.ports.is_empty() {
        return Err(RegistryError::NoOutputPorts {
            category: definition.category,
            type_key: type_key.clone(),
        });
    }

    let mut port_ids = HashSet::new();
    for port in &definition.ports {
        if !port_ids.insert(port.id.as_str()) {
            return Err(RegistryError::DuplicatePort {
                type_key: type_key.clone(),
                port_id: port.id.clone(),
            });
        }
    }

    let mut field_names = HashSet::new();
    for field in definition.schema.fields() {
        if !field_names.insert(field.name.as_str()) {
            return Err(RegistryError::DuplicateField {
                type_key: type_key.clone(),
                field: field.name.clone(),
            });
        }
        if let FieldKind::Enum { options } = &field.kind
            && options.is_empty()
        {
            return Err(RegistryError::EmptyEnumOptions {
                type_key: type_key.clone(),
                field: field.name.clone(),
            });
        }
    }

    Ok(())
}
