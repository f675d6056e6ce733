//! Flow graph engine for flowdeck.
//!
//! This crate holds the editable model of an automation flow, including:
//!
//! - **Registry**: The catalog of node types, grouped into triggers, conditions and actions
//! - **Ports**: Named output ports per node type and the rules for connecting them
//! - **Config Binding**: Typed config fields and validation of edit payloads
//! - **Document**: The flow graph itself, stored in petgraph with stable ids
//! - **Editing**: Atomic, invariant-preserving mutations through [`FlowEditor`]
//! - **Codec**: Deterministic JSON encoding and validating decoding
//! - **Checks**: Structural warnings and errors for a complete flow

pub mod binding;
pub mod catalog;
pub mod codec;
pub mod edge;
pub mod editor;
pub mod error;
pub mod field;
pub mod graph;
pub mod node;
pub mod node_type;
pub mod port;
pub mod registry;
pub mod settings;
pub mod validate;

pub use binding::{ConfigBinding, ValidatedConfig};
pub use codec::{EdgeEntry, FlowDefinition, NodeEntry};
pub use edge::EdgeInstance;
pub use editor::FlowEditor;
pub use error::{GraphError, RegistryError};
pub use field::{ConfigMap, ConfigSchema, FieldDefinition, FieldKind};
pub use flowdeck_core::{EdgeId, NodeId};
pub use graph::FlowDocument;
pub use node::{CanvasPosition, NodeInstance};
pub use node_type::{NodeCategory, NodeTypeDefinition, UnknownCategory};
pub use port::{OutputPortDefinition, PortResolver};
pub use registry::{NodeTypeRegistry, RegistryBuilder};
pub use settings::{EditorSettings, UnknownFieldPolicy};
pub use validate::{FlowIssue, Severity, validate_flow};
