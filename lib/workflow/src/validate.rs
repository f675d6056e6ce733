//! Structural checks on a whole flow.
//!
//! These are the business rules that sit above the editing invariants: a
//! document can be perfectly consistent and still be a flow that would
//! never run, or never finish. Nothing here blocks editing; the issues are
//! reported for the editing surface or a pre-save check to act on.

use crate::graph::FlowDocument;
use crate::node_type::NodeCategory;
use crate::port::PortResolver;
use crate::registry::NodeTypeRegistry;
use flowdeck_core::NodeId;
use petgraph::visit::Dfs;
use std::collections::HashSet;
use std::fmt;

/// How serious a flow issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// The flow cannot run as intended.
    Error,
    /// The flow runs, but part of it is dead or incomplete.
    Warning,
}

/// A structural problem found in a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowIssue {
    /// No enabled trigger starts the flow.
    MissingTrigger,
    /// A trigger has edges entering it.
    TriggerHasIncomingEdges { node_id: NodeId },
    /// The graph contains a cycle.
    CycleDetected,
    /// No enabled trigger leads to this node.
    UnreachableNode { node_id: NodeId },
    /// A condition branch leads nowhere.
    UnconnectedPort { node_id: NodeId, port_id: String },
}

impl FlowIssue {
    /// Returns how serious the issue is.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::MissingTrigger | Self::TriggerHasIncomingEdges { .. } | Self::CycleDetected => {
                Severity::Error
            }
            Self::UnreachableNode { .. } | Self::UnconnectedPort { .. } => Severity::Warning,
        }
    }

    /// Returns the node the issue is about, if any.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::MissingTrigger | Self::CycleDetected => None,
            Self::TriggerHasIncomingEdges { node_id }
            | Self::UnreachableNode { node_id }
            | Self::UnconnectedPort { node_id, .. } => Some(*node_id),
        }
    }

    fn port_id(&self) -> &str {
        match self {
            Self::UnconnectedPort { port_id, .. } => port_id,
            _ => "",
        }
    }
}

impl fmt::Display for FlowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTrigger => write!(f, "flow has no enabled trigger"),
            Self::TriggerHasIncomingEdges { node_id } => {
                write!(f, "trigger {node_id} has incoming edges")
            }
            Self::CycleDetected => write!(f, "flow contains a cycle"),
            Self::UnreachableNode { node_id } => {
                write!(f, "node {node_id} is not reachable from any trigger")
            }
            Self::UnconnectedPort { node_id, port_id } => {
                write!(f, "port '{port_id}' on node {node_id} is not connected")
            }
        }
    }
}

/// Checks a flow's structure and returns every issue found.
///
/// Issues are ordered by severity, then node id, then port id.
#[must_use]
pub fn validate_flow(document: &FlowDocument, registry: &NodeTypeRegistry) -> Vec<FlowIssue> {
    let mut issues = Vec::new();
    let graph = document.graph();

    let triggers: Vec<NodeId> = document
        .nodes()
        .filter(|n| n.is_trigger() && n.enabled)
        .map(|n| n.id)
        .collect();

    if triggers.is_empty() {
        issues.push(FlowIssue::MissingTrigger);
    } else {
        let mut reachable = HashSet::new();
        let mut dfs = Dfs::empty(graph);
        for index in triggers.iter().filter_map(|id| document.index_of(*id)) {
            dfs.move_to(index);
            while let Some(visited) = dfs.next(graph) {
                if let Some(node) = graph.node_weight(visited) {
                    reachable.insert(node.id);
                }
            }
        }
        issues.extend(
            document
                .nodes()
                .filter(|n| !n.is_trigger() && !reachable.contains(&n.id))
                .map(|n| FlowIssue::UnreachableNode { node_id: n.id }),
        );
    }

    for node in document.nodes().filter(|n| n.is_trigger()) {
        if !document.incoming_edges(node.id).is_empty() {
            issues.push(FlowIssue::TriggerHasIncomingEdges { node_id: node.id });
        }
    }

    if petgraph::algo::is_cyclic_directed(graph) {
        issues.push(FlowIssue::CycleDetected);
    }

    let resolver = PortResolver::new(registry);
    for node in document.nodes().filter(|n| n.category == NodeCategory::Condition) {
        let Ok(ports) = resolver.ports_of(node) else {
            continue;
        };
        let outgoing = document.outgoing_edges(node.id);
        for port in ports {
            if !outgoing.iter().any(|e| e.source_port == port.id) {
                issues.push(FlowIssue::UnconnectedPort {
                    node_id: node.id,
                    port_id: port.id.clone(),
                });
            }
        }
    }

    issues.sort_by(|a, b| {
        (a.severity(), a.node_id(), a.port_id()).cmp(&(b.severity(), b.node_id(), b.port_id()))
    });
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FlowEditor;
    use crate::settings::EditorSettings;
    use std::sync::Arc;

    fn editor() -> FlowEditor {
        FlowEditor::new(Arc::new(NodeTypeRegistry::builtin()), "Checks")
    }

    fn add(editor: &mut FlowEditor, category: NodeCategory, type_key: &str) -> NodeId {
        editor.add_node(category, type_key, None).expect("add").id
    }

    fn check(editor: &FlowEditor) -> Vec<FlowIssue> {
        validate_flow(editor.document(), editor.registry())
    }

    #[test]
    fn complete_flow_has_no_issues() {
        let mut editor = editor();
        let t = add(&mut editor, NodeCategory::Trigger, "messageReceived");
        let c = add(&mut editor, NodeCategory::Condition, "textContains");
        let a = add(&mut editor, NodeCategory::Action, "sendMessage");
        let b = add(&mut editor, NodeCategory::Action, "addTag");
        editor.connect(t, "success", c).expect("edge");
        editor.connect(c, "yes", a).expect("edge");
        editor.connect(c, "no", b).expect("edge");

        assert!(check(&editor).is_empty());
    }

    #[test]
    fn flow_without_enabled_trigger_is_an_error() {
        let mut editor = editor();
        let t = add(&mut editor, NodeCategory::Trigger, "messageReceived");
        editor.set_enabled(t, false).expect("disable");

        let issues = check(&editor);
        assert_eq!(issues, vec![FlowIssue::MissingTrigger]);
        assert_eq!(issues[0].severity(), Severity::Error);
    }

    #[test]
    fn orphan_action_is_unreachable() {
        let mut editor = editor();
        let t = add(&mut editor, NodeCategory::Trigger, "keywordMatch");
        let a = add(&mut editor, NodeCategory::Action, "sendMessage");
        let orphan = add(&mut editor, NodeCategory::Action, "wait");
        editor.connect(t, "success", a).expect("edge");

        assert_eq!(check(&editor), vec![FlowIssue::UnreachableNode { node_id: orphan }]);
    }

    #[test]
    fn dangling_condition_branch_is_a_warning() {
        let mut editor = editor();
        let t = add(&mut editor, NodeCategory::Trigger, "messageReceived");
        let c = add(&mut editor, NodeCategory::Condition, "contactHasTag");
        let a = add(&mut editor, NodeCategory::Action, "sendMessage");
        editor.connect(t, "success", c).expect("edge");
        editor.connect(c, "yes", a).expect("edge");

        let issues = check(&editor);
        assert_eq!(
            issues,
            vec![FlowIssue::UnconnectedPort {
                node_id: c,
                port_id: "no".to_string(),
            }]
        );
        assert_eq!(issues[0].severity(), Severity::Warning);
    }

    #[test]
    fn trigger_with_incoming_edge_and_cycle_are_errors() {
        let mut editor = editor();
        let t = add(&mut editor, NodeCategory::Trigger, "messageReceived");
        let a = add(&mut editor, NodeCategory::Action, "sendMessage");
        editor.connect(t, "success", a).expect("edge");
        editor.connect(a, "success", t).expect("edge");

        let issues = check(&editor);
        assert!(issues.contains(&FlowIssue::TriggerHasIncomingEdges { node_id: t }));
        assert!(issues.contains(&FlowIssue::CycleDetected));
        assert!(issues.iter().all(|i| i.severity() == Severity::Error));
    }

    #[test]
    fn self_loop_counts_as_cycle() {
        let settings = EditorSettings {
            allow_self_loops: true,
            ..EditorSettings::default()
        };
        let mut editor = FlowEditor::with_settings(
            Arc::new(NodeTypeRegistry::builtin()),
            settings,
            crate::graph::FlowDocument::new("Loop"),
        );
        let t = add(&mut editor, NodeCategory::Trigger, "scheduled");
        let w = add(&mut editor, NodeCategory::Action, "wait");
        editor.connect(t, "success", w).expect("edge");
        editor.connect(w, "success", w).expect("loop");

        assert_eq!(check(&editor), vec![FlowIssue::CycleDetected]);
    }

    #[test]
    fn errors_sort_before_warnings() {
        let mut editor = editor();
        add(&mut editor, NodeCategory::Condition, "timeWindow");

        let issues = check(&editor);
        assert_eq!(issues[0], FlowIssue::MissingTrigger);
        assert_eq!(issues.len(), 3);
        assert!(issues[1..].iter().all(|i| i.severity() == Severity::Warning));
    }
}
