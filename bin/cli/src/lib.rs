//! Command-line tools for flowdeck flow definitions.
//!
//! The binary is a thin collaborator around `flowdeck-workflow`: it loads a
//! flow definition file, decodes it against the built-in catalog, and
//! reports on it. All policy comes from [`config::CliConfig`].

pub mod config;
pub mod error;

use crate::config::CliConfig;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use flowdeck_core::Result;
use flowdeck_workflow::{
    FieldKind, FlowDocument, NodeCategory, NodeTypeRegistry, Severity, codec, validate_flow,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inspect and normalize flowdeck flow definitions
#[derive(Parser, Debug)]
#[command(name = "flowdeck", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the built-in node types with their ports and config fields
    Catalog {
        /// Only list one category (triggers, conditions or actions)
        #[arg(long)]
        category: Option<NodeCategory>,
    },
    /// Decode a flow definition and report structural issues
    Check {
        /// Path to the flow definition JSON file
        path: PathBuf,
    },
    /// Print a flow definition in canonical form
    Fmt {
        /// Path to the flow definition JSON file
        path: PathBuf,
        /// Rewrite the file in place instead of printing it
        #[arg(long)]
        write: bool,
    },
}

/// Runs a parsed command, writing its output to `out`.
///
/// # Errors
///
/// Returns an error if a flow file cannot be read, written, or decoded, if
/// `check` finds error-severity issues, or if `out` cannot be written.
pub fn run(cli: &Cli, config: &CliConfig, out: &mut impl Write) -> Result<(), CliError> {
    let registry = NodeTypeRegistry::builtin();
    match &cli.command {
        Command::Catalog { category } => emit(out, &catalog(&registry, *category)),
        Command::Check { path } => {
            let document = load_flow(&registry, config, path)?;
            let (report, errors) = check(&registry, &document);
            emit(out, &report)?;
            if errors > 0 {
                return Err(CliError::InvalidFlow {
                    path: path.clone(),
                    errors,
                }
                .into());
            }
            Ok(())
        }
        Command::Fmt { path, write } => {
            let document = load_flow(&registry, config, path)?;
            let text = format(&document).map_err(|e| CliError::Output {
                details: e.to_string(),
            })?;
            if *write {
                std::fs::write(path, text).map_err(|e| CliError::Io {
                    path: path.clone(),
                    details: e.to_string(),
                })?;
                info!(path = %path.display(), "rewrote flow definition");
                Ok(())
            } else {
                emit(out, &text)
            }
        }
    }
}

/// Reads and decodes a flow definition file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `Decode` if its contents are
/// not a valid flow for the registry.
pub fn load_flow(
    registry: &NodeTypeRegistry,
    config: &CliConfig,
    path: &Path,
) -> Result<FlowDocument, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    let document = codec::decode_str(registry, &config.editor, &text).map_err(|e| {
        CliError::Decode {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
    })?;
    debug!(
        path = %path.display(),
        nodes = document.node_count(),
        edges = document.edge_count(),
        "loaded flow"
    );
    Ok(document)
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), CliError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(CliError::from)?;
    Ok(())
}

fn catalog(registry: &NodeTypeRegistry, only: Option<NodeCategory>) -> String {
    let mut lines = Vec::new();
    for category in registry.list_categories() {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        lines.push(format!("{} ({}): {}", category.label(), category, category.description()));
        for definition in registry.list_node_types(category) {
            let ports: Vec<&str> = definition.ports.iter().map(|p| p.id.as_str()).collect();
            lines.push(format!(
                "  {} - {} [ports: {}]",
                definition.type_key,
                definition.label,
                ports.join(", ")
            ));
            for field in definition.schema.fields() {
                let kind = match &field.kind {
                    FieldKind::Enum { options } => format!("enum: {}", options.join("|")),
                    other => other.name().to_string(),
                };
                lines.push(format!("    {}: {} ({})", field.name, field.label, kind));
            }
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

fn check(registry: &NodeTypeRegistry, document: &FlowDocument) -> (String, usize) {
    let issues = validate_flow(document, registry);
    let errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();

    let mut lines: Vec<String> = issues
        .iter()
        .map(|issue| match issue.severity() {
            Severity::Error => format!("error: {issue}"),
            Severity::Warning => format!("warning: {issue}"),
        })
        .collect();
    lines.push(format!(
        "{}: {} node(s), {} edge(s), {} error(s), {} warning(s)",
        document.name(),
        document.node_count(),
        document.edge_count(),
        errors,
        issues.len() - errors
    ));
    lines.push(String::new());
    (lines.join("\n"), errors)
}

fn format(document: &FlowDocument) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(&codec::encode(document))?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const TRIGGER: &str = "node_01HZY0J4Q3S6V8X0Z2B4D6F8GA";
    const ACTION: &str = "node_01HZY0J4Q3S6V8X0Z2B4D6F8GB";
    const ORPHAN: &str = "node_01HZY0J4Q3S6V8X0Z2B4D6F8GC";

    fn flow_file(value: &serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{value}").expect("write");
        file
    }

    fn welcome_flow() -> serde_json::Value {
        json!({
            "name": "Welcome",
            "nodes": [
                {
                    "id": ACTION,
                    "type": "sendMessage",
                    "category": "actions",
                    "label": "Say hi",
                    "config": {"message": "Hello!", "channel": "sms"},
                    "enabled": true
                },
                {
                    "id": TRIGGER,
                    "type": "messageReceived",
                    "category": "triggers",
                    "label": "Inbound",
                    "config": {"channel": "any"},
                    "enabled": true
                }
            ],
            "edges": [
                {
                    "id": "edge_01HZY0J4Q3S6V8X0Z2B4D6F8GD",
                    "source": TRIGGER,
                    "sourcePort": "success",
                    "target": ACTION
                }
            ]
        })
    }

    fn run_command(command: Command) -> (Result<(), CliError>, String) {
        let mut out = Vec::new();
        let result = run(&Cli { command }, &CliConfig::default(), &mut out);
        (result, String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn catalog_lists_every_category() {
        let (result, out) = run_command(Command::Catalog { category: None });
        assert!(result.is_ok());
        assert!(out.contains("Triggers (triggers)"));
        assert!(out.contains("Conditions (conditions)"));
        assert!(out.contains("Actions (actions)"));
        assert!(out.contains("textContains - "));
        assert!(out.contains("[ports: yes, no]"));
        assert!(out.contains("enum: any|sms|whatsapp|email"));
    }

    #[test]
    fn catalog_filters_by_category() {
        let (result, out) = run_command(Command::Catalog {
            category: Some(NodeCategory::Action),
        });
        assert!(result.is_ok());
        assert!(out.contains("sendMessage"));
        assert!(!out.contains("messageReceived"));
    }

    #[test]
    fn check_reports_clean_flow() {
        let file = flow_file(&welcome_flow());
        let (result, out) = run_command(Command::Check {
            path: file.path().to_path_buf(),
        });
        assert!(result.is_ok());
        assert!(out.contains("Welcome: 2 node(s), 1 edge(s), 0 error(s), 0 warning(s)"));
    }

    #[test]
    fn check_reports_warnings_without_failing() {
        let mut flow = welcome_flow();
        flow["nodes"].as_array_mut().expect("nodes").push(json!({
            "id": ORPHAN,
            "type": "wait",
            "category": "actions",
            "label": "Pause",
            "config": {},
            "enabled": true
        }));
        let file = flow_file(&flow);

        let (result, out) = run_command(Command::Check {
            path: file.path().to_path_buf(),
        });
        assert!(result.is_ok());
        assert!(out.contains(&format!("warning: node {ORPHAN} is not reachable")));
    }

    #[test]
    fn check_fails_on_error_issues() {
        let mut flow = welcome_flow();
        flow["nodes"][1]["enabled"] = json!(false);
        let file = flow_file(&flow);

        let (result, out) = run_command(Command::Check {
            path: file.path().to_path_buf(),
        });
        assert!(out.contains("error: flow has no enabled trigger"));
        let report = result.expect_err("should fail");
        assert!(matches!(
            report.current_context(),
            CliError::InvalidFlow { errors: 1, .. }
        ));
    }

    #[test]
    fn check_fails_on_undecodable_flow() {
        let mut flow = welcome_flow();
        flow["edges"][0]["sourcePort"] = json!("maybe");
        let file = flow_file(&flow);

        let (result, _) = run_command(Command::Check {
            path: file.path().to_path_buf(),
        });
        let report = result.expect_err("should fail");
        assert!(matches!(report.current_context(), CliError::Decode { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (result, _) = run_command(Command::Check {
            path: dir.path().join("absent.json"),
        });
        let report = result.expect_err("should fail");
        assert!(matches!(report.current_context(), CliError::Io { .. }));
    }

    #[test]
    fn fmt_prints_canonical_encoding() {
        let file = flow_file(&welcome_flow());
        let (result, out) = run_command(Command::Fmt {
            path: file.path().to_path_buf(),
            write: false,
        });
        assert!(result.is_ok());

        let value: serde_json::Value = serde_json::from_str(&out).expect("json output");
        assert_eq!(value["nodes"][0]["id"], TRIGGER);
        assert_eq!(value["nodes"][1]["id"], ACTION);
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn fmt_write_rewrites_file_and_is_stable() {
        let file = flow_file(&welcome_flow());
        let path = file.path().to_path_buf();
        let (result, out) = run_command(Command::Fmt {
            path: path.clone(),
            write: true,
        });
        assert!(result.is_ok());
        assert!(out.is_empty());

        let first = std::fs::read_to_string(&path).expect("read back");
        let (result, _) = run_command(Command::Fmt {
            path: path.clone(),
            write: true,
        });
        assert!(result.is_ok());
        assert_eq!(std::fs::read_to_string(&path).expect("read back"), first);
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["flowdeck", "catalog", "--category", "conditions"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::Catalog {
                category: Some(NodeCategory::Condition)
            }
        ));

        let cli = Cli::try_parse_from(["flowdeck", "fmt", "flow.json", "--write"]).expect("parse");
        assert!(matches!(cli.command, Command::Fmt { write: true, .. }));
    }
}
