// src/scan.rs
//! Pattern scanner for common logic and safety hazards: mutable default
//! arguments, `eval`/`exec`, and subprocess calls with `shell=True`.
//! Direct node-kind matching, no state beyond the findings list.

use crate::parse::node_text;
use crate::walk::{walk, Flow, Step};
use serde::Serialize;
use tree_sitter::{Node, Tree};

/// Callables whose presence is reported outright.
const INJECTION_SINKS: &[&str] = &["eval", "exec"];

/// One reported hazard.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFinding {
    /// 1-based line of the offending node.
    pub line: usize,
    pub message: String,
}

/// Scans a parsed module for hazard patterns.
#[must_use]
pub fn scan(tree: &Tree, source: &str) -> Vec<ScanFinding> {
    let mut findings = Vec::new();

    walk(tree.root_node(), |node, step| {
        if step == Step::Enter {
            match node.kind() {
                "default_parameter" | "typed_default_parameter" => {
                    check_mutable_default(node, source, &mut findings);
                }
                "call" => check_call(node, source, &mut findings),
                _ => {}
            }
        }
        Flow::Continue
    });

    findings
}

fn check_mutable_default(node: Node, source: &str, findings: &mut Vec<ScanFinding>) {
    let Some(value) = node.child_by_field_name("value") else {
        return;
    };
    if matches!(value.kind(), "list" | "dictionary" | "set") {
        let name = node
            .child_by_field_name("name")
            .map(|n| node_text(n, source))
            .unwrap_or("<param>");
        findings.push(ScanFinding {
            line: node.start_position().row + 1,
            message: format!("parameter '{name}' defaults to a mutable object"),
        });
    }
}

fn check_call(node: Node, source: &str, findings: &mut Vec<ScanFinding>) {
    let Some(function) = node.child_by_field_name("function") else {
        return;
    };

    if function.kind() == "identifier" {
        let name = node_text(function, source);
        if INJECTION_SINKS.contains(&name) {
            findings.push(ScanFinding {
                line: node.start_position().row + 1,
                message: format!("call to '{name}' permits code injection"),
            });
        }
        return;
    }

    // subprocess-style `something.run(..., shell=True)`
    if function.kind() == "attribute" {
        let is_run = function
            .child_by_field_name("attribute")
            .map(|a| node_text(a, source) == "run")
            .unwrap_or(false);
        if is_run && has_shell_true(node, source) {
            findings.push(ScanFinding {
                line: node.start_position().row + 1,
                message: "subprocess invoked with shell=True".to_string(),
            });
        }
    }
}

fn has_shell_true(call: Node, source: &str) -> bool {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return false;
    };

    let mut cursor = arguments.walk();
    let found = arguments.named_children(&mut cursor).any(|arg| {
        arg.kind() == "keyword_argument"
            && arg
                .child_by_field_name("name")
                .map(|n| node_text(n, source) == "shell")
                .unwrap_or(false)
            && arg
                .child_by_field_name("value")
                .map(|v| node_text(v, source) == "True")
                .unwrap_or(false)
    });
    found
}
