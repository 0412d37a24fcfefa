// src/refactor.rs
//! Unused-import pruning.
//!
//! Rewrites import statements whose bound names appear in the
//! unused-import set, deleting a statement entirely when nothing on it
//! survives. Matching is by the locally bound identity: the alias when one
//! is present, otherwise the recorded name. Splicing is statement-granular
//! and line-based; every byte outside rewritten statements is untouched.

use crate::error::Result;
use crate::parse::{self, children_with_field, line_span, node_text};
use crate::walk::{walk, Flow, Step};
use std::collections::HashSet;
use tree_sitter::Node;

/// Outcome of a pruning pass.
#[derive(Debug, Clone)]
pub struct PruneResult {
    /// The rewritten source. Identical to the input when nothing matched.
    pub source: String,
    /// Bound names actually removed, in statement order.
    pub removed: Vec<String>,
}

impl PruneResult {
    /// Whether the pass changed anything.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.removed.is_empty()
    }
}

struct Edit {
    start_line: usize,
    end_line: usize,
    /// Replacement line, or None to delete the span.
    replacement: Option<String>,
}

/// Removes imports whose bound names are in `unused`.
///
/// # Errors
/// Returns error when the source cannot be parsed.
pub fn remove_unused_imports(source: &str, unused: &HashSet<String>) -> Result<PruneResult> {
    let tree = parse::parse_module(source)?;
    let mut edits: Vec<Edit> = Vec::new();
    let mut removed: Vec<String> = Vec::new();

    walk(tree.root_node(), |node, step| {
        if step == Step::Enter
            && matches!(node.kind(), "import_statement" | "import_from_statement")
        {
            if let Some(edit) = plan_edit(node, source, unused, &mut removed) {
                edits.push(edit);
            }
            return Flow::SkipChildren;
        }
        Flow::Continue
    });

    if edits.is_empty() {
        return Ok(PruneResult {
            source: source.to_string(),
            removed,
        });
    }

    let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    // Apply bottom-up so earlier spans stay valid.
    edits.sort_by(|a, b| b.start_line.cmp(&a.start_line));
    for edit in edits {
        let start = edit.start_line - 1;
        let end = edit.end_line.min(lines.len());
        match edit.replacement {
            Some(replacement) => {
                lines.splice(start..end, std::iter::once(replacement));
            }
            None => {
                lines.splice(start..end, std::iter::empty());
            }
        }
    }

    Ok(PruneResult {
        source: lines.join("\n"),
        removed,
    })
}

fn plan_edit(
    statement: Node,
    source: &str,
    unused: &HashSet<String>,
    removed: &mut Vec<String>,
) -> Option<Edit> {
    // `from x import *` binds nothing trackable; leave it alone.
    if contains_wildcard(statement) {
        return None;
    }

    let from_style = statement.kind() == "import_from_statement";
    let entities = children_with_field(statement, "name");
    if entities.is_empty() {
        return None;
    }

    let mut kept: Vec<&str> = Vec::new();
    let mut dropped: Vec<String> = Vec::new();
    for entity in &entities {
        match bound_name(*entity, from_style, source) {
            Some(bound) if unused.contains(bound) => dropped.push(bound.to_string()),
            _ => kept.push(node_text(*entity, source)),
        }
    }

    if dropped.is_empty() {
        return None;
    }
    removed.extend(dropped);

    let (start_line, end_line) = line_span(statement);
    if kept.is_empty() {
        return Some(Edit {
            start_line,
            end_line,
            replacement: None,
        });
    }

    let indent = indentation_of(source, start_line);
    let replacement = if from_style {
        let module = statement
            .child_by_field_name("module_name")
            .map(|m| node_text(m, source))
            .unwrap_or("");
        format!("{indent}from {module} import {}", kept.join(", "))
    } else {
        format!("{indent}import {}", kept.join(", "))
    };

    Some(Edit {
        start_line,
        end_line,
        replacement: Some(replacement),
    })
}

/// The locally bound identity of one import entity: the alias when present,
/// otherwise the top-level segment for direct imports and the last segment
/// for from-imports — mirroring what the analyzer records, so pruning and
/// detection always agree.
fn bound_name<'s>(entity: Node, from_style: bool, source: &'s str) -> Option<&'s str> {
    match entity.kind() {
        "aliased_import" => entity
            .child_by_field_name("alias")
            .map(|alias| node_text(alias, source)),
        "dotted_name" => {
            let count = entity.named_child_count();
            let segment = if count == 0 {
                return Some(node_text(entity, source));
            } else if from_style {
                entity.named_child(count - 1)
            } else {
                entity.named_child(0)
            };
            segment.map(|s| node_text(s, source))
        }
        _ => None,
    }
}

fn contains_wildcard(statement: Node) -> bool {
    let mut cursor = statement.walk();
    let found = statement
        .named_children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import");
    found
}

fn indentation_of(source: &str, line: usize) -> String {
    source
        .split('\n')
        .nth(line - 1)
        .map(|l| {
            l.chars()
                .take_while(|c| c.is_whitespace())
                .collect::<String>()
        })
        .unwrap_or_default()
}
