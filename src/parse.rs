// src/parse.rs
//! Thin boundary over tree-sitter: turn Python source text into a
//! traversable tree and expose node positions as 1-based line spans.

use crate::error::{ProbeError, Result};
use tree_sitter::{Node, Parser, Tree};

/// Parses a Python module into a syntax tree.
///
/// # Errors
/// Returns `ProbeError::Grammar` if the bundled grammar cannot be loaded and
/// `ProbeError::Parse` if the source does not form a valid module. Callers
/// downstream assume a well-formed tree, so syntax errors are rejected here
/// rather than surfacing as half-analyzed reports.
pub fn parse_module(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(tree_sitter_python::language())
        .map_err(|e| ProbeError::Grammar(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ProbeError::Parse("tree-sitter produced no tree".to_string()))?;

    if tree.root_node().has_error() {
        return Err(ProbeError::Parse("source contains syntax errors".to_string()));
    }

    Ok(tree)
}

/// 1-based (start, end) line span of a node.
#[must_use]
pub fn line_span(node: Node) -> (usize, usize) {
    (
        node.start_position().row + 1,
        node.end_position().row + 1,
    )
}

/// Source text covered by a node. Empty on (unexpected) non-UTF-8 slices.
#[must_use]
pub fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Children of `node` carrying the given field name, in order.
#[must_use]
pub fn children_with_field<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    if cursor.goto_first_child() {
        loop {
            if cursor.field_name() == Some(field) {
                out.push(cursor.node());
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    out
}

/// First named child that is not a comment. Python attaches comments as
/// extra nodes inside blocks, so "first statement" must skip them.
#[must_use]
pub fn first_statement(block: Node) -> Option<Node> {
    let mut cursor = block.walk();
    let found = block
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment");
    found
}
