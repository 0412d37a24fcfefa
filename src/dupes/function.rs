// src/dupes/function.rs
//! Function-level duplicate detector. Candidate blocks are whole function
//! bodies located through the syntax tree; the comparison pipeline is the
//! same one the line-window detector uses.

use crate::config::DuplicateConfig;
use crate::dupes::pipeline;
use crate::dupes::similarity::content_hash;
use crate::dupes::types::{CodeBlock, DuplicateReport};
use crate::parse::line_span;
use crate::walk::{walk, Flow, Step};
use tree_sitter::Tree;

/// Detects duplicated functions by exact line span.
#[derive(Debug, Clone)]
pub struct FunctionDetector {
    min_function_size: usize,
    similarity_threshold: f64,
}

impl Default for FunctionDetector {
    fn default() -> Self {
        Self::from_config(&DuplicateConfig::default())
    }
}

impl FunctionDetector {
    #[must_use]
    pub fn from_config(config: &DuplicateConfig) -> Self {
        Self {
            min_function_size: config.min_function_size,
            similarity_threshold: config.similarity_threshold,
        }
    }

    /// Runs detection over a parsed module and its source text.
    #[must_use]
    pub fn detect(&self, tree: &Tree, source: &str) -> DuplicateReport {
        let raw: Vec<&str> = source.split('\n').collect();
        let total_lines = raw.len();

        let blocks = extract_functions(tree, &raw, self.min_function_size);
        pipeline::build_report(&blocks, self.similarity_threshold, total_lines)
    }
}

/// One `CodeBlock` per function definition spanning at least `min_size`
/// lines. Nested functions produce their own blocks in addition to their
/// parent's.
fn extract_functions(tree: &Tree, raw_lines: &[&str], min_size: usize) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();

    walk(tree.root_node(), |node, step| {
        if step == Step::Enter && node.kind() == "function_definition" {
            let (start_line, end_line) = line_span(node);
            let span = end_line.saturating_sub(start_line) + 1;
            if span >= min_size && end_line <= raw_lines.len() {
                let content = raw_lines[start_line - 1..end_line].join("\n");
                let hash = content_hash(&content);
                blocks.push(CodeBlock {
                    start_line,
                    end_line,
                    content,
                    hash,
                });
            }
        }
        Flow::Continue
    });

    blocks
}
