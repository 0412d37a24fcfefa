// src/dupes/block.rs
//! Line-window duplicate detector. Works purely on line text, no tree.

use crate::config::DuplicateConfig;
use crate::dupes::pipeline;
use crate::dupes::similarity::content_hash;
use crate::dupes::types::{CodeBlock, DuplicateReport};

/// Detects duplicated regions by hashing and comparing every contiguous
/// line window between the configured minimum size and the window cap.
#[derive(Debug, Clone)]
pub struct BlockDetector {
    min_block_size: usize,
    max_window: usize,
    similarity_threshold: f64,
    ignore_comments: bool,
    ignore_whitespace: bool,
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::from_config(&DuplicateConfig::default())
    }
}

impl BlockDetector {
    #[must_use]
    pub fn from_config(config: &DuplicateConfig) -> Self {
        Self {
            min_block_size: config.min_block_size,
            max_window: config.max_window,
            similarity_threshold: config.similarity_threshold,
            ignore_comments: config.ignore_comments,
            ignore_whitespace: config.ignore_whitespace,
        }
    }

    /// Runs detection over raw source text.
    #[must_use]
    pub fn detect(&self, source: &str) -> DuplicateReport {
        let raw: Vec<&str> = source.split('\n').collect();
        let total_lines = raw.len();

        let mut lines: Vec<String> = raw.iter().map(|line| (*line).to_string()).collect();
        if self.ignore_comments {
            lines = strip_comment_lines(lines);
        }
        if self.ignore_whitespace {
            for line in &mut lines {
                *line = line.trim().to_string();
            }
        }

        let blocks = extract_windows(&lines, self.min_block_size, self.max_window);
        pipeline::build_report(&blocks, self.similarity_threshold, total_lines)
    }
}

/// Drops `#` comment lines and triple-quote-delimited regions. The toggle
/// lines themselves are dropped too. This is a line heuristic, not a parse:
/// a triple quote anywhere on a line flips the region state.
fn strip_comment_lines(lines: Vec<String>) -> Vec<String> {
    let mut result = Vec::with_capacity(lines.len());
    let mut in_block_comment = false;

    for line in lines {
        let stripped = line.trim();
        if stripped.contains("\"\"\"") || stripped.contains("'''") {
            in_block_comment = !in_block_comment;
            continue;
        }
        if in_block_comment {
            continue;
        }
        if stripped.starts_with('#') {
            continue;
        }
        result.push(line);
    }

    result
}

/// Every contiguous window whose size is in `[min_size, max_window]`,
/// anchored at every line. Line numbers index the (normalized) line list
/// handed in. The cap bounds candidate growth on long files.
fn extract_windows(lines: &[String], min_size: usize, max_window: usize) -> Vec<CodeBlock> {
    let n = lines.len();
    let mut blocks = Vec::new();
    if n < min_size || min_size == 0 {
        return blocks;
    }

    for start in 0..=(n - min_size) {
        let end_cap = (start + max_window).min(n);
        for end in (start + min_size)..=end_cap {
            let content = lines[start..end].join("\n");
            let hash = content_hash(&content);
            blocks.push(CodeBlock {
                start_line: start + 1,
                end_line: end,
                content,
                hash,
            });
        }
    }

    blocks
}
