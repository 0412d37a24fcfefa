// src/dupes/types.rs
//! Data types shared by both duplicate detectors.

use serde::Serialize;

/// A candidate region: a contiguous line window or a whole function body.
#[derive(Debug, Clone, Serialize)]
pub struct CodeBlock {
    /// 1-based first line of the region.
    pub start_line: usize,
    /// 1-based last line of the region, inclusive.
    pub end_line: usize,
    /// The region's text as extracted.
    pub content: String,
    /// SHA-256 hex digest of the normalized content.
    pub hash: String,
}

impl CodeBlock {
    /// Number of lines covered by the region.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}

/// How a pair of regions was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    /// Identical normalized content hashes.
    Exact,
    /// Different hashes, line-alignment similarity at or above threshold.
    Similar,
}

/// Two matched regions with their similarity score.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicatePair {
    pub block1: CodeBlock,
    pub block2: CodeBlock,
    /// Similarity in [0, 1]; always 1.0 for exact pairs.
    pub similarity: f64,
    pub kind: DuplicateKind,
}

/// Aggregate result of one detection run.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    /// Candidate blocks examined.
    pub total_blocks: usize,
    pub exact_duplicates: usize,
    pub similar_duplicates: usize,
    /// All reported pairs, exact pairs first.
    pub duplicate_pairs: Vec<DuplicatePair>,
    /// Distinct source lines covered by any reported pair.
    pub duplicate_lines: usize,
    /// Raw line count of the analyzed text.
    pub total_lines: usize,
    /// duplicate_lines / total_lines, as a percentage in [0, 100].
    pub duplicate_percentage: f64,
}
