// src/metrics/score.rs
//! Turns a completed traversal into the public per-file report, including
//! the composite quality score.

use crate::metrics::records::{ClassRecord, FunctionRecord};
use crate::metrics::visitor::MetricsState;
use serde::Serialize;

/// Complexity above this value starts drawing a penalty.
const COMPLEXITY_LIMIT: usize = 10;
const COMPLEXITY_PENALTY_CAP: i64 = 30;
/// Nesting above this depth starts drawing a penalty.
const NESTING_LIMIT: usize = 4;
const NESTING_PENALTY_CAP: i64 = 15;
const UNUSED_IMPORT_PENALTY_CAP: i64 = 10;
/// Annotation coverage below this percentage draws a penalty.
const COVERAGE_FLOOR: f64 = 50.0;

/// The complete analysis result for one source file. This field set is the
/// stable boundary exporters and aggregators depend on.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub cyclomatic_complexity: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub max_nesting_depth: usize,
    /// Imported-but-unreferenced names, in declaration order.
    pub unused_imports: Vec<String>,
    pub functions_missing_return_annotation: usize,
    pub functions_missing_param_annotation: usize,
    pub total_functions: usize,
    /// Percentage of functions that are annotation-complete, 0-100.
    pub annotation_coverage: f64,
    pub line_count: usize,
    pub comment_count: usize,
    /// Composite score, 0-100.
    pub quality_score: u32,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
}

/// Builds the report from raw counters and the raw source text.
#[must_use]
pub fn aggregate(state: MetricsState, source: &str) -> FileReport {
    let lines: Vec<&str> = source.split('\n').collect();
    let line_count = lines.len();
    let comment_count = lines
        .iter()
        .filter(|line| line.trim_start().starts_with('#'))
        .count();

    let annotation_coverage = if state.total_functions > 0 {
        state.annotated_functions as f64 / state.total_functions as f64 * 100.0
    } else {
        0.0
    };

    let unused_imports = state.unused_imports();
    let quality_score = quality_score(
        state.complexity,
        state.max_nesting_depth,
        unused_imports.len(),
        annotation_coverage,
        state.total_functions,
    );

    FileReport {
        cyclomatic_complexity: state.complexity,
        function_count: state.function_count,
        class_count: state.class_count,
        max_nesting_depth: state.max_nesting_depth,
        unused_imports,
        functions_missing_return_annotation: state.functions_missing_return_annotation,
        functions_missing_param_annotation: state.functions_missing_param_annotation,
        total_functions: state.total_functions,
        annotation_coverage,
        line_count,
        comment_count,
        quality_score,
        functions: state.functions,
        classes: state.classes,
    }
}

/// Composite 0-100 score. Independent, capped deductions applied in a fixed
/// order: complexity, nesting, unused imports, annotation coverage. The
/// order is part of the contract; reordering changes nothing arithmetically
/// today but the sequence is what downstream score reproductions pin.
fn quality_score(
    complexity: usize,
    max_nesting: usize,
    unused_imports: usize,
    coverage: f64,
    total_functions: usize,
) -> u32 {
    let mut score: i64 = 100;

    if complexity > COMPLEXITY_LIMIT {
        let over = (complexity - COMPLEXITY_LIMIT) as i64;
        score -= (over * 2).min(COMPLEXITY_PENALTY_CAP);
    }

    if max_nesting > NESTING_LIMIT {
        let over = (max_nesting - NESTING_LIMIT) as i64;
        score -= (over * 3).min(NESTING_PENALTY_CAP);
    }

    score -= (unused_imports as i64 * 2).min(UNUSED_IMPORT_PENALTY_CAP);

    // A unit with no functions has nothing to annotate; it takes no
    // coverage penalty, so an empty file keeps a full score.
    if total_functions > 0 && coverage < COVERAGE_FLOOR {
        score -= ((COVERAGE_FLOOR - coverage) * 0.3).floor() as i64;
    }

    score.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::quality_score;

    #[test]
    fn no_penalties_is_full_score() {
        assert_eq!(quality_score(1, 0, 0, 100.0, 1), 100);
    }

    #[test]
    fn empty_unit_takes_no_annotation_penalty() {
        assert_eq!(quality_score(1, 0, 0, 0.0, 0), 100);
    }

    #[test]
    fn complexity_penalty_is_capped() {
        // 2 points over the limit.
        assert_eq!(quality_score(12, 0, 0, 100.0, 1), 96);
        // Far over the limit: capped at 30.
        assert_eq!(quality_score(100, 0, 0, 100.0, 1), 70);
    }

    #[test]
    fn nesting_penalty_is_capped() {
        assert_eq!(quality_score(1, 5, 0, 100.0, 1), 97);
        assert_eq!(quality_score(1, 40, 0, 100.0, 1), 85);
    }

    #[test]
    fn unused_import_penalty_is_capped() {
        assert_eq!(quality_score(1, 0, 1, 100.0, 1), 98);
        assert_eq!(quality_score(1, 0, 50, 100.0, 1), 90);
    }

    #[test]
    fn annotation_penalty_truncates() {
        // (50 - 0) * 0.3 = 15
        assert_eq!(quality_score(1, 0, 0, 0.0, 2), 85);
        // (50 - 49) * 0.3 = 0.3 -> 0
        assert_eq!(quality_score(1, 0, 0, 49.0, 2), 100);
    }

    #[test]
    fn score_never_goes_negative() {
        assert_eq!(quality_score(100, 40, 50, 0.0, 10), 30);
        // All caps together: 30 + 15 + 10 + 15 = 70, still >= 0.
        assert!(quality_score(1000, 1000, 1000, 0.0, 1000) <= 100);
    }
}
