// src/report.rs
//! Terminal rendering of analysis and duplicate reports. Pure formatting:
//! every function returns a string and leaves printing to the caller.

use crate::config::Thresholds;
use crate::dupes::{DuplicateKind, DuplicateReport};
use crate::history::HistoryEntry;
use crate::metrics::FileReport;
use crate::scan::ScanFinding;
use colored::Colorize;
use std::fmt::Write;

/// Marker appended when duplication exceeds 10%.
pub const HIGH_DUPLICATION_MARKER: &str = "high duplication";
/// Marker for duplication in (5%, 10%].
pub const MODERATE_DUPLICATION_MARKER: &str = "moderate duplication";
/// Marker for duplication at or below 5%.
pub const LOW_DUPLICATION_MARKER: &str = "low duplication";

/// Renders the per-file metrics report.
#[must_use]
pub fn render_file_report(
    label: &str,
    report: &FileReport,
    thresholds: &Thresholds,
    show_functions: bool,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} {label}", "Quality report:".bold());

    let score = report.quality_score;
    let score_text = format!("{score}/100");
    let rendered_score = match score {
        80..=100 => score_text.green().bold(),
        60..=79 => score_text.yellow(),
        _ => score_text.red().bold(),
    };
    let _ = writeln!(out, "  score                {rendered_score}");

    let _ = writeln!(
        out,
        "  complexity           {}",
        report.cyclomatic_complexity
    );
    let _ = writeln!(out, "  max nesting          {}", report.max_nesting_depth);
    let _ = writeln!(
        out,
        "  functions / classes  {} / {}",
        report.function_count, report.class_count
    );
    let _ = writeln!(
        out,
        "  lines / comments     {} / {}",
        report.line_count, report.comment_count
    );
    let _ = writeln!(
        out,
        "  annotation coverage  {:.1}%  ({} missing return, {} missing params)",
        report.annotation_coverage,
        report.functions_missing_return_annotation,
        report.functions_missing_param_annotation
    );

    if report.unused_imports.is_empty() {
        let _ = writeln!(out, "  unused imports       {}", "none".green());
    } else {
        let _ = writeln!(
            out,
            "  unused imports       {}",
            report.unused_imports.join(", ").yellow()
        );
    }

    if show_functions && !report.functions.is_empty() {
        let _ = writeln!(out, "\n{}", "Functions:".bold());
        for function in &report.functions {
            let mut flags: Vec<&str> = Vec::new();
            if function.is_long(thresholds.long_function_lines) {
                flags.push("long");
            }
            if function.has_many_params(thresholds.max_function_params) {
                flags.push("many params");
            }
            if !function.has_docstring {
                flags.push("no docstring");
            }
            let flag_text = if flags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", flags.join(", ")).yellow().to_string()
            };
            let _ = writeln!(
                out,
                "  {:<30} lines {:>4}-{:<4} complexity {:>3}{flag_text}",
                function.name, function.start_line, function.end_line, function.complexity
            );
        }
    }

    out
}

/// Renders a duplicate-detection report, listing at most `max_pairs` pairs.
#[must_use]
pub fn render_duplicate_report(report: &DuplicateReport, max_pairs: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "Duplicate scan".bold());
    let _ = writeln!(out, "  candidate blocks  {}", report.total_blocks);
    let _ = writeln!(out, "  exact pairs       {}", report.exact_duplicates);
    let _ = writeln!(out, "  similar pairs     {}", report.similar_duplicates);
    let _ = writeln!(
        out,
        "  duplicated lines  {} / {}  ({:.1}%)",
        report.duplicate_lines, report.total_lines, report.duplicate_percentage
    );

    for (index, pair) in report.duplicate_pairs.iter().take(max_pairs).enumerate() {
        let tag = match pair.kind {
            DuplicateKind::Exact => "exact".red().bold(),
            DuplicateKind::Similar => "similar".yellow(),
        };
        let _ = writeln!(
            out,
            "  #{:<3} {tag}  {:.0}%  lines {}-{}  <->  lines {}-{}",
            index + 1,
            pair.similarity * 100.0,
            pair.block1.start_line,
            pair.block1.end_line,
            pair.block2.start_line,
            pair.block2.end_line
        );
    }
    let hidden = report.duplicate_pairs.len().saturating_sub(max_pairs);
    if hidden > 0 {
        let _ = writeln!(out, "  ... {hidden} more pairs not shown");
    }

    let marker = duplication_marker(report.duplicate_percentage);
    let _ = writeln!(out, "{marker}");

    out
}

/// The verdict line for a duplication percentage.
#[must_use]
pub fn duplication_marker(percentage: f64) -> String {
    if percentage > 10.0 {
        format!(
            "{} {HIGH_DUPLICATION_MARKER} ({percentage:.1}%), refactoring recommended",
            "WARN".red().bold()
        )
    } else if percentage > 5.0 {
        format!(
            "{} {MODERATE_DUPLICATION_MARKER} ({percentage:.1}%)",
            "NOTE".yellow().bold()
        )
    } else {
        format!(
            "{} {LOW_DUPLICATION_MARKER} ({percentage:.1}%)",
            "OK".green().bold()
        )
    }
}

/// Renders scanner findings.
#[must_use]
pub fn render_findings(findings: &[ScanFinding]) -> String {
    if findings.is_empty() {
        return format!("{} no hazard patterns found\n", "OK".green().bold());
    }

    let mut out = String::new();
    for finding in findings {
        let _ = writeln!(
            out,
            "{} line {:>4}: {}",
            "WARN".yellow().bold(),
            finding.line,
            finding.message
        );
    }
    out
}

/// Renders the revision history table, oldest first.
#[must_use]
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "no revisions found\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", "History".bold());
    for entry in entries {
        let _ = writeln!(
            out,
            "  [{}] {}  score {:>3}  complexity {:>3}",
            entry.date, entry.commit, entry.score, entry.complexity
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_tiers() {
        assert!(duplication_marker(25.0).contains(HIGH_DUPLICATION_MARKER));
        assert!(duplication_marker(10.0).contains(MODERATE_DUPLICATION_MARKER));
        assert!(duplication_marker(7.5).contains(MODERATE_DUPLICATION_MARKER));
        assert!(duplication_marker(5.0).contains(LOW_DUPLICATION_MARKER));
        assert!(duplication_marker(0.0).contains(LOW_DUPLICATION_MARKER));
    }
}
