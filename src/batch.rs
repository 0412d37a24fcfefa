// src/batch.rs
//! Directory analysis: discover Python files, analyze each in parallel,
//! aggregate a project summary. One analysis run per file with no shared
//! state, so per-file parallelism needs no synchronization.

use crate::config::BatchConfig;
use crate::error::{ProbeError, Result};
use crate::metrics::{self, FileReport};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never descended into.
const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    ".idea",
    "node_modules",
];

/// Per-file result: a full report, or the isolated failure that produced
/// none. One malformed file never aborts the batch.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Report(FileReport),
    Error { error: String },
}

/// Project-level rollup across successfully analyzed files.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub average_quality_score: f64,
    pub best_file: String,
    pub best_file_score: u32,
    pub worst_file: String,
    pub worst_file_score: u32,
    pub total_functions: usize,
    pub total_classes: usize,
    pub total_lines: usize,
}

/// The complete batch result.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub directory: String,
    /// Python files discovered.
    pub total_files: usize,
    /// Files that produced a report.
    pub analyzed_files: usize,
    /// None when nothing was analyzed.
    pub summary: Option<ProjectSummary>,
    pub files: BTreeMap<String, FileOutcome>,
}

/// Analyzes every Python file under `directory`.
///
/// # Errors
/// Returns error when the directory is invalid or a configured filter
/// pattern fails to compile. Per-file failures land in the report instead.
pub fn analyze_directory(directory: &Path, config: &BatchConfig) -> Result<ProjectReport> {
    if !directory.is_dir() {
        return Err(ProbeError::Config(format!(
            "{} is not a directory",
            directory.display()
        )));
    }

    let include = compile_patterns(&config.include)?;
    let exclude = compile_patterns(&config.exclude)?;
    let files = discover_python_files(directory, config.recursive, &include, &exclude);
    let total_files = files.len();

    let outcomes: Vec<(String, FileOutcome)> = files
        .par_iter()
        .map(|path| {
            let label = path.display().to_string();
            (label, analyze_one(path))
        })
        .collect();

    let analyzed_files = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, FileOutcome::Report(_)))
        .count();
    let summary = summarize(&outcomes, analyzed_files);

    Ok(ProjectReport {
        directory: directory.display().to_string(),
        total_files,
        analyzed_files,
        summary,
        files: outcomes.into_iter().collect(),
    })
}

fn analyze_one(path: &Path) -> FileOutcome {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return FileOutcome::Error { error: e.to_string() },
    };
    match metrics::analyze(&source) {
        Ok(report) => FileOutcome::Report(report),
        Err(e) => FileOutcome::Error { error: e.to_string() },
    }
}

fn discover_python_files(
    directory: &Path,
    recursive: bool,
    include: &[Regex],
    exclude: &[Regex],
) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(directory).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().is_dir() && EXCLUDED_DIRS.contains(&name.as_ref()))
        })
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "py"))
        .filter(|path| matches_filters(path, include, exclude))
        .collect();

    files.sort();
    files
}

fn matches_filters(path: &Path, include: &[Regex], exclude: &[Regex]) -> bool {
    // Forward slashes so patterns behave the same cross-platform.
    let normalized = path.to_string_lossy().replace('\\', "/");
    if !include.is_empty() && !include.iter().any(|re| re.is_match(&normalized)) {
        return false;
    }
    !exclude.iter().any(|re| re.is_match(&normalized))
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ProbeError::Config(format!("bad pattern '{p}': {e}")))
        })
        .collect()
}

fn summarize(outcomes: &[(String, FileOutcome)], analyzed: usize) -> Option<ProjectSummary> {
    if analyzed == 0 {
        return None;
    }

    let mut score_sum = 0u64;
    let mut total_functions = 0;
    let mut total_classes = 0;
    let mut total_lines = 0;
    let mut best: Option<(&str, u32)> = None;
    let mut worst: Option<(&str, u32)> = None;

    for (label, outcome) in outcomes {
        let FileOutcome::Report(report) = outcome else {
            continue;
        };
        score_sum += u64::from(report.quality_score);
        total_functions += report.function_count;
        total_classes += report.class_count;
        total_lines += report.line_count;

        if best.map_or(true, |(_, s)| report.quality_score > s) {
            best = Some((label, report.quality_score));
        }
        if worst.map_or(true, |(_, s)| report.quality_score < s) {
            worst = Some((label, report.quality_score));
        }
    }

    let (best_file, best_file_score) = best?;
    let (worst_file, worst_file_score) = worst?;

    Some(ProjectSummary {
        average_quality_score: score_sum as f64 / analyzed as f64,
        best_file: best_file.to_string(),
        best_file_score,
        worst_file: worst_file.to_string(),
        worst_file_score,
        total_functions,
        total_classes,
        total_lines,
    })
}
