// src/history.rs
//! Quality history: rerun the metrics engine against past revisions of a
//! file, oldest first. Shells out to `git`; a revision that fails to load
//! or parse is skipped rather than aborting the walk.

use crate::error::{ProbeError, Result};
use crate::metrics;
use serde::Serialize;
use std::path::Path;
use std::process::Command;

/// One analyzed revision.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// Abbreviated commit hash.
    pub commit: String,
    /// Author date, YYYY-MM-DD.
    pub date: String,
    pub complexity: usize,
    pub score: u32,
}

/// Analyzes up to `limit` past revisions of `file` (repo-relative path),
/// oldest first.
///
/// # Errors
/// Returns error when `git log` itself fails; individual revisions that
/// cannot be read or parsed are silently skipped.
pub fn file_history(repo_root: &Path, file: &Path, limit: usize) -> Result<Vec<HistoryEntry>> {
    let commits = list_commits(repo_root, file, limit)?;

    let mut entries = Vec::new();
    for (commit, date) in commits.into_iter().rev() {
        let Ok(content) = show_revision(repo_root, &commit, file) else {
            continue;
        };
        let Ok(report) = metrics::analyze(&content) else {
            continue;
        };
        entries.push(HistoryEntry {
            commit,
            date,
            complexity: report.cyclomatic_complexity,
            score: report.quality_score,
        });
    }

    Ok(entries)
}

/// Newest-first (hash, date) pairs for the file.
fn list_commits(repo_root: &Path, file: &Path, limit: usize) -> Result<Vec<(String, String)>> {
    let output = Command::new("git")
        .current_dir(repo_root)
        .args([
            "log",
            &format!("--max-count={limit}"),
            "--format=%h|%ad",
            "--date=short",
            "--",
        ])
        .arg(file)
        .output()
        .map_err(|e| ProbeError::Git(format!("failed to run git log: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::Git(format!("git log failed: {}", stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .filter_map(|line| {
            let (hash, date) = line.split_once('|')?;
            Some((hash.to_string(), date.to_string()))
        })
        .collect())
}

fn show_revision(repo_root: &Path, commit: &str, file: &Path) -> Result<String> {
    let spec = format!("{commit}:{}", file.display());
    let output = Command::new("git")
        .current_dir(repo_root)
        .args(["show", &spec])
        .output()
        .map_err(|e| ProbeError::Git(format!("failed to run git show: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProbeError::Git(format!(
            "git show {spec} failed: {}",
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| ProbeError::Git(format!("revision {spec} is not UTF-8: {e}")))
}
