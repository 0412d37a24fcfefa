// tests/integration_batch.rs
use codeprobe_core::batch::{self, FileOutcome};
use codeprobe_core::config::BatchConfig;
use codeprobe_core::{export, metrics};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CLEAN: &str = "def f(a: int) -> int:\n    return a + 1\n";
const BROKEN: &str = "def broken(:\n";

fn seed_project(dir: &Path) {
    fs::write(dir.join("good.py"), CLEAN).unwrap();
    fs::write(dir.join("bad.py"), BROKEN).unwrap();
    fs::write(dir.join("notes.txt"), "not python").unwrap();

    fs::create_dir(dir.join("pkg")).unwrap();
    fs::write(dir.join("pkg/inner.py"), CLEAN).unwrap();

    fs::create_dir(dir.join("__pycache__")).unwrap();
    fs::write(dir.join("__pycache__/cached.py"), CLEAN).unwrap();
}

#[test]
fn malformed_file_does_not_abort_the_batch() {
    let dir = TempDir::new().unwrap();
    seed_project(dir.path());

    let report = batch::analyze_directory(dir.path(), &BatchConfig::default()).unwrap();

    // __pycache__ pruned, notes.txt ignored.
    assert_eq!(report.total_files, 3);
    assert_eq!(report.analyzed_files, 2);

    let bad = report
        .files
        .iter()
        .find(|(path, _)| path.ends_with("bad.py"))
        .map(|(_, outcome)| outcome)
        .expect("bad.py present");
    assert!(matches!(bad, FileOutcome::Error { .. }));

    let summary = report.summary.expect("summary with successes");
    assert!(summary.average_quality_score > 0.0);
    assert_eq!(summary.total_functions, 2);
}

#[test]
fn non_recursive_mode_stays_at_top_level() {
    let dir = TempDir::new().unwrap();
    seed_project(dir.path());

    let config = BatchConfig {
        recursive: false,
        ..BatchConfig::default()
    };
    let report = batch::analyze_directory(dir.path(), &config).unwrap();
    assert_eq!(report.total_files, 2);
}

#[test]
fn exclude_patterns_filter_paths() {
    let dir = TempDir::new().unwrap();
    seed_project(dir.path());

    let config = BatchConfig {
        exclude: vec!["pkg/".to_string()],
        ..BatchConfig::default()
    };
    let report = batch::analyze_directory(dir.path(), &config).unwrap();
    assert_eq!(report.total_files, 2);
}

#[test]
fn empty_directory_has_no_summary() {
    let dir = TempDir::new().unwrap();
    let report = batch::analyze_directory(dir.path(), &BatchConfig::default()).unwrap();
    assert_eq!(report.total_files, 0);
    assert!(report.summary.is_none());
}

#[test]
fn file_report_json_carries_the_stable_field_set() {
    let report = metrics::analyze(CLEAN).unwrap();
    let json = export::to_json_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    for field in [
        "cyclomatic_complexity",
        "function_count",
        "class_count",
        "max_nesting_depth",
        "unused_imports",
        "functions_missing_return_annotation",
        "functions_missing_param_annotation",
        "total_functions",
        "annotation_coverage",
        "line_count",
        "comment_count",
        "quality_score",
        "functions",
        "classes",
    ] {
        assert!(value.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn project_report_exports_to_disk() {
    let dir = TempDir::new().unwrap();
    seed_project(dir.path());

    let report = batch::analyze_directory(dir.path(), &BatchConfig::default()).unwrap();
    let out = dir.path().join("report.json");
    export::write_json(&report, &out).unwrap();

    let raw = fs::read_to_string(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.get("summary").is_some());
    assert!(value.get("files").is_some());
    assert_eq!(value["analyzed_files"], 2);
}
