// tests/integration_history.rs
use codeprobe_core::history;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const V1: &str = "def f():\n    return 1\n";
const V2: &str = "def f(x):\n    if x:\n        return 1\n    return 2\n";

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args([
            "-c",
            "user.name=codeprobe-test",
            "-c",
            "user.email=codeprobe@example.com",
        ])
        .args(args)
        .status()
        .expect("git must be runnable");
    assert!(status.success(), "git {args:?} failed");
}

fn seed_repo(dir: &Path) {
    git(dir, &["init", "--quiet"]);
    fs::write(dir.join("module.py"), V1).unwrap();
    git(dir, &["add", "module.py"]);
    git(dir, &["commit", "--quiet", "-m", "first"]);
    fs::write(dir.join("module.py"), V2).unwrap();
    git(dir, &["add", "module.py"]);
    git(dir, &["commit", "--quiet", "-m", "second"]);
}

#[test]
fn walks_revisions_oldest_first() {
    let dir = TempDir::new().unwrap();
    seed_repo(dir.path());

    let entries = history::file_history(dir.path(), Path::new("module.py"), 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].complexity, 1);
    assert_eq!(entries[1].complexity, 2);
    assert!(entries.iter().all(|e| e.score <= 100));
    assert!(entries.iter().all(|e| !e.commit.is_empty()));
}

#[test]
fn limit_caps_the_walk() {
    let dir = TempDir::new().unwrap();
    seed_repo(dir.path());

    let entries = history::file_history(dir.path(), Path::new("module.py"), 1).unwrap();
    // Newest revision only.
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].complexity, 2);
}

#[test]
fn unknown_file_yields_no_entries() {
    let dir = TempDir::new().unwrap();
    seed_repo(dir.path());

    let entries = history::file_history(dir.path(), Path::new("missing.py"), 10).unwrap();
    assert!(entries.is_empty());
}
