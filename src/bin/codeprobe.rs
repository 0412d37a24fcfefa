// src/bin/codeprobe.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codeprobe_core::config::ProbeToml;
use codeprobe_core::dupes::{BlockDetector, FunctionDetector};
use codeprobe_core::{batch, export, history, metrics, parse, refactor, report, scan};
use colored::Colorize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "codeprobe", version, about = "Python code quality auditor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Config file (defaults to ./codeprobe.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one file: metrics, score, unused imports
    Analyze {
        file: PathBuf,
        /// Also list per-function details
        #[arg(long)]
        show_functions: bool,
        /// Export the report as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Detect duplicated code regions
    Dupes {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "block")]
        mode: DupeMode,
        /// Pairs to list in the terminal report
        #[arg(long, default_value = "10")]
        max_pairs: usize,
        /// Export the report as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Analyze every Python file in a directory
    Batch {
        dir: PathBuf,
        /// Do not recurse into subdirectories
        #[arg(long)]
        no_recursive: bool,
        /// Export the project report as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Score past revisions of a file (requires git)
    History {
        file: PathBuf,
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Scan for hazard patterns (mutable defaults, eval/exec, shell=True)
    Scan { file: PathBuf },
    /// Remove unused imports in place
    Fix {
        file: PathBuf,
        /// Show the rewrite without touching the file
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DupeMode {
    /// Sliding line windows
    Block,
    /// Whole function bodies
    Function,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ProbeToml::load(path)?,
        None => ProbeToml::discover()?,
    };

    match cli.command {
        Commands::Analyze {
            file,
            show_functions,
            json,
        } => analyze_cmd(&file, &config, show_functions, json.as_deref()),
        Commands::Dupes {
            file,
            mode,
            max_pairs,
            json,
        } => dupes_cmd(&file, &config, mode, max_pairs, json.as_deref()),
        Commands::Batch {
            dir,
            no_recursive,
            json,
        } => batch_cmd(&dir, &config, no_recursive, json.as_deref()),
        Commands::History { file, limit } => history_cmd(&file, limit),
        Commands::Scan { file } => scan_cmd(&file),
        Commands::Fix { file, dry_run } => fix_cmd(&file, dry_run),
    }
}

fn read_source(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))
}

fn analyze_cmd(
    file: &Path,
    config: &ProbeToml,
    show_functions: bool,
    json: Option<&Path>,
) -> Result<()> {
    let source = read_source(file)?;
    let result = metrics::analyze(&source)?;

    print!(
        "{}",
        report::render_file_report(
            &file.display().to_string(),
            &result,
            &config.thresholds,
            show_functions,
        )
    );

    if let Some(path) = json {
        export::write_json(&result, path)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn dupes_cmd(
    file: &Path,
    config: &ProbeToml,
    mode: DupeMode,
    max_pairs: usize,
    json: Option<&Path>,
) -> Result<()> {
    let source = read_source(file)?;
    let result = match mode {
        DupeMode::Block => BlockDetector::from_config(&config.duplicates).detect(&source),
        DupeMode::Function => {
            let tree = parse::parse_module(&source)?;
            FunctionDetector::from_config(&config.duplicates).detect(&tree, &source)
        }
    };

    print!("{}", report::render_duplicate_report(&result, max_pairs));

    if let Some(path) = json {
        export::write_json(&result, path)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn batch_cmd(
    dir: &Path,
    config: &ProbeToml,
    no_recursive: bool,
    json: Option<&Path>,
) -> Result<()> {
    let mut batch_config = config.batch.clone();
    if no_recursive {
        batch_config.recursive = false;
    }

    let result = batch::analyze_directory(dir, &batch_config)?;

    println!(
        "{} {} of {} files analyzed in {}",
        "Batch:".bold(),
        result.analyzed_files,
        result.total_files,
        result.directory
    );
    if let Some(summary) = &result.summary {
        println!("  average score  {:.1}", summary.average_quality_score);
        println!(
            "  best           {} ({})",
            summary.best_file, summary.best_file_score
        );
        println!(
            "  worst          {} ({})",
            summary.worst_file, summary.worst_file_score
        );
        println!(
            "  totals         {} functions, {} classes, {} lines",
            summary.total_functions, summary.total_classes, summary.total_lines
        );
    }

    if let Some(path) = json {
        export::write_json(&result, path)?;
        println!("report written to {}", path.display());
    }
    Ok(())
}

fn history_cmd(file: &Path, limit: usize) -> Result<()> {
    let entries = history::file_history(Path::new("."), file, limit)?;
    print!("{}", report::render_history(&entries));
    Ok(())
}

fn scan_cmd(file: &Path) -> Result<()> {
    let source = read_source(file)?;
    let tree = parse::parse_module(&source)?;
    let findings = scan::scan(&tree, &source);
    print!("{}", report::render_findings(&findings));
    Ok(())
}

fn fix_cmd(file: &Path, dry_run: bool) -> Result<()> {
    let source = read_source(file)?;
    let analysis = metrics::analyze(&source)?;
    let unused: HashSet<String> = analysis.unused_imports.iter().cloned().collect();

    if unused.is_empty() {
        println!("{} no unused imports", "OK".green().bold());
        return Ok(());
    }

    let pruned = refactor::remove_unused_imports(&source, &unused)?;
    if !pruned.changed() {
        println!("{} nothing to rewrite", "OK".green().bold());
        return Ok(());
    }

    if dry_run {
        print!("{}", pruned.source);
    } else {
        std::fs::write(file, &pruned.source)
            .with_context(|| format!("cannot write {}", file.display()))?;
        println!(
            "{} removed {}",
            "Fixed:".green().bold(),
            pruned.removed.join(", ")
        );
    }
    Ok(())
}
