// src/metrics/mod.rs
//! Structural metrics: one traversal, one aggregation, one report.

pub mod records;
pub mod score;
pub mod visitor;

pub use records::{ClassRecord, FunctionRecord};
pub use score::FileReport;

use crate::error::Result;
use crate::parse;

/// Analyzes one Python source unit end to end.
///
/// # Errors
/// Returns error when the source cannot be parsed into a valid tree. A
/// valid tree always yields a complete report, never a partial one.
pub fn analyze(source: &str) -> Result<FileReport> {
    let tree = parse::parse_module(source)?;
    let state = visitor::collect(&tree, source);
    Ok(score::aggregate(state, source))
}
