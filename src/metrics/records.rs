// src/metrics/records.rs
//! Per-function and per-class records produced by the structural visitor.

use serde::Serialize;

/// Metrics for a single function or method.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionRecord {
    /// Function name.
    pub name: String,
    /// 1-based line where the definition starts.
    pub start_line: usize,
    /// 1-based line where the definition ends.
    pub end_line: usize,
    /// Cyclomatic complexity contributed by this function's body,
    /// starting at 1 for the function itself.
    pub complexity: usize,
    /// Number of declared parameters (splat forms excluded).
    pub param_count: usize,
    /// Parameters lacking a type annotation, `self` excluded.
    pub params_without_annotation: usize,
    /// Whether a return type annotation is declared.
    pub has_return_annotation: bool,
    /// Whether the body opens with a documentation string.
    pub has_docstring: bool,
    /// Distinct local bindings assigned in the body.
    pub local_var_count: usize,
}

impl FunctionRecord {
    /// Number of source lines spanned by the definition. Always >= 1.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Whether the function exceeds the configured length threshold.
    #[must_use]
    pub fn is_long(&self, max_lines: usize) -> bool {
        self.line_count() > max_lines
    }

    /// Whether the function exceeds the configured parameter threshold.
    #[must_use]
    pub fn has_many_params(&self, max_params: usize) -> bool {
        self.param_count > max_params
    }
}

/// Metrics for a single class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassRecord {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    /// Number of methods defined directly in the class body.
    pub method_count: usize,
    /// Cyclomatic complexity accumulated across the class body.
    pub complexity: usize,
    pub has_docstring: bool,
    /// Records for the class's methods, in definition order.
    pub methods: Vec<FunctionRecord>,
}

impl ClassRecord {
    /// Number of source lines spanned by the class.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }
}
