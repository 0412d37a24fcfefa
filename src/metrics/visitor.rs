// src/metrics/visitor.rs
//! Single-pass structural visitor.
//!
//! One traversal of the syntax tree accumulates every raw counter the
//! aggregator needs: cyclomatic complexity, nesting depth, per-function and
//! per-class records, imported names, and referenced identifiers.
//!
//! In-progress function/class records live on an explicit frame stack owned
//! by the traversal. Nothing outside the traversal can observe a
//! half-built record.

use crate::metrics::records::{ClassRecord, FunctionRecord};
use crate::parse::{children_with_field, first_statement, line_span, node_text};
use crate::walk::{walk, Flow, Step};
use std::collections::HashSet;
use tree_sitter::{Node, Tree};

/// Raw counters for one traversal. Constructed fresh per analysis run.
#[derive(Debug, Default)]
pub struct MetricsState {
    /// Whole-unit cyclomatic complexity, starting at 1.
    pub complexity: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub max_nesting_depth: usize,
    nesting: usize,
    /// Imported names in declaration order, deduplicated.
    pub imports: Vec<String>,
    import_set: HashSet<String>,
    /// Every identifier referenced outside import statements.
    pub used_names: HashSet<String>,
    pub functions_missing_return_annotation: usize,
    pub functions_missing_param_annotation: usize,
    pub total_functions: usize,
    pub annotated_functions: usize,
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
}

impl MetricsState {
    fn new() -> Self {
        Self {
            complexity: 1,
            ..Self::default()
        }
    }

    /// Current nesting depth. Zero before and after a balanced traversal.
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        self.nesting
    }

    /// Imported names never referenced elsewhere in the unit, in
    /// declaration order. Shadowing-unaware: any use of the name anywhere
    /// counts, so unused imports can be under-reported.
    #[must_use]
    pub fn unused_imports(&self) -> Vec<String> {
        self.imports
            .iter()
            .filter(|name| !self.used_names.contains(name.as_str()))
            .cloned()
            .collect()
    }

    fn enter_block(&mut self) {
        self.nesting += 1;
        if self.nesting > self.max_nesting_depth {
            self.max_nesting_depth = self.nesting;
        }
    }

    fn leave_block(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    fn record_import(&mut self, name: &str) {
        if self.import_set.insert(name.to_string()) {
            self.imports.push(name.to_string());
        }
    }
}

/// An in-progress record on the traversal's frame stack.
enum Frame {
    Function {
        record: FunctionRecord,
        locals: HashSet<String>,
    },
    Class(ClassRecord),
}

/// Runs the structural visitor over a parsed module.
#[must_use]
pub fn collect(tree: &Tree, source: &str) -> MetricsState {
    let mut state = MetricsState::new();
    let mut frames: Vec<Frame> = Vec::new();

    walk(tree.root_node(), |node, step| match step {
        Step::Enter => on_enter(&mut state, &mut frames, node, source),
        Step::Leave => {
            on_leave(&mut state, &mut frames, node);
            Flow::Continue
        }
    });

    state
}

fn on_enter(
    state: &mut MetricsState,
    frames: &mut Vec<Frame>,
    node: Node,
    source: &str,
) -> Flow {
    match node.kind() {
        // Each `elif` is its own decision point, same as the nested
        // conditional it desugars to.
        "if_statement" | "elif_clause" | "for_statement" | "while_statement" => {
            bump_complexity(state, frames);
            state.enter_block();
            if node.kind() == "for_statement" {
                record_bindings_from_field(frames, node, "left", source);
            }
            Flow::Continue
        }
        // Exception handling opens a scope but is not a branch under this
        // model.
        "try_statement" => {
            state.enter_block();
            Flow::Continue
        }
        "function_definition" => {
            enter_function(state, frames, node, source);
            state.enter_block();
            Flow::Continue
        }
        "class_definition" => {
            enter_class(state, frames, node, source);
            state.enter_block();
            Flow::Continue
        }
        // Import statements are processed wholesale and their name tokens
        // skipped, so a declaration never counts as its own usage.
        "import_statement" => {
            record_direct_imports(state, node, source);
            Flow::SkipChildren
        }
        "import_from_statement" => {
            record_from_imports(state, node, source);
            Flow::SkipChildren
        }
        "assignment" | "augmented_assignment" => {
            record_bindings_from_field(frames, node, "left", source);
            Flow::Continue
        }
        "named_expression" => {
            record_bindings_from_field(frames, node, "name", source);
            Flow::Continue
        }
        "identifier" => {
            state.used_names.insert(node_text(node, source).to_string());
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

fn on_leave(state: &mut MetricsState, frames: &mut Vec<Frame>, node: Node) {
    match node.kind() {
        "if_statement" | "elif_clause" | "for_statement" | "while_statement"
        | "try_statement" => state.leave_block(),
        "function_definition" => {
            state.leave_block();
            if let Some(Frame::Function { mut record, locals }) = frames.pop() {
                record.local_var_count = locals.len();
                // A definition whose nearest enclosing frame is a class is
                // one of its methods.
                if let Some(Frame::Class(class)) = frames.last_mut() {
                    class.method_count += 1;
                    class.methods.push(record.clone());
                }
                state.functions.push(record);
            }
        }
        "class_definition" => {
            state.leave_block();
            if let Some(Frame::Class(record)) = frames.pop() {
                state.classes.push(record);
            }
        }
        _ => {}
    }
}

/// +1 decision point: the whole unit, the innermost open function, and the
/// innermost open class all observe it.
fn bump_complexity(state: &mut MetricsState, frames: &mut [Frame]) {
    state.complexity += 1;

    let mut seen_function = false;
    let mut seen_class = false;
    for frame in frames.iter_mut().rev() {
        match frame {
            Frame::Function { record, .. } if !seen_function => {
                record.complexity += 1;
                seen_function = true;
            }
            Frame::Class(record) if !seen_class => {
                record.complexity += 1;
                seen_class = true;
            }
            _ => {}
        }
        if seen_function && seen_class {
            break;
        }
    }
}

struct ParamSummary {
    count: usize,
    missing: usize,
}

fn enter_function(state: &mut MetricsState, frames: &mut Vec<Frame>, node: Node, source: &str) {
    state.function_count += 1;
    state.total_functions += 1;

    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default();
    let (start_line, end_line) = line_span(node);

    let has_return_annotation = node.child_by_field_name("return_type").is_some();
    if !has_return_annotation {
        state.functions_missing_return_annotation += 1;
    }

    let params = summarize_params(node, source);
    if params.missing > 0 {
        state.functions_missing_param_annotation += 1;
    }

    // Annotation-complete: declared return type, and every annotatable
    // parameter annotated. A receiver-only signature with a return type
    // qualifies.
    if has_return_annotation && params.missing == 0 {
        state.annotated_functions += 1;
    }

    frames.push(Frame::Function {
        record: FunctionRecord {
            name,
            start_line,
            end_line,
            complexity: 1,
            param_count: params.count,
            params_without_annotation: params.missing,
            has_return_annotation,
            has_docstring: has_docstring(node),
            local_var_count: 0,
        },
        locals: HashSet::new(),
    });
}

fn enter_class(state: &mut MetricsState, frames: &mut Vec<Frame>, node: Node, source: &str) {
    state.class_count += 1;

    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default();
    let (start_line, end_line) = line_span(node);

    frames.push(Frame::Class(ClassRecord {
        name,
        start_line,
        end_line,
        method_count: 0,
        complexity: 1,
        has_docstring: has_docstring(node),
        methods: Vec::new(),
    }));
}

fn summarize_params(func: Node, source: &str) -> ParamSummary {
    let mut summary = ParamSummary { count: 0, missing: 0 };
    let Some(params) = func.child_by_field_name("parameters") else {
        return summary;
    };

    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        let (name, annotated) = match child.kind() {
            "identifier" => (node_text(child, source), false),
            "default_parameter" => (field_text(child, "name", source), false),
            "typed_default_parameter" => (field_text(child, "name", source), true),
            "typed_parameter" => {
                // `*args: T` / `**kwargs: T` are splat forms, not
                // annotatable parameters.
                match child.named_child(0) {
                    Some(inner) if inner.kind() == "identifier" => {
                        (node_text(inner, source), true)
                    }
                    _ => continue,
                }
            }
            _ => continue,
        };

        summary.count += 1;
        if name != "self" && !annotated {
            summary.missing += 1;
        }
    }

    summary
}

fn field_text<'s>(node: Node, field: &str, source: &'s str) -> &'s str {
    node.child_by_field_name(field)
        .map(|n| node_text(n, source))
        .unwrap_or("")
}

/// Documentation presence: the first statement of the body is a bare string
/// expression.
fn has_docstring(def: Node) -> bool {
    let Some(body) = def.child_by_field_name("body") else {
        return false;
    };
    match first_statement(body) {
        Some(stmt) if stmt.kind() == "expression_statement" => stmt
            .named_child(0)
            .is_some_and(|e| matches!(e.kind(), "string" | "concatenated_string")),
        _ => false,
    }
}

fn record_direct_imports(state: &mut MetricsState, node: Node, source: &str) {
    for entity in children_with_field(node, "name") {
        let dotted = match entity.kind() {
            "dotted_name" => Some(entity),
            // A direct aliased import still records the module name; the
            // binding identity only matters to the pruner.
            "aliased_import" => entity.child_by_field_name("name"),
            _ => None,
        };
        if let Some(name) = dotted.and_then(|d| dotted_segment(d, SegmentEnd::First)) {
            state.record_import(node_text(name, source));
        }
    }
}

fn record_from_imports(state: &mut MetricsState, node: Node, source: &str) {
    for entity in children_with_field(node, "name") {
        match entity.kind() {
            "dotted_name" => {
                if let Some(name) = dotted_segment(entity, SegmentEnd::Last) {
                    state.record_import(node_text(name, source));
                }
            }
            "aliased_import" => {
                if let Some(alias) = entity.child_by_field_name("alias") {
                    state.record_import(node_text(alias, source));
                }
            }
            // Wildcard imports bind no trackable name.
            _ => {}
        }
    }
}

#[derive(Clone, Copy)]
enum SegmentEnd {
    First,
    Last,
}

fn dotted_segment(dotted: Node, end: SegmentEnd) -> Option<Node> {
    let count = dotted.named_child_count();
    if count == 0 {
        // A single-segment name has no accessor to strip; the node is the
        // segment.
        return Some(dotted);
    }
    match end {
        SegmentEnd::First => dotted.named_child(0),
        SegmentEnd::Last => dotted.named_child(count - 1),
    }
}

/// Adds every plain identifier bound by an assignment target to the
/// innermost open function frame. Attribute and subscript stores are not
/// local bindings and are skipped wholesale.
fn record_bindings_from_field(frames: &mut [Frame], node: Node, field: &str, source: &str) {
    let Some(target) = node.child_by_field_name(field) else {
        return;
    };
    let Some(locals) = innermost_locals(frames) else {
        return;
    };

    let mut stack = vec![target];
    while let Some(n) = stack.pop() {
        match n.kind() {
            "identifier" => {
                locals.insert(node_text(n, source).to_string());
            }
            "attribute" | "subscript" => {}
            _ => {
                let mut cursor = n.walk();
                for child in n.children(&mut cursor) {
                    stack.push(child);
                }
            }
        }
    }
}

/// Nearest enclosing function's local set. A class frame in between means
/// the binding is a class attribute, not a function local.
fn innermost_locals(frames: &mut [Frame]) -> Option<&mut HashSet<String>> {
    for frame in frames.iter_mut().rev() {
        match frame {
            Frame::Function { locals, .. } => return Some(locals),
            Frame::Class(_) => return None,
        }
    }
    None
}
