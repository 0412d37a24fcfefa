// tests/unit_metrics.rs
use codeprobe_core::metrics::visitor;
use codeprobe_core::metrics::{self, FileReport};
use codeprobe_core::parse;

fn analyze(code: &str) -> FileReport {
    metrics::analyze(code).expect("valid source must analyze")
}

#[test]
fn trivial_function_has_base_complexity() {
    let report = analyze("def f():\n    pass\n");
    assert_eq!(report.cyclomatic_complexity, 1);
    assert_eq!(report.function_count, 1);
    assert_eq!(report.total_functions, 1);
}

#[test]
fn single_conditional_adds_one() {
    let report = analyze("x = 1\nif x:\n    y = 2\n");
    assert_eq!(report.cyclomatic_complexity, 2);
}

#[test]
fn elif_counts_as_its_own_branch() {
    let code = "a = 1\nb = 2\nif a:\n    pass\nelif b:\n    pass\n";
    let report = analyze(code);
    assert_eq!(report.cyclomatic_complexity, 3);
}

#[test]
fn loops_add_complexity_try_does_not() {
    let code = "\
for i in range(3):
    pass
while False:
    pass
try:
    pass
except Exception:
    pass
";
    let report = analyze(code);
    // 1 base + for + while; try adds nesting only.
    assert_eq!(report.cyclomatic_complexity, 3);
    assert!(report.max_nesting_depth >= 1);
}

#[test]
fn nesting_depth_is_balanced_after_traversal() {
    let code = "\
def outer(a):
    if a:
        for i in a:
            while i:
                try:
                    i = i - 1
                except Exception:
                    break
    return a
";
    let tree = parse::parse_module(code).unwrap();
    let state = visitor::collect(&tree, code);
    assert_eq!(state.nesting_depth(), 0);
    // def + if + for + while + try
    assert_eq!(state.max_nesting_depth, 5);
}

#[test]
fn function_records_carry_their_own_complexity() {
    let code = "\
def f(x):
    if x:
        return 1
    return 2

def g(y):
    return y
";
    let report = analyze(code);
    assert_eq!(report.functions.len(), 2);
    assert_eq!(report.functions[0].name, "f");
    assert_eq!(report.functions[0].complexity, 2);
    assert_eq!(report.functions[1].complexity, 1);
    assert_eq!(report.cyclomatic_complexity, 2);
}

#[test]
fn function_spans_are_real_lines() {
    let code = "x = 0\n\ndef f():\n    return 1\n";
    let report = analyze(code);
    let f = &report.functions[0];
    assert_eq!(f.start_line, 3);
    assert_eq!(f.end_line, 4);
    assert_eq!(f.line_count(), 2);
}

#[test]
fn annotation_coverage_half() {
    let code = "\
def typed(a: int) -> int:
    return a

def untyped(b):
    return b
";
    let report = analyze(code);
    assert_eq!(report.total_functions, 2);
    assert!((report.annotation_coverage - 50.0).abs() < f64::EPSILON);
    assert_eq!(report.functions_missing_return_annotation, 1);
    assert_eq!(report.functions_missing_param_annotation, 1);
}

#[test]
fn receiver_only_method_with_return_type_is_complete() {
    let code = "\
class C:
    def m(self) -> int:
        return 1
";
    let report = analyze(code);
    assert_eq!(report.class_count, 1);
    assert!((report.annotation_coverage - 100.0).abs() < f64::EPSILON);
    assert_eq!(report.classes[0].method_count, 1);
    assert_eq!(report.classes[0].methods[0].name, "m");
}

#[test]
fn docstring_detection() {
    let code = "\
def documented():
    \"\"\"Does a thing.\"\"\"
    return 1

def bare():
    return 2
";
    let report = analyze(code);
    assert!(report.functions[0].has_docstring);
    assert!(!report.functions[1].has_docstring);
}

#[test]
fn unused_import_is_reported() {
    let code = "import os\nimport sys\n\nprint(sys.argv)\n";
    let report = analyze(code);
    assert_eq!(report.unused_imports, vec!["os".to_string()]);
}

#[test]
fn use_in_nested_scope_marks_import_used() {
    let code = "\
import json

def f():
    def g():
        return json.dumps({})
    return g
";
    let report = analyze(code);
    assert!(report.unused_imports.is_empty());
}

#[test]
fn from_import_alias_binds_the_alias() {
    let used = "from collections import OrderedDict as OD\n\nx = OD()\n";
    assert!(analyze(used).unused_imports.is_empty());

    let unused = "from collections import OrderedDict as OD\n";
    assert_eq!(analyze(unused).unused_imports, vec!["OD".to_string()]);
}

#[test]
fn from_import_without_alias_binds_last_segment() {
    let code = "from collections import deque\n";
    assert_eq!(analyze(code).unused_imports, vec!["deque".to_string()]);
}

#[test]
fn wildcard_import_binds_nothing() {
    let report = analyze("from os import *\n");
    assert!(report.unused_imports.is_empty());
}

#[test]
fn dotted_import_records_top_level_name() {
    let report = analyze("import os.path\n");
    assert_eq!(report.unused_imports, vec!["os".to_string()]);
}

#[test]
fn direct_aliased_import_records_module_name() {
    // The module name is recorded, not the alias; uses of the alias do not
    // mark it used. Documented shadow of the reference behavior.
    let report = analyze("import numpy as np\n\nx = np.zeros(3)\n");
    assert_eq!(report.unused_imports, vec!["numpy".to_string()]);
}

#[test]
fn import_declaration_is_not_its_own_usage() {
    let report = analyze("import os\n");
    assert_eq!(report.unused_imports, vec!["os".to_string()]);
}

#[test]
fn empty_file_gets_full_score() {
    let report = analyze("");
    assert_eq!(report.quality_score, 100);
    assert_eq!(report.function_count, 0);
    assert_eq!(report.cyclomatic_complexity, 1);
}

#[test]
fn score_and_coverage_stay_in_bounds() {
    let mut deep = String::from("def f(a, b, c, d, e, f2, g):\n");
    let mut indent = String::from("    ");
    for i in 0..12 {
        deep.push_str(&format!("{indent}if a > {i}:\n"));
        indent.push_str("    ");
    }
    deep.push_str(&format!("{indent}pass\n"));

    let report = analyze(&deep);
    assert!(report.quality_score <= 100);
    assert!((0.0..=100.0).contains(&report.annotation_coverage));
    assert!(report.cyclomatic_complexity > 10);
    assert!(report.max_nesting_depth > 4);
}

#[test]
fn comment_lines_are_counted() {
    let code = "# top\nx = 1  # trailing does not count\n   # indented\n";
    let report = analyze(code);
    assert_eq!(report.comment_count, 2);
    assert_eq!(report.line_count, 4);
}

#[test]
fn threshold_accessors() {
    let code = "def f(a, b, c, d, e):\n    pass\n";
    let report = analyze(code);
    let f = &report.functions[0];
    assert_eq!(f.param_count, 5);
    assert!(f.has_many_params(4));
    assert!(!f.has_many_params(5));
    assert!(!f.is_long(50));
}

#[test]
fn local_variables_are_distinct_bindings() {
    let code = "\
def f(x):
    a = 1
    b = 2
    a = 3
    for i in range(x):
        b += i
    return a + b
";
    let report = analyze(code);
    // a, b, i
    assert_eq!(report.functions[0].local_var_count, 3);
}

#[test]
fn syntax_error_is_rejected() {
    assert!(metrics::analyze("def broken(:\n").is_err());
}
