// tests/unit_dupes.rs
use codeprobe_core::config::DuplicateConfig;
use codeprobe_core::dupes::{BlockDetector, DuplicateKind, FunctionDetector};
use codeprobe_core::parse;

fn block_detector(config: DuplicateConfig) -> BlockDetector {
    BlockDetector::from_config(&config)
}

fn function_report(code: &str, config: &DuplicateConfig) -> codeprobe_core::dupes::DuplicateReport {
    let tree = parse::parse_module(code).expect("valid source");
    FunctionDetector::from_config(config).detect(&tree, code)
}

/// Two byte-identical definitions, each 5 lines.
const TWIN_FUNCTIONS: &str = "\
def compute(values):
    total = 0
    for v in values:
        total += v
    return total

def compute(values):
    total = 0
    for v in values:
        total += v
    return total
";

#[test]
fn identical_functions_yield_exact_pair() {
    let report = function_report(TWIN_FUNCTIONS, &DuplicateConfig::default());
    assert_eq!(report.total_blocks, 2);
    assert!(report.exact_duplicates >= 1);
    let pair = &report.duplicate_pairs[0];
    assert_eq!(pair.kind, DuplicateKind::Exact);
    assert!((pair.similarity - 1.0).abs() < f64::EPSILON);
}

#[test]
fn renamed_variable_yields_similar_not_exact() {
    // Bodies identical except one renamed binding on two lines.
    let code = "\
def compute(values):
    total = 0
    step = 1
    for v in values:
        total += v
    count = len(values)
    high = max(values)
    low = min(values)
    span = high - low
    return total

def compute(values):
    acc = 0
    step = 1
    for v in values:
        acc += v
    count = len(values)
    high = max(values)
    low = min(values)
    span = high - low
    return acc
";
    let config = DuplicateConfig {
        similarity_threshold: 0.6,
        ..DuplicateConfig::default()
    };
    let report = function_report(code, &config);
    assert_eq!(report.exact_duplicates, 0, "hashes must differ");
    assert!(report.similar_duplicates >= 1);
    let pair = report
        .duplicate_pairs
        .iter()
        .find(|p| p.kind == DuplicateKind::Similar)
        .expect("similar pair");
    assert!(pair.similarity >= 0.6);
    assert!(pair.similarity < 1.0);
}

#[test]
fn short_functions_are_ignored() {
    let code = "\
def a():
    return 1

def a():
    return 1
";
    let report = function_report(code, &DuplicateConfig::default());
    assert_eq!(report.total_blocks, 0);
    assert_eq!(report.exact_duplicates, 0);
}

#[test]
fn block_detector_finds_repeated_region() {
    let code = "\
alpha = 1
beta = 2
gamma = 3
delta = 4
epsilon = 5
marker = 99
alpha = 1
beta = 2
gamma = 3
delta = 4
epsilon = 5";
    let report = block_detector(DuplicateConfig::default()).detect(code);
    assert!(report.total_blocks > 0);
    assert!(report.exact_duplicates >= 1);
    assert!(report.duplicate_lines <= report.total_lines);
    assert!((0.0..=100.0).contains(&report.duplicate_percentage));
}

#[test]
fn raising_min_block_size_kills_small_duplicates() {
    let code = "\
alpha = 1
beta = 2
gamma = 3
delta = 4
epsilon = 5
marker = 99
alpha = 1
beta = 2
gamma = 3
delta = 4
epsilon = 5";
    let config = DuplicateConfig {
        min_block_size: 6,
        ..DuplicateConfig::default()
    };
    let report = block_detector(config).detect(code);
    assert_eq!(report.exact_duplicates, 0);
}

#[test]
fn comment_only_text_produces_no_candidates() {
    let code = "# one\n# two\n# three\n# one\n# two\n# three\n# one\n# two\n# three\n";
    let report = block_detector(DuplicateConfig::default()).detect(code);
    assert_eq!(report.total_blocks, 0);
    assert_eq!(report.duplicate_percentage, 0.0);
}

#[test]
fn empty_source_is_neutral() {
    let report = block_detector(DuplicateConfig::default()).detect("");
    assert_eq!(report.total_blocks, 0);
    assert_eq!(report.duplicate_lines, 0);
    assert_eq!(report.duplicate_percentage, 0.0);
}

#[test]
fn exact_pairs_come_before_similar_pairs() {
    let config = DuplicateConfig {
        similarity_threshold: 0.5,
        ..DuplicateConfig::default()
    };
    let report = block_detector(config).detect(
        "\
a = 1
b = 2
c = 3
d = 4
e = 5
filler = 0
a = 1
b = 2
c = 3
d = 4
e = 5
other = 7
a = 1
b = 2
c = 3
d = 9
e = 5",
    );
    let first_similar = report
        .duplicate_pairs
        .iter()
        .position(|p| p.kind == DuplicateKind::Similar);
    let last_exact = report
        .duplicate_pairs
        .iter()
        .rposition(|p| p.kind == DuplicateKind::Exact);
    if let (Some(first_similar), Some(last_exact)) = (first_similar, last_exact) {
        assert!(last_exact < first_similar);
    }
    assert_eq!(
        report.exact_duplicates + report.similar_duplicates,
        report.duplicate_pairs.len()
    );
}

#[test]
fn window_cap_bounds_candidate_count() {
    let mut long = String::new();
    for i in 0..80 {
        long.push_str(&format!("value_{i} = {i}\n"));
    }
    let config = DuplicateConfig {
        max_window: 8,
        ..DuplicateConfig::default()
    };
    let report = block_detector(config).detect(&long);
    // Every anchor contributes at most (cap - min + 1) windows.
    assert!(report.total_blocks <= 81 * 4);
}

#[test]
fn similarity_is_bounded() {
    let report = function_report(TWIN_FUNCTIONS, &DuplicateConfig::default());
    for pair in &report.duplicate_pairs {
        assert!((0.0..=1.0).contains(&pair.similarity));
    }
}

#[test]
fn nested_functions_are_their_own_candidates() {
    let code = "\
def outer(xs):
    def inner(x):
        a = x + 1
        b = a * 2
        c = b - 3
        return c
    total = 0
    for x in xs:
        total += inner(x)
    return total
";
    let report = function_report(code, &DuplicateConfig::default());
    // outer (10 lines) and inner (5 lines) both qualify.
    assert_eq!(report.total_blocks, 2);
}
