// src/dupes/similarity.rs
//! Content hashing and line-sequence similarity.
//!
//! Similarity is a Ratcliff/Obershelp matching ratio over line sequences:
//! recursively take the longest common block, then match the pieces on each
//! side of it. `2 * matched / (len_a + len_b)` lands in [0, 1] with 1.0 for
//! identical sequences. The recursion is driven by an explicit queue.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// SHA-256 hex digest of content after secondary normalization: blank lines
/// dropped, every retained line trimmed. Two regions differing only in
/// indentation or blank spacing hash identically.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let normalized = content
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Cheapest upper bound on `line_ratio` for two sequence lengths: even a
/// perfect alignment cannot match more than `min(a, b)` lines. Lets callers
/// skip full alignment without ever changing an accept/reject outcome.
#[must_use]
pub fn ratio_upper_bound(a_len: usize, b_len: usize) -> f64 {
    let total = a_len + b_len;
    if total == 0 {
        return 1.0;
    }
    2.0 * a_len.min(b_len) as f64 / total as f64
}

/// Matching ratio over two line sequences, in [0, 1].
#[must_use]
pub fn line_ratio(a: &[&str], b: &[&str]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut b2j: HashMap<&str, Vec<usize>> = HashMap::new();
    for (j, line) in b.iter().enumerate() {
        b2j.entry(*line).or_default().push(j);
    }

    let mut matched = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        if alo >= ahi || blo >= bhi {
            continue;
        }
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k > 0 {
            matched += k;
            queue.push((alo, i, blo, j));
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    2.0 * matched as f64 / total as f64
}

/// Longest block of lines common to `a[alo..ahi]` and `b[blo..bhi]`.
/// Returns (start in a, start in b, length); ties resolve to the earliest
/// match, which keeps the ratio deterministic.
fn longest_match(
    a: &[&str],
    b2j: &HashMap<&str, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut besti = alo;
    let mut bestj = blo;
    let mut bestk = 0usize;

    // j2len[j] = length of the common run ending at a[i-1], b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, line) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(line) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j2len
                    .get(&j.wrapping_sub(1))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_j2len.insert(j, k);
                if k > bestk {
                    besti = i + 1 - k;
                    bestj = j + 1 - k;
                    bestk = k;
                }
            }
        }
        j2len = next_j2len;
    }

    (besti, bestj, bestk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sequences_score_one() {
        let a = ["x = 1", "y = 2", "return x + y"];
        assert_eq!(line_ratio(&a, &a), 1.0);
    }

    #[test]
    fn disjoint_sequences_score_zero() {
        let a = ["alpha", "beta"];
        let b = ["gamma", "delta"];
        assert_eq!(line_ratio(&a, &b), 0.0);
    }

    #[test]
    fn single_substitution_ratio() {
        // 2 matched lines out of 6 total slots: 2 * 2 / 6.
        let a = ["a", "b", "c"];
        let b = ["a", "b", "d"];
        let ratio = line_ratio(&a, &b);
        assert!((ratio - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_sequences_are_identical() {
        let a: [&str; 0] = [];
        assert_eq!(line_ratio(&a, &a), 1.0);
    }

    #[test]
    fn upper_bound_dominates_ratio() {
        let a = ["a", "b", "c", "x"];
        let b = ["a", "b"];
        assert!(line_ratio(&a, &b) <= ratio_upper_bound(a.len(), b.len()));
    }

    #[test]
    fn hash_ignores_indentation_and_blanks() {
        let left = "x = 1\n\n    y = 2\n";
        let right = "  x = 1\ny = 2";
        assert_eq!(content_hash(left), content_hash(right));
    }

    #[test]
    fn hash_distinguishes_content() {
        assert_ne!(content_hash("x = 1"), content_hash("x = 2"));
    }
}
