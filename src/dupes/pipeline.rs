// src/dupes/pipeline.rs
//! Shared grouping/comparison pipeline.
//!
//! Both detectors feed candidate blocks through the same stages: exact
//! grouping by content hash, pairwise similarity for the rest, pair
//! deduplication, and report assembly. Only candidate production differs
//! between them.

use crate::dupes::similarity::{line_ratio, ratio_upper_bound};
use crate::dupes::types::{CodeBlock, DuplicateKind, DuplicatePair, DuplicateReport};
use std::collections::{HashMap, HashSet};

/// Runs the full pipeline over extracted candidate blocks.
///
/// `total_lines` is the raw line count of the analyzed text and bounds the
/// duplicate percentage.
#[must_use]
pub fn build_report(blocks: &[CodeBlock], threshold: f64, total_lines: usize) -> DuplicateReport {
    let exact = exact_pairs(blocks);
    let similar = dedup_pairs(similar_pairs(blocks, threshold));

    let duplicate_lines = covered_line_count(exact.iter().chain(similar.iter()));
    let duplicate_percentage = if total_lines > 0 {
        duplicate_lines as f64 / total_lines as f64 * 100.0
    } else {
        0.0
    };

    let exact_duplicates = exact.len();
    let similar_duplicates = similar.len();
    let mut duplicate_pairs = exact;
    duplicate_pairs.extend(similar);

    DuplicateReport {
        total_blocks: blocks.len(),
        exact_duplicates,
        similar_duplicates,
        duplicate_pairs,
        duplicate_lines,
        total_lines,
        duplicate_percentage,
    }
}

/// Every pair of blocks sharing a normalized-content hash, similarity 1.0.
/// Groups are visited in first-occurrence order so output is deterministic.
fn exact_pairs(blocks: &[CodeBlock]) -> Vec<DuplicatePair> {
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, block) in blocks.iter().enumerate() {
        groups.entry(block.hash.as_str()).or_default().push(idx);
    }

    let mut pairs = Vec::new();
    let mut emitted: HashSet<&str> = HashSet::new();

    for block in blocks {
        if !emitted.insert(block.hash.as_str()) {
            continue;
        }
        let group = &groups[block.hash.as_str()];
        if group.len() < 2 {
            continue;
        }
        for (pos, &first) in group.iter().enumerate() {
            for &second in &group[pos + 1..] {
                pairs.push(DuplicatePair {
                    block1: blocks[first].clone(),
                    block2: blocks[second].clone(),
                    similarity: 1.0,
                    kind: DuplicateKind::Exact,
                });
            }
        }
    }

    pairs
}

/// Pairwise line-alignment similarity for blocks with differing hashes.
fn similar_pairs(blocks: &[CodeBlock], threshold: f64) -> Vec<DuplicatePair> {
    // Split each block's content once; the comparison loop is quadratic in
    // block count and re-splitting inside it dominates otherwise.
    let lines: Vec<Vec<&str>> = blocks
        .iter()
        .map(|b| b.content.split('\n').collect())
        .collect();

    let mut pairs = Vec::new();

    for i in 0..blocks.len() {
        for j in (i + 1)..blocks.len() {
            if blocks[i].hash == blocks[j].hash {
                continue;
            }
            // Outcome-preserving skip: if even a perfect alignment cannot
            // reach the threshold, the full ratio cannot either.
            if ratio_upper_bound(lines[i].len(), lines[j].len()) < threshold {
                continue;
            }
            let similarity = line_ratio(&lines[i], &lines[j]);
            if similarity >= threshold {
                pairs.push(DuplicatePair {
                    block1: blocks[i].clone(),
                    block2: blocks[j].clone(),
                    similarity,
                    kind: DuplicateKind::Similar,
                });
            }
        }
    }

    pairs
}

/// Collapses equivalent comparisons to one pair, keyed by both blocks'
/// spans. First occurrence wins.
fn dedup_pairs(pairs: Vec<DuplicatePair>) -> Vec<DuplicatePair> {
    let mut seen: HashSet<(usize, usize, usize, usize)> = HashSet::new();
    pairs
        .into_iter()
        .filter(|pair| {
            seen.insert((
                pair.block1.start_line,
                pair.block1.end_line,
                pair.block2.start_line,
                pair.block2.end_line,
            ))
        })
        .collect()
}

/// Distinct line numbers covered by the reported pairs. Both sides of every
/// pair count: a duplicated region is duplicated wherever it appears.
fn covered_line_count<'p>(pairs: impl Iterator<Item = &'p DuplicatePair>) -> usize {
    let mut covered: HashSet<usize> = HashSet::new();
    for pair in pairs {
        covered.extend(pair.block1.start_line..=pair.block1.end_line);
        covered.extend(pair.block2.start_line..=pair.block2.end_line);
    }
    covered.len()
}
