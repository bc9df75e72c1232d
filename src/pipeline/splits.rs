//! Candidate split discovery and supervised split selection
//!
//! Candidates are the midpoints between adjacent distinct values at which the
//! target can change. Selection grows a binary partition best-first over those
//! candidates, always splitting the node whose split removes the most Gini
//! impurity from the whole sample.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use super::error::{QualityError, Result};
use super::feature::Feature;
use super::impurity::binary_gini;
use super::target::Target;

/// Adjacent values closer than this are never separated
const FEATURE_THRESHOLD: f64 = 1e-7;

/// Nodes with impurity at or below this are treated as pure
const PURE_IMPURITY: f64 = 1e-7;

/// All observations sharing one distinct feature value
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ValueGroup {
    pub value: f64,
    pub total: usize,
    pub positives: usize,
}

/// Collapse paired (value, label) observations into ascending value groups.
/// Missing values are skipped.
pub(crate) fn value_groups(values: &[Option<f64>], labels: &[u8]) -> Vec<ValueGroup> {
    let mut pairs: Vec<(f64, u8)> = values
        .iter()
        .zip(labels)
        .filter_map(|(v, &label)| v.map(|v| (v, label)))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<ValueGroup> = Vec::new();
    for (value, label) in pairs {
        match groups.last_mut() {
            Some(group) if group.value == value => {
                group.total += 1;
                group.positives += label as usize;
            }
            _ => groups.push(ValueGroup {
                value,
                total: 1,
                positives: label as usize,
            }),
        }
    }
    groups
}

/// Threshold between `a < b` that sends `a` left and `b` right under `s <= x`.
pub(crate) fn midpoint(a: f64, b: f64) -> f64 {
    let mid = (a + b) / 2.0;
    if mid.is_finite() {
        return mid;
    }
    if a.is_finite() && b.is_finite() {
        return a / 2.0 + b / 2.0;
    }
    if a == f64::NEG_INFINITY {
        return if b == f64::INFINITY { 0.0 } else { b };
    }
    b
}

/// Both groups hold a single label and it is the same one
fn same_pure_label(a: &ValueGroup, b: &ValueGroup) -> bool {
    (a.positives == 0 && b.positives == 0) || (a.positives == a.total && b.positives == b.total)
}

/// Candidate thresholds for a numeric feature.
///
/// Emits the midpoint of every pair of adjacent distinct values, except where
/// all observations at both values carry the same label. The result is
/// strictly increasing and does not depend on row order.
pub fn candidate_splits(feature: &Feature, target: &Target) -> Result<Vec<f64>> {
    let values = feature.numeric_values("candidate_splits")?;
    target.ensure_aligned(values.len())?;

    let groups = value_groups(values, target.labels());
    let mut candidates: Vec<f64> = groups
        .windows(2)
        .filter(|pair| !same_pure_label(&pair[0], &pair[1]))
        .map(|pair| midpoint(pair[0].value, pair[1].value))
        .collect();
    // midpoints of neighbouring floats can round onto the same value
    candidates.dedup();
    Ok(candidates)
}

/// Best split of one node, queued by how much impurity it removes
#[derive(Debug)]
struct NodeSplit {
    improvement: f64,
    order: usize,
    lo: usize,
    hi: usize,
    at: usize,
}

impl PartialEq for NodeSplit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeSplit {}

impl PartialOrd for NodeSplit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeSplit {
    // Largest improvement first, earliest node on ties
    fn cmp(&self, other: &Self) -> Ordering {
        self.improvement
            .total_cmp(&other.improvement)
            .then_with(|| other.order.cmp(&self.order))
    }
}

fn square_sum(positives: usize, total: usize) -> f64 {
    let negatives = total - positives;
    (positives * positives + negatives * negatives) as f64
}

/// Find the best allowed split of groups `lo..hi`.
///
/// The split maximises `(l1² + l0²)/n_l + (r1² + r0²)/n_r`, which ranks
/// splits exactly like the weighted child Gini; the first maximum wins.
fn best_node_split(
    groups: &[ValueGroup],
    thresholds: &[Option<f64>],
    lo: usize,
    hi: usize,
    sample_size: usize,
    order: usize,
) -> Option<NodeSplit> {
    let node = &groups[lo..hi];
    let n: usize = node.iter().map(|g| g.total).sum();
    let positives: usize = node.iter().map(|g| g.positives).sum();
    let impurity = binary_gini(positives, n);
    if n < 2 || impurity <= PURE_IMPURITY {
        return None;
    }

    let mut best: Option<(usize, f64, usize, usize)> = None;
    let mut left_n = 0;
    let mut left_pos = 0;

    for k in lo + 1..hi {
        left_n += groups[k - 1].total;
        left_pos += groups[k - 1].positives;

        if thresholds[k].is_none() || groups[k].value <= groups[k - 1].value + FEATURE_THRESHOLD {
            continue;
        }

        let right_n = n - left_n;
        let right_pos = positives - left_pos;
        let proxy = square_sum(left_pos, left_n) / left_n as f64
            + square_sum(right_pos, right_n) / right_n as f64;

        if best.map_or(true, |(_, best_proxy, _, _)| proxy > best_proxy) {
            best = Some((k, proxy, left_n, left_pos));
        }
    }

    let (at, _, left_n, left_pos) = best?;
    let nf = n as f64;
    let right_n = n - left_n;
    let improvement = (nf / sample_size as f64)
        * (impurity
            - left_n as f64 / nf * binary_gini(left_pos, left_n)
            - right_n as f64 / nf * binary_gini(positives - left_pos, right_n));

    Some(NodeSplit {
        improvement,
        order,
        lo,
        hi,
        at,
    })
}

/// Select at most `max_bins - 1` of `candidates` by best-first growth.
///
/// Every node is split at its best candidate; the node whose split gives the
/// largest weighted impurity decrease is expanded first. Growth stops at the
/// split budget or when every node is pure or a single observation. The
/// chosen thresholds are returned ascending.
pub fn select_splits(
    feature: &Feature,
    target: &Target,
    candidates: &[f64],
    max_bins: usize,
) -> Result<Vec<f64>> {
    if max_bins == 0 {
        return Err(QualityError::InvalidConfig(
            "max_bins must be at least 1".to_string(),
        ));
    }
    let values = feature.numeric_values("select_splits")?;
    target.ensure_aligned(values.len())?;

    let groups = value_groups(values, target.labels());
    let sample_size: usize = groups.iter().map(|g| g.total).sum();

    let mut sorted_candidates = candidates.to_vec();
    sorted_candidates.sort_by(f64::total_cmp);

    // The candidate separating group k-1 from group k, if any lies in (a, b]
    let thresholds: Vec<Option<f64>> = (0..groups.len())
        .map(|k| {
            if k == 0 {
                return None;
            }
            let (a, b) = (groups[k - 1].value, groups[k].value);
            let first_above = sorted_candidates.partition_point(|&c| c <= a);
            sorted_candidates
                .get(first_above)
                .copied()
                .filter(|&c| c <= b)
        })
        .collect();

    let mut queue = BinaryHeap::new();
    let mut created = 0;
    let mut push = |queue: &mut BinaryHeap<NodeSplit>, lo: usize, hi: usize| {
        if let Some(split) = best_node_split(&groups, &thresholds, lo, hi, sample_size, created) {
            queue.push(split);
            created += 1;
        }
    };

    push(&mut queue, 0, groups.len());

    let mut selected = Vec::new();
    while selected.len() < max_bins - 1 {
        let Some(split) = queue.pop() else {
            break;
        };
        if let Some(threshold) = thresholds[split.at] {
            selected.push(threshold);
        }
        push(&mut queue, split.lo, split.at);
        push(&mut queue, split.at, split.hi);
    }

    selected.sort_by(f64::total_cmp);
    debug!(
        candidates = candidates.len(),
        selected = selected.len(),
        max_bins,
        "selected supervised splits"
    );
    Ok(selected)
}
