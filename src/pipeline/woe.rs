//! Weight of Evidence (WoE) and Information Value (IV)
//!
//! For a bin with positive rate `y` (share of all positives that fall in the
//! bin) and negative rate `n`, `WoE = ln(y / n)` and the bin contributes
//! `(y - n) * WoE` to the feature's IV.
//!
//! A zero count in a bin, or in the whole target, is replaced by 1 before the
//! rates are formed so every WoE stays finite.

use super::binning::{bin_feature, default_spec, BinAssignment, BinLabel, BinSpec};
use super::error::Result;
use super::feature::Feature;
use super::stats::BinStats;
use super::target::Target;

/// `ln(positive_rate / negative_rate)`
pub fn woe(positive_rate: f64, negative_rate: f64) -> f64 {
    (positive_rate / negative_rate).ln()
}

fn smoothed(count: usize) -> f64 {
    if count == 0 {
        1.0
    } else {
        count as f64
    }
}

/// WoE detail for one bin
#[derive(Debug, Clone, PartialEq)]
pub struct WoeBin {
    pub label: BinLabel,
    pub total: usize,
    pub positives: usize,
    pub negatives: usize,
    /// Share of all positives in this bin
    pub positive_rate: f64,
    /// Share of all negatives in this bin
    pub negative_rate: f64,
    pub woe: f64,
    pub iv_contribution: f64,
    /// Share of all observations in this bin
    pub population_share: f64,
    /// Share of this bin labelled 1
    pub event_rate: f64,
}

/// Per-bin WoE detail and the resulting IV
#[derive(Debug, Clone, PartialEq)]
pub struct WoeTable {
    pub bins: Vec<WoeBin>,
    pub iv: f64,
}

impl WoeTable {
    /// Build the table for an assignment and its counts.
    pub fn from_stats(assignment: &BinAssignment, stats: &BinStats) -> Self {
        let all_positives = smoothed(stats.positives());
        let all_negatives = smoothed(stats.negatives());
        let total = stats.total() as f64;

        let bins: Vec<WoeBin> = assignment
            .labels()
            .iter()
            .zip(stats.bins())
            .map(|(label, counts)| {
                let positive_rate = smoothed(counts.positives) / all_positives;
                let negative_rate = smoothed(counts.negatives) / all_negatives;
                let woe = woe(positive_rate, negative_rate);
                WoeBin {
                    label: label.clone(),
                    total: counts.total,
                    positives: counts.positives,
                    negatives: counts.negatives,
                    positive_rate,
                    negative_rate,
                    woe,
                    iv_contribution: (positive_rate - negative_rate) * woe,
                    population_share: counts.total as f64 / total,
                    event_rate: counts.event_rate(),
                }
            })
            .collect();

        let iv = bins.iter().map(|b| b.iv_contribution).sum();
        Self { bins, iv }
    }

    /// WoE of each observation's bin
    pub fn transform(&self, assignment: &BinAssignment) -> Vec<f64> {
        assignment.bins().iter().map(|&b| self.bins[b].woe).collect()
    }
}

/// IV summed over the bins of `stats`
pub fn iv_from_stats(stats: &BinStats) -> f64 {
    let all_positives = smoothed(stats.positives());
    let all_negatives = smoothed(stats.negatives());
    stats
        .bins()
        .iter()
        .map(|counts| {
            let y = smoothed(counts.positives) / all_positives;
            let n = smoothed(counts.negatives) / all_negatives;
            (y - n) * woe(y, n)
        })
        .sum()
}

/// IV of a feature under its default binning
pub fn iv(feature: &Feature, target: &Target) -> Result<f64> {
    iv_with(feature, target, &default_spec(feature))
}

/// IV of a feature under an explicit bin spec
pub fn iv_with(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<f64> {
    let assignment = bin_feature(feature, target, spec)?;
    let stats = BinStats::aggregate(&assignment, target)?;
    Ok(iv_from_stats(&stats))
}

/// Per-bin WoE table for a feature under `spec`
pub fn woe_table(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<WoeTable> {
    let assignment = bin_feature(feature, target, spec)?;
    let stats = BinStats::aggregate(&assignment, target)?;
    Ok(WoeTable::from_stats(&assignment, &stats))
}

/// Replace every observation by the WoE of its bin under `spec`
pub fn woe_transform(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<Vec<f64>> {
    let assignment = bin_feature(feature, target, spec)?;
    let stats = BinStats::aggregate(&assignment, target)?;
    Ok(WoeTable::from_stats(&assignment, &stats).transform(&assignment))
}
