//! Gini impurity and entropy, unconditional and conditional on a binning
//!
//! Entropy is measured in nats. Conditional values are bin-size weighted
//! averages over the same default binning IV uses.

use super::binning::{bin_feature, default_spec, BinSpec};
use super::error::Result;
use super::feature::Feature;
use super::stats::BinStats;
use super::target::Target;

/// Gini impurity `1 - p1² - p0²` of a 0/1 sample; 0.0 when empty.
pub(crate) fn binary_gini(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

/// Entropy `-Σ p ln p` of a 0/1 sample with `0 ln 0 = 0`.
pub(crate) fn binary_entropy(positives: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    [positives, total - positives]
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.ln()
        })
        .sum()
}

pub fn gini(target: &Target) -> f64 {
    binary_gini(target.positives(), target.len())
}

pub fn entropy(target: &Target) -> f64 {
    binary_entropy(target.positives(), target.len())
}

fn weighted(stats: &BinStats, impurity: fn(usize, usize) -> f64) -> f64 {
    let total = stats.total() as f64;
    stats
        .bins()
        .iter()
        .map(|b| b.total as f64 / total * impurity(b.positives, b.total))
        .sum()
}

/// Bin-weighted Gini impurity of already aggregated bins
pub fn gini_from_stats(stats: &BinStats) -> f64 {
    weighted(stats, binary_gini)
}

/// Bin-weighted entropy of already aggregated bins
pub fn entropy_from_stats(stats: &BinStats) -> f64 {
    weighted(stats, binary_entropy)
}

fn stats_for(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<BinStats> {
    let assignment = bin_feature(feature, target, spec)?;
    BinStats::aggregate(&assignment, target)
}

/// Gini impurity of the target conditional on the feature's default binning
pub fn gini_cond(feature: &Feature, target: &Target) -> Result<f64> {
    gini_cond_with(feature, target, &default_spec(feature))
}

pub fn gini_cond_with(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<f64> {
    Ok(gini_from_stats(&stats_for(feature, target, spec)?))
}

/// Entropy of the target conditional on the feature's default binning
pub fn entropy_cond(feature: &Feature, target: &Target) -> Result<f64> {
    entropy_cond_with(feature, target, &default_spec(feature))
}

pub fn entropy_cond_with(feature: &Feature, target: &Target, spec: &BinSpec) -> Result<f64> {
    Ok(entropy_from_stats(&stats_for(feature, target, spec)?))
}
