//! Kolmogorov-Smirnov separation by score bucket
//!
//! Observations are grouped into ascending buckets of the feature (usually a
//! model score). Cumulating positives and negatives bucket by bucket gives two
//! empirical distributions; KS is their largest absolute gap.

use super::binning::{assign_bins, cut_boundaries, validate_clip, BinSpec, CutConfig, CutMethod};
use super::error::{QualityError, Result};
use super::feature::Feature;
use super::target::Target;

/// Default number of KS buckets
pub const DEFAULT_KS_BUCKETS: usize = 10;

/// How observations are grouped into KS rows
#[derive(Debug, Clone, PartialEq)]
pub enum Bucketing {
    /// Unsupervised cut into this many buckets
    Bins(usize),
    /// One row per observation
    Full,
    /// Explicit strictly increasing boundaries
    Splits(Vec<f64>),
}

impl Default for Bucketing {
    fn default() -> Self {
        Bucketing::Bins(DEFAULT_KS_BUCKETS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KsConfig {
    pub bucket: Bucketing,
    pub method: CutMethod,
    /// Tail share ignored when computing bucket boundaries
    pub clip_q: f64,
}

impl Default for KsConfig {
    fn default() -> Self {
        Self {
            bucket: Bucketing::default(),
            method: CutMethod::Quantile,
            clip_q: 0.0,
        }
    }
}

impl KsConfig {
    pub fn validate(&self) -> Result<()> {
        if let Bucketing::Bins(0) = self.bucket {
            return Err(QualityError::InvalidConfig(
                "bucket count must be at least 1".to_string(),
            ));
        }
        validate_clip(self.clip_q)
    }
}

/// One KS bucket
#[derive(Debug, Clone, PartialEq)]
pub struct KsRow {
    /// Smallest value in the bucket; `None` for the missing bucket
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub positives: usize,
    pub negatives: usize,
    pub total: usize,
    pub positive_rate: f64,
    pub negative_rate: f64,
    /// positives / negatives
    pub odds: f64,
    /// Share of all positives in this bucket
    pub positive_prop: f64,
    pub negative_prop: f64,
    pub total_prop: f64,
    pub cum_positives: usize,
    pub cum_negatives: usize,
    pub cum_total: usize,
    pub cum_positive_prop: f64,
    pub cum_negative_prop: f64,
    pub cum_total_prop: f64,
    pub cum_positive_rate: f64,
    /// `|cum_positive_prop - cum_negative_prop|`
    pub ks: f64,
    pub lift: f64,
    pub cum_lift: f64,
}

/// KS rows in ascending feature order, missing bucket last
#[derive(Debug, Clone, PartialEq)]
pub struct KsTable {
    pub rows: Vec<KsRow>,
}

impl KsTable {
    /// Largest row KS; 0.0 for an empty table
    pub fn ks(&self) -> f64 {
        self.rows.iter().map(|r| r.ks).fold(0.0, f64::max)
    }

    /// First row reaching the maximum KS
    pub fn peak(&self) -> Option<&KsRow> {
        let ks = self.ks();
        self.rows.iter().find(|r| r.ks == ks)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn from_buckets(buckets: Vec<Bucket>, target: &Target) -> Self {
        let all_pos = target.positives();
        let all_neg = target.negatives();
        let all = target.len();
        let base_rate = target.positive_rate();

        let mut cum_positives = 0;
        let mut cum_negatives = 0;
        let rows = buckets
            .into_iter()
            .map(|b| {
                let total = b.positives + b.negatives;
                cum_positives += b.positives;
                cum_negatives += b.negatives;
                let cum_total = cum_positives + cum_negatives;

                let positive_rate = ratio(b.positives, total);
                let cum_positive_rate = ratio(cum_positives, cum_total);
                let cum_positive_prop = ratio(cum_positives, all_pos);
                let cum_negative_prop = ratio(cum_negatives, all_neg);

                KsRow {
                    min: b.min,
                    max: b.max,
                    positives: b.positives,
                    negatives: b.negatives,
                    total,
                    positive_rate,
                    negative_rate: ratio(b.negatives, total),
                    odds: ratio(b.positives, b.negatives),
                    positive_prop: ratio(b.positives, all_pos),
                    negative_prop: ratio(b.negatives, all_neg),
                    total_prop: ratio(total, all),
                    cum_positives,
                    cum_negatives,
                    cum_total,
                    cum_positive_prop,
                    cum_negative_prop,
                    cum_total_prop: ratio(cum_total, all),
                    cum_positive_rate,
                    ks: (cum_positive_prop - cum_negative_prop).abs(),
                    lift: divide(positive_rate, base_rate),
                    cum_lift: divide(cum_positive_rate, base_rate),
                }
            })
            .collect();
        Self { rows }
    }
}

/// Counts and value range of one bucket before cumulation
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    min: Option<f64>,
    max: Option<f64>,
    positives: usize,
    negatives: usize,
}

impl Bucket {
    fn add(&mut self, value: Option<f64>, label: u8) {
        if let Some(v) = value {
            self.min = Some(self.min.map_or(v, |m| m.min(v)));
            self.max = Some(self.max.map_or(v, |m| m.max(v)));
        }
        if label == 1 {
            self.positives += 1;
        } else {
            self.negatives += 1;
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    divide(numerator as f64, denominator as f64)
}

fn divide(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn bucket_by_splits(values: &[Option<f64>], target: &Target, splits: &[f64]) -> Result<Vec<Bucket>> {
    let feature = Feature::Numeric(values.to_vec());
    let assignment = assign_bins(&feature, &BinSpec::Splits(splits.to_vec()))?;
    let mut buckets = vec![Bucket::default(); assignment.n_bins()];
    for ((&bin, &value), &label) in assignment.bins().iter().zip(values).zip(target.labels()) {
        buckets[bin].add(value, label);
    }
    Ok(buckets)
}

fn bucket_each(values: &[Option<f64>], target: &Target) -> Vec<Bucket> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    // stable: ties keep row order, missing rows trail
    order.sort_by(|&a, &b| match (values[a], values[b]) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    order
        .into_iter()
        .map(|i| {
            let mut bucket = Bucket::default();
            bucket.add(values[i], target.labels()[i]);
            bucket
        })
        .collect()
}

/// Bucketed KS table of a numeric feature against the target.
pub fn ks_bucket(feature: &Feature, target: &Target, config: &KsConfig) -> Result<KsTable> {
    config.validate()?;
    let values = feature.numeric_values("ks_bucket")?;
    target.ensure_aligned(values.len())?;

    let buckets = match &config.bucket {
        Bucketing::Full => bucket_each(values, target),
        Bucketing::Splits(splits) => bucket_by_splits(values, target, splits)?,
        Bucketing::Bins(n_bins) => {
            let cut = CutConfig {
                n_bins: *n_bins,
                method: config.method,
                clip_q: config.clip_q,
                allow_degenerate: true,
            };
            let splits = cut_boundaries(values, &cut)?;
            bucket_by_splits(values, target, &splits)?
        }
    };

    Ok(KsTable::from_buckets(buckets, target))
}

/// Exact KS statistic: the largest gap over one-observation buckets
pub fn ks(feature: &Feature, target: &Target) -> Result<f64> {
    let config = KsConfig {
        bucket: Bucketing::Full,
        ..KsConfig::default()
    };
    Ok(ks_bucket(feature, target, &config)?.ks())
}
