//! Whole-table feature quality report
//!
//! Every non-target column is typed once, binned once, and the same bin
//! counts feed IV, conditional Gini and conditional entropy. Columns are
//! evaluated independently on the rayon pool.

use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::ProgressBar;
use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::binning::{bin_feature, BinSpec, DEFAULT_BINS};
use super::error::{QualityError, Result};
use super::feature::{Feature, FeatureKind};
use super::impurity::{entropy_from_stats, gini_from_stats};
use super::ks::{ks_bucket, KsConfig};
use super::stats::BinStats;
use super::target::Target;
use super::woe::iv_from_stats;
use crate::utils::progress::create_progress_bar;

/// Categorical columns at or above this distinct/total ratio are not scored
const HIGH_CARDINALITY_RATIO: f64 = 0.5;

/// Sentinel text for metrics that were not computed
pub const SKIPPED: &str = "--";

/// A metric cell of the report
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Value(f64),
    /// Not computed on request or by policy
    Skipped,
    /// Not computable for this column
    Unsupported,
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Value(v) => write!(f, "{:.6}", v),
            MetricValue::Skipped => write!(f, "{}", SKIPPED),
            MetricValue::Unsupported => write!(f, "n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityConfig {
    /// Compute IV only; other metrics report the skipped sentinel
    pub iv_only: bool,
    /// Add a KS column
    pub with_ks: bool,
    /// Maximum bins for continuous features
    pub max_bins: usize,
    pub ks: KsConfig,
    /// Draw a progress bar while features are evaluated
    pub progress: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            iv_only: false,
            with_ks: false,
            max_bins: DEFAULT_BINS,
            ks: KsConfig::default(),
            progress: false,
        }
    }
}

impl QualityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_bins == 0 {
            return Err(QualityError::InvalidConfig(
                "max_bins must be at least 1".to_string(),
            ));
        }
        self.ks.validate()
    }
}

/// One feature of the report
#[derive(Debug, Clone, PartialEq)]
pub struct QualityRow {
    pub feature: String,
    /// `None` when the column type is unsupported
    pub kind: Option<FeatureKind>,
    pub iv: MetricValue,
    /// Conditional Gini impurity
    pub gini: MetricValue,
    /// Conditional entropy in nats
    pub entropy: MetricValue,
    /// Distinct non-missing values
    pub unique: Option<usize>,
    /// Present only when KS was requested
    pub ks: Option<MetricValue>,
}

impl QualityRow {
    fn sentinel(
        feature: &str,
        kind: Option<FeatureKind>,
        unique: Option<usize>,
        value: MetricValue,
        with_ks: bool,
    ) -> Self {
        Self {
            feature: feature.to_string(),
            kind,
            iv: value,
            gini: value,
            entropy: value,
            unique,
            ks: with_ks.then_some(value),
        }
    }
}

/// Quality rows sorted by IV descending
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    pub rows: Vec<QualityRow>,
}

impl QualityReport {
    pub fn get(&self, feature: &str) -> Option<&QualityRow> {
        self.rows.iter().find(|r| r.feature == feature)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// IV of one column
#[derive(Debug, Clone, PartialEq)]
pub struct IvEntry {
    pub feature: String,
    pub iv: MetricValue,
}

fn feature_columns<'a>(df: &'a DataFrame, target: &str) -> Vec<&'a Column> {
    df.get_columns()
        .iter()
        .filter(|col| col.name().as_str() != target)
        .collect()
}

fn spec_for(kind: FeatureKind, max_bins: usize) -> BinSpec {
    match kind {
        FeatureKind::Continuous => BinSpec::Supervised { max_bins },
        FeatureKind::Discrete | FeatureKind::Categorical => BinSpec::Distinct,
    }
}

/// Type a column, turning unsupported types into `None` with a warning
fn type_column(col: &Column) -> Result<Option<Feature>> {
    match Feature::from_column(col) {
        Ok(feature) => Ok(Some(feature)),
        Err(e) if e.is_feature_local() => {
            warn!(feature = %col.name(), error = %e, "skipping unsupported column");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Bin a typed feature and count it, `None` when binning is feature-locally impossible
fn bin_stats(
    name: &str,
    feature: &Feature,
    target: &Target,
    max_bins: usize,
) -> Result<Option<BinStats>> {
    let kind = feature.kind();
    let assignment = match bin_feature(feature, target, &spec_for(kind, max_bins)) {
        Ok(assignment) => assignment,
        Err(e) if e.is_feature_local() => {
            warn!(feature = name, error = %e, "skipping feature that cannot be binned");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };
    debug!(feature = name, kind = %kind, bins = assignment.n_bins(), "binned feature");
    BinStats::aggregate(&assignment, target).map(Some)
}

fn evaluate_column(col: &Column, target: &Target, config: &QualityConfig) -> Result<QualityRow> {
    let name = col.name().as_str();
    let Some(feature) = type_column(col)? else {
        return Ok(QualityRow::sentinel(name, None, None, MetricValue::Unsupported, config.with_ks));
    };
    target.ensure_aligned(feature.len())?;

    let kind = feature.kind();
    let unique = feature.unique_count();
    debug!(
        feature = name,
        kind = %kind,
        unique,
        missing = feature.missing_count(),
        "typed feature"
    );

    if kind == FeatureKind::Categorical
        && unique as f64 / feature.len() as f64 >= HIGH_CARDINALITY_RATIO
    {
        debug!(feature = name, unique, "high cardinality categorical column not scored");
        return Ok(QualityRow::sentinel(name, Some(kind), Some(unique), MetricValue::Skipped, config.with_ks));
    }

    let Some(stats) = bin_stats(name, &feature, target, config.max_bins)? else {
        return Ok(QualityRow::sentinel(name, Some(kind), Some(unique), MetricValue::Unsupported, config.with_ks));
    };

    let iv = MetricValue::Value(iv_from_stats(&stats));
    let (gini, entropy) = if config.iv_only {
        (MetricValue::Skipped, MetricValue::Skipped)
    } else {
        (
            MetricValue::Value(gini_from_stats(&stats)),
            MetricValue::Value(entropy_from_stats(&stats)),
        )
    };

    let ks = if !config.with_ks {
        None
    } else if config.iv_only {
        Some(MetricValue::Skipped)
    } else {
        Some(match &feature {
            Feature::Numeric(_) => match ks_bucket(&feature, target, &config.ks) {
                Ok(table) => MetricValue::Value(table.ks()),
                Err(e) => {
                    warn!(feature = name, error = %e, "KS buckets could not be built");
                    MetricValue::Unsupported
                }
            },
            Feature::Categorical(_) => MetricValue::Unsupported,
        })
    };

    Ok(QualityRow {
        feature: name.to_string(),
        kind: Some(kind),
        iv,
        gini,
        entropy,
        unique: Some(unique),
        ks,
    })
}

/// Value rows by IV descending, then sentinel rows, ties by name
fn compare_rows(a: &QualityRow, b: &QualityRow) -> CmpOrdering {
    match (a.iv.value(), b.iv.value()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
    .then_with(|| a.feature.cmp(&b.feature))
}

fn progress_bar(len: usize, enabled: bool, message: &str) -> ProgressBar {
    if enabled {
        create_progress_bar(len as u64, message)
    } else {
        ProgressBar::hidden()
    }
}

/// Score every non-target column of `df` against the binary `target` column.
///
/// Unsupported column types and high-cardinality categorical columns get
/// sentinel rows, and a KS table that cannot be built leaves an `n/a` cell.
/// Structural problems (missing or non-binary target) fail the whole call.
pub fn quality(df: &DataFrame, target: &str, config: &QualityConfig) -> Result<QualityReport> {
    config.validate()?;
    let target_values = Target::from_frame(df, target)?;
    let columns = feature_columns(df, target);

    let pb = progress_bar(columns.len(), config.progress, "Evaluating features");
    let counter = AtomicU64::new(0);

    let mut rows = columns
        .par_iter()
        .map(|col| {
            let row = evaluate_column(col, &target_values, config);
            let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_position(done);
            row
        })
        .collect::<Result<Vec<QualityRow>>>()?;

    pb.finish_and_clear();
    rows.sort_by(compare_rows);
    Ok(QualityReport { rows })
}

/// IV of every non-target column under its default binning, in column order.
pub fn iv_table(df: &DataFrame, target: &str, config: &QualityConfig) -> Result<Vec<IvEntry>> {
    config.validate()?;
    let target_values = Target::from_frame(df, target)?;
    let columns = feature_columns(df, target);

    columns
        .par_iter()
        .map(|col| -> Result<IvEntry> {
            let name = col.name().as_str();
            let iv = match type_column(col)? {
                Some(feature) => {
                    target_values.ensure_aligned(feature.len())?;
                    match bin_stats(name, &feature, &target_values, config.max_bins)? {
                        Some(stats) => MetricValue::Value(iv_from_stats(&stats)),
                        None => MetricValue::Unsupported,
                    }
                }
                None => MetricValue::Unsupported,
            };
            Ok(IvEntry {
                feature: name.to_string(),
                iv,
            })
        })
        .collect()
}
