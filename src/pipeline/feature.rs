//! Feature typing
//!
//! A feature column is either numeric or categorical, and either kind may
//! carry missing markers. How a feature is binned is decided once, here, by
//! [`Feature::kind`]; the metrics downstream only ever see bin assignments.

use std::collections::HashSet;
use std::fmt;

use polars::prelude::*;

use super::error::{QualityError, Result};

/// Numeric features with more distinct values than this are continuous
pub const CONTINUOUS_DISTINCT_VALUES: usize = 10;

/// Numeric features whose distinct/total ratio exceeds this are continuous
const CONTINUOUS_DISTINCT_RATIO: f64 = 0.5;

/// Observed values of one feature; `None` is the missing marker.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// How a feature is partitioned by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Many distinct numeric values: binned through candidate splits
    Continuous,
    /// Few distinct numeric values: one bin per value
    Discrete,
    /// Labels: one bin per value
    Categorical,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::Continuous => write!(f, "continuous"),
            FeatureKind::Discrete => write!(f, "discrete"),
            FeatureKind::Categorical => write!(f, "categorical"),
        }
    }
}

impl Feature {
    /// Numeric feature from raw floats; NaN is treated as missing.
    pub fn from_f64(values: &[f64]) -> Self {
        Feature::Numeric(values.iter().map(|&v| clean(Some(v))).collect())
    }

    /// Numeric feature with explicit missing markers.
    pub fn from_options(values: Vec<Option<f64>>) -> Self {
        Feature::Numeric(values.into_iter().map(clean).collect())
    }

    /// Categorical feature from optional labels.
    pub fn from_labels<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Feature::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect())
    }

    /// Type a polars column.
    ///
    /// Numeric dtypes become numeric features (nulls and NaN are missing);
    /// strings, categoricals and booleans become categorical features; a
    /// column of nulls is an all-missing numeric feature. Anything else is
    /// `UnsupportedType`.
    pub fn from_column(col: &Column) -> Result<Self> {
        let dtype = col.dtype();

        if dtype.is_primitive_numeric() {
            let float_col = col.cast(&DataType::Float64)?;
            let values = float_col.f64()?.iter().map(clean).collect();
            return Ok(Feature::Numeric(values));
        }

        match dtype {
            DataType::Null => Ok(Feature::Numeric(vec![None; col.len()])),
            DataType::String | DataType::Categorical(_, _) | DataType::Boolean => {
                let string_col = col.cast(&DataType::String)?;
                let values = string_col
                    .str()?
                    .iter()
                    .map(|v| v.map(|s| s.to_string()))
                    .collect();
                Ok(Feature::Categorical(values))
            }
            other => Err(QualityError::UnsupportedType {
                operation: "feature typing",
                found: format!("column '{}' of type {}", col.name(), other),
            }),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Feature::Numeric(v) => v.len(),
            Feature::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self, index: usize) -> bool {
        match self {
            Feature::Numeric(v) => v[index].is_none(),
            Feature::Categorical(v) => v[index].is_none(),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    /// Number of distinct non-missing values
    pub fn unique_count(&self) -> usize {
        match self {
            Feature::Numeric(v) => distinct_sorted(v).len(),
            Feature::Categorical(v) => v
                .iter()
                .flatten()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .len(),
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Categorical(_) => FeatureKind::Categorical,
            Feature::Numeric(values) => {
                let distinct = distinct_sorted(values).len();
                let ratio = if values.is_empty() {
                    0.0
                } else {
                    distinct as f64 / values.len() as f64
                };
                if distinct > CONTINUOUS_DISTINCT_VALUES || ratio > CONTINUOUS_DISTINCT_RATIO {
                    FeatureKind::Continuous
                } else {
                    FeatureKind::Discrete
                }
            }
        }
    }

    /// Numeric values, or `UnsupportedType` naming `operation` for labels.
    pub fn numeric_values(&self, operation: &'static str) -> Result<&[Option<f64>]> {
        match self {
            Feature::Numeric(v) => Ok(v),
            Feature::Categorical(_) => Err(QualityError::UnsupportedType {
                operation,
                found: "categorical values".to_string(),
            }),
        }
    }
}

/// Distinct non-missing values in ascending order.
pub(crate) fn distinct_sorted(values: &[Option<f64>]) -> Vec<f64> {
    let mut distinct: Vec<f64> = values.iter().flatten().copied().collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    distinct
}

/// Map NaN to missing and -0.0 to 0.0 so equal values compare equal.
fn clean(value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v.is_nan() => None,
        Some(v) if v == 0.0 => Some(0.0),
        other => other,
    }
}
