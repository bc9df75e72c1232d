//! Binary target validation
//!
//! Every metric in this crate is defined against a 0/1 target. This module
//! validates target columns once so the binning and metric code can rely on
//! clean labels.

use polars::prelude::*;

use super::error::{QualityError, Result};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// A validated binary target: one 0/1 label per observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    labels: Vec<u8>,
    positives: usize,
}

impl Target {
    /// Build a target from 0/1 labels.
    pub fn new(labels: Vec<u8>) -> Result<Self> {
        if labels.is_empty() {
            return Err(QualityError::EmptyTarget);
        }
        if let Some((row, value)) = labels.iter().enumerate().find(|(_, &v)| v > 1) {
            return Err(QualityError::NonBinaryTarget(format!(
                "value {} at row {}",
                value, row
            )));
        }
        let positives = labels.iter().filter(|&&v| v == 1).count();
        Ok(Self { labels, positives })
    }

    /// Build a target from any numeric slice whose values are 0 or 1.
    ///
    /// Floats are accepted within a small tolerance so that targets that went
    /// through CSV round trips (`0.0`, `1.0`) validate cleanly.
    pub fn from_values<T: Copy + Into<f64>>(values: &[T]) -> Result<Self> {
        let labels = values
            .iter()
            .enumerate()
            .map(|(row, &v)| to_label(v.into(), row))
            .collect::<Result<Vec<u8>>>()?;
        Self::new(labels)
    }

    /// Validate a polars column as a binary target.
    ///
    /// Handles the same edge cases as CSV/Parquet inputs produce:
    /// - empty columns
    /// - null entries (rejected, every observation needs a label)
    /// - integer, float and boolean encodings of 0/1
    pub fn from_column(col: &Column) -> Result<Self> {
        if col.len() == 0 {
            return Err(QualityError::EmptyTarget);
        }

        let dtype = col.dtype();
        if !(dtype.is_primitive_numeric() || matches!(dtype, DataType::Boolean)) {
            return Err(QualityError::NonBinaryTarget(format!(
                "column '{}' has non-numeric type {}",
                col.name(),
                dtype
            )));
        }

        let float_col = col.cast(&DataType::Float64)?;
        let labels = float_col
            .f64()?
            .iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(v) => to_label(v, row),
                None => Err(QualityError::NonBinaryTarget(format!(
                    "missing value at row {}",
                    row
                ))),
            })
            .collect::<Result<Vec<u8>>>()?;

        Self::new(labels)
    }

    /// Look up and validate the named target column of a DataFrame.
    pub fn from_frame(df: &DataFrame, name: &str) -> Result<Self> {
        let col = df
            .column(name)
            .map_err(|_| QualityError::MissingColumn(name.to_string()))?;
        Self::from_column(col)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Number of observations labelled 1
    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Number of observations labelled 0
    pub fn negatives(&self) -> usize {
        self.labels.len() - self.positives
    }

    /// Share of observations labelled 1; never NaN since a target is non-empty
    pub fn positive_rate(&self) -> f64 {
        self.positives as f64 / self.labels.len() as f64
    }

    /// Fail with `ShapeMismatch` unless a feature of `len` observations lines up
    /// with this target.
    pub fn ensure_aligned(&self, len: usize) -> Result<()> {
        if len != self.labels.len() {
            return Err(QualityError::ShapeMismatch {
                feature: len,
                target: self.labels.len(),
            });
        }
        Ok(())
    }
}

fn to_label(value: f64, row: usize) -> Result<u8> {
    if (value - 0.0).abs() < TOLERANCE {
        Ok(0)
    } else if (value - 1.0).abs() < TOLERANCE {
        Ok(1)
    } else {
        Err(QualityError::NonBinaryTarget(format!(
            "value {} at row {}",
            value, row
        )))
    }
}
