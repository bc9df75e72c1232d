//! Error types for feature quality evaluation.
//!
//! Whole-table operations distinguish between failures that belong to a single
//! feature (reported as a sentinel in that feature's row) and structural
//! failures that invalidate the whole call.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while binning features or computing quality metrics.
#[derive(Debug, Error)]
pub enum QualityError {
    /// Feature and target lengths differ.
    ///
    /// Always fatal: positional alignment between a feature and its target is
    /// the basis of every statistic, so no partial result is produced.
    #[error("feature has {feature} observations but target has {target}")]
    ShapeMismatch {
        /// Number of feature observations
        feature: usize,
        /// Number of target observations
        target: usize,
    },

    /// An operation that needs ordered numeric values got something else.
    #[error("{operation} requires numeric values, got {found}")]
    UnsupportedType {
        /// Operation that rejected the input
        operation: &'static str,
        /// Description of the offending values
        found: String,
    },

    /// More bins were requested than distinct values can support.
    #[error("requested {requested} bins but only {available} distinct values are available")]
    DegenerateBinning {
        /// Requested bin count
        requested: usize,
        /// Distinct non-missing values available
        available: usize,
    },

    /// The regression design matrix has no usable column.
    #[error("regression design matrix is singular")]
    SingularRegression,

    /// Target contains a value other than 0 or 1.
    #[error("target must be binary (0/1): {0}")]
    NonBinaryTarget(String),

    /// Target has no observations.
    #[error("target is empty")]
    EmptyTarget,

    /// A named column does not exist in the table.
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// Configuration value out of its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl QualityError {
    /// Whether a whole-table operation may recover from this error by flagging
    /// the offending feature instead of aborting.
    pub fn is_feature_local(&self) -> bool {
        matches!(
            self,
            QualityError::UnsupportedType { .. } | QualityError::DegenerateBinning { .. }
        )
    }
}

/// Result alias used across the pipeline.
pub type Result<T, E = QualityError> = std::result::Result<T, E>;
