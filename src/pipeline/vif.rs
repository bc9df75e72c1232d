//! Variance Inflation Factor across numeric columns
//!
//! Each numeric column is regressed on all the others by ordinary least
//! squares and reported as `1 / (1 - R²)`. By default the regressions have no
//! intercept and R² is uncentered (`1 - SSR / Σy²`).

use faer::linalg::solvers::SpSolverLstsq;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::error::{QualityError, Result};

/// Diagonal of the pivoted R factor, relative to its largest entry, below
/// which the design matrix is rank deficient
const RANK_TOLERANCE: f64 = 1e-12;

/// R² at or above this is treated as perfect collinearity
const PERFECT_FIT: f64 = 1.0 - 1e-12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VifConfig {
    /// Add a constant regressor and use centred R²
    pub fit_intercept: bool,
}

/// VIF of one column
#[derive(Debug, Clone, PartialEq)]
pub struct VifEntry {
    pub feature: String,
    pub vif: f64,
}

/// VIF of every numeric column of `df` with the default configuration
pub fn vif(df: &DataFrame) -> Result<Vec<VifEntry>> {
    vif_with(df, &VifConfig::default())
}

/// VIF of every numeric column of `df`, in column order.
///
/// All-missing columns, and constant columns when an intercept is fitted,
/// take no part in the regressions and report `+inf`. Remaining rows with a
/// missing value in any regressor are dropped. Perfectly collinear or
/// singular fits report `+inf`.
pub fn vif_with(df: &DataFrame, config: &VifConfig) -> Result<Vec<VifEntry>> {
    let columns = numeric_columns(df)?;
    let mut usable: Vec<&NumericColumn> = Vec::new();
    for column in &columns {
        if column.is_degenerate(config.fit_intercept) {
            warn!(feature = %column.name, "column excluded from VIF regressions");
        } else {
            usable.push(column);
        }
    }

    let x = complete_rows(&usable, df.height());
    debug!(
        rows = x.nrows(),
        columns = usable.len(),
        "computing variance inflation factors"
    );

    let fitted: Vec<f64> = (0..usable.len())
        .into_par_iter()
        .map(|j| match r_squared(&x, j, config.fit_intercept) {
            Ok(r2) if r2 < PERFECT_FIT => 1.0 / (1.0 - r2),
            _ => f64::INFINITY,
        })
        .collect();

    let mut fitted = fitted.into_iter();
    let entries = columns
        .iter()
        .map(|column| VifEntry {
            feature: column.name.clone(),
            vif: if column.is_degenerate(config.fit_intercept) {
                f64::INFINITY
            } else {
                fitted.next().unwrap_or(f64::INFINITY)
            },
        })
        .collect();
    Ok(entries)
}

/// A numeric column with NaN folded into missing
struct NumericColumn {
    name: String,
    values: Vec<Option<f64>>,
}

impl NumericColumn {
    /// No regression can use this column: it has no values, or it is constant
    /// and would duplicate the intercept
    fn is_degenerate(&self, fit_intercept: bool) -> bool {
        let mut present = self.values.iter().flatten();
        match present.next() {
            None => true,
            Some(first) => fit_intercept && present.all(|v| v == first),
        }
    }
}

fn numeric_columns(df: &DataFrame) -> Result<Vec<NumericColumn>> {
    let mut columns = Vec::new();
    for col in df.get_columns() {
        if !col.dtype().is_primitive_numeric() && !matches!(col.dtype(), DataType::Null) {
            continue;
        }
        let float_col = col.cast(&DataType::Float64)?;
        let values = float_col
            .f64()?
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        columns.push(NumericColumn {
            name: col.name().to_string(),
            values,
        });
    }
    Ok(columns)
}

/// Dense matrix of `columns` over the rows where all of them are present
fn complete_rows(columns: &[&NumericColumn], height: usize) -> Mat<f64> {
    let complete: Vec<usize> = (0..height)
        .filter(|&row| columns.iter().all(|c| c.values[row].is_some()))
        .collect();
    if complete.len() < height {
        debug!(
            dropped = height - complete.len(),
            "dropped rows with missing values"
        );
    }

    Mat::from_fn(complete.len(), columns.len(), |i, j| {
        columns[j].values[complete[i]].unwrap_or_default()
    })
}

/// R² of column `target` regressed on every other column of `x`
fn r_squared(x: &Mat<f64>, target: usize, fit_intercept: bool) -> Result<f64> {
    let n = x.nrows();
    let others: Vec<usize> = (0..x.ncols()).filter(|&j| j != target).collect();
    let k = others.len() + usize::from(fit_intercept);
    if n == 0 || n < k {
        return Err(QualityError::SingularRegression);
    }

    let offset = usize::from(fit_intercept);
    let design = Mat::from_fn(n, k, |i, c| {
        if c < offset {
            1.0
        } else {
            x[(i, others[c - offset])]
        }
    });
    let y = Mat::from_fn(n, 1, |i, _| x[(i, target)]);

    let fitted = if k == 0 {
        Mat::<f64>::zeros(n, 1)
    } else {
        let qr = design.col_piv_qr();
        let r = qr.compute_thin_r();
        let largest = r[(0, 0)].abs();
        if largest == 0.0 || (0..k).any(|i| r[(i, i)].abs() <= largest * RANK_TOLERANCE) {
            return Err(QualityError::SingularRegression);
        }
        let beta = qr.solve_lstsq(&y);
        &design * &beta
    };

    let mean = if fit_intercept {
        (0..n).map(|i| y[(i, 0)]).sum::<f64>() / n as f64
    } else {
        0.0
    };
    let mut ssr = 0.0;
    let mut sst = 0.0;
    for i in 0..n {
        let observed = y[(i, 0)];
        let residual = observed - fitted[(i, 0)];
        ssr += residual * residual;
        sst += (observed - mean) * (observed - mean);
    }

    if sst == 0.0 {
        return Err(QualityError::SingularRegression);
    }
    Ok(1.0 - ssr / sst)
}
