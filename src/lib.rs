//! ivkit: feature quality metrics for binary targets
//!
//! Bins features (continuous, discrete or categorical, with or without
//! missing values) against a 0/1 target and reduces the bins to Information
//! Value, Weight of Evidence, conditional Gini and entropy, and KS. VIF
//! diagnoses multicollinearity across numeric columns.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
