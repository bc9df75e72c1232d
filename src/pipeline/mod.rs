//! Pipeline module - binning engine and feature quality metrics
//!
//! Data flows leaf-first: a typed [`Feature`] and a validated [`Target`] are
//! binned ([`binning`]), counted ([`stats`]) and reduced to metrics
//! ([`woe`], [`impurity`], [`ks`]). [`vif`] works on the whole numeric
//! table and [`quality`] drives everything per column.

pub mod binning;
pub mod error;
pub mod feature;
pub mod impurity;
pub mod ks;
pub mod loader;
pub mod quality;
pub mod splits;
pub mod stats;
pub mod target;
pub mod vif;
pub mod woe;

pub use binning::*;
pub use error::{QualityError, Result};
pub use feature::*;
pub use impurity::*;
pub use ks::*;
pub use loader::*;
pub use quality::*;
pub use splits::*;
pub use stats::*;
pub use target::*;
pub use vif::*;
pub use woe::*;
