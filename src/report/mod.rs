//! Report module - terminal tables for metric results

pub mod ks;
pub mod quality;
pub mod vif;

pub use ks::*;
pub use quality::*;
pub use vif::*;
