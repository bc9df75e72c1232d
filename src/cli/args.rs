//! Command-line argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{
    Bucketing, CutMethod, KsConfig, QualityConfig, VifConfig, DEFAULT_BINS, DEFAULT_KS_BUCKETS,
};

/// ivkit - Information Value, WoE, Gini, entropy, KS and VIF for binary targets
#[derive(Parser, Debug)]
#[command(name = "ivkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Input file path (CSV or Parquet)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Columns to drop before analysis (comma-separated).
    #[arg(long, value_delimiter = ',', global = true)]
    pub drop_columns: Vec<String>,

    /// Number of rows to use for schema inference (CSV only).
    /// Higher values improve type detection for ambiguous columns but may be slower.
    #[arg(long, default_value = "10000", global = true)]
    pub infer_schema_length: usize,

    /// Hide the banner, configuration card and progress bars
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// IV, conditional Gini, conditional entropy (and optionally KS) per feature
    Quality {
        /// Binary (0/1) target column
        #[arg(short, long)]
        target: String,

        /// Compute IV only; other metrics are reported as "--"
        #[arg(long, default_value = "false")]
        iv_only: bool,

        /// Add a KS column
        #[arg(long, default_value = "false")]
        ks: bool,

        /// Maximum bins for continuous features
        #[arg(long, default_value_t = DEFAULT_BINS, value_parser = validate_bin_count)]
        max_bins: usize,

        #[command(flatten)]
        bucketing: BucketArgs,
    },

    /// KS bucket table of one numeric feature (usually a score)
    Ks {
        /// Binary (0/1) target column
        #[arg(short, long)]
        target: String,

        /// Feature (score) column
        #[arg(short, long)]
        feature: String,

        /// One row per observation instead of buckets
        #[arg(long, default_value = "false")]
        full: bool,

        #[command(flatten)]
        bucketing: BucketArgs,
    },

    /// Variance inflation factor of every numeric column
    Vif {
        /// Fit an intercept and use centred R²
        #[arg(long, default_value = "false")]
        intercept: bool,
    },
}

/// Bucketing flags shared by the KS-producing commands
#[derive(Args, Debug, Clone)]
pub struct BucketArgs {
    /// Number of KS buckets
    #[arg(long, default_value_t = DEFAULT_KS_BUCKETS, value_parser = validate_bin_count)]
    pub buckets: usize,

    /// Bucket boundaries: "quantile" (equal-frequency) or "step" (equal-width)
    #[arg(long, default_value = "quantile")]
    pub method: CutMethod,

    /// Tail share ignored on each side when computing bucket boundaries, in [0, 0.5)
    #[arg(long, default_value = "0.0", value_parser = validate_clip_q)]
    pub clip_q: f64,
}

impl BucketArgs {
    pub fn ks_config(&self, full: bool) -> KsConfig {
        KsConfig {
            bucket: if full {
                Bucketing::Full
            } else {
                Bucketing::Bins(self.buckets)
            },
            method: self.method,
            clip_q: self.clip_q,
        }
    }
}

impl Cli {
    /// Quality configuration for the `quality` command, `None` for the others
    pub fn quality_config(&self) -> Option<QualityConfig> {
        match &self.command {
            Commands::Quality {
                iv_only,
                ks,
                max_bins,
                bucketing,
                ..
            } => Some(QualityConfig {
                iv_only: *iv_only,
                with_ks: *ks,
                max_bins: *max_bins,
                ks: bucketing.ks_config(false),
                progress: !self.quiet,
            }),
            _ => None,
        }
    }

    pub fn vif_config(&self) -> VifConfig {
        match &self.command {
            Commands::Vif { intercept } => VifConfig {
                fit_intercept: *intercept,
            },
            _ => VifConfig::default(),
        }
    }

    /// Target column of the command, if it takes one
    pub fn target(&self) -> Option<&str> {
        match &self.command {
            Commands::Quality { target, .. } | Commands::Ks { target, .. } => Some(target),
            Commands::Vif { .. } => None,
        }
    }

    pub fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Quality { .. } => "quality",
            Commands::Ks { .. } => "ks",
            Commands::Vif { .. } => "vif",
        }
    }
}

/// Validator for bin and bucket counts
fn validate_bin_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("bin count must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for clip_q parameter
fn validate_clip_q(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..0.5).contains(&value) {
        Err(format!("clip_q must be in [0.0, 0.5), got {}", value))
    } else {
        Ok(value)
    }
}
