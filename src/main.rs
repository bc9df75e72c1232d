//! ivkit: feature quality CLI
//!
//! Loads a CSV or Parquet dataset and prints IV/Gini/entropy quality, KS
//! bucket or VIF tables.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use ivkit::cli::{Cli, Commands};
use ivkit::pipeline::{
    ks_bucket, load_dataset, load_dataset_with_progress, quality, vif_with, Feature, Target,
};
use ivkit::report::{display_ks, display_quality, display_vif};
use ivkit::utils::logging::init_logging;
use ivkit::utils::styling::{print_banner, print_config, print_info, print_success};

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let input = cli.input.clone().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;

    if !cli.quiet {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&input, cli.target(), cli.command_name());
    }

    let start = Instant::now();
    let mut df = if cli.quiet {
        load_dataset(&input, cli.infer_schema_length)?
    } else {
        let (df, rows, cols, memory_mb) =
            load_dataset_with_progress(&input, cli.infer_schema_length)?;
        print_success("Dataset loaded");
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Rows: {}", rows);
        println!("      Columns: {}", cols);
        println!("      Estimated memory: {:.2} MB", memory_mb);
        df
    };

    if !cli.drop_columns.is_empty() {
        let mut dropped = 0;
        for name in &cli.drop_columns {
            if df.get_column_index(name).is_some() {
                df = df.drop(name)?;
                dropped += 1;
            }
        }
        if !cli.quiet {
            print_info(&format!("Dropped {} column(s)", dropped));
        }
    }

    match &cli.command {
        Commands::Quality { target, .. } => {
            let config = cli
                .quality_config()
                .context("quality configuration missing")?;
            let report = quality(&df, target, &config)
                .with_context(|| format!("Failed to evaluate features against '{}'", target))?;
            display_quality(&report);
        }
        Commands::Ks {
            target,
            feature,
            full,
            bucketing,
        } => {
            let target_values = Target::from_frame(&df, target)?;
            let column = df
                .column(feature)
                .with_context(|| format!("Feature column '{}' not found", feature))?;
            let feature_values = Feature::from_column(column)?;
            let table = ks_bucket(&feature_values, &target_values, &bucketing.ks_config(*full))
                .with_context(|| format!("Failed to bucket '{}'", feature))?;
            display_ks(feature, &table);
        }
        Commands::Vif { .. } => {
            let entries = vif_with(&df, &cli.vif_config())?;
            display_vif(&entries);
        }
    }

    if !cli.quiet {
        println!();
        print_info(&format!(
            "Completed in {:.2}s",
            start.elapsed().as_secs_f64()
        ));
    }

    Ok(())
}
