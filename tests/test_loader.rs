//! Loading ivkit frames back from CSV and Parquet

use ivkit::pipeline::{
    get_column_names, iv_table, load_dataset, load_dataset_with_progress, QualityConfig,
    DEFAULT_INFER_SCHEMA_LENGTH,
};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::{
    assert_close, create_fixture_dataframe, create_temp_csv, create_temp_parquet,
    create_test_dataframe, FIXTURE_ROWS,
};

const FIXTURE_COLUMNS: [&str; 4] = ["feature", "target", "A", "B"];

#[test]
fn test_fixture_csv_keeps_iv() {
    let mut df = create_fixture_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&path, DEFAULT_INFER_SCHEMA_LENGTH).unwrap();
    assert_eq!(loaded.shape(), (FIXTURE_ROWS, 4));
    assert_eq!(loaded.column("feature").unwrap().dtype(), &DataType::Float64);

    let table = iv_table(&loaded, "target", &QualityConfig::default()).unwrap();
    let feature = table.iter().find(|e| e.feature == "feature").unwrap();
    assert_close(feature.iv.value().unwrap(), 0.5313391779453922, 1e-12);
    let a = table.iter().find(|e| e.feature == "A").unwrap();
    assert_close(a.iv.value().unwrap(), 0.3427835694491965, 1e-12);
}

#[test]
fn test_parquet_returns_the_same_frame() {
    let mut df = create_test_dataframe();
    let (_dir, path) = create_temp_parquet(&mut df);

    let (loaded, rows, cols, mem_mb) = load_dataset_with_progress(&path, 100).unwrap();
    assert_eq!((rows, cols), (12, 5));
    assert!(mem_mb >= 0.0);
    assert!(loaded.equals_missing(&df));
}

#[test]
fn test_csv_keeps_missing_values() {
    let mut df = create_test_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&path, DEFAULT_INFER_SCHEMA_LENGTH).unwrap();
    assert_eq!(loaded.shape(), (12, 5));
    assert_eq!(loaded.column("grade").unwrap().null_count(), 2);
    assert_eq!(loaded.column("empty").unwrap().null_count(), 12);
    assert_eq!(loaded.column("score").unwrap().dtype(), &DataType::Float64);
}

#[test]
fn test_late_float_within_inference_window() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("late_float.csv");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "target,score").unwrap();
    for i in 0..20 {
        writeln!(file, "{},{}", i % 2, i).unwrap();
    }
    writeln!(file, "1,20.5").unwrap();
    drop(file);

    let loaded = load_dataset(&path, 50).unwrap();
    assert_eq!(loaded.column("score").unwrap().dtype(), &DataType::Float64);
    assert_eq!(loaded.column("target").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_column_names_without_rows() {
    let mut df = create_fixture_dataframe();
    let (_csv_dir, csv_path) = create_temp_csv(&mut df);
    let (_parquet_dir, parquet_path) = create_temp_parquet(&mut df);

    assert_eq!(get_column_names(&csv_path).unwrap(), FIXTURE_COLUMNS);
    assert_eq!(get_column_names(&parquet_path).unwrap(), FIXTURE_COLUMNS);
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("scores.json");
    std::fs::write(&path, "{}").unwrap();

    let err = load_dataset(&path, DEFAULT_INFER_SCHEMA_LENGTH).unwrap_err();
    assert!(err.to_string().contains("Unsupported file format"));
    assert!(get_column_names(&path).is_err());
}

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.csv");
    assert!(load_dataset(&path, DEFAULT_INFER_SCHEMA_LENGTH).is_err());
}
