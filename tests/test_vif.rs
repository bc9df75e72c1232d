//! Integration tests for variance inflation factors

use ivkit::pipeline::{vif, vif_with, VifConfig};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::{create_fixture_dataframe, create_test_dataframe};

#[test]
fn test_fixture_columns_in_frame_order() {
    let entries = vif(&create_fixture_dataframe()).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.feature.as_str()).collect();
    assert_eq!(names, vec!["feature", "target", "A", "B"]);
    assert!(entries.iter().all(|e| e.vif >= 1.0 && e.vif.is_finite()));
}

#[test]
fn test_intercept_lowers_inflation_of_positive_columns() {
    let df = create_fixture_dataframe();
    let uncentered = vif(&df).unwrap();
    let centred = vif_with(&df, &VifConfig { fit_intercept: true }).unwrap();

    for (u, c) in uncentered.iter().zip(&centred) {
        assert_eq!(u.feature, c.feature);
        assert!(c.vif < u.vif, "{}: {} vs {}", u.feature, c.vif, u.vif);
        assert!(c.vif < 1.1);
    }
}

#[test]
fn test_all_missing_column_does_not_erase_rows() {
    let entries = vif(&create_test_dataframe()).unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.feature.as_str()).collect();
    assert_eq!(names, vec!["target", "score", "flat", "empty"]);

    let empty = entries.iter().find(|e| e.feature == "empty").unwrap();
    assert!(empty.vif.is_infinite());
    for entry in entries.iter().filter(|e| e.feature != "empty") {
        assert!(entry.vif.is_finite(), "{} = {}", entry.feature, entry.vif);
        assert!(entry.vif >= 1.0);
    }
}

#[test]
fn test_constant_column_is_infinite_under_intercept() {
    let entries = vif_with(&create_test_dataframe(), &VifConfig { fit_intercept: true }).unwrap();
    let flat = entries.iter().find(|e| e.feature == "flat").unwrap();
    assert!(flat.vif.is_infinite());
    assert!(entries.iter().all(|e| e.feature != "grade"));

    for name in ["target", "score"] {
        let entry = entries.iter().find(|e| e.feature == name).unwrap();
        assert!(entry.vif.is_finite(), "{} = {}", name, entry.vif);
    }
}

#[test]
fn test_duplicate_column_is_infinite() {
    let df = df! {
        "x" => [1.0f64, 2.0, 4.0, 8.0, 3.0],
        "y" => [2.0f64, 1.0, 0.0, 5.0, 7.0],
        "x_copy" => [1.0f64, 2.0, 4.0, 8.0, 3.0],
    }
    .unwrap();
    let entries = vif(&df).unwrap();
    assert!(entries[0].vif.is_infinite());
    assert!(entries[2].vif.is_infinite());
}
