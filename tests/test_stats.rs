//! Reference values on the seeded 500-row fixture

use ivkit::pipeline::{
    candidate_splits, entropy, entropy_cond, gini, gini_cond, iv, iv_table, iv_with, ks_bucket,
    quality, vif, woe, BinSpec, Bucketing, CutMethod, Feature, KsConfig, QualityConfig,
    MetricValue, Target,
};

#[path = "common/mod.rs"]
mod common;

use common::{assert_close, create_fixture_dataframe, create_masked_dataframe, fixture};

const TOLERANCE: f64 = 1e-12;

fn fixture_target() -> Target {
    Target::new(fixture().target).unwrap()
}

fn integer_feature(values: &[i64]) -> Feature {
    let floats: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    Feature::from_f64(&floats)
}

#[test]
fn test_fixture_matches_numpy_stream() {
    let f = fixture();
    assert_close(f.feature[0], 0.417022004702574, 1e-15);
    assert_eq!(f.target.iter().filter(|&&t| t == 1).count(), 259);
    assert!(f.a.iter().all(|&v| (0..100).contains(&v)));
    assert!(f.mask.iter().all(|&m| m < 8));
}

#[test]
fn test_woe() {
    assert_eq!(woe(0.2, 0.3), -0.4054651081081643);
}

#[test]
fn test_iv_one_bin_per_value() {
    let feature = Feature::from_f64(&fixture().feature);
    let value = iv_with(&feature, &fixture_target(), &BinSpec::Distinct).unwrap();
    assert_close(value, 0.010385942643745353, TOLERANCE);
}

#[test]
fn test_iv_default_binning() {
    let feature = Feature::from_f64(&fixture().feature);
    let value = iv(&feature, &fixture_target()).unwrap();
    assert_close(value, 0.5313391779453922, TOLERANCE);
}

#[test]
fn test_iv_frame() {
    let df = create_fixture_dataframe();
    let table = iv_table(&df, "target", &QualityConfig::default()).unwrap();
    let a = table.iter().find(|e| e.feature == "A").unwrap();
    assert_close(a.iv.value().unwrap(), 0.3427835694491965, TOLERANCE);
    assert!(table.iter().all(|e| e.feature != "target"));
}

#[test]
fn test_gini() {
    assert_close(gini(&fixture_target()), 0.499352, TOLERANCE);
}

#[test]
fn test_entropy_in_nats() {
    assert_close(entropy(&fixture_target()), 0.6924990405193354, TOLERANCE);
}

#[test]
fn test_feature_splits() {
    let feature = Feature::from_f64(&fixture().feature);
    let splits = candidate_splits(&feature, &fixture_target()).unwrap();
    assert_eq!(splits.len(), 243);
    assert!(splits.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_gini_cond() {
    let target = fixture_target();
    let feature = Feature::from_f64(&fixture().feature);
    let value = gini_cond(&feature, &target).unwrap();
    assert_close(value, 0.42705297139960535, TOLERANCE);
    assert!(value <= gini(&target));
}

#[test]
fn test_entropy_cond() {
    let target = fixture_target();
    let feature = Feature::from_f64(&fixture().feature);
    let value = entropy_cond(&feature, &target).unwrap();
    assert_close(value, 0.602846916259801, TOLERANCE);
    assert!(value <= entropy(&target));
}

#[test]
fn test_conditional_impurity_of_integer_features() {
    let f = fixture();
    let target = fixture_target();

    let a = integer_feature(&f.a);
    assert_close(gini_cond(&a, &target).unwrap(), 0.4540484318558774, TOLERANCE);
    assert_close(entropy_cond(&a, &target).unwrap(), 0.6406501266405408, TOLERANCE);

    let b = integer_feature(&f.b);
    assert_close(gini_cond(&b, &target).unwrap(), 0.45158994467036623, TOLERANCE);
    assert_close(entropy_cond(&b, &target).unwrap(), 0.6390856790903581, TOLERANCE);
}

#[test]
fn test_quality() {
    let df = create_fixture_dataframe();
    let report = quality(&df, "target", &QualityConfig::default()).unwrap();

    let feature = report.get("feature").unwrap();
    assert_close(feature.iv.value().unwrap(), 0.5313391779453922, TOLERANCE);
    assert_eq!(feature.unique, Some(500));

    let a = report.get("A").unwrap();
    assert_close(a.gini.value().unwrap(), 0.4540484318558774, TOLERANCE);

    let b = report.get("B").unwrap();
    assert_close(b.entropy.value().unwrap(), 0.6390856790903581, TOLERANCE);

    assert_eq!(report.len(), 3);
    assert_eq!(report.rows[0].feature, "feature");
}

#[test]
fn test_quality_iv_only() {
    let df = create_fixture_dataframe();
    let config = QualityConfig {
        iv_only: true,
        ..QualityConfig::default()
    };
    let report = quality(&df, "target", &config).unwrap();
    let feature = report.get("feature").unwrap();
    assert_eq!(feature.gini, MetricValue::Skipped);
    assert_eq!(feature.gini.to_string(), "--");
    assert_close(feature.iv.value().unwrap(), 0.5313391779453922, TOLERANCE);
}

#[test]
fn test_quality_object_type_array_with_nan() {
    let df = create_masked_dataframe();
    let report = quality(&df, "target", &QualityConfig::default()).unwrap();
    let feature = report.get("feature").unwrap();
    assert_close(feature.iv.value().unwrap(), 0.01637933818053033, TOLERANCE);
    assert_eq!(feature.unique, Some(7));
}

#[test]
fn test_ks_bucket() {
    let feature = Feature::from_f64(&fixture().feature);
    let table = ks_bucket(&feature, &fixture_target(), &KsConfig::default()).unwrap();
    assert_eq!(table.len(), 10);
    assert_close(table.rows[4].ks, 0.028036335090276976, TOLERANCE);
    assert!(table.rows.windows(2).all(|w| w[0].cum_positive_prop <= w[1].cum_positive_prop));
    assert!(table.rows.windows(2).all(|w| w[0].cum_negative_prop <= w[1].cum_negative_prop));
}

#[test]
fn test_ks_bucket_use_step() {
    let feature = Feature::from_f64(&fixture().feature);
    let config = KsConfig {
        method: CutMethod::Step,
        clip_q: 0.01,
        ..KsConfig::default()
    };
    let table = ks_bucket(&feature, &fixture_target(), &config).unwrap();
    assert_close(table.rows[4].ks, 0.0422147102645028, TOLERANCE);
    assert!(table.rows.windows(2).all(|w| w[0].cum_positive_prop <= w[1].cum_positive_prop));
    assert!(table.rows.windows(2).all(|w| w[0].cum_negative_prop <= w[1].cum_negative_prop));
}

#[test]
fn test_ks_bucket_for_all_score() {
    let feature = Feature::from_f64(&fixture().feature);
    let config = KsConfig {
        bucket: Bucketing::Full,
        ..KsConfig::default()
    };
    let table = ks_bucket(&feature, &fixture_target(), &config).unwrap();
    assert_eq!(table.len(), 500);
}

#[test]
fn test_vif() {
    let df = create_fixture_dataframe();
    let entries = vif(&df).unwrap();
    let a = entries.iter().find(|e| e.feature == "A").unwrap();
    assert_close(a.vif, 2.9693364426401105, 1e-9);
    assert_eq!(entries.len(), 4);
}

#[test]
fn test_repeated_runs_are_identical() {
    let df = create_fixture_dataframe();
    let config = QualityConfig {
        with_ks: true,
        ..QualityConfig::default()
    };
    assert_eq!(
        quality(&df, "target", &config).unwrap(),
        quality(&df, "target", &config).unwrap()
    );

    let feature = Feature::from_f64(&fixture().feature);
    let target = fixture_target();
    assert_eq!(iv(&feature, &target).unwrap(), iv(&feature, &target).unwrap());
    assert_eq!(
        ks_bucket(&feature, &target, &KsConfig::default()).unwrap(),
        ks_bucket(&feature, &target, &KsConfig::default()).unwrap()
    );
}
