//! Properties of the load metrics that reporting relies on.

use loadrisk::{MetricsCalculator, RiskClassifier, RiskLevel};

#[test]
fn test_zero_variance_has_no_monotony() {
    let calc = MetricsCalculator::new();
    for load in [1.0, 250.0, 3000.0] {
        assert_eq!(calc.monotony(&[load; 7]), None);
        assert_eq!(calc.monotony(&[load; 12]), None);
    }
}

#[test]
fn test_flat_week_has_no_strain() {
    let calc = MetricsCalculator::new();
    let loads = [3000.0; 7];
    let total: f64 = loads.iter().sum();

    let monotony = calc.monotony(&loads);
    assert_eq!(monotony, None);
    assert_eq!(MetricsCalculator::strain(total, monotony), None);
}

#[test]
fn test_strain_is_exact_product() {
    let calc = MetricsCalculator::new();
    let loads = [420.0, 0.0, 560.0, 300.0, 0.0, 640.0, 480.0];
    let total: f64 = loads.iter().sum();

    let monotony = calc.monotony(&loads).expect("five workouts with variance");
    assert_eq!(
        MetricsCalculator::strain(total, Some(monotony)),
        Some(total * monotony)
    );
}

#[test]
fn test_acwr_example_is_yellow() {
    let acwr = MetricsCalculator::acwr(7000.0, 5000.0);
    assert!((acwr.unwrap() - 1.4).abs() < 1e-12);
    assert_eq!(
        RiskClassifier::new().risk_level_for_acwr(acwr),
        Some(RiskLevel::Yellow)
    );
}

#[test]
fn test_acwr_undefined_without_chronic_load() {
    let acwr = MetricsCalculator::acwr(1200.0, 0.0);
    assert_eq!(acwr, None);
    assert_eq!(RiskClassifier::new().risk_level_for_acwr(acwr), None);
}

#[test]
fn test_acwr_band_edges() {
    let c = RiskClassifier::new();
    assert_eq!(c.risk_level_for_acwr(Some(0.79)), Some(RiskLevel::Red));
    assert_eq!(c.risk_level_for_acwr(Some(0.80)), Some(RiskLevel::Green));
    assert_eq!(c.risk_level_for_acwr(Some(1.30)), Some(RiskLevel::Green));
    assert_eq!(c.risk_level_for_acwr(Some(1.31)), Some(RiskLevel::Yellow));
    assert_eq!(c.risk_level_for_acwr(Some(1.50)), Some(RiskLevel::Yellow));
    assert_eq!(c.risk_level_for_acwr(Some(1.51)), Some(RiskLevel::Red));
}

#[test]
fn test_z_score_of_mean_is_zero() {
    for std in [0.001, 1.0, 17.5, 9000.0] {
        assert_eq!(MetricsCalculator::z_score(123.4, 123.4, std), Some(0.0));
    }
    assert_eq!(MetricsCalculator::z_score(123.4, 123.4, 0.0), None);
}
