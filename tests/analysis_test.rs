use approx::{assert_abs_diff_eq, assert_relative_eq};
use ising2d::analysis::{onsager_magnetization, CRITICAL_TEMPERATURE};

#[test]
fn test_critical_temperature() {
    let exact = 2.0 / (1.0 + 2.0f64.sqrt()).ln();
    assert_relative_eq!(CRITICAL_TEMPERATURE, exact, max_relative = 1e-12);
}

#[test]
fn test_onsager_limits() {
    assert_eq!(onsager_magnetization(CRITICAL_TEMPERATURE), 0.0);
    assert_eq!(onsager_magnetization(3.0), 0.0);
    assert!(onsager_magnetization(0.5) > 0.9999);
    assert_abs_diff_eq!(onsager_magnetization(2.0), 0.911_319, epsilon = 1e-4);
}

#[test]
fn test_onsager_decreases_towards_tc() {
    let temps: Vec<f64> = (0..40).map(|k| 1.0 + 0.03 * k as f64).collect();
    for w in temps.windows(2) {
        assert!(
            onsager_magnetization(w[0]) >= onsager_magnetization(w[1]),
            "not monotone between T = {} and {}",
            w[0],
            w[1]
        );
    }
}
