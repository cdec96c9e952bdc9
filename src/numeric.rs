//! Numerically stable scalar primitives for logistic regression.
//!
//! Both functions shift the logit by `m = max(0, z)` before exponentiating,
//! so `exp` is only ever evaluated on non-positive arguments and cannot
//! overflow:
//!
//! ```text
//! sigmoid(z)    = exp(z - m) / (exp(-m) + exp(z - m))
//! log(1 + e^z)  = m + ln(exp(-m) + exp(z - m))
//! ```
//!
//! Backends build their element-wise `sigmoid_1d` / `softplus_1d` on top of
//! these, and the graph session uses them for its sigmoid and cross-entropy
//! nodes.

/// Logistic function `1 / (1 + e^(-z))`, evaluated without overflow.
///
/// # Example
/// ```
/// use logreg_rs::numeric::sigmoid;
///
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!(sigmoid(800.0).is_finite());
/// assert!(sigmoid(-800.0).is_finite());
/// ```
pub fn sigmoid(z: f64) -> f64 {
    let z_max = z.max(0.0);
    let z_stable = z - z_max;
    z_stable.exp() / ((-z_max).exp() + z_stable.exp())
}

/// `log(1 + e^z)` in log-sum-exp form: `logsumexp(0, z)`.
pub fn log1p_exp(z: f64) -> f64 {
    let z_max = z.max(0.0);
    z_max + ((-z_max).exp() + (z - z_max).exp()).ln()
}

/// Binary cross-entropy of a single example given its logit.
///
/// ```text
/// -(y * (z - log(1 + e^z)) + (1 - y) * (-log(1 + e^z)))
/// ```
///
/// Non-negative for `y ∈ [0, 1]`.
pub fn binary_cross_entropy_with_logit(label: f64, logit: f64) -> f64 {
    let logsumexp = log1p_exp(logit);
    -(label * (logit - logsumexp) + (1.0 - label) * (-logsumexp))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sigmoid(z: f64) -> f64 {
        1.0 / (1.0 + (-z).exp())
    }

    fn naive_log1p_exp(z: f64) -> f64 {
        (1.0 + z.exp()).ln()
    }

    #[test]
    fn test_sigmoid_matches_naive_for_moderate_logits() {
        let mut z = -30.0;
        while z <= 30.0 {
            let stable = sigmoid(z);
            let naive = naive_sigmoid(z);
            assert!(
                (stable - naive).abs() < 1e-12,
                "z={}: stable={}, naive={}",
                z,
                stable,
                naive
            );
            assert!(stable > 0.0 && stable < 1.0);
            z += 0.25;
        }
    }

    #[test]
    fn test_sigmoid_finite_for_extreme_logits() {
        for &z in &[-1e6, -1000.0, -710.0, 710.0, 1000.0, 1e6] {
            let s = sigmoid(z);
            assert!(s.is_finite(), "sigmoid({}) = {}", z, s);
            assert!((0.0..=1.0).contains(&s));
        }
        // The naive form overflows exp(-z) to infinity and collapses, the
        // stable form never produces NaN.
        assert!((-(-1000.0f64)).exp().is_infinite());
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
    }

    #[test]
    fn test_sigmoid_symmetry() {
        for &z in &[0.1, 1.0, 3.5, 12.0] {
            assert!((sigmoid(z) + sigmoid(-z) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_log1p_exp_matches_naive() {
        for &z in &[-20.0, -3.0, -0.5, 0.0, 0.5, 3.0, 20.0] {
            assert!((log1p_exp(z) - naive_log1p_exp(z)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_log1p_exp_no_overflow() {
        assert!(naive_log1p_exp(800.0).is_infinite());
        assert_eq!(log1p_exp(800.0), 800.0);
        assert!(log1p_exp(-800.0) >= 0.0);
    }

    #[test]
    fn test_cross_entropy_non_negative() {
        for &y in &[0.0, 1.0] {
            let mut z = -50.0;
            while z <= 50.0 {
                assert!(binary_cross_entropy_with_logit(y, z) >= 0.0);
                z += 0.5;
            }
        }
    }

    #[test]
    fn test_cross_entropy_vanishes_only_in_the_limit() {
        // Finite confidence leaves a strictly positive loss.
        assert!(binary_cross_entropy_with_logit(1.0, 5.0) > 0.0);
        assert!(binary_cross_entropy_with_logit(0.0, -5.0) > 0.0);

        // Loss decreases monotonically towards zero as confidence grows.
        let l1 = binary_cross_entropy_with_logit(1.0, 2.0);
        let l2 = binary_cross_entropy_with_logit(1.0, 8.0);
        let l3 = binary_cross_entropy_with_logit(1.0, 30.0);
        assert!(l1 > l2 && l2 > l3);
        assert!(binary_cross_entropy_with_logit(1.0, 800.0) < 1e-300);
    }

    #[test]
    fn test_cross_entropy_known_values() {
        // z = 0: -ln(0.5) regardless of the label
        let ln2 = std::f64::consts::LN_2;
        assert!((binary_cross_entropy_with_logit(1.0, 0.0) - ln2).abs() < 1e-12);
        assert!((binary_cross_entropy_with_logit(0.0, 0.0) - ln2).abs() < 1e-12);

        // Wrong, confident prediction: loss ≈ |z|
        assert!((binary_cross_entropy_with_logit(0.0, 800.0) - 800.0).abs() < 1e-9);
    }
}
