//! Classification metrics.

use crate::error::{LogRegError, Result};

/// Fraction of positions where `y_pred` equals `y_true`.
///
/// ```
/// use logreg_rs::metrics::accuracy;
///
/// let acc = accuracy(&[1.0, 0.0, 1.0, 1.0], &[1.0, 1.0, 1.0, 1.0]).unwrap();
/// assert_eq!(acc, 0.75);
/// ```
pub fn accuracy(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(LogRegError::shape(
            format!("{} predictions", y_true.len()),
            format!("{} predictions", y_pred.len()),
        ));
    }
    if y_true.is_empty() {
        return Err(LogRegError::EmptyDataset);
    }

    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Hard labels from probabilities: `1.0` where `p > t`, else `0.0`.
pub fn threshold(probs: &[f64], t: f64) -> Vec<f64> {
    probs
        .iter()
        .map(|&p| if p > t { 1.0 } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0.0, 1.0], &[0.0, 1.0]).unwrap(), 1.0);
        assert_eq!(accuracy(&[0.0, 1.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_accuracy_errors() {
        assert!(matches!(
            accuracy(&[1.0], &[1.0, 0.0]),
            Err(LogRegError::ShapeMismatch { .. })
        ));
        assert!(matches!(accuracy(&[], &[]), Err(LogRegError::EmptyDataset)));
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(
            threshold(&[0.2, 0.5, 0.5000001, 0.99], 0.5),
            vec![0.0, 0.0, 1.0, 1.0]
        );
    }
}
