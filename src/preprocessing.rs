//! Standard Scaler (z-score normalization).
//!
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the per-column mean and `s` the per-column population
//! standard deviation of the data the scaler was fitted on. Columns with
//! zero spread are only centred (`s` is taken as 1).
//!
//! # Example
//! ```
//! use logreg_rs::preprocessing::StandardScaler;
//!
//! let data = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
//! let fitted = StandardScaler::new().fit(&data).unwrap();
//! assert_eq!(fitted.transform(&data).unwrap(), vec![vec![-1.0, 0.0], vec![1.0, 0.0]]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LogRegError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// Centre the data before scaling.
    pub with_mean: bool,
    /// Scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable statistics of a fitted scaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub config: StandardScalerConfig,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    pub fn fit(&self, data: &[Vec<f64>]) -> Result<FittedStandardScaler> {
        let first = data.first().ok_or(LogRegError::EmptyDataset)?;
        let cols = first.len();
        check_width(data, cols)?;
        let n = data.len() as f64;
        let col_mean = column_means(data, cols);

        let mean = if self.config.with_mean {
            col_mean.clone()
        } else {
            vec![0.0; cols]
        };

        let mut std = vec![1.0; cols];
        if self.config.with_std {
            let mut var = vec![0.0; cols];
            for row in data {
                for ((s, v), c) in var.iter_mut().zip(row).zip(&col_mean) {
                    *s += (v - c) * (v - c);
                }
            }
            for (s, v) in std.iter_mut().zip(var) {
                let sd = (v / n).sqrt();
                *s = if sd > 0.0 { sd } else { 1.0 };
            }
        }

        Ok(FittedStandardScaler {
            params: StandardScalerParams {
                config: self.config.clone(),
                mean,
                std,
            },
        })
    }

    /// Fits on `data` and returns it transformed, along with the fitted scaler.
    pub fn fit_transform(&self, data: &[Vec<f64>]) -> Result<(FittedStandardScaler, Vec<Vec<f64>>)> {
        let fitted = self.fit(data)?;
        let out = fitted.transform(data)?;
        Ok((fitted, out))
    }
}

fn column_means(data: &[Vec<f64>], cols: usize) -> Vec<f64> {
    let mut mean = vec![0.0; cols];
    for row in data {
        for (m, v) in mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    mean.iter().map(|m| m / data.len() as f64).collect()
}

fn check_width(data: &[Vec<f64>], cols: usize) -> Result<()> {
    match data.iter().position(|r| r.len() != cols) {
        Some(i) => Err(LogRegError::shape(
            format!("{} columns", cols),
            format!("{} columns in row {}", data[i].len(), i),
        )),
        None => Ok(()),
    }
}

/// A StandardScaler with learned statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    params: StandardScalerParams,
}

impl FittedStandardScaler {
    pub fn from_params(params: StandardScalerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StandardScalerParams {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.params.mean.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.params.mean)
            .zip(&self.params.std)
            .map(|((v, m), s)| (v - m) / s)
            .collect()
    }

    pub fn transform(&self, data: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(data, self.n_features())?;
        Ok(data.iter().map(|r| self.transform_row(r)).collect())
    }

    #[cfg(feature = "serde")]
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        use crate::serialization::SerializableParams;
        self.params.save(path)
    }

    #[cfg(feature = "serde")]
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        use crate::serialization::SerializableParams;
        Ok(Self::from_params(StandardScalerParams::load(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> Vec<Vec<f64>> {
        vec![vec![1.0, 2.0], vec![3.0, 6.0], vec![5.0, 10.0]]
    }

    #[test]
    fn test_zero_mean_unit_variance() {
        let (_, out) = StandardScaler::new().fit_transform(&data()).unwrap();
        for j in 0..2 {
            let col: Vec<f64> = out.iter().map(|r| r[j]).collect();
            let mean = col.iter().sum::<f64>() / 3.0;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 3.0;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_column_is_centred_only() {
        let fitted = StandardScaler::new()
            .fit(&[vec![4.0], vec![4.0]])
            .unwrap();
        assert_eq!(fitted.params().std, vec![1.0]);
        assert_eq!(fitted.transform(&[vec![5.0]]).unwrap(), vec![vec![1.0]]);
    }

    #[test]
    fn test_without_mean() {
        let fitted = StandardScaler::new().with_mean(false).fit(&data()).unwrap();
        assert_eq!(fitted.params().mean, vec![0.0, 0.0]);
        // spread is still measured around the column mean
        let expected = (8.0f64 / 3.0).sqrt();
        assert!((fitted.params().std[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            StandardScaler::new().fit(&[]),
            Err(LogRegError::EmptyDataset)
        ));
        let fitted = StandardScaler::new().fit(&data()).unwrap();
        assert!(matches!(
            fitted.transform(&[vec![1.0]]),
            Err(LogRegError::ShapeMismatch { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_save_load_file() {
        let fitted = StandardScaler::new().with_std(false).fit(&data()).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scaler.bin");
        fitted.save_to_file(&path).unwrap();

        let restored = FittedStandardScaler::load_from_file(&path).unwrap();
        assert_eq!(restored, fitted);
        assert_eq!(
            restored.transform(&[vec![3.0, 6.0]]).unwrap(),
            vec![vec![0.0, 0.0]]
        );
    }
}
