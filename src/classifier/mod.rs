//! Interchangeable binary classifiers behind one trait.
//!
//! Two training strategies produce the same kind of model, a weight vector
//! and a bias:
//!
//! - [`GradientDescentClassifier`]: hand-rolled forward pass, loss and
//!   gradients on any [`Backend`](crate::backend::Backend).
//! - [`GraphClassifier`]: a static computation graph differentiated and
//!   updated inside a [`Session`](crate::graph::Session).
//!
//! [`build_classifier`] picks one from a [`TrainingConfig`].

use rand::RngCore;

use crate::config::{ClassifierKind, TrainingConfig};
use crate::dataset::InMemoryDataset;
use crate::error::{LogRegError, Result};
use crate::metrics;
use crate::model::logistic::Coefficients;
use crate::trainer::TrainingHistory;

mod gradient_descent;
pub use self::gradient_descent::GradientDescentClassifier;

#[cfg(feature = "graph")]
mod graph;
#[cfg(feature = "graph")]
pub use self::graph::GraphClassifier;

/// Decision threshold on the positive-class probability.
pub const DECISION_THRESHOLD: f64 = 0.5;

pub trait BinaryClassifier {
    fn name(&self) -> &str;

    /// Trains on `data`. `rng` drives every random choice of the run, so the
    /// same seed reproduces the same parameters.
    fn fit(&mut self, data: &InMemoryDataset, rng: &mut dyn RngCore) -> Result<TrainingHistory>;

    /// Positive-class probability for each row.
    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Hard `0.0` / `1.0` labels: `1.0` when the probability exceeds 0.5.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        Ok(metrics::threshold(
            &self.predict_proba(features)?,
            DECISION_THRESHOLD,
        ))
    }

    fn coefficients(&self) -> Result<Coefficients>;
}

/// Instantiates the classifier selected by `config.kind`.
pub fn build_classifier(config: &TrainingConfig) -> Result<Box<dyn BinaryClassifier>> {
    config.validate()?;
    match config.kind {
        #[cfg(feature = "cpu")]
        ClassifierKind::Cpu => Ok(Box::new(GradientDescentClassifier::<
            crate::backend::CpuBackend,
        >::new(config.clone()))),
        #[cfg(feature = "ndarray")]
        ClassifierKind::Ndarray => Ok(Box::new(GradientDescentClassifier::<
            crate::backend::NdarrayBackend,
        >::new(config.clone()))),
        #[cfg(feature = "graph")]
        ClassifierKind::Graph => Ok(Box::new(GraphClassifier::new(config.clone()))),
        #[allow(unreachable_patterns)]
        kind => Err(LogRegError::InvalidParameter(format!(
            "classifier `{}` is not enabled in this build",
            kind.as_str()
        ))),
    }
}

/// Labels must be exactly 0 or 1.
pub(crate) fn check_binary_labels(labels: &[f64]) -> Result<()> {
    match labels.iter().position(|&y| y != 0.0 && y != 1.0) {
        Some(row) => Err(LogRegError::NonBinaryLabel {
            row,
            value: labels[row],
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_width(features: &[Vec<f64>], n_features: usize) -> Result<()> {
    match features.iter().position(|r| r.len() != n_features) {
        Some(i) => Err(LogRegError::shape(
            format!("{} features", n_features),
            format!("{} features in row {}", features[i].len(), i),
        )),
        None => Ok(()),
    }
}
