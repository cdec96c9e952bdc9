use rand::RngCore;

use super::{check_binary_labels, check_width, BinaryClassifier};
use crate::backend::{Backend, Tensor2D};
use crate::config::TrainingConfig;
use crate::dataset::{Dataset, InMemoryDataset};
use crate::error::{LogRegError, Result};
use crate::loss::BCEWithLogitsLoss;
use crate::model::logistic::{Coefficients, LogisticModel, LogisticParams, LogisticRegression};
use crate::model::{Fitted, InferenceModel};
use crate::optimizer::SGD;
use crate::trainer::{Trainer, TrainingHistory};

type LogisticTrainer<B> =
    Trainer<B, BCEWithLogitsLoss, SGD<B>, LogisticRegression<B>, LogisticParams<B>>;

/// Logistic regression trained by the hand-rolled mini-batch loop on
/// backend `B`.
pub struct GradientDescentClassifier<B: Backend> {
    config: TrainingConfig,
    model: Option<LogisticModel<B, Fitted>>,
}

impl<B: Backend> GradientDescentClassifier<B> {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn model(&self) -> Option<&LogisticModel<B, Fitted>> {
        self.model.as_ref()
    }

    fn fitted(&self) -> Result<&LogisticModel<B, Fitted>> {
        self.model
            .as_ref()
            .ok_or(LogRegError::NotFitted("gradient descent"))
    }
}

impl<B: Backend> BinaryClassifier for GradientDescentClassifier<B> {
    fn name(&self) -> &str {
        self.config.kind.as_str()
    }

    fn fit(&mut self, data: &InMemoryDataset, rng: &mut dyn RngCore) -> Result<TrainingHistory> {
        self.config.validate()?;
        check_binary_labels(data.labels())?;

        let trainer = LogisticTrainer::<B>::builder(
            BCEWithLogitsLoss,
            SGD::new(self.config.learning_rate),
        )
        .batch_size(self.config.batch_size)
        .max_epochs(self.config.max_epochs)
        .shuffle(self.config.shuffle)
        .log_every(self.config.log_every)
        .build();

        let (fitted, history) =
            trainer.fit(LogisticRegression::new(data.n_features()), data, rng)?;
        self.model = Some(fitted);
        Ok(history)
    }

    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        let model = self.fitted()?;
        check_width(features, model.n_features())?;
        if features.is_empty() {
            return Ok(vec![]);
        }
        let x = Tensor2D::<B>::from_rows(features)?;
        Ok(model.predict_batch(&x).to_vec())
    }

    fn coefficients(&self) -> Result<Coefficients> {
        Ok(self.fitted()?.coefficients())
    }
}
