use std::marker::PhantomData;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::{
    backend::{Backend, Tensor1D, Tensor2D},
    dataset::Dataset,
    error::{LogRegError, Result},
    loss::Loss,
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
};

/// Per-epoch training losses, in epoch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingHistory {
    pub epoch_losses: Vec<f64>,
}

impl TrainingHistory {
    pub fn final_loss(&self) -> Option<f64> {
        self.epoch_losses.last().copied()
    }

    pub fn len(&self) -> usize {
        self.epoch_losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epoch_losses.is_empty()
    }
}

/// Mini-batch gradient descent over a [`Dataset`].
///
/// Immutable once built; construct it with [`Trainer::builder`].
pub struct Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) shuffle: bool,
    pub(crate) log_every: usize,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

pub struct TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: usize,
    max_epochs: usize,
    shuffle: bool,
    log_every: usize,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P> TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 64,
            max_epochs: 1000,
            shuffle: true,
            log_every: 100,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Shuffle the example order once before the first epoch.
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Log the epoch loss every `n` epochs; `0` disables epoch logging.
    pub fn log_every(mut self, n: usize) -> Self {
        self.log_every = n;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            shuffle: self.shuffle,
            log_every: self.log_every,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B, Target = Tensor1D<B>, Prediction = Tensor1D<B>>,
    M: TrainableModel<B, Input = Tensor2D<B>, Prediction = Tensor1D<B>, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
    P: ParamOps<B>,
{
    /// Trains `model` for `max_epochs` epochs and returns it fitted, along
    /// with the per-epoch loss history.
    ///
    /// Each batch does forward → loss → gradients → update. The batch loss is
    /// measured on the forward pass before the update, the same point the
    /// graph trainer reads it; a loop that re-evaluates after the step would
    /// report every loss one update later. The epoch loss is the
    /// example-weighted mean of the batch losses. `rng` only drives the
    /// shuffle, so the same seed reproduces the batch order and every
    /// parameter update.
    pub fn fit<D, R>(
        &self,
        mut model: M,
        dataset: &D,
        rng: &mut R,
    ) -> Result<(M::Output, TrainingHistory)>
    where
        D: Dataset,
        R: Rng + ?Sized,
    {
        let n_total = dataset.len();
        if n_total == 0 {
            return Err(LogRegError::EmptyDataset);
        }
        if self.batch_size == 0 {
            return Err(LogRegError::InvalidParameter(
                "batch_size must be positive".into(),
            ));
        }
        if dataset.n_features() != model.n_features() {
            return Err(LogRegError::shape(
                format!("{} features per example", model.n_features()),
                format!("{} features per example", dataset.n_features()),
            ));
        }

        let mut order: Vec<usize> = (0..n_total).collect();
        if self.shuffle {
            order.shuffle(rng);
        }
        debug!(
            "training on {} examples, batch size {}, {} epochs",
            n_total, self.batch_size, self.max_epochs
        );

        let mut history = TrainingHistory {
            epoch_losses: Vec::with_capacity(self.max_epochs),
        };

        for epoch in 0..self.max_epochs {
            let mut weighted_loss = 0.0;
            for batch_result in dataset.batches_in_order::<B>(&order, self.batch_size) {
                let (batch_x, batch_y) = batch_result?;
                let preds = model.forward(&batch_x);
                let batch_loss = self.loss_fn.loss(&preds, &batch_y).to_f64();
                weighted_loss += batch_loss * batch_y.len() as f64;

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &batch_y);
                let grads = model.backward(&batch_x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(&new_params);
            }

            let epoch_loss = weighted_loss / n_total as f64;
            if self.log_every > 0 && epoch % self.log_every == 0 {
                info!("epoch {}: training loss {:.6}", epoch, epoch_loss);
            }
            history.epoch_losses.push(epoch_loss);
        }

        Ok((model.into_fitted(), history))
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::dataset::InMemoryDataset;
    use crate::loss::BCEWithLogitsLoss;
    use crate::model::logistic::LogisticRegression;
    use crate::optimizer::SGD;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type CpuTrainer = Trainer<
        CpuBackend,
        BCEWithLogitsLoss,
        SGD<CpuBackend>,
        LogisticRegression<CpuBackend>,
        crate::model::logistic::LogisticParams<CpuBackend>,
    >;

    fn toy() -> InMemoryDataset {
        let x = vec![
            vec![-2.0, -1.0],
            vec![-1.5, -2.0],
            vec![-1.0, -0.5],
            vec![1.0, 0.5],
            vec![1.5, 2.0],
            vec![2.0, 1.0],
        ];
        let y = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        InMemoryDataset::new(x, y).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.1)).build();
        assert_eq!(trainer.batch_size, 64);
        assert_eq!(trainer.max_epochs, 1000);
        assert!(trainer.shuffle);
        assert_eq!(trainer.log_every, 100);
    }

    #[test]
    fn test_first_epoch_loss_is_ln2_from_zero_init() {
        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.1))
            .batch_size(6)
            .max_epochs(3)
            .build();
        let mut rng = StdRng::seed_from_u64(0);
        let (_, history) = trainer
            .fit(LogisticRegression::new(2), &toy(), &mut rng)
            .unwrap();

        assert_eq!(history.len(), 3);
        assert!((history.epoch_losses[0] - 2f64.ln()).abs() < 1e-12);
        assert!(history.final_loss().unwrap() < history.epoch_losses[0]);
    }

    #[test]
    fn test_fits_toy_problem() {
        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.5))
            .batch_size(2)
            .max_epochs(200)
            .build();
        let mut rng = StdRng::seed_from_u64(1);
        let (fitted, _) = trainer
            .fit(LogisticRegression::new(2), &toy(), &mut rng)
            .unwrap();

        let c = fitted.coefficients();
        assert!(c.weights.iter().all(|&w| w > 0.0));
    }

    #[test]
    fn test_zero_batch_size_is_error() {
        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.1))
            .batch_size(0)
            .build();
        let mut rng = StdRng::seed_from_u64(0);
        let res = trainer.fit(LogisticRegression::new(2), &toy(), &mut rng);
        assert!(matches!(res, Err(LogRegError::InvalidParameter(_))));
    }

    #[test]
    fn test_model_wider_than_dataset_is_error() {
        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.1)).build();
        let mut rng = StdRng::seed_from_u64(0);
        let res = trainer.fit(LogisticRegression::new(3), &toy(), &mut rng);
        assert!(matches!(res, Err(LogRegError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_width_after_feature_transform_is_checked() {
        use crate::dataset::{MappedDataset, TabularData};

        let (x, y) = toy().into_parts();
        let table = TabularData {
            feature_names: vec!["a".into(), "b".into()],
            features: x,
            labels: y,
        };
        let squared = MappedDataset::from_reader(move || Ok(table))
            .unwrap()
            .with_transform(|row| row.iter().map(|v| v * v).chain(row.iter().copied()).collect());

        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.1))
            .max_epochs(5)
            .build();
        let mut rng = StdRng::seed_from_u64(0);
        let res = trainer.fit(LogisticRegression::new(2), &squared, &mut rng);
        match res {
            Err(LogRegError::ShapeMismatch { expected, got }) => {
                assert!(expected.starts_with("2 "));
                assert!(got.starts_with("4 "));
            }
            _ => panic!("expected a shape mismatch"),
        }

        let (fitted, history) = trainer
            .fit(LogisticRegression::new(4), &squared, &mut rng)
            .unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(fitted.n_features(), 4);
    }

    #[test]
    fn test_zero_epochs_returns_initial_params() {
        let trainer = CpuTrainer::builder(BCEWithLogitsLoss, SGD::new(0.1))
            .max_epochs(0)
            .build();
        let mut rng = StdRng::seed_from_u64(0);
        let (fitted, history) = trainer
            .fit(LogisticRegression::new(2), &toy(), &mut rng)
            .unwrap();
        assert!(history.is_empty());
        assert_eq!(fitted.coefficients().weights, vec![0.0, 0.0]);
    }
}
