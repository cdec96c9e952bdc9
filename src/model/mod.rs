//! Models with compile-time training state.

pub mod state;
pub use state::{Fitted, Unfitted};

pub mod logistic;

use crate::backend::{Backend, Scalar};

/// Training-side interface: forward pass, analytic backward pass and
/// parameter access for the optimizer.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    /// Number of input features the model expects per example.
    fn n_features(&self) -> usize;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss w.r.t. the parameters, given `∂L/∂prediction`.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    fn update_params(&mut self, new_params: &Self::Params);

    /// Drops training-only state and returns the inference model.
    fn into_fitted(self) -> Self::Output;
}

/// Vector-space operations on a parameter set, used by optimizers.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: Scalar<B>) -> Self;
}

/// Inference-side interface of a fitted model.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
}
