//! Binary logistic regression model.
//!
//! The model is a linear score followed by the logistic link:
//!
//! ```text
//! logit = X · w + b
//! p(y = 1 | x) = sigmoid(logit)
//! ```
//!
//! - [`LogisticRegression`] = `LogisticModel<B, Unfitted>`, used by the trainer.
//!   Its forward pass returns raw logits, which is what
//!   [`BCEWithLogitsLoss`](crate::loss::BCEWithLogitsLoss) consumes.
//! - `LogisticModel<B, Fitted>` is the inference model: probabilities and
//!   coefficients, optionally persisted with `bincode` (feature `serde`).
pub use crate::backend::{Backend, Scalar, ScalarOps, Tensor1D, Tensor2D};
pub use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of a logistic model: weights and bias.
#[derive(Clone, Debug)]
pub struct LogisticParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

impl<B: Backend> LogisticParams<B> {
    /// Zero weights and zero bias.
    pub fn zeros(n_features: usize) -> Self {
        Self {
            weights: Tensor1D::zeros(n_features),
            bias: Scalar::new(0.),
        }
    }
}

impl<B: Backend> ParamOps<B> for LogisticParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(&scalar),
            bias: self.bias * scalar,
        }
    }
}

/// Backend-independent view of fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub bias: f64,
    pub weights: Vec<f64>,
}

impl<B: Backend> From<&LogisticParams<B>> for Coefficients {
    fn from(params: &LogisticParams<B>) -> Self {
        Self {
            bias: params.bias.to_f64(),
            weights: params.weights.to_vec(),
        }
    }
}

impl<B: Backend> From<&Coefficients> for LogisticParams<B> {
    fn from(c: &Coefficients) -> Self {
        Self {
            weights: Tensor1D::new(c.weights.clone()),
            bias: Scalar::new(c.bias),
        }
    }
}

/// A logistic model with its training state encoded at the type level.
pub struct LogisticModel<B: Backend, S> {
    params: LogisticParams<B>,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** logistic regression model.
pub type LogisticRegression<B> = LogisticModel<B, Unfitted>;

impl<B: Backend> LogisticRegression<B> {
    /// Creates a model with zero-initialized weights and bias.
    pub fn new(n_features: usize) -> Self {
        Self::from_params(LogisticParams::zeros(n_features))
    }

    /// Warm start from explicit parameters.
    pub fn from_params(params: LogisticParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

/// Forward pass: `X @ w + b` (logits).
/// Backward pass: `∇w = Xᵀ · g`, `∇b = Σ g` where `g = ∂L/∂logits`.
impl<B: Backend> TrainableModel<B> for LogisticModel<B, Unfitted> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor1D<B>;
    type Params = LogisticParams<B>;
    type Gradients = LogisticParams<B>;
    type Output = LogisticModel<B, Fitted>;

    fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights).add_scalar(&self.params.bias)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LogisticParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LogisticModel<B, Fitted> {
        LogisticModel::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> LogisticModel<B, Fitted> {
    pub fn new(params: LogisticParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    /// Raw scores `X @ w + b` for a batch.
    pub fn logits_batch(&self, input: &Tensor2D<B>) -> Tensor1D<B> {
        input
            .dot(&self.params.weights)
            .add_scalar(&self.params.bias)
    }

    /// Learned bias and weights.
    pub fn coefficients(&self) -> Coefficients {
        (&self.params).into()
    }

    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    /// Writes the coefficients with `bincode`; any backend can load them.
    #[cfg(feature = "serde")]
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::error::Result<()> {
        use crate::serialization::SerializableParams;
        self.coefficients().save(path)
    }

    #[cfg(feature = "serde")]
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> crate::error::Result<Self> {
        use crate::serialization::SerializableParams;
        let coefficients = Coefficients::load(path)?;
        Ok(Self::new((&coefficients).into()))
    }
}

/// Probability of the positive class.
///
/// - Single-sample input: [`Tensor1D<B>`] → [`Scalar<B>`]
/// - Batch input: [`Tensor2D<B>`] → [`Tensor1D<B>`]
impl<B: Backend> InferenceModel<B> for LogisticModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = Scalar<B>;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Tensor1D<B>;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        let logit = self.params.weights.dot(input) + self.params.bias;
        Scalar::new(crate::numeric::sigmoid(logit.to_f64()))
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        self.logits_batch(input).sigmoid()
    }
}
