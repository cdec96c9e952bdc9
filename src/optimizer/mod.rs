use crate::backend::{Backend, Scalar};
use crate::model::ParamOps;

/// Trait for gradient-based optimizers.
///
/// Training logic ([`Trainer`](crate::trainer::Trainer)) is decoupled from
/// the parameter update rule, so any model can be paired with any optimizer
/// without dynamic dispatch.
///
/// # Type Parameters
/// * `B`: computation backend implementing [`Backend`]
/// * `P`: model parameters type (e.g. [`LogisticParams`](crate::model::logistic::LogisticParams))
///
/// # Example
/// ```rust
/// # use logreg_rs::optimizer::{SGD, Optimizer};
/// # use logreg_rs::backend::{CpuBackend, Scalar, Tensor1D};
/// # use logreg_rs::model::logistic::LogisticParams;
/// let params = LogisticParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]),
///     bias: Scalar::<CpuBackend>::new(0.5),
/// };
/// let gradients = LogisticParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![10.0, -20.0]),
///     bias: Scalar::<CpuBackend>::new(-5.0),
/// };
/// let sgd = SGD::<CpuBackend>::new(0.1);
/// let updated = sgd.step(&params, &gradients);
/// assert_eq!(updated.weights.to_vec(), vec![0.0, 4.0]);
/// assert_eq!(updated.bias.to_f64(), 1.0);
/// ```
pub trait Optimizer<B: Backend, P> {
    /// Returns the updated parameters without mutating the inputs.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain gradient descent with a fixed learning rate:
///
/// ```text
/// θ ← θ - η · ∇L(θ)
/// ```
///
/// There is no momentum and no schedule.
#[derive(Clone, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self {
            lr: Scalar::<B>::new(lr),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend, P: ParamOps<B>> Optimizer<B, P> for SGD<B> {
    fn step(&self, params: &P, grads: &P) -> P {
        // single scale + add instead of scale + subtract
        let neg_lr = Scalar::<B>::new(0.0) - self.lr;
        params.add(&grads.scale(neg_lr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, Tensor1D};
    use crate::model::logistic::LogisticParams;

    #[test]
    fn test_sgd_step() {
        let params = LogisticParams {
            weights: Tensor1D::<CpuBackend>::new(vec![1.0, -1.0]),
            bias: Scalar::new(0.0),
        };
        let grads = LogisticParams {
            weights: Tensor1D::<CpuBackend>::new(vec![0.5, 0.25]),
            bias: Scalar::new(-1.0),
        };

        let sgd = SGD::<CpuBackend>::new(2.0);
        assert_eq!(sgd.learning_rate(), 2.0);

        let updated = sgd.step(&params, &grads);
        assert_eq!(updated.weights.to_vec(), vec![0.0, -1.5]);
        assert_eq!(updated.bias.to_f64(), 2.0);
        // inputs untouched
        assert_eq!(params.weights.to_vec(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_zero_gradient_is_fixed_point() {
        let params = LogisticParams::<CpuBackend> {
            weights: Tensor1D::new(vec![0.3, 0.7]),
            bias: Scalar::new(-0.2),
        };
        let zeros = LogisticParams::<CpuBackend>::zeros(2);
        let updated = SGD::<CpuBackend>::new(0.5).step(&params, &zeros);
        assert_eq!(updated.weights.to_vec(), params.weights.to_vec());
        assert_eq!(updated.bias.to_f64(), params.bias.to_f64());
    }
}
