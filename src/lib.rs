//! # logreg-rs
//!
//! Binary logistic regression implemented twice:
//!
//! - by hand: stable sigmoid and cross-entropy, analytic gradients and
//!   mini-batch gradient descent written against a pluggable [`Backend`];
//! - as a computation graph: placeholders, variables and a gradient-descent
//!   optimizer node, run inside a scoped [`graph::Session`].
//!
//! Both sit behind [`classifier::BinaryClassifier`] so they can be swapped
//! from configuration.
//!
//! ## Quick start
//!
//! ```rust
//! use logreg_rs::backend::CpuBackend;
//! use logreg_rs::dataset::InMemoryDataset;
//! use logreg_rs::loss::BCEWithLogitsLoss;
//! use logreg_rs::model::logistic::LogisticRegression;
//! use logreg_rs::model::InferenceModel;
//! use logreg_rs::optimizer::SGD;
//! use logreg_rs::trainer::Trainer;
//! use logreg_rs::backend::Tensor1D;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let data = InMemoryDataset::new(
//!     vec![vec![-2.0], vec![-1.0], vec![1.0], vec![2.0]],
//!     vec![0.0, 0.0, 1.0, 1.0],
//! )?;
//!
//! let trainer = Trainer::<CpuBackend, _, _, LogisticRegression<CpuBackend>, _>::builder(
//!     BCEWithLogitsLoss,
//!     SGD::new(0.5),
//! )
//!     .batch_size(2)
//!     .max_epochs(100)
//!     .build();
//! let mut rng = StdRng::seed_from_u64(71);
//! let (fitted, history) = trainer.fit(LogisticRegression::new(1), &data, &mut rng)?;
//!
//! assert!(fitted.predict(&Tensor1D::new(vec![3.0])).to_f64() > 0.5);
//! assert_eq!(history.len(), 100);
//! # Ok::<(), logreg_rs::LogRegError>(())
//! ```

pub mod backend;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod experiment;
#[cfg(feature = "graph")]
pub mod graph;
pub mod loss;
pub mod metrics;
pub mod model;
pub mod numeric;
pub mod optimizer;
pub mod preprocessing;
#[cfg(feature = "serde")]
pub mod serialization;
pub mod trainer;

pub use backend::{Backend, ScalarOps};
#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
#[cfg(feature = "ndarray")]
pub use backend::NdarrayBackend;
pub use classifier::{build_classifier, BinaryClassifier};
pub use error::{LogRegError, Result};
