//! JSON-loadable configuration for classifiers and experiments.
//!
//! Every field has a default, so `{}` is a valid configuration:
//!
//! ```
//! use logreg_rs::config::{ClassifierKind, ExperimentConfig};
//!
//! let cfg = ExperimentConfig::from_json_str(r#"{ "test_ratio": 0.25 }"#).unwrap();
//! assert_eq!(cfg.test_ratio, 0.25);
//! assert_eq!(cfg.trainers[0].kind, ClassifierKind::Cpu);
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LogRegError, Result};

/// Seed used when a configuration does not name one.
pub const DEFAULT_SEED: u64 = 71;

/// Which trainer implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    /// Hand-rolled gradient descent on [`CpuBackend`](crate::backend::CpuBackend).
    #[default]
    Cpu,
    /// Hand-rolled gradient descent on [`NdarrayBackend`](crate::backend::NdarrayBackend).
    Ndarray,
    /// Computation-graph trainer.
    Graph,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Cpu => "cpu",
            ClassifierKind::Ndarray => "ndarray",
            ClassifierKind::Graph => "graph",
        }
    }
}

/// Hyperparameters of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub kind: ClassifierKind,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub max_epochs: usize,
    /// Shuffle the training order once before the first epoch.
    pub shuffle: bool,
    /// Seeds the shuffle and, for the graph trainer, weight initialization.
    pub seed: u64,
    /// Standard deviation of the graph trainer's initial weights.
    pub init_std: f64,
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            kind: ClassifierKind::Cpu,
            learning_rate: 0.01,
            batch_size: 64,
            max_epochs: 1000,
            shuffle: true,
            seed: DEFAULT_SEED,
            init_std: 0.01,
            log_every: 100,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(LogRegError::InvalidParameter(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.batch_size == 0 {
            return Err(LogRegError::InvalidParameter(
                "batch_size must be positive".into(),
            ));
        }
        if !(self.init_std.is_finite() && self.init_std >= 0.0) {
            return Err(LogRegError::InvalidParameter(format!(
                "init_std must be non-negative and finite, got {}",
                self.init_std
            )));
        }
        Ok(())
    }
}

/// Where the experiment's examples come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataSource {
    Csv {
        path: PathBuf,
        features: Vec<String>,
        label: String,
    },
    Synthetic {
        n_per_class: usize,
        n_features: usize,
        separation: f64,
    },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Synthetic {
            n_per_class: 250,
            n_features: 2,
            separation: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub data: DataSource,
    /// Fraction of examples, taken from the tail, held out for testing.
    pub test_ratio: f64,
    /// Standardize features with statistics of the training split.
    pub standardize: bool,
    /// Seeds synthetic data generation.
    pub seed: u64,
    pub trainers: Vec<TrainingConfig>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            data: DataSource::default(),
            test_ratio: 0.2,
            standardize: true,
            seed: DEFAULT_SEED,
            trainers: vec![
                TrainingConfig {
                    kind: ClassifierKind::Cpu,
                    learning_rate: 1.0,
                    ..TrainingConfig::default()
                },
                TrainingConfig {
                    kind: ClassifierKind::Graph,
                    learning_rate: 0.01,
                    ..TrainingConfig::default()
                },
            ],
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.test_ratio) {
            return Err(LogRegError::InvalidParameter(format!(
                "test_ratio must be in [0, 1), got {}",
                self.test_ratio
            )));
        }
        if self.trainers.is_empty() {
            return Err(LogRegError::InvalidParameter(
                "at least one trainer must be configured".into(),
            ));
        }
        self.trainers.iter().try_for_each(TrainingConfig::validate)
    }
}
