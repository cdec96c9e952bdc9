//! End-to-end run: load data, split, standardize, train every configured
//! classifier and measure its accuracy.

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::classifier::build_classifier;
use crate::config::{DataSource, ExperimentConfig};
use crate::dataset::{make_blobs, read_csv, InMemoryDataset};
use crate::error::Result;
use crate::metrics::accuracy;
use crate::model::logistic::Coefficients;
use crate::preprocessing::StandardScaler;

/// Outcome of one trainer in an experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub classifier: String,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
    pub final_loss: Option<f64>,
    pub coefficients: Coefficients,
}

/// Loads the configured data source.
pub fn load_data(config: &ExperimentConfig) -> Result<InMemoryDataset> {
    match &config.data {
        DataSource::Csv {
            path,
            features,
            label,
        } => InMemoryDataset::try_from(read_csv(path, features, label)?),
        DataSource::Synthetic {
            n_per_class,
            n_features,
            separation,
        } => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            make_blobs(*n_per_class, *n_features, *separation, &mut rng)
        }
    }
}

/// Runs every trainer of `config` on the same train/test split.
///
/// The last `⌊n · test_ratio⌋` examples form the test set. When
/// `standardize` is set, the scaler is fitted on the training split only and
/// applied to both.
pub fn run(config: &ExperimentConfig) -> Result<Vec<ExperimentReport>> {
    config.validate()?;

    let data = load_data(config)?;
    let (mut train, mut test) = data.split_tail(config.test_ratio)?;
    info!(
        "{} training examples, {} test examples",
        train.features().len(),
        test.features().len()
    );

    if config.standardize {
        let scaler = StandardScaler::new().fit(train.features())?;
        train = train.map_features(|r| scaler.transform_row(&r))?;
        test = test.map_features(|r| scaler.transform_row(&r))?;
    }

    let mut reports = Vec::with_capacity(config.trainers.len());
    for trainer in &config.trainers {
        let mut clf = build_classifier(trainer)?;
        let mut rng = StdRng::seed_from_u64(trainer.seed);
        let history = clf.fit(&train, &mut rng)?;

        let train_accuracy = accuracy(train.labels(), &clf.predict(train.features())?)?;
        let test_accuracy = accuracy(test.labels(), &clf.predict(test.features())?)?;
        info!(
            "{}: train accuracy {:.4}, test accuracy {:.4}",
            clf.name(),
            train_accuracy,
            test_accuracy
        );

        reports.push(ExperimentReport {
            classifier: clf.name().to_string(),
            train_accuracy,
            test_accuracy,
            final_loss: history.final_loss(),
            coefficients: clf.coefficients()?,
        });
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierKind, TrainingConfig};
    use crate::dataset::Dataset;
    use crate::error::LogRegError;

    fn quick(kind: ClassifierKind, learning_rate: f64) -> TrainingConfig {
        TrainingConfig {
            kind,
            learning_rate,
            max_epochs: 50,
            batch_size: 16,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_run_on_separated_blobs() {
        let config = ExperimentConfig {
            data: DataSource::Synthetic {
                n_per_class: 60,
                n_features: 2,
                separation: 8.0,
            },
            trainers: vec![
                quick(ClassifierKind::Cpu, 0.5),
                quick(ClassifierKind::Ndarray, 0.5),
                quick(ClassifierKind::Graph, 0.5),
            ],
            ..ExperimentConfig::default()
        };
        let reports = run(&config).unwrap();
        assert_eq!(reports.len(), 3);
        for r in &reports {
            assert!(r.train_accuracy > 0.95, "{}: {}", r.classifier, r.train_accuracy);
            assert!(r.test_accuracy > 0.9, "{}: {}", r.classifier, r.test_accuracy);
            assert_eq!(r.coefficients.weights.len(), 2);
        }
        assert_eq!(reports[0].classifier, "cpu");
        assert_eq!(reports[2].classifier, "graph");
    }

    #[test]
    fn test_load_synthetic_is_seeded() {
        let config = ExperimentConfig::default();
        let a = load_data(&config).unwrap();
        let b = load_data(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
    }

    #[test]
    fn test_missing_csv_fails() {
        let config = ExperimentConfig {
            data: DataSource::Csv {
                path: "/does/not/exist.csv".into(),
                features: vec!["a".into()],
                label: "y".into(),
            },
            ..ExperimentConfig::default()
        };
        assert!(matches!(run(&config), Err(LogRegError::Io(_))));
    }
}
