use std::collections::HashMap;

use log::info;
use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::RngCore;

use super::{check_binary_labels, check_width, BinaryClassifier};
use crate::config::TrainingConfig;
use crate::dataset::{Dataset, InMemoryDataset};
use crate::error::{LogRegError, Result};
use crate::graph::{Graph, Initializer, NodeId, Session};
use crate::model::logistic::Coefficients;
use crate::trainer::TrainingHistory;

const WEIGHTS: &str = "weights";
const BIAS: &str = "bias";

/// Logistic regression expressed as a computation graph:
///
/// ```text
/// logit = X · weights + bias
/// prob  = sigmoid(logit)
/// loss  = mean(sigmoid_cross_entropy(y, logit))
/// train = minimize(loss)
/// ```
struct LogisticGraph {
    graph: Graph,
    x: NodeId,
    y: NodeId,
    prob: NodeId,
    loss: NodeId,
    train: NodeId,
}

impl LogisticGraph {
    fn build(n_inputs: usize, learning_rate: f64, init_std: f64) -> Self {
        let mut g = Graph::new();
        let x = g.placeholder("X", n_inputs);
        let y = g.placeholder("y", 1);
        let w = g.variable(
            WEIGHTS,
            (n_inputs, 1),
            Initializer::RandomNormal {
                mean: 0.0,
                std: init_std,
            },
        );
        let b = g.variable(BIAS, (1, 1), Initializer::Zeros);
        let xw = g.matmul(x, w);
        let logit = g.add(xw, b);
        let prob = g.sigmoid(logit);
        let cross_entropy = g.sigmoid_cross_entropy_with_logits(y, logit);
        let loss = g.reduce_mean(cross_entropy);
        let train = g.minimize(loss, learning_rate);
        Self {
            graph: g,
            x,
            y,
            prob,
            loss,
            train,
        }
    }
}

fn to_matrix(rows: &[&Vec<f64>], cols: usize) -> Result<Array2<f64>> {
    let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Array2::from_shape_vec((rows.len(), cols), flat)
        .map_err(|e| LogRegError::shape(format!("{} columns", cols), e))
}

/// Logistic regression trained through a [`Graph`] and [`Session`].
///
/// The graph is built once per [`fit`](BinaryClassifier::fit) and trained
/// inside a single session; the trained variable values are kept so that
/// predictions can restore them into a fresh session.
pub struct GraphClassifier {
    config: TrainingConfig,
    trained: Option<(LogisticGraph, HashMap<String, Array2<f64>>)>,
}

impl GraphClassifier {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            trained: None,
        }
    }

    fn trained(&self) -> Result<(&LogisticGraph, &HashMap<String, Array2<f64>>)> {
        self.trained
            .as_ref()
            .map(|(g, v)| (g, v))
            .ok_or(LogRegError::NotFitted("graph"))
    }
}

impl BinaryClassifier for GraphClassifier {
    fn name(&self) -> &str {
        "graph"
    }

    fn fit(&mut self, data: &InMemoryDataset, rng: &mut dyn RngCore) -> Result<TrainingHistory> {
        self.config.validate()?;
        check_binary_labels(data.labels())?;
        let cfg = &self.config;
        let n_inputs = data.n_features();
        let n_examples = data.len();

        let mut order: Vec<usize> = (0..n_examples).collect();
        if cfg.shuffle {
            order.shuffle(rng);
        }
        let batches = order
            .chunks(cfg.batch_size)
            .map(|idx| -> Result<(Array2<f64>, Array2<f64>)> {
                let rows: Vec<&Vec<f64>> = idx.iter().map(|&i| &data.features()[i]).collect();
                let y: Vec<f64> = idx.iter().map(|&i| data.labels()[i]).collect();
                let y = Array2::from_shape_vec((idx.len(), 1), y)
                    .map_err(|e| LogRegError::shape("one label per row", e))?;
                Ok((to_matrix(&rows, n_inputs)?, y))
            })
            .collect::<Result<Vec<_>>>()?;

        let model = LogisticGraph::build(n_inputs, cfg.learning_rate, cfg.init_std);
        let (history, values) = model.graph.with_session(rng, |sess| {
            let mut history = TrainingHistory::default();
            for epoch in 0..cfg.max_epochs {
                let mut total_loss = 0.0;
                for (x, y) in &batches {
                    let out = sess.run(&[model.train, model.loss], &[(model.x, x), (model.y, y)])?;
                    total_loss += out[1][[0, 0]] * x.nrows() as f64;
                }
                let epoch_loss = total_loss / n_examples as f64;
                if cfg.log_every > 0 && epoch % cfg.log_every == 0 {
                    info!("epoch {}: training loss {:.6}", epoch, epoch_loss);
                }
                history.epoch_losses.push(epoch_loss);
            }
            Ok((history, sess.snapshot()))
        })?;

        self.trained = Some((model, values));
        Ok(history)
    }

    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<f64>> {
        let (model, values) = self.trained()?;
        let n_inputs = values.get(WEIGHTS).map_or(0, |w| w.nrows());
        check_width(features, n_inputs)?;
        if features.is_empty() {
            return Ok(vec![]);
        }

        let rows: Vec<&Vec<f64>> = features.iter().collect();
        let x = to_matrix(&rows, n_inputs)?;
        let mut sess = Session::restore(&model.graph, values)?;
        let out = sess.run(&[model.prob], &[(model.x, &x)])?;
        Ok(out[0].column(0).to_vec())
    }

    fn coefficients(&self) -> Result<Coefficients> {
        let (_, values) = self.trained()?;
        let missing = |name: &str| LogRegError::Graph(format!("no trained value for `{}`", name));
        let w = values.get(WEIGHTS).ok_or_else(|| missing(WEIGHTS))?;
        let b = values.get(BIAS).ok_or_else(|| missing(BIAS))?;
        Ok(Coefficients {
            bias: b[[0, 0]],
            weights: w.column(0).to_vec(),
        })
    }
}
