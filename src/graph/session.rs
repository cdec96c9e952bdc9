use std::collections::{HashMap, HashSet};

use log::debug;
use ndarray::{Array2, Axis, Zip};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use super::{Graph, Initializer, NodeId, Op};
use crate::error::{LogRegError, Result};
use crate::numeric;

fn graph_err(msg: impl Into<String>) -> LogRegError {
    LogRegError::Graph(msg.into())
}

fn value(values: &[Option<Array2<f64>>], id: NodeId) -> Result<&Array2<f64>> {
    values
        .get(id.0)
        .and_then(Option::as_ref)
        .ok_or_else(|| graph_err(format!("node {} has no value in this run", id.0)))
}

fn accumulate(grads: &mut [Option<Array2<f64>>], id: NodeId, g: Array2<f64>) {
    if let Some(acc) = grads[id.0].as_mut() {
        *acc += &g;
    } else {
        grads[id.0] = Some(g);
    }
}

fn broadcast_dim(a: usize, b: usize) -> Option<usize> {
    match (a, b) {
        _ if a == b => Some(a),
        (1, _) => Some(b),
        (_, 1) => Some(a),
        _ => None,
    }
}

/// Sums `g` over the axes along which an operand of `shape` was broadcast.
fn unbroadcast(g: &Array2<f64>, shape: (usize, usize)) -> Array2<f64> {
    let mut out = g.to_owned();
    if shape.0 == 1 && out.nrows() != 1 {
        out = out.sum_axis(Axis(0)).insert_axis(Axis(0));
    }
    if shape.1 == 1 && out.ncols() != 1 {
        out = out.sum_axis(Axis(1)).insert_axis(Axis(1));
    }
    out
}

fn check_unique_names(graph: &Graph) -> Result<()> {
    let mut seen = HashSet::new();
    for (_, name, _, _) in graph.variables() {
        if !seen.insert(name) {
            return Err(graph_err(format!("duplicate variable name `{}`", name)));
        }
    }
    Ok(())
}

/// Execution context of a [`Graph`]: owns the variable values.
///
/// The values live exactly as long as the session. Dropping it, or calling
/// [`close`](Session::close), releases them.
pub struct Session<'g> {
    graph: &'g Graph,
    variables: HashMap<NodeId, Array2<f64>>,
}

impl<'g> Session<'g> {
    /// Opens a session and runs every variable initializer, drawing random
    /// values from `rng` in node order.
    pub fn open<R: Rng + ?Sized>(graph: &'g Graph, rng: &mut R) -> Result<Self> {
        check_unique_names(graph)?;
        let mut variables = HashMap::new();
        for (id, name, shape, init) in graph.variables() {
            let value = match init {
                Initializer::Zeros => Array2::zeros(shape),
                Initializer::Constant(c) => Array2::from_elem(shape, c),
                Initializer::RandomNormal { mean, std } => {
                    let normal = Normal::new(mean, std)
                        .map_err(|e| graph_err(format!("variable `{}`: {}", name, e)))?;
                    Array2::from_shape_fn(shape, |_| normal.sample(rng))
                }
            };
            variables.insert(id, value);
        }
        debug!("session opened with {} variables", variables.len());
        Ok(Self { graph, variables })
    }

    /// Opens a session whose variables take the given values by name instead
    /// of running their initializers.
    pub fn restore(graph: &'g Graph, values: &HashMap<String, Array2<f64>>) -> Result<Self> {
        check_unique_names(graph)?;
        let mut variables = HashMap::new();
        for (id, name, shape, _) in graph.variables() {
            let value = values
                .get(name)
                .ok_or_else(|| graph_err(format!("no value to restore variable `{}`", name)))?;
            if value.dim() != shape {
                return Err(graph_err(format!(
                    "variable `{}` has shape {:?}, restored value has {:?}",
                    name,
                    shape,
                    value.dim()
                )));
            }
            variables.insert(id, value.clone());
        }
        debug!("session restored with {} variables", variables.len());
        Ok(Self { graph, variables })
    }

    pub fn variable_value(&self, name: &str) -> Option<&Array2<f64>> {
        self.graph
            .variables()
            .find(|(_, n, _, _)| *n == name)
            .and_then(|(id, _, _, _)| self.variables.get(&id))
    }

    /// Copies all variable values out, keyed by name.
    pub fn snapshot(&self) -> HashMap<String, Array2<f64>> {
        self.graph
            .variables()
            .filter_map(|(id, name, _, _)| {
                self.variables
                    .get(&id)
                    .map(|v| (name.to_string(), v.clone()))
            })
            .collect()
    }

    /// Evaluates `fetches` given placeholder values in `feed`.
    ///
    /// Every forward value is computed first, from the variable values at the
    /// start of the call. Train nodes among the fetches are then applied in
    /// fetch order; they return an empty `0 × 0` array.
    pub fn run(
        &mut self,
        fetches: &[NodeId],
        feed: &[(NodeId, &Array2<f64>)],
    ) -> Result<Vec<Array2<f64>>> {
        let graph = self.graph;
        let ops = &graph.ops;
        let n = ops.len();

        let mut fed: HashMap<NodeId, &Array2<f64>> = HashMap::new();
        for &(id, v) in feed {
            match ops.get(id.0) {
                Some(Op::Placeholder { name, cols }) => {
                    if v.ncols() != *cols {
                        return Err(graph_err(format!(
                            "placeholder `{}` expects {} columns, fed {}",
                            name,
                            cols,
                            v.ncols()
                        )));
                    }
                    fed.insert(id, v);
                }
                Some(_) => return Err(graph_err(format!("node {} is not a placeholder", id.0))),
                None => return Err(graph_err(format!("unknown node {}", id.0))),
            }
        }

        let mut needed = vec![false; n];
        let mut stack: Vec<NodeId> = fetches.to_vec();
        while let Some(id) = stack.pop() {
            let op = ops
                .get(id.0)
                .ok_or_else(|| graph_err(format!("unknown node {}", id.0)))?;
            if !needed[id.0] {
                needed[id.0] = true;
                stack.extend(op.inputs());
            }
        }

        let mut values: Vec<Option<Array2<f64>>> = vec![None; n];
        for i in (0..n).filter(|&i| needed[i]) {
            let v = self.eval(NodeId(i), &values, &fed)?;
            values[i] = Some(v);
        }

        for &f in fetches {
            if let Op::Minimize {
                loss,
                learning_rate,
            } = ops[f.0]
            {
                let grads = self.gradients(loss, &values)?;
                for (id, g) in grads {
                    if let Some(v) = self.variables.get_mut(&id) {
                        v.scaled_add(-learning_rate, &g);
                    }
                }
            }
        }

        fetches
            .iter()
            .map(|&f| value(&values, f).cloned())
            .collect()
    }

    fn eval(
        &self,
        id: NodeId,
        values: &[Option<Array2<f64>>],
        fed: &HashMap<NodeId, &Array2<f64>>,
    ) -> Result<Array2<f64>> {
        match &self.graph.ops[id.0] {
            Op::Placeholder { name, .. } => fed
                .get(&id)
                .map(|v| (*v).clone())
                .ok_or_else(|| graph_err(format!("placeholder `{}` was not fed", name))),
            Op::Variable { name, .. } => self
                .variables
                .get(&id)
                .cloned()
                .ok_or_else(|| graph_err(format!("variable `{}` is not initialized", name))),
            Op::MatMul(a, b) => {
                let (a, b) = (value(values, *a)?, value(values, *b)?);
                if a.ncols() != b.nrows() {
                    return Err(LogRegError::shape(
                        format!("matmul rhs with {} rows", a.ncols()),
                        format!("{:?}", b.dim()),
                    ));
                }
                Ok(a.dot(b))
            }
            Op::Add(a, b) => {
                let (a, b) = (value(values, *a)?, value(values, *b)?);
                let rows = broadcast_dim(a.nrows(), b.nrows());
                let cols = broadcast_dim(a.ncols(), b.ncols());
                if rows.is_none() || cols.is_none() {
                    return Err(graph_err(format!(
                        "cannot broadcast {:?} with {:?}",
                        a.dim(),
                        b.dim()
                    )));
                }
                Ok(a + b)
            }
            Op::Sigmoid(a) => Ok(value(values, *a)?.mapv(numeric::sigmoid)),
            Op::SigmoidCrossEntropy { labels, logits } => {
                let (y, z) = (value(values, *labels)?, value(values, *logits)?);
                if y.dim() != z.dim() {
                    return Err(graph_err(format!(
                        "labels {:?} and logits {:?} differ in shape",
                        y.dim(),
                        z.dim()
                    )));
                }
                Ok(Zip::from(y)
                    .and(z)
                    .map_collect(|&y, &z| numeric::binary_cross_entropy_with_logit(y, z)))
            }
            Op::ReduceMean(a) => value(values, *a)?
                .mean()
                .map(|m| Array2::from_elem((1, 1), m))
                .ok_or_else(|| graph_err("reduce_mean of an empty array")),
            Op::Minimize { loss, .. } => {
                let dim = value(values, *loss)?.dim();
                if dim != (1, 1) {
                    return Err(graph_err(format!(
                        "minimize needs a 1 x 1 loss, got {:?}",
                        dim
                    )));
                }
                Ok(Array2::zeros((0, 0)))
            }
        }
    }

    /// Reverse-mode pass from `loss`: gradient of every variable it reaches.
    fn gradients(
        &self,
        loss: NodeId,
        values: &[Option<Array2<f64>>],
    ) -> Result<HashMap<NodeId, Array2<f64>>> {
        let mut grads: Vec<Option<Array2<f64>>> = vec![None; loss.0 + 1];
        grads[loss.0] = Some(Array2::ones((1, 1)));
        let mut out = HashMap::new();

        for i in (0..=loss.0).rev() {
            let Some(g) = grads[i].take() else {
                continue;
            };
            match &self.graph.ops[i] {
                Op::Variable { .. } => {
                    out.insert(NodeId(i), g);
                }
                Op::Placeholder { .. } | Op::Minimize { .. } => {}
                Op::MatMul(a, b) => {
                    let ga = g.dot(&value(values, *b)?.t());
                    let gb = value(values, *a)?.t().dot(&g);
                    accumulate(&mut grads, *a, ga);
                    accumulate(&mut grads, *b, gb);
                }
                Op::Add(a, b) => {
                    let ga = unbroadcast(&g, value(values, *a)?.dim());
                    let gb = unbroadcast(&g, value(values, *b)?.dim());
                    accumulate(&mut grads, *a, ga);
                    accumulate(&mut grads, *b, gb);
                }
                Op::Sigmoid(a) => {
                    let s = value(values, NodeId(i))?;
                    accumulate(&mut grads, *a, &g * &s.mapv(|s| s * (1.0 - s)));
                }
                Op::SigmoidCrossEntropy { labels, logits } => {
                    let y = value(values, *labels)?;
                    let z = value(values, *logits)?;
                    accumulate(&mut grads, *logits, &g * &(z.mapv(numeric::sigmoid) - y));
                }
                Op::ReduceMean(a) => {
                    let shape = value(values, *a)?.dim();
                    let n = (shape.0 * shape.1) as f64;
                    accumulate(&mut grads, *a, Array2::from_elem(shape, g[[0, 0]] / n));
                }
            }
        }
        Ok(out)
    }

    /// Releases the session's variables.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        debug!("session released {} variables", self.variables.len());
        self.variables.clear();
    }
}
