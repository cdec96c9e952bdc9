//! A small static computation graph with reverse-mode differentiation.
//!
//! Graphs are built once from placeholders (fed per run), variables (state
//! owned by a [`Session`]) and operations. Every node is a 2-D `f64` array;
//! placeholders fix their column count and take any number of rows.
//!
//! ```
//! use logreg_rs::graph::{Graph, Initializer};
//! use ndarray::array;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut g = Graph::new();
//! let x = g.placeholder("x", 2);
//! let w = g.variable("w", (2, 1), Initializer::Constant(1.0));
//! let out = g.matmul(x, w);
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let values = g
//!     .with_session(&mut rng, |sess| sess.run(&[out], &[(x, &array![[1.0, 2.0]])]))
//!     .unwrap();
//! assert_eq!(values[0], array![[3.0]]);
//! ```

mod session;

pub use self::session::Session;

use rand::Rng;

use crate::error::Result;

/// Handle to a node of the [`Graph`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// How a session fills a variable when it is opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Initializer {
    Zeros,
    Constant(f64),
    RandomNormal { mean: f64, std: f64 },
}

#[derive(Debug, Clone)]
pub(crate) enum Op {
    Placeholder { name: String, cols: usize },
    Variable { name: String, shape: (usize, usize), init: Initializer },
    MatMul(NodeId, NodeId),
    /// Element-wise sum, broadcasting size-1 axes.
    Add(NodeId, NodeId),
    Sigmoid(NodeId),
    SigmoidCrossEntropy { labels: NodeId, logits: NodeId },
    ReduceMean(NodeId),
    /// Gradient-descent step on every variable the loss depends on.
    Minimize { loss: NodeId, learning_rate: f64 },
}

impl Op {
    /// Nodes whose values this op reads.
    pub(crate) fn inputs(&self) -> Vec<NodeId> {
        match *self {
            Op::Placeholder { .. } | Op::Variable { .. } => vec![],
            Op::MatMul(a, b) | Op::Add(a, b) => vec![a, b],
            Op::Sigmoid(a) | Op::ReduceMean(a) => vec![a],
            Op::SigmoidCrossEntropy { labels, logits } => vec![labels, logits],
            Op::Minimize { loss, .. } => vec![loss],
        }
    }
}

/// Static computation graph. Nodes only reference earlier nodes, so node
/// order is a valid evaluation order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) ops: Vec<Op>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, op: Op) -> NodeId {
        self.ops.push(op);
        NodeId(self.ops.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// An input fed on every run: a `rows × cols` matrix, any `rows`.
    pub fn placeholder(&mut self, name: &str, cols: usize) -> NodeId {
        self.push(Op::Placeholder {
            name: name.to_string(),
            cols,
        })
    }

    /// Trainable state. Names must be unique within a graph.
    pub fn variable(&mut self, name: &str, shape: (usize, usize), init: Initializer) -> NodeId {
        self.push(Op::Variable {
            name: name.to_string(),
            shape,
            init,
        })
    }

    pub fn matmul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(Op::MatMul(a, b))
    }

    pub fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        self.push(Op::Add(a, b))
    }

    pub fn sigmoid(&mut self, a: NodeId) -> NodeId {
        self.push(Op::Sigmoid(a))
    }

    /// Element-wise binary cross-entropy of `sigmoid(logits)` against
    /// `labels`, computed stably from the logits.
    pub fn sigmoid_cross_entropy_with_logits(
        &mut self,
        labels: NodeId,
        logits: NodeId,
    ) -> NodeId {
        self.push(Op::SigmoidCrossEntropy { labels, logits })
    }

    /// Mean over all elements, as a `1 × 1` matrix.
    pub fn reduce_mean(&mut self, a: NodeId) -> NodeId {
        self.push(Op::ReduceMean(a))
    }

    /// Train node: fetching it applies `v ← v − learning_rate · ∂loss/∂v`
    /// to every variable `loss` depends on. `loss` must be `1 × 1`.
    pub fn minimize(&mut self, loss: NodeId, learning_rate: f64) -> NodeId {
        self.push(Op::Minimize {
            loss,
            learning_rate,
        })
    }

    /// Opens a session, hands it to `f` and releases it afterwards, whether
    /// `f` succeeds or not.
    pub fn with_session<R, T, F>(&self, rng: &mut R, f: F) -> Result<T>
    where
        R: Rng + ?Sized,
        F: FnOnce(&mut Session<'_>) -> Result<T>,
    {
        let mut session = Session::open(self, rng)?;
        let out = f(&mut session);
        session.close();
        out
    }

    pub(crate) fn variables(
        &self,
    ) -> impl Iterator<Item = (NodeId, &str, (usize, usize), Initializer)> {
        self.ops.iter().enumerate().filter_map(|(i, op)| match op {
            Op::Variable { name, shape, init } => Some((NodeId(i), name.as_str(), *shape, *init)),
            _ => None,
        })
    }
}
