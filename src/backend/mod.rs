//! # Backend Abstraction
//!
//! The hand-rolled logistic regression is written once against the [`Backend`]
//! trait and runs on any numeric-array implementation of it.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Storage                      |
//! |------------------|-----------|------------------------------|
//! | `CpuBackend`     | `cpu`     | `Vec<f64>`, row-major matrix |
//! | `NdarrayBackend` | `ndarray` | `ndarray::Array1/Array2`     |
//!
//! ## Example
//!
//! ```rust
//! use logreg_rs::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.5, 0.5]);
//!
//! let logits = x.dot(&w);
//! assert_eq!(logits.to_vec(), vec![1.5, 3.5]);
//! ```

#[cfg(feature = "cpu")]
mod cpu;
#[cfg(feature = "cpu")]
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Minimal set of tensor operations needed to train and run a logistic model.
///
/// Shape-checked operations panic on mismatch: shapes are validated once at
/// the dataset boundary, so a mismatch inside the training loop is a bug.
pub trait Backend: Clone + Copy + Send + Sync + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Element-wise operations ---

    /// # Panics
    /// If tensors have different lengths.
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// # Panics
    /// If tensors have different lengths.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// # Panics
    /// If tensors have different lengths.
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element of tensor by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Adds a scalar to each element of tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    // --- Reductions ---

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    // --- Scalars and host access ---

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    /// Copies a 1D tensor to the host. Not intended for hot paths.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    fn len_1d(t: &Self::Tensor1D) -> usize;

    // --- Stable non-linearities ---

    /// Element-wise [`crate::numeric::sigmoid`].
    fn sigmoid_1d(x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise [`crate::numeric::log1p_exp`].
    fn softplus_1d(x: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Linear algebra ---

    /// Computes `y = A * x` where `A` is (m × n) and `x` is (n,).
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Computes `y = Aᵀ * x` where `A` is (m × n) and `x` is (m,).
    ///
    /// # Panics
    /// If `A.rows() != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Gathers the given rows, in the given order, into a new matrix.
    ///
    /// # Panics
    /// If any index is out of bounds.
    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D;
}
