use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::error::{LogRegError, Result};
use std::marker::PhantomData;

/// Backend-typed 2D tensor, row-major: one example per row.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self::from_raw(B::from_vec_2d(data, rows, cols))
    }

    /// Builds a matrix from per-example rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(LogRegError::shape(
                format!("{} columns", cols),
                format!("{} columns in row {}", row.len(), i),
            ));
        }
        let data = rows.iter().flat_map(|r| r.iter()).copied().collect();
        Ok(Self::new(data, rows.len(), cols))
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Matrix-vector product `self · v`.
    pub fn dot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &v.data))
    }

    /// Transposed product `selfᵀ · v`.
    pub fn tdot(&self, v: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec_transposed(&self.data, &v.data))
    }

    /// Gathers rows in the given order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self::from_raw(B::select_rows_2d(&self.data, rows))
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_tensor2d_matvec_ops() {
        // A = [[1.0, 2.0],
        //      [3.0, 4.0]]
        let a = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<CpuBackend>::new(vec![1.0, 0.0]);

        assert_eq!(a.dot(&x).to_vec(), vec![1.0, 3.0]);
        // Aᵀ · x = [1, 2]
        assert_eq!(a.tdot(&x).to_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_from_rows() {
        let t = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
            .unwrap();
        assert_eq!(t.shape(), (3, 2));

        let ragged = Tensor2D::<CpuBackend>::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(ragged, Err(LogRegError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_select_rows_keeps_requested_order() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0], 3, 2);
        let picked = t.select_rows(&[2, 0]);
        assert_eq!(picked.shape(), (2, 2));

        let ones = Tensor1D::<CpuBackend>::new(vec![1.0, 1.0]);
        assert_eq!(picked.dot(&ones).to_vec(), vec![6.0, 2.0]);
    }

    #[test]
    fn test_empty_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![], 0, 5);
        assert_eq!(t.shape(), (0, 5));
    }
}
