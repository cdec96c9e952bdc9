use super::Backend;
use crate::numeric;

/// Pure-Rust backend: vectors are `Vec<f64>`, matrices are row-major buffers.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix: `(data, rows, cols)`.
#[derive(Debug, Clone)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.0[i * self.2..(i + 1) * self.2]
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data, rows, cols)
    }

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Shapes must match");
        a.iter().zip(b.iter()).map(|(a, b)| a + b).collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Shapes must match");
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Shapes must match");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn sigmoid_1d(x: &Self::Tensor1D) -> Self::Tensor1D {
        x.iter().map(|&z| numeric::sigmoid(z)).collect()
    }

    fn softplus_1d(x: &Self::Tensor1D) -> Self::Tensor1D {
        x.iter().map(|&z| numeric::log1p_exp(z)).collect()
    }

    fn matvec(a: &CpuTensor2D, x: &Vec<f64>) -> Vec<f64> {
        assert_eq!(a.2, x.len(), "matvec: A.cols must equal x.len");
        (0..a.1)
            .map(|i| a.row(i).iter().zip(x.iter()).map(|(a, b)| a * b).sum())
            .collect()
    }

    fn matvec_transposed(a: &CpuTensor2D, x: &Vec<f64>) -> Vec<f64> {
        assert_eq!(a.1, x.len(), "matvec_transposed: A.rows must equal x.len");
        let mut out = vec![0.0; a.2];
        for (i, &xi) in x.iter().enumerate() {
            for (o, &aij) in out.iter_mut().zip(a.row(i)) {
                *o += aij * xi;
            }
        }
        out
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn select_rows_2d(t: &Self::Tensor2D, rows: &[usize]) -> Self::Tensor2D {
        let mut out = Vec::with_capacity(rows.len() * t.2);
        for &r in rows {
            assert!(r < t.1, "row index {} out of bounds for {} rows", r, t.1);
            out.extend_from_slice(t.row(r));
        }
        CpuTensor2D::new(out, rows.len(), t.2)
    }
}

#[cfg(test)]
mod matvec_tests {
    use super::*;

    #[test]
    fn test_matvec_transpose() {
        // X = [[1.0, 2.0],
        //      [3.0, 4.0],
        //      [5.0, 6.0]]
        // v = [1.0, 0.0, 2.0]
        // Xᵀ @ v = [1*1 + 3*0 + 5*2, 2*1 + 4*0 + 6*2] = [11.0, 14.0]
        let x = CpuTensor2D::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let v = vec![1.0, 0.0, 2.0];

        let result = CpuBackend::matvec_transposed(&x, &v);
        assert_eq!(result, vec![11.0, 14.0]);

        // (2, 3) → output len = 3
        let x3 = CpuTensor2D::new(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0], 2, 3);
        let result3 = CpuBackend::matvec_transposed(&x3, &vec![5.0, 7.0]);
        assert_eq!(result3, vec![5.0, 7.0, 0.0]);
    }

    #[test]
    fn test_matvec() {
        let x = CpuTensor2D::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        assert_eq!(CpuBackend::matvec(&x, &vec![1.0, 1.0]), vec![3.0, 7.0, 11.0]);
    }

    #[test]
    #[should_panic(expected = "matvec")]
    fn test_matvec_shape_mismatch_panics() {
        let x = CpuTensor2D::new(vec![1.0, 2.0], 1, 2);
        CpuBackend::matvec(&x, &vec![1.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "Inconsistent shape")]
    fn test_inconsistent_shape_panics() {
        CpuTensor2D::new(vec![1.0, 2.0, 3.0], 2, 2);
    }

    #[test]
    fn test_select_rows() {
        let x = CpuTensor2D::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        let picked = CpuBackend::select_rows_2d(&x, &[1, 1, 0]);
        assert_eq!(picked.0, vec![3.0, 4.0, 3.0, 4.0, 1.0, 2.0]);
        assert_eq!(CpuBackend::shape(&picked), (3, 2));
    }
}
