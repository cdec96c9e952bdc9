use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::{Dataset, TabularData};
use crate::error::{LogRegError, Result};

/// Feature rows and labels held in memory.
///
/// Construction validates that both sides have the same number of examples
/// and that every row has the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryDataset {
    x: Vec<Vec<f64>>,
    y: Vec<f64>,
}

impl InMemoryDataset {
    pub fn new(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(LogRegError::shape(
                format!("{} labels", x.len()),
                format!("{} labels", y.len()),
            ));
        }
        if x.is_empty() {
            return Err(LogRegError::EmptyDataset);
        }
        let n_features = x[0].len();
        if let Some((i, row)) = x.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(LogRegError::shape(
                format!("{} features", n_features),
                format!("{} features in row {}", row.len(), i),
            ));
        }
        Ok(Self { x, y })
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.x
    }

    pub fn labels(&self) -> &[f64] {
        &self.y
    }

    /// Splits off the last `⌊n · test_ratio⌋` examples as a test set.
    ///
    /// Both halves must be non-empty.
    pub fn split_tail(self, test_ratio: f64) -> Result<(Self, Self)> {
        if !(0.0..1.0).contains(&test_ratio) {
            return Err(LogRegError::InvalidParameter(format!(
                "test_ratio must be in [0, 1), got {}",
                test_ratio
            )));
        }
        let n_test = (self.len() as f64 * test_ratio).floor() as usize;
        let n_train = self.len() - n_test;
        if n_test == 0 || n_train == 0 {
            return Err(LogRegError::InvalidParameter(format!(
                "test_ratio {} leaves an empty split of {} examples",
                test_ratio,
                self.len()
            )));
        }

        let Self { mut x, mut y } = self;
        let test_x = x.split_off(n_train);
        let test_y = y.split_off(n_train);
        Ok((Self { x, y }, Self { x: test_x, y: test_y }))
    }

    /// Applies `f` to every feature row. Widths must stay consistent.
    pub fn map_features<F>(self, f: F) -> Result<Self>
    where
        F: FnMut(Vec<f64>) -> Vec<f64>,
    {
        let x = self.x.into_iter().map(f).collect();
        Self::new(x, self.y)
    }

    pub fn into_parts(self) -> (Vec<Vec<f64>>, Vec<f64>) {
        (self.x, self.y)
    }
}

impl TryFrom<TabularData> for InMemoryDataset {
    type Error = LogRegError;

    fn try_from(data: TabularData) -> Result<Self> {
        Self::new(data.features, data.labels)
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.x.len()
    }

    fn n_features(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    fn get_batch<B: Backend>(&self, indices: &[usize]) -> Result<(Tensor2D<B>, Tensor1D<B>)> {
        let n_features = self.n_features();
        let mut data = Vec::with_capacity(indices.len() * n_features);
        let mut labels = Vec::with_capacity(indices.len());
        for &i in indices {
            let row = self.x.get(i).ok_or_else(|| {
                LogRegError::InvalidParameter(format!(
                    "example index {} out of bounds for {} examples",
                    i,
                    self.x.len()
                ))
            })?;
            data.extend_from_slice(row);
            labels.push(self.y[i]);
        }

        Ok((
            Tensor2D::<B>::new(data, indices.len(), n_features),
            Tensor1D::<B>::new(labels),
        ))
    }
}
