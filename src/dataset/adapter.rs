use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::{Dataset, InMemoryDataset, TabularData};
use crate::error::{LogRegError, Result};

type FeatureTransform = Box<dyn Fn(&[f64]) -> Vec<f64> + Send + Sync>;
type LabelTransform = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// Fixed-size, randomly indexable view over loaded tabular data with
/// optional per-example transforms.
///
/// The data is pulled once from a reader closure. Transforms are applied
/// lazily on every [`get`](MappedDataset::get); the label transform receives
/// the label value.
///
/// ```
/// use logreg_rs::dataset::{read_csv_from_reader, Dataset, MappedDataset};
///
/// let csv = "x,y\n1,0\n2,1\n";
/// let ds = MappedDataset::from_reader(|| read_csv_from_reader(csv.as_bytes(), &["x"], "y"))
///     .unwrap()
///     .with_transform(|row| row.iter().map(|v| v * 10.0).collect())
///     .with_target_transform(|y| 1.0 - y);
///
/// assert_eq!(ds.len(), 2);
/// assert_eq!(ds.get(1), Some((vec![20.0], 0.0)));
/// ```
pub struct MappedDataset {
    data: TabularData,
    transform: Option<FeatureTransform>,
    target_transform: Option<LabelTransform>,
}

impl MappedDataset {
    pub fn from_reader<F>(reader: F) -> Result<Self>
    where
        F: FnOnce() -> Result<TabularData>,
    {
        let data = reader()?;
        if data.features.len() != data.labels.len() {
            return Err(LogRegError::shape(
                format!("{} labels", data.features.len()),
                format!("{} labels", data.labels.len()),
            ));
        }
        Ok(Self {
            data,
            transform: None,
            target_transform: None,
        })
    }

    pub fn with_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(f));
        self
    }

    pub fn with_target_transform<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.target_transform = Some(Box::new(f));
        self
    }

    /// The transformed example at `idx`, or `None` when out of range.
    pub fn get(&self, idx: usize) -> Option<(Vec<f64>, f64)> {
        let row = self.data.features.get(idx)?;
        let label = *self.data.labels.get(idx)?;

        let example = match &self.transform {
            Some(f) => f(row),
            None => row.clone(),
        };
        let label = match &self.target_transform {
            Some(f) => f(label),
            None => label,
        };
        Some((example, label))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.data.feature_names
    }

    /// Applies the transforms to every example and collects the result.
    pub fn materialize(&self) -> Result<InMemoryDataset> {
        let (x, y): (Vec<Vec<f64>>, Vec<f64>) =
            (0..self.len()).filter_map(|i| self.get(i)).unzip();
        InMemoryDataset::new(x, y)
    }
}

impl Dataset for MappedDataset {
    fn len(&self) -> usize {
        self.data.labels.len()
    }

    fn n_features(&self) -> usize {
        self.get(0).map_or(0, |(x, _)| x.len())
    }

    fn get_batch<B: Backend>(&self, indices: &[usize]) -> Result<(Tensor2D<B>, Tensor1D<B>)> {
        let mut rows = Vec::with_capacity(indices.len());
        let mut labels = Vec::with_capacity(indices.len());
        for &i in indices {
            let (x, y) = self.get(i).ok_or_else(|| {
                LogRegError::InvalidParameter(format!(
                    "example index {} out of bounds for {} examples",
                    i,
                    self.len()
                ))
            })?;
            rows.push(x);
            labels.push(y);
        }
        Ok((Tensor2D::from_rows(&rows)?, Tensor1D::new(labels)))
    }
}
