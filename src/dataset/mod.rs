//! Datasets and mini-batch iteration.
//!
//! A [`Dataset`] is a fixed-size, randomly indexable collection of
//! `(features, label)` examples. Batches are contiguous chunks of an example
//! order: the identity order via [`Dataset::batches`], or a caller-supplied
//! permutation via [`Dataset::batches_in_order`]. The last batch may be short.

use std::borrow::Cow;
use std::marker::PhantomData;

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::Result;

pub mod adapter;
pub mod csv;
pub mod memory;
pub mod synthetic;

pub use self::adapter::MappedDataset;
pub use self::csv::{read_csv, read_csv_from_reader, TabularData};
pub use self::memory::InMemoryDataset;
pub use self::synthetic::make_blobs;

pub trait Dataset {
    /// Number of examples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of a feature row.
    fn n_features(&self) -> usize;

    /// Gathers the given examples, in the given order, into backend tensors.
    fn get_batch<B: Backend>(&self, indices: &[usize]) -> Result<(Tensor2D<B>, Tensor1D<B>)>;

    /// Batches over the examples in their stored order.
    ///
    /// # Panics
    /// If `batch_size == 0`.
    fn batches<B: Backend>(&self, batch_size: usize) -> DatasetBatchIter<'_, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter::new(self, Cow::Owned((0..self.len()).collect()), batch_size)
    }

    /// Batches over the examples following `order`.
    ///
    /// # Panics
    /// If `batch_size == 0`.
    fn batches_in_order<'a, B: Backend>(
        &'a self,
        order: &'a [usize],
        batch_size: usize,
    ) -> DatasetBatchIter<'a, B, Self>
    where
        Self: Sized,
    {
        DatasetBatchIter::new(self, Cow::Borrowed(order), batch_size)
    }
}

/// Iterator over mini-batches of a [`Dataset`].
pub struct DatasetBatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    order: Cow<'a, [usize]>,
    batch_size: usize,
    current: usize,
    _backend: PhantomData<B>,
}

impl<'a, B: Backend, D: Dataset + ?Sized> DatasetBatchIter<'a, B, D> {
    fn new(dataset: &'a D, order: Cow<'a, [usize]>, batch_size: usize) -> Self {
        assert!(batch_size > 0, "batch_size must be positive");
        Self {
            dataset,
            order,
            batch_size,
            current: 0,
            _backend: PhantomData,
        }
    }
}

impl<'a, B: Backend, D: Dataset + ?Sized> Iterator for DatasetBatchIter<'a, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.order.len();
        if self.current >= total {
            return None;
        }

        let end = (self.current + self.batch_size).min(total);
        let indices = &self.order[self.current..end];
        self.current = end;

        Some(self.dataset.get_batch::<B>(indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.current).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}
