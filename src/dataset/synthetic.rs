use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::dataset::InMemoryDataset;
use crate::error::{LogRegError, Result};

/// Two Gaussian blobs with unit variance, one per class.
///
/// Class 0 is centred at `-separation / 2` and class 1 at `+separation / 2`
/// on every axis. Examples are shuffled so that any tail split contains both
/// classes.
///
/// # Arguments
/// * `n_per_class` - Number of examples drawn for each class.
/// * `n_features` - Dimension of a feature row.
/// * `separation` - Distance between the two centres along each axis.
/// * `rng` - Source of randomness; the same seed yields the same dataset.
pub fn make_blobs<R: Rng + ?Sized>(
    n_per_class: usize,
    n_features: usize,
    separation: f64,
    rng: &mut R,
) -> Result<InMemoryDataset> {
    if n_per_class == 0 || n_features == 0 {
        return Err(LogRegError::InvalidParameter(format!(
            "make_blobs needs at least one example and one feature, got {} x {}",
            n_per_class, n_features
        )));
    }
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| LogRegError::InvalidParameter(format!("blob noise: {e}")))?;

    let mut examples: Vec<(Vec<f64>, f64)> = Vec::with_capacity(2 * n_per_class);
    for label in [0.0, 1.0] {
        let centre = (label - 0.5) * separation;
        for _ in 0..n_per_class {
            let row = (0..n_features)
                .map(|_| centre + noise.sample(rng))
                .collect();
            examples.push((row, label));
        }
    }
    examples.shuffle(rng);

    let (x, y): (Vec<Vec<f64>>, Vec<f64>) = examples.into_iter().unzip();
    InMemoryDataset::new(x, y)
}
