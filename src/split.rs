//! Random train/val/test splitting.
//!
//! A split is just a shuffled partition of `0..len` into three disjoint
//! index sets; [`Subset`] then re-exposes a slice of a base dataset through
//! the same [`Dataset`] interface.  Seed the generator to make splits
//! reproducible across runs.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::{Dataset, Sample};
use crate::error::DatasetError;

/// Partition sizes for an `n`-item dataset: `(train, val, test)`.
///
/// Train and val sizes are `floor(frac · n)`; test takes the remainder, so
/// the three always sum to `n`.
pub fn split_lengths(n: usize, train_frac: f64, val_frac: f64) -> (usize, usize, usize) {
    let n_train = (train_frac * n as f64) as usize;
    let n_val = (val_frac * n as f64) as usize;
    (n_train, n_val, n - n_train - n_val)
}

/// Shuffle `0..n` and partition it per [`split_lengths`].
///
/// Returns `(train, val, test)` index sets, disjoint and jointly covering
/// every index exactly once.
pub fn random_split<R: Rng + ?Sized>(
    n: usize,
    train_frac: f64,
    val_frac: f64,
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);

    let (n_train, n_val, _) = split_lengths(n, train_frac, val_frac);
    let test = indices.split_off(n_train + n_val);
    let val = indices.split_off(n_train);
    (indices, val, test)
}

/// A view over a subset of a base dataset, in the order of `indices`.
pub struct Subset<'a, D: Dataset> {
    base: &'a D,
    indices: Vec<usize>,
}

impl<'a, D: Dataset> Subset<'a, D> {
    pub fn new(base: &'a D, indices: Vec<usize>) -> Self {
        Self { base, indices }
    }
}

impl<D: Dataset> Dataset for Subset<'_, D> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Result<Sample, DatasetError> {
        let base_index = *self.indices.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.indices.len(),
        })?;
        self.base.get(base_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn lengths_sum_to_n() {
        let (tr, va, te) = split_lengths(10, 0.7, 0.2);
        assert_eq!(tr, 7);
        assert_eq!(va, 2);
        assert_eq!(te, 1);
        assert_eq!(tr + va + te, 10);
    }

    #[test]
    fn split_is_a_partition() {
        let mut rng = StdRng::seed_from_u64(5);
        let (tr, va, te) = random_split(97, 0.7, 0.2, &mut rng);

        let mut all: Vec<usize> = tr.iter().chain(&va).chain(&te).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..97).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let a = random_split(50, 0.7, 0.2, &mut StdRng::seed_from_u64(42));
        let b = random_split(50, 0.7, 0.2, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn subset_remaps_indices() {
        use crate::config::WindowConfig;
        use crate::dataset::EcgDataset;
        use crate::meta::RecordMeta;
        use crate::store::SignalStore;
        use ndarray::Array2;

        let mut store = SignalStore::new();
        let mut meta = Vec::new();
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            store.insert(*key, Array2::from_elem((10, 2), i as f32));
            meta.push(RecordMeta {
                path: key.to_string(),
                class: 0,
                sig_len: 10,
                af_ends: vec![],
            });
        }
        let ds = EcgDataset::new(meta, store, WindowConfig::default());

        let subset = Subset::new(&ds, vec![2, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get(0).unwrap().signal[[0, 0]], 2.0);
        assert_eq!(subset.get(1).unwrap().signal[[0, 0]], 0.0);
        assert!(subset.get(2).is_err());
    }
}
