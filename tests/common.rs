/// Shared fixture helpers for the integration tests.
use afwin::{RecordMeta, SignalStore};
use ndarray::Array2;

#[allow(unused)]
pub fn entry(path: &str, class: i64, sig_len: usize, af_ends: &[i64]) -> RecordMeta {
    RecordMeta {
        path: path.into(),
        class,
        sig_len,
        af_ends: af_ends.to_vec(),
    }
}

#[allow(unused)]
/// Store holding one [T, 2] record filled with a constant value.
pub fn const_store(key: &str, n_samples: usize, value: f32) -> SignalStore {
    let mut store = SignalStore::new();
    store.insert(key, Array2::from_elem((n_samples, 2), value));
    store
}
