mod common;
use common::{const_store, entry};

use afwin::{
    AugmentConfig, Augmenter, Dataset, EcgDataset, GatePolicy, WindowConfig,
};

fn augmented_dataset(seed: u64) -> EcgDataset {
    // FairCoin + large sigma so augmentation visibly fires within a few
    // accesses.
    let augmenter = Augmenter::new(AugmentConfig {
        gate: GatePolicy::FairCoin,
        ..AugmentConfig::default()
    })
    .unwrap();

    EcgDataset::new(
        vec![entry("A", 1, 20000, &[5000])],
        const_store("A", 20000, 1.0),
        WindowConfig::default(),
    )
    .with_transform(augmenter.into_transform(seed))
}

#[test]
fn transform_preserves_shape_and_metadata() {
    let ds = augmented_dataset(1);
    for _ in 0..8 {
        let sample = ds.get(0).unwrap();
        assert_eq!(sample.signal.dim(), (2, 15000));
        assert_eq!(sample.label.as_slice().unwrap(), &[1.0]);
        assert_eq!(sample.af_end, 5000);
    }
}

#[test]
fn transform_redraws_per_access() {
    // With a 50% gate, 16 accesses of an all-ones record almost surely
    // produce at least two distinct signals.
    let ds = augmented_dataset(2);
    let first = ds.get(0).unwrap().signal;
    let varied = (0..16).any(|_| ds.get(0).unwrap().signal != first);
    assert!(varied, "augmentation never re-drew across accesses");
}

#[test]
fn augmentation_is_constant_within_a_channel_for_constant_input() {
    // Both operations draw one value per channel, so a constant input stays
    // constant within each channel no matter which gates fired.
    let ds = augmented_dataset(3);
    for _ in 0..16 {
        let sig = ds.get(0).unwrap().signal;
        for c in 0..2 {
            let row = sig.row(c);
            let first = row[0];
            assert!(row.iter().all(|&v| v == first), "channel {c} not constant");
        }
    }
}

#[test]
fn same_seed_replays_the_same_augmentation_stream() {
    let a = augmented_dataset(7);
    let b = augmented_dataset(7);
    for _ in 0..8 {
        assert_eq!(a.get(0).unwrap().signal, b.get(0).unwrap().signal);
    }
}
