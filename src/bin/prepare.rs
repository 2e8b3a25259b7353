use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use afwin::{
    load_metadata, preload, write_batch, AugmentConfig, Augmenter, Dataset, EcgDataset,
    GatePolicy, WindowConfig,
};

#[derive(Parser)]
#[command(name = "prepare", about = "Window WFDB ECG records into a training batch")]
struct Args {
    /// Metadata JSON: record key → {path, class, sig_len, af_ends}
    #[arg(long)]
    meta: PathBuf,

    /// Directory holding the WFDB records named by the metadata
    #[arg(long)]
    data_dir: PathBuf,

    /// batch.safetensors output path
    #[arg(long)]
    output: PathBuf,

    /// Maximum number of records to use (default: all)
    #[arg(long)]
    limit: Option<usize>,

    /// Apply randomized training-time augmentation
    #[arg(long)]
    augment: bool,

    /// Fire each augmentation with a true 50% coin instead of the
    /// normal-threshold gate
    #[arg(long)]
    fair_gate: bool,

    /// Augmentation RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = WindowConfig::default();

    let meta = load_metadata(&args.meta, args.limit)
        .with_context(|| format!("loading metadata {}", args.meta.display()))?;
    info!("{} records after filtering", meta.len());

    let store = preload(&meta, &args.data_dir, &cfg)?;
    info!("preloaded {} signals", store.len());

    let mut dataset = EcgDataset::new(meta, store, cfg);
    if args.augment {
        let gate = if args.fair_gate { GatePolicy::FairCoin } else { GatePolicy::NormalThreshold };
        let augmenter = Augmenter::new(AugmentConfig { gate, ..AugmentConfig::default() })?;
        dataset = dataset.with_transform(augmenter.into_transform(args.seed));
        info!("augmentation on (seed {}, gate {gate:?})", args.seed);
    }

    let samples = (0..dataset.len())
        .map(|i| dataset.get(i))
        .collect::<Result<Vec<_>, _>>()?;
    write_batch(&samples, &args.output)?;
    info!("written {} samples → {}", samples.len(), args.output.display());

    Ok(())
}
