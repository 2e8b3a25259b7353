use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use afwin::{
    load_metadata, preload, random_split, Dataset, EcgDataset, WindowConfig, NO_AF_EVENT,
};

#[derive(Parser)]
#[command(name = "stats", about = "Report class balance and split sizes for an ECG dataset")]
struct Args {
    /// Metadata JSON: record key → {path, class, sig_len, af_ends}
    #[arg(long)]
    meta: PathBuf,

    /// Directory holding the WFDB records named by the metadata
    #[arg(long)]
    data_dir: PathBuf,

    /// Maximum number of records to use (default: all)
    #[arg(long)]
    limit: Option<usize>,

    /// Train fraction of the split
    #[arg(long, default_value_t = 0.7)]
    train_frac: f64,

    /// Validation fraction of the split
    #[arg(long, default_value_t = 0.2)]
    val_frac: f64,

    /// Split RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let cfg = WindowConfig::default();

    let meta = load_metadata(&args.meta, args.limit)
        .with_context(|| format!("loading metadata {}", args.meta.display()))?;
    let store = preload(&meta, &args.data_dir, &cfg)?;
    let dataset = EcgDataset::new(meta, store, cfg);

    let mut afib = 0usize;
    let mut per_class = std::collections::BTreeMap::<i64, usize>::new();
    for i in 0..dataset.len() {
        let sample = dataset.get(i)?;
        if sample.af_end != NO_AF_EVENT {
            afib += 1;
        }
        *per_class.entry(sample.label[0] as i64).or_default() += 1;
    }
    info!("{} afib examples.", afib);

    println!("records:       {}", dataset.len());
    println!("with AF event: {afib}");
    for (class, count) in &per_class {
        println!("class {class}:       {count}");
    }

    let mut rng = StdRng::seed_from_u64(args.seed);
    let (train, val, test) =
        random_split(dataset.len(), args.train_frac, args.val_frac, &mut rng);
    println!(
        "split:         {} train / {} val / {} test (seed {})",
        train.len(),
        val.len(),
        test.len(),
        args.seed
    );

    Ok(())
}
