use anyhow::Context;
use clap::Parser;
use fashion_prep::parsing::idx::IdxLoader;
use fashion_prep::parsing::kaggle_csv::CsvLoader;
use fashion_prep::parsing::synthetic::{Synthesis, SyntheticLoader};
use fashion_prep::parsing::DatasetLoader;
use fashion_prep::{preprocess, report};
use std::path::PathBuf;

#[derive(clap::ValueEnum, Clone, Debug)]
enum Source {
    /// Gzipped or raw IDX files, downloaded when missing
    Idx,
    /// Kaggle CSV files
    Csv,
    /// Generated in memory
    Synthetic,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Where the dataset is read from
    #[arg(short, long, value_enum, default_value_t = Source::Idx)]
    source: Source,

    /// Directory holding (or caching) the dataset files
    #[arg(short, long, default_value = "data/fashion-mnist")]
    data_dir: PathBuf,

    /// Never download; fail if a dataset file is missing
    #[arg(short, long)]
    offline: bool,

    /// Seed for random synthetic pixels
    /// If this parameter is not provided, synthetic images are filled with white pixels
    #[arg(long, default_value = None)]
    seed: Option<u64>,

    /// Write a JSON summary of the splits to this path
    #[arg(short, long, default_value = None)]
    report_path: Option<PathBuf>,
}

fn loader(args: &Args) -> Box<dyn DatasetLoader> {
    match args.source {
        Source::Idx => Box::new(IdxLoader::new(&args.data_dir, args.offline)),
        Source::Csv => Box::new(CsvLoader::in_dir(&args.data_dir)),
        Source::Synthetic => {
            let synthesis = match args.seed {
                Some(seed) => Synthesis::Random { seed },
                None => Synthesis::Fill { pixel: 255, label: 0 },
            };
            Box::new(SyntheticLoader::new(synthesis))
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let raw = loader(&args)
        .load()
        .with_context(|| format!("Failed to load the {:?} dataset", args.source))?;
    let data = preprocess::preprocess(&raw).context("Failed to preprocess the dataset")?;

    for line in report::shape_lines(&data) {
        println!("{}", line);
    }

    if let Some(report_path) = &args.report_path {
        report::write_report(report_path, &data)
            .with_context(|| format!("Failed to write report to {:?}", report_path))?;
    }

    Ok(())
}
