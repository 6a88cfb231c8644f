use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use eegfocus::{train, BoardRegistry, BuildConfig, DatasetBuilder, TrainerConfig};

#[derive(Parser, Debug)]
#[command(name = "focus_train", about = "Build the focus dataset and report cross-validated classifier scores")]
struct Args {
    /// Root holding relaxed/ and focused/ recording trees
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// JSON build config (window scales, lead-in, bands, …)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON board table merged over the built-in boards
    #[arg(long)]
    boards: Option<PathBuf>,

    /// Channel names to leave out (comma-separated); overrides the config
    #[arg(long)]
    exclude: Option<String>,

    /// Cross-validation folds
    #[arg(long, default_value_t = 5)]
    folds: usize,

    /// Worker threads for fold evaluation
    #[arg(long, default_value_t = 8)]
    jobs: usize,

    /// Seed of the stratified baseline
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// trace | debug | info | warn | error
    #[arg(long, default_value = "info", value_parser = eegfocus::logging::parse_level)]
    log_level: Level,
}

fn main() -> Result<()> {
    let args = Args::parse();

    eegfocus::logging::init(args.log_level)?;

    let mut cfg = match &args.config {
        Some(path) => BuildConfig::from_json_file(path)?,
        None => BuildConfig::default(),
    };
    if let Some(list) = &args.exclude {
        cfg.excluded_channels = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut boards = BoardRegistry::builtin();
    if let Some(path) = &args.boards {
        let n = boards.load_json(path)?;
        info!("loaded {n} boards from {}", path.display());
    }

    let dataset = DatasetBuilder::new(cfg)?
        .with_boards(boards)
        .build(&args.data_dir)
        .with_context(|| format!("building dataset from {}", args.data_dir.display()))?;

    let trainer = TrainerConfig {
        folds: args.folds,
        n_jobs: args.jobs,
        seed: args.seed,
        ..TrainerConfig::default()
    };
    let report = train(&dataset, &trainer)?;
    info!(
        "mean macro F1: baseline {:.3}, model {:.3}",
        report.dummy_mean(),
        report.model_mean()
    );
    Ok(())
}
