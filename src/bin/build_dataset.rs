use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};

use eegfocus::{BoardRegistry, BuildConfig, DatasetBuilder};

#[derive(Parser, Debug)]
#[command(name = "build_dataset", about = "Window recordings into band-power features and save them as safetensors")]
struct Args {
    /// Root holding relaxed/ and focused/ recording trees
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// features/labels safetensors output path
    #[arg(long)]
    output: PathBuf,

    /// JSON build config
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON board table merged over the built-in boards
    #[arg(long)]
    boards: Option<PathBuf>,

    /// Channel names to leave out (comma-separated)
    #[arg(long)]
    exclude: Option<String>,

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
        cfg.excluded_channels = list.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
    }

    let mut boards = BoardRegistry::builtin();
    if let Some(path) = &args.boards {
        boards.load_json(path)?;
    }

    let (dataset, summary) = DatasetBuilder::new(cfg)?
        .with_boards(boards)
        .build_with_summary(&args.data_dir)
        .with_context(|| format!("building dataset from {}", args.data_dir.display()))?;

    dataset.write_safetensors(&args.output)?;
    info!(
        "Written {} × {} features from {} recordings → {}",
        dataset.len(),
        dataset.dim().unwrap_or(0),
        summary.recordings_used,
        args.output.display()
    );
    Ok(())
}
