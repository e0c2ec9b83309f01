use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use split_dataset::infrastructure::logging::setup_logging;
use split_dataset::{DatasetPartitioner, PartitionConfig};

/// Split an object detection dataset into training, validation, and testing sets.
///
/// Images are moved into train/, val/ and test/ next to the image directory.
/// The source annotation table and image directory are deleted on success.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the CSV annotation table
    #[arg(long)]
    csv: PathBuf,

    /// Path to the directory containing the images
    #[arg(long)]
    images: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, config_path) =
        PartitionConfig::load_with_source().context("failed to load configuration")?;
    setup_logging(config.log_dir.as_deref()).context("failed to set up logging")?;

    match &config_path {
        Some(path) => info!("Loaded config from {:?}", path),
        None => info!("No config file found. Using defaults."),
    }

    info!(
        "Splitting {:?} with images in {:?} (seed {})",
        args.csv, args.images, config.seed
    );

    let partitioner = DatasetPartitioner::new(config);
    match partitioner.run(&args.csv, &args.images) {
        Ok(summary) => {
            summary.print_summary();
            info!("Dataset split completed successfully.");
            Ok(())
        }
        Err(e) => {
            error!("Failed to split dataset: {}", e);
            Err(e).with_context(|| format!("failed to split {:?}", args.csv))
        }
    }
}
