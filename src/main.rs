//! Sudanese Arabic Text Normalizer - Main Entry Point
//!
//! Batch-normalizes a directory tree of raw dialect text files into a
//! mirrored output tree, printing a JSON run summary when done.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sudanorm::batch::{BatchOptions, BatchProcessor};
use sudanorm::progress::LogObserver;
use sudanorm::types::NormalizerConfig;
use sudanorm::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sudanorm=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = NormalizerConfig::from_env();
    let options = BatchOptions::from_env();

    let mut args = std::env::args().skip(1);
    let input_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
    let output_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    info!("Starting Sudanese Arabic Normalizer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        input = %input_dir.display(),
        output = %output_dir.display(),
        concurrency = options.concurrency,
        "Batch run configured"
    );

    let processor = BatchProcessor::new(config)?
        .with_options(options)
        .with_observer(Arc::new(LogObserver));

    let summary = processor.process_all(&input_dir, &output_dir).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    if !summary.is_complete_success() {
        warn!(
            failed = summary.files_failed,
            "Some files could not be processed"
        );
        std::process::exit(1);
    }

    Ok(())
}
