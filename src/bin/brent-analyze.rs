//! Command-line entry point: load a Brent price CSV, run the analysis
//! pipeline and write the result as JSON.

use anyhow::Context;
use brent_analytics::io::load_price_csv;
use brent_analytics::pipeline::{Pipeline, PipelineConfig, StageStatus};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "brent-analyze",
    about = "Change points, event correlation and ARIMA/LSTM forecasts for Brent prices"
)]
struct Args {
    /// Price CSV with Date and Price columns
    #[arg(value_name = "DATA_FILE")]
    data_file: PathBuf,

    /// Pipeline configuration (TOML); defaults are used when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Event catalog (TOML), overriding the one in the configuration
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the JSON result here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Override the evaluation hold-out length
    #[arg(long)]
    test_horizon: Option<usize>,

    /// Override the number of future steps forecast
    #[arg(long)]
    forecast_horizon: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    // stdout carries the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brent_analytics=info,brent_analyze=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(events) = args.events {
        config.events.catalog = Some(events);
    }
    if let Some(h) = args.test_horizon {
        config.evaluation.test_horizon = h;
    }
    if let Some(h) = args.forecast_horizon {
        config.evaluation.forecast_horizon = h;
    }

    let pipeline = Pipeline::new(config).context("invalid configuration")?;
    let series = load_price_csv(&args.data_file, pipeline.config().cadence)
        .with_context(|| format!("loading {}", args.data_file.display()))?;

    let result = pipeline.run(&series).context("analysis failed")?;
    for record in result.failed_stages() {
        if let StageStatus::Failed { reason } = &record.status {
            tracing::warn!(stage = %record.stage, %reason, "stage failed");
        }
    }
    if let Some(best) = result.best_model() {
        tracing::info!(model = %best.model_name, rmse = best.rmse, "best model on hold-out");
    }

    let json = result.to_json()?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
