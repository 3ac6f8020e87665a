//! Command line front end: `moran-sim <experiment.json> [--output DIR]`.

mod runner;
mod telemetry;

use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_telemetry(telemetry::LogFormat::from_env())?;

    let args = runner::Args::parse(std::env::args().skip(1))?;
    info!("Starting Moran simulator");

    let result = runner::run(&args)?;

    match &result.summary.fixated_label {
        Some(label) => info!("Label {} fixated", label),
        None => info!("Final sizes: {:?}", result.summary.final_sizes),
    }

    Ok(())
}
