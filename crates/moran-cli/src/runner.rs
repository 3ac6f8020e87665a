//! Loads an experiment file, runs it and writes the report.

use anyhow::{Context, Result};
use moran_core::ExperimentConfig;
use moran_report::{ReportOptions, ReportWriter};
use moran_world::{Experiment, ExperimentResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

/// Command line arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub experiment: PathBuf,
    /// Overrides `output.dir` of the experiment file
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut experiment = None;
        let mut output = None;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-o" | "--output" => {
                    let dir = args.next().context("--output needs a directory")?;
                    output = Some(PathBuf::from(dir));
                }
                _ if experiment.is_none() => experiment = Some(PathBuf::from(arg)),
                _ => anyhow::bail!("Unexpected argument: {}", arg),
            }
        }

        Ok(Self {
            experiment: experiment.context("Usage: moran-sim <experiment.json> [--output DIR]")?,
            output,
        })
    }
}

pub fn load_config(path: &Path) -> Result<ExperimentConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read experiment file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse experiment file {}", path.display()))
}

/// Run the experiment described by `args` and write its report
#[instrument(skip(args), fields(experiment = %args.experiment.display()))]
pub fn run(args: &Args) -> Result<ExperimentResult> {
    let config = load_config(&args.experiment)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let options = ReportOptions {
        plots: config.output.plots,
    };

    let start = Instant::now();
    let experiment = Experiment::new(config).context("Invalid experiment")?;
    let result = experiment.execute().context("Simulation failed")?;

    info!(
        "Run {} finished {} generations in {:.2}s",
        result.summary.run_id,
        result.summary.generations,
        start.elapsed().as_secs_f64()
    );

    let writer = ReportWriter::new(&output, options);
    writer
        .write(&result.history, &result.summary, result.snapshot.as_deref())
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    Ok(result)
}
