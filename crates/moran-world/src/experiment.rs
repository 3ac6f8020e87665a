//! Experiment runner: builds a process from an [`ExperimentConfig`] and runs it.

use crate::population::Population;
use crate::simulation::{MoranProcess, MoranProcess1D, MoranProcess2D, MoranProcess3D};
use moran_core::{
    Error, ExperimentConfig, History, LabelSet, PayoffModel, Result, RunSummary, TopologyConfig,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A validated experiment, ready to run
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    model: PayoffModel,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        let model = PayoffModel::from_rows(
            &config.labels,
            &config.birth_payoff,
            &config.death_payoff,
            config.transition.as_deref(),
            config.selection_weight,
        )?;

        debug!(
            labels = ?config.labels,
            sizes = ?config.sizes,
            generations = config.generations,
            "Experiment validated"
        );

        Ok(Self { config, model })
    }

    /// Parse and validate an experiment from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ExperimentConfig = serde_json::from_str(json)?;
        Self::new(config)
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelSet {
        self.model.labels()
    }

    /// Run the configured number of generations on the configured topology
    #[instrument(skip(self), fields(topology = self.topology_name()))]
    pub fn execute(self) -> Result<ExperimentResult> {
        let Self { config, model } = self;
        let process = config.process.clone();

        match &config.topology {
            TopologyConfig::WellMixed => {
                let mut mp = MoranProcess1D::new(&config.sizes, model, process)?;
                mp.simulate(config.generations)?;
                finish(mp, None)
            }
            TopologyConfig::Grid2d { grid } => {
                let mut mp = MoranProcess2D::new(&config.sizes, grid, model, process)?;
                mp.simulate(config.generations)?;
                let snapshot = mp.label_grid();
                finish(mp, Some(snapshot))
            }
            TopologyConfig::Grid3d { grid } => {
                let mut mp = MoranProcess3D::new(&config.sizes, grid, model, process)?;
                mp.simulate(config.generations)?;
                finish(mp, None)
            }
        }
    }

    fn topology_name(&self) -> &'static str {
        match self.config.topology {
            TopologyConfig::WellMixed => "well_mixed",
            TopologyConfig::Grid2d { .. } => "grid2d",
            TopologyConfig::Grid3d { .. } => "grid3d",
        }
    }
}

fn finish<P: Population>(
    process: MoranProcess<P>,
    snapshot: Option<Vec<Vec<usize>>>,
) -> Result<ExperimentResult> {
    let summary = process
        .summary()
        .cloned()
        .ok_or_else(|| Error::InvalidState("Run finished without a summary".to_string()))?;

    Ok(ExperimentResult {
        history: process.history().clone(),
        summary,
        snapshot,
    })
}

/// Everything a finished experiment produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub history: History,
    pub summary: RunSummary,
    /// Final label index of every site, row by row (2D grids only)
    pub snapshot: Option<Vec<Vec<usize>>>,
}
