//! Configuration types for the simulator.

use serde::{Deserialize, Serialize};

/// How the individual to die is chosen among the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeathSelection {
    /// Proportional to death fitness
    #[default]
    FitnessWeighted,
    /// Every candidate equally likely
    Uniform,
}

/// Which individuals the transition matrix is applied to after a birth-death event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionScope {
    /// Only the newborn individual
    #[default]
    Offspring,
    /// Every individual of the population
    Population,
}

/// Parameters of the Moran update loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub death_selection: DeathSelection,
    pub transition_scope: TransitionScope,
    /// Generations between progress log lines (0 disables them)
    pub progress_interval: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            death_selection: DeathSelection::FitnessWeighted,
            transition_scope: TransitionScope::Offspring,
            progress_interval: 1000,
        }
    }
}

/// Population structure of an experiment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyConfig {
    WellMixed,
    /// Rows of label names
    Grid2d { grid: Vec<Vec<String>> },
    /// Layers of rows of label names, indexed `[x][y][z]`
    Grid3d { grid: Vec<Vec<Vec<String>>> },
}

impl Default for TopologyConfig {
    fn default() -> Self {
        TopologyConfig::WellMixed
    }
}

/// Where and what to write after a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: String,
    /// Render SVG plots next to the tables
    pub plots: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "./output".to_string(),
            plots: true,
        }
    }
}

/// A complete experiment description, as loaded by the command line tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub labels: Vec<String>,
    pub sizes: Vec<usize>,
    pub birth_payoff: Vec<Vec<f64>>,
    pub death_payoff: Vec<Vec<f64>>,
    #[serde(default)]
    pub transition: Option<Vec<Vec<f64>>>,
    /// Selection pressure weight `w` in `fitness = 1 - w + w * payoff`
    #[serde(default = "default_selection_weight")]
    pub selection_weight: f64,
    #[serde(default)]
    pub topology: TopologyConfig,
    pub generations: u64,
    #[serde(default)]
    pub process: ProcessConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_selection_weight() -> f64 {
    0.5
}
