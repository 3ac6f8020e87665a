//! Moran process simulation engine.
//!
//! Populations live either well-mixed or on a toroidal 2D/3D lattice where
//! individuals only interact with their Moore neighbours.

pub mod experiment;
pub mod lattice;
pub mod population;
pub mod selection;
pub mod simulation;

pub use experiment::{Experiment, ExperimentResult};
pub use lattice::{Grid2D, Grid3D, Lattice, Site};
pub use population::{Candidates, Population, WellMixed};
pub use simulation::{MoranProcess, MoranProcess1D, MoranProcess2D, MoranProcess3D, StepEvent};
