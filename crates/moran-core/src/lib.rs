//! Core types and utilities for the Moran process simulator.

pub mod types;
pub mod config;
pub mod error;
pub mod fitness;
pub mod history;
pub mod matrix;
pub mod model;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use fitness::*;
pub use history::*;
pub use matrix::*;
pub use model::PayoffModel;
