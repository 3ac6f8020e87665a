//! Core type definitions for the simulator.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an individual, unique within one population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndividualId(pub u64);

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An individual of the population.
///
/// The label is an index into the population's [`LabelSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    id: IndividualId,
    label: usize,
}

impl Individual {
    pub fn new(id: IndividualId, label: usize) -> Self {
        Self { id, label }
    }

    pub fn id(&self) -> IndividualId {
        self.id
    }

    pub fn label(&self) -> usize {
        self.label
    }

    /// Switch this individual to another sub-population
    pub fn set_label(&mut self, label: usize) {
        self.label = label;
    }
}

/// Ordered set of distinct sub-population labels.
///
/// The position of a label is its row/column in every payoff and transition
/// matrix and its column group in the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        if labels.is_empty() {
            return Err(Error::Validation("Label list is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if label.is_empty() {
                return Err(Error::Validation("Labels must be non-empty strings".to_string()));
            }
            if !seen.insert(label.as_str()) {
                return Err(Error::Validation(format!("Duplicate label '{}'", label)));
            }
        }

        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Name of the label at `index`
    pub fn name(&self, index: usize) -> &str {
        &self.labels[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

/// Position in a 2D lattice: `x` is the row, `y` the column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Apply toroidal wrapping for given lattice dimensions
    pub fn wrap(&self, rows: i32, cols: i32) -> Self {
        Self {
            x: ((self.x % rows) + rows) % rows,
            y: ((self.y % cols) + cols) % cols,
        }
    }

    /// Offsets of the 8 Moore neighbours, row-major
    pub fn moore_offsets() -> [(i32, i32); 8] {
        [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ]
    }
}

/// Position in a 3D lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position3 {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn add(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    pub fn wrap(&self, nx: i32, ny: i32, nz: i32) -> Self {
        Self {
            x: ((self.x % nx) + nx) % nx,
            y: ((self.y % ny) + ny) % ny,
            z: ((self.z % nz) + nz) % nz,
        }
    }

    /// Offsets of the 26 Moore neighbours, ordered by x, then y, then z
    pub fn moore_offsets() -> Vec<(i32, i32, i32)> {
        let mut offsets = Vec::with_capacity(26);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    offsets.push((dx, dy, dz));
                }
            }
        }
        offsets
    }
}
