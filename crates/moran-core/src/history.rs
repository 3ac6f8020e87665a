//! Per-generation log of a simulation run.

use crate::{Error, LabelSet, Result, RunId, Scores};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shannon entropy (base 2) of the label distribution given by `counts`
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .iter()
        .filter(|&&n| n > 0)
        .map(|&n| {
            let fraction = n as f64 / total;
            -fraction * fraction.log2()
        })
        .sum()
}

/// Per-label quantities that can be read back from a [`History`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Size,
    AvgBirthPayoff,
    AvgDeathPayoff,
    BirthFitness,
    DeathFitness,
}

impl Metric {
    pub fn all() -> [Metric; 5] {
        [
            Metric::Size,
            Metric::AvgBirthPayoff,
            Metric::AvgDeathPayoff,
            Metric::BirthFitness,
            Metric::DeathFitness,
        ]
    }

    /// Column suffix used in tabular output
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Metric::Size => "size",
            Metric::AvgBirthPayoff => "AvgBirthPayoff",
            Metric::AvgDeathPayoff => "AvgDeathPayoff",
            Metric::BirthFitness => "BirthFitness",
            Metric::DeathFitness => "DeathFitness",
        }
    }
}

/// State of one sub-population at one generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSnapshot {
    pub size: usize,
    /// `None` when the scores are undefined, e.g. a label without members on a grid
    pub scores: Option<Scores>,
}

impl LabelSnapshot {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Size => Some(self.size as f64),
            Metric::AvgBirthPayoff => self.scores.map(|s| s.birth_payoff),
            Metric::AvgDeathPayoff => self.scores.map(|s| s.death_payoff),
            Metric::BirthFitness => self.scores.map(|s| s.birth_fitness),
            Metric::DeathFitness => self.scores.map(|s| s.death_fitness),
        }
    }
}

/// One row of the history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub generation: u64,
    /// One entry per label, in label order
    pub labels: Vec<LabelSnapshot>,
    pub entropy: f64,
}

impl StepRecord {
    pub fn sizes(&self) -> Vec<usize> {
        self.labels.iter().map(|l| l.size).collect()
    }

    pub fn population_size(&self) -> usize {
        self.labels.iter().map(|l| l.size).sum()
    }
}

/// Append-only table of per-generation snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    labels: LabelSet,
    records: Vec<StepRecord>,
}

impl History {
    pub fn new(labels: LabelSet) -> Self {
        Self {
            labels,
            records: Vec::new(),
        }
    }

    /// Append a record; generations must be strictly increasing
    pub fn push(&mut self, record: StepRecord) -> Result<()> {
        if record.labels.len() != self.labels.len() {
            return Err(Error::InvalidState(format!(
                "Record has {} label entries, expected {}",
                record.labels.len(),
                self.labels.len()
            )));
        }
        if let Some(last) = self.records.last() {
            if record.generation <= last.generation {
                return Err(Error::InvalidState(format!(
                    "Generation {} recorded after generation {}",
                    record.generation, last.generation
                )));
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&StepRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// Total population size, taken from the initial record
    pub fn population_size(&self) -> usize {
        self.first().map(StepRecord::population_size).unwrap_or(0)
    }

    /// Series of `metric` for `label`, one value per generation
    pub fn series(&self, label: &str, metric: Metric) -> Option<Vec<Option<f64>>> {
        let index = self.labels.index_of(label)?;
        Some(
            self.records
                .iter()
                .map(|r| r.labels[index].value(metric))
                .collect(),
        )
    }

    pub fn sizes_of(&self, label: &str) -> Option<Vec<usize>> {
        let index = self.labels.index_of(label)?;
        Some(self.records.iter().map(|r| r.labels[index].size).collect())
    }

    pub fn entropy_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.entropy).collect()
    }

    pub fn generations(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.generation).collect()
    }

    /// Label occupying the entire population at the last generation, if any
    pub fn fixated_label(&self) -> Option<&str> {
        let last = self.last()?;
        let total = last.population_size();
        last.labels
            .iter()
            .position(|l| total > 0 && l.size == total)
            .map(|i| self.labels.name(i))
    }

    /// Column names of the tabular form, without the leading `generation` column
    pub fn column_names(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.labels.len() * 5 + 1);
        for metric in Metric::all() {
            for label in self.labels.iter() {
                columns.push(format!("{}__{}", label, metric.column_suffix()));
            }
        }
        columns.push("Entropy".to_string());
        columns
    }

    /// Render the table as CSV; undefined values are left empty
    pub fn to_csv(&self) -> String {
        let mut header = vec!["generation".to_string()];
        header.extend(self.column_names().iter().map(|c| csv_field(c)));

        let mut out = header.join(",");
        out.push('\n');

        for record in &self.records {
            let mut row = vec![record.generation.to_string()];
            for metric in Metric::all() {
                row.extend(
                    record
                        .labels
                        .iter()
                        .map(|l| l.value(metric).map(|v| v.to_string()).unwrap_or_default()),
                );
            }
            row.push(record.entropy.to_string());

            out.push_str(&row.join(","));
            out.push('\n');
        }

        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Quote a CSV field when it holds a separator, a quote or a line break
fn csv_field(value: &str) -> String {
    if value.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub generations: u64,
    pub population_size: usize,
    pub final_sizes: Vec<usize>,
    pub final_entropy: f64,
    pub fixated_label: Option<String>,
}
