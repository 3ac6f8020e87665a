//! Validated game description shared by every population structure.

use crate::{Error, LabelSet, PayoffMatrix, Result, Scores, TransitionMatrix};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Labels, payoff matrices and the optional transition matrix of a Moran process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffModel {
    labels: LabelSet,
    birth: PayoffMatrix,
    death: PayoffMatrix,
    transition: Option<TransitionMatrix>,
    selection_weight: f64,
}

impl PayoffModel {
    pub fn new(
        labels: LabelSet,
        birth: PayoffMatrix,
        death: PayoffMatrix,
        transition: Option<TransitionMatrix>,
        selection_weight: f64,
    ) -> Result<Self> {
        let n = labels.len();

        if birth.dim() != n {
            return Err(Error::Validation(format!(
                "Invalid Birth Payoff Matrix: dimension {} does not match {} labels",
                birth.dim(),
                n
            )));
        }
        if death.dim() != n {
            return Err(Error::Validation(format!(
                "Invalid Death Payoff Matrix: dimension {} does not match {} labels",
                death.dim(),
                n
            )));
        }
        if let Some(t) = &transition {
            if t.dim() != n {
                return Err(Error::Validation(format!(
                    "Invalid Transition Matrix: dimension {} does not match {} labels",
                    t.dim(),
                    n
                )));
            }
        }
        if !(0.0..=1.0).contains(&selection_weight) {
            return Err(Error::incorrect_value(
                "selection weight",
                format!("Expected a value in [0, 1], got {}.", selection_weight),
            ));
        }

        debug!(
            labels = n,
            has_transitions = transition.is_some(),
            selection_weight,
            "Payoff model validated"
        );

        Ok(Self {
            labels,
            birth,
            death,
            transition,
            selection_weight,
        })
    }

    /// Validate raw rows, as they come from a configuration file
    pub fn from_rows(
        labels: &[String],
        birth: &[Vec<f64>],
        death: &[Vec<f64>],
        transition: Option<&[Vec<f64>]>,
        selection_weight: f64,
    ) -> Result<Self> {
        let labels = LabelSet::new(labels.iter().cloned())?;
        let birth = PayoffMatrix::from_rows(birth)
            .map_err(|e| Error::Validation(format!("Invalid Birth Payoff Matrix: {}", e)))?;
        let death = PayoffMatrix::from_rows(death)
            .map_err(|e| Error::Validation(format!("Invalid Death Payoff Matrix: {}", e)))?;
        let transition = transition.map(TransitionMatrix::from_rows).transpose()?;
        Self::new(labels, birth, death, transition, selection_weight)
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn birth(&self) -> &PayoffMatrix {
        &self.birth
    }

    pub fn death(&self) -> &PayoffMatrix {
        &self.death
    }

    pub fn transition(&self) -> Option<&TransitionMatrix> {
        self.transition.as_ref()
    }

    pub fn selection_weight(&self) -> f64 {
        self.selection_weight
    }

    /// Scores of a label whose interaction partners have the given label counts.
    ///
    /// `partners[c]` is how many partners carry label `c`; payoffs are averaged
    /// over `total` interactions.
    pub fn scores(&self, label: usize, partners: &[usize], total: usize) -> Scores {
        let mut birth = 0.0;
        let mut death = 0.0;
        for (c, &count) in partners.iter().enumerate() {
            if count == 0 {
                continue;
            }
            birth += self.birth.get(label, c) * count as f64;
            death += self.death.get(label, c) * count as f64;
        }
        let total = total as f64;
        Scores::from_payoffs(birth / total, death / total, self.selection_weight)
    }

    /// Scores of a label in a well-mixed population with label sizes `counts`.
    ///
    /// Every individual plays everyone but itself:
    /// `p_r = Σ_c M[r, c] * (n_c - [r == c]) / (N - 1)`. For a label without
    /// members the self term still counts, so its payoff can drop below the
    /// smallest matrix entry.
    pub fn well_mixed_scores(&self, label: usize, counts: &[usize]) -> Scores {
        let others = counts.iter().sum::<usize>() as f64 - 1.0;
        let mut birth = 0.0;
        let mut death = 0.0;
        for (c, &count) in counts.iter().enumerate() {
            let partners = count as f64 - if c == label { 1.0 } else { 0.0 };
            birth += self.birth.get(label, c) * partners;
            death += self.death.get(label, c) * partners;
        }
        Scores::from_payoffs(birth / others, death / others, self.selection_weight)
    }
}
