//! Population state shared by all topologies, and the unstructured (well-mixed) population.

use moran_core::{
    Error, Individual, IndividualId, LabelSnapshot, PayoffModel, Result, Scores,
};

/// Individuals that may be selected to die after a birth
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// The entire population
    Everyone,
    /// Only the listed slots; a slot may repeat on small lattices
    Slots(Vec<usize>),
}

/// Mutable state the Moran update loop acts on.
///
/// Individuals live in slots `0..population_size()`; the meaning of a slot
/// depends on the topology.
pub trait Population {
    fn population_size(&self) -> usize;

    /// Current size of every sub-population, in label order
    fn counts(&self) -> &[usize];

    fn individual(&self, slot: usize) -> &Individual;

    fn scores(&self, slot: usize) -> &Scores;

    /// Who may be replaced by the offspring of the individual in `birth`
    fn death_candidates(&self, birth: usize) -> Candidates;

    /// Put `individual` into `slot`, dropping the previous occupant
    fn place(&mut self, slot: usize, individual: Individual);

    fn relabel(&mut self, slot: usize, label: usize);

    /// Recompute payoffs and fitness of every individual
    fn refresh_all(&mut self, model: &PayoffModel);

    /// Recompute payoffs and fitness of the individuals affected by a change in `slot`
    fn refresh_around(&mut self, slot: usize, model: &PayoffModel);

    /// Per-label sizes and scores, in label order
    fn label_snapshots(&self) -> Vec<LabelSnapshot>;
}

/// Unstructured population: everyone interacts with everyone else
#[derive(Debug, Clone)]
pub struct WellMixed {
    individuals: Vec<Individual>,
    counts: Vec<usize>,
    label_scores: Vec<Scores>,
}

impl WellMixed {
    /// Create `sizes[l]` individuals of each label `l`, ids assigned in order
    pub fn new(sizes: &[usize], num_labels: usize) -> Result<Self> {
        if sizes.len() != num_labels {
            return Err(Error::Validation(format!(
                "Mismatch length of size and label lists: {} sizes, {} labels",
                sizes.len(),
                num_labels
            )));
        }

        let mut individuals = Vec::with_capacity(sizes.iter().sum());
        let mut next_id = 0u64;
        for (label, &size) in sizes.iter().enumerate() {
            for _ in 0..size {
                individuals.push(Individual::new(IndividualId(next_id), label));
                next_id += 1;
            }
        }

        Ok(Self {
            individuals,
            counts: sizes.to_vec(),
            label_scores: vec![Scores::default(); num_labels],
        })
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Scores shared by every member of `label`
    pub fn label_scores(&self, label: usize) -> &Scores {
        &self.label_scores[label]
    }
}

impl Population for WellMixed {
    fn population_size(&self) -> usize {
        self.individuals.len()
    }

    fn counts(&self) -> &[usize] {
        &self.counts
    }

    fn individual(&self, slot: usize) -> &Individual {
        &self.individuals[slot]
    }

    fn scores(&self, slot: usize) -> &Scores {
        &self.label_scores[self.individuals[slot].label()]
    }

    fn death_candidates(&self, _birth: usize) -> Candidates {
        Candidates::Everyone
    }

    fn place(&mut self, slot: usize, individual: Individual) {
        let previous = std::mem::replace(&mut self.individuals[slot], individual);
        self.counts[previous.label()] -= 1;
        self.counts[individual.label()] += 1;
    }

    fn relabel(&mut self, slot: usize, label: usize) {
        let individual = &mut self.individuals[slot];
        self.counts[individual.label()] -= 1;
        self.counts[label] += 1;
        individual.set_label(label);
    }

    fn refresh_all(&mut self, model: &PayoffModel) {
        for label in 0..self.counts.len() {
            self.label_scores[label] = model.well_mixed_scores(label, &self.counts);
        }
    }

    fn refresh_around(&mut self, _slot: usize, model: &PayoffModel) {
        self.refresh_all(model);
    }

    fn label_snapshots(&self) -> Vec<LabelSnapshot> {
        self.counts
            .iter()
            .zip(&self.label_scores)
            .map(|(&size, &scores)| LabelSnapshot {
                size,
                scores: Some(scores),
            })
            .collect()
    }
}
