//! Payoff-derived fitness.

use serde::{Deserialize, Serialize};

/// Fitness of an individual with average payoff `payoff` under selection weight `w`
pub fn fitness(payoff: f64, selection_weight: f64) -> f64 {
    1.0 - selection_weight + selection_weight * payoff
}

/// Average payoffs and the fitness derived from them
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub birth_payoff: f64,
    pub death_payoff: f64,
    pub birth_fitness: f64,
    pub death_fitness: f64,
}

impl Scores {
    pub fn from_payoffs(birth_payoff: f64, death_payoff: f64, selection_weight: f64) -> Self {
        Self {
            birth_payoff,
            death_payoff,
            birth_fitness: fitness(birth_payoff, selection_weight),
            death_fitness: fitness(death_payoff, selection_weight),
        }
    }
}

/// Mean scores over the members of one label
#[derive(Debug, Clone, Default)]
pub struct LabelScoreStats {
    count: usize,
    sum: Scores,
}

impl LabelScoreStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, scores: &Scores) {
        self.sum.birth_payoff += scores.birth_payoff;
        self.sum.death_payoff += scores.death_payoff;
        self.sum.birth_fitness += scores.birth_fitness;
        self.sum.death_fitness += scores.death_fitness;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `None` when no member was recorded
    pub fn mean(&self) -> Option<Scores> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(Scores {
            birth_payoff: self.sum.birth_payoff / n,
            death_payoff: self.sum.death_payoff / n,
            birth_fitness: self.sum.birth_fitness / n,
            death_fitness: self.sum.death_fitness / n,
        })
    }
}
