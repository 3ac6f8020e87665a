//! Moran process engine.

use crate::lattice::{Grid2D, Grid3D, Lattice, Site};
use crate::population::{Candidates, Population, WellMixed};
use crate::selection::{roulette, sample_row};
use chrono::Utc;
use moran_core::{
    entropy, DeathSelection, Error, History, Individual, IndividualId, LabelSet, PayoffModel,
    ProcessConfig, Result, RunId, RunSummary, Scores, StepRecord, TransitionScope,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, event, info, instrument, trace, Level};

/// A birth-death process over a population of labelled individuals.
///
/// The history table starts with the initial population (generation 0) and
/// grows by one row per simulated generation, across calls to
/// [`MoranProcess::simulate`].
pub struct MoranProcess<P: Population> {
    population: P,
    model: PayoffModel,
    config: ProcessConfig,
    rng: ChaCha8Rng,
    run_id: RunId,
    initial_sizes: Vec<usize>,
    generation: u64,
    next_id: u64,
    history: History,
    summary: Option<RunSummary>,
}

/// Unstructured population
pub type MoranProcess1D = MoranProcess<WellMixed>;
/// 2D toroidal grid with 8 neighbours per site
pub type MoranProcess2D = MoranProcess<Grid2D>;
/// 3D toroidal grid with 26 neighbours per site
pub type MoranProcess3D = MoranProcess<Grid3D>;

/// Outcome of one birth-death event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    pub birth_slot: usize,
    pub death_slot: usize,
    pub parent: Individual,
    pub offspring: Individual,
    pub deceased: Individual,
}

impl MoranProcess<WellMixed> {
    pub fn new(sizes: &[usize], model: PayoffModel, config: ProcessConfig) -> Result<Self> {
        let population = WellMixed::new(sizes, model.num_labels())?;
        Self::from_population(population, model, config)
    }
}

impl MoranProcess<Grid2D> {
    /// `grid` holds the label name of every site, row by row
    pub fn new(
        sizes: &[usize],
        grid: &[Vec<String>],
        model: PayoffModel,
        config: ProcessConfig,
    ) -> Result<Self> {
        check_sizes(sizes, &model)?;
        let population = Lattice::from_rows(grid, model.labels(), sizes)?;
        Self::from_population(population, model, config)
    }

    /// Current label index of every site, row by row
    pub fn label_grid(&self) -> Vec<Vec<usize>> {
        self.population.label_rows()
    }
}

impl MoranProcess<Grid3D> {
    /// `grid[x][y][z]` holds the label name of every site
    pub fn new(
        sizes: &[usize],
        grid: &[Vec<Vec<String>>],
        model: PayoffModel,
        config: ProcessConfig,
    ) -> Result<Self> {
        check_sizes(sizes, &model)?;
        let population = Lattice::from_layers(grid, model.labels(), sizes)?;
        Self::from_population(population, model, config)
    }
}

impl<S: Site> MoranProcess<Lattice<S>> {
    pub fn lattice(&self) -> &Lattice<S> {
        &self.population
    }
}

fn check_sizes(sizes: &[usize], model: &PayoffModel) -> Result<()> {
    if sizes.len() != model.num_labels() {
        return Err(Error::Validation(format!(
            "Mismatch length of size and label lists: {} sizes, {} labels",
            sizes.len(),
            model.num_labels()
        )));
    }
    Ok(())
}

impl<P: Population> MoranProcess<P> {
    /// Wrap an already built population
    pub fn from_population(mut population: P, model: PayoffModel, config: ProcessConfig) -> Result<Self> {
        if population.counts().len() != model.num_labels() {
            return Err(Error::Validation(format!(
                "Population tracks {} labels, model has {}",
                population.counts().len(),
                model.num_labels()
            )));
        }
        if population.population_size() < 2 {
            return Err(Error::Validation(format!(
                "Population needs at least 2 individuals, got {}",
                population.population_size()
            )));
        }

        population.refresh_all(&model);

        let run_id = RunId::new();
        let initial_sizes = population.counts().to_vec();
        let next_id = population.population_size() as u64;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        debug!(
            %run_id,
            population_size = population.population_size(),
            initial_sizes = ?initial_sizes,
            seed = config.seed,
            "Moran process created"
        );

        let mut process = Self {
            history: History::new(model.labels().clone()),
            population,
            model,
            config,
            rng,
            run_id,
            initial_sizes,
            generation: 0,
            next_id,
            summary: None,
        };
        process.record()?;

        Ok(process)
    }

    /// Run the process for `generations` birth-death events
    #[instrument(skip(self), fields(run_id = %self.run_id, start = self.generation))]
    pub fn simulate(&mut self, generations: u64) -> Result<&History> {
        let started_at = Utc::now();
        info!("Starting simulation for {} generations", generations);

        for _ in 0..generations {
            self.step()?;

            let interval = self.config.progress_interval;
            if interval > 0 && self.generation % interval == 0 {
                info!(
                    "Generation {}: sizes {:?}, entropy {:.4}",
                    self.generation,
                    self.population.counts(),
                    self.entropy()
                );
            }
        }

        let summary = RunSummary {
            run_id: self.run_id,
            started_at,
            finished_at: Utc::now(),
            generations: self.generation,
            population_size: self.population.population_size(),
            final_sizes: self.population.counts().to_vec(),
            final_entropy: self.entropy(),
            fixated_label: self.fixated_label().map(str::to_string),
        };
        self.emit_summary(&summary);
        self.summary = Some(summary);

        Ok(&self.history)
    }

    /// Perform one birth-death event and log the new state
    pub fn step(&mut self) -> Result<StepEvent> {
        let birth_slot = self.select_birth()?;
        let death_slot = self.select_death(birth_slot)?;

        let parent = *self.population.individual(birth_slot);
        let deceased = *self.population.individual(death_slot);

        let mut offspring_label = parent.label();
        if let (Some(transition), TransitionScope::Offspring) =
            (self.model.transition(), self.config.transition_scope)
        {
            offspring_label = sample_row(transition.row(parent.label()), &mut self.rng)?;
        }
        let offspring = Individual::new(self.allocate_id(), offspring_label);

        self.population.place(death_slot, offspring);

        match (self.model.transition(), self.config.transition_scope) {
            (Some(transition), TransitionScope::Population) => {
                for slot in 0..self.population.population_size() {
                    let from = self.population.individual(slot).label();
                    let to = sample_row(transition.row(from), &mut self.rng)?;
                    if to != from {
                        self.population.relabel(slot, to);
                    }
                }
                self.population.refresh_all(&self.model);
            }
            _ => self.population.refresh_around(death_slot, &self.model),
        }

        self.generation += 1;
        self.record()?;

        trace!(
            generation = self.generation,
            parent = %parent.id(),
            offspring = %offspring.id(),
            deceased = %deceased.id(),
            birth_slot,
            death_slot,
            "Birth-death event"
        );

        Ok(StepEvent {
            birth_slot,
            death_slot,
            parent,
            offspring,
            deceased,
        })
    }

    /// Pick the slot of the individual that reproduces, proportional to birth fitness
    pub fn select_birth(&mut self) -> Result<usize> {
        let population = &self.population;
        let weights = (0..population.population_size()).map(|slot| population.scores(slot).birth_fitness);
        roulette(weights, &mut self.rng)
            .map_err(|e| Error::InvalidState(format!("Birth selection failed: {}", e)))
    }

    /// Pick the slot of the individual replaced by the offspring of `birth_slot`
    pub fn select_death(&mut self, birth_slot: usize) -> Result<usize> {
        let population = &self.population;
        let uniform = self.config.death_selection == DeathSelection::Uniform;
        let weight = |slot: usize| {
            if uniform {
                1.0
            } else {
                population.scores(slot).death_fitness
            }
        };

        let chosen = match population.death_candidates(birth_slot) {
            Candidates::Everyone => {
                roulette((0..population.population_size()).map(weight), &mut self.rng)
            }
            Candidates::Slots(slots) => roulette(slots.iter().map(|&s| weight(s)), &mut self.rng)
                .map(|i| slots[i]),
        };
        chosen.map_err(|e| Error::InvalidState(format!("Death selection failed: {}", e)))
    }

    fn allocate_id(&mut self) -> IndividualId {
        let id = IndividualId(self.next_id);
        self.next_id += 1;
        id
    }

    fn record(&mut self) -> Result<()> {
        let record = StepRecord {
            generation: self.generation,
            labels: self.population.label_snapshots(),
            entropy: self.entropy(),
        };
        self.history.push(record)
    }

    fn fixated_label(&self) -> Option<&str> {
        let total = self.population.population_size();
        self.population
            .counts()
            .iter()
            .position(|&n| n == total)
            .map(|i| self.model.labels().name(i))
    }

    fn emit_summary(&self, summary: &RunSummary) {
        info!(
            event = "run_summary",
            run_id = %summary.run_id,
            generations = summary.generations,
            population_size = summary.population_size,
            final_sizes = ?summary.final_sizes,
            final_entropy = summary.final_entropy,
            fixated_label = summary.fixated_label.as_deref().unwrap_or(""),
            elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds(),
            "Simulation complete"
        );

        event!(
            Level::DEBUG,
            gauge_name = "final_entropy",
            gauge_value = summary.final_entropy,
            "Final entropy gauge"
        );
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn model(&self) -> &PayoffModel {
        &self.model
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelSet {
        self.model.labels()
    }

    pub fn population(&self) -> &P {
        &self.population
    }

    /// Payoffs and fitness of the individual in `slot`
    pub fn scores(&self, slot: usize) -> &Scores {
        self.population.scores(slot)
    }

    pub fn population_size(&self) -> usize {
        self.population.population_size()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn initial_sizes(&self) -> &[usize] {
        &self.initial_sizes
    }

    pub fn current_sizes(&self) -> &[usize] {
        self.population.counts()
    }

    /// Entropy of the current label distribution
    pub fn entropy(&self) -> f64 {
        entropy(self.population.counts())
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Summary of the latest call to [`MoranProcess::simulate`]
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moran_core::{Position, TransitionMatrix};
    use proptest::prelude::*;

    fn rows(m: &[&[f64]]) -> Vec<Vec<f64>> {
        m.iter().map(|r| r.to_vec()).collect()
    }

    fn model(labels: &[&str], birth: &[&[f64]], death: &[&[f64]], transition: Option<&[&[f64]]>) -> PayoffModel {
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        let transition = transition.map(rows);
        PayoffModel::from_rows(
            &labels,
            &rows(birth),
            &rows(death),
            transition.as_deref(),
            0.5,
        )
        .unwrap()
    }

    fn grid(g: &[&[&str]]) -> Vec<Vec<String>> {
        g.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect()
    }

    fn config(seed: u64) -> ProcessConfig {
        ProcessConfig {
            seed,
            ..Default::default()
        }
    }

    fn hawk_dove() -> PayoffModel {
        model(
            &["Hawk", "Dove"],
            &[&[1.0, 4.0], &[0.5, 2.0]],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            None,
        )
    }

    #[test]
    fn test_1d_creation() {
        let mp = MoranProcess1D::new(&[10, 10], hawk_dove(), config(1)).unwrap();
        assert_eq!(mp.population_size(), 20);
        assert_eq!(mp.initial_sizes(), &[10, 10]);
        assert_eq!(mp.history().len(), 1);
        assert!((mp.entropy() - 1.0).abs() < 1e-12);
        assert!(mp.summary().is_none());
        assert_eq!(mp.labels().name(1), "Dove");
        // Hawk: (1 * 9 + 4 * 10) / 19
        assert!((mp.scores(0).birth_payoff - 49.0 / 19.0).abs() < 1e-12);
    }

    #[test]
    fn test_1d_initial_record() {
        let m = model(
            &["A", "B"],
            &[&[10.0, 20.0], &[30.0, 40.0]],
            &[&[1.0, 2.0], &[3.0, 4.0]],
            None,
        );
        let mp = MoranProcess1D::new(&[3, 2], m, config(0)).unwrap();
        let first = mp.history().first().unwrap();
        assert_eq!(first.generation, 0);
        assert_eq!(first.sizes(), vec![3, 2]);
        assert_eq!(first.labels[0].scores.unwrap().birth_payoff, 15.0);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(MoranProcess1D::new(&[3, 1, 1], hawk_dove(), config(0)).is_err());
        assert!(MoranProcess1D::new(&[1, 0], hawk_dove(), config(0)).is_err());

        let g = grid(&[&["Hawk", "Hawk"], &["Hawk", "Dove"]]);
        assert!(MoranProcess2D::new(&[3, 1, 0], &g, hawk_dove(), config(0)).is_err());
        assert!(MoranProcess2D::new(&[2, 2], &g, hawk_dove(), config(0)).is_err());
    }

    #[test]
    fn test_simulate_logs_every_generation() {
        let mut mp = MoranProcess1D::new(&[10, 10], hawk_dove(), config(7)).unwrap();
        let history = mp.simulate(100).unwrap();
        assert_eq!(history.len(), 101);
        assert_eq!(history.generations(), (0..=100).collect::<Vec<_>>());

        mp.simulate(50).unwrap();
        assert_eq!(mp.history().len(), 151);
        assert_eq!(mp.generation(), 150);

        let summary = mp.summary().unwrap();
        assert_eq!(summary.generations, 150);
        assert_eq!(summary.final_sizes, mp.current_sizes());
    }

    #[test]
    fn test_zero_generations() {
        let mut mp = MoranProcess1D::new(&[2, 2], hawk_dove(), config(7)).unwrap();
        assert_eq!(mp.simulate(0).unwrap().len(), 1);
    }

    #[test]
    fn test_same_seed_same_history() {
        let mut a = MoranProcess1D::new(&[15, 5], hawk_dove(), config(99)).unwrap();
        let mut b = MoranProcess1D::new(&[15, 5], hawk_dove(), config(99)).unwrap();
        a.simulate(200).unwrap();
        b.simulate(200).unwrap();
        assert_eq!(a.history().records(), b.history().records());
    }

    #[test]
    fn test_offspring_get_fresh_ids() {
        let mut mp = MoranProcess1D::new(&[3, 3], hawk_dove(), config(5)).unwrap();
        let first = mp.step().unwrap();
        let second = mp.step().unwrap();
        assert_eq!(first.offspring.id(), IndividualId(6));
        assert_eq!(second.offspring.id(), IndividualId(7));
        assert_eq!(first.offspring.label(), first.parent.label());
    }

    #[test]
    fn test_monomorphic_population_stays_monomorphic() {
        let mut mp = MoranProcess1D::new(&[0, 12], hawk_dove(), config(3)).unwrap();
        let history = mp.simulate(100).unwrap();
        assert!(history.entropy_series().iter().all(|&h| h == 0.0));
        assert!(history.sizes_of("Hawk").unwrap().iter().all(|&n| n == 0));
        assert_eq!(history.fixated_label(), Some("Dove"));
    }

    #[test]
    fn test_offspring_transitions() {
        // Every offspring becomes a Dove, so Hawks can only decline
        let m = model(
            &["Hawk", "Dove"],
            &[&[1.0, 4.0], &[0.5, 2.0]],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            Some(&[&[0.0, 1.0], &[0.0, 1.0]]),
        );
        let mut mp = MoranProcess1D::new(&[10, 2], m, config(11)).unwrap();
        let hawks = mp.simulate(300).unwrap().sizes_of("Hawk").unwrap();
        assert!(hawks.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*hawks.last().unwrap(), 0);
    }

    #[test]
    fn test_population_transitions() {
        // Everyone switches label every generation
        let m = model(
            &["A", "B"],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            Some(&[&[0.0, 1.0], &[1.0, 0.0]]),
        );
        let config = ProcessConfig {
            transition_scope: TransitionScope::Population,
            ..config(2)
        };
        let mut mp = MoranProcess1D::new(&[5, 0], m, config).unwrap();
        let history = mp.simulate(4).unwrap();
        assert_eq!(history.sizes_of("A").unwrap(), vec![5, 0, 5, 0, 5]);
    }

    #[test]
    fn test_identity_transitions_keep_labels() {
        let labels = LabelSet::new(["A", "B"]).unwrap();
        let birth = moran_core::PayoffMatrix::from_rows(&rows(&[&[1.0, 2.0], &[2.0, 1.0]])).unwrap();
        let death = moran_core::PayoffMatrix::from_rows(&rows(&[&[1.0, 1.0], &[1.0, 1.0]])).unwrap();
        let m = PayoffModel::new(labels, birth, death, Some(TransitionMatrix::identity(2)), 0.5).unwrap();
        let mut mp = MoranProcess1D::new(&[4, 0], m, config(8)).unwrap();
        assert_eq!(mp.simulate(20).unwrap().sizes_of("B").unwrap().iter().sum::<usize>(), 0);
    }

    #[test]
    fn test_2d_birth_selection_prefers_fit() {
        let m = model(
            &["A", "B"],
            &[&[1.0, 1.0], &[100.0, 1.0]],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            None,
        );
        let g = grid(&[&["A", "A"], &["A", "B"]]);
        let mut mp = MoranProcess2D::new(&[3, 1], &g, m, config(0)).unwrap();
        let b_slot = mp.lattice().slot_of(Position::new(1, 1));

        // B's birth fitness is 50.5 against 1.0 for each A
        let hits = (0..1000)
            .filter(|_| mp.select_birth().unwrap() == b_slot)
            .count();
        assert!(hits > 880, "hits: {}", hits);
    }

    #[test]
    fn test_2d_death_selection_among_neighbours() {
        let m = model(
            &["A", "B"],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            &[&[1.0, 100.0], &[1.0, 1.0]],
            None,
        );
        let g = grid(&[&["A", "B", "B"], &["B", "B", "B"], &["B", "B", "B"]]);
        let mut mp = MoranProcess2D::new(&[1, 8], &g, m, config(0)).unwrap();
        let center = mp.lattice().slot_of(Position::new(1, 1));
        let a_slot = mp.lattice().slot_of(Position::new(0, 0));

        let mut a_hits = 0;
        for _ in 0..1000 {
            let slot = mp.select_death(center).unwrap();
            assert_ne!(slot, center);
            if slot == a_slot {
                a_hits += 1;
            }
        }
        // A's death fitness is 50.5 against 1.0 for the 7 other neighbours
        assert!(a_hits > 800, "hits: {}", a_hits);
    }

    #[test]
    fn test_uniform_death_selection() {
        let m = model(
            &["A", "B"],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            &[&[1.0, 100.0], &[1.0, 1.0]],
            None,
        );
        let g = grid(&[&["A", "B", "B"], &["B", "B", "B"], &["B", "B", "B"]]);
        let config = ProcessConfig {
            death_selection: DeathSelection::Uniform,
            ..config(4)
        };
        let mut mp = MoranProcess2D::new(&[1, 8], &g, m, config).unwrap();
        let center = mp.lattice().slot_of(Position::new(1, 1));
        let a_slot = mp.lattice().slot_of(Position::new(0, 0));

        let a_hits = (0..4000)
            .filter(|_| mp.select_death(center).unwrap() == a_slot)
            .count();
        // Expected 500
        assert!(a_hits > 380 && a_hits < 620, "hits: {}", a_hits);
    }

    #[test]
    fn test_2d_simulation() {
        let m = model(
            &["A", "B", "C"],
            &[&[1.0, 5.0, 25.0], &[0.1, 7.0, 0.02], &[0.99, 9.52, 0.111]],
            &[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]],
            None,
        );
        let g = grid(&[
            &["A", "B", "B", "B"],
            &["A", "C", "A", "B"],
            &["A", "B", "A", "B"],
        ]);
        let mut mp = MoranProcess2D::new(&[5, 6, 1], &g, m, config(21)).unwrap();
        let history = mp.simulate(50).unwrap();
        assert_eq!(history.len(), 51);
        assert!(history.records().iter().all(|r| r.population_size() == 12));

        let cells: Vec<usize> = mp.label_grid().concat();
        let mut counts = [0usize; 3];
        for label in cells {
            counts[label] += 1;
        }
        assert_eq!(&counts[..], mp.current_sizes());
    }

    #[test]
    fn test_2d_offspring_replaces_neighbour() {
        let g = grid(&[
            &["Hawk", "Dove", "Dove"],
            &["Dove", "Hawk", "Dove"],
            &["Dove", "Dove", "Hawk"],
        ]);
        let mut mp = MoranProcess2D::new(&[3, 6], &g, hawk_dove(), config(13)).unwrap();
        for _ in 0..20 {
            let event = mp.step().unwrap();
            assert!(mp
                .lattice()
                .neighbours_of(event.birth_slot)
                .contains(&event.death_slot));
            assert_eq!(
                mp.population().individual(event.death_slot).id(),
                event.offspring.id()
            );
        }
    }

    #[test]
    fn test_3d_simulation_with_transitions() {
        let m = model(
            &["A", "B"],
            &[&[1.0, 2.0], &[3.0, 4.0]],
            &[&[1.0, 1.0], &[1.0, 1.0]],
            Some(&[&[0.9, 0.1], &[0.2, 0.8]]),
        );
        let mut layers = vec![vec![vec!["A".to_string(); 3]; 3]; 2];
        layers[1][1][1] = "B".to_string();
        layers[0][2][0] = "B".to_string();

        let config = ProcessConfig {
            transition_scope: TransitionScope::Population,
            ..config(17)
        };
        let mut mp = MoranProcess3D::new(&[16, 2], &layers, m, config).unwrap();
        let history = mp.simulate(30).unwrap();
        assert!(history.records().iter().all(|r| r.population_size() == 18));
    }

    #[test]
    fn test_selection_weight_comes_from_the_model() {
        let labels: Vec<String> = vec!["A".into(), "B".into()];
        let birth = rows(&[&[3.0, 3.0], &[1.0, 1.0]]);
        let death = rows(&[&[1.0, 1.0], &[1.0, 1.0]]);
        let m = PayoffModel::from_rows(&labels, &birth, &death, None, 0.3).unwrap();

        let mp = MoranProcess1D::new(&[2, 2], m, ProcessConfig::default()).unwrap();
        // 1 - 0.3 + 0.3 * 3
        assert!((mp.scores(0).birth_fitness - 1.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_fitness_is_an_error() {
        // With w = 1 and all-zero birth payoffs nobody can reproduce
        let labels: Vec<String> = vec!["A".into(), "B".into()];
        let zeros = rows(&[&[0.0, 0.0], &[0.0, 0.0]]);
        let m = PayoffModel::from_rows(&labels, &zeros, &zeros, None, 1.0).unwrap();
        let mut mp = MoranProcess1D::new(&[2, 2], m, ProcessConfig::default()).unwrap();
        assert!(matches!(mp.simulate(1), Err(Error::InvalidState(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn population_size_is_invariant(
            seed in any::<u64>(),
            hawks in 0usize..15,
            doves in 0usize..15,
            uniform in any::<bool>(),
        ) {
            prop_assume!(hawks + doves >= 2);
            let config = ProcessConfig {
                seed,
                death_selection: if uniform { DeathSelection::Uniform } else { DeathSelection::FitnessWeighted },
                ..Default::default()
            };
            let mut mp = MoranProcess1D::new(&[hawks, doves], hawk_dove(), config).unwrap();
            let history = mp.simulate(60).unwrap();
            for record in history.records() {
                prop_assert_eq!(record.population_size(), hawks + doves);
                prop_assert!(record.entropy >= 0.0 && record.entropy <= 1.0 + 1e-12);
            }
        }

        #[test]
        fn lattice_size_is_invariant(seed in any::<u64>(), cells in prop::collection::vec(0usize..3, 12)) {
            let names = ["A", "B", "C"];
            let g: Vec<Vec<String>> = cells
                .chunks(4)
                .map(|row| row.iter().map(|&l| names[l].to_string()).collect())
                .collect();
            let mut sizes = vec![0usize; 3];
            for &l in &cells {
                sizes[l] += 1;
            }
            let m = model(
                &names,
                &[&[1.0, 2.0, 0.5], &[0.0, 1.0, 3.0], &[2.0, 0.5, 1.0]],
                &[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]],
                Some(&[&[0.98, 0.01, 0.01], &[0.01, 0.98, 0.01], &[0.01, 0.01, 0.98]]),
            );
            let mut mp = MoranProcess2D::new(&sizes, &g, m, config(seed)).unwrap();
            let history = mp.simulate(40).unwrap();
            for record in history.records() {
                prop_assert_eq!(record.population_size(), 12);
            }
        }
    }
}
