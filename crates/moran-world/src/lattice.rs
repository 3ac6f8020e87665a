//! Toroidal lattices for spatially structured populations.

use crate::population::{Candidates, Population};
use moran_core::{
    Error, Individual, IndividualId, LabelScoreStats, LabelSet, LabelSnapshot, PayoffModel,
    Position, Position3, Result, Scores,
};
use std::fmt;
use std::marker::PhantomData;

/// A site coordinate on a periodic lattice
pub trait Site: Copy + Eq + fmt::Debug {
    /// Extent of the lattice along every axis
    type Shape: Copy + Eq + fmt::Debug;

    /// Size of the Moore neighbourhood
    const NEIGHBOURS: usize;

    fn volume(shape: Self::Shape) -> usize;

    /// Flat index of an already wrapped site
    fn to_index(self, shape: Self::Shape) -> usize;

    fn from_index(index: usize, shape: Self::Shape) -> Self;

    fn wrapped(self, shape: Self::Shape) -> Self;

    /// Moore neighbours with periodic boundaries, excluding the offset (0, .., 0)
    fn neighbours(self, shape: Self::Shape) -> Vec<Self>;
}

impl Site for Position {
    /// (rows, columns)
    type Shape = (i32, i32);

    const NEIGHBOURS: usize = 8;

    fn volume((rows, cols): Self::Shape) -> usize {
        (rows * cols) as usize
    }

    fn to_index(self, (_, cols): Self::Shape) -> usize {
        (self.x * cols + self.y) as usize
    }

    fn from_index(index: usize, (_, cols): Self::Shape) -> Self {
        let index = index as i32;
        Position::new(index / cols, index % cols)
    }

    fn wrapped(self, (rows, cols): Self::Shape) -> Self {
        self.wrap(rows, cols)
    }

    fn neighbours(self, (rows, cols): Self::Shape) -> Vec<Self> {
        Position::moore_offsets()
            .iter()
            .map(|&(dx, dy)| self.add(dx, dy).wrap(rows, cols))
            .collect()
    }
}

impl Site for Position3 {
    type Shape = (i32, i32, i32);

    const NEIGHBOURS: usize = 26;

    fn volume((nx, ny, nz): Self::Shape) -> usize {
        (nx * ny * nz) as usize
    }

    fn to_index(self, (_, ny, nz): Self::Shape) -> usize {
        ((self.x * ny + self.y) * nz + self.z) as usize
    }

    fn from_index(index: usize, (_, ny, nz): Self::Shape) -> Self {
        let index = index as i32;
        Position3::new(index / (ny * nz), (index / nz) % ny, index % nz)
    }

    fn wrapped(self, (nx, ny, nz): Self::Shape) -> Self {
        self.wrap(nx, ny, nz)
    }

    fn neighbours(self, (nx, ny, nz): Self::Shape) -> Vec<Self> {
        Position3::moore_offsets()
            .into_iter()
            .map(|(dx, dy, dz)| self.add(dx, dy, dz).wrap(nx, ny, nz))
            .collect()
    }
}

/// A fully occupied periodic lattice of individuals.
///
/// Each individual interacts with its Moore neighbourhood. On lattices
/// narrower than 3 along some axis a neighbour can occur several times
/// (or be the site itself); every occurrence counts.
#[derive(Debug, Clone)]
pub struct Lattice<S: Site> {
    shape: S::Shape,
    cells: Vec<Individual>,
    scores: Vec<Scores>,
    /// `S::NEIGHBOURS` slots per cell
    neighbours: Vec<usize>,
    counts: Vec<usize>,
    _site: PhantomData<S>,
}

pub type Grid2D = Lattice<Position>;
pub type Grid3D = Lattice<Position3>;

impl<S: Site> Lattice<S> {
    /// Build a lattice from one label index per cell, in flat index order
    pub fn from_cells(
        shape: S::Shape,
        cell_labels: &[usize],
        sizes: &[usize],
        num_labels: usize,
    ) -> Result<Self> {
        if sizes.len() != num_labels {
            return Err(Error::Validation(format!(
                "Mismatch length of size and label lists: {} sizes, {} labels",
                sizes.len(),
                num_labels
            )));
        }

        let volume = S::volume(shape);
        if volume == 0 || cell_labels.len() != volume {
            return Err(Error::Validation(format!(
                "Invalid Population Grid: {} cells for shape {:?}",
                cell_labels.len(),
                shape
            )));
        }

        let mut counts = vec![0usize; num_labels];
        for &label in cell_labels {
            if label >= num_labels {
                return Err(Error::Validation(format!(
                    "Invalid Population Grid: label index {} out of range",
                    label
                )));
            }
            counts[label] += 1;
        }
        if counts != sizes {
            return Err(Error::Validation(format!(
                "Invalid Population Grid: grid holds {:?} individuals per label, sizes are {:?}",
                counts, sizes
            )));
        }

        let cells = cell_labels
            .iter()
            .enumerate()
            .map(|(i, &label)| Individual::new(IndividualId(i as u64), label))
            .collect();

        let mut neighbours = Vec::with_capacity(volume * S::NEIGHBOURS);
        for index in 0..volume {
            let site = S::from_index(index, shape);
            neighbours.extend(site.neighbours(shape).into_iter().map(|n| n.to_index(shape)));
        }

        Ok(Self {
            shape,
            cells,
            scores: vec![Scores::default(); volume],
            neighbours,
            counts,
            _site: PhantomData,
        })
    }

    pub fn shape(&self) -> S::Shape {
        self.shape
    }

    pub fn slot_of(&self, site: S) -> usize {
        site.wrapped(self.shape).to_index(self.shape)
    }

    pub fn site_of(&self, slot: usize) -> S {
        S::from_index(slot, self.shape)
    }

    /// Individual at `site` (with toroidal wrapping)
    pub fn get(&self, site: S) -> &Individual {
        &self.cells[self.slot_of(site)]
    }

    pub fn scores_at(&self, site: S) -> &Scores {
        &self.scores[self.slot_of(site)]
    }

    pub fn neighbours_of(&self, slot: usize) -> &[usize] {
        &self.neighbours[slot * S::NEIGHBOURS..(slot + 1) * S::NEIGHBOURS]
    }

    /// Label index of every cell, in flat index order
    pub fn cell_labels(&self) -> Vec<usize> {
        self.cells.iter().map(Individual::label).collect()
    }

    fn score_slot(&self, slot: usize, model: &PayoffModel) -> Scores {
        let mut partners = vec![0usize; self.counts.len()];
        for &neighbour in self.neighbours_of(slot) {
            partners[self.cells[neighbour].label()] += 1;
        }
        model.scores(self.cells[slot].label(), &partners, S::NEIGHBOURS)
    }
}

fn parse_label(name: &str, labels: &LabelSet) -> Result<usize> {
    labels.index_of(name).ok_or_else(|| {
        Error::Validation(format!("Invalid Population Grid: unknown label '{}'", name))
    })
}

impl Lattice<Position> {
    /// Build a 2D lattice from rows of label names
    pub fn from_rows(grid: &[Vec<String>], labels: &LabelSet, sizes: &[usize]) -> Result<Self> {
        let rows = grid.len();
        let cols = grid.first().map(Vec::len).unwrap_or(0);
        if grid.iter().any(|row| row.len() != cols) {
            return Err(Error::Validation(
                "Invalid Population Grid: rows differ in length".to_string(),
            ));
        }

        let cell_labels = grid
            .iter()
            .flatten()
            .map(|name| parse_label(name, labels))
            .collect::<Result<Vec<_>>>()?;

        Self::from_cells((rows as i32, cols as i32), &cell_labels, sizes, labels.len())
    }

    /// Label index of every cell, row by row
    pub fn label_rows(&self) -> Vec<Vec<usize>> {
        let (_, cols) = self.shape;
        self.cell_labels()
            .chunks(cols as usize)
            .map(<[usize]>::to_vec)
            .collect()
    }
}

impl Lattice<Position3> {
    /// Build a 3D lattice from `grid[x][y][z]` label names
    pub fn from_layers(
        grid: &[Vec<Vec<String>>],
        labels: &LabelSet,
        sizes: &[usize],
    ) -> Result<Self> {
        let nx = grid.len();
        let ny = grid.first().map(Vec::len).unwrap_or(0);
        let nz = grid
            .first()
            .and_then(|layer| layer.first())
            .map(Vec::len)
            .unwrap_or(0);

        let ragged = grid
            .iter()
            .any(|layer| layer.len() != ny || layer.iter().any(|row| row.len() != nz));
        if ragged {
            return Err(Error::Validation(
                "Invalid Population Grid: layers differ in shape".to_string(),
            ));
        }

        let cell_labels = grid
            .iter()
            .flatten()
            .flatten()
            .map(|name| parse_label(name, labels))
            .collect::<Result<Vec<_>>>()?;

        Self::from_cells(
            (nx as i32, ny as i32, nz as i32),
            &cell_labels,
            sizes,
            labels.len(),
        )
    }
}

impl<S: Site> Population for Lattice<S> {
    fn population_size(&self) -> usize {
        self.cells.len()
    }

    fn counts(&self) -> &[usize] {
        &self.counts
    }

    fn individual(&self, slot: usize) -> &Individual {
        &self.cells[slot]
    }

    fn scores(&self, slot: usize) -> &Scores {
        &self.scores[slot]
    }

    fn death_candidates(&self, birth: usize) -> Candidates {
        Candidates::Slots(self.neighbours_of(birth).to_vec())
    }

    fn place(&mut self, slot: usize, individual: Individual) {
        let previous = std::mem::replace(&mut self.cells[slot], individual);
        self.counts[previous.label()] -= 1;
        self.counts[individual.label()] += 1;
    }

    fn relabel(&mut self, slot: usize, label: usize) {
        let cell = &mut self.cells[slot];
        self.counts[cell.label()] -= 1;
        self.counts[label] += 1;
        cell.set_label(label);
    }

    fn refresh_all(&mut self, model: &PayoffModel) {
        for slot in 0..self.cells.len() {
            self.scores[slot] = self.score_slot(slot, model);
        }
    }

    fn refresh_around(&mut self, slot: usize, model: &PayoffModel) {
        self.scores[slot] = self.score_slot(slot, model);
        for i in 0..S::NEIGHBOURS {
            let neighbour = self.neighbours[slot * S::NEIGHBOURS + i];
            self.scores[neighbour] = self.score_slot(neighbour, model);
        }
    }

    fn label_snapshots(&self) -> Vec<LabelSnapshot> {
        let mut stats = vec![LabelScoreStats::new(); self.counts.len()];
        for (cell, scores) in self.cells.iter().zip(&self.scores) {
            stats[cell.label()].update(scores);
        }

        self.counts
            .iter()
            .zip(&stats)
            .map(|(&size, stats)| LabelSnapshot {
                size,
                scores: stats.mean(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn model(labels: &[&str], birth: &[&[f64]], death: &[&[f64]]) -> PayoffModel {
        let rows = |m: &[&[f64]]| m.iter().map(|r| r.to_vec()).collect::<Vec<_>>();
        let labels: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        PayoffModel::from_rows(&labels, &rows(birth), &rows(death), None, 0.5).unwrap()
    }

    fn three_label_grid() -> Vec<Vec<String>> {
        grid(&[
            &["A", "B", "B", "B"],
            &["A", "C", "A", "B"],
            &["A", "B", "A", "B"],
        ])
    }

    #[test]
    fn test_lattice_creation() {
        let labels = LabelSet::new(["A", "B"]).unwrap();
        let lattice = Grid2D::from_rows(&grid(&[&["A", "A"], &["A", "B"]]), &labels, &[3, 1]).unwrap();
        assert_eq!(lattice.shape(), (2, 2));
        assert_eq!(lattice.population_size(), 4);
        assert_eq!(lattice.get(Position::new(1, 1)).label(), 1);
        assert_eq!(lattice.get(Position::new(1, 1)).id(), IndividualId(3));
        assert_eq!(lattice.label_rows(), vec![vec![0, 0], vec![0, 1]]);
    }

    #[test]
    fn test_invalid_grids() {
        let labels = LabelSet::new(["A", "B"]).unwrap();
        // unknown label
        assert!(Grid2D::from_rows(&grid(&[&["A", "A"], &["C", "B"]]), &labels, &[3, 1]).is_err());
        // counts differ from sizes
        assert!(Grid2D::from_rows(&grid(&[&["A", "A"], &["A", "B"]]), &labels, &[2, 2]).is_err());
        // ragged rows
        assert!(Grid2D::from_rows(&grid(&[&["A", "A"], &["B"]]), &labels, &[2, 1]).is_err());
        // sizes do not match labels
        assert!(Grid2D::from_rows(&grid(&[&["A", "A"], &["A", "B"]]), &labels, &[3, 1, 0]).is_err());
        // empty
        assert!(Grid2D::from_rows(&[], &labels, &[0, 0]).is_err());
    }

    #[test]
    fn test_toroidal_neighbours() {
        let labels = LabelSet::new(["A", "B"]).unwrap();
        let lattice = Grid2D::from_rows(&two_label_grid(), &labels, &[6, 6]).unwrap();
        let corner = lattice.slot_of(Position::new(0, 0));
        let mut neighbours: Vec<Position> = lattice
            .neighbours_of(corner)
            .iter()
            .map(|&slot| lattice.site_of(slot))
            .collect();
        neighbours.sort_by_key(|p| (p.x, p.y));
        assert_eq!(
            neighbours,
            vec![
                Position::new(0, 1),
                Position::new(0, 3),
                Position::new(1, 0),
                Position::new(1, 1),
                Position::new(1, 3),
                Position::new(2, 0),
                Position::new(2, 1),
                Position::new(2, 3),
            ]
        );
    }

    fn two_label_grid() -> Vec<Vec<String>> {
        grid(&[
            &["A", "B", "B", "B"],
            &["A", "B", "A", "B"],
            &["A", "B", "A", "A"],
        ])
    }

    #[test]
    fn test_small_lattice_repeats_neighbours() {
        let labels = LabelSet::new(["A", "B"]).unwrap();
        let lattice = Grid2D::from_rows(&grid(&[&["A", "A"], &["A", "B"]]), &labels, &[3, 1]).unwrap();
        let slot = lattice.slot_of(Position::new(1, 1));
        let neighbours = lattice.neighbours_of(slot);
        assert_eq!(neighbours.len(), 8);
        assert_eq!(neighbours.iter().filter(|&&n| n == 0).count(), 4);
    }

    #[test]
    fn test_birth_and_death_payoffs() {
        let labels = LabelSet::new(["A", "B", "C"]).unwrap();
        let matrix: &[&[f64]] = &[&[1.0, 5.0, 25.0], &[0.1, 7.0, 0.02], &[0.99, 9.52, 0.111]];
        let ones: &[&[f64]] = &[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]];

        let mut lattice = Grid2D::from_rows(&three_label_grid(), &labels, &[5, 6, 1]).unwrap();
        lattice.refresh_all(&model(&["A", "B", "C"], matrix, ones));
        let a = lattice.scores_at(Position::new(0, 0));
        let c = lattice.scores_at(Position::new(1, 1));
        assert!((a.birth_payoff - 6.5).abs() < 1e-9);
        assert!((c.birth_payoff - 4.189).abs() < 5e-4);
        assert!((a.birth_fitness - 3.75).abs() < 1e-9);
        assert!((c.birth_fitness - 2.594).abs() < 5e-4);
        assert_eq!(a.death_payoff, 1.0);

        lattice.refresh_all(&model(&["A", "B", "C"], ones, matrix));
        let a = lattice.scores_at(Position::new(0, 0));
        let c = lattice.scores_at(Position::new(1, 1));
        assert!((a.death_payoff - 6.5).abs() < 1e-9);
        assert!((c.death_fitness - 2.594).abs() < 5e-4);
    }

    #[test]
    fn test_refresh_around_matches_refresh_all() {
        let labels = LabelSet::new(["A", "B", "C"]).unwrap();
        let model = model(
            &["A", "B", "C"],
            &[&[1.0, 5.0, 25.0], &[0.1, 7.0, 0.02], &[0.99, 9.52, 0.111]],
            &[&[2.0, 1.0, 0.5], &[1.0, 3.0, 1.0], &[0.5, 1.0, 4.0]],
        );
        let mut local = Grid2D::from_rows(&three_label_grid(), &labels, &[5, 6, 1]).unwrap();
        local.refresh_all(&model);
        let mut full = local.clone();

        let slot = local.slot_of(Position::new(2, 2));
        local.place(slot, Individual::new(IndividualId(100), 2));
        full.place(slot, Individual::new(IndividualId(100), 2));
        local.refresh_around(slot, &model);
        full.refresh_all(&model);

        assert_eq!(local.scores, full.scores);
        assert_eq!(local.counts(), &[4, 6, 2]);
    }

    #[test]
    fn test_label_snapshots_average_members() {
        let labels = LabelSet::new(["A", "B", "C"]).unwrap();
        let mut lattice = Grid2D::from_rows(
            &grid(&[&["A", "A"], &["A", "B"]]),
            &labels,
            &[3, 1, 0],
        )
        .unwrap();
        let ones: &[&[f64]] = &[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]];
        lattice.refresh_all(&model(&["A", "B", "C"], ones, ones));

        let snapshots = lattice.label_snapshots();
        assert_eq!(snapshots[0].size, 3);
        assert_eq!(snapshots[0].scores.unwrap().birth_fitness, 1.0);
        assert!(snapshots[2].scores.is_none());
    }

    #[test]
    fn test_3d_lattice() {
        let labels = LabelSet::new(["A", "B"]).unwrap();
        let mut layers = vec![vec![vec!["A".to_string(); 3]; 3]; 3];
        layers[1][1][1] = "B".to_string();

        let mut lattice = Grid3D::from_layers(&layers, &labels, &[26, 1]).unwrap();
        assert_eq!(lattice.shape(), (3, 3, 3));
        assert_eq!(lattice.neighbours_of(0).len(), 26);

        lattice.refresh_all(&model(
            &["A", "B"],
            &[&[1.0, 2.0], &[3.0, 4.0]],
            &[&[1.0, 1.0], &[1.0, 1.0]],
        ));
        let center = lattice.scores_at(Position3::new(1, 1, 1));
        assert!((center.birth_payoff - 3.0).abs() < 1e-12);
        assert!((center.birth_fitness - 2.0).abs() < 1e-12);

        let corner = lattice.scores_at(Position3::new(0, 0, 0));
        assert!((corner.birth_payoff - 27.0 / 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_3d_index_round_trip() {
        let shape = (2, 3, 4);
        for index in 0..Position3::volume(shape) {
            let site = Position3::from_index(index, shape);
            assert_eq!(site.to_index(shape), index);
        }
    }

    #[test]
    fn test_ragged_3d_rejected() {
        let labels = LabelSet::new(["A"]).unwrap();
        let layers = vec![
            vec![vec!["A".to_string(); 2]; 2],
            vec![vec!["A".to_string(); 1]; 2],
        ];
        assert!(Grid3D::from_layers(&layers, &labels, &[6]).is_err());
    }
}
