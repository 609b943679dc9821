use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;

use crate::config::validate_grid;
use crate::error::{ConfigError, EngineError, Result};
use CellState::{Alive, Dead};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Dead,
    Alive,
}

pub type Cells = Vec<Vec<CellState>>;

/// Square toroidal world plus the bookkeeping derived from its current matrix.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Cells,
    generation: u64,
    population: usize,
    fingerprint: u64,
}

/// A fully computed successor matrix that has not been published yet.
#[derive(Debug)]
pub struct NextGeneration {
    cells: Cells,
    population: usize,
    fingerprint: u64,
}

impl Grid {
    /// Fill a `size`x`size` world, each cell alive with probability `density`.
    pub fn random<R: Rng + ?Sized>(size: usize, density: f64, rng: &mut R) -> Result<Self> {
        validate_grid(size, density)?;

        let cells = (0..size)
            .map(|_| {
                (0..size)
                    .map(|_| if rng.random_bool(density) { Alive } else { Dead })
                    .collect()
            })
            .collect();
        Ok(Self::from_matrix(cells))
    }

    pub fn from_cells(cells: Cells) -> Result<Self> {
        let rows = cells.len();
        if rows == 0 {
            return Err(ConfigError::ZeroSize.into());
        }
        if let Some((row, len)) = cells
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != rows)
        {
            return Err(ConfigError::NotSquare { rows, row, len }.into());
        }
        Ok(Self::from_matrix(cells))
    }

    /// Dead world except for the given `(row, col)` coordinates, wrapped onto the torus.
    pub fn with_live_cells(size: usize, live: &[(usize, usize)]) -> Result<Self> {
        validate_grid(size, 0.0)?;

        let mut cells = vec![vec![Dead; size]; size];
        for &(row, col) in live {
            cells[row % size][col % size] = Alive;
        }
        Ok(Self::from_matrix(cells))
    }

    fn from_matrix(cells: Cells) -> Self {
        Grid {
            size: cells.len(),
            population: count_alive(&cells),
            fingerprint: fingerprint_of(&cells),
            cells,
            generation: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    #[cfg(test)]
    fn get(&self, row: usize, col: usize) -> CellState {
        self.cells[row % self.size][col % self.size]
    }

    /// Advance the grid by one generation and return the new fingerprint.
    pub fn tick(&mut self) -> u64 {
        let next = self.next_generation();
        self.publish(next)
    }

    /// Compute the successor of the current matrix without touching it.
    pub fn next_generation(&self) -> NextGeneration {
        let mut next = vec![vec![Dead; self.size]; self.size];
        let mut population = 0;

        for row in 0..self.size {
            for col in 0..self.size {
                let alive_neighbors = self.alive_neighbors(row, col);

                next[row][col] = match (self.cells[row][col], alive_neighbors) {
                    (Alive, 2..=3) => Alive, // Survives
                    (Dead, 3) => Alive,      // Becomes alive
                    _ => Dead,               // Dies or remains dead
                };
                if next[row][col] == Alive {
                    population += 1;
                }
            }
        }

        NextGeneration {
            fingerprint: fingerprint_of(&next),
            cells: next,
            population,
        }
    }

    /// Swap in a successor computed by [`Grid::next_generation`].
    pub fn publish(&mut self, next: NextGeneration) -> u64 {
        self.cells = next.cells;
        self.population = next.population;
        self.fingerprint = next.fingerprint;
        self.generation += 1;
        self.fingerprint
    }

    /// Copy the current matrix and its counters into `dest`.
    pub fn snapshot(&self, dest: &mut Frame) -> Result<()> {
        if dest.size() != self.size {
            return Err(EngineError::SnapshotSize {
                expected: self.size,
                actual: dest.size(),
            });
        }
        for (target, source) in dest.cells.iter_mut().zip(&self.cells) {
            target.copy_from_slice(source);
        }
        dest.generation = self.generation;
        dest.population = self.population;
        Ok(())
    }

    /// Recompute everything derived from the matrix and compare with the cached values.
    pub fn verify(&self) -> Result<()> {
        if self.cells.len() != self.size || self.cells.iter().any(|row| row.len() != self.size) {
            return Err(EngineError::InternalInvariantViolation(format!(
                "matrix is no longer {0}x{0}",
                self.size
            )));
        }
        let counted = count_alive(&self.cells);
        if counted != self.population {
            return Err(EngineError::InternalInvariantViolation(format!(
                "population {} but {} live cells at generation {}",
                self.population, counted, self.generation
            )));
        }
        if fingerprint_of(&self.cells) != self.fingerprint {
            return Err(EngineError::InternalInvariantViolation(format!(
                "stale fingerprint at generation {}",
                self.generation
            )));
        }
        Ok(())
    }

    /// Count the number of alive neighbors for a cell
    fn alive_neighbors(&self, row: usize, col: usize) -> usize {
        let size = self.size as isize;
        let mut count = 0;

        for dr in [-1, 0, 1] {
            for dc in [-1, 0, 1] {
                if dr == 0 && dc == 0 {
                    // Skip the current cell
                    continue;
                }

                let neighbor_row = (row as isize + dr).rem_euclid(size) as usize;
                let neighbor_col = (col as isize + dc).rem_euclid(size) as usize;

                if self.cells[neighbor_row][neighbor_col] == Alive {
                    count += 1;
                }
            }
        }

        count
    }
}

/// A copy of one published generation, owned by a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    generation: u64,
    population: usize,
    cells: Cells,
}

impl Frame {
    pub fn for_size(size: usize) -> Self {
        Frame {
            generation: 0,
            population: 0,
            cells: vec![vec![Dead; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.population
    }

    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    /// `(row, col)` of every live cell, row-major.
    pub fn alive_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == Alive)
                .map(move |(col, _)| (row, col))
        })
    }
}

pub fn count_alive(cells: &Cells) -> usize {
    cells.iter().flatten().filter(|cell| **cell == Alive).count()
}

/// Digest of the whole matrix. Equal matrices always agree; distinct ones collide
/// with the usual 64-bit hash probability.
pub fn fingerprint_of(cells: &Cells) -> u64 {
    let mut hasher = DefaultHasher::new();
    for row in cells {
        for cell in row {
            cell.hash(&mut hasher);
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn live(grid: &Grid) -> Vec<(usize, usize)> {
        let mut frame = Frame::for_size(grid.size());
        grid.snapshot(&mut frame).unwrap();
        frame.alive_cells().collect()
    }

    #[test]
    fn test_random_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            Grid::random(0, 0.5, &mut rng),
            Err(EngineError::InvalidConfiguration(ConfigError::ZeroSize))
        ));
        assert!(matches!(
            Grid::random(8, 2.0, &mut rng),
            Err(EngineError::InvalidConfiguration(ConfigError::DensityOutOfRange(_)))
        ));
    }

    #[test]
    fn test_random_extreme_densities() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty = Grid::random(16, 0.0, &mut rng).unwrap();
        assert_eq!(empty.population(), 0);

        let full = Grid::random(16, 1.0, &mut rng).unwrap();
        assert_eq!(full.population(), 256);
        assert_eq!(full.generation(), 0);
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = Grid::random(32, 0.3, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = Grid::random(32, 0.3, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.cells(), b.cells());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_from_cells_requires_square() {
        let cells = vec![vec![Dead; 3], vec![Dead; 2], vec![Dead; 3]];
        assert!(matches!(
            Grid::from_cells(cells),
            Err(EngineError::InvalidConfiguration(ConfigError::NotSquare {
                rows: 3,
                row: 1,
                len: 2
            }))
        ));
        assert!(Grid::from_cells(Vec::new()).is_err());
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = Grid::with_live_cells(6, &[(2, 2), (2, 3), (3, 2), (3, 3)]).unwrap();
        let before = grid.cells().clone();
        let fingerprint = grid.fingerprint();

        grid.tick();

        assert_eq!(grid.cells(), &before);
        assert_eq!(grid.fingerprint(), fingerprint);
        assert_eq!(grid.population(), 4);
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut grid = Grid::with_live_cells(5, &[(2, 1), (2, 2), (2, 3)]).unwrap();
        let horizontal = grid.fingerprint();

        grid.tick();
        assert_eq!(live(&grid), vec![(1, 2), (2, 2), (3, 2)]);
        assert_ne!(grid.fingerprint(), horizontal);

        grid.tick();
        assert_eq!(live(&grid), vec![(2, 1), (2, 2), (2, 3)]);
        assert_eq!(grid.fingerprint(), horizontal);
    }

    #[test]
    fn test_opposite_corners_are_neighbors() {
        let grid = Grid::with_live_cells(5, &[(0, 0), (4, 4)]).unwrap();
        assert_eq!(grid.alive_neighbors(0, 0), 1);
        assert_eq!(grid.alive_neighbors(4, 4), 1);
    }

    #[test]
    fn test_blinker_across_the_seam() {
        let mut grid = Grid::with_live_cells(6, &[(0, 5), (0, 0), (0, 1)]).unwrap();
        grid.tick();
        assert_eq!(live(&grid), vec![(0, 0), (1, 0), (5, 0)]);
    }

    #[test]
    fn test_lonely_and_crowded_cells_die() {
        let mut lonely = Grid::with_live_cells(5, &[(2, 2)]).unwrap();
        lonely.tick();
        assert_eq!(lonely.population(), 0);

        // Centre of a plus sign has four neighbours.
        let plus = [(3, 3), (2, 3), (4, 3), (3, 2), (3, 4)];
        let mut crowded = Grid::with_live_cells(7, &plus).unwrap();
        crowded.tick();
        assert_eq!(crowded.get(3, 3), Dead);
    }

    #[test]
    fn test_tick_reads_only_the_previous_generation() {
        // An in-place update would let (1, 1) see its freshly born neighbours.
        let mut grid = Grid::with_live_cells(8, &[(0, 1), (1, 0), (1, 2)]).unwrap();
        grid.tick();
        assert_eq!(live(&grid), vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_snapshot_rejects_wrong_size() {
        let grid = Grid::with_live_cells(4, &[]).unwrap();
        let mut frame = Frame::for_size(5);
        assert!(matches!(
            grid.snapshot(&mut frame),
            Err(EngineError::SnapshotSize { expected: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_snapshot_carries_counters() {
        let mut grid = Grid::with_live_cells(5, &[(2, 1), (2, 2), (2, 3)]).unwrap();
        grid.tick();
        let mut frame = Frame::for_size(5);
        grid.snapshot(&mut frame).unwrap();
        assert_eq!(frame.generation(), 1);
        assert_eq!(frame.population(), 3);
        assert_eq!(frame.cells(), grid.cells());
    }

    #[test]
    fn test_verify_catches_stale_population() {
        let mut grid = Grid::with_live_cells(5, &[(1, 1)]).unwrap();
        assert!(grid.verify().is_ok());

        grid.population = 3;
        assert!(matches!(grid.verify(), Err(EngineError::InternalInvariantViolation(_))));
    }

    #[test]
    fn test_verify_catches_stale_fingerprint() {
        let mut grid = Grid::with_live_cells(5, &[(1, 1)]).unwrap();
        grid.cells[1][1] = Dead;
        grid.cells[3][3] = Alive;
        assert!(matches!(grid.verify(), Err(EngineError::InternalInvariantViolation(_))));
    }
}
