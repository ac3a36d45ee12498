use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Cell, Grid};

pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Chooses where the next tile goes and what it holds.
///
/// Implementations only propose a placement; the caller writes it to the grid.
/// `None` means there is no cell to place into.
pub trait TileInitializer {
    fn next_value(&mut self, grid: &Grid<u32>) -> Option<(Cell, u32)>;
}

impl<T: TileInitializer + ?Sized> TileInitializer for &mut T {
    fn next_value(&mut self, grid: &Grid<u32>) -> Option<(Cell, u32)> {
        (**self).next_value(grid)
    }
}

impl<T: TileInitializer + ?Sized> TileInitializer for Box<T> {
    fn next_value(&mut self, grid: &Grid<u32>) -> Option<(Cell, u32)> {
        (**self).next_value(grid)
    }
}

/// Uniform over empty cells; places a 4 with `four_probability`, otherwise a 2.
#[derive(Debug, Clone)]
pub struct RandomTileInitializer<R = StdRng> {
    rng: R,
    four_probability: f64,
}

impl RandomTileInitializer<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomTileInitializer<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }

    pub fn with_four_probability(mut self, probability: f64) -> Self {
        self.four_probability = if probability.is_nan() {
            DEFAULT_FOUR_PROBABILITY
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn four_probability(&self) -> f64 {
        self.four_probability
    }
}

impl<R: Rng> TileInitializer for RandomTileInitializer<R> {
    fn next_value(&mut self, grid: &Grid<u32>) -> Option<(Cell, u32)> {
        let empty = grid.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[self.rng.gen_range(0..empty.len())];
        let value = if self.rng.gen_bool(self.four_probability) { 4 } else { 2 };
        Some((cell, value))
    }
}

/// Replays a fixed list of placements, skipping any whose cell is already taken.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInitializer {
    placements: VecDeque<(Cell, u32)>,
}

impl ScriptedInitializer {
    pub fn new(placements: impl IntoIterator<Item = (Cell, u32)>) -> Self {
        Self {
            placements: placements.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.placements.len()
    }
}

impl TileInitializer for ScriptedInitializer {
    fn next_value(&mut self, grid: &Grid<u32>) -> Option<(Cell, u32)> {
        while let Some((cell, value)) = self.placements.pop_front() {
            if matches!(grid.get(cell), Ok(None)) {
                return Some((cell, value));
            }
            log::debug!("scripted placement {cell} skipped: cell unavailable");
        }
        None
    }
}

/// Always the first empty cell in row-major order, always the same value.
#[derive(Debug, Clone, Copy)]
pub struct FirstEmptyInitializer {
    pub value: u32,
}

impl Default for FirstEmptyInitializer {
    fn default() -> Self {
        Self { value: 2 }
    }
}

impl TileInitializer for FirstEmptyInitializer {
    fn next_value(&mut self, grid: &Grid<u32>) -> Option<(Cell, u32)> {
        grid.iter()
            .find(|(_, value)| value.is_none())
            .map(|(cell, _)| (cell, self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_initializer_only_proposes_empty_cells() {
        let mut grid = Grid::new(2);
        grid.set(Cell::new(1, 1), Some(2)).unwrap();
        grid.set(Cell::new(2, 2), Some(4)).unwrap();

        let mut init = RandomTileInitializer::seeded(11);
        for _ in 0..50 {
            let (cell, value) = init.next_value(&grid).unwrap();
            assert!(cell == Cell::new(1, 2) || cell == Cell::new(2, 1));
            assert!(value == 2 || value == 4);
        }
    }

    #[test]
    fn random_initializer_reports_full_board() {
        let grid = Grid::from_rows(vec![vec![Some(2), Some(4)], vec![Some(8), Some(16)]]).unwrap();
        assert_eq!(RandomTileInitializer::seeded(0).next_value(&grid), None);
    }

    #[test]
    fn same_seed_proposes_same_sequence() {
        let grid = Grid::new(4);
        let mut a = RandomTileInitializer::seeded(42);
        let mut b = RandomTileInitializer::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.next_value(&grid), b.next_value(&grid));
        }
    }

    #[test]
    fn four_probability_extremes_are_respected() {
        let grid = Grid::new(4);
        let mut twos = RandomTileInitializer::seeded(3).with_four_probability(0.0);
        let mut fours = RandomTileInitializer::seeded(3).with_four_probability(7.5);
        assert_eq!(fours.four_probability(), 1.0);
        for _ in 0..20 {
            assert_eq!(twos.next_value(&grid).unwrap().1, 2);
            assert_eq!(fours.next_value(&grid).unwrap().1, 4);
        }
    }

    #[test]
    fn scripted_initializer_skips_taken_cells() {
        let mut grid = Grid::new(2);
        grid.set(Cell::new(1, 1), Some(2)).unwrap();
        let mut init = ScriptedInitializer::new([(Cell::new(1, 1), 4), (Cell::new(2, 2), 8)]);

        assert_eq!(init.next_value(&grid), Some((Cell::new(2, 2), 8)));
        assert_eq!(init.remaining(), 0);
        assert_eq!(init.next_value(&grid), None);
    }

    #[test]
    fn first_empty_initializer_scans_row_major() {
        let mut grid = Grid::new(2);
        grid.set(Cell::new(1, 1), Some(2)).unwrap();
        let mut init = FirstEmptyInitializer::default();
        assert_eq!(init.next_value(&grid), Some((Cell::new(1, 2), 2)));
    }
}
