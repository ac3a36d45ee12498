use serde::{Deserialize, Serialize};

use crate::grid::{Cell, Grid, GridError};
use crate::line::compact_and_merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Which kind of line a move in this direction slides along.
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Column,
            Direction::Left | Direction::Right => Axis::Row,
        }
    }

    /// Whether tiles slide toward index 1 (top/left) rather than index N.
    pub fn toward_start(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }

    /// The lines of a `width`-wide grid, each ordered so index 0 is the edge
    /// tiles slide toward.
    pub fn lines<T>(self, grid: &Grid<T>) -> Result<Vec<Vec<Cell>>, GridError> {
        let width = grid.width();
        let order = |toward_start: bool| -> Vec<usize> {
            if toward_start {
                (1..=width).collect()
            } else {
                (1..=width).rev().collect()
            }
        };
        (1..=width)
            .map(|k| match self.axis() {
                Axis::Row => grid.row(k, order(self.toward_start())),
                Axis::Column => grid.column(order(self.toward_start()), k),
            })
            .collect()
    }
}

fn double(value: u32) -> u32 {
    value.saturating_mul(2)
}

/// Slide and merge one line toward its first cell.
///
/// Returns whether any cell of the line changed. An all-empty line is left as is.
pub fn move_line(grid: &mut Grid<u32>, line: &[Cell]) -> Result<bool, GridError> {
    let current = line
        .iter()
        .map(|&cell| grid.get(cell).map(|value| value.copied()))
        .collect::<Result<Vec<_>, _>>()?;

    let updated = compact_and_merge(current.iter().copied(), double);
    if updated.is_empty() {
        return Ok(false);
    }

    let mut changed = false;
    for (i, &cell) in line.iter().enumerate() {
        let next = updated.get(i).copied();
        if current[i] != next {
            grid.set(cell, next)?;
            changed = true;
        }
    }
    if changed {
        log::trace!("line starting at {} -> {:?}", line[0], updated);
    }
    Ok(changed)
}

/// Move every line of the grid in `direction`; true if anything changed.
pub fn move_values(grid: &mut Grid<u32>, direction: Direction) -> Result<bool, GridError> {
    let mut changed = false;
    for line in direction.lines(grid)? {
        // Every line is moved, even once a change has been seen.
        changed |= move_line(grid, &line)?;
    }
    Ok(changed)
}

/// True if two orthogonally adjacent cells hold equal values.
pub fn has_mergeable_pair(grid: &Grid<u32>) -> bool {
    let rows = grid.rows();
    let below = rows.iter().skip(1);
    let horizontal = rows
        .iter()
        .any(|row| row.windows(2).any(|pair| pair[0].is_some() && pair[0] == pair[1]));
    let vertical = rows.iter().zip(below).any(|(upper, lower)| {
        upper
            .iter()
            .zip(lower)
            .any(|(a, b)| a.is_some() && a == b)
    });
    horizontal || vertical
}
