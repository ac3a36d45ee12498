use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid position. Rows and columns are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds { row: usize, col: usize, width: usize },
    WidthMismatch { expected: usize, actual: usize },
    CellCount { width: usize, actual: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds { row, col, width } => write!(
                f,
                "cell ({row}, {col}) is outside a {width}x{width} grid"
            ),
            GridError::WidthMismatch { expected, actual } => {
                write!(f, "expected a grid of width {expected}, got {actual}")
            }
            GridError::CellCount { width, actual } => {
                write!(f, "a grid of width {width} cannot hold {actual} cells")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Deserialize)]
struct RawGrid<T> {
    width: usize,
    cells: Vec<Option<T>>,
}

impl<T> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = GridError;

    fn try_from(raw: RawGrid<T>) -> Result<Self, Self::Error> {
        // An untrusted width can overflow the cell count.
        if raw.width.checked_mul(raw.width) != Some(raw.cells.len()) {
            return Err(GridError::CellCount {
                width: raw.width,
                actual: raw.cells.len(),
            });
        }
        Ok(Self {
            width: raw.width,
            cells: raw.cells,
        })
    }
}

/// Square grid of optional values, stored densely in row-major order.
///
/// The width is fixed at construction. Every accessor validates its cell, so a
/// coordinate outside `1..=width` yields [`GridError::OutOfBounds`] instead of
/// aliasing another position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
pub struct Grid<T> {
    width: usize,
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    pub fn new(width: usize) -> Self {
        let mut cells = Vec::with_capacity(width * width);
        cells.resize_with(width * width, || None);
        Self { width, cells }
    }

    /// Build a grid from row-major rows; every row must be as long as there are rows.
    pub fn from_rows(rows: Vec<Vec<Option<T>>>) -> Result<Self, GridError> {
        let width = rows.len();
        let mut cells = Vec::with_capacity(width * width);
        for row in rows {
            if row.len() != width {
                return Err(GridError::WidthMismatch {
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }
        Ok(Self { width, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, GridError> {
        let cell = Cell::new(row, col);
        self.index(cell)?;
        Ok(cell)
    }

    fn index(&self, cell: Cell) -> Result<usize, GridError> {
        let in_range = |v: usize| (1..=self.width).contains(&v);
        if in_range(cell.row) && in_range(cell.col) {
            Ok((cell.row - 1) * self.width + (cell.col - 1))
        } else {
            Err(GridError::OutOfBounds {
                row: cell.row,
                col: cell.col,
                width: self.width,
            })
        }
    }

    pub fn get(&self, cell: Cell) -> Result<Option<&T>, GridError> {
        let idx = self.index(cell)?;
        Ok(self.cells[idx].as_ref())
    }

    pub fn set(&mut self, cell: Cell, value: Option<T>) -> Result<(), GridError> {
        let idx = self.index(cell)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        (1..=width).flat_map(move |row| (1..=width).map(move |col| Cell::new(row, col)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<&T>)> + '_ {
        self.cells().zip(self.cells.iter().map(Option::as_ref))
    }

    /// Cells of row `row`, in the order the column indices are given.
    pub fn row(
        &self,
        row: usize,
        cols: impl IntoIterator<Item = usize>,
    ) -> Result<Vec<Cell>, GridError> {
        cols.into_iter().map(|col| self.cell(row, col)).collect()
    }

    /// Cells of column `col`, in the order the row indices are given.
    pub fn column(
        &self,
        rows: impl IntoIterator<Item = usize>,
        col: usize,
    ) -> Result<Vec<Cell>, GridError> {
        rows.into_iter().map(|row| self.cell(row, col)).collect()
    }

    pub fn any(&self, mut predicate: impl FnMut(Option<&T>) -> bool) -> bool {
        self.cells.iter().any(|value| predicate(value.as_ref()))
    }

    pub fn empty_cells(&self) -> Vec<Cell> {
        self.iter()
            .filter(|(_, value)| value.is_none())
            .map(|(cell, _)| cell)
            .collect()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|value| value.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl<T: Clone> Grid<T> {
    pub fn rows(&self) -> Vec<Vec<Option<T>>> {
        if self.width == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.width).map(<[_]>::to_vec).collect()
    }
}
