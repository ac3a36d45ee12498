use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{self, Direction};
use crate::config::{GameConfig, MIN_WIDTH, MoveCheck};
use crate::grid::{Cell, Grid, GridError};
use crate::initializer::TileInitializer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    Grid(GridError),
    InvalidConfig(String),
    InvalidTile { cell: Cell, value: u32 },
}

/// Smallest value a populated cell may hold.
pub const MIN_TILE: u32 = 2;

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Grid(err) => write!(f, "grid error: {err}"),
            GameError::InvalidConfig(reason) => write!(f, "invalid game config: {reason}"),
            GameError::InvalidTile { cell, value } => {
                write!(f, "tile {value} at {cell} is below the minimum of {MIN_TILE}")
            }
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Grid(err) => Some(err),
            GameError::InvalidConfig(_) | GameError::InvalidTile { .. } => None,
        }
    }
}

impl From<GridError> for GameError {
    fn from(err: GridError) -> Self {
        GameError::Grid(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Uninitialized,
    InProgress,
    Won,
    Stuck,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Stuck)
    }
}

pub(crate) fn validate_config(config: &GameConfig) -> Result<(), GameError> {
    if config.width < MIN_WIDTH {
        return Err(GameError::InvalidConfig(format!(
            "width {} is below the minimum of {MIN_WIDTH}",
            config.width
        )));
    }
    if config.winning_value < 2 {
        return Err(GameError::InvalidConfig(format!(
            "winning value {} can never appear on the board",
            config.winning_value
        )));
    }
    Ok(())
}

/// Owns the board for one game session and applies moves to it.
#[derive(Debug, Clone)]
pub struct Game2048<I> {
    board: Grid<u32>,
    initializer: I,
    config: GameConfig,
    initialized: bool,
}

impl<I: TileInitializer> Game2048<I> {
    pub fn new(config: GameConfig, initializer: I) -> Result<Self, GameError> {
        validate_config(&config)?;
        Ok(Self {
            board: Grid::new(config.width),
            initializer,
            config,
            initialized: false,
        })
    }

    /// Continue a game from an existing board. The board counts as initialized.
    pub fn from_board(
        config: GameConfig,
        board: Grid<u32>,
        initializer: I,
    ) -> Result<Self, GameError> {
        validate_config(&config)?;
        if board.width() != config.width {
            return Err(GridError::WidthMismatch {
                expected: config.width,
                actual: board.width(),
            }
            .into());
        }
        if let Some((cell, &value)) = board
            .iter()
            .find_map(|(cell, value)| value.filter(|&&v| v < MIN_TILE).map(|v| (cell, v)))
        {
            return Err(GameError::InvalidTile { cell, value });
        }
        Ok(Self {
            board,
            initializer,
            config,
            initialized: true,
        })
    }

    /// Seed the board with its two starting tiles.
    pub fn initialize(&mut self) -> Result<(), GameError> {
        for _ in 0..2 {
            self.add_new_value()?;
        }
        self.initialized = true;
        log::debug!("initialized {}x{} board", self.config.width, self.config.width);
        Ok(())
    }

    /// Apply a move; a tile is spawned only if the board changed.
    pub fn process_move(&mut self, direction: Direction) -> Result<bool, GameError> {
        let changed = board::move_values(&mut self.board, direction)?;
        if changed {
            self.add_new_value()?;
        }
        log::debug!("move {direction:?}: changed={changed}");
        Ok(changed)
    }

    fn add_new_value(&mut self) -> Result<(), GameError> {
        match self.initializer.next_value(&self.board) {
            Some((cell, value)) => {
                self.board.set(cell, Some(value))?;
                log::trace!("spawned {value} at {cell}");
            }
            None if self.board.is_full() => log::debug!("no empty cell to spawn into"),
            None => log::warn!(
                "initializer returned no cell with {} empty cells",
                self.board.empty_cells().len()
            ),
        }
        Ok(())
    }

    pub fn into_board(self) -> Grid<u32> {
        self.board
    }
}

/// True if another move may be possible on `board`.
///
/// With [`MoveCheck::EmptyCell`] a full board is always reported as stuck,
/// even when two adjacent tiles could still merge.
pub fn can_move_on(board: &Grid<u32>, move_check: MoveCheck) -> bool {
    if board.any(|value| value.is_none()) {
        return true;
    }
    match move_check {
        MoveCheck::EmptyCell => false,
        MoveCheck::EmptyOrMerge => board::has_mergeable_pair(board),
    }
}

pub fn has_won_on(board: &Grid<u32>, winning_value: u32) -> bool {
    board.any(|value| value == Some(&winning_value))
}

pub fn status_of(board: &Grid<u32>, config: &GameConfig) -> GameStatus {
    if has_won_on(board, config.winning_value) {
        GameStatus::Won
    } else if !can_move_on(board, config.move_check) {
        GameStatus::Stuck
    } else {
        GameStatus::InProgress
    }
}

impl<I> Game2048<I> {
    pub fn can_move(&self) -> bool {
        can_move_on(&self.board, self.config.move_check)
    }

    pub fn has_won(&self) -> bool {
        has_won_on(&self.board, self.config.winning_value)
    }

    pub fn status(&self) -> GameStatus {
        if self.initialized {
            status_of(&self.board, &self.config)
        } else {
            GameStatus::Uninitialized
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<u32>, GridError> {
        let cell = self.board.cell(row, col)?;
        Ok(self.board.get(cell)?.copied())
    }

    pub fn board(&self) -> &Grid<u32> {
        &self.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn initializer(&self) -> &I {
        &self.initializer
    }

    pub fn max_tile(&self) -> Option<u32> {
        self.board.iter().filter_map(|(_, value)| value.copied()).max()
    }
}
