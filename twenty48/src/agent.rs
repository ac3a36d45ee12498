use engine::GameLogic;
use serde::{Deserialize, Serialize};

use crate::board::Direction;
use crate::config::GameConfig;
use crate::game::{self, Game2048, GameError, GameStatus};
use crate::grid::Grid;
use crate::initializer::RandomTileInitializer;

/// One recorded frame: the board plus how many moves changed it so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Twenty48State {
    board: Grid<u32>,
    moves: u64,
    last_move_changed: bool,
}

impl Twenty48State {
    pub fn board(&self) -> &Grid<u32> {
        &self.board
    }

    /// Number of moves that changed the board.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn last_move_changed(&self) -> bool {
        self.last_move_changed
    }

    pub fn status(&self, config: &GameConfig) -> GameStatus {
        game::status_of(&self.board, config)
    }
}

/// Seeded 2048 rules for the headless runner.
///
/// Spawns are drawn from an RNG re-seeded from `(seed, moves)` on every step, so
/// states stay plain data and any recorded frame replays identically.
#[derive(Debug, Clone)]
pub struct Twenty48Logic {
    seed: u64,
    config: GameConfig,
}

impl Twenty48Logic {
    pub fn new(seed: u64, config: GameConfig) -> Result<Self, GameError> {
        game::validate_config(&config)?;
        Ok(Self { seed, config })
    }

    pub fn standard(seed: u64) -> Self {
        Self {
            seed,
            config: GameConfig::default(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn initializer_for(&self, moves: u64) -> RandomTileInitializer {
        RandomTileInitializer::seeded(spawn_seed(self.seed, moves))
            .with_four_probability(self.config.four_probability)
    }

    fn try_initial_state(&self) -> Result<Twenty48State, GameError> {
        let mut game = Game2048::new(self.config, self.initializer_for(0))?;
        game.initialize()?;
        Ok(Twenty48State {
            board: game.into_board(),
            moves: 0,
            last_move_changed: false,
        })
    }

    fn try_step(&self, state: &Twenty48State, direction: Direction) -> Result<Twenty48State, GameError> {
        let next_moves = state.moves + 1;
        let mut game = Game2048::from_board(
            self.config,
            state.board.clone(),
            self.initializer_for(next_moves),
        )?;
        let changed = game.process_move(direction)?;
        Ok(Twenty48State {
            board: game.into_board(),
            moves: if changed { next_moves } else { state.moves },
            last_move_changed: changed,
        })
    }
}

fn spawn_seed(seed: u64, moves: u64) -> u64 {
    seed ^ moves.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(29)
}

impl GameLogic for Twenty48Logic {
    type State = Twenty48State;
    type Input = Direction;

    fn initial_state(&self) -> Self::State {
        self.try_initial_state().unwrap_or_else(|err| {
            log::error!("could not start game: {err}");
            Twenty48State {
                board: Grid::new(self.config.width),
                moves: 0,
                last_move_changed: false,
            }
        })
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        self.try_step(state, input).unwrap_or_else(|err| {
            log::error!("move {input:?} rejected: {err}");
            Twenty48State {
                last_move_changed: false,
                ..state.clone()
            }
        })
    }
}
