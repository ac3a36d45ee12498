pub mod agent;
pub mod board;
pub mod config;
pub mod game;
pub mod grid;
pub mod initializer;
pub mod line;
pub mod render;

pub use board::Direction;
pub use config::{GameConfig, MoveCheck};
pub use game::{Game2048, GameError, GameStatus};
pub use grid::{Cell, Grid, GridError};
pub use initializer::{RandomTileInitializer, TileInitializer};
