use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::initializer::DEFAULT_FOUR_PROBABILITY;

pub const DEFAULT_WIDTH: usize = 4;
pub const DEFAULT_WINNING_VALUE: u32 = 2048;
pub const MIN_WIDTH: usize = 2;

/// How `can_move` decides whether another move is possible.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveCheck {
    /// Any empty cell. A full board with a mergeable pair counts as stuck.
    #[default]
    EmptyCell,
    /// Any empty cell, or any two adjacent equal tiles.
    EmptyOrMerge,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_winning_value")]
    pub winning_value: u32,
    #[serde(default = "default_four_probability")]
    pub four_probability: f64,
    #[serde(default)]
    pub move_check: MoveCheck,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            width: default_width(),
            winning_value: default_winning_value(),
            four_probability: default_four_probability(),
            move_check: MoveCheck::default(),
        }
    }
}

impl GameConfig {
    pub fn with_width(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.width = self.width.max(MIN_WIDTH);
        self.winning_value = self.winning_value.max(2);
        self.four_probability = if self.four_probability.is_nan() {
            default_four_probability()
        } else {
            self.four_probability.clamp(0.0, 1.0)
        };
        self
    }

    pub fn load_json_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        serde_json::from_slice::<GameConfig>(&bytes)
            .map(GameConfig::sanitized)
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("failed parsing config {}: {e}", path.display()),
                )
            })
    }
}

fn default_version() -> u32 {
    1
}

fn default_width() -> usize {
    DEFAULT_WIDTH
}

fn default_winning_value() -> u32 {
    DEFAULT_WINNING_VALUE
}

fn default_four_probability() -> f64 {
    DEFAULT_FOUR_PROBABILITY
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("TWENTY48_CONFIG_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("twenty48");
        path.push("config.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load(&self) -> GameConfig {
        match GameConfig::load_json_file(&self.path) {
            Ok(config) => config,
            Err(err) if err.kind() == io::ErrorKind::NotFound => GameConfig::default(),
            Err(err) => {
                log::warn!("ignoring config: {err}");
                GameConfig::default()
            }
        }
    }

    pub fn save(&self, config: &GameConfig) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
