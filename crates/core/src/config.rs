//! Board configuration
//!
//! Defaults come from the `cubetris-types` constants. A config can be read
//! from JSON, and `from_env` layers `CUBETRIS_*` variables on top of an
//! optional JSON file.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BoardDims;
use crate::piece::PieceTiming;
use crate::types::{
    BOARD_SPIN_MS, DEFAULT_BOARD_HEIGHT, DEFAULT_FALL_MS, DEFAULT_SIDE_WIDTH, DROP_FALL_MS,
    MAX_EJECTED_CUBES, SLIDE_SENSITIVITY,
};

/// Path of a JSON config file loaded before the other variables.
pub const ENV_CONFIG: &str = "CUBETRIS_CONFIG";
pub const ENV_SIDE_WIDTH: &str = "CUBETRIS_SIDE_WIDTH";
pub const ENV_BOARD_HEIGHT: &str = "CUBETRIS_BOARD_HEIGHT";
pub const ENV_SEED: &str = "CUBETRIS_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub side_width: usize,
    pub board_height: usize,
    pub seed: u32,
    pub fall_ms: u32,
    pub drop_fall_ms: u32,
    pub slide_sensitivity: f32,
    pub spin_ms: u32,
    pub max_ejected: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            side_width: DEFAULT_SIDE_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            seed: 1,
            fall_ms: DEFAULT_FALL_MS,
            drop_fall_ms: DROP_FALL_MS,
            slide_sensitivity: SLIDE_SENSITIVITY,
            spin_ms: BOARD_SPIN_MS,
            max_ejected: MAX_EJECTED_CUBES,
        }
    }
}

impl BoardConfig {
    /// Board of the given shape with default tuning.
    pub fn with_dims(side_width: usize, board_height: usize) -> Self {
        Self {
            side_width,
            board_height,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(value) = lookup(ENV_SIDE_WIDTH) {
            config.side_width = parse_var(ENV_SIDE_WIDTH, value)?;
        }
        if let Some(value) = lookup(ENV_BOARD_HEIGHT) {
            config.board_height = parse_var(ENV_BOARD_HEIGHT, value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            config.seed = parse_var(ENV_SEED, value)?;
        }
        Ok(config)
    }

    /// Check every field and return the board dimensions.
    pub fn validate(&self) -> Result<BoardDims> {
        let dims = BoardDims::new(self.side_width, self.board_height)?;
        if self.fall_ms == 0 || self.drop_fall_ms == 0 || self.spin_ms == 0 {
            return Err(Error::ZeroFallInterval);
        }
        if !(self.slide_sensitivity > 0.0 && self.slide_sensitivity <= 1.0) {
            return Err(Error::InvalidSlideSensitivity(self.slide_sensitivity));
        }
        Ok(dims)
    }

    pub fn piece_timing(&self) -> PieceTiming {
        PieceTiming {
            fall_ms: self.fall_ms,
            drop_fall_ms: self.drop_fall_ms,
            slide_sensitivity: self.slide_sensitivity,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: String) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidEnv { name, value })
}
