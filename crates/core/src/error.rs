//! Error types for board construction and configuration.
//!
//! Play itself never fails: illegal moves are reported as `false` or ignored.
//! Only setting a board up can go wrong.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Faces share their edge columns, so a face needs at least two.
    #[error("side width {side_width} is too narrow (need at least 2)")]
    SideTooNarrow { side_width: usize },

    #[error("board height must be at least 1")]
    ZeroHeight,

    #[error("fall interval must be at least 1ms")]
    ZeroFallInterval,

    #[error("slide sensitivity {0} is outside (0, 1]")]
    InvalidSlideSensitivity(f32),

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
