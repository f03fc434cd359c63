//! Errors raised by the grid world, the agent and the training loop.

use thiserror::Error;

use crate::environment::Pos;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Grid is too small to hold distinct start and target corners.
    #[error("grid size must be at least 2, got {size}")]
    InvalidSize { size: usize },

    /// Coordinate outside the `size x size` grid.
    #[error("position {pos} is outside a {size}x{size} grid")]
    OutOfBounds { pos: Pos, size: usize },

    #[error("unknown direction {0:?}")]
    UnknownDirection(String),

    /// A hyperparameter or training setting failed validation.
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
