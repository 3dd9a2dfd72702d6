//! Error types surfaced by the world crate.

use labyrinth_core::{AgentRole, Position};
use thiserror::Error;

/// Errors produced while building or querying a [`Grid`](crate::Grid).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// A lookup addressed a cell outside `[0, width) x [0, height)`.
    #[error("position ({}, {}) lies outside the grid", .position.x(), .position.y())]
    OutOfBounds {
        /// Offending position.
        position: Position,
    },

    /// A row does not match the width established by the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Zero-based row index.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Number of tiles found on the offending row.
        found: usize,
    },

    /// A token in the grid source is not a non-negative integer.
    #[error("invalid tile code {token:?} at line {line}, column {column}")]
    InvalidToken {
        /// One-based line number.
        line: usize,
        /// One-based token index within the line.
        column: usize,
        /// Token as it appeared in the source.
        token: String,
    },

    /// The grid dimensions do not fit the coordinate space.
    #[error("grid of {width}x{height} tiles exceeds the supported size")]
    TooLarge {
        /// Number of columns requested.
        width: usize,
        /// Number of rows requested.
        height: usize,
    },
}

/// Errors produced while assembling a [`World`](crate::World).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    /// An agent's starting cell lies outside the grid.
    #[error(
        "{role:?} start ({}, {}) lies outside the {width}x{height} grid",
        .position.x(),
        .position.y()
    )]
    OutOfBounds {
        /// Agent whose start position was rejected.
        role: AgentRole,
        /// Rejected start position.
        position: Position,
        /// Grid width in tiles.
        width: u32,
        /// Grid height in tiles.
        height: u32,
    },

    /// An agent's starting cell is not a free tile.
    #[error("{role:?} start ({}, {}) is not a free tile", .position.x(), .position.y())]
    Blocked {
        /// Agent whose start position was rejected.
        role: AgentRole,
        /// Rejected start position.
        position: Position,
    },
}
