use crate::location::Coord;

/// Failures surfaced by level generation and configuration.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Every attempt at carving a path from entry to exit failed.
    #[error("could not carve a solution path after {attempts} attempts")]
    GenerationExhausted {
        /// The attempt cap that was reached.
        attempts: usize,
    },
    /// A grid needs at least one row and one column.
    #[error("a grid of {rows}x{cols} has no cells")]
    EmptyGrid {
        /// Requested row count.
        rows: Coord,
        /// Requested column count.
        cols: Coord,
    },
    /// A setting outside what generation accepts, e.g. a zero attempt cap.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
