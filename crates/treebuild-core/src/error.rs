use thiserror::Error;

/// Configuration-time failures of puzzle generation.
///
/// The depth-bound retry loop is not represented here; exceeding the bound
/// is the expected rejection condition and is handled internally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GenerateError {
    /// More distinct values requested than the value domain holds
    #[error("cannot draw {requested} distinct values from [1, {bound}]")]
    ConstraintUnsatisfiable { requested: usize, bound: usize },

    /// More nodes requested than a depth-bounded tree can hold
    #[error("{requested} nodes cannot fit in a depth-{max_depth} tree ({capacity} slots)")]
    DepthUnsatisfiable {
        requested: usize,
        max_depth: usize,
        capacity: usize,
    },
}

/// Caller misuse of a place operation. The board is left unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    #[error("board slot {0} is already occupied")]
    AlreadyOccupied(usize),
    #[error("board slot {0} is not part of this puzzle")]
    InvalidSlot(usize),
    #[error("piece {0} is not in the unplaced pool")]
    PieceUnavailable(usize),
    #[error("no puzzle is in progress")]
    NotPlaying,
}

/// Caller misuse of a clear operation. The board is left unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClearError {
    #[error("board slot {0} is already empty")]
    AlreadyEmpty(usize),
    #[error("board slot {0} is not part of this puzzle")]
    InvalidSlot(usize),
    #[error("no puzzle is in progress")]
    NotPlaying,
}
