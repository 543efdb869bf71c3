//! Error type shared by every stage of the weeding pass.

use std::path::PathBuf;

/// Failures that abort a weeding run.
///
/// An empty candidate set is deliberately absent: every stage treats
/// `N = 0` as a no-op that yields an empty mask.
#[derive(Debug, thiserror::Error)]
pub enum WeedError {
    /// The auxiliary edge file does not exist.
    #[error("{} not found", path.display())]
    MissingInputFile { path: PathBuf },

    /// The edge file exists but could not be parsed.
    #[error("malformed edge file at line {line}: {reason}")]
    MalformedEdgeFile { line: usize, reason: String },

    /// A per-candidate attribute has a different length than the grid positions.
    #[error("candidate attribute `{field}` has {found} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// Coherence is the sole selection criterion and must be finite.
    #[error("candidate {index} has non-finite coherence")]
    NonFiniteCoherence { index: usize },

    /// A neighbourhood window fell outside the grid index.
    ///
    /// Unreachable while the 2-cell margin is applied; reaching it is a bug.
    #[error("grid access ({row}, {col}) outside {rows}x{cols} index")]
    GridOutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    /// The grid extent spanned by the candidates cannot be allocated.
    #[error("grid index of {rows}x{cols} cells is too large")]
    GridTooLarge { rows: usize, cols: usize },

    /// The noise-based drop pass was requested but has no implementation.
    #[error(
        "noise weeding is not implemented (standard_dev={standard_dev:?}, max_noise={max_noise:?})"
    )]
    UnimplementedNoiseFilter {
        standard_dev: Option<f64>,
        max_noise: Option<f64>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
