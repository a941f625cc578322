use thiserror::Error;

/// Possible errors that arise from SymNMF, k-means or silhouette input data.
#[derive(Debug, Error)]
pub enum SymNmfError {
    /// The point set is empty, has mismatched dimensions, holds non-finite coordinates, or the
    /// requested number of clusters is outside `[1, n]`.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A point has zero total similarity to every other point, so `D^(-1/2)` is undefined.
    #[error("Degenerate similarity graph: point {index} has zero degree")]
    DegenerateGraph {
        /// Index of the isolated point.
        index: usize,
    },

    /// The shapes of W, H and k are inconsistent.
    #[error("Invalid factorization input: {0}")]
    InvalidFactorizationInput(String),

    /// A line of an input file could not be parsed as a point.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SymNmfError>;
