use thiserror::Error;

/// Result alias for `symnmf`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering engines, the similarity pipeline and
/// the point reader.
#[derive(Debug, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Points (or matrix rows) have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    #[error("shape mismatch: expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// Requested cluster count is outside `(1, n)`.
    #[error("cannot create {requested} clusters from {n_items} items")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A row of the similarity matrix sums to zero, so `D^{-1/2}` is undefined.
    #[error("zero degree at row {index}: point has no similarity to any other point")]
    ZeroDegree {
        /// Row (point) index.
        index: usize,
    },

    /// A matrix that must be non-negative has a negative entry.
    #[error("negative entry {value} at ({row}, {col})")]
    NegativeEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Offending value.
        value: f64,
    },

    /// NaN or infinity reached the numeric core.
    #[error("non-finite value at ({row}, {col})")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// Could not reserve memory for a dense buffer.
    #[error("failed to allocate {elements} matrix elements")]
    Allocation {
        /// Number of `f64` elements requested.
        elements: usize,
    },

    /// A malformed input row.
    #[error("line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with the row.
        reason: crate::io::ParseIssue,
    },

    /// Labels contain fewer than two distinct clusters.
    #[error("need at least 2 distinct labels, found {distinct}")]
    DegenerateLabels {
        /// Distinct labels present.
        distinct: usize,
    },

    /// Underlying reader failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
