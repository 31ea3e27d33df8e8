use thiserror::Error;

/// All errors returned by `densela-core`.
///
/// Every variant is a contract violation by the caller or the input data.
/// Nothing here is transient: algorithms stop at the first error and do not
/// retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// Operand shapes violate the operation's precondition.
    #[error("shape mismatch in {op}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// A `(row, col)` access lies outside the matrix.
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A matrix shape is not allowed (zero rows or columns).
    #[error("invalid shape {rows}x{cols}: {reason}")]
    InvalidShape {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    /// A flat value sequence does not have `rows * cols` entries.
    #[error("expected {expected} values, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Acquire on a scratch pool with no matrices left.
    #[error("scratch pool of {rows}x{cols} matrices exhausted (depth {depth})")]
    StackUnderflow {
        rows: usize,
        cols: usize,
        depth: usize,
    },

    /// Release on a scratch pool that is already full.
    #[error("scratch pool of {rows}x{cols} matrices already full (depth {depth})")]
    StackOverflow {
        rows: usize,
        cols: usize,
        depth: usize,
    },

    /// Near-zero pivot or diagonal with a nonzero residual.
    #[error(
        "singular system: pivot at ({row}, {col}) is {pivot:e} but residual is {residual:e}"
    )]
    SingularSystem {
        row: usize,
        col: usize,
        pivot: f64,
        residual: f64,
    },
}

/// Convenience alias used throughout `densela-core`.
pub type Result<T> = std::result::Result<T, LinalgError>;
