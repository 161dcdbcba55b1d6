use thiserror::Error;

/// Failures produced by geometric operations.
///
/// All of these are local, recoverable conditions: a bad corner or a
/// degenerate primitive should skip its edge or offset, never abort the
/// whole drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A required point is unset (NaN sentinel), checked before any mutation.
    #[error("operand contains an unset point")]
    InvalidOperand,

    /// Index-based lookup outside the valid range.
    #[error("index {0} is out of range")]
    NotFound(isize),

    /// Geometry too degenerate to operate on.
    #[error("degenerate geometry: {0}")]
    Degenerate(&'static str),

    /// The operation is not defined for this primitive kind.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}

/// Convenience alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
