use crate::Shape;

/// Convenience alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The ways an operation's preconditions can be violated.
///
/// Errors are detected synchronously at the violated precondition and propagate
/// unmodified to the caller; the library never catches, retries, or substitutes
/// default values. A failed in-place operation makes no atomicity guarantee
/// beyond what it had already written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Two operands' shapes are incompatible for the requested operation.
    ///
    /// This includes non-square input to operations that require a square
    /// matrix, in which case `right` is the square shape that was expected.
    #[error("dimension mismatch: {left} vs. {right}")]
    DimensionMismatch {
        /// Shape of the receiver (or left operand).
        left: Shape,
        /// Shape of the argument, or the shape the operation expected.
        right: Shape,
    },

    /// Attempted to invert a matrix whose determinant is zero.
    #[error("cannot invert a singular matrix")]
    Singular,

    /// A numeric parameter is degenerate for the operation's geometry, such as
    /// a zero-length rotation axis or a projection with `right == left`.
    #[error("{op}: {what}")]
    RangeInvalid {
        op: &'static str,
        what: &'static str,
    },

    /// An argument is structurally unusable, such as an out-of-bounds index.
    #[error("{op}: {what}")]
    InvalidArgument {
        op: &'static str,
        what: &'static str,
    },
}

impl Error {
    /// Replaces the operation name carried by the error, keeping its kind.
    ///
    /// The `rotate`/`translate`/`scale_*` wrappers use this so that an error
    /// raised by the underlying `as_*` builder reports the wrapper's name.
    pub(crate) fn with_op(self, op: &'static str) -> Self {
        match self {
            Self::RangeInvalid { what, .. } => Self::RangeInvalid { op, what },
            Self::InvalidArgument { what, .. } => Self::InvalidArgument { op, what },
            other => other,
        }
    }
}
