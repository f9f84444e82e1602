//! Result and Error types for the utils module

/// Type alias for `Result<T, utils::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
/// The error type for `tofchop_utils`
pub enum Error {
    /// The slice of float values contains things like NAN or INFINITY
    SliceContainsUndefinedValues,

    /// A catch-all for functions returning errors that should be unreachable
    UncapturedErrorCondition,

    /// Value that is searched for outside of the min/max of the array
    ValueOutsideOfBounds {
        value: f64,
        lower_bound: f64,
        upper_bound: f64,
    },

    /// For when a slice has fewer than the minimum required values
    BelowMinimumSliceLength {
        length: usize,
        minimum_required: usize,
    },

    /// Interpolation nodes must be strictly increasing
    NotStrictlyIncreasing { index: usize },

    /// Paired x and y tables of different lengths
    MismatchedLengths { x: usize, y: usize },
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        match self {
            Self::NotStrictlyIncreasing { index } => {
                write!(fmt, "values are not strictly increasing at index {index}")
            }
            Self::MismatchedLengths { x, y } => {
                write!(fmt, "table lengths differ ({x} nodes, {y} values)")
            }
            Self::BelowMinimumSliceLength {
                length,
                minimum_required,
            } => write!(
                fmt,
                "{length} values found, at least {minimum_required} required"
            ),
            _ => write!(fmt, "{self:?}"),
        }
    }
}

// implement standard error trait to use with ? operator
impl std::error::Error for Error {}
