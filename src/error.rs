//! Errors reported by the checked sort entry points.

use std::fmt;

/// Reasons a sort request is rejected before any element is moved.
///
/// The engine itself never fails once it started. Everything here is detected up front, either
/// while validating the arguments or while reserving the scratch buffer of the parallel layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// `low` is greater than `high`.
    InvalidRange { low: usize, high: usize },

    /// `high` lies past the end of the slice.
    OutOfBounds { high: usize, len: usize },

    /// A parallelism allowance of zero was requested, the minimum is 1.
    InvalidParallelism,

    /// The scratch buffer used for parallel merging could not be allocated.
    ScratchAllocation { requested: usize },
}

impl SortError {
    /// Checks `low..high` against a slice of length `len` and the parallelism allowance.
    pub(crate) fn check(len: usize, parallelism: usize, low: usize, high: usize) -> Result<(), Self> {
        if low > high {
            return Err(SortError::InvalidRange { low, high });
        }

        if high > len {
            return Err(SortError::OutOfBounds { high, len });
        }

        if parallelism == 0 {
            return Err(SortError::InvalidParallelism);
        }

        Ok(())
    }
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::InvalidRange { low, high } => {
                write!(f, "range start index {low} is greater than end index {high}")
            }
            SortError::OutOfBounds { high, len } => {
                write!(f, "range end index {high} out of range for slice of length {len}")
            }
            SortError::InvalidParallelism => {
                write!(f, "parallelism must be at least 1")
            }
            SortError::ScratchAllocation { requested } => {
                write!(f, "failed to allocate scratch buffer of {requested} elements")
            }
        }
    }
}

impl std::error::Error for SortError {}
