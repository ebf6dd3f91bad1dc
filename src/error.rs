//! Error types for grid resampling and partial containers.

use thiserror::Error;

/// Result type for partial_grid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A component was built with unusable settings; no work was started.
    Configuration,
    /// The caller broke an operation's contract; caller data is untouched.
    Precondition,
}

/// Errors that can occur while building resamplers or restructuring lists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Resampling interval was zero, negative or not finite.
    #[error("resampler interval must be positive, got {interval} seconds")]
    InvalidInterval {
        /// The rejected interval.
        interval: f64,
    },

    /// Warped resampling needs at least one timing control point.
    #[error("timing envelope has no control points")]
    EmptyTimingEnvelope,

    /// Index range does not lie within the list.
    #[error("invalid range {start}..{end} for list of {len} partials")]
    InvalidRange {
        /// Requested range start.
        start: usize,
        /// Requested range end (exclusive).
        end: usize,
        /// Length of the list the range was applied to.
        len: usize,
    },

    /// Dereferenced a copy-on-write handle that holds no value.
    #[error("unbound copy-on-write handle")]
    NullReference,
}

impl Error {
    /// Creates an invalid range error.
    pub fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange { start, end, len }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidInterval { .. } => ErrorCategory::Configuration,
            Error::EmptyTimingEnvelope | Error::InvalidRange { .. } | Error::NullReference => {
                ErrorCategory::Precondition
            }
        }
    }

    /// True for caller contract violations (as opposed to bad configuration).
    pub fn is_precondition(&self) -> bool {
        self.category() == ErrorCategory::Precondition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_error_is_configuration() {
        let err = Error::InvalidInterval { interval: -1.0 };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_precondition());
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn range_helper_formats_bounds() {
        let err = Error::invalid_range(3, 1, 2);
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "invalid range 3..1 for list of 2 partials");
    }

    #[test]
    fn null_reference_is_precondition() {
        assert!(Error::NullReference.is_precondition());
        assert!(Error::EmptyTimingEnvelope.is_precondition());
    }
}
