//! Error types for patmatch.

use thiserror::Error;

/// Result alias for patmatch operations.
pub type PatMatchResult<T> = std::result::Result<T, PatMatchError>;

/// Errors that can occur when learning a pattern or running a match.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatMatchError {
    /// The template image cannot be learned (empty, zero-area, or flat).
    #[error("invalid pattern: {reason}")]
    InvalidPattern {
        /// Why the template was rejected.
        reason: &'static str,
    },
    /// A match was requested before any pattern was learned.
    #[error("no pattern learned")]
    NotLearned,
    /// A match configuration field is outside its documented domain.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// Image dimensions are zero or overflow the addressable range.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },
    /// The row stride is smaller than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride {
        /// Image width in pixels.
        width: usize,
        /// Offending stride in elements.
        stride: usize,
    },
    /// The backing buffer is too small for the described image.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall {
        /// Minimum required length in elements.
        needed: usize,
        /// Actual buffer length.
        got: usize,
    },
}
