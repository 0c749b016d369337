//! Error types for diagram construction

use thiserror::Error;

/// Errors that can occur while configuring or building a diagram
///
/// Degenerate geometry (parallel bisectors, coincident sites) is not an
/// error: it is handled inside the sweep and surfaces as skipped events or
/// empty regions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The clipping rectangle is unusable
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),
    /// An input site has a NaN or infinite coordinate
    #[error("site {index} has a non-finite coordinate ({x}, {y})")]
    NonFiniteSite {
        /// Position of the offending site in the input
        index: usize,
        /// X coordinate as given
        x: f64,
        /// Y coordinate as given
        y: f64,
    },
    /// The site registry was consumed before it was sorted
    #[error("sites have not been sorted")]
    SitesNotSorted,
}

/// Result type alias for diagram operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
