use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the callgrid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced at the edges of the grid core.
///
/// Layout, reconciliation and drag handling never fail; these cover input
/// validation and the I/O performed by sinks and drivers.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid container bounds {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
    #[error("pointer driver error: {0}")]
    Driver(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
