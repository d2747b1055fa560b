//! Resolution error types.

use thiserror::Error;

use crate::coord::CoordError;

/// Errors raised while resolving a target. Resolution is all-or-nothing:
/// on error no tiles are returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The target geometry is out of range, empty, or self-contradictory.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// No boundary polygon is known for the country code.
    #[error("no boundary data for country '{0}'")]
    UnsupportedCountry(String),
}

impl From<CoordError> for ResolveError {
    fn from(e: CoordError) -> Self {
        ResolveError::InvalidTarget(e.to_string())
    }
}
