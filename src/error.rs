//! Error types for polygon tessellation

use std::fmt;

/// Errors that can occur while configuring, tessellating or unpacking a polygon
///
/// Degenerate input (too few usable positions, rings collapsing after
/// duplicate removal) is not an error: `create_geometry` reports it as
/// `Ok(None)`.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonError {
    /// Missing or contradictory construction options
    InvalidArgument(String),
    /// A packed parameter buffer could not be decoded
    InvalidPackedData(String),
}

impl fmt::Display for PolygonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolygonError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            PolygonError::InvalidPackedData(msg) => write!(f, "invalid packed data: {}", msg),
        }
    }
}

impl std::error::Error for PolygonError {}

/// Result type alias for polygon operations
pub type Result<T> = std::result::Result<T, PolygonError>;
