//! Result type alias for Concord operations

use super::errors::ConcordError;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ConcordError>;
