//! Error taxonomy for the physics engine.

use thiserror::Error;

/// Errors surfaced by the physics engine.
///
/// Construction and parameter assignment are the only fallible paths; the
/// simulation itself is skip-don't-panic and never returns an error.
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A parameter was outside its valid range (e.g. non-positive or
    /// non-finite mass).
    #[error("{0}")]
    InvalidParameter(String),
}
