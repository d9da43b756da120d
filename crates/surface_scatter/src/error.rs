//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Only configuration problems and refused starts are errors; rejected candidates
//! are reported as [`crate::scatter::RejectionReason`] values instead.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot start generation: {0}")]
    CannotStart(#[from] StartBlocker),

    #[error("generation is in progress")]
    Busy,
}

/// Precondition that keeps a generation run from starting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartBlocker {
    #[error("no variants configured")]
    NoVariants,

    #[error("surface mask is empty")]
    NoSurfaceMask,
}
