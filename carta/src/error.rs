//! Error type for the crate.

use thiserror::Error;

/// Error that can occur when constructing carta types.
///
/// The view itself is infallible: out-of-range camera parameters are
/// clamped, never rejected. Only explicit construction of auxiliary types
/// can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartaError {
    /// A stops curve was given no frames to interpolate between.
    #[error("a stops curve requires at least one frame")]
    EmptyStops,
}
