//! Route planning error types.

use crate::domain::{Coordinate, InvalidCode};
use crate::graph::GraphError;

/// Errors that can occur while planning a route.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The graph rejected an operation (unknown stop, bad bound, ...)
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Requested walking threshold is negative, not finite, or too large
    #[error("walking threshold must be between 0 and {max} m (got {threshold})")]
    InvalidThreshold { threshold: f64, max: f64 },

    /// A map point endpoint lies outside valid latitude/longitude ranges
    #[error("coordinate {0} is out of range")]
    InvalidCoordinate(Coordinate),

    /// A code could not be built for an endpoint
    #[error(transparent)]
    InvalidCode(#[from] InvalidCode),
}
