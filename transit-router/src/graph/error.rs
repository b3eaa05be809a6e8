//! Graph error types.

use crate::domain::{LineCode, StopCode};

/// Errors from building, mutating or searching a graph.
///
/// "No route" is not an error: searches return an empty path for it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A referenced stop code is not in the graph
    #[error("stop {0} not found")]
    StopNotFound(StopCode),

    /// Two stops share a code
    #[error("duplicate stop code {0}")]
    DuplicateStop(StopCode),

    /// A line visits a stop that was not ingested
    #[error("line {line} references unknown stop {stop}")]
    UnknownLineStop { line: LineCode, stop: StopCode },

    /// Negative line-change or zone bound
    #[error("invalid search constraint: {0}")]
    InvalidConstraint(String),

    /// Negative or non-finite walking distance
    #[error("invalid walking threshold: {0} m")]
    InvalidThreshold(f64),

    /// Predecessor links do not lead back to the origin
    #[error("predecessor chain from {0} does not reach the origin")]
    BrokenPath(StopCode),
}
