//! Domain types for the transit router.
//!
//! This module contains the network model shared by ingestion, the graph and
//! the planner: stop and line identities, coordinates, stops with their
//! adjacency, and line records. Identity types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod coordinate;
mod line;
mod stop;
mod stop_code;

pub use coordinate::{Coordinate, EARTH_RADIUS_M};
pub use line::{Line, NIGHT_SUFFIX, ServiceCategory};
pub use stop::{Edge, EdgeLabel, Stop, WALK_ZONE};
pub use stop_code::{InvalidCode, LineCode, StopCode};
