//! Application state for the web layer.

use std::sync::{Arc, Mutex};

use crate::planner::{Planner, StopDirectory};

/// Shared application state.
///
/// Routing mutates the planner's graphs for the duration of a query, so
/// route requests take turns on one lock. Stop search reads a snapshot
/// taken at startup and never touches that lock.
#[derive(Clone)]
pub struct AppState {
    /// Route planner over the loaded network
    pub planner: Arc<Mutex<Planner>>,
    /// Ingested stops for search
    pub stops: StopDirectory,
}

impl AppState {
    /// Create a new app state.
    pub fn new(planner: Planner) -> Self {
        let stops = planner.network().stop_directory();
        Self {
            planner: Arc::new(Mutex::new(planner)),
            stops,
        }
    }
}
