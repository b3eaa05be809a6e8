//! Temporary graph changes for a single query.

use tracing::{debug, warn};

use crate::domain::{Stop, StopCode};
use crate::graph::{Graph, GraphError};

/// Exclusive borrow of a graph with synthetic stops injected.
///
/// Opening the scope adds the stops and connects walking edges at the
/// query's threshold in a single rebuild, skipped entirely when nothing is
/// added and the threshold is unchanged. Dropping it removes the stops
/// again, on every exit path, so the graph never keeps a previous query's
/// endpoints.
#[derive(Debug)]
pub struct QueryScope<'g> {
    graph: &'g mut Graph,
    injected: Vec<StopCode>,
}

impl<'g> QueryScope<'g> {
    /// Injects `synthetic` into `graph` and connects walking edges.
    ///
    /// On error the graph is left unchanged.
    pub fn open(
        graph: &'g mut Graph,
        synthetic: Vec<Stop>,
        walking_threshold: f64,
    ) -> Result<Self, GraphError> {
        let injected: Vec<StopCode> = synthetic.iter().map(|s| s.code().clone()).collect();
        graph.add_stops_within(synthetic, walking_threshold)?;

        debug!(
            category = %graph.category(),
            injected = injected.len(),
            walking_threshold,
            walking_refreshes = graph.walking_refreshes(),
            "Opened query scope"
        );
        Ok(Self { graph, injected })
    }

    pub fn graph(&self) -> &Graph {
        self.graph
    }
}

impl Drop for QueryScope<'_> {
    fn drop(&mut self) {
        if self.injected.is_empty() {
            return;
        }
        match self.graph.remove_stops(&self.injected) {
            Ok(()) => debug!(removed = self.injected.len(), "Closed query scope"),
            Err(e) => warn!(error = %e, "Failed to remove synthetic stops"),
        }
    }
}
