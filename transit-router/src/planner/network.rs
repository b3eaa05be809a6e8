//! Day and night graphs built from one dataset.

use std::sync::Arc;

use tracing::info;

use crate::dataset::Dataset;
use crate::domain::{ServiceCategory, Stop};
use crate::graph::{Graph, GraphError};

/// The two service graphs. Both hold every stop; they differ in which
/// lines contribute transit edges.
#[derive(Debug, Clone)]
pub struct Network {
    day: Graph,
    night: Graph,
}

impl Network {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, GraphError> {
        let day = Graph::new(dataset.stops.clone(), &dataset.lines, ServiceCategory::Day)?;
        let night = Graph::new(dataset.stops.clone(), &dataset.lines, ServiceCategory::Night)?;

        info!(
            stops = day.len(),
            day_edges = day.transit_edge_count(),
            night_edges = night.transit_edge_count(),
            "Built network"
        );

        Ok(Self { day, night })
    }

    pub fn graph(&self, service: ServiceCategory) -> &Graph {
        match service {
            ServiceCategory::Day => &self.day,
            ServiceCategory::Night => &self.night,
        }
    }

    pub fn graph_mut(&mut self, service: ServiceCategory) -> &mut Graph {
        match service {
            ServiceCategory::Day => &mut self.day,
            ServiceCategory::Night => &mut self.night,
        }
    }

    /// Stops of the network, in dataset order.
    pub fn stops(&self) -> &[Stop] {
        self.day.stops()
    }

    /// Snapshot of the ingested stops for lookups that run beside routing.
    ///
    /// Take it before any query scope is open, so no synthetic stop is
    /// captured.
    pub fn stop_directory(&self) -> StopDirectory {
        StopDirectory::new(self.stops())
    }
}

/// Immutable, shareable list of stops without their edges.
#[derive(Debug, Clone)]
pub struct StopDirectory {
    stops: Arc<[Stop]>,
}

impl StopDirectory {
    pub fn new(stops: &[Stop]) -> Self {
        let stops = stops
            .iter()
            .map(|s| Stop::new(s.code().clone(), s.name(), s.zone(), s.coordinate()))
            .collect();
        Self { stops }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Stops whose code or name contains `query`, ignoring case.
    ///
    /// Exact code matches come first, then code prefixes, then the rest;
    /// ties keep dataset order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Stop> {
        let query = query.trim().to_uppercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, &Stop)> = self
            .stops
            .iter()
            .filter_map(|stop| {
                let code = stop.code().as_str().to_uppercase();
                let rank = if code == query {
                    0
                } else if code.starts_with(&query) {
                    1
                } else if code.contains(&query) || stop.name().to_uppercase().contains(&query) {
                    2
                } else {
                    return None;
                };
                Some((rank, stop))
            })
            .collect();

        matches.sort_by_key(|(rank, _)| *rank);
        matches.into_iter().take(limit).map(|(_, s)| s).collect()
    }
}
