//! Transit graph and route searches.
//!
//! A [`Graph`] owns the stops of one service category (day or night). Transit
//! edges come from consecutive stops of that category's lines and are fixed at
//! construction; walking edges join every pair of stops within a distance
//! threshold and are recomputed whenever the threshold or the stop set
//! changes. Edges name their target by [`StopCode`], resolved through the
//! graph's index, so inserting or removing stops never leaves an edge
//! pointing at moved memory.
//!
//! Two searches run over the combined adjacency:
//! - [`Graph::constrained_shortest_path`]: Dijkstra bounded by line runs and
//!   fare zones
//! - [`Graph::fewest_hops`]: breadth-first search ignoring weights

mod bfs;
mod dijkstra;
mod error;
mod path;
mod search_state;
mod walking;


use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Edge, EdgeLabel, Line, ServiceCategory, Stop, StopCode};

pub use dijkstra::SearchConstraints;
pub use error::GraphError;
pub use path::{Path, PathStep};
pub use search_state::{DistancePath, SearchStates, extend_line_history};

/// Stops of one service category and the edges between them.
#[derive(Debug, Clone)]
pub struct Graph {
    category: ServiceCategory,
    stops: Vec<Stop>,
    index: HashMap<StopCode, usize>,
    /// Threshold of the last walking refresh; `None` until the first one.
    walking_threshold: Option<f64>,
    walking_refreshes: usize,
}

impl Graph {
    /// Builds a graph from ingested stops and the lines of `category`.
    ///
    /// Lines of the other category are skipped entirely. Each pair of
    /// consecutive stops on a matching line gets one transit edge in each
    /// direction, weighted by great-circle distance. Any edges the given
    /// stops already carry are discarded.
    pub fn new(
        stops: impl IntoIterator<Item = Stop>,
        lines: &[Line],
        category: ServiceCategory,
    ) -> Result<Self, GraphError> {
        let mut graph = Graph {
            category,
            stops: Vec::new(),
            index: HashMap::new(),
            walking_threshold: None,
            walking_refreshes: 0,
        };

        for stop in stops {
            graph.push_stop(stop)?;
        }

        let mut lines_used = 0;
        for line in lines.iter().filter(|l| l.category() == category) {
            graph.connect_line(line)?;
            lines_used += 1;
        }

        debug!(
            category = %category,
            stops = graph.stops.len(),
            lines = lines_used,
            skipped = lines.len() - lines_used,
            "Built transit graph"
        );

        Ok(graph)
    }

    fn push_stop(&mut self, stop: Stop) -> Result<(), GraphError> {
        if self.index.contains_key(stop.code()) {
            return Err(GraphError::DuplicateStop(stop.code().clone()));
        }
        let stop = Stop::new(
            stop.code().clone(),
            stop.name(),
            stop.zone(),
            stop.coordinate(),
        );
        self.index.insert(stop.code().clone(), self.stops.len());
        self.stops.push(stop);
        Ok(())
    }

    fn connect_line(&mut self, line: &Line) -> Result<(), GraphError> {
        let unknown = |stop: &StopCode| GraphError::UnknownLineStop {
            line: line.code().clone(),
            stop: stop.clone(),
        };

        for pair in line.stops().windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let a = *self.index.get(from).ok_or_else(|| unknown(from))?;
            let b = *self.index.get(to).ok_or_else(|| unknown(to))?;
            if a == b {
                continue;
            }

            let distance = self.stops[a].distance_to(&self.stops[b]);
            let label = EdgeLabel::Line(line.code().clone());
            self.stops[a].add_transit_edge(Edge::new(distance, to.clone(), label.clone()));
            self.stops[b].add_transit_edge(Edge::new(distance, from.clone(), label));
        }

        Ok(())
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    /// Stops in insertion order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn contains(&self, code: &StopCode) -> bool {
        self.index.contains_key(code)
    }

    /// Looks up a stop by code.
    pub fn stop(&self, code: &StopCode) -> Result<&Stop, GraphError> {
        self.position(code).map(|i| &self.stops[i])
    }

    /// Position of a stop in [`Graph::stops`], valid until the next mutation.
    pub fn position(&self, code: &StopCode) -> Result<usize, GraphError> {
        self.index
            .get(code)
            .copied()
            .ok_or_else(|| GraphError::StopNotFound(code.clone()))
    }

    /// Walking threshold of the last refresh, if any.
    pub fn walking_threshold(&self) -> Option<f64> {
        self.walking_threshold
    }

    /// Number of full walking-edge rebuilds since construction.
    pub fn walking_refreshes(&self) -> usize {
        self.walking_refreshes
    }

    /// Total number of one-directional transit edges.
    pub fn transit_edge_count(&self) -> usize {
        self.stops.iter().map(|s| s.transit_edges().len()).sum()
    }

    /// Total number of one-directional walking edges.
    pub fn walking_edge_count(&self) -> usize {
        self.stops.iter().map(|s| s.walking_edges().len()).sum()
    }

    /// Appends stops and refreshes walking edges at the last threshold.
    ///
    /// Fails without changing the graph if any code is already present or
    /// repeated within `new_stops`. An empty batch leaves walking edges as
    /// they are.
    pub fn add_stops(&mut self, new_stops: Vec<Stop>) -> Result<(), GraphError> {
        if self.insert_stops(new_stops)? > 0 {
            self.refresh_walking_edges();
        }
        Ok(())
    }

    /// Checks the whole batch for clashes, then appends it. Returns the
    /// number of stops added.
    fn insert_stops(&mut self, new_stops: Vec<Stop>) -> Result<usize, GraphError> {
        let mut seen = HashSet::new();
        for stop in &new_stops {
            if self.contains(stop.code()) || !seen.insert(stop.code()) {
                return Err(GraphError::DuplicateStop(stop.code().clone()));
            }
        }

        let added = new_stops.len();
        for stop in new_stops {
            self.push_stop(stop)?;
        }
        if added > 0 {
            debug!(added, stops = self.stops.len(), "Added stops");
        }
        Ok(added)
    }

    /// Removes stops by code and drops every edge that pointed at them.
    ///
    /// Walking edges between the remaining stops depend only on their
    /// distance, so they are kept rather than rebuilt. Fails without
    /// changing the graph if any code is unknown.
    pub fn remove_stops(&mut self, codes: &[StopCode]) -> Result<(), GraphError> {
        for code in codes {
            self.position(code)?;
        }

        let removed: HashSet<&StopCode> = codes.iter().collect();
        self.stops.retain(|s| !removed.contains(s.code()));
        for stop in &mut self.stops {
            stop.drop_edges_to(|target| removed.contains(target));
        }
        self.index = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, s)| (s.code().clone(), i))
            .collect();
        debug!(removed = removed.len(), stops = self.stops.len(), "Removed stops");

        Ok(())
    }
}
