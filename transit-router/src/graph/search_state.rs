//! Per-query search bookkeeping.
//!
//! One [`DistancePath`] per stop, allocated when a search starts and dropped
//! when it returns. Nothing here is ever stored on a [`Stop`], so repeated
//! queries cannot observe each other's state.

use std::collections::BTreeSet;

use crate::domain::{Edge, EdgeLabel, Stop, StopCode};

/// Search record for one stop during one query.
#[derive(Debug, Clone)]
pub struct DistancePath {
    code: StopCode,
    distance: f64,
    visited: bool,
    previous: Option<StopCode>,
    arrived_by: Option<EdgeLabel>,
    leg_distance: f64,
    lines: Vec<EdgeLabel>,
    zones: BTreeSet<String>,
}

impl DistancePath {
    /// Fresh record: infinitely far, unvisited, no predecessor.
    pub fn new(code: StopCode) -> Self {
        Self {
            code,
            distance: f64::INFINITY,
            visited: false,
            previous: None,
            arrived_by: None,
            leg_distance: 0.0,
            lines: Vec::new(),
            zones: BTreeSet::new(),
        }
    }

    /// Resets the record as the search origin: zero distance, finalised.
    pub fn set_for_origin(&mut self) {
        self.distance = 0.0;
        self.visited = true;
        self.previous = None;
        self.arrived_by = None;
        self.leg_distance = 0.0;
        self.lines.clear();
        self.zones.clear();
    }

    pub fn code(&self) -> &StopCode {
        &self.code
    }

    /// Tentative cumulative distance in meters.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn visit(&mut self) {
        self.visited = true;
    }

    pub fn previous(&self) -> Option<&StopCode> {
        self.previous.as_ref()
    }

    /// Label of the edge this stop was last reached by.
    pub fn arrived_by(&self) -> Option<&EdgeLabel> {
        self.arrived_by.as_ref()
    }

    /// Weight of the edge this stop was last reached by.
    pub fn leg_distance(&self) -> f64 {
        self.leg_distance
    }

    /// Distinct line runs used to reach this stop, in travel order.
    pub fn lines(&self) -> &[EdgeLabel] {
        &self.lines
    }

    /// Fare zones of every stop on the path to this one.
    pub fn zones(&self) -> &BTreeSet<String> {
        &self.zones
    }

    /// Records a better way to reach this stop.
    pub fn relax(
        &mut self,
        from: &StopCode,
        edge: &Edge,
        distance: f64,
        lines: Vec<EdgeLabel>,
        zones: BTreeSet<String>,
    ) {
        self.distance = distance;
        self.previous = Some(from.clone());
        self.arrived_by = Some(edge.label.clone());
        self.leg_distance = edge.weight;
        self.lines = lines;
        self.zones = zones;
    }

    /// Marks the stop reached for the first time, as breadth-first search does.
    pub fn reach(&mut self, from: &StopCode, edge: &Edge, distance: f64) {
        self.visited = true;
        self.distance = distance;
        self.previous = Some(from.clone());
        self.arrived_by = Some(edge.label.clone());
        self.leg_distance = edge.weight;
    }
}

/// Appends `label` to a line history unless it continues the last run.
pub fn extend_line_history(history: &[EdgeLabel], label: &EdgeLabel) -> Vec<EdgeLabel> {
    let mut lines = history.to_vec();
    if lines.last() != Some(label) {
        lines.push(label.clone());
    }
    lines
}

/// Search records for every stop of a graph, indexed like the graph's stops.
#[derive(Debug)]
pub struct SearchStates {
    states: Vec<DistancePath>,
}

impl SearchStates {
    /// Allocates one fresh record per stop.
    pub fn new(stops: &[Stop]) -> Self {
        Self {
            states: stops
                .iter()
                .map(|s| DistancePath::new(s.code().clone()))
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> &DistancePath {
        &self.states[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut DistancePath {
        &mut self.states[index]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of finalised stops.
    pub fn visited_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_visited()).count()
    }
}
