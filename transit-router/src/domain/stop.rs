//! Stops (graph vertices) and their adjacency.

use std::fmt;

use super::{Coordinate, LineCode, StopCode};

/// Zone given to synthetic stops built from a user coordinate.
///
/// It is not a fare zone and never counts against a zone limit.
pub const WALK_ZONE: &str = "walk";

/// Label carried by an edge: the line that serves it, or walking.
///
/// Consecutive edges with equal labels count as one line used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeLabel {
    /// Served by a transit line
    Line(LineCode),
    /// On foot between two nearby stops
    Walk,
}

impl EdgeLabel {
    /// Returns the label as it appears in datasets and responses.
    pub fn as_str(&self) -> &str {
        match self {
            EdgeLabel::Line(code) => code.as_str(),
            EdgeLabel::Walk => "walk",
        }
    }

    /// Returns true for walking edges.
    pub fn is_walk(&self) -> bool {
        matches!(self, EdgeLabel::Walk)
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One direction of a logically undirected connection.
///
/// The target is referenced by code and resolved through the owning graph,
/// so edges stay valid when the stop collection is reallocated.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Distance in meters
    pub weight: f64,
    /// Stop this edge leads to
    pub target: StopCode,
    /// Line serving this edge, or walking
    pub label: EdgeLabel,
}

impl Edge {
    pub fn new(weight: f64, target: StopCode, label: EdgeLabel) -> Self {
        Self {
            weight,
            target,
            label,
        }
    }
}

/// A network location: a transit stop, or a synthetic point for one query.
#[derive(Debug, Clone)]
pub struct Stop {
    code: StopCode,
    name: String,
    zone: String,
    coordinate: Coordinate,
    transit_edges: Vec<Edge>,
    walking_edges: Vec<Edge>,
}

impl Stop {
    /// Creates a stop with no edges.
    pub fn new(
        code: StopCode,
        name: impl Into<String>,
        zone: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            zone: zone.into(),
            coordinate,
            transit_edges: Vec::new(),
            walking_edges: Vec::new(),
        }
    }

    /// Creates a nameless stop in the walking zone, used for points the
    /// user picks on the map rather than existing stops.
    pub fn synthetic(code: StopCode, coordinate: Coordinate) -> Self {
        Self::new(code, "", WALK_ZONE, coordinate)
    }

    pub fn code(&self) -> &StopCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the fare zone, or `None` for synthetic stops.
    pub fn fare_zone(&self) -> Option<&str> {
        if self.zone == WALK_ZONE {
            None
        } else {
            Some(&self.zone)
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Distance in meters to another stop.
    pub fn distance_to(&self, other: &Stop) -> f64 {
        self.coordinate.distance_to(&other.coordinate)
    }

    pub fn transit_edges(&self) -> &[Edge] {
        &self.transit_edges
    }

    pub fn walking_edges(&self) -> &[Edge] {
        &self.walking_edges
    }

    /// All outgoing edges, transit first, then walking.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.transit_edges.iter().chain(self.walking_edges.iter())
    }

    pub(crate) fn add_transit_edge(&mut self, edge: Edge) {
        self.transit_edges.push(edge);
    }

    pub(crate) fn add_walking_edge(&mut self, edge: Edge) {
        self.walking_edges.push(edge);
    }

    pub(crate) fn clear_walking_edges(&mut self) {
        self.walking_edges.clear();
    }

    /// Drops transit and walking edges whose target satisfies `removed`.
    pub(crate) fn drop_edges_to(&mut self, removed: impl Fn(&StopCode) -> bool) {
        self.transit_edges.retain(|e| !removed(&e.target));
        self.walking_edges.retain(|e| !removed(&e.target));
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} {}", self.code, self.coordinate)
        } else {
            write!(f, "{} ({}, zone {})", self.code, self.name, self.zone)
        }
    }
}
