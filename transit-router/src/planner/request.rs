//! Route requests.

use crate::domain::{Coordinate, ServiceCategory, StopCode};
use crate::graph::SearchConstraints;

/// Code given to a map point used as the origin.
pub const ORIGIN_CODE: &str = "ORIGIN";

/// Code given to a map point used as the destination.
pub const DESTINATION_CODE: &str = "DESTINATION";

/// Where a route starts or ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// An existing stop
    Stop(StopCode),
    /// An arbitrary point, joined to the network by walking edges only
    Point(Coordinate),
}

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Shortest distance within line-run and zone bounds
    Shortest { constraints: SearchConstraints },
    /// Fewest stop-to-stop hops, ignoring distance and bounds
    FewestHops,
}

/// A single routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Endpoint,
    pub destination: Endpoint,
    pub mode: SearchMode,
    pub service: ServiceCategory,
    /// Walking threshold in meters; the planner's default when `None`
    pub walking_threshold: Option<f64>,
}

impl RouteRequest {
    /// A day-service fewest-hops request at the default walking threshold.
    pub fn new(origin: Endpoint, destination: Endpoint) -> Self {
        Self {
            origin,
            destination,
            mode: SearchMode::FewestHops,
            service: ServiceCategory::Day,
            walking_threshold: None,
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_service(mut self, service: ServiceCategory) -> Self {
        self.service = service;
        self
    }

    pub fn with_walking_threshold(mut self, meters: f64) -> Self {
        self.walking_threshold = Some(meters);
        self
    }
}
