//! Configuration for the route planner.

use crate::graph::SearchConstraints;

/// Defaults and limits applied to route requests.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Walking threshold used when a request doesn't give one (meters).
    pub walking_threshold_m: f64,

    /// Line runs allowed when a request doesn't give a bound.
    /// Walking counts as a run.
    pub max_line_changes: usize,

    /// Fare zones allowed when a request doesn't give a bound.
    pub max_zones: usize,

    /// Largest walking threshold a request may ask for (meters).
    pub max_walking_threshold_m: f64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        walking_threshold_m: f64,
        max_line_changes: usize,
        max_zones: usize,
        max_walking_threshold_m: f64,
    ) -> Self {
        Self {
            walking_threshold_m,
            max_line_changes,
            max_zones,
            max_walking_threshold_m,
        }
    }

    /// The default bounds as search constraints.
    pub fn constraints(&self) -> SearchConstraints {
        SearchConstraints::bounded(self.max_line_changes, self.max_zones)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            walking_threshold_m: 150.0,
            max_line_changes: 3,
            max_zones: 3,
            max_walking_threshold_m: 2000.0,
        }
    }
}
