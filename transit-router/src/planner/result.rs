//! Owned route results.

use crate::domain::{Coordinate, EdgeLabel, LineCode, Stop};
use crate::graph::Path;

/// A stop on a planned route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub code: String,
    pub name: String,
    pub zone: String,
    pub coordinate: Coordinate,
}

impl RouteStop {
    fn from_stop(stop: &Stop) -> Self {
        Self {
            code: stop.code().to_string(),
            name: stop.name().to_string(),
            zone: stop.zone().to_string(),
            coordinate: stop.coordinate(),
        }
    }
}

/// Consecutive edges of a route with the same label.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub label: EdgeLabel,
    /// Stop codes from boarding to alighting, both included
    pub stops: Vec<String>,
    pub distance_m: f64,
}

impl Leg {
    pub fn from(&self) -> &str {
        self.stops.first().map(String::as_str).unwrap_or_default()
    }

    pub fn to(&self) -> &str {
        self.stops.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_walk(&self) -> bool {
        self.label.is_walk()
    }
}

/// A planned route, detached from the graph it was found in.
///
/// An empty result means no route was found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResult {
    pub stops: Vec<RouteStop>,
    pub legs: Vec<Leg>,
    pub total_distance_m: f64,
    /// Distinct lines ridden, in order of first use
    pub lines_used: Vec<LineCode>,
    /// Distinct fare zones crossed, sorted
    pub zones: Vec<String>,
}

impl RouteResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of stop-to-stop hops.
    pub fn hops(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    pub fn from_path(path: &Path<'_>) -> Self {
        if path.is_empty() {
            return Self::empty();
        }

        let mut legs: Vec<Leg> = Vec::new();
        for pair in path.steps().windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let Some(label) = to.arrived_by.as_ref() else {
                continue;
            };
            let to_code = to.stop.code().to_string();

            match legs.last_mut() {
                Some(leg) if leg.label == *label => {
                    leg.stops.push(to_code);
                    leg.distance_m += to.leg_distance;
                }
                _ => legs.push(Leg {
                    label: label.clone(),
                    stops: vec![from.stop.code().to_string(), to_code],
                    distance_m: to.leg_distance,
                }),
            }
        }

        let mut lines_used: Vec<LineCode> = Vec::new();
        for leg in &legs {
            if let EdgeLabel::Line(code) = &leg.label
                && !lines_used.contains(code)
            {
                lines_used.push(code.clone());
            }
        }

        Self {
            stops: path.stops().map(RouteStop::from_stop).collect(),
            legs,
            total_distance_m: path.distance(),
            lines_used,
            zones: path.fare_zones().into_iter().map(str::to_string).collect(),
        }
    }
}
