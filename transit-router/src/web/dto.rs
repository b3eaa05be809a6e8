//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{EdgeLabel, Stop};
use crate::planner::{Leg, RouteResult, RouteStop};

/// Query for the stop search endpoint.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Text to look for in stop codes and names
    pub q: String,

    /// Maximum number of results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A stop in search results.
#[derive(Debug, Serialize)]
pub struct StopSearchResult {
    pub code: String,
    pub name: String,
    pub zone: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response for the stop search endpoint.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopSearchResult>,
}

/// Where a requested route starts or ends.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EndpointDto {
    /// An existing stop, by code (case-insensitive)
    Stop { code: String },
    /// A map position
    Point { lat: f64, lon: f64 },
}

/// Which search to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchModeDto {
    #[default]
    Shortest,
    FewestHops,
}

/// Which lines to ride.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceDto {
    #[default]
    Day,
    Night,
}

/// Request to plan a route.
#[derive(Debug, Deserialize)]
pub struct RouteRequestDto {
    pub origin: EndpointDto,

    pub destination: EndpointDto,

    #[serde(default)]
    pub mode: SearchModeDto,

    #[serde(default)]
    pub service: ServiceDto,

    /// Line runs allowed (shortest mode only; planner default if absent)
    pub max_line_changes: Option<i64>,

    /// Fare zones allowed (shortest mode only; planner default if absent)
    pub max_zones: Option<i64>,

    /// Walking threshold in meters (planner default if absent)
    pub walking_threshold_m: Option<f64>,
}

/// A stop on a planned route.
#[derive(Debug, Serialize)]
pub struct StopInfo {
    pub code: String,
    pub name: String,
    pub zone: String,
    pub lat: f64,
    pub lon: f64,
}

/// A leg of a planned route.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LegResult {
    Line {
        line: String,
        stops: Vec<String>,
        distance_m: f64,
    },
    Walk {
        stops: Vec<String>,
        distance_m: f64,
    },
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// False when no route satisfies the request
    pub found: bool,

    pub stops: Vec<StopInfo>,

    pub legs: Vec<LegResult>,

    pub total_distance_m: f64,

    pub lines_used: Vec<String>,

    pub zones: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StopSearchResult {
    pub fn from_stop(stop: &Stop) -> Self {
        let coordinate = stop.coordinate();
        Self {
            code: stop.code().to_string(),
            name: stop.name().to_string(),
            zone: stop.zone().to_string(),
            lat: coordinate.lat,
            lon: coordinate.lon,
        }
    }
}

impl StopInfo {
    fn from_route_stop(stop: &RouteStop) -> Self {
        Self {
            code: stop.code.clone(),
            name: stop.name.clone(),
            zone: stop.zone.clone(),
            lat: stop.coordinate.lat,
            lon: stop.coordinate.lon,
        }
    }
}

impl LegResult {
    fn from_leg(leg: &Leg) -> Self {
        match &leg.label {
            EdgeLabel::Line(code) => LegResult::Line {
                line: code.to_string(),
                stops: leg.stops.clone(),
                distance_m: leg.distance_m,
            },
            EdgeLabel::Walk => LegResult::Walk {
                stops: leg.stops.clone(),
                distance_m: leg.distance_m,
            },
        }
    }
}

impl RouteResponse {
    pub fn from_result(result: &RouteResult) -> Self {
        Self {
            found: !result.is_empty(),
            stops: result.stops.iter().map(StopInfo::from_route_stop).collect(),
            legs: result.legs.iter().map(LegResult::from_leg).collect(),
            total_distance_m: result.total_distance_m,
            lines_used: result.lines_used.iter().map(|c| c.to_string()).collect(),
            zones: result.zones.clone(),
        }
    }
}
