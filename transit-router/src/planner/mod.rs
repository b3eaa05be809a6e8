//! Route planner over the day and night networks.
//!
//! Answers "how do I get from here to there": either endpoint may be an
//! existing stop or an arbitrary map point. A map point is injected into the
//! selected graph as a synthetic stop for the duration of one query and
//! joined to the network by walking edges.

mod config;
mod error;
mod network;
mod request;
mod result;
mod scope;

pub use config::PlannerConfig;
pub use error::PlanError;
pub use network::{Network, StopDirectory};
pub use request::{DESTINATION_CODE, Endpoint, ORIGIN_CODE, RouteRequest, SearchMode};
pub use result::{Leg, RouteResult, RouteStop};
pub use scope::QueryScope;

use tracing::info;

use crate::domain::{Stop, StopCode};
use crate::graph::Graph;

/// Plans routes over a network it owns.
///
/// Each query mutates the selected graph temporarily, so routing takes
/// `&mut self`; callers sharing a planner serialise access.
#[derive(Debug)]
pub struct Planner {
    network: Network,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(network: Network, config: PlannerConfig) -> Self {
        Self { network, config }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans one route.
    ///
    /// Returns [`RouteResult::empty`] when no route satisfies the request.
    /// Whatever happens, synthetic endpoints are gone from the graph when
    /// this returns.
    pub fn route(&mut self, request: &RouteRequest) -> Result<RouteResult, PlanError> {
        let threshold = self.walking_threshold(request.walking_threshold)?;
        let graph = self.network.graph_mut(request.service);

        let mut synthetic = Vec::new();
        let origin = resolve(graph, &request.origin, ORIGIN_CODE, &mut synthetic)?;
        let destination = resolve(graph, &request.destination, DESTINATION_CODE, &mut synthetic)?;

        let scope = QueryScope::open(graph, synthetic, threshold)?;
        let path = match request.mode {
            SearchMode::Shortest { constraints } => {
                scope
                    .graph()
                    .constrained_shortest_path(&origin, &destination, constraints)?
            }
            SearchMode::FewestHops => scope.graph().fewest_hops(&origin, &destination)?,
        };
        let result = RouteResult::from_path(&path);

        info!(
            origin = %origin,
            destination = %destination,
            service = %request.service,
            found = !result.is_empty(),
            hops = result.hops(),
            distance_m = result.total_distance_m,
            "Planned route"
        );

        Ok(result)
    }

    fn walking_threshold(&self, requested: Option<f64>) -> Result<f64, PlanError> {
        let max = self.config.max_walking_threshold_m;
        let threshold = requested.unwrap_or(self.config.walking_threshold_m);
        if !threshold.is_finite() || !(0.0..=max).contains(&threshold) {
            return Err(PlanError::InvalidThreshold { threshold, max });
        }
        Ok(threshold)
    }
}

/// Code to search from for `endpoint`, queueing a synthetic stop for points.
fn resolve(
    graph: &Graph,
    endpoint: &Endpoint,
    synthetic_code: &str,
    synthetic: &mut Vec<Stop>,
) -> Result<StopCode, PlanError> {
    match endpoint {
        Endpoint::Stop(code) => {
            graph.stop(code)?;
            Ok(code.clone())
        }
        Endpoint::Point(coordinate) => {
            if !coordinate.is_valid() {
                return Err(PlanError::InvalidCoordinate(*coordinate));
            }
            let code = StopCode::parse(synthetic_code)?;
            synthetic.push(Stop::synthetic(code.clone(), *coordinate));
            Ok(code)
        }
    }
}
