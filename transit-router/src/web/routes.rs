//! HTTP route handlers.

use std::sync::{Mutex, MutexGuard};

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Coordinate, ServiceCategory, StopCode};
use crate::graph::{GraphError, SearchConstraints};
use crate::planner::{Endpoint, PlanError, Planner, PlannerConfig, RouteRequest, SearchMode};

use super::dto::*;
use super::state::AppState;

/// Results returned by stop search when the query gives no limit.
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Upper bound on stop search results.
const MAX_SEARCH_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops", get(search_stops))
        .route("/api/route", post(plan_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stops by code or name.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<StopSearchResponse>, AppError> {
    let limit = req
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);

    let stops = state
        .stops
        .search(&req.q, limit)
        .into_iter()
        .map(StopSearchResult::from_stop)
        .collect();

    Ok(Json(StopSearchResponse { stops }))
}

/// Plan a route between two stops or map points.
async fn plan_route(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RouteResponse>, AppError> {
    // Parse JSON manually so we can log the body on failure
    let req: RouteRequestDto = serde_json::from_slice(&body).map_err(|e| {
        warn!(
            error = %e,
            body = %String::from_utf8_lossy(&body),
            "Rejected route request"
        );
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    // Routing is CPU-bound and holds the planner lock throughout
    let planner = state.planner.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut planner = lock(&planner)?;
        let request = route_request(req, planner.config())?;
        planner.route(&request).map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Routing task failed: {e}"),
    })??;

    Ok(Json(RouteResponse::from_result(&result)))
}

fn lock(planner: &Mutex<Planner>) -> Result<MutexGuard<'_, Planner>, AppError> {
    planner.lock().map_err(|_| AppError::Internal {
        message: "Planner lock poisoned".to_string(),
    })
}

/// Build a planner request, filling omitted values from the planner's defaults.
fn route_request(req: RouteRequestDto, config: &PlannerConfig) -> Result<RouteRequest, AppError> {
    let origin = endpoint(req.origin, "origin")?;
    let destination = endpoint(req.destination, "destination")?;

    let mode = match req.mode {
        SearchModeDto::FewestHops => SearchMode::FewestHops,
        SearchModeDto::Shortest => {
            let constraints = match (req.max_line_changes, req.max_zones) {
                (None, None) => config.constraints(),
                (lines, zones) => SearchConstraints::new(
                    lines.unwrap_or_else(|| saturating_i64(config.max_line_changes)),
                    zones.unwrap_or_else(|| saturating_i64(config.max_zones)),
                )
                .map_err(PlanError::from)?,
            };
            SearchMode::Shortest { constraints }
        }
    };

    let service = match req.service {
        ServiceDto::Day => ServiceCategory::Day,
        ServiceDto::Night => ServiceCategory::Night,
    };

    Ok(RouteRequest {
        origin,
        destination,
        mode,
        service,
        walking_threshold: req.walking_threshold_m,
    })
}

fn saturating_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn endpoint(dto: EndpointDto, role: &str) -> Result<Endpoint, AppError> {
    match dto {
        EndpointDto::Stop { code } => StopCode::parse_normalized(&code)
            .map(Endpoint::Stop)
            .map_err(|e| AppError::BadRequest {
                message: format!("Invalid {role} stop code: {e}"),
            }),
        EndpointDto::Point { lat, lon } => Ok(Endpoint::Point(Coordinate::new(lat, lon))),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::Graph(GraphError::StopNotFound(_)) => AppError::NotFound { message },
            PlanError::Graph(GraphError::InvalidConstraint(_) | GraphError::InvalidThreshold(_))
            | PlanError::InvalidThreshold { .. }
            | PlanError::InvalidCoordinate(_)
            | PlanError::InvalidCode(_) => AppError::BadRequest { message },
            PlanError::Graph(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::domain::{Line, LineCode, Stop};
    use crate::planner::Network;

    fn code(s: &str) -> StopCode {
        StopCode::parse(s).unwrap()
    }

    /// Three stops about 550 m apart in a row, on one day line.
    fn state() -> AppState {
        let stops = vec![
            Stop::new(code("AAL1"), "ALAMEDA", "PRT1", Coordinate::new(41.000, -8.6)),
            Stop::new(code("BLM1"), "BOLHAO", "PRT1", Coordinate::new(41.005, -8.6)),
            Stop::new(code("CMP2"), "CAMPANHA", "PRT2", Coordinate::new(41.010, -8.6)),
        ];
        let lines = vec![Line::new(
            LineCode::parse("200").unwrap(),
            "200",
            0,
            vec![code("AAL1"), code("BLM1"), code("CMP2")],
        )];
        let network = Network::from_dataset(&Dataset { stops, lines }).unwrap();
        AppState::new(Planner::new(network, PlannerConfig::default()))
    }

    async fn plan(body: &str) -> Result<Json<RouteResponse>, AppError> {
        plan_route(State(state()), Bytes::from(body.to_string())).await
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn stop_search_respects_limit() {
        let query = StopSearchRequest {
            q: "a".to_string(),
            limit: Some(2),
        };

        let Json(response) = search_stops(State(state()), Query(query)).await.unwrap();

        assert_eq!(response.stops.len(), 2);
        assert_eq!(response.stops[0].code, "AAL1");
    }

    #[tokio::test]
    async fn stop_search_caps_limit() {
        let query = StopSearchRequest {
            q: "m".to_string(),
            limit: Some(1000),
        };

        let Json(response) = search_stops(State(state()), Query(query)).await.unwrap();

        assert_eq!(response.stops.len(), 3);
    }

    #[tokio::test]
    async fn stop_search_does_not_wait_for_routing() {
        use std::time::{Duration, Instant};

        let state = state();
        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        // Stands in for a long route query holding the planner
        let planner = state.planner.clone();
        let holder = std::thread::spawn(move || {
            let _guard = planner.lock().unwrap();
            locked_tx.send(()).unwrap();
            let _ = release_rx.recv_timeout(Duration::from_millis(500));
        });
        locked_rx.recv().unwrap();

        let query = StopSearchRequest {
            q: "bolhao".to_string(),
            limit: None,
        };
        let started = Instant::now();
        let result = search_stops(State(state.clone()), Query(query)).await;
        let elapsed = started.elapsed();

        let _ = release_tx.send(());
        holder.join().unwrap();

        assert!(elapsed < Duration::from_millis(250), "took {elapsed:?}");
        let Json(response) = result.unwrap();
        assert_eq!(response.stops[0].code, "BLM1");
    }

    #[tokio::test]
    async fn plans_route_between_stops() {
        let Json(response) = plan(
            r#"{"origin":{"type":"stop","code":"aal1"},"destination":{"type":"stop","code":"CMP2"}}"#,
        )
        .await
        .unwrap();

        assert!(response.found);
        let codes: Vec<&str> = response.stops.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["AAL1", "BLM1", "CMP2"]);
        assert_eq!(response.lines_used, vec!["200"]);
        assert_eq!(response.zones, vec!["PRT1", "PRT2"]);
        assert!(matches!(&response.legs[0], LegResult::Line { line, .. } if line == "200"));
    }

    #[tokio::test]
    async fn plans_route_from_map_point() {
        let Json(response) = plan(
            r#"{
                "origin": {"type": "point", "lat": 41.0002, "lon": -8.6},
                "destination": {"type": "stop", "code": "BLM1"},
                "mode": "fewest_hops"
            }"#,
        )
        .await
        .unwrap();

        assert!(response.found);
        assert_eq!(response.stops[0].code, "ORIGIN");
        assert!(matches!(response.legs[0], LegResult::Walk { .. }));
    }

    #[tokio::test]
    async fn unroutable_request_is_not_an_error() {
        let Json(response) = plan(
            r#"{
                "origin": {"type": "stop", "code": "AAL1"},
                "destination": {"type": "stop", "code": "CMP2"},
                "max_zones": 1
            }"#,
        )
        .await
        .unwrap();

        assert!(!response.found);
    }

    #[tokio::test]
    async fn unknown_stop_is_not_found() {
        let err = plan(
            r#"{"origin":{"type":"stop","code":"NOPE"},"destination":{"type":"stop","code":"AAL1"}}"#,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn negative_bound_is_bad_request() {
        let err = plan(
            r#"{
                "origin": {"type": "stop", "code": "AAL1"},
                "destination": {"type": "stop", "code": "CMP2"},
                "max_line_changes": -1
            }"#,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let err = plan("{not json").await.unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn blank_stop_code_is_bad_request() {
        let err = plan(
            r#"{"origin":{"type":"stop","code":"  "},"destination":{"type":"stop","code":"AAL1"}}"#,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn excessive_walking_threshold_is_bad_request() {
        let err = plan(
            r#"{
                "origin": {"type": "stop", "code": "AAL1"},
                "destination": {"type": "stop", "code": "CMP2"},
                "walking_threshold_m": 50000
            }"#,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[test]
    fn omitted_bounds_use_planner_defaults() {
        let req: RouteRequestDto = serde_json::from_str(
            r#"{"origin":{"type":"stop","code":"A"},"destination":{"type":"stop","code":"B"},"max_zones":1}"#,
        )
        .unwrap();

        let request = route_request(req, &PlannerConfig::default()).unwrap();

        assert_eq!(
            request.mode,
            SearchMode::Shortest {
                constraints: SearchConstraints::bounded(3, 1)
            }
        );
        assert_eq!(request.walking_threshold, None);
    }

    #[test]
    fn plan_errors_map_to_statuses() {
        let not_found: AppError = PlanError::Graph(GraphError::StopNotFound(code("X"))).into();
        assert!(matches!(not_found, AppError::NotFound { .. }));

        let internal: AppError = PlanError::Graph(GraphError::BrokenPath(code("X"))).into();
        assert_eq!(
            internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn router_builds() {
        let _router = create_router(state());
    }
}
