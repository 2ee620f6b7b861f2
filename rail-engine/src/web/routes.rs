//! HTTP route handlers (spec.md §4.Q "additions: a thin web facade").

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use super::dto::{AssemblyReportDto, ErrorResponseDto, PlanRequestDto, PlanResponseDto};
use super::state::AppState;
use crate::query::{self, PlanResponse, PlanStream};
use crate::router::{NoPathReason, deduplicate, rank_journeys, remove_dominated};

/// Query-time budget (spec.md §5 "2000 ms default"). Applies to the blocking
/// router search, not to request parsing or serialization.
const QUERY_TIMEOUT: Duration = Duration::from_millis(2000);

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/report", get(report))
        .route("/plan", post(plan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequestDto>,
) -> Result<Response, AppError> {
    let query = request
        .into_query(&state.default_config)
        .map_err(|e| AppError::BadRequest { message: e.0 })?;

    let resolved = query::resolve_request(&state.network, &query, state.clock.as_ref())
        .map_err(|e| AppError::BadRequest { message: e.to_string() })?;
    if resolved.origin == resolved.destination {
        return Ok(Json(PlanResponseDto::trivial()).into_response());
    }

    let PlanStream { mut receiver, cancellation } =
        query::plan_stream(state.network.clone(), query, state.clock.clone())
            .map_err(|e| AppError::BadRequest { message: e.to_string() })?;

    // Drains whatever non-dominated journeys the search has already found
    // when QUERY_TIMEOUT elapses, marking the response partial rather than
    // abandoning the search outright (spec.md §5, §7 `PARTIAL`).
    let deadline = tokio::time::Instant::now() + QUERY_TIMEOUT;
    let mut journeys = Vec::new();
    let mut partial = false;
    loop {
        match tokio::time::timeout_at(deadline, receiver.recv()).await {
            Ok(Some(journey)) => journeys.push(journey),
            Ok(None) => break,
            Err(_elapsed) => {
                cancellation.cancel();
                partial = true;
                while let Ok(journey) = receiver.try_recv() {
                    journeys.push(journey);
                }
                break;
            }
        }
    }

    let journeys = rank_journeys(deduplicate(remove_dominated(journeys)));
    let no_path_reason = if journeys.is_empty() && !partial {
        Some(NoPathReason::NoReachablePath)
    } else {
        None
    };
    let response = PlanResponse { journeys, partial, no_path_reason, trivial_journey: None };

    Ok(Json(PlanResponseDto::from_response(&state.network, &response)).into_response())
}

/// Exposes the assembly report collected when the network was built, so
/// operators can check dataset health without re-running the CLI.
async fn report(State(state): State<AppState>) -> Json<AssemblyReportDto> {
    Json(AssemblyReportDto::from_report(&state.report))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
        };

        let body = Json(ErrorResponseDto { error: message });
        (status, body).into_response()
    }
}
