//! Query Facade (spec.md §4.Q): the one entry point external collaborators
//! call. Resolves `StationRef`s and relative times, dispatches to the
//! [`crate::router::Router`], then hands the result back as a
//! [`PlanOutcome`]-shaped response.

use std::sync::Arc;

use chrono::{DateTime, Local, Timelike};
use tokio::sync::mpsc;
use tracing::instrument;

use crate::domain::{DayClass, Journey, StationId, TrivialJourney};
use crate::network::Network;
use crate::router::{
    CancellationToken, NoPathReason, PlanOutcome, PlanRequest, Router, SearchConfig, When,
    cancellation_pair,
};

/// A clock seam so relative query times ("now", "in 30 minutes") can be
/// tested deterministically, mirroring the teacher's practice of injecting
/// `chrono::Local::now()` at the HTTP handler rather than inside domain
/// logic (`web/routes.rs`).
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The default clock, backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Query-time failure modes (spec.md §7 `INVALID_QUERY`). Unlike
/// `NO_REACHABLE_PATH`, these are rejected before the router ever runs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    #[error("origin station reference `{0}` did not resolve to a known station")]
    UnknownOrigin(String),

    #[error("destination station reference `{0}` did not resolve to a known station")]
    UnknownDestination(String),

    #[error("arrive_before time is in the past relative to the query clock")]
    ArriveBeforeInPast,
}

/// One `plan()` request (spec.md §6 "Query API (abstract)").
#[derive(Debug, Clone)]
pub struct Query {
    pub origin: String,
    pub destination: String,
    pub when: QueryWhen,
    pub config: SearchConfig,
    /// Overrides the day-class derived from the query datetime, per spec.md
    /// §6 "Queries may override the filter."
    pub day_class_override: Option<DayClass>,
}

/// The `when` clause of a query, prior to station/time resolution.
#[derive(Debug, Clone, Copy)]
pub enum QueryWhen {
    DepartAfter(DateTime<Local>),
    ArriveBefore(DateTime<Local>),
}

/// Outcome of a successful `plan()` call (spec.md §6 `{ journeys, report }`).
#[derive(Debug, Clone)]
pub struct PlanResponse {
    pub journeys: Vec<Journey>,
    pub partial: bool,
    pub no_path_reason: Option<NoPathReason>,
    /// Set when origin == destination (spec.md §4.R "Edge-case policies":
    /// "return a zero-length trivial journey"), distinguishing that case
    /// from a silent empty `journeys` list.
    pub trivial_journey: Option<TrivialJourney>,
}

/// Resolves `reference` against `network`, or returns the matching
/// `QueryError` variant.
fn resolve(network: &Network, reference: &str, is_origin: bool) -> Result<StationId, QueryError> {
    network.resolve_station_ref(reference).ok_or_else(|| {
        if is_origin {
            QueryError::UnknownOrigin(reference.to_string())
        } else {
            QueryError::UnknownDestination(reference.to_string())
        }
    })
}

/// Minutes-past-epoch-midnight-of-query-day effective minutes plus the
/// day-class, derived from a wall-clock `DateTime` (spec.md §6 "Day-class
/// for a query datetime is derived from wall-clock hour").
fn effective_minutes_and_class(at: DateTime<Local>) -> (i32, DayClass) {
    let minutes = at.hour() as i32 * 60 + at.minute() as i32;
    (minutes, DayClass::from_hour(at.hour()))
}

/// Validates and resolves a [`Query`] into a [`PlanRequest`], per spec.md
/// §4.Q "Validates that origin/destination station references resolve.
/// Converts relative times... using an injected clock."
fn build_request(network: &Network, query: &Query, clock: &dyn Clock) -> Result<PlanRequest, QueryError> {
    let origin = resolve(network, &query.origin, true)?;
    let destination = resolve(network, &query.destination, false)?;

    let (when, day_class) = match query.when {
        QueryWhen::DepartAfter(at) => {
            let (minutes, class) = effective_minutes_and_class(at);
            (When::DepartAfter(minutes), class)
        }
        QueryWhen::ArriveBefore(at) => {
            if at < clock.now() {
                return Err(QueryError::ArriveBeforeInPast);
            }
            let (minutes, class) = effective_minutes_and_class(at);
            (When::ArriveBefore(minutes), class)
        }
    };

    Ok(PlanRequest {
        origin,
        destination,
        when,
        day_class: query.day_class_override.or(Some(day_class)),
    })
}

/// Validates and resolves a [`Query`] into a [`PlanRequest`] without running
/// a search, so a caller can act on the resolved origin/destination (e.g.
/// detect the trivial origin == destination case) before dispatching to the
/// router.
pub fn resolve_request(network: &Network, query: &Query, clock: &dyn Clock) -> Result<PlanRequest, QueryError> {
    build_request(network, query, clock)
}

/// Runs one query to completion and returns its ranked journeys (spec.md
/// §4.Q "Exposes one synchronous function").
#[instrument(skip(network, query, clock), fields(origin = %query.origin, destination = %query.destination))]
pub fn plan(
    network: &Network,
    query: &Query,
    clock: &dyn Clock,
) -> Result<PlanResponse, QueryError> {
    let request = build_request(network, query, clock)?;
    let router = Router::new(network, query.config);
    let outcome = router.route(&request, &CancellationToken::never());
    Ok(response_from_outcome(outcome))
}

fn response_from_outcome(outcome: PlanOutcome) -> PlanResponse {
    match outcome {
        PlanOutcome::Trivial => PlanResponse {
            journeys: Vec::new(),
            partial: false,
            no_path_reason: None,
            trivial_journey: Some(Journey::trivial()),
        },
        PlanOutcome::Found { journeys, partial } => {
            PlanResponse { journeys, partial, no_path_reason: None, trivial_journey: None }
        }
        PlanOutcome::NoPath(reason) => PlanResponse {
            journeys: Vec::new(),
            partial: false,
            no_path_reason: Some(reason),
            trivial_journey: None,
        },
    }
}

/// A handle over a running streaming query: receives journeys as they are
/// discovered and can cancel the search early.
pub struct PlanStream {
    pub receiver: mpsc::Receiver<Journey>,
    pub cancellation: crate::router::CancellationHandle,
}

/// Runs a query on a background task, streaming each non-dominated
/// destination label as a [`Journey`] over a channel (spec.md §4.Q "one
/// streaming variant that yields journeys as they are discovered", §9
/// "Coroutine-style streaming").
///
/// `network` is `Arc`-wrapped here (unlike [`plan`]'s borrowed reference)
/// because the search runs on a spawned task outside this function's stack
/// frame; the [`Router`] itself still only ever borrows `&Network` inside
/// that task, preserving the borrowed-reference design of spec.md §4.R (see
/// DESIGN.md "Router holds a reference, not an Arc").
#[instrument(skip(network, query, clock), fields(origin = %query.origin, destination = %query.destination))]
pub fn plan_stream(
    network: Arc<Network>,
    query: Query,
    clock: Arc<dyn Clock>,
) -> Result<PlanStream, QueryError> {
    let request = build_request(&network, &query, clock.as_ref())?;
    let (tx, rx) = mpsc::channel(16);
    let (cancel_handle, cancel_token) = cancellation_pair();

    tokio::task::spawn_blocking(move || {
        let router = Router::new(&network, query.config);
        router.route_streaming(&request, &cancel_token, &mut |journey| {
            let _ = tx.blocking_send(journey);
        });
    });

    Ok(PlanStream { receiver: rx, cancellation: cancel_handle })
}
