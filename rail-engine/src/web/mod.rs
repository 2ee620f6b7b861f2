//! Web layer for the rail journey planner.
//!
//! A thin JSON facade over [`crate::query`]: `POST /plan` runs one query,
//! `GET /report` exposes the build-time assembly report, `GET /health` is a
//! liveness probe.

mod dto;
mod routes;
mod state;

pub use dto::{
    AssemblyReportDto, ErrorResponseDto, JourneyDto, LegDto, PlanRequestDto, PlanResponseDto,
    TransferDto,
};
pub use routes::create_router;
pub use state::AppState;
