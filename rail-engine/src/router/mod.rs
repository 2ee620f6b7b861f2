//! Router (spec.md §4.R): multi-criteria journey search over an assembled
//! [`crate::network::Network`].

pub mod cancel;
pub mod config;
pub mod rank;
pub mod search;

pub use cancel::{CancellationHandle, CancellationToken, cancellation_pair};
pub use config::SearchConfig;
pub use rank::{deduplicate, rank_journeys, remove_dominated};
pub use search::{NoPathReason, PlanOutcome, PlanRequest, Router, When};
