//! Rail journey planning engine.
//!
//! Given a dataset directory of per-line timetable documents, assembles a
//! static multi-line [`network::Network`] and answers journey queries
//! ("from origin, departing at time T, what are the best journeys to
//! destination, honouring interchange rules and service-pattern stopping
//! policies?") via [`query::plan`] / [`query::plan_stream`].

pub mod dataset;
pub mod domain;
pub mod loader;
pub mod network;
pub mod pattern;
pub mod query;
pub mod router;
pub mod timetable;

#[cfg(feature = "web")]
pub mod web;
