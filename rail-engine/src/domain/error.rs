//! Domain error types.
//!
//! These represent validation failures and internal consistency failures in
//! the domain layer, distinct from the document-load errors in
//! `crate::loader` and the assembly-report entries in `crate::network`.

use super::ids::StationId;

/// Domain-level errors for validation and internal consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A leg's alight point is not strictly after its board point.
    #[error("invalid leg: {0}")]
    InvalidLeg(&'static str),

    /// Consecutive legs in a journey don't share a station at the join.
    #[error("legs do not connect: leg ends at {0} but next leg boards at {1}")]
    LegsDoNotConnect(StationId, StationId),

    /// A journey was constructed with no legs.
    #[error("journey must have at least one leg")]
    EmptyJourney,

    /// A pattern's stop-set was queried before the assembler resolved it.
    #[error("service pattern stop-set not yet resolved")]
    UnresolvedPattern,
}
