//! Service pattern types (spec.md §3 "ServicePattern").
//!
//! Per spec.md §9 "Duck-typed pattern shapes", shipped pattern entries vary
//! from a full schedule block down to a stub of just a description and a
//! stop-set. Rather than modelling that as a sum type that the resolver has
//! to match on, every field beyond `stations`/`description` is optional, so
//! `Minimal` and `Detailed` shapes collapse into the same struct — the
//! collapsing itself happens in `loader::dto` where the wire shapes are
//! converted.

use super::error::DomainError;
use super::ids::StationId;

/// A pattern's stop-set: either every station on the line, or an explicit
/// list of station references as they appeared in the source document
/// (names or codes, not yet resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopSet {
    All,
    /// Raw references as written in the document; resolution against the
    /// owning line's station list happens in `pattern::resolve` (the crate
    /// root `pattern` module, not this one), per spec.md §4.S.
    Explicit(Vec<String>),
}

/// A named pattern of stations served by a class of train (spec.md §3
/// "ServicePattern").
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePattern {
    pub name: String,
    pub service_type: Option<String>,
    pub description: String,
    pub stops: StopSet,
    pub typical_journey_time_minutes: Option<u32>,
    pub frequency: Option<String>,
    pub peak_frequency: Option<String>,
    pub off_peak_frequency: Option<String>,
    pub weekend_frequency: Option<String>,
    pub first_service: Option<String>,
    pub last_service: Option<String>,
    pub operates_on: Vec<String>,
    /// Resolved stop-set, keyed by station id, filled in once by the
    /// Network Assembler (spec.md §4.N) so the router's O(1) membership
    /// lookup (spec.md §3 "Pattern membership") never re-resolves strings.
    pub resolved_stops: Option<Vec<StationId>>,
}

impl ServicePattern {
    /// `true` if this pattern's resolved stop-set includes the given
    /// station. Returns `DomainError::UnresolvedPattern` if the Network
    /// Assembler hasn't populated `resolved_stops` yet.
    pub fn calls_at(&self, station: StationId) -> Result<bool, DomainError> {
        let stops = self.resolved_stops.as_ref().ok_or(DomainError::UnresolvedPattern)?;
        Ok(stops.contains(&station))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(stops: StopSet) -> ServicePattern {
        ServicePattern {
            name: "stopping".into(),
            service_type: None,
            description: "All stations".into(),
            stops,
            typical_journey_time_minutes: None,
            frequency: None,
            peak_frequency: None,
            off_peak_frequency: None,
            weekend_frequency: None,
            first_service: None,
            last_service: None,
            operates_on: Vec::new(),
            resolved_stops: None,
        }
    }

    #[test]
    fn calls_at_checks_resolved_stops() {
        let mut p = minimal(StopSet::Explicit(vec!["WIJ".into()]));
        p.resolved_stops = Some(vec![StationId(3), StationId(7)]);
        assert!(p.calls_at(StationId(3)).unwrap());
        assert!(!p.calls_at(StationId(4)).unwrap());
    }

    #[test]
    fn calls_at_errors_before_resolution() {
        let p = minimal(StopSet::All);
        assert!(matches!(p.calls_at(StationId(0)), Err(DomainError::UnresolvedPattern)));
    }
}
