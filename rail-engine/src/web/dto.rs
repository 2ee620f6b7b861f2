//! Data transfer objects for web requests and responses (spec.md §6 "Query
//! API (abstract)" translated to a JSON wire shape).

use serde::{Deserialize, Serialize};

use crate::domain::Journey;
use crate::network::report::AssemblyReport;
use crate::network::Network;
use crate::query::{PlanResponse, Query, QueryWhen};
use crate::router::SearchConfig;

/// Wire shape of a `plan` request body.
#[derive(Debug, Deserialize)]
pub struct PlanRequestDto {
    pub origin: String,
    pub destination: String,
    /// RFC 3339 local timestamp. Exactly one of `depart_after` /
    /// `arrive_before` must be set.
    pub depart_after: Option<String>,
    pub arrive_before: Option<String>,
    pub max_transfers: Option<u32>,
    pub max_results: Option<usize>,
}

/// Error returned when a [`PlanRequestDto`] doesn't parse into a [`Query`].
#[derive(Debug)]
pub struct PlanRequestParseError(pub String);

impl PlanRequestDto {
    pub fn into_query(self, default_config: &SearchConfig) -> Result<Query, PlanRequestParseError> {
        let when = match (self.depart_after, self.arrive_before) {
            (Some(text), None) => QueryWhen::DepartAfter(
                parse_local_datetime(&text).map_err(PlanRequestParseError)?,
            ),
            (None, Some(text)) => QueryWhen::ArriveBefore(
                parse_local_datetime(&text).map_err(PlanRequestParseError)?,
            ),
            (Some(_), Some(_)) => {
                return Err(PlanRequestParseError(
                    "exactly one of depart_after/arrive_before must be set".into(),
                ));
            }
            (None, None) => {
                return Err(PlanRequestParseError(
                    "one of depart_after/arrive_before is required".into(),
                ));
            }
        };

        Ok(Query {
            origin: self.origin,
            destination: self.destination,
            when,
            config: SearchConfig {
                max_transfers: self.max_transfers.unwrap_or(default_config.max_transfers),
                max_results: self.max_results.unwrap_or(default_config.max_results),
                ..*default_config
            },
            day_class_override: None,
        })
    }
}

fn parse_local_datetime(text: &str) -> Result<chrono::DateTime<chrono::Local>, String> {
    use chrono::TimeZone;
    let naive = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| format!("invalid timestamp `{text}`: {e}"))?;
    chrono::Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| format!("ambiguous local timestamp `{text}`"))
}

/// One leg of a journey, as returned over the wire.
#[derive(Debug, Serialize)]
pub struct LegDto {
    pub line: String,
    pub pattern: String,
    pub board_station: String,
    pub board_time_minutes: i32,
    pub alight_station: String,
    pub alight_time_minutes: i32,
    pub calling_points: Vec<String>,
}

/// A transfer between two legs, as returned over the wire.
#[derive(Debug, Serialize)]
pub struct TransferDto {
    pub at_station: String,
    pub board_station: String,
    pub wait_minutes: i32,
}

/// A walk/interchange step past a journey's last ride (see
/// [`crate::domain::TrailingWalk`]), as returned over the wire.
#[derive(Debug, Serialize)]
pub struct TrailingWalkDto {
    pub to_station: String,
    pub arrival_time_minutes: i32,
}

/// One ranked journey, as returned over the wire.
#[derive(Debug, Serialize)]
pub struct JourneyDto {
    pub legs: Vec<LegDto>,
    pub transfers: Vec<TransferDto>,
    pub trailing_walk: Option<TrailingWalkDto>,
    pub departure_time_minutes: i32,
    pub arrival_time_minutes: i32,
    pub transfer_count: usize,
}

impl JourneyDto {
    pub fn from_journey(network: &Network, journey: &Journey) -> Self {
        let legs = journey
            .legs()
            .iter()
            .map(|leg| LegDto {
                line: network.line(leg.line()).name.clone(),
                pattern: network.pattern(leg.line(), leg.pattern()).name.clone(),
                board_station: network.station(leg.board_station()).name.clone(),
                board_time_minutes: leg.board_time(),
                alight_station: network.station(leg.alight_station()).name.clone(),
                alight_time_minutes: leg.alight_time(),
                calling_points: leg
                    .calling_points()
                    .iter()
                    .map(|id| network.station(*id).name.clone())
                    .collect(),
            })
            .collect();

        let transfers = journey
            .transfers()
            .iter()
            .map(|transfer| TransferDto {
                at_station: network.station(transfer.at_station).name.clone(),
                board_station: network.station(transfer.board_station).name.clone(),
                wait_minutes: transfer.wait_minutes,
            })
            .collect();

        let trailing_walk = journey.trailing_walk().map(|walk| TrailingWalkDto {
            to_station: network.station(walk.to_station).name.clone(),
            arrival_time_minutes: walk.arrival_time,
        });

        Self {
            legs,
            transfers,
            trailing_walk,
            departure_time_minutes: journey.departure_time(),
            arrival_time_minutes: journey.arrival_time(),
            transfer_count: journey.transfer_count(),
        }
    }
}

/// Response body for a `plan` call (spec.md §6 "Returns... journeys, the
/// ranked list").
#[derive(Debug, Serialize)]
pub struct PlanResponseDto {
    pub journeys: Vec<JourneyDto>,
    pub partial: bool,
    pub no_path_reason: Option<String>,
    /// Set when origin == destination and the request resolved to a
    /// zero-length trivial journey rather than a routed one (spec.md §4.R
    /// "Edge-case policies").
    pub trivial: bool,
}

impl PlanResponseDto {
    pub fn from_response(network: &Network, response: &PlanResponse) -> Self {
        Self {
            journeys: response
                .journeys
                .iter()
                .map(|journey| JourneyDto::from_journey(network, journey))
                .collect(),
            partial: response.partial,
            no_path_reason: response.no_path_reason.as_ref().map(|r| format!("{r:?}")),
            trivial: response.trivial_journey.is_some(),
        }
    }

    /// The response for an origin == destination request, resolved before
    /// a search ever starts.
    pub fn trivial() -> Self {
        Self { journeys: Vec::new(), partial: false, no_path_reason: None, trivial: true }
    }
}

/// Wire shape of the build-time assembly report (spec.md §6 "Assembly
/// report"), returned from `GET /report` for operators to inspect dataset
/// health without re-running the CLI.
#[derive(Debug, Serialize)]
pub struct AssemblyReportDto {
    pub dangling_reference_count: usize,
    pub code_collision_count: usize,
    pub coordinate_anomaly_count: usize,
    pub disconnected_component_count: usize,
    pub empty_pattern_warning_count: usize,
    pub rejected_document_count: usize,
    pub is_clean: bool,
}

impl AssemblyReportDto {
    pub fn from_report(report: &AssemblyReport) -> Self {
        Self {
            dangling_reference_count: report.dangling_references.len(),
            code_collision_count: report.code_collisions.len(),
            coordinate_anomaly_count: report.coordinate_anomalies.len(),
            disconnected_component_count: report.disconnected_components.len(),
            empty_pattern_warning_count: report.empty_pattern_warnings.len(),
            rejected_document_count: report.rejected_documents.len(),
            is_clean: report.is_clean(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponseDto {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_request_with_neither_time_set() {
        let dto = PlanRequestDto {
            origin: "A".into(),
            destination: "B".into(),
            depart_after: None,
            arrive_before: None,
            max_transfers: None,
            max_results: None,
        };
        assert!(dto.into_query(&SearchConfig::default()).is_err());
    }

    #[test]
    fn rejects_request_with_both_times_set() {
        let dto = PlanRequestDto {
            origin: "A".into(),
            destination: "B".into(),
            depart_after: Some("2025-06-18T06:00".into()),
            arrive_before: Some("2025-06-18T09:00".into()),
            max_transfers: None,
            max_results: None,
        };
        assert!(dto.into_query(&SearchConfig::default()).is_err());
    }

    #[test]
    fn parses_depart_after_and_keeps_defaults() {
        let dto = PlanRequestDto {
            origin: "A".into(),
            destination: "B".into(),
            depart_after: Some("2025-06-18T06:00".into()),
            arrive_before: None,
            max_transfers: Some(2),
            max_results: None,
        };
        let query = dto.into_query(&SearchConfig::default()).unwrap();
        assert_eq!(query.config.max_transfers, 2);
        assert_eq!(query.config.max_results, SearchConfig::default().max_results);
    }
}
