//! Line Document Loader (spec.md §4.L).
//!
//! Parses one line document (a byte buffer, presumed UTF-8 JSON) into a
//! fully validated [`LineSpec`], or rejects it as a whole — the loader
//! never returns a partially populated `LineSpec` (spec.md §4.L "Failure
//! modes"). Station references are not yet resolved to network-wide
//! [`crate::domain::StationId`]s at this stage; that is the Network
//! Assembler's job (spec.md §4.N).

mod dto;

use dto::{LineDocumentDto, StopsDto};

use crate::domain::{Frequency, ServicePattern, StopSet};

/// A single station as it appears within one line document, prior to
/// cross-line unification by the Network Assembler.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStation {
    pub name: String,
    pub code: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub zone: Option<u16>,
    pub interchange: Vec<String>,
    pub morning: Vec<String>,
    pub afternoon: Vec<String>,
    pub evening: Vec<String>,
    pub night: Vec<String>,
}

/// A fully validated, self-contained line document (spec.md §4.L
/// "Output").
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub line_name: String,
    pub operator: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub frequency: Frequency,
    pub stations: Vec<RawStation>,
    /// Patterns in source (insertion) order — a `BTreeMap` in the DTO layer
    /// sorts by name, which is fine since pattern order carries no meaning
    /// in spec.md §3 ("ServicePattern").
    pub patterns: Vec<ServicePattern>,
    /// Raw `"<A>-<B>" -> minutes` entries, unresolved: the Network
    /// Assembler tries both station orderings and both name/code forms
    /// when matching these against this line's station list (spec.md §4.N
    /// step 3, weight preference (a)).
    pub typical_journey_times: Vec<(String, u32)>,
}

/// Non-fatal issues found while loading a document (spec.md §4.L rule 4:
/// "if not [sorted], sort and emit a *warning*").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    UnsortedTimes {
        station: String,
        day_class: &'static str,
    },
}

/// Failure modes for a rejected line document (spec.md §4.L).
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("schema mismatch in field `{field}`: {reason}")]
    SchemaMismatch { field: String, reason: String },

    #[error("invalid coordinate for station `{station}`: {reason}")]
    InvalidCoord { station: String, reason: String },

    #[error("invalid time `{value}` for station `{station}`: {reason}")]
    InvalidTime {
        station: String,
        value: String,
        reason: String,
    },

    #[error("line document has no stations")]
    EmptyLine,
}

/// Loads and validates one line document.
///
/// On success, returns the validated [`LineSpec`] plus any non-fatal
/// [`LoadWarning`]s. On failure, no partial `LineSpec` is returned — the
/// whole document is rejected (spec.md §4.L).
#[tracing::instrument(skip_all)]
pub fn load_line_document(bytes: &str) -> Result<(LineSpec, Vec<LoadWarning>), LoadError> {
    let dto: LineDocumentDto =
        serde_json::from_str(bytes).map_err(|e| LoadError::MalformedJson(e.to_string()))?;

    if dto.stations.is_empty() {
        return Err(LoadError::EmptyLine);
    }

    if let Some(declared) = dto.metadata.total_stations {
        if declared != dto.stations.len() {
            return Err(LoadError::SchemaMismatch {
                field: "metadata.total_stations".to_string(),
                reason: format!(
                    "declared {declared} stations but {} were supplied",
                    dto.stations.len()
                ),
            });
        }
    }

    let mut warnings = Vec::new();
    let mut stations = Vec::with_capacity(dto.stations.len());

    for station in dto.stations {
        if station.name.trim().is_empty() {
            return Err(LoadError::SchemaMismatch {
                field: "stations[].name".to_string(),
                reason: "station name must be non-empty".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&station.coordinates.lat) {
            return Err(LoadError::InvalidCoord {
                station: station.name.clone(),
                reason: "latitude out of range [-90, 90]".to_string(),
            });
        }
        if !(-180.0..=180.0).contains(&station.coordinates.lng) {
            return Err(LoadError::InvalidCoord {
                station: station.name.clone(),
                reason: "longitude out of range [-180, 180]".to_string(),
            });
        }
        if let Some(code) = &station.code {
            if !is_valid_code_shape(code) {
                return Err(LoadError::SchemaMismatch {
                    field: "stations[].code".to_string(),
                    reason: format!("code `{code}` does not match ^[A-Z0-9]{{2,5}}$"),
                });
            }
        }

        let morning = validate_and_sort_times(&station.name, "morning", station.times.morning, &mut warnings)?;
        let afternoon = validate_and_sort_times(&station.name, "afternoon", station.times.afternoon, &mut warnings)?;
        let evening = validate_and_sort_times(&station.name, "evening", station.times.evening, &mut warnings)?;
        let night = validate_and_sort_times(&station.name, "night", station.times.night, &mut warnings)?;

        stations.push(RawStation {
            name: station.name,
            code: station.code,
            lat: station.coordinates.lat,
            lng: station.coordinates.lng,
            zone: station.zone,
            interchange: station.interchange,
            morning,
            afternoon,
            evening,
            night,
        });
    }

    let mut patterns = Vec::with_capacity(dto.service_patterns.len());
    for (name, pattern) in dto.service_patterns {
        let stops = match pattern.stations {
            StopsDto::All(tag) if tag.eq_ignore_ascii_case("all") => StopSet::All,
            StopsDto::All(other) => {
                return Err(LoadError::SchemaMismatch {
                    field: format!("service_patterns.{name}.stations"),
                    reason: format!("expected \"all\" or a list, got string `{other}`"),
                });
            }
            StopsDto::Explicit(list) => StopSet::Explicit(list),
        };

        patterns.push(ServicePattern {
            name,
            service_type: pattern.service_type,
            description: pattern.description,
            stops,
            typical_journey_time_minutes: pattern
                .typical_journey_time
                .map(|v| v.max(0) as u32),
            frequency: pattern.frequency,
            peak_frequency: pattern.peak_frequency,
            off_peak_frequency: pattern.off_peak_frequency,
            weekend_frequency: pattern.weekend_frequency,
            first_service: pattern.first_service,
            last_service: pattern.last_service,
            operates_on: pattern.operates_on,
            resolved_stops: None,
        });
    }

    let typical_journey_times = dto
        .typical_journey_times
        .into_iter()
        .map(|(k, v)| (k, v.max(0) as u32))
        .collect();

    let frequency = dto
        .metadata
        .frequency
        .map(|f| Frequency {
            weekday_peak: f.weekday_peak,
            weekday_off_peak: f.weekday_off_peak,
            weekend: f.weekend,
            night: f.night,
        })
        .unwrap_or_default();

    Ok((
        LineSpec {
            line_name: dto.metadata.line_name,
            operator: dto.metadata.operator,
            description: dto.metadata.description,
            color: dto.metadata.line_color,
            frequency,
            stations,
            patterns,
            typical_journey_times,
        },
        warnings,
    ))
}

fn is_valid_code_shape(code: &str) -> bool {
    (2..=5).contains(&code.len())
        && code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Validates rule 3 (`HH:MM` parses) and rule 4 (ordered, else sort +
/// warn) for one day-class's time list.
fn validate_and_sort_times(
    station: &str,
    day_class: &'static str,
    mut times: Vec<String>,
    warnings: &mut Vec<LoadWarning>,
) -> Result<Vec<String>, LoadError> {
    for t in &times {
        crate::domain::WallTime::parse_hhmm(t).map_err(|e| LoadError::InvalidTime {
            station: station.to_string(),
            value: t.clone(),
            reason: e.to_string(),
        })?;
    }

    let is_sorted = times
        .windows(2)
        .all(|w| w[0].as_str() <= w[1].as_str());
    if !is_sorted {
        times.sort();
        warnings.push(LoadWarning::UnsortedTimes {
            station: station.to_string(),
            day_class,
        });
    }

    Ok(times)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> &'static str {
        r#"{
            "metadata": {"line_name": "Bakerloo", "operator": "London Underground", "total_stations": 2},
            "stations": [
                {"name": "Harrow & Wealdstone", "code": "HAW", "coordinates": {"lat": 51.592, "lng": -0.335},
                 "times": {"morning": ["06:00", "06:15"]}},
                {"name": "Elephant & Castle", "code": "ELC", "coordinates": {"lat": 51.495, "lng": -0.100},
                 "times": {"morning": ["06:30", "06:45"]}}
            ],
            "service_patterns": {
                "stopping": {"description": "Calls at all stations", "stations": "all"}
            },
            "typical_journey_times": {"HAW-ELC": 30}
        }"#
    }

    #[test]
    fn loads_valid_document() {
        let (spec, warnings) = load_line_document(sample_doc()).unwrap();
        assert_eq!(spec.line_name, "Bakerloo");
        assert_eq!(spec.stations.len(), 2);
        assert_eq!(spec.patterns.len(), 1);
        assert!(warnings.is_empty());
        assert_eq!(spec.typical_journey_times, vec![("HAW-ELC".to_string(), 30)]);
    }

    #[test]
    fn rejects_total_stations_mismatch() {
        let doc = sample_doc().replace("\"total_stations\": 2", "\"total_stations\": 5");
        let err = load_line_document(&doc).unwrap_err();
        assert!(matches!(err, LoadError::SchemaMismatch { .. }));
    }

    #[test]
    fn rejects_empty_stations() {
        let doc = r#"{"metadata": {"line_name": "X", "operator": "Y"}, "stations": []}"#;
        let err = load_line_document(doc).unwrap_err();
        assert!(matches!(err, LoadError::EmptyLine));
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        let doc = sample_doc().replace("51.592", "91.0");
        let err = load_line_document(&doc).unwrap_err();
        assert!(matches!(err, LoadError::InvalidCoord { .. }));
    }

    #[test]
    fn rejects_invalid_time() {
        let doc = sample_doc().replace("06:00", "25:99");
        let err = load_line_document(&doc).unwrap_err();
        assert!(matches!(err, LoadError::InvalidTime { .. }));
    }

    #[test]
    fn unsorted_times_are_sorted_with_warning() {
        let doc = sample_doc().replace(
            r#""morning": ["06:00", "06:15"]"#,
            r#""morning": ["06:15", "06:00"]"#,
        );
        let (spec, warnings) = load_line_document(&doc).unwrap();
        assert_eq!(spec.stations[0].morning, vec!["06:00", "06:15"]);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], LoadWarning::UnsortedTimes { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = load_line_document("not json").unwrap_err();
        assert!(matches!(err, LoadError::MalformedJson(_)));
    }

    #[test]
    fn all_stop_set_resolved() {
        let (spec, _) = load_line_document(sample_doc()).unwrap();
        assert_eq!(spec.patterns[0].stops, StopSet::All);
    }
}
