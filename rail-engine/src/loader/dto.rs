//! Wire-format DTOs mirroring the line document schema (spec.md §6).
//!
//! Deserialized with `serde_json`, then fallibly converted into the
//! validated domain types in `super::LineSpec`.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LineDocumentDto {
    pub metadata: MetadataDto,
    pub stations: Vec<StationDto>,
    #[serde(default)]
    pub service_patterns: std::collections::BTreeMap<String, PatternDto>,
    #[serde(default)]
    pub typical_journey_times: std::collections::BTreeMap<String, i64>,
}

#[derive(Debug, Deserialize)]
pub struct MetadataDto {
    pub line_name: String,
    pub operator: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_stations: Option<usize>,
    #[serde(default)]
    pub line_color: Option<String>,
    #[serde(default)]
    pub frequency: Option<FrequencyDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FrequencyDto {
    #[serde(default)]
    pub weekday_peak: Option<String>,
    #[serde(default)]
    pub weekday_off_peak: Option<String>,
    #[serde(default)]
    pub weekend: Option<String>,
    #[serde(default)]
    pub night: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StationDto {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub coordinates: CoordinatesDto,
    #[serde(default)]
    pub zone: Option<u16>,
    #[serde(default)]
    pub interchange: Vec<String>,
    #[serde(default)]
    pub times: TimesDto,
}

#[derive(Debug, Deserialize)]
pub struct CoordinatesDto {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimesDto {
    #[serde(default)]
    pub morning: Vec<String>,
    #[serde(default)]
    pub afternoon: Vec<String>,
    #[serde(default)]
    pub evening: Vec<String>,
    #[serde(default)]
    pub night: Vec<String>,
}

/// The pattern's stop-set: `"all"` or an explicit list of station
/// references. Deserialized untagged, collapsing the teacher's two-shape
/// "Minimal/Detailed" duck typing (spec.md §9) into one representation at
/// the wire layer already.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StopsDto {
    All(String),
    Explicit(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct PatternDto {
    #[serde(default)]
    pub service_type: Option<String>,
    pub description: String,
    pub stations: StopsDto,
    #[serde(default)]
    pub typical_journey_time: Option<i64>,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub peak_frequency: Option<String>,
    #[serde(default)]
    pub off_peak_frequency: Option<String>,
    #[serde(default)]
    pub weekend_frequency: Option<String>,
    #[serde(default)]
    pub first_service: Option<String>,
    #[serde(default)]
    pub last_service: Option<String>,
    #[serde(default)]
    pub operates_on: Vec<String>,
}
