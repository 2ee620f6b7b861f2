//! Router configuration (spec.md §4.R "options", §6 "Query API").

/// Tunable bounds for one [`super::search::Router::route`] call (spec.md §6
/// `plan(...options?)`). Defaults match the abstract query API's defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Bound on line changes (spec.md §4.R "Transfers are bounded").
    pub max_transfers: u32,
    /// Top-K journeys returned (spec.md §4.R "Goal").
    pub max_results: usize,
    /// Planning horizon in minutes from the query's departure time (spec.md
    /// §4.R "If no such departure exists before the planning horizon
    /// (default 24 h), skip").
    pub horizon_minutes: i32,
    /// Ceiling on walking-interchange distance the Router will consider
    /// (spec.md §6 `max_walk_km`, §5 "walking interchange between nearby
    /// stations"): at each expanded label, stations within this radius of
    /// the current station become board-able transfer targets.
    pub max_walk_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_transfers: 4,
            max_results: 5,
            horizon_minutes: 1440,
            max_walk_km: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = SearchConfig::default();
        assert_eq!(config.max_transfers, 4);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.horizon_minutes, 1440);
        assert_eq!(config.max_walk_km, 1.0);
    }
}
