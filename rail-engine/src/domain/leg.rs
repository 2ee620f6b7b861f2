//! Leg type: one contiguous train segment of a journey on a single line.

use super::error::DomainError;
use super::ids::{LineId, PatternId, StationId};

/// A leg of a journey: boarding one line's service at one station and
/// alighting at another, without an intervening transfer (spec.md §4.J,
/// GLOSSARY "Leg").
///
/// Times are stored as *effective minutes* (may exceed 1439 across a
/// midnight rollover, see `domain::time::parse_time_sequence`), not as
/// wall-clock `WallTime`, since a leg's board/alight times must compare
/// correctly across day boundaries within the router's planning horizon.
///
/// # Invariants
///
/// - `alight_time > board_time` (the leg takes positive travel time)
/// - `board_station != alight_station`
/// - `calling_points` starts with `board_station` and ends with
///   `alight_station` (spec.md §4.J: "calling_points of each leg are
///   exactly those stations... that the leg's chosen pattern calls at")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    line: LineId,
    pattern: PatternId,
    board_station: StationId,
    board_time: i32,
    alight_station: StationId,
    alight_time: i32,
    calling_points: Vec<StationId>,
}

impl Leg {
    /// Construct a leg, validating that it travels strictly forward in time
    /// between two distinct stations.
    pub fn new(
        line: LineId,
        pattern: PatternId,
        board_station: StationId,
        board_time: i32,
        alight_station: StationId,
        alight_time: i32,
        calling_points: Vec<StationId>,
    ) -> Result<Self, DomainError> {
        if alight_time <= board_time {
            return Err(DomainError::InvalidLeg(
                "alight time must be after board time",
            ));
        }
        if board_station == alight_station {
            return Err(DomainError::InvalidLeg(
                "board and alight station must differ",
            ));
        }
        Ok(Self {
            line,
            pattern,
            board_station,
            board_time,
            alight_station,
            alight_time,
            calling_points,
        })
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn pattern(&self) -> PatternId {
        self.pattern
    }

    pub fn board_station(&self) -> StationId {
        self.board_station
    }

    pub fn board_time(&self) -> i32 {
        self.board_time
    }

    pub fn alight_station(&self) -> StationId {
        self.alight_station
    }

    pub fn alight_time(&self) -> i32 {
        self.alight_time
    }

    /// Stations called at between (and including) boarding and alighting,
    /// in travel order.
    pub fn calling_points(&self) -> &[StationId] {
        &self.calling_points
    }

    /// Travel duration in minutes.
    pub fn duration_minutes(&self) -> i32 {
        self.alight_time - self.board_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_leg() {
        let leg = Leg::new(
            LineId(0),
            PatternId(0),
            StationId(1),
            360,
            StationId(2),
            375,
            vec![StationId(1), StationId(2)],
        )
        .unwrap();
        assert_eq!(leg.duration_minutes(), 15);
        assert_eq!(leg.calling_points(), [StationId(1), StationId(2)]);
    }

    #[test]
    fn rejects_non_positive_duration() {
        let err = Leg::new(
            LineId(0),
            PatternId(0),
            StationId(1),
            400,
            StationId(2),
            400,
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidLeg(_)));
    }

    #[test]
    fn rejects_same_station() {
        let err = Leg::new(
            LineId(0),
            PatternId(0),
            StationId(1),
            360,
            StationId(1),
            400,
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidLeg(_)));
    }
}
