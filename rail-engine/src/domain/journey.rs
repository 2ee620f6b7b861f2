//! Journey and transfer types (spec.md §4.J "Journey Formatter").
//!
//! A `Journey` is the Journey Formatter's stable output: an ordered list of
//! [`Leg`]s plus an ordered list of [`Transfer`]s, with the invariant that
//! `transfers.len() == legs.len() - 1` and each transfer bridges the
//! alighting station of one leg to the boarding station of the next
//! (spec.md §8 property 6 "Transfer counting").

use super::error::DomainError;
use super::ids::{LineId, StationId};
use super::leg::Leg;

/// A change of line between two legs (GLOSSARY "Transfer"): alight from
/// `arrive_from_line` at `at_station`, then board `depart_on_line` at
/// `board_station`. For an ordinary same-station change `at_station ==
/// board_station`; a tag-based or proximity walking interchange (spec.md
/// §4.R, §5 "walking interchange between nearby stations") moves between
/// two distinct stations, with `wait_minutes` already covering the
/// interchange/walk cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub at_station: StationId,
    pub board_station: StationId,
    pub arrive_from_line: LineId,
    pub depart_on_line: LineId,
    pub wait_minutes: i32,
}

/// A complete ranked journey from origin to destination (spec.md §4.J).
///
/// # Invariants
///
/// - At least one leg.
/// - `transfers.len() == legs.len() - 1`.
/// - Transfer `i` sits between `legs[i]` and `legs[i+1]`: its `at_station`
///   equals both `legs[i].alight_station()` and `legs[i+1].board_station()`,
///   and `wait_minutes` equals the gap between `legs[i].alight_time()` and
///   `legs[i+1].board_time()`.
/// - Sum of leg durations plus sum of transfer waits equals the journey's
///   total duration (spec.md §4.J).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    legs: Vec<Leg>,
    transfers: Vec<Transfer>,
    trailing_walk: Option<TrailingWalk>,
}

/// A walking or tag-based interchange step that ends the journey past its
/// last ride (spec.md §3 "Interchange edges", §4.R): GLOSSARY's "Transfer"
/// bridges two `Leg`s, so a journey whose destination is itself only an
/// interchange partner of the last station served by rail — no further
/// boarding needed — is tracked here instead of as a `Transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWalk {
    pub to_station: StationId,
    pub arrival_time: i32,
}

impl Journey {
    /// Constructs a journey from legs and transfers, validating that they
    /// interlock correctly.
    pub fn new(legs: Vec<Leg>, transfers: Vec<Transfer>) -> Result<Self, DomainError> {
        Self::new_with_trailing_walk(legs, transfers, None)
    }

    /// As [`Journey::new`], but the journey's true destination is reached
    /// by a walk/interchange step past the last leg rather than by the
    /// last leg's own alighting station.
    pub fn new_with_trailing_walk(
        legs: Vec<Leg>,
        transfers: Vec<Transfer>,
        trailing_walk: Option<TrailingWalk>,
    ) -> Result<Self, DomainError> {
        if legs.is_empty() {
            return Err(DomainError::EmptyJourney);
        }
        if transfers.len() != legs.len() - 1 {
            return Err(DomainError::InvalidLeg(
                "transfer count must equal leg count minus one",
            ));
        }
        for (i, transfer) in transfers.iter().enumerate() {
            let prev = &legs[i];
            let next = &legs[i + 1];
            if transfer.at_station != prev.alight_station()
                || transfer.board_station != next.board_station()
            {
                return Err(DomainError::LegsDoNotConnect(
                    prev.alight_station(),
                    next.board_station(),
                ));
            }
            let expected_wait = next.board_time() - prev.alight_time();
            if transfer.wait_minutes != expected_wait {
                return Err(DomainError::InvalidLeg(
                    "transfer wait_minutes inconsistent with leg times",
                ));
            }
        }
        if let Some(walk) = trailing_walk {
            let last = &legs[legs.len() - 1];
            if walk.arrival_time <= last.alight_time() {
                return Err(DomainError::InvalidLeg(
                    "trailing walk must arrive after the last leg's alighting time",
                ));
            }
            if walk.to_station == last.alight_station() {
                return Err(DomainError::InvalidLeg(
                    "trailing walk must reach a station other than the last leg's own",
                ));
            }
        }
        Ok(Self { legs, transfers, trailing_walk })
    }

    /// A trivial zero-length journey for an origin == destination query
    /// (spec.md §4.R "Edge-case policies").
    pub fn trivial() -> TrivialJourney {
        TrivialJourney
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// The walk/interchange step past the last leg, if the journey ends
    /// that way rather than at the last leg's own alighting station.
    pub fn trailing_walk(&self) -> Option<TrailingWalk> {
        self.trailing_walk
    }

    pub fn origin(&self) -> StationId {
        self.legs[0].board_station()
    }

    pub fn destination(&self) -> StationId {
        match self.trailing_walk {
            Some(walk) => walk.to_station,
            None => self.legs[self.legs.len() - 1].alight_station(),
        }
    }

    pub fn departure_time(&self) -> i32 {
        self.legs[0].board_time()
    }

    pub fn arrival_time(&self) -> i32 {
        match self.trailing_walk {
            Some(walk) => walk.arrival_time,
            None => self.legs[self.legs.len() - 1].alight_time(),
        }
    }

    /// Number of transfers, equal to `legs.len() - 1` (spec.md §8 property
    /// 6).
    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    /// Total journey duration in minutes: sum of leg durations plus sum of
    /// transfer waits, which by construction equals `arrival - departure`.
    pub fn total_duration_minutes(&self) -> i32 {
        self.arrival_time() - self.departure_time()
    }

    /// Lexicographic line sequence used as the router's final tie-break
    /// (spec.md §4.R "Tie-breaks").
    pub fn line_sequence(&self) -> Vec<LineId> {
        self.legs.iter().map(|l| l.line()).collect()
    }
}

/// Marker type returned for an origin == destination query; carries no
/// legs or transfers. Kept distinct from `Journey` rather than allowing an
/// empty-legs `Journey` so `Journey`'s invariants never need an exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrivialJourney;

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::ids::PatternId;

    fn leg(line: u16, board: u32, board_t: i32, alight: u32, alight_t: i32) -> Leg {
        Leg::new(
            LineId(line),
            PatternId(0),
            StationId(board),
            board_t,
            StationId(alight),
            alight_t,
            vec![StationId(board), StationId(alight)],
        )
        .unwrap()
    }

    #[test]
    fn single_leg_journey() {
        let j = Journey::new(vec![leg(0, 1, 360, 2, 375)], vec![]).unwrap();
        assert_eq!(j.transfer_count(), 0);
        assert_eq!(j.origin(), StationId(1));
        assert_eq!(j.destination(), StationId(2));
        assert_eq!(j.total_duration_minutes(), 15);
    }

    #[test]
    fn two_leg_journey_with_transfer() {
        let legs = vec![leg(0, 1, 360, 2, 375), leg(1, 2, 379, 3, 400)];
        let transfers = vec![Transfer {
            at_station: StationId(2),
            board_station: StationId(2),
            arrive_from_line: LineId(0),
            depart_on_line: LineId(1),
            wait_minutes: 4,
        }];
        let j = Journey::new(legs, transfers).unwrap();
        assert_eq!(j.transfer_count(), 1);
        assert_eq!(j.total_duration_minutes(), 40);
        assert_eq!(
            j.total_duration_minutes(),
            (375 - 360) + 4 + (400 - 379)
        );
    }

    #[test]
    fn rejects_mismatched_transfer_station() {
        let legs = vec![leg(0, 1, 360, 2, 375), leg(1, 5, 379, 3, 400)];
        let transfers = vec![Transfer {
            at_station: StationId(2),
            board_station: StationId(2),
            arrive_from_line: LineId(0),
            depart_on_line: LineId(1),
            wait_minutes: 4,
        }];
        assert!(Journey::new(legs, transfers).is_err());
    }

    #[test]
    fn walking_transfer_between_distinct_stations_is_accepted() {
        // An interchange/walking transfer alights at one station and boards
        // the next leg at a different, nearby one.
        let legs = vec![leg(0, 1, 360, 2, 375), leg(1, 9, 384, 3, 400)];
        let transfers = vec![Transfer {
            at_station: StationId(2),
            board_station: StationId(9),
            arrive_from_line: LineId(0),
            depart_on_line: LineId(1),
            wait_minutes: 9,
        }];
        let j = Journey::new(legs, transfers).unwrap();
        assert_eq!(j.transfer_count(), 1);
    }

    #[test]
    fn rejects_wrong_transfer_count() {
        let legs = vec![leg(0, 1, 360, 2, 375), leg(1, 2, 379, 3, 400)];
        assert!(Journey::new(legs, vec![]).is_err());
    }

    #[test]
    fn empty_legs_rejected() {
        assert!(Journey::new(vec![], vec![]).is_err());
    }
}
