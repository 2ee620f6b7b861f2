//! Journey ranking for router results (spec.md §4.R "Goal", "Tie-breaks").
//!
//! Three functions — `rank_journeys`, `remove_dominated`, `deduplicate` —
//! ordering candidates by (arrival, changes, duration) and breaking final
//! ties on the lexicographic line sequence.

use std::cmp::Ordering;

use crate::domain::{Journey, compare_effective};

/// Ranks journeys best-first by spec.md §4.R "Tie-breaks": earlier arrival
/// > fewer transfers > shorter total travel > lexicographically smaller
/// line-sequence.
pub fn rank_journeys(mut journeys: Vec<Journey>) -> Vec<Journey> {
    journeys.sort_by(|a, b| {
        compare_effective(a.arrival_time(), b.arrival_time())
            .then_with(|| a.transfer_count().cmp(&b.transfer_count()))
            .then_with(|| a.total_duration_minutes().cmp(&b.total_duration_minutes()))
            .then_with(|| a.line_sequence().cmp(&b.line_sequence()))
    });
    journeys
}

/// Removes Pareto-dominated journeys: `a` dominates `b` iff `a` arrives no
/// later, uses no more transfers, takes no longer, and is strictly better
/// in at least one of those (spec.md §4.R "Label dominance", lifted from
/// labels to whole journeys for the final candidate list).
pub fn remove_dominated(journeys: Vec<Journey>) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    fn dominates(a: &Journey, b: &Journey) -> bool {
        compare_effective(a.arrival_time(), b.arrival_time()) != Ordering::Greater
            && a.transfer_count() <= b.transfer_count()
            && a.total_duration_minutes() <= b.total_duration_minutes()
            && (compare_effective(a.arrival_time(), b.arrival_time()) == Ordering::Less
                || a.transfer_count() < b.transfer_count()
                || a.total_duration_minutes() < b.total_duration_minutes())
    }

    let mut result: Vec<Journey> = Vec::with_capacity(journeys.len());
    for journey in journeys {
        let dominated = result.iter().any(|existing| dominates(existing, &journey));
        if dominated {
            continue;
        }
        result.retain(|existing| !dominates(&journey, existing));
        result.push(journey);
    }
    result
}

/// Collapses journeys that share (arrival, departure, transfers), keeping
/// the shortest-duration representative of each group.
pub fn deduplicate(mut journeys: Vec<Journey>) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    journeys.sort_by(|a, b| {
        compare_effective(a.arrival_time(), b.arrival_time())
            .then_with(|| compare_effective(a.departure_time(), b.departure_time()))
            .then_with(|| a.transfer_count().cmp(&b.transfer_count()))
            .then_with(|| a.total_duration_minutes().cmp(&b.total_duration_minutes()))
    });

    let mut result = Vec::with_capacity(journeys.len());
    let mut last_key: Option<(i32, i32, usize)> = None;
    for journey in journeys {
        let key = (journey.arrival_time(), journey.departure_time(), journey.transfer_count());
        if last_key != Some(key) {
            result.push(journey);
            last_key = Some(key);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Journey, Leg, LineId, PatternId, StationId, Transfer};

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

    fn direct(board_t: i32, alight_t: i32) -> Journey {
        Journey::new(vec![leg(0, 1, board_t, 2, alight_t)], vec![]).unwrap()
    }

    fn one_change(board_t: i32, mid_t: i32, change_t: i32, alight_t: i32) -> Journey {
        let legs = vec![leg(0, 1, board_t, 3, mid_t), leg(1, 3, change_t, 2, alight_t)];
        let transfers = vec![Transfer {
            at_station: StationId(3),
            board_station: StationId(3),
            arrive_from_line: LineId(0),
            depart_on_line: LineId(1),
            wait_minutes: change_t - mid_t,
        }];
        Journey::new(legs, transfers).unwrap()
    }

    #[test]
    fn rank_by_arrival_then_transfers() {
        let earlier = direct(600, 630);
        let later = direct(615, 640);
        let ranked = rank_journeys(vec![later.clone(), earlier.clone()]);
        assert_eq!(ranked[0].arrival_time(), 630);
        assert_eq!(ranked[1].arrival_time(), 640);
    }

    #[test]
    fn same_arrival_prefers_fewer_transfers() {
        let fast = direct(600, 690);
        let changed = one_change(600, 640, 644, 690);
        let ranked = rank_journeys(vec![changed, fast]);
        assert_eq!(ranked[0].transfer_count(), 0);
        assert_eq!(ranked[1].transfer_count(), 1);
    }

    #[test]
    fn dominated_journey_removed() {
        let better = direct(600, 630);
        let worse = direct(600, 645);
        let result = remove_dominated(vec![worse, better]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].arrival_time(), 630);
    }

    #[test]
    fn non_dominated_journeys_both_kept() {
        let earlier_more_changes = one_change(590, 610, 614, 625);
        let later_direct = direct(600, 630);
        let result = remove_dominated(vec![earlier_more_changes, later_direct]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn deduplicate_keeps_one_of_identical_journeys() {
        let a = direct(600, 630);
        let b = direct(600, 630);
        let result = deduplicate(vec![a, b]);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn empty_input_handled() {
        assert!(rank_journeys(vec![]).is_empty());
        assert!(remove_dominated(vec![]).is_empty());
        assert!(deduplicate(vec![]).is_empty());
    }
}
