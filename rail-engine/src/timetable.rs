//! Timetable Index (spec.md §4.T).
//!
//! For each `(line, station)` pair, stores calling times as an ascending
//! sequence of effective minutes (see `domain::time::parse_time_sequence`
//! for the midnight-rollover rule), tagged by day-class. Built once during
//! Network assembly and queried read-only thereafter by the Router.

use std::collections::HashMap;

use crate::domain::{DayClass, Line, LineId, StationId, TimeError, parse_time_sequence};

#[derive(Debug, Clone, Default)]
struct DayClassTimes {
    morning: Vec<i32>,
    afternoon: Vec<i32>,
    evening: Vec<i32>,
    night: Vec<i32>,
}

impl DayClassTimes {
    fn class_mut(&mut self, class: DayClass) -> &mut Vec<i32> {
        match class {
            DayClass::Morning => &mut self.morning,
            DayClass::Afternoon => &mut self.afternoon,
            DayClass::Evening => &mut self.evening,
            DayClass::Night => &mut self.night,
        }
    }

    fn class(&self, class: DayClass) -> &[i32] {
        match class {
            DayClass::Morning => &self.morning,
            DayClass::Afternoon => &self.afternoon,
            DayClass::Evening => &self.evening,
            DayClass::Night => &self.night,
        }
    }

    /// All day-classes merged and sorted, for filter-less queries.
    fn all_sorted(&self) -> Vec<i32> {
        let mut all: Vec<i32> = self
            .morning
            .iter()
            .chain(&self.afternoon)
            .chain(&self.evening)
            .chain(&self.night)
            .copied()
            .collect();
        all.sort_unstable();
        all
    }
}

/// The Timetable Index: a flat, pre-sorted table of scheduled calling
/// times per `(line, station)`, partitioned by day-class.
#[derive(Debug, Clone, Default)]
pub struct Timetable {
    entries: HashMap<(LineId, StationId), DayClassTimes>,
}

impl Timetable {
    /// Builds the index from the network's lines. Each `LineStation`'s raw
    /// `HH:MM` lists are parsed with rollover detection (spec.md §4.T).
    pub fn build(lines: &[Line]) -> Result<Self, TimeError> {
        let mut entries: HashMap<(LineId, StationId), DayClassTimes> = HashMap::new();

        for (line_idx, line) in lines.iter().enumerate() {
            let line_id = LineId(line_idx as u16);
            for ls in &line.stations {
                let Some(station_id) = ls.station else {
                    continue;
                };
                let slot = entries.entry((line_id, station_id)).or_default();

                for (class, raw) in [
                    (DayClass::Morning, &ls.morning),
                    (DayClass::Afternoon, &ls.afternoon),
                    (DayClass::Evening, &ls.evening),
                    (DayClass::Night, &ls.night),
                ] {
                    if raw.is_empty() {
                        continue;
                    }
                    let refs: Vec<&str> = raw.iter().map(String::as_str).collect();
                    let parsed = parse_time_sequence(&refs)?;
                    let minutes: Vec<i32> = parsed.into_iter().map(|(_, m)| m).collect();
                    slot.class_mut(class).extend(minutes);
                }
            }
        }

        Ok(Self { entries })
    }

    /// Earliest scheduled time at `(line, station)` strictly after
    /// `after_minutes` (inclusive of equal, since "at/after t" per spec.md
    /// §4.R), restricted to `day_class_filter` if given, else across all
    /// day-classes.
    pub fn next_departure(
        &self,
        line: LineId,
        station: StationId,
        after_minutes: i32,
        day_class_filter: Option<DayClass>,
    ) -> Option<i32> {
        let times = self.entries.get(&(line, station))?;
        let candidates = match day_class_filter {
            Some(class) => times.class(class).to_vec(),
            None => times.all_sorted(),
        };
        candidates.into_iter().find(|&t| t >= after_minutes)
    }

    /// All scheduled times at `(line, station)` within `[from, to]`.
    pub fn range(
        &self,
        line: LineId,
        station: StationId,
        from: i32,
        to: i32,
        day_class_filter: Option<DayClass>,
    ) -> Vec<i32> {
        let Some(times) = self.entries.get(&(line, station)) else {
            return Vec::new();
        };
        let candidates = match day_class_filter {
            Some(class) => times.class(class).to_vec(),
            None => times.all_sorted(),
        };
        candidates
            .into_iter()
            .filter(|&t| t >= from && t <= to)
            .collect()
    }

    /// `true` iff every stored sequence for `(line, station)` is strictly
    /// non-decreasing within its own day-class (spec.md §8 property 4).
    pub fn is_monotone(&self, line: LineId, station: StationId) -> bool {
        let Some(times) = self.entries.get(&(line, station)) else {
            return true;
        };
        [&times.morning, &times.afternoon, &times.evening, &times.night]
            .iter()
            .all(|seq| seq.windows(2).all(|w| w[0] <= w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineStation;

    fn line_with_times(morning: Vec<&str>) -> Line {
        Line {
            name: "Test".into(),
            description: None,
            operator: "Op".into(),
            color: None,
            frequency: Default::default(),
            stations: vec![LineStation {
                station: Some(StationId(0)),
                morning: morning.into_iter().map(String::from).collect(),
                afternoon: vec![],
                evening: vec![],
                night: vec![],
            }],
        }
    }

    #[test]
    fn next_departure_finds_earliest_at_or_after() {
        let lines = vec![line_with_times(vec!["06:00", "06:15", "06:30"])];
        let tt = Timetable::build(&lines).unwrap();
        let after = tt.next_departure(LineId(0), StationId(0), 6 * 60 + 10, Some(DayClass::Morning));
        assert_eq!(after, Some(6 * 60 + 15));
    }

    #[test]
    fn next_departure_none_past_last_time() {
        let lines = vec![line_with_times(vec!["06:00"])];
        let tt = Timetable::build(&lines).unwrap();
        let after = tt.next_departure(LineId(0), StationId(0), 7 * 60, Some(DayClass::Morning));
        assert_eq!(after, None);
    }

    #[test]
    fn range_filters_inclusive_bounds() {
        let lines = vec![line_with_times(vec!["06:00", "06:15", "06:30"])];
        let tt = Timetable::build(&lines).unwrap();
        let r = tt.range(LineId(0), StationId(0), 6 * 60, 6 * 60 + 15, Some(DayClass::Morning));
        assert_eq!(r, vec![360, 375]);
    }

    #[test]
    fn unfiltered_query_merges_day_classes() {
        let mut line = line_with_times(vec!["06:00"]);
        line.stations[0].evening = vec!["18:00".to_string()];
        let tt = Timetable::build(std::slice::from_ref(&line)).unwrap();
        let next = tt.next_departure(LineId(0), StationId(0), 0, None);
        assert_eq!(next, Some(360));
        let next2 = tt.next_departure(LineId(0), StationId(0), 361, None);
        assert_eq!(next2, Some(18 * 60));
    }

    #[test]
    fn is_monotone_true_for_sorted_sequence() {
        let lines = vec![line_with_times(vec!["06:00", "06:15"])];
        let tt = Timetable::build(&lines).unwrap();
        assert!(tt.is_monotone(LineId(0), StationId(0)));
    }
}
