//! Wall-clock time handling for the rail network's calendar-day-class
//! timetables.
//!
//! Unlike the Darwin feed this crate's teacher pulls from, line documents
//! (spec.md §6) carry no dates at all: calling times are plain `HH:MM`
//! strings partitioned into day-classes (`morning | afternoon | evening |
//! night`). [`WallTime`] is the date-free analogue of the teacher's
//! `RailTime`, and [`parse_time_sequence`] is the date-free analogue of its
//! rollover detection in `parse_time_sequence`.

use std::cmp::Ordering;
use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// The four day-classes a line document partitions calling times into
/// (spec.md §3 "LineStation").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayClass {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayClass {
    /// Derives the day-class of a query datetime from its wall-clock hour,
    /// per spec.md §6: morning `[05:00,12:00)`, afternoon `[12:00,18:00)`,
    /// evening `[18:00,23:00)`, night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayClass::Morning,
            12..=17 => DayClass::Afternoon,
            18..=22 => DayClass::Evening,
            _ => DayClass::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayClass::Morning => "morning",
            DayClass::Afternoon => "afternoon",
            DayClass::Evening => "evening",
            DayClass::Night => "night",
        }
    }
}

impl fmt::Display for DayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock time of day, stored as minutes past midnight in `[0, 1439]`.
///
/// `WallTime` carries no date: the engine's timetables are keyed by
/// day-class, not calendar date (spec.md §4.T). Ordering across the
/// midnight boundary for `night`-class post-midnight services is handled
/// separately by [`parse_time_sequence`], which returns effective minutes
/// that may exceed 1439.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallTime(u16);

impl WallTime {
    /// Construct from minutes past midnight. Out-of-range values (` >= 1440`)
    /// are rejected.
    pub fn from_minutes(minutes: u16) -> Result<Self, TimeError> {
        if minutes >= 1440 {
            return Err(TimeError::new("minutes must be in [0, 1439]"));
        }
        Ok(Self(minutes))
    }

    /// Parse a time from `HH:MM` format.
    ///
    /// # Examples
    ///
    /// ```
    /// use rail_engine::domain::WallTime;
    ///
    /// assert!(WallTime::parse_hhmm("00:00").is_ok());
    /// assert!(WallTime::parse_hhmm("23:59").is_ok());
    /// assert!(WallTime::parse_hhmm("24:00").is_err());
    /// assert!(WallTime::parse_hhmm("14:3").is_err());
    /// ```
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }
        let bytes = s.as_bytes();
        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }
        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Minutes past midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

fn parse_two_digits(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 2 || !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() {
        return None;
    }
    Some((bytes[0] - b'0') as u16 * 10 + (bytes[1] - b'0') as u16)
}

/// Threshold (hours) beyond which a backwards jump in a time sequence is
/// treated as a midnight rollover rather than data disorder.
const ROLLOVER_THRESHOLD_HOURS: i32 = 6;

/// Parses an ordered sequence of `HH:MM` strings within one day-class,
/// returning *effective minutes* that may exceed 1439 for times detected as
/// falling after a midnight rollover.
///
/// Per spec.md §4.T: "Times in day-class `night` that fall numerically less
/// than the previous class's latest time are treated as post-midnight
/// next-day... for the purposes of ordering." This function generalizes
/// that rule to detect a rollover *within* any single day-class's own list
/// (a large backwards jump), mirroring the teacher's
/// `domain::time::parse_time_sequence` rollover detection, generalized from
/// date-stamped output to a plain effective-minutes count since this
/// engine's timetables carry no date.
///
/// Returns `(WallTime, effective_minutes)` pairs, one per input string, in
/// the order parsed.
pub fn parse_time_sequence(times: &[&str]) -> Result<Vec<(WallTime, i32)>, TimeError> {
    let mut result = Vec::with_capacity(times.len());
    let mut day_offset: i32 = 0;
    let mut prev_minutes: Option<i32> = None;

    for time_str in times {
        let wall = WallTime::parse_hhmm(time_str)?;
        let curr_minutes = wall.minutes() as i32;

        if let Some(prev) = prev_minutes {
            let diff = curr_minutes - (prev - day_offset * 1440);
            if diff < -(ROLLOVER_THRESHOLD_HOURS * 60) {
                day_offset += 1;
            }
        }

        let effective = curr_minutes + day_offset * 1440;
        result.push((wall, effective));
        prev_minutes = Some(effective);
    }

    Ok(result)
}

/// Compares two effective-minutes values the way the router compares
/// arrival times across a potential midnight rollover: plain numeric
/// ordering, since rollover has already been folded into the effective
/// value by [`parse_time_sequence`].
pub fn compare_effective(a: i32, b: i32) -> Ordering {
    a.cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_hhmm() {
        assert_eq!(WallTime::parse_hhmm("00:00").unwrap().minutes(), 0);
        assert_eq!(WallTime::parse_hhmm("23:59").unwrap().minutes(), 1439);
        assert_eq!(WallTime::parse_hhmm("14:30").unwrap().minutes(), 870);
    }

    #[test]
    fn reject_invalid_hhmm() {
        assert!(WallTime::parse_hhmm("1430").is_err());
        assert!(WallTime::parse_hhmm("14:3").is_err());
        assert!(WallTime::parse_hhmm("25:00").is_err());
        assert!(WallTime::parse_hhmm("14:60").is_err());
        assert!(WallTime::parse_hhmm("24:00").is_err());
    }

    #[test]
    fn display_roundtrip() {
        let t = WallTime::parse_hhmm("08:53").unwrap();
        assert_eq!(t.to_string(), "08:53");
    }

    #[test]
    fn day_class_from_hour() {
        assert_eq!(DayClass::from_hour(5), DayClass::Morning);
        assert_eq!(DayClass::from_hour(11), DayClass::Morning);
        assert_eq!(DayClass::from_hour(12), DayClass::Afternoon);
        assert_eq!(DayClass::from_hour(17), DayClass::Afternoon);
        assert_eq!(DayClass::from_hour(18), DayClass::Evening);
        assert_eq!(DayClass::from_hour(22), DayClass::Evening);
        assert_eq!(DayClass::from_hour(23), DayClass::Night);
        assert_eq!(DayClass::from_hour(2), DayClass::Night);
    }

    #[test]
    fn monotone_sequence_no_rollover() {
        let seq = parse_time_sequence(&["06:00", "06:15", "06:30"]).unwrap();
        let minutes: Vec<i32> = seq.iter().map(|(_, m)| *m).collect();
        assert_eq!(minutes, vec![360, 375, 390]);
    }

    #[test]
    fn post_midnight_rollover_detected() {
        // Evening class ending at 23:50, followed by 00:15, 02:43 - both
        // after a midnight rollover per spec.md §9 open question.
        let seq = parse_time_sequence(&["23:50", "00:15", "02:43"]).unwrap();
        let minutes: Vec<i32> = seq.iter().map(|(_, m)| *m).collect();
        assert_eq!(minutes[0], 23 * 60 + 50);
        assert!(minutes[1] > minutes[0]);
        assert!(minutes[2] > minutes[1]);
        assert_eq!(minutes[1], 24 * 60 + 15);
        assert_eq!(minutes[2], 24 * 60 + 2 * 60 + 43);
    }

    #[test]
    fn small_backwards_jump_is_not_rollover() {
        // A one-minute backwards disorder should not be mistaken for a
        // midnight crossing; it stays within the rollover threshold.
        let seq = parse_time_sequence(&["06:30", "06:29"]).unwrap();
        assert_eq!(seq[1].1, 6 * 60 + 29);
    }
}
