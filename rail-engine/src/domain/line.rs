//! Line and per-line station types (spec.md §3 "Line", "LineStation").

use super::ids::StationId;
use super::time::DayClass;

/// Free-form human-readable frequency strings for a line's headline
/// service bands (spec.md §3 "Line"). Values are never parsed; they are
/// carried through for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frequency {
    pub weekday_peak: Option<String>,
    pub weekday_off_peak: Option<String>,
    pub weekend: Option<String>,
    pub night: Option<String>,
}

/// One station's position within a line, carrying the per-line scheduled
/// calling times for that station (spec.md §3 "LineStation").
#[derive(Debug, Clone, PartialEq)]
pub struct LineStation {
    /// Index into the network's station arena. `None` before the Network
    /// Assembler has unified this entry with a global station (the loader
    /// produces entries with this unset; the assembler fills it in).
    pub station: Option<StationId>,
    pub morning: Vec<String>,
    pub afternoon: Vec<String>,
    pub evening: Vec<String>,
    pub night: Vec<String>,
}

impl LineStation {
    pub fn new(station: StationId) -> Self {
        Self {
            station: Some(station),
            morning: Vec::new(),
            afternoon: Vec::new(),
            evening: Vec::new(),
            night: Vec::new(),
        }
    }

    /// Returns the raw `HH:MM` times for a given day-class.
    pub fn times_for(&self, class: DayClass) -> &[String] {
        match class {
            DayClass::Morning => &self.morning,
            DayClass::Afternoon => &self.afternoon,
            DayClass::Evening => &self.evening,
            DayClass::Night => &self.night,
        }
    }
}

/// A named ordered corridor belonging to a single operator (spec.md §3
/// "Line"). Station references within a line are dense [`StationId`]
/// indices into the owning [`crate::network::Network`]'s station arena,
/// per spec.md §9 "Cyclic references between lines and stations".
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub name: String,
    pub description: Option<String>,
    pub operator: String,
    pub color: Option<String>,
    pub frequency: Frequency,
    /// Ordered physical sequence of stations carried by this line. May
    /// include multiple branches end to end (spec.md §3: "branching is not
    /// modelled structurally").
    pub stations: Vec<LineStation>,
}

impl Line {
    /// Returns the position of a station within this line's ordered
    /// sequence, if it is carried.
    pub fn position_of(&self, station: StationId) -> Option<usize> {
        self.stations.iter().position(|s| s.station == Some(station))
    }

    /// Returns the adjacent-pair iterator used by the Network Assembler's
    /// adjacency materialisation step (spec.md §4.N step 3).
    pub fn adjacent_pairs(&self) -> impl Iterator<Item = (&LineStation, &LineStation)> {
        self.stations.windows(2).map(|w| (&w[0], &w[1]))
    }
}
