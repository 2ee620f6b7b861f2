//! Arena index types.
//!
//! The network graph has no pointer cycles: stations and lines live in flat
//! arrays owned by [`crate::network::Network`], and every cross-reference
//! (a line's station list, a station's interchange partners) is a dense
//! integer index into one of those arrays. See spec.md §9 "Cyclic references
//! between lines and stations".

use std::fmt;

/// Index of a station within the network's station arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station#{}", self.0)
    }
}

/// Index of a line within the network's line arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u16);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line#{}", self.0)
    }
}

/// Index of a service pattern within its owning line's pattern list.
///
/// Scoped to a line: `PatternId(0)` on one line is unrelated to
/// `PatternId(0)` on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(pub u16);

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pattern#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(StationId(3).to_string(), "station#3");
        assert_eq!(LineId(1).to_string(), "line#1");
        assert_eq!(PatternId(0).to_string(), "pattern#0");
    }

    #[test]
    fn ordering_follows_inner_value() {
        assert!(StationId(1) < StationId(2));
        assert!(LineId(1) < LineId(2));
        assert!(PatternId(1) < PatternId(2));
    }
}
