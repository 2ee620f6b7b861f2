//! Domain types for the rail journey planning engine.
//!
//! This module contains the core domain model types that represent
//! validated network data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod error;
mod ids;
mod journey;
mod leg;
mod line;
mod pattern;
mod station;
mod time;

pub use error::DomainError;
pub use ids::{LineId, PatternId, StationId};
pub use journey::{Journey, TrailingWalk, Transfer, TrivialJourney};
pub use leg::Leg;
pub use line::{Frequency, Line, LineStation};
pub use pattern::{ServicePattern, StopSet};
pub use station::{Code, InvalidCode, Position, Station};
pub use time::{DayClass, TimeError, WallTime, compare_effective, parse_time_sequence};
