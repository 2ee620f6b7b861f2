//! Service Pattern Resolver (spec.md §4.S).
//!
//! Given `(line's stations, pattern, station index within that line)`,
//! decides whether the pattern calls at that station. Pure and
//! deterministic: the Network Assembler calls this once per (line,
//! pattern, station) triple during assembly and caches the result, per
//! spec.md §4.S "The resolver is pure and deterministic; its result table
//! is cached by the Assembler for the lifetime of the `Network`."

use crate::domain::StopSet;
use crate::loader::RawStation;

/// Whether a pattern calls at a given station of its own line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Calls,
    Skips,
    /// The station does not belong to this line at all.
    Unknown,
}

/// Collapses internal whitespace runs to a single space and trims the
/// ends — the normalisation tier-4 match in resolution rule 2, and also
/// the normalisation the Network Assembler applies to station names
/// before unification (spec.md §4.N step 1).
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolves a pattern's stop-set against a line's station list, returning
/// the indices (into `stations`) of every reference that matched, and the
/// raw references that matched nothing (*dangling*, spec.md §3
/// "ServicePattern" invariant).
///
/// Matching order per spec.md §4.S rule 2: code equality, then exact name,
/// then case-insensitive name, then whitespace-normalised name. First
/// successful tier wins; within a tier the first matching station wins.
pub fn stop_set_members(stations: &[RawStation], stops: &StopSet) -> (Vec<usize>, Vec<String>) {
    match stops {
        StopSet::All => ((0..stations.len()).collect(), Vec::new()),
        StopSet::Explicit(refs) => {
            let mut members = Vec::new();
            let mut dangling = Vec::new();
            for reference in refs {
                match find_station(stations, reference) {
                    Some(idx) => members.push(idx),
                    None => dangling.push(reference.clone()),
                }
            }
            (members, dangling)
        }
    }
}

fn find_station(stations: &[RawStation], reference: &str) -> Option<usize> {
    if let Some(idx) = stations
        .iter()
        .position(|s| s.code.as_deref() == Some(reference))
    {
        return Some(idx);
    }
    if let Some(idx) = stations.iter().position(|s| s.name == reference) {
        return Some(idx);
    }
    if let Some(idx) = stations
        .iter()
        .position(|s| s.name.eq_ignore_ascii_case(reference))
    {
        return Some(idx);
    }
    let normalized_ref = normalize_whitespace(reference);
    stations
        .iter()
        .position(|s| normalize_whitespace(&s.name) == normalized_ref)
}

/// Resolves `(stations, pattern, station_idx)` to a [`Resolution`]
/// (spec.md §4.S resolution rule 4).
pub fn resolve(stations: &[RawStation], stops: &StopSet, station_idx: usize) -> Resolution {
    if station_idx >= stations.len() {
        return Resolution::Unknown;
    }
    let (members, _) = stop_set_members(stations, stops);
    if members.contains(&station_idx) {
        Resolution::Calls
    } else {
        Resolution::Skips
    }
}
