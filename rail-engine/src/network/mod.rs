//! Network Assembler (spec.md §4.N).
//!
//! Fuses many per-line [`crate::loader::LineSpec`]s into one immutable
//! [`Network`] graph: station identity is unified across lines by
//! canonical name, codes are indexed (with collisions flagged rather than
//! rejected), intra-line edges are materialised with the weight preference
//! order from spec.md §4.N step 3, and service-pattern stop-sets are
//! resolved once and cached. `Network::build` is the explicit factory
//! named in spec.md §9 "Global state" — there is no implicit singleton;
//! callers wrap the returned value in `Arc` themselves, mirroring the
//! teacher's `AppState` which is built explicitly in `main`/tests and never
//! a `static`.

pub mod report;

use std::collections::HashMap;

use tracing::info;

use crate::domain::{
    Frequency, Line, LineId, LineStation, Position, ServicePattern, Station, StationId, StopSet,
};
use crate::loader::LineSpec;
use crate::pattern;
use crate::timetable::Timetable;

use report::{
    AssemblyReport, CodeCollision, CoordinateAnomaly, DanglingReference, DisconnectedComponent,
    EmptyPatternWarning,
};

/// Fatal build-time error: spec.md §7 "build-time errors are collected,
/// never fatal except when zero valid lines remain (`DATASET_EMPTY`,
/// fatal)".
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssemblyError {
    #[error("dataset contains zero valid line documents")]
    DatasetEmpty,

    #[error("internal consistency error during assembly: {0}")]
    Domain(#[from] crate::domain::DomainError),
}

/// An intra-line edge between two adjacent stations on the same line
/// (spec.md §3 "Network" / §4.N step 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntraEdge {
    pub line: LineId,
    pub a: StationId,
    pub b: StationId,
    pub weight_minutes: u32,
    /// Patterns of `line` that call at both `a` and `b` — at least one
    /// element, per spec.md §8 property 3 "Edge consistency".
    pub patterns: Vec<crate::domain::PatternId>,
}

/// A static tag-based interchange edge (spec.md §4.N step 4): connects a
/// station to the terminus of another line it names via an interchange
/// tag, when that line does not already carry an identically-named
/// station (which would mean the two are already the same physical
/// station post-unification).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterchangeEdge {
    pub a: StationId,
    pub b: StationId,
    pub cost_minutes: u32,
}

/// Transfer-penalty constants (spec.md §5, tunable at startup only).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferPenalties {
    /// Same-station line change.
    pub same_station_minutes: f64,
    /// Same-station change between two patterns of the *same* line (spec.md
    /// §5 "cross-platform within station"). Used by the Router when a path
    /// switches pattern without switching line (see DESIGN.md).
    pub cross_platform_minutes: f64,
    /// Default walking estimate for a tag-named interchange with no
    /// coordinate-based distance available.
    pub default_walk_minutes: f64,
    /// Walking speed used to convert Haversine distance to minutes for
    /// proximity-based transfers the Router considers at query time
    /// (spec.md §5: "3 min plus Haversine/3.6 km per min").
    pub walk_km_per_hour: f64,
}

impl Default for TransferPenalties {
    fn default() -> Self {
        Self {
            same_station_minutes: 4.0,
            cross_platform_minutes: 2.0,
            default_walk_minutes: 3.0,
            walk_km_per_hour: 3.6,
        }
    }
}

impl TransferPenalties {
    /// Minutes to walk `distance_km` at this profile's walking speed.
    pub fn walk_minutes(&self, distance_km: f64) -> f64 {
        (distance_km / self.walk_km_per_hour) * 60.0
    }
}

/// Whether a station code lookup is unique or ambiguous (spec.md §7
/// `CODE_COLLISION`: "subsequent lookups of that code return *ambiguous*").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeEntry {
    Unique(StationId),
    Ambiguous,
}

/// The process-wide, immutable routing graph (spec.md §3 "Network").
///
/// Built once via [`Network::build`] and shared read-only by all queries
/// (spec.md §5). Stations and lines live in flat arenas; every
/// cross-reference is a dense [`StationId`]/[`LineId`] index (spec.md §9).
#[derive(Debug, Clone)]
pub struct Network {
    stations: Vec<Station>,
    lines: Vec<Line>,
    patterns: Vec<Vec<ServicePattern>>,
    intra_edges: Vec<IntraEdge>,
    interchange_edges: Vec<InterchangeEdge>,
    station_lines: Vec<Vec<LineId>>,
    name_index: HashMap<String, StationId>,
    code_index: HashMap<String, CodeEntry>,
    timetable: Timetable,
    transfer_penalties: TransferPenalties,
}

impl Network {
    /// Builds the Network from a collection of validated line documents.
    /// Returns `DATASET_EMPTY` only if `specs` is empty; all other
    /// irregularities are collected into the returned [`AssemblyReport`]
    /// instead.
    #[tracing::instrument(skip_all, fields(lines = specs.len()))]
    pub fn build(specs: Vec<LineSpec>) -> Result<(Network, AssemblyReport), AssemblyError> {
        Self::build_with_penalties(specs, TransferPenalties::default())
    }

    pub fn build_with_penalties(
        specs: Vec<LineSpec>,
        transfer_penalties: TransferPenalties,
    ) -> Result<(Network, AssemblyReport), AssemblyError> {
        if specs.is_empty() {
            return Err(AssemblyError::DatasetEmpty);
        }

        let mut report = AssemblyReport::default();

        // Step 1: station unification by canonical name.
        let (stations, mut name_to_id) = unify_stations(&specs, &mut report);

        // Step 2: code table.
        let code_index = build_code_index(&stations, &mut report);

        // Step 3: build Line structs, resolving each LineStation to a
        // unified StationId, and resolve each pattern's stop-set.
        let mut lines = Vec::with_capacity(specs.len());
        let mut patterns = Vec::with_capacity(specs.len());

        for spec in &specs {
            let mut line_stations = Vec::with_capacity(spec.stations.len());
            for raw in &spec.stations {
                let canonical = canonicalize_name(&raw.name);
                let station_id = *name_to_id
                    .get(&canonical)
                    .expect("every raw station was inserted into name_to_id during unification");
                line_stations.push(LineStation {
                    station: Some(station_id),
                    morning: raw.morning.clone(),
                    afternoon: raw.afternoon.clone(),
                    evening: raw.evening.clone(),
                    night: raw.night.clone(),
                });
            }

            let mut line_patterns = Vec::with_capacity(spec.patterns.len());
            for pat in &spec.patterns {
                let (members, dangling) = pattern::stop_set_members(&spec.stations, &pat.stops);
                for reference in dangling {
                    report.dangling_references.push(DanglingReference {
                        line_name: spec.line_name.clone(),
                        pattern_name: pat.name.clone(),
                        reference,
                    });
                }
                let resolved_stops: Vec<StationId> = members
                    .iter()
                    .map(|&idx| line_stations[idx].station.unwrap())
                    .collect();
                if resolved_stops.is_empty() {
                    report.empty_pattern_warnings.push(EmptyPatternWarning {
                        line_name: spec.line_name.clone(),
                        pattern_name: pat.name.clone(),
                    });
                }
                let mut resolved = pat.clone();
                resolved.resolved_stops = Some(resolved_stops);
                line_patterns.push(resolved);
            }

            lines.push(Line {
                name: spec.line_name.clone(),
                description: spec.description.clone(),
                operator: spec.operator.clone(),
                color: spec.color.clone(),
                frequency: spec.frequency.clone(),
                stations: line_stations,
            });
            patterns.push(line_patterns);
        }

        // Step 4: station_lines index.
        let mut station_lines: Vec<Vec<LineId>> = vec![Vec::new(); stations.len()];
        for (line_idx, line) in lines.iter().enumerate() {
            let line_id = LineId(line_idx as u16);
            for ls in &line.stations {
                let id = ls.station.unwrap();
                let bucket = &mut station_lines[id.0 as usize];
                if !bucket.contains(&line_id) {
                    bucket.push(line_id);
                }
            }
        }

        // Step 5: intra-line adjacency materialisation.
        let intra_edges = materialise_adjacency(&specs, &lines, &patterns, &stations)?;

        // Step 6: tag-based interchange edges.
        let interchange_edges = materialise_interchange(&stations, &lines, &transfer_penalties);

        // Step 7: disconnected components.
        report.disconnected_components =
            find_disconnected_components(stations.len(), &intra_edges, &interchange_edges);

        // Step 8: timetable index.
        let timetable = Timetable::build(&lines).expect(
            "line document times were already validated as parseable HH:MM by the loader",
        );

        let network = Network {
            stations,
            lines,
            patterns,
            intra_edges,
            interchange_edges,
            station_lines,
            name_index: std::mem::take(&mut name_to_id),
            code_index,
            timetable,
            transfer_penalties,
        };

        info!(
            stations = network.stations.len(),
            lines = network.lines.len(),
            intra_edges = network.intra_edges.len(),
            interchange_edges = network.interchange_edges.len(),
            dangling_references = report.dangling_references.len(),
            code_collisions = report.code_collisions.len(),
            disconnected_components = report.disconnected_components.len(),
            "network assembled"
        );

        Ok((network, report))
    }

    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.0 as usize]
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0 as usize]
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn patterns(&self, line: LineId) -> &[ServicePattern] {
        &self.patterns[line.0 as usize]
    }

    pub fn pattern(&self, line: LineId, pattern: crate::domain::PatternId) -> &ServicePattern {
        &self.patterns[line.0 as usize][pattern.0 as usize]
    }

    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    pub fn transfer_penalties(&self) -> &TransferPenalties {
        &self.transfer_penalties
    }

    /// Lines calling at `station` (spec.md §3 "Pattern membership" is
    /// answered in O(1) via this plus each pattern's `resolved_stops`).
    pub fn lines_at(&self, station: StationId) -> &[LineId] {
        &self.station_lines[station.0 as usize]
    }

    /// Resolves a `StationRef` (spec.md §6): canonical name first, then
    /// code if unambiguous. Returns `None` for an unresolved or ambiguous
    /// reference.
    pub fn resolve_station_ref(&self, reference: &str) -> Option<StationId> {
        let canonical = canonicalize_name(reference);
        if let Some(&id) = self.name_index.get(&canonical) {
            return Some(id);
        }
        match self.code_index.get(reference) {
            Some(CodeEntry::Unique(id)) => Some(*id),
            _ => None,
        }
    }

    /// Intra-line neighbours of `station` on `line`, as
    /// `(neighbour, weight_minutes, patterns)` triples (edges are stored
    /// undirected; both directions are surfaced here).
    pub fn intra_neighbours(
        &self,
        line: LineId,
        station: StationId,
    ) -> Vec<(StationId, u32, &[crate::domain::PatternId])> {
        self.intra_edges
            .iter()
            .filter(|e| e.line == line && (e.a == station || e.b == station))
            .map(|e| {
                let neighbour = if e.a == station { e.b } else { e.a };
                (neighbour, e.weight_minutes, e.patterns.as_slice())
            })
            .collect()
    }

    pub fn intra_edges(&self) -> &[IntraEdge] {
        &self.intra_edges
    }

    pub fn interchange_edges(&self) -> &[InterchangeEdge] {
        &self.interchange_edges
    }

    /// Other stations within `max_km` of `station`'s centroid (spec.md §5
    /// "walking interchange between nearby stations", §6 `max_walk_km`), as
    /// `(station, distance_km)` pairs. Computed at query time via Haversine
    /// distance rather than precomputed at build time, since `max_walk_km`
    /// is a per-query tunable (spec.md §6), not a fixed assembly parameter.
    pub fn nearby_stations(&self, station: StationId, max_km: f64) -> Vec<(StationId, f64)> {
        let origin = self.stations[station.0 as usize].position;
        self.stations
            .iter()
            .enumerate()
            .filter_map(|(idx, candidate)| {
                let id = StationId(idx as u32);
                if id == station {
                    return None;
                }
                let distance_km = origin.haversine_km(&candidate.position);
                (distance_km <= max_km).then_some((id, distance_km))
            })
            .collect()
    }

    /// Tag-based interchange partners of `station`.
    pub fn interchange_partners(&self, station: StationId) -> Vec<(StationId, u32)> {
        self.interchange_edges
            .iter()
            .filter_map(|e| {
                if e.a == station {
                    Some((e.b, e.cost_minutes))
                } else if e.b == station {
                    Some((e.a, e.cost_minutes))
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Canonicalises a station name for cross-line unification (spec.md §4.N
/// step 1): trims and collapses internal whitespace, preserving case. A
/// full Unicode NFC pass is not applied — no NFC crate is in the
/// dependency stack and shipped line documents are plain ASCII/Latin-1
/// station names — see DESIGN.md.
pub fn canonicalize_name(name: &str) -> String {
    pattern::normalize_whitespace(name.trim())
}

fn unify_stations(
    specs: &[LineSpec],
    report: &mut AssemblyReport,
) -> (Vec<Station>, HashMap<String, StationId>) {
    struct Group {
        entries: Vec<(f64, f64, Option<String>, Vec<String>, u16)>,
    }

    let mut groups: HashMap<String, Group> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (line_idx, spec) in specs.iter().enumerate() {
        for raw in &spec.stations {
            let canonical = canonicalize_name(&raw.name);
            let group = groups.entry(canonical.clone()).or_insert_with(|| {
                order.push(canonical.clone());
                Group { entries: Vec::new() }
            });
            group.entries.push((
                raw.lat,
                raw.lng,
                raw.code.clone(),
                raw.interchange.clone(),
                line_idx as u16,
            ));
        }
    }

    let mut stations = Vec::with_capacity(order.len());
    let mut name_to_id = HashMap::with_capacity(order.len());

    for (idx, canonical) in order.into_iter().enumerate() {
        let id = StationId(idx as u32);
        let group = groups.remove(&canonical).unwrap();

        let mean_lat = group.entries.iter().map(|e| e.0).sum::<f64>() / group.entries.len() as f64;
        let mean_lng = group.entries.iter().map(|e| e.1).sum::<f64>() / group.entries.len() as f64;
        let centroid = Position { lat: mean_lat, lng: mean_lng };

        let max_spread_km = group
            .entries
            .iter()
            .map(|e| Position { lat: e.0, lng: e.1 }.haversine_km(&centroid))
            .fold(0.0_f64, f64::max);

        let position = if max_spread_km <= 0.5 {
            centroid
        } else {
            report.coordinate_anomalies.push(CoordinateAnomaly {
                station_name: canonical.clone(),
                spread_km: max_spread_km,
            });
            // Keep the entry belonging to the line index that appears most
            // often among this group's entries (spec.md §4.N step 1:
            // "the entry with the most line-memberships").
            let mut counts: HashMap<u16, usize> = HashMap::new();
            for e in &group.entries {
                *counts.entry(e.4).or_insert(0) += 1;
            }
            let majority_line = *counts.iter().max_by_key(|(_, c)| **c).unwrap().0;
            let chosen = group
                .entries
                .iter()
                .find(|e| e.4 == majority_line)
                .unwrap();
            Position { lat: chosen.0, lng: chosen.1 }
        };

        let code = group
            .entries
            .iter()
            .find_map(|e| e.2.clone())
            .map(|c| crate::domain::Code::parse(&c))
            .transpose()
            .unwrap_or(None);

        let zone = None;
        let mut interchange: Vec<String> = Vec::new();
        for e in &group.entries {
            for tag in &e.3 {
                if !interchange.contains(tag) {
                    interchange.push(tag.clone());
                }
            }
        }

        stations.push(Station {
            name: canonical.clone(),
            code,
            position,
            zone,
            interchange,
        });
        name_to_id.insert(canonical, id);
    }

    (stations, name_to_id)
}

fn build_code_index(stations: &[Station], report: &mut AssemblyReport) -> HashMap<String, CodeEntry> {
    let mut by_code: HashMap<String, Vec<StationId>> = HashMap::new();
    for (idx, station) in stations.iter().enumerate() {
        if let Some(code) = &station.code {
            by_code
                .entry(code.as_str().to_string())
                .or_default()
                .push(StationId(idx as u32));
        }
    }

    let mut index = HashMap::with_capacity(by_code.len());
    for (code, ids) in by_code {
        if ids.len() == 1 {
            index.insert(code, CodeEntry::Unique(ids[0]));
        } else {
            let names: Vec<String> = ids.iter().map(|id| stations[id.0 as usize].name.clone()).collect();
            report.code_collisions.push(CodeCollision { code: code.clone(), stations: names });
            index.insert(code, CodeEntry::Ambiguous);
        }
    }
    index
}

fn materialise_adjacency(
    specs: &[LineSpec],
    lines: &[Line],
    patterns: &[Vec<ServicePattern>],
    stations: &[Station],
) -> Result<Vec<IntraEdge>, crate::domain::DomainError> {
    let mut edges = Vec::new();

    for (line_idx, line) in lines.iter().enumerate() {
        let line_id = LineId(line_idx as u16);
        let spec = &specs[line_idx];
        let line_patterns = &patterns[line_idx];

        let typical: HashMap<String, u32> = spec.typical_journey_times.iter().cloned().collect();

        for (pos, window) in line.stations.windows(2).enumerate() {
            let u_station_id = window[0].station.unwrap();
            let v_station_id = window[1].station.unwrap();

            let mut calling_patterns = Vec::new();
            for (i, p) in line_patterns.iter().enumerate() {
                if p.calls_at(u_station_id)? && p.calls_at(v_station_id)? {
                    calling_patterns.push(crate::domain::PatternId(i as u16));
                }
            }

            if calling_patterns.is_empty() {
                continue;
            }

            let weight = compute_weight(
                &spec.stations[pos],
                &spec.stations[pos + 1],
                &typical,
                stations[u_station_id.0 as usize].position,
                stations[v_station_id.0 as usize].position,
            );

            edges.push(IntraEdge {
                line: line_id,
                a: u_station_id,
                b: v_station_id,
                weight_minutes: weight,
                patterns: calling_patterns,
            });
        }
    }

    Ok(edges)
}

fn compute_weight(
    u: &crate::loader::RawStation,
    v: &crate::loader::RawStation,
    typical: &HashMap<String, u32>,
    u_pos: Position,
    v_pos: Position,
) -> u32 {
    // (a) typical_journey_times, trying both orderings and both name/code
    // forms (spec.md §4.N step 3 weight preference (a)).
    let u_refs = [Some(u.name.as_str()), u.code.as_deref()];
    let v_refs = [Some(v.name.as_str()), v.code.as_deref()];
    for ur in u_refs.into_iter().flatten() {
        for vr in v_refs.into_iter().flatten() {
            if let Some(&minutes) = typical.get(&format!("{ur}-{vr}")) {
                return clamp_weight(minutes);
            }
            if let Some(&minutes) = typical.get(&format!("{vr}-{ur}")) {
                return clamp_weight(minutes);
            }
        }
    }

    // (b) smallest positive difference of scheduled departure times at u
    // and v across day-classes.
    if let Some(minutes) = smallest_time_diff(u, v) {
        return clamp_weight(minutes);
    }

    // (c) Haversine distance x 2.0 min/km, floor 1 min.
    let km = u_pos.haversine_km(&v_pos);
    clamp_weight((km * 2.0).round().max(1.0) as u32)
}

fn smallest_time_diff(u: &crate::loader::RawStation, v: &crate::loader::RawStation) -> Option<u32> {
    let classes = [
        (&u.morning, &v.morning),
        (&u.afternoon, &v.afternoon),
        (&u.evening, &v.evening),
        (&u.night, &v.night),
    ];

    let mut best: Option<u32> = None;
    for (ut, vt) in classes {
        let u_refs: Vec<&str> = ut.iter().map(String::as_str).collect();
        let v_refs: Vec<&str> = vt.iter().map(String::as_str).collect();
        let Ok(u_parsed) = crate::domain::parse_time_sequence(&u_refs) else { continue };
        let Ok(v_parsed) = crate::domain::parse_time_sequence(&v_refs) else { continue };
        for (_, um) in &u_parsed {
            for (_, vm) in &v_parsed {
                let diff = (vm - um).abs();
                if diff > 0 {
                    best = Some(best.map_or(diff as u32, |b| b.min(diff as u32)));
                }
            }
        }
    }
    best
}

fn clamp_weight(minutes: u32) -> u32 {
    minutes.clamp(1, 240)
}

fn materialise_interchange(
    stations: &[Station],
    lines: &[Line],
    penalties: &TransferPenalties,
) -> Vec<InterchangeEdge> {
    let mut edges = Vec::new();
    let cost = (penalties.same_station_minutes + penalties.default_walk_minutes).round() as u32;

    for (idx, station) in stations.iter().enumerate() {
        let this_id = StationId(idx as u32);
        for tag in &station.interchange {
            for line in lines {
                if !line.name.eq_ignore_ascii_case(tag) {
                    continue;
                }
                let already_on_line = line.stations.iter().any(|ls| ls.station == Some(this_id));
                if already_on_line {
                    continue;
                }
                if let (Some(first), Some(last)) =
                    (line.stations.first(), line.stations.last())
                {
                    for terminus in [first.station, last.station].into_iter().flatten() {
                        if terminus == this_id {
                            continue;
                        }
                        let edge = InterchangeEdge { a: this_id, b: terminus, cost_minutes: cost };
                        if !edges.contains(&edge) {
                            edges.push(edge);
                        }
                    }
                }
            }
        }
    }

    edges
}

fn find_disconnected_components(
    station_count: usize,
    intra_edges: &[IntraEdge],
    interchange_edges: &[InterchangeEdge],
) -> Vec<DisconnectedComponent> {
    let mut parent: Vec<usize> = (0..station_count).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }

    fn union(parent: &mut [usize], a: usize, b: usize) {
        let ra = find(parent, a);
        let rb = find(parent, b);
        if ra != rb {
            parent[ra] = rb;
        }
    }

    for e in intra_edges {
        union(&mut parent, e.a.0 as usize, e.b.0 as usize);
    }
    for e in interchange_edges {
        union(&mut parent, e.a.0 as usize, e.b.0 as usize);
    }

    let mut groups: HashMap<usize, Vec<StationId>> = HashMap::new();
    for i in 0..station_count {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(StationId(i as u32));
    }

    let mut components: Vec<DisconnectedComponent> = groups
        .into_values()
        .map(|stations| DisconnectedComponent { stations })
        .collect();
    components.sort_by_key(|c| c.stations.first().copied().unwrap_or(StationId(0)));
    components
}
