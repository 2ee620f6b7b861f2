//! The Router (spec.md §4.R): a time-dependent, transfer-penalised
//! label-setting search over [`Network`].
//!
//! State at a label is `(station, arrival_time, current_line_or_none,
//! transfers_so_far)`, per spec.md §4.R, augmented here with the pattern
//! currently ridden — see "Open Question decisions" in DESIGN.md for why:
//! in short, the Journey Formatter's `Leg` carries exactly one pattern, and
//! tracking it on the label is the simplest way to assemble legs correctly
//! without re-deriving it after the fact. Dominance itself still compares
//! only `(time, transfers)`, exactly as spec.md §4.R states, so the extra
//! bookkeeping never creates additional non-dominated states.
//!
//! Reaching a neighbour station happens one of two ways:
//! - **Continuing** a ride: the current pattern also calls at the
//!   neighbour, so no new departure lookup or penalty is needed.
//! - **Boarding** (the initial boarding, a genuine line change, or a
//!   same-line pattern swap i.e. a platform change): look up the next
//!   timetabled departure at or after `time + penalty`, then ride to the
//!   neighbour.
//!
//! Both cases are modelled as one `Hop`; a leg boundary falls wherever a
//! `Hop::is_new_board` hop follows another hop (or starts the journey).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::instrument;

use crate::domain::{
    DayClass, DomainError, Journey, Leg, LineId, PatternId, StationId, TrailingWalk, Transfer,
};
use crate::network::Network;

use super::cancel::CancellationToken;
use super::config::SearchConfig;
use super::rank::{deduplicate, rank_journeys, remove_dominated};

/// Which end of the trip the query datetime anchors (spec.md §6 `when`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    DepartAfter(i32),
    ArriveBefore(i32),
}

/// Why the router found no journey (spec.md §7 `NO_REACHABLE_PATH`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPathReason {
    NoReachablePath,
}

/// The result of one [`Router::route`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Origin and destination are the same station (spec.md §4.R
    /// "Edge-case policies").
    Trivial,
    /// At least one journey was found. `partial` is set when cancellation
    /// cut the search short (spec.md §5 "marked `PARTIAL`").
    Found { journeys: Vec<Journey>, partial: bool },
    NoPath(NoPathReason),
}

/// One [`Router::route`] call's parameters, analogous to the teacher's
/// `SearchRequest`.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest {
    pub origin: StationId,
    pub destination: StationId,
    pub when: When,
    /// Day-class filter applied to every timetable lookup during this
    /// search (spec.md §6: derived from the query datetime's wall-clock
    /// hour). Held constant for the whole search rather than re-derived
    /// per hop as wall-clock time advances — a deliberate simplification,
    /// see DESIGN.md.
    pub day_class: Option<DayClass>,
}

/// What kind of transition a [`Hop`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HopKind {
    /// Riding `line`'s `pattern` between two adjacent stations.
    Ride { line: LineId, pattern: PatternId },
    /// A tag-based or proximity walking interchange (spec.md §4.R, §5, §6
    /// `max_walk_km`): no line is ridden, the label just relocates to
    /// `to_station` at `cost` minutes, always ending the current leg.
    Interchange,
}

#[derive(Debug, Clone, Copy)]
struct Hop {
    kind: HopKind,
    from_station: StationId,
    board_time: i32,
    to_station: StationId,
    arrival_time: i32,
    is_new_board: bool,
}

#[derive(Debug, Clone)]
struct LabelRecord {
    station: StationId,
    time: i32,
    transfers: u32,
    current: Option<(LineId, PatternId)>,
    parent: Option<usize>,
    hop: Option<Hop>,
}

/// Multi-criteria shortest-path search over an assembled [`Network`]
/// (spec.md §4.R). Holds only a shared reference: all query-time state
/// (the label arena, dominance frontiers, heap) lives on the stack of one
/// `route` call and is never shared across queries (spec.md §5).
pub struct Router<'n> {
    network: &'n Network,
    config: SearchConfig,
}

impl<'n> Router<'n> {
    pub fn new(network: &'n Network, config: SearchConfig) -> Self {
        Self { network, config }
    }

    /// Runs the search and returns a ranked, deduplicated, Pareto-pruned
    /// candidate list (spec.md §4.R "Goal").
    #[instrument(skip(self, cancellation), fields(origin = %request.origin, destination = %request.destination))]
    pub fn route(&self, request: &PlanRequest, cancellation: &CancellationToken) -> PlanOutcome {
        if request.origin == request.destination {
            return PlanOutcome::Trivial;
        }

        let (start_time, arrive_before) = match request.when {
            When::DepartAfter(t) => (t, None),
            When::ArriveBefore(t) => ((t - self.config.horizon_minutes).max(0), Some(t)),
        };

        let mut found = Vec::new();
        let partial = self.search(request, start_time, cancellation, &mut |journey| {
            found.push(journey);
        });

        if let Some(deadline) = arrive_before {
            found.retain(|j: &Journey| j.arrival_time() <= deadline);
        }

        if found.is_empty() {
            return PlanOutcome::NoPath(NoPathReason::NoReachablePath);
        }

        let ranked = rank_journeys(deduplicate(remove_dominated(found)));
        let ranked = ranked.into_iter().take(self.config.max_results).collect();
        PlanOutcome::Found { journeys: ranked, partial }
    }

    /// Streaming variant of [`Router::route`] (spec.md §4.Q, §9
    /// "Coroutine-style streaming"): invokes `on_journey` for each
    /// non-dominated destination label as it is discovered, in
    /// non-decreasing arrival-time order, without the final rank/dedup pass
    /// `route` applies. The `query` module wraps this in a channel so
    /// callers can consume journeys as they arrive.
    pub fn route_streaming(
        &self,
        request: &PlanRequest,
        cancellation: &CancellationToken,
        on_journey: &mut dyn FnMut(Journey),
    ) {
        if request.origin == request.destination {
            return;
        }
        let start_time = match request.when {
            When::DepartAfter(t) => t,
            When::ArriveBefore(t) => (t - self.config.horizon_minutes).max(0),
        };
        self.search(request, start_time, cancellation, on_journey);
    }

    /// Runs the core label-setting sweep, invoking `on_destination` for
    /// every non-dominated label reached at `request.destination`, in
    /// non-decreasing arrival-time order (spec.md §5 "Ordering
    /// guarantees"). Returns `true` if cancellation cut the sweep short.
    fn search(
        &self,
        request: &PlanRequest,
        start_time: i32,
        cancellation: &CancellationToken,
        on_destination: &mut dyn FnMut(Journey),
    ) -> bool {
        let horizon_end = start_time + self.config.horizon_minutes;

        let mut labels: Vec<LabelRecord> = Vec::new();
        let mut frontier: HashMap<StationId, Vec<usize>> = HashMap::new();
        let mut heap: BinaryHeap<Reverse<(i32, u32, usize)>> = BinaryHeap::new();

        let origin_label = LabelRecord {
            station: request.origin,
            time: start_time,
            transfers: 0,
            current: None,
            parent: None,
            hop: None,
        };
        labels.push(origin_label);
        frontier.insert(request.origin, vec![0]);
        heap.push(Reverse((start_time, 0, 0)));

        while let Some(Reverse((time, transfers, idx))) = heap.pop() {
            if cancellation.is_cancelled() {
                return true;
            }
            if !frontier.get(&labels[idx].station).is_some_and(|f| f.contains(&idx)) {
                continue;
            }
            debug_assert_eq!(labels[idx].time, time);
            debug_assert_eq!(labels[idx].transfers, transfers);

            if labels[idx].station == request.destination {
                let journey = self
                    .build_journey(&labels, idx)
                    .expect("label chain satisfies Journey::new's invariants by construction");
                on_destination(journey);
            }

            self.expand(idx, &labels[idx].clone(), horizon_end, request.day_class, &mut labels, &mut frontier, &mut heap);
        }

        false
    }

    fn expand(
        &self,
        idx: usize,
        label: &LabelRecord,
        horizon_end: i32,
        day_class: Option<DayClass>,
        labels: &mut Vec<LabelRecord>,
        frontier: &mut HashMap<StationId, Vec<usize>>,
        heap: &mut BinaryHeap<Reverse<(i32, u32, usize)>>,
    ) {
        let penalties = self.network.transfer_penalties();

        // Continue riding the current pattern with no new departure lookup.
        if let Some((line, pattern)) = label.current {
            for (neighbour, weight, patterns) in self.network.intra_neighbours(line, label.station) {
                if !patterns.contains(&pattern) {
                    continue;
                }
                let arrival = label.time + weight as i32;
                if arrival > horizon_end {
                    continue;
                }
                let hop = Hop {
                    kind: HopKind::Ride { line, pattern },
                    from_station: label.station,
                    board_time: label.time,
                    to_station: neighbour,
                    arrival_time: arrival,
                    is_new_board: false,
                };
                self.push_label(
                    LabelRecord {
                        station: neighbour,
                        time: arrival,
                        transfers: label.transfers,
                        current: Some((line, pattern)),
                        parent: Some(idx),
                        hop: Some(hop),
                    },
                    labels,
                    frontier,
                    heap,
                );
            }
        }

        // Board (first boarding, a line change, or a same-line platform
        // change), per spec.md §4.R "For each line L' ... also serving X".
        for &line in self.network.lines_at(label.station) {
            let is_change = label.current.is_some();
            let same_line = label.current.map(|(l, _)| l) == Some(line);

            if is_change {
                if label.transfers >= self.config.max_transfers {
                    continue;
                }
            }

            let penalty_minutes = match label.current {
                None => 0.0,
                Some(_) if same_line => penalties.cross_platform_minutes,
                Some(_) => penalties.same_station_minutes,
            };
            let depart_after = label.time + penalty_minutes.round() as i32;

            let Some(departure) =
                self.network.timetable().next_departure(line, label.station, depart_after, day_class)
            else {
                continue;
            };
            if departure > horizon_end {
                continue;
            }

            for (neighbour, weight, patterns) in self.network.intra_neighbours(line, label.station) {
                let Some(&pattern) = patterns.first() else { continue };
                let arrival = departure + weight as i32;
                if arrival > horizon_end {
                    continue;
                }
                let new_transfers = if is_change { label.transfers + 1 } else { label.transfers };
                let hop = Hop {
                    kind: HopKind::Ride { line, pattern },
                    from_station: label.station,
                    board_time: departure,
                    to_station: neighbour,
                    arrival_time: arrival,
                    is_new_board: true,
                };
                self.push_label(
                    LabelRecord {
                        station: neighbour,
                        time: arrival,
                        transfers: new_transfers,
                        current: Some((line, pattern)),
                        parent: Some(idx),
                        hop: Some(hop),
                    },
                    labels,
                    frontier,
                    heap,
                );
            }
        }

        // Tag-based interchange (spec.md §3 line 44, §4.N step 4): two
        // stations linked only by an interchange tag are routable, matching
        // the assembly report's union-find which already treats them as
        // connected. Only offered once a leg is actually underway
        // (`label.current.is_some()`), so it always closes a real ride; the
        // boarding that may follow opens the next leg, or, if none follows,
        // the closed ride's alighting plus this hop's cost is surfaced as
        // the journey's trailing walk — see `build_journey`.
        if label.current.is_some() && label.transfers < self.config.max_transfers {
            for (neighbour, cost_minutes) in self.network.interchange_partners(label.station) {
                self.push_interchange(idx, label, neighbour, cost_minutes as i32, horizon_end, labels, frontier, heap);
            }

            // Proximity walking interchange (spec.md §5 "walking
            // interchange between nearby stations", §6 `max_walk_km`).
            for (neighbour, distance_km) in
                self.network.nearby_stations(label.station, self.config.max_walk_km)
            {
                let cost = (penalties.default_walk_minutes + penalties.walk_minutes(distance_km)).round() as i32;
                self.push_interchange(idx, label, neighbour, cost, horizon_end, labels, frontier, heap);
            }
        }
    }

    /// Pushes an [`HopKind::Interchange`] transition from `label` to
    /// `neighbour`, costing `cost_minutes` and counting as one transfer.
    #[allow(clippy::too_many_arguments)]
    fn push_interchange(
        &self,
        idx: usize,
        label: &LabelRecord,
        neighbour: StationId,
        cost_minutes: i32,
        horizon_end: i32,
        labels: &mut Vec<LabelRecord>,
        frontier: &mut HashMap<StationId, Vec<usize>>,
        heap: &mut BinaryHeap<Reverse<(i32, u32, usize)>>,
    ) {
        let arrival = label.time + cost_minutes;
        if arrival > horizon_end {
            return;
        }
        let hop = Hop {
            kind: HopKind::Interchange,
            from_station: label.station,
            board_time: label.time,
            to_station: neighbour,
            arrival_time: arrival,
            is_new_board: true,
        };
        self.push_label(
            LabelRecord {
                station: neighbour,
                time: arrival,
                transfers: label.transfers + 1,
                current: None,
                parent: Some(idx),
                hop: Some(hop),
            },
            labels,
            frontier,
            heap,
        );
    }

    /// Inserts `candidate` into the Pareto frontier at its station iff no
    /// existing label there dominates it (spec.md §4.R "Label dominance"),
    /// removing any labels `candidate` itself dominates.
    fn push_label(
        &self,
        candidate: LabelRecord,
        labels: &mut Vec<LabelRecord>,
        frontier: &mut HashMap<StationId, Vec<usize>>,
        heap: &mut BinaryHeap<Reverse<(i32, u32, usize)>>,
    ) {
        fn dominates(a: (i32, u32), b: (i32, u32)) -> bool {
            a.0 <= b.0 && a.1 <= b.1 && (a.0 < b.0 || a.1 < b.1)
        }

        let station = candidate.station;
        let key = (candidate.time, candidate.transfers);
        let existing = frontier.entry(station).or_default();

        if existing.iter().any(|&i| dominates((labels[i].time, labels[i].transfers), key)) {
            return;
        }
        existing.retain(|&i| !dominates(key, (labels[i].time, labels[i].transfers)));

        let idx = labels.len();
        labels.push(candidate);
        frontier.get_mut(&station).unwrap().push(idx);
        heap.push(Reverse((key.0, key.1, idx)));
    }

    /// Reconstructs a [`Journey`] by walking a label's parent chain back to
    /// the origin, grouping consecutive hops into legs at every
    /// `is_new_board` boundary (spec.md §4.J).
    fn build_journey(&self, labels: &[LabelRecord], destination_idx: usize) -> Result<Journey, DomainError> {
        let mut hops = Vec::new();
        let mut cursor = Some(destination_idx);
        while let Some(idx) = cursor {
            if let Some(hop) = labels[idx].hop {
                hops.push(hop);
            }
            cursor = labels[idx].parent;
        }
        hops.reverse();

        struct LegBuilder {
            line: LineId,
            pattern: PatternId,
            board_station: StationId,
            board_time: i32,
            calling_points: Vec<StationId>,
            alight_time: i32,
        }

        /// Set when an `Interchange` hop closes a leg without immediately
        /// opening the next one, consumed either by the `Ride` hop that
        /// follows (producing a `Transfer`) or, if the hop chain ends here,
        /// by a trailing walk past the journey's last ride.
        struct PendingClose {
            alight_station: StationId,
            arrive_from_line: LineId,
            leg_alight_time: i32,
            walk_to_station: StationId,
            walk_arrival_time: i32,
        }

        let mut legs = Vec::new();
        let mut transfers = Vec::new();
        let mut current: Option<LegBuilder> = None;
        let mut pending_close: Option<PendingClose> = None;

        for hop in hops {
            match hop.kind {
                HopKind::Ride { line, pattern } => {
                    if hop.is_new_board {
                        if let Some(pending) = pending_close.take() {
                            transfers.push(Transfer {
                                at_station: pending.alight_station,
                                board_station: hop.from_station,
                                arrive_from_line: pending.arrive_from_line,
                                depart_on_line: line,
                                wait_minutes: hop.board_time - pending.leg_alight_time,
                            });
                        } else if let Some(builder) = current.take() {
                            let alight_station = *builder.calling_points.last().unwrap();
                            let leg = Leg::new(
                                builder.line,
                                builder.pattern,
                                builder.board_station,
                                builder.board_time,
                                alight_station,
                                builder.alight_time,
                                builder.calling_points,
                            )?;
                            transfers.push(Transfer {
                                at_station: hop.from_station,
                                board_station: hop.from_station,
                                arrive_from_line: leg.line(),
                                depart_on_line: line,
                                wait_minutes: hop.board_time - leg.alight_time(),
                            });
                            legs.push(leg);
                        }
                        current = Some(LegBuilder {
                            line,
                            pattern,
                            board_station: hop.from_station,
                            board_time: hop.board_time,
                            calling_points: vec![hop.from_station, hop.to_station],
                            alight_time: hop.arrival_time,
                        });
                    } else {
                        let builder = current
                            .as_mut()
                            .expect("a continuing hop always follows an is_new_board hop");
                        builder.calling_points.push(hop.to_station);
                        builder.alight_time = hop.arrival_time;
                    }
                }
                HopKind::Interchange => {
                    let builder = current.take().expect(
                        "an interchange hop only ever follows a ride hop (see Router::expand)",
                    );
                    let alight_station = *builder.calling_points.last().unwrap();
                    let leg = Leg::new(
                        builder.line,
                        builder.pattern,
                        builder.board_station,
                        builder.board_time,
                        alight_station,
                        builder.alight_time,
                        builder.calling_points,
                    )?;
                    pending_close = Some(PendingClose {
                        alight_station,
                        arrive_from_line: leg.line(),
                        leg_alight_time: leg.alight_time(),
                        walk_to_station: hop.to_station,
                        walk_arrival_time: hop.arrival_time,
                    });
                    legs.push(leg);
                }
            }
        }

        let mut trailing_walk = None;
        if let Some(builder) = current.take() {
            let alight_station = *builder.calling_points.last().unwrap();
            let leg = Leg::new(
                builder.line,
                builder.pattern,
                builder.board_station,
                builder.board_time,
                alight_station,
                builder.alight_time,
                builder.calling_points,
            )?;
            legs.push(leg);
        } else if let Some(pending) = pending_close.take() {
            // The journey ends with a walk/interchange past the last ride:
            // the destination is itself only an interchange partner of the
            // last rail-served station, so no further boarding was needed
            // (spec.md §3 "Interchange edges").
            trailing_walk = Some(TrailingWalk {
                to_station: pending.walk_to_station,
                arrival_time: pending.walk_arrival_time,
            });
        }

        Journey::new_with_trailing_walk(legs, transfers, trailing_walk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, ServicePattern, StopSet};
    use crate::loader::{LineSpec, RawStation};

    fn raw(name: &str, code: &str, lat: f64, lng: f64, morning: Vec<&str>) -> RawStation {
        raw_tagged(name, code, lat, lng, morning, vec![])
    }

    fn raw_tagged(
        name: &str,
        code: &str,
        lat: f64,
        lng: f64,
        morning: Vec<&str>,
        interchange: Vec<&str>,
    ) -> RawStation {
        RawStation {
            name: name.to_string(),
            code: Some(code.to_string()),
            lat,
            lng,
            zone: None,
            interchange: interchange.into_iter().map(String::from).collect(),
            morning: morning.into_iter().map(String::from).collect(),
            afternoon: vec![],
            evening: vec![],
            night: vec![],
        }
    }

    fn stopping(name: &str) -> ServicePattern {
        ServicePattern {
            name: name.to_string(),
            service_type: None,
            description: "All stations".into(),
            stops: StopSet::All,
            typical_journey_time_minutes: None,
            frequency: None,
            peak_frequency: None,
            off_peak_frequency: None,
            weekend_frequency: None,
            first_service: None,
            last_service: None,
            operates_on: vec![],
            resolved_stops: None,
        }
    }

    /// Bakerloo-shaped fixture: Harrow & Wealdstone -> Willesden Junction
    /// -> Paddington -> Oxford Circus -> Elephant & Castle, plus a Victoria
    /// line Oxford Circus -> Brixton, for the S1/S2 scenarios.
    fn fixture() -> Vec<LineSpec> {
        let bakerloo = LineSpec {
            line_name: "Bakerloo".into(),
            operator: "London Underground".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Harrow & Wealdstone", "HAW", 51.592, -0.335, vec!["06:00"]),
                raw("Willesden Junction", "WIJ", 51.532, -0.243, vec!["06:10"]),
                raw("Paddington", "PAD", 51.515, -0.175, vec!["06:25"]),
                raw("Oxford Circus", "OXC", 51.515, -0.141, vec!["06:35"]),
                raw("Elephant & Castle", "ELC", 51.495, -0.100, vec!["06:50"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![
                ("HAW-WIJ".into(), 10),
                ("WIJ-PAD".into(), 15),
                ("PAD-OXC".into(), 10),
                ("OXC-ELC".into(), 15),
            ],
        };
        let victoria = LineSpec {
            line_name: "Victoria".into(),
            operator: "London Underground".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Oxford Circus", "OXC", 51.515, -0.141, vec!["06:40"]),
                raw("Brixton", "BRX", 51.462, -0.114, vec!["06:55"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![("OXC-BRX".into(), 15)],
        };
        vec![bakerloo, victoria]
    }

    #[test]
    fn direct_journey_found_with_no_transfers() {
        let (network, _) = Network::build(fixture()).unwrap();
        let origin = network.resolve_station_ref("Harrow & Wealdstone").unwrap();
        let destination = network.resolve_station_ref("Elephant & Castle").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };

        match router.route(&request, &CancellationToken::never()) {
            PlanOutcome::Found { journeys, partial } => {
                assert!(!partial);
                assert!(!journeys.is_empty());
                let best = &journeys[0];
                assert_eq!(best.transfer_count(), 0);
                assert_eq!(best.origin(), origin);
                assert_eq!(best.destination(), destination);
            }
            other => panic!("expected a direct journey, got {other:?}"),
        }
    }

    #[test]
    fn transfer_journey_found_across_lines() {
        let (network, _) = Network::build(fixture()).unwrap();
        let origin = network.resolve_station_ref("Harrow & Wealdstone").unwrap();
        let destination = network.resolve_station_ref("Brixton").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };

        match router.route(&request, &CancellationToken::never()) {
            PlanOutcome::Found { journeys, .. } => {
                let best = &journeys[0];
                assert_eq!(best.transfer_count(), 1);
                let oxford_circus = network.resolve_station_ref("Oxford Circus").unwrap();
                assert_eq!(best.transfers()[0].at_station, oxford_circus);
                assert!(best.transfers()[0].wait_minutes >= 0);
            }
            other => panic!("expected a one-change journey, got {other:?}"),
        }
    }

    #[test]
    fn trivial_journey_for_same_station() {
        let (network, _) = Network::build(fixture()).unwrap();
        let origin = network.resolve_station_ref("Paddington").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination: origin, when: When::DepartAfter(0), day_class: None };
        assert_eq!(router.route(&request, &CancellationToken::never()), PlanOutcome::Trivial);
    }

    #[test]
    fn no_path_between_disconnected_stations() {
        let mut far = fixture();
        far.push(LineSpec {
            line_name: "Cambrian Coast".into(),
            operator: "Transport for Wales".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Pwllheli", "PWL", 52.886, -4.416, vec!["07:00"]),
                raw("Aberystwyth", "AYW", 52.414, -4.081, vec!["07:40"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![],
        });
        let (network, _) = Network::build(far).unwrap();
        let origin = network.resolve_station_ref("Pwllheli").unwrap();
        let destination = network.resolve_station_ref("Harrow & Wealdstone").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };
        assert_eq!(
            router.route(&request, &CancellationToken::never()),
            PlanOutcome::NoPath(NoPathReason::NoReachablePath)
        );
    }

    #[test]
    fn cancelled_token_yields_no_path_or_partial() {
        let (network, _) = Network::build(fixture()).unwrap();
        let origin = network.resolve_station_ref("Harrow & Wealdstone").unwrap();
        let destination = network.resolve_station_ref("Elephant & Castle").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };
        let (handle, token) = super::super::cancel::cancellation_pair();
        handle.cancel();
        match router.route(&request, &token) {
            PlanOutcome::NoPath(_) => {}
            PlanOutcome::Found { partial, .. } => assert!(partial),
            PlanOutcome::Trivial => panic!("origin != destination"),
        }
    }

    /// Two lines linked only by a tag interchange at Bank (spec.md §3
    /// "Interchange edges", §4.N step 4): Bank names "District" as an
    /// interchange tag, so it gets an edge to each of District's termini
    /// (Aldgate East and Upminster) but not to Barking, District's
    /// mid-line station.
    fn tag_interchange_fixture() -> Vec<LineSpec> {
        let central = LineSpec {
            line_name: "Central".into(),
            operator: "London Underground".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Mile End", "MLE", 51.525, -0.033, vec!["06:00"]),
                raw_tagged("Bank", "BNK", 51.513, -0.089, vec!["06:15"], vec!["District"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![("MLE-BNK".into(), 15)],
        };
        let district = LineSpec {
            line_name: "District".into(),
            operator: "London Underground".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Aldgate East", "ALE", 51.515, -0.072, vec!["06:30"]),
                raw("Barking", "BKG", 51.539, 0.081, vec!["06:45"]),
                raw("Upminster", "UPM", 51.559, 0.251, vec!["07:00"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![("ALE-BKG".into(), 15), ("BKG-UPM".into(), 15)],
        };
        vec![central, district]
    }

    #[test]
    fn tag_interchange_reaches_a_terminus_with_no_further_ride() {
        let (network, _) = Network::build(tag_interchange_fixture()).unwrap();
        let origin = network.resolve_station_ref("Mile End").unwrap();
        let destination = network.resolve_station_ref("Upminster").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };

        match router.route(&request, &CancellationToken::never()) {
            PlanOutcome::Found { journeys, .. } => {
                let best = &journeys[0];
                // Bank is directly interchange-linked to Upminster (a
                // District terminus), so no District leg is needed.
                assert_eq!(best.legs().len(), 1);
                assert_eq!(best.transfer_count(), 0);
                assert_eq!(best.destination(), destination);
                assert!(best.trailing_walk().is_some());
            }
            other => panic!("expected a journey via the tag interchange, got {other:?}"),
        }
    }

    #[test]
    fn tag_interchange_bridges_to_a_ride_on_the_other_line() {
        let (network, _) = Network::build(tag_interchange_fixture()).unwrap();
        let origin = network.resolve_station_ref("Mile End").unwrap();
        let destination = network.resolve_station_ref("Barking").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };

        match router.route(&request, &CancellationToken::never()) {
            PlanOutcome::Found { journeys, .. } => {
                let best = &journeys[0];
                // Barking is not a District terminus, so reaching it
                // requires riding District from the interchange point.
                assert_eq!(best.legs().len(), 2);
                assert_eq!(best.transfer_count(), 1);
                assert!(best.trailing_walk().is_none());
                let bank = network.resolve_station_ref("Bank").unwrap();
                let aldgate_east = network.resolve_station_ref("Aldgate East").unwrap();
                assert_eq!(best.transfers()[0].at_station, bank);
                assert_eq!(best.transfers()[0].board_station, aldgate_east);
            }
            other => panic!("expected a journey bridging onto District, got {other:?}"),
        }
    }

    /// Two lines with no shared station or interchange tag, but whose
    /// nearest stations sit a few dozen metres apart — within the default
    /// `max_walk_km` (spec.md §5 "walking interchange between nearby
    /// stations", §6 `max_walk_km`).
    fn walking_interchange_fixture() -> Vec<LineSpec> {
        let alpha = LineSpec {
            line_name: "Alpha".into(),
            operator: "Acme Rail".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Start", "STA", 51.500, -0.100, vec!["06:00"]),
                raw("Near Alpha", "NRA", 51.520, -0.120, vec!["06:20"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![("STA-NRA".into(), 20)],
        };
        let beta = LineSpec {
            line_name: "Beta".into(),
            operator: "Acme Rail".into(),
            description: None,
            color: None,
            frequency: Frequency::default(),
            stations: vec![
                raw("Near Beta", "NRB", 51.5201, -0.1201, vec!["06:00"]),
                raw("Finish", "FIN", 51.550, -0.150, vec!["06:20"]),
            ],
            patterns: vec![stopping("stopping")],
            typical_journey_times: vec![("NRB-FIN".into(), 20)],
        };
        vec![alpha, beta]
    }

    #[test]
    fn walking_interchange_connects_nearby_stations_on_unrelated_lines() {
        let (network, _) = Network::build(walking_interchange_fixture()).unwrap();
        let origin = network.resolve_station_ref("Start").unwrap();
        let destination = network.resolve_station_ref("Finish").unwrap();
        let router = Router::new(&network, SearchConfig::default());
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };

        match router.route(&request, &CancellationToken::never()) {
            PlanOutcome::Found { journeys, .. } => {
                let best = &journeys[0];
                assert_eq!(best.legs().len(), 2);
                assert_eq!(best.transfer_count(), 1);
                let near_alpha = network.resolve_station_ref("Near Alpha").unwrap();
                let near_beta = network.resolve_station_ref("Near Beta").unwrap();
                assert_eq!(best.transfers()[0].at_station, near_alpha);
                assert_eq!(best.transfers()[0].board_station, near_beta);
                assert!(best.transfers()[0].wait_minutes > 0);
            }
            other => panic!("expected a journey via the walking interchange, got {other:?}"),
        }
    }

    #[test]
    fn walking_interchange_respects_max_walk_km() {
        let (network, _) = Network::build(walking_interchange_fixture()).unwrap();
        let origin = network.resolve_station_ref("Start").unwrap();
        let destination = network.resolve_station_ref("Finish").unwrap();
        let config = SearchConfig { max_walk_km: 0.0, ..SearchConfig::default() };
        let router = Router::new(&network, config);
        let request = PlanRequest { origin, destination, when: When::DepartAfter(0), day_class: None };
        assert_eq!(
            router.route(&request, &CancellationToken::never()),
            PlanOutcome::NoPath(NoPathReason::NoReachablePath)
        );
    }
}
