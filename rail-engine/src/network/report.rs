//! Assembly report types (spec.md §6 "Assembly report", §7).
//!
//! Build-time errors are *collected, never fatal* (spec.md §7) except when
//! the dataset yields zero valid lines. Everything the Network Assembler
//! finds along the way — dangling references, code collisions,
//! disconnected components, coordinate anomalies, empty patterns — is
//! recorded here rather than raised.

use crate::domain::StationId;

/// A service-pattern stop-set reference that did not resolve to any
/// station of its own line (spec.md §3 "ServicePattern" invariant, §7
/// `DANGLING_REFERENCE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub line_name: String,
    pub pattern_name: String,
    pub reference: String,
}

/// A station code claimed by more than one distinct station (spec.md §7
/// `CODE_COLLISION`). Lookups of `code` must thereafter be treated as
/// ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCollision {
    pub code: String,
    pub stations: Vec<String>,
}

/// Unified station entries whose source coordinates disagreed by more than
/// the 500 m unification radius (spec.md §4.N step 1, §7
/// `COORDINATE_ANOMALY`).
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateAnomaly {
    pub station_name: String,
    pub spread_km: f64,
}

/// A group of stations mutually reachable from each other but not from the
/// rest of the network (spec.md §7 `DISCONNECTED_NETWORK`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectedComponent {
    pub stations: Vec<StationId>,
}

/// A service pattern whose resolved stop-set was empty (spec.md §4.R
/// edge-case policy: "Pattern with all-calls flag but empty station list:
/// treated as malformed").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyPatternWarning {
    pub line_name: String,
    pub pattern_name: String,
}

/// Everything the Network Assembler found while building the graph,
/// emitted once at startup (spec.md §6 "Assembly report").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    pub dangling_references: Vec<DanglingReference>,
    pub code_collisions: Vec<CodeCollision>,
    pub coordinate_anomalies: Vec<CoordinateAnomaly>,
    pub disconnected_components: Vec<DisconnectedComponent>,
    pub empty_pattern_warnings: Vec<EmptyPatternWarning>,
    /// Non-fatal loader warnings (spec.md §4.L rule 4), carried through
    /// from every document that loaded successfully.
    pub load_warnings: Vec<String>,
    /// Documents that failed to load entirely (spec.md §4.L "Failure
    /// modes"); the whole document is rejected, never partially used.
    pub rejected_documents: Vec<String>,
}

impl AssemblyReport {
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty()
            && self.code_collisions.is_empty()
            && self.coordinate_anomalies.is_empty()
            && self.disconnected_components.len() <= 1
            && self.empty_pattern_warnings.is_empty()
            && self.rejected_documents.is_empty()
    }
}
