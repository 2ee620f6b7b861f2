//! Application state for the web layer.

use std::sync::Arc;

use crate::network::Network;
use crate::network::report::AssemblyReport;
use crate::query::Clock;
use crate::router::SearchConfig;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The assembled network every query searches over.
    pub network: Arc<Network>,

    /// What the Network Assembler found while building `network`, exposed
    /// read-only via `GET /report`.
    pub report: Arc<AssemblyReport>,

    /// Default router bounds, overridable per request.
    pub default_config: Arc<SearchConfig>,

    /// Clock seam, injected so handlers never call `Local::now()` directly.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        network: Network,
        report: AssemblyReport,
        default_config: SearchConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            network: Arc::new(network),
            report: Arc::new(report),
            default_config: Arc::new(default_config),
            clock,
        }
    }
}
