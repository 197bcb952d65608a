//! API server state

use std::sync::Arc;

use crate::api::FaultPolicy;
use crate::catalog::Catalog;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Payloads served by the segmentation endpoints
    pub catalog: Arc<Catalog>,

    /// How unhandled faults are reported to clients
    pub fault_policy: FaultPolicy,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, fault_policy: FaultPolicy) -> Self {
        Self {
            catalog,
            fault_policy,
        }
    }

    /// Built-in catalog, traces kept out of responses
    pub fn builtin() -> Self {
        Self::new(Arc::new(Catalog::builtin()), FaultPolicy::Conceal)
    }
}
