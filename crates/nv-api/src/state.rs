//! Shared application state
use crate::metrics::ApiMetrics;
use nv_core::EngineClient;
use nv_intake::{ContractsManifest, IntakeGate};
use nv_store::StorageAdapter;
use std::sync::Arc;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn EngineClient>,
    pub store: Arc<dyn StorageAdapter>,
    pub intake: Arc<IntakeGate>,
    pub metrics: Arc<ApiMetrics>,
    pub contracts: Option<Arc<ContractsManifest>>,
}

impl AppState {
    pub fn new(
        engine: Arc<dyn EngineClient>,
        store: Arc<dyn StorageAdapter>,
        intake: IntakeGate,
        metrics: ApiMetrics,
    ) -> Self {
        Self {
            engine,
            store,
            intake: Arc::new(intake),
            metrics: Arc::new(metrics),
            contracts: None,
        }
    }

    pub fn with_contracts(mut self, manifest: ContractsManifest) -> Self {
        self.contracts = Some(Arc::new(manifest));
        self
    }
}
