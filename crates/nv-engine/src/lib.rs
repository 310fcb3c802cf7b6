//! Neural Vision Engine backends
//!
//! Two interchangeable implementations of [`nv_core::EngineClient`]:
//!
//! ```text
//! EngineConfig ──mode──▶ Engine::Mock(MockEngineClient)   in-memory, smoke fixtures + synthesis
//!                    └─▶ Engine::Real(RealEngineClient)   HTTP delegate to the engine service
//! ```
//!
//! The variant is chosen once, at startup, and fixed for the process lifetime.

pub mod mock;
pub mod real;
pub mod scenarios;
pub mod synthesis;

pub use mock::MockEngineClient;
pub use real::RealEngineClient;
pub use scenarios::{SmokeScenario, SMOKE_SCENARIOS};

use async_trait::async_trait;
use nv_core::{
    BodyRequest, BodyResult, EngineClient, EngineError, EngineMode, FittingRequest, GarmentAsset,
    GarmentIntake, Job, PingResult,
};
use serde::{Deserialize, Serialize};

/// Default upstream request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Engine selection and connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mode: EngineMode,
    /// Required in real mode
    pub base_url: Option<String>,
    /// Sent as a bearer token when present
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::Mock,
            base_url: None,
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    pub fn real(base_url: impl Into<String>) -> Self {
        Self {
            mode: EngineMode::Real,
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }
}

/// The engine backend resolved from configuration.
pub enum Engine {
    Mock(MockEngineClient),
    Real(RealEngineClient),
}

impl Engine {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let engine = match config.mode {
            EngineMode::Mock => Self::Mock(MockEngineClient::new()),
            EngineMode::Real => Self::Real(RealEngineClient::new(config)?),
        };
        tracing::info!(mode = %engine.mode(), "engine client ready");
        Ok(engine)
    }

    pub fn mode(&self) -> EngineMode {
        match self {
            Self::Mock(_) => EngineMode::Mock,
            Self::Real(_) => EngineMode::Real,
        }
    }

    fn client(&self) -> &dyn EngineClient {
        match self {
            Self::Mock(c) => c,
            Self::Real(c) => c,
        }
    }
}

#[async_trait]
impl EngineClient for Engine {
    async fn submit_body(&self, req: &BodyRequest) -> Result<BodyResult, EngineError> {
        self.client().submit_body(req).await
    }

    async fn register_garment(&self, intake: &GarmentIntake) -> Result<GarmentAsset, EngineError> {
        self.client().register_garment(intake).await
    }

    async fn submit_job(&self, req: &FittingRequest) -> Result<Job, EngineError> {
        self.client().submit_job(req).await
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, EngineError> {
        self.client().get_job(job_id).await
    }

    async fn list_jobs(&self, seller_id: &str) -> Result<Vec<Job>, EngineError> {
        self.client().list_jobs(seller_id).await
    }

    async fn ping(&self) -> PingResult {
        self.client().ping().await
    }
}
