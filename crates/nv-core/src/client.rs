//! EngineClient: the one contract every engine backend implements
use crate::data_model::{
    BodyRequest, BodyResult, FittingRequest, GarmentAsset, GarmentIntake, Job, PingResult,
};
use crate::error::EngineError;
use async_trait::async_trait;

/// Capabilities of the Neural Vision engine.
///
/// Handlers only ever see this trait; whether calls are answered in memory or
/// forwarded over HTTP is decided once at startup.
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Body module: map raw measurements to a prototype.
    async fn submit_body(&self, req: &BodyRequest) -> Result<BodyResult, EngineError>;

    /// Garment module: turn a seller intake into an engine asset.
    async fn register_garment(&self, intake: &GarmentIntake) -> Result<GarmentAsset, EngineError>;

    /// Fitting + generation for one body/garment pair.
    async fn submit_job(&self, req: &FittingRequest) -> Result<Job, EngineError>;

    async fn get_job(&self, job_id: &str) -> Result<Job, EngineError>;

    async fn list_jobs(&self, seller_id: &str) -> Result<Vec<Job>, EngineError>;

    /// Reachability check. Must not fail; report `ok: false` instead.
    async fn ping(&self) -> PingResult;
}
