//! In-memory engine used for development and demos
//!
//! Answers smoke scenario inputs with their fixtures and synthesizes
//! everything else deterministically. Jobs and garments live in process
//! memory only.

use crate::scenarios;
use crate::synthesis;
use async_trait::async_trait;
use indexmap::IndexMap;
use nv_core::{
    Artifacts, BodyRequest, BodyResult, EngineClient, EngineError, EngineMode, FitSignal,
    FittingRequest, FittingResult, GarmentAsset, GarmentIntake, Gender, Job, JobStatus,
    PingResult, DEFAULT_AGE, PIPELINE_VERSION,
};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

/// Seller attributed to jobs submitted without one
pub const DEFAULT_SELLER: &str = "mock-seller";
/// Quality score of synthesized fitting results
pub const DEFAULT_QUALITY_SCORE: f64 = 0.88;
const LATENT_VERSION: &str = "mock-v0";

#[derive(Debug, Default)]
pub struct MockEngineClient {
    jobs: RwLock<IndexMap<String, Job>>,
    garments: RwLock<IndexMap<String, GarmentAsset>>,
}

impl MockEngineClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Garment registered under `garment_id`, if any.
    pub async fn garment(&self, garment_id: &str) -> Option<GarmentAsset> {
        self.garments.read().await.get(garment_id).cloned()
    }

    fn fresh_id(prefix: &str) -> String {
        format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
    }

    /// Body input recovered from the body result a fitting request carries.
    /// Age is not part of a body result, so it falls back to the default.
    fn recover_body_request(body: &BodyResult) -> BodyRequest {
        BodyRequest {
            gender: synthesis::gender_of_prototype(&body.prototype_id).unwrap_or(Gender::Male),
            age: DEFAULT_AGE,
            height_cm: body.measurement("height_cm").unwrap_or(0.0),
            weight_kg: body.measurement("weight_kg").unwrap_or(0.0),
        }
    }

    fn synthesize_result(job_id: &str, body: &BodyResult) -> FittingResult {
        let mut provenance: Map<String, Value> = Map::new();
        provenance.insert("engine_mode".into(), json!("mock"));
        provenance.insert("pipeline_version".into(), json!(PIPELINE_VERSION));
        provenance.insert("body_prototype".into(), json!(body.prototype_id));

        FittingResult {
            job_id: job_id.to_string(),
            status: JobStatus::Completed,
            artifacts: Some(Artifacts {
                depth_png: Some("mock://artifacts/depth.png".to_string()),
                normal_png: Some("mock://artifacts/normal.png".to_string()),
                fit_signal: Some(FitSignal {
                    collision_count: 0,
                    retry_count: 0,
                    quality_score: DEFAULT_QUALITY_SCORE,
                    warnings: Vec::new(),
                }),
                final_image: Some("mock://artifacts/final_layer_result.png".to_string()),
            }),
            provenance,
        }
    }
}

#[async_trait]
impl EngineClient for MockEngineClient {
    async fn submit_body(&self, req: &BodyRequest) -> Result<BodyResult, EngineError> {
        if !(req.height_cm > 0.0) || !(req.weight_kg > 0.0) {
            return Err(EngineError::InvalidInput(
                "height_cm and weight_kg must be positive".to_string(),
            ));
        }

        if let Some(scenario) = scenarios::find_by_body(req) {
            tracing::debug!(
                scenario = scenario.id,
                label = scenario.label,
                "body request matched smoke scenario"
            );
            return Ok(scenario.expected_body.clone());
        }

        let result = synthesis::synthesize_body(req);
        tracing::debug!(prototype = %result.prototype_id, "synthesized body prototype");
        Ok(result)
    }

    async fn register_garment(&self, intake: &GarmentIntake) -> Result<GarmentAsset, EngineError> {
        let garment_id = if intake.garment_id.is_empty() {
            Self::fresh_id("garment")
        } else {
            intake.garment_id.clone()
        };

        let mut latent_meta: Map<String, Value> = Map::new();
        latent_meta.insert("version".into(), json!(LATENT_VERSION));
        latent_meta.insert(
            "material_token".into(),
            json!(intake.material_token.as_deref().unwrap_or("unknown")),
        );
        latent_meta.insert("texture_ready".into(), json!(true));
        latent_meta.insert("proxy_mesh_ready".into(), json!(true));

        let asset = GarmentAsset {
            embedding_ref: format!("mock://embedding/{}.pt", garment_id),
            garment_id,
            latent_meta,
        };

        self.garments
            .write()
            .await
            .insert(asset.garment_id.clone(), asset.clone());
        tracing::info!(
            garment_id = %asset.garment_id,
            seller_id = %intake.seller_id,
            "garment registered"
        );
        Ok(asset)
    }

    async fn submit_job(&self, req: &FittingRequest) -> Result<Job, EngineError> {
        let job_id = if req.job_id.is_empty() {
            Self::fresh_id("job")
        } else {
            req.job_id.clone()
        };

        let result = match scenarios::find_by_fitting(&req.body) {
            Some(s) => {
                tracing::debug!(
                    scenario = s.id,
                    garment_type = s.garment_type,
                    job_id = %job_id,
                    "fitting matched smoke scenario"
                );
                s.expected_result.clone()
            }
            None => Self::synthesize_result(&job_id, &req.body),
        };

        let mut job = Job::pending(
            job_id,
            req.seller_id.as_deref().unwrap_or(DEFAULT_SELLER),
            req.garment.garment_id.clone(),
            Self::recover_body_request(&req.body),
        );
        job.transition(JobStatus::Processing)?;
        job.result = Some(result);
        job.transition(JobStatus::Completed)?;

        self.jobs.write().await.insert(job.job_id.clone(), job.clone());
        tracing::info!(job_id = %job.job_id, seller_id = %job.seller_id, "fitting job completed");
        Ok(job)
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, EngineError> {
        self.jobs
            .read()
            .await
            .get(job_id)
            .cloned()
            .ok_or_else(|| EngineError::JobNotFound(job_id.to_string()))
    }

    async fn list_jobs(&self, seller_id: &str) -> Result<Vec<Job>, EngineError> {
        Ok(self
            .jobs
            .read()
            .await
            .values()
            .filter(|j| j.seller_id == seller_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> PingResult {
        PingResult {
            ok: true,
            mode: EngineMode::Mock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_core::GarmentImages;

    fn body(gender: Gender, age: u32, height_cm: f64, weight_kg: f64) -> BodyRequest {
        BodyRequest {
            gender,
            age,
            height_cm,
            weight_kg,
        }
    }

    fn intake(garment_id: &str) -> GarmentIntake {
        GarmentIntake {
            garment_id: garment_id.to_string(),
            seller_id: "seller-1".to_string(),
            images: GarmentImages::front("front.jpg"),
            material_token: Some("denim".to_string()),
        }
    }

    #[tokio::test]
    async fn test_fixture_reproduction() {
        let engine = MockEngineClient::new();
        let result = engine
            .submit_body(&body(Gender::Male, 28, 175.0, 70.0))
            .await
            .unwrap();

        assert_eq!(result.prototype_id, "proto_male_175");
        assert_eq!(result.measurement("chest_cm"), Some(95.2));
        assert_eq!(result.measurement("shoulder_width_cm"), Some(44.8));
        assert_eq!(result.mesh_ref.as_deref(), Some("mock://body_mesh/proto_male_175.npz"));
    }

    #[tokio::test]
    async fn test_synthesis_is_deterministic() {
        let engine = MockEngineClient::new();
        let input = body(Gender::Female, 45, 150.0, 80.0);

        let first = engine.submit_body(&input).await.unwrap();
        let second = engine.submit_body(&input).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.prototype_id, "proto_female_150_bmi5");
    }

    #[tokio::test]
    async fn test_rejects_non_positive_measurements() {
        let engine = MockEngineClient::new();
        let err = engine
            .submit_body(&body(Gender::Male, 30, 0.0, 70.0))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_register_garment_idempotent() {
        let engine = MockEngineClient::new();
        let a = engine.register_garment(&intake("g-1")).await.unwrap();
        let b = engine.register_garment(&intake("g-1")).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.embedding_ref, "mock://embedding/g-1.pt");
        assert_eq!(a.latent_meta["material_token"], "denim");
        assert_eq!(a.latent_meta["version"], "mock-v0");
        assert_eq!(engine.garment("g-1").await, Some(a));
    }

    #[tokio::test]
    async fn test_register_garment_assigns_fresh_id() {
        let engine = MockEngineClient::new();
        let a = engine.register_garment(&intake("")).await.unwrap();
        let b = engine.register_garment(&intake("")).await.unwrap();

        assert!(a.garment_id.starts_with("garment_"));
        assert_ne!(a.garment_id, b.garment_id);
        assert!(a.embedding_ref.contains(&a.garment_id));
    }

    #[tokio::test]
    async fn test_scenario_job_returns_canned_result() {
        let engine = MockEngineClient::new();
        let body_result = engine
            .submit_body(&body(Gender::Male, 40, 180.0, 90.0))
            .await
            .unwrap();
        let garment = engine.register_garment(&intake("jacket-1")).await.unwrap();

        let job = engine
            .submit_job(&FittingRequest {
                job_id: "job-a".to_string(),
                body: body_result,
                garment,
                seller_id: Some("seller-9".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.seller_id, "seller-9");
        assert_eq!(job.body_request.gender, Gender::Male);
        assert_eq!(job.body_request.weight_kg, 90.0);
        assert_eq!(job.body_request.age, DEFAULT_AGE);
        let result = job.result.unwrap();
        assert_eq!(result, scenarios::SMOKE_SCENARIOS[2].expected_result);
    }

    #[tokio::test]
    async fn test_height_match_keeps_callers_body() {
        let engine = MockEngineClient::new();
        let body_result = engine
            .submit_body(&body(Gender::Female, 44, 175.0, 60.0))
            .await
            .unwrap();
        let garment = engine.register_garment(&intake("tee-1")).await.unwrap();

        let job = engine
            .submit_job(&FittingRequest {
                job_id: String::new(),
                body: body_result,
                garment,
                seller_id: None,
            })
            .await
            .unwrap();

        // canned t-shirt result, but the job still describes the caller
        assert_eq!(
            job.result.as_ref().unwrap(),
            &scenarios::SMOKE_SCENARIOS[0].expected_result
        );
        assert_eq!(job.body_request.gender, Gender::Female);
        assert_eq!(job.body_request.height_cm, 175.0);
        assert_eq!(job.body_request.weight_kg, 60.0);
    }

    #[tokio::test]
    async fn test_synthesized_job_defaults() {
        let engine = MockEngineClient::new();
        let body_result = engine
            .submit_body(&body(Gender::Female, 22, 170.0, 58.0))
            .await
            .unwrap();
        let garment = engine.register_garment(&intake("dress-1")).await.unwrap();

        let job = engine
            .submit_job(&FittingRequest {
                job_id: String::new(),
                body: body_result,
                garment,
                seller_id: None,
            })
            .await
            .unwrap();

        assert!(job.job_id.starts_with("job_"));
        assert_eq!(job.seller_id, DEFAULT_SELLER);
        assert_eq!(job.body_request.gender, Gender::Female);
        assert_eq!(job.body_request.height_cm, 170.0);

        let result = job.result.as_ref().unwrap();
        assert_eq!(result.status, JobStatus::Completed);
        let signal = result.artifacts.as_ref().unwrap().fit_signal.as_ref().unwrap();
        assert_eq!(signal.collision_count, 0);
        assert_eq!(signal.retry_count, 0);
        assert_eq!(signal.quality_score, 0.88);

        assert_eq!(engine.get_job(&job.job_id).await.unwrap(), job);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let engine = MockEngineClient::new();
        let err = engine.get_job("never-written").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_jobs_filters_by_seller() {
        let engine = MockEngineClient::new();
        let body_result = engine
            .submit_body(&body(Gender::Male, 28, 175.0, 70.0))
            .await
            .unwrap();
        let garment = engine.register_garment(&intake("tee-1")).await.unwrap();

        for (job_id, seller) in [("j1", "alice"), ("j2", "bob"), ("j3", "alice")] {
            engine
                .submit_job(&FittingRequest {
                    job_id: job_id.to_string(),
                    body: body_result.clone(),
                    garment: garment.clone(),
                    seller_id: Some(seller.to_string()),
                })
                .await
                .unwrap();
        }

        let alice: Vec<_> = engine
            .list_jobs("alice")
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.job_id)
            .collect();
        assert_eq!(alice, ["j1", "j3"]);
        assert!(engine.list_jobs("alic").await.unwrap().is_empty());
        assert!(engine.list_jobs("carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ping() {
        let ping = MockEngineClient::new().ping().await;
        assert!(ping.ok);
        assert_eq!(ping.mode, EngineMode::Mock);
    }
}
