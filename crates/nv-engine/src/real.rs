//! HTTP adapter for the real Neural Vision engine
//!
//! Every `EngineClient` call maps 1:1 onto an engine endpoint. Non-2xx
//! responses surface as [`EngineError::Upstream`] carrying status and body.

use crate::EngineConfig;
use async_trait::async_trait;
use nv_core::{
    BodyRequest, BodyResult, EngineClient, EngineError, EngineMode, FittingRequest, GarmentAsset,
    GarmentIntake, Job, PingResult,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct RealEngineClient {
    /// Engine base URL (no trailing slash)
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct UpstreamPing {
    ok: bool,
}

impl RealEngineClient {
    /// Fails when no base URL is configured or the HTTP client cannot be built.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                EngineError::Config(
                    "ENGINE_API_BASE_URL is required when the engine mode is real".to_string(),
                )
            })?
            .trim_end_matches('/')
            .to_string();

        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| EngineError::Config("invalid engine api key".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, EngineError> {
        let response = builder
            .send()
            .await
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read engine error body");
                    format!("<unreadable body: {}>", e)
                }
            };
            tracing::warn!(status = status.as_u16(), "engine api returned an error");
            return Err(EngineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))
    }

    async fn post<B: Serialize + ?Sized + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, EngineError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }
}

#[async_trait]
impl EngineClient for RealEngineClient {
    async fn submit_body(&self, req: &BodyRequest) -> Result<BodyResult, EngineError> {
        self.post("/api/body", req).await
    }

    async fn register_garment(&self, intake: &GarmentIntake) -> Result<GarmentAsset, EngineError> {
        self.post("/api/garment", intake).await
    }

    async fn submit_job(&self, req: &FittingRequest) -> Result<Job, EngineError> {
        self.post("/api/job", req).await
    }

    async fn get_job(&self, job_id: &str) -> Result<Job, EngineError> {
        let mut url = reqwest::Url::parse(&format!("{}/api/job/", self.base_url))
            .map_err(|e| EngineError::Config(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| EngineError::Config("engine base url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(job_id);
        self.send(self.client.get(url)).await
    }

    async fn list_jobs(&self, seller_id: &str) -> Result<Vec<Job>, EngineError> {
        self.send(
            self.request(Method::GET, "/api/jobs")
                .query(&[("seller_id", seller_id)]),
        )
        .await
    }

    async fn ping(&self) -> PingResult {
        match self
            .send::<UpstreamPing>(self.request(Method::GET, "/api/ping"))
            .await
        {
            Ok(upstream) => PingResult {
                ok: upstream.ok,
                mode: EngineMode::Real,
            },
            Err(e) => {
                tracing::warn!(error = %e, "engine ping failed");
                PingResult {
                    ok: false,
                    mode: EngineMode::Real,
                }
            }
        }
    }
}
