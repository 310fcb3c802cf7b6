//! Engine passthrough handlers (`/api/engine/*`) plus operational endpoints
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use nv_core::{
    BodyRequest, BodyResult, FittingRequest, GarmentAsset, GarmentIntake, Job, PingResult,
};
use nv_engine::mock::DEFAULT_SELLER;
use nv_intake::ContractsManifest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SellerQuery {
    pub seller_id: Option<String>,
}

impl SellerQuery {
    pub fn seller_or(&self, default: &str) -> String {
        self.seller_id
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}

/// A field counts as present unless it is missing, null, false, zero or empty.
fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Unwraps the JSON body and checks the listed top-level fields.
pub(crate) fn require_fields(
    payload: Result<Json<Value>, JsonRejection>,
    fields: &[&str],
) -> Result<Value, ApiError> {
    let Json(payload) = payload?;
    if fields.iter().all(|f| is_present(payload.get(*f))) {
        Ok(payload)
    } else {
        Err(ApiError::BadRequest(format!("{} are required", fields.join(", "))))
    }
}

pub(crate) fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// =============================================================================
// /api/engine
// =============================================================================

pub async fn submit_body(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BodyResult>, ApiError> {
    let payload = require_fields(payload, &["gender", "height_cm", "weight_kg"])?;
    let req: BodyRequest = decode(payload)?;
    Ok(Json(state.engine.submit_body(&req).await?))
}

pub async fn register_garment(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GarmentAsset>, ApiError> {
    let payload = require_fields(payload, &["garment_id", "seller_id"])?;
    let intake: GarmentIntake = decode(payload)?;
    Ok(Json(state.engine.register_garment(&intake).await?))
}

pub async fn submit_job(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let payload = require_fields(payload, &["body", "garment"])?;
    let req: FittingRequest = decode(payload)?;
    let job = state.engine.submit_job(&req).await?;
    tracing::debug!(job_id = %job.job_id, status = %job.status, "fitting job submitted");
    Ok(Json(job))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.engine.get_job(&id).await?))
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<Value>, ApiError> {
    let jobs = state
        .engine
        .list_jobs(&query.seller_or(DEFAULT_SELLER))
        .await?;
    Ok(Json(json!({ "count": jobs.len(), "jobs": jobs })))
}

pub async fn ping(State(state): State<AppState>) -> Json<PingResult> {
    Json(state.engine.ping().await)
}

// =============================================================================
// Operational
// =============================================================================

pub async fn contracts(
    State(state): State<AppState>,
) -> Result<Json<ContractsManifest>, ApiError> {
    state
        .contracts
        .as_deref()
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Contracts lock not configured".to_string()))
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
