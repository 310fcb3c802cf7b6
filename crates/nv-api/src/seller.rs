//! Seller portal handlers (`/api/seller/*`)
//!
//! Products go through the intake gate before the engine sees them. Jobs
//! chain body → stored garment asset → fitting, and are kept in the store.

use crate::error::ApiError;
use crate::handlers::{decode, require_fields, SellerQuery};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use nv_core::{
    build_artifact_refs, BodyRequest, FittingRequest, GarmentAsset, Job, SellerProduct,
};
use nv_engine::mock::DEFAULT_SELLER;
use nv_intake::IntakeVerdict;
use nv_store::{list_as, read_as, write_as, JOBS, PRODUCTS};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Seller attributed to portal jobs and product listings when none is given
pub const DEMO_SELLER: &str = "demo-seller";

#[derive(Debug, Deserialize)]
struct JobSubmission {
    #[serde(default)]
    seller_id: Option<String>,
    garment_id: String,
    body_request: BodyRequest,
}

/// Placeholder asset for garments that were never registered through the portal.
fn placeholder_asset(garment_id: &str) -> GarmentAsset {
    let mut latent_meta = Map::new();
    latent_meta.insert("version".to_string(), json!("mock-v0"));
    GarmentAsset {
        garment_id: garment_id.to_string(),
        embedding_ref: format!("mock://embedding/{}.pt", garment_id),
        latent_meta,
    }
}

// =============================================================================
// Jobs
// =============================================================================

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

pub async fn submit_job(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Job>, ApiError> {
    let payload = require_fields(payload, &["garment_id", "body_request"])?;
    let submission: JobSubmission = decode(payload)?;
    let seller_id = submission
        .seller_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEMO_SELLER.to_string());

    let body = state.engine.submit_body(&submission.body_request).await?;

    let product: Option<SellerProduct> =
        read_as(state.store.as_ref(), PRODUCTS, &submission.garment_id).await?;
    let garment = match product.and_then(|p| p.engine_asset) {
        Some(asset) => asset,
        None => {
            tracing::debug!(
                garment_id = %submission.garment_id,
                "no registered asset, using placeholder"
            );
            placeholder_asset(&submission.garment_id)
        }
    };

    let mut job = state
        .engine
        .submit_job(&FittingRequest {
            job_id: String::new(),
            body,
            garment,
            seller_id: Some(seller_id.clone()),
        })
        .await?;
    job.seller_id = seller_id;
    job.body_request = submission.body_request;

    write_as(state.store.as_ref(), JOBS, &job.job_id, &job).await?;
    tracing::info!(job_id = %job.job_id, seller_id = %job.seller_id, "seller job stored");
    Ok(Json(job))
}

/// Job detail with display-ready artifact references. Falls back to the engine
/// for jobs the portal did not submit.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let job = match read_as::<Job>(state.store.as_ref(), JOBS, &id).await? {
        Some(job) => job,
        None => state.engine.get_job(&id).await?,
    };
    let artifacts = build_artifact_refs(job.result.as_ref().and_then(|r| r.artifacts.as_ref()));
    Ok(Json(json!({ "job": job, "artifacts": artifacts })))
}

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<Value>, ApiError> {
    let seller_id = query.seller_or(DEMO_SELLER);
    let products: Vec<SellerProduct> = list_as::<SellerProduct>(state.store.as_ref(), PRODUCTS)
        .await?
        .into_iter()
        .filter(|p| p.seller_id == seller_id)
        .collect();
    Ok(Json(json!({ "count": products.len(), "products": products })))
}

pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(payload) = payload?;

    let (submission, warnings) = match state.intake.evaluate(&payload) {
        IntakeVerdict::Accepted {
            submission,
            warnings,
        } => (submission, warnings),
        IntakeVerdict::SchemaRejected(details) => return Err(ApiError::SchemaInvalid(details)),
        IntakeVerdict::ImagesRejected(warnings) => return Err(ApiError::ImageRejected(warnings)),
    };

    let asset = state
        .engine
        .register_garment(&submission.to_garment_intake())
        .await?;
    let product = submission.into_product(asset, &warnings);
    write_as(state.store.as_ref(), PRODUCTS, &product.garment_id, &product).await?;
    tracing::info!(
        garment_id = %product.garment_id,
        seller_id = %product.seller_id,
        warnings = warnings.len(),
        "product registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "product": product, "warnings": warnings })),
    ))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .store
        .read(PRODUCTS, &id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if state.store.delete(PRODUCTS, &id).await {
        tracing::info!(garment_id = %id, "product deleted");
        Ok(Json(json!({ "deleted": true, "id": id })))
    } else {
        Err(ApiError::NotFound("Product not found".to_string()))
    }
}
