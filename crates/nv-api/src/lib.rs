//! Neural Vision seller portal API
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod seller;
pub mod state;

pub use config::{ConfigError, Settings};
pub use error::ApiError;
pub use state::AppState;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    routing::post,
    Router,
};
use metrics::ApiMetrics;
use nv_engine::Engine;
use nv_intake::{ContractsManifest, IntakeGate};
use nv_store::MemoryStore;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Faults that stop the server from starting or running.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] nv_core::EngineError),

    #[error(transparent)]
    Intake(#[from] nv_intake::IntakeError),

    #[error("METRICS/{0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/api/engine/body", post(handlers::submit_body))
        .route("/api/engine/garment", post(handlers::register_garment))
        .route("/api/engine/job", post(handlers::submit_job))
        .route("/api/engine/job/{id}", get(handlers::get_job))
        .route("/api/engine/jobs", get(handlers::list_jobs))
        .route("/api/engine/ping", get(handlers::ping))
        .route(
            "/api/seller/jobs",
            get(seller::list_jobs).post(seller::submit_job),
        )
        .route("/api/seller/jobs/{id}", get(seller::get_job))
        .route(
            "/api/seller/products",
            get(seller::list_products).post(seller::create_product),
        )
        .route(
            "/api/seller/products/{id}",
            get(seller::get_product).delete(seller::delete_product),
        )
        .route("/api/contracts", get(handlers::contracts))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn_with_state(state.clone(), middleware::track_requests))
        .layer(from_fn(middleware::request_context))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors())
        .with_state(state)
}

/// Build the default state: engine from settings, in-memory store, garment intake gate.
pub fn build_state(settings: &Settings) -> Result<AppState, StartupError> {
    let engine = Engine::from_config(&settings.engine)?;
    let state = AppState::new(
        Arc::new(engine),
        Arc::new(MemoryStore::new()),
        IntakeGate::garment()?,
        ApiMetrics::new()?,
    );
    Ok(match &settings.contracts_lock {
        Some(path) => state.with_contracts(ContractsManifest::load(path)?),
        None => state,
    })
}

pub async fn run(settings: Settings) -> Result<(), StartupError> {
    let app = create_app(build_state(&settings)?);
    let listener = tokio::net::TcpListener::bind(&settings.addr).await?;

    tracing::info!(
        addr = %settings.addr,
        mode = %settings.engine.mode,
        "Neural Vision API listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
