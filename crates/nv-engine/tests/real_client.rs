//! Integration tests for the HTTP engine adapter against a stub engine.

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use nv_core::{BodyRequest, EngineClient, EngineError, EngineMode, Gender};
use nv_engine::{EngineConfig, RealEngineClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

// =============================================================================
// Stub engine
// =============================================================================

#[derive(Default)]
struct Capture {
    authorization: Option<String>,
    seller_query: Option<String>,
}

type Shared = Arc<Mutex<Capture>>;

async fn body_handler(
    State(capture): State<Shared>,
    headers: HeaderMap,
    Json(req): Json<Value>,
) -> Json<Value> {
    capture.lock().unwrap().authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({
        "prototype_id": format!("proto_{}_real", req["gender"].as_str().unwrap_or("x")),
        "body_measurements_subset": { "chest_cm": 99.5 }
    }))
}

async fn job_handler(Path(id): Path<String>) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("no job {}", id))
}

async fn jobs_handler(
    State(capture): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    capture.lock().unwrap().seller_query = params.get("seller_id").cloned();
    Json(json!([]))
}

async fn ping_handler() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn spawn_stub(capture: Shared) -> (String, oneshot::Sender<()>) {
    let app = Router::new()
        .route("/api/body", post(body_handler))
        .route("/api/job/{id}", get(job_handler))
        .route("/api/jobs", get(jobs_handler))
        .route("/api/ping", get(ping_handler))
        .with_state(capture);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    (format!("http://{}", addr), shutdown_tx)
}

fn client(base_url: &str, api_key: Option<&str>) -> RealEngineClient {
    let config = EngineConfig {
        api_key: api_key.map(str::to_string),
        timeout_ms: 2_000,
        ..EngineConfig::real(base_url)
    };
    RealEngineClient::new(&config).unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_submit_body_sends_bearer_token() {
    let capture = Shared::default();
    let (base_url, shutdown) = spawn_stub(Arc::clone(&capture)).await;
    let engine = client(&format!("{}/", base_url), Some("secret-key"));

    let result = engine
        .submit_body(&BodyRequest {
            gender: Gender::Female,
            age: 31,
            height_cm: 166.0,
            weight_kg: 57.0,
        })
        .await
        .unwrap();

    assert_eq!(result.prototype_id, "proto_female_real");
    assert_eq!(result.measurement("chest_cm"), Some(99.5));
    assert_eq!(
        capture.lock().unwrap().authorization.as_deref(),
        Some("Bearer secret-key")
    );
    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_non_2xx_surfaces_status_and_body() {
    let (base_url, shutdown) = spawn_stub(Shared::default()).await;
    let engine = client(&base_url, None);

    let err = engine.get_job("job-404").await.unwrap_err();
    match &err {
        EngineError::Upstream { status, body } => {
            assert_eq!(*status, 404);
            assert_eq!(body, "no job job-404");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.is_not_found());
    assert!(err.to_string().contains("[404]"));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_list_jobs_encodes_seller() {
    let capture = Shared::default();
    let (base_url, shutdown) = spawn_stub(Arc::clone(&capture)).await;
    let engine = client(&base_url, None);

    let jobs = engine.list_jobs("seller a&b").await.unwrap();
    assert!(jobs.is_empty());
    assert_eq!(capture.lock().unwrap().seller_query.as_deref(), Some("seller a&b"));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_ping_reachable() {
    let (base_url, shutdown) = spawn_stub(Shared::default()).await;
    let ping = client(&base_url, None).ping().await;
    assert!(ping.ok);
    assert_eq!(ping.mode, EngineMode::Real);
    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_ping_unreachable_degrades() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let ping = client(&format!("http://{}", addr), None).ping().await;
    assert!(!ping.ok);
    assert_eq!(ping.mode, EngineMode::Real);
}

#[tokio::test]
async fn test_missing_route_is_upstream_error() {
    let (base_url, shutdown) = spawn_stub(Shared::default()).await;
    let engine = client(&base_url, None);

    let err = engine
        .register_garment(&nv_core::GarmentIntake {
            garment_id: "g-1".to_string(),
            seller_id: "s-1".to_string(),
            images: nv_core::GarmentImages::front("f.jpg"),
            material_token: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Upstream { status: 404, .. }));
    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_truncated_error_body_is_reported() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Promises 100 bytes, sends 5, then hangs up.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\nshort")
            .await;
        let _ = socket.shutdown().await;
    });

    let err = client(&format!("http://{}", addr), None)
        .get_job("job-1")
        .await
        .unwrap_err();
    match err {
        EngineError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert!(body.starts_with("<unreadable body"), "body = {}", body);
        }
        other => panic!("unexpected error: {}", other),
    }
}
