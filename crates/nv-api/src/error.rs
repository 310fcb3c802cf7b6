//! HTTP error mapping
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nv_core::{EngineError, ImageWarning};
use nv_intake::SchemaError;
use nv_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Schema validation failed")]
    SchemaInvalid(Vec<SchemaError>),

    #[error("Image validation failed")]
    ImageRejected(Vec<ImageWarning>),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::SchemaInvalid(_) | Self::ImageRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Engine(EngineError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Engine(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Engine(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let message = self.to_string();
        let body = match self {
            Self::SchemaInvalid(details) => json!({ "error": message, "details": details }),
            Self::ImageRejected(warnings) => json!({ "error": message, "warnings": warnings }),
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}
