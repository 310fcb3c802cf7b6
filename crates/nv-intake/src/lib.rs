//! Neural Vision Intake: seller intake contract enforcement
//!
//! This crate checks what sellers upload before anything reaches the engine:
//! a compiled JSON schema for the garment intake contract, advisory checks on
//! the uploaded photos, and the pinned contracts manifest.
//!
//! # Example
//!
//! ```ignore
//! use nv_intake::{IntakeGate, IntakeVerdict};
//!
//! let gate = IntakeGate::garment()?;
//! match gate.evaluate(&payload) {
//!     IntakeVerdict::Accepted { submission, warnings } => register(submission, warnings),
//!     IntakeVerdict::SchemaRejected(errors) => render_field_errors(errors),
//!     IntakeVerdict::ImagesRejected(warnings) => render_image_errors(warnings),
//! }
//! ```

pub mod contracts;
pub mod gate;
pub mod images;
pub mod schema;

pub use contracts::ContractsManifest;
pub use gate::{IntakeGate, IntakeVerdict, ProductSubmission};
pub use images::{check_image_warnings, has_blocking};
pub use schema::{SchemaError, SchemaValidator, ValidationReport};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("SCHEMA/{name} does not compile: {reason}")]
    SchemaCompile { name: String, reason: String },

    #[error("IO/{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("PARSE/{0}")]
    Parse(serde_json::Error),

    #[error("LOCK/invalid contracts lock: {}", describe(.0))]
    InvalidLock(Vec<SchemaError>),
}

fn describe(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
