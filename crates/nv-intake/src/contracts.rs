//! Pinned contracts manifest (`contracts.lock.json`)
use crate::schema::SchemaValidator;
use crate::IntakeError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Which revision of the engine contracts this portal was built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsManifest {
    pub repo: String,
    pub tag: String,
    pub commit: String,
    pub pinned_at: String,
}

pub fn lock_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "repo": { "type": "string", "minLength": 1 },
            "tag": { "type": "string", "minLength": 1 },
            "commit": { "type": "string", "minLength": 1 },
            "pinned_at": { "type": "string", "minLength": 1 }
        },
        "required": ["repo", "tag", "commit", "pinned_at"],
        "additionalProperties": true
    })
}

impl ContractsManifest {
    /// Validate a parsed lock document and extract the manifest. Extra fields are ignored.
    pub fn from_value(value: &Value) -> Result<Self, IntakeError> {
        let validator = SchemaValidator::compile("contracts-lock", &lock_schema())?;
        let report = validator.validate(value);
        if !report.valid {
            return Err(IntakeError::InvalidLock(report.errors));
        }
        serde_json::from_value(value.clone()).map_err(IntakeError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| IntakeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(IntakeError::Parse)?;
        let manifest = Self::from_value(&value)?;
        tracing::info!(repo = %manifest.repo, tag = %manifest.tag, "contracts lock loaded");
        Ok(manifest)
    }
}
