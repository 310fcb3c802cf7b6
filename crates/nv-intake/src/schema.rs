//! Schema validation for intake payloads
//!
//! A schema is compiled once and then reused for every payload. Failures come
//! back as data (path + message pairs) so callers can render per-field errors.

use crate::IntakeError;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Garment categories accepted at intake
pub const CATEGORIES: &[&str] = &["t-shirt", "blouse", "jacket", "pants", "dress", "other"];

/// Material tokens understood by the garment module
pub const MATERIAL_TOKENS: &[&str] = &[
    "cotton_basic",
    "cotton_stretch",
    "polyester",
    "silk",
    "denim",
    "wool",
    "linen",
    "nylon",
    "leather",
    "other",
];

/// Single schema violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaError {
    /// Dotted path of the offending field (empty for the document root)
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<SchemaError>,
}

impl ValidationReport {
    pub fn has_error_at(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}

/// Compiled schema
pub struct SchemaValidator {
    name: String,
    validator: Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("SchemaValidator").field("name", &self.name).finish()
    }
}

impl SchemaValidator {
    /// Compile `schema` (draft 7).
    pub fn compile(name: impl Into<String>, schema: &Value) -> Result<Self, IntakeError> {
        let name = name.into();
        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .build(schema)
            .map_err(|err| IntakeError::SchemaCompile {
                name: name.clone(),
                reason: err.to_string(),
            })?;
        Ok(Self { name, validator })
    }

    /// Validator for the seller garment intake contract.
    pub fn garment_intake() -> Result<Self, IntakeError> {
        Self::compile("garment-intake", &garment_intake_schema())
    }

    /// Collects every violation; never fails on a malformed payload.
    pub fn validate(&self, payload: &Value) -> ValidationReport {
        let mut errors = Vec::new();

        for err in self.validator.iter_errors(payload) {
            let base = dotted(&err.instance_path.to_string());
            let message = err.to_string();
            match &err.kind {
                ValidationErrorKind::Required { property } => {
                    let property = property
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| property.to_string());
                    errors.push(SchemaError {
                        path: join(&base, &property),
                        message,
                    });
                }
                ValidationErrorKind::AdditionalProperties { unexpected } => {
                    for property in unexpected {
                        errors.push(SchemaError {
                            path: join(&base, property),
                            message: message.clone(),
                        });
                    }
                }
                _ => errors.push(SchemaError { path: base, message }),
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                schema = %self.name,
                count = errors.len(),
                "payload rejected by schema"
            );
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// `/images/front` → `images.front`
fn dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn join(base: &str, property: &str) -> String {
    if base.is_empty() {
        property.to_string()
    } else {
        format!("{}.{}", base, property)
    }
}

/// Seller intake contract for a garment product.
pub fn garment_intake_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "garment_id": { "type": "string", "minLength": 1 },
            "seller_id": { "type": "string", "minLength": 1 },
            "name": { "type": "string", "minLength": 1, "maxLength": 200 },
            "category": { "type": "string", "enum": CATEGORIES },
            "images": {
                "type": "object",
                "properties": {
                    "front": { "type": "string", "minLength": 1 },
                    "side": { "type": "string" },
                    "back": { "type": "string" },
                    "hero": { "type": "string" }
                },
                "required": ["front"]
            },
            "material_token": { "type": "string", "enum": MATERIAL_TOKENS },
            "size_range": {
                "type": "object",
                "properties": {
                    "min": { "type": "string" },
                    "max": { "type": "string" }
                }
            },
            "description": { "type": "string", "maxLength": 1000 }
        },
        "required": ["garment_id", "seller_id", "name", "category", "images", "material_token"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Value {
        json!({
            "garment_id": "g-100",
            "seller_id": "seller-1",
            "name": "Basic Tee",
            "category": "t-shirt",
            "images": { "front": "https://cdn.example/front.jpg" },
            "material_token": "cotton_basic"
        })
    }

    #[test]
    fn test_minimal_payload_passes() {
        let validator = SchemaValidator::garment_intake().unwrap();
        let report = validator.validate(&minimal());
        assert!(report.valid, "unexpected errors: {:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_front_is_reported_at_path() {
        let validator = SchemaValidator::garment_intake().unwrap();
        let mut payload = minimal();
        payload["images"] = json!({ "side": "s.jpg" });

        let report = validator.validate(&payload);
        assert!(!report.valid);
        assert!(report.has_error_at("images.front"), "{:?}", report.errors);
    }

    #[test]
    fn test_unknown_category_fails() {
        let validator = SchemaValidator::garment_intake().unwrap();
        let mut payload = minimal();
        payload["category"] = json!("spacesuit");

        let report = validator.validate(&payload);
        assert!(!report.valid);
        assert!(report.has_error_at("category"));
    }

    #[test]
    fn test_undeclared_field_fails() {
        let validator = SchemaValidator::garment_intake().unwrap();
        let mut payload = minimal();
        payload["price"] = json!(19.99);

        let report = validator.validate(&payload);
        assert!(!report.valid);
        assert!(report.has_error_at("price"));
    }

    #[test]
    fn test_all_errors_collected() {
        let validator = SchemaValidator::garment_intake().unwrap();
        let report = validator.validate(&json!({}));

        assert!(!report.valid);
        for field in ["garment_id", "seller_id", "name", "category", "images", "material_token"] {
            assert!(report.has_error_at(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_non_object_payload_is_data_not_panic() {
        let validator = SchemaValidator::garment_intake().unwrap();
        let report = validator.validate(&json!("just a string"));
        assert!(!report.valid);
        assert_eq!(report.errors[0].path, "");
    }

    #[test]
    fn test_dotted_paths() {
        assert_eq!(dotted("/images/front"), "images.front");
        assert_eq!(dotted(""), "");
        assert_eq!(join("", "name"), "name");
    }

    #[test]
    fn test_bad_schema_does_not_compile() {
        let err = SchemaValidator::compile("broken", &json!({ "type": "not-a-type" })).unwrap_err();
        assert!(matches!(err, IntakeError::SchemaCompile { .. }));
    }
}
