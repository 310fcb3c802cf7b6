//! Intake gate for seller product registration
//!
//! Runs the schema check first, then the image advisories, and produces a
//! verdict: accepted (with non-blocking advisories) or rejected with the
//! reason the seller has to fix.

use crate::images::{check_image_warnings, has_blocking};
use crate::schema::{SchemaError, SchemaValidator};
use crate::IntakeError;
use nv_core::{
    GarmentAsset, GarmentImages, GarmentIntake, ImageWarning, ProductStatus, SellerProduct,
    SizeRange, WarningLevel,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product payload that passed the intake schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSubmission {
    pub garment_id: String,
    pub seller_id: String,
    pub name: String,
    pub category: String,
    pub images: GarmentImages,
    pub material_token: String,
    #[serde(default)]
    pub size_range: Option<SizeRange>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductSubmission {
    /// The subset of the submission the engine's garment module consumes.
    pub fn to_garment_intake(&self) -> GarmentIntake {
        GarmentIntake {
            garment_id: self.garment_id.clone(),
            seller_id: self.seller_id.clone(),
            images: self.images.clone(),
            material_token: Some(self.material_token.clone()),
        }
    }

    /// Build the stored product once the engine registered the garment.
    /// Only non-blocking advisories are kept on the record.
    pub fn into_product(self, asset: GarmentAsset, warnings: &[ImageWarning]) -> SellerProduct {
        let now = chrono::Utc::now();
        SellerProduct {
            garment_id: self.garment_id,
            seller_id: self.seller_id,
            name: self.name,
            category: self.category,
            images: self.images,
            material_token: self.material_token,
            size_range: self.size_range,
            description: self.description,
            status: ProductStatus::Ready,
            created_at: now,
            updated_at: now,
            engine_asset: Some(asset),
            warnings: warnings
                .iter()
                .filter(|w| w.level != WarningLevel::Error)
                .cloned()
                .collect(),
        }
    }
}

/// Outcome of running a payload through the gate.
#[derive(Debug, Clone)]
pub enum IntakeVerdict {
    Accepted {
        submission: ProductSubmission,
        warnings: Vec<ImageWarning>,
    },
    SchemaRejected(Vec<SchemaError>),
    ImagesRejected(Vec<ImageWarning>),
}

/// Gate that evaluates raw product payloads
#[derive(Debug)]
pub struct IntakeGate {
    validator: SchemaValidator,
}

impl IntakeGate {
    pub fn new(validator: SchemaValidator) -> Self {
        Self { validator }
    }

    /// Gate for the garment intake contract.
    pub fn garment() -> Result<Self, IntakeError> {
        Ok(Self::new(SchemaValidator::garment_intake()?))
    }

    pub fn evaluate(&self, payload: &Value) -> IntakeVerdict {
        let report = self.validator.validate(payload);
        if !report.valid {
            return IntakeVerdict::SchemaRejected(report.errors);
        }

        let submission: ProductSubmission = match serde_json::from_value(payload.clone()) {
            Ok(s) => s,
            Err(e) => {
                return IntakeVerdict::SchemaRejected(vec![SchemaError {
                    path: String::new(),
                    message: e.to_string(),
                }])
            }
        };

        let warnings = check_image_warnings(&submission.images);
        if has_blocking(&warnings) {
            return IntakeVerdict::ImagesRejected(warnings);
        }

        IntakeVerdict::Accepted {
            submission,
            warnings,
        }
    }
}
