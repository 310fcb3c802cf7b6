//! Data Model: body, garment, fitting and job records shared by every crate
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// BODY MODULE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// Age assumed when a request or a recovered job omits it.
pub const DEFAULT_AGE: u32 = 30;

fn default_age() -> u32 {
    DEFAULT_AGE
}

/// Body measurements submitted by a shopper. Carries no identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRequest {
    pub gender: Gender,
    #[serde(default = "default_age")]
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
}

/// Output of the body module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyResult {
    /// Derived key of the representative body template
    pub prototype_id: String,
    /// Measurement name → value (cm / kg)
    pub body_measurements_subset: BTreeMap<String, f64>,
    /// Opaque reference to the body mesh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_ref: Option<String>,
}

impl BodyResult {
    pub fn measurement(&self, name: &str) -> Option<f64> {
        self.body_measurements_subset.get(name).copied()
    }
}

// ============================================================================
// GARMENT MODULE
// ============================================================================

/// Seller supplied garment photos. Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<String>,
}

impl GarmentImages {
    pub fn front(front: impl Into<String>) -> Self {
        Self {
            front: Some(front.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentIntake {
    #[serde(default)]
    pub garment_id: String,
    #[serde(default)]
    pub seller_id: String,
    #[serde(default)]
    pub images: GarmentImages,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentAsset {
    pub garment_id: String,
    /// Opaque reference to the garment embedding
    pub embedding_ref: String,
    #[serde(default)]
    pub latent_meta: Map<String, Value>,
}

// ============================================================================
// FITTING MODULE
// ============================================================================

/// Transient input of a fitting submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingRequest {
    #[serde(default)]
    pub job_id: String,
    pub body: BodyResult,
    pub garment: GarmentAsset,
    /// Seller the resulting job is attributed to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSignal {
    pub collision_count: u32,
    pub retry_count: u32,
    /// 0.0 ..= 1.0
    pub quality_score: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit_signal: Option<FitSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingResult {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Artifacts>,
    #[serde(default)]
    pub provenance: Map<String, Value>,
}

// ============================================================================
// JOB
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// pending → processing → completed | failed, and pending → failed.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Failed)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub seller_id: String,
    pub garment_id: String,
    pub body_request: BodyRequest,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<FittingResult>,
}

impl Job {
    /// New job in `pending`.
    pub fn pending(
        job_id: impl Into<String>,
        seller_id: impl Into<String>,
        garment_id: impl Into<String>,
        body_request: BodyRequest,
    ) -> Self {
        let now = Utc::now();
        Self {
            job_id: job_id.into(),
            seller_id: seller_id.into(),
            garment_id: garment_id.into(),
            body_request,
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            result: None,
        }
    }

    /// Moves the job to `next`, refreshing `updated_at`.
    pub fn transition(&mut self, next: JobStatus) -> Result<(), crate::error::EngineError> {
        if !self.status.can_transition_to(next) {
            return Err(crate::error::EngineError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ============================================================================
// SELLER PORTAL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    Info,
    Warning,
    Error,
}

/// Advisory finding about the uploaded garment photos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageWarning {
    /// Dotted payload path, e.g. `images.side`
    pub field: String,
    pub level: WarningLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Processing,
    Ready,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerProduct {
    pub garment_id: String,
    pub seller_id: String,
    pub name: String,
    pub category: String,
    pub images: GarmentImages,
    pub material_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_range: Option<SizeRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_asset: Option<GarmentAsset>,
    #[serde(default)]
    pub warnings: Vec<ImageWarning>,
}

// ============================================================================
// HEALTH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    Mock,
    Real,
}

impl EngineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Real => "real",
        }
    }
}

impl Default for EngineMode {
    fn default() -> Self {
        Self::Mock
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "real" => Ok(Self::Real),
            other => Err(format!("unknown engine mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    pub ok: bool,
    pub mode: EngineMode,
}
