//! Neural Vision Core: data model, engine contract and error model
//!
//! Shared vocabulary of the seller portal. Backends live in `nv-engine`,
//! persistence in `nv-store`, the HTTP surface in `nv-api`.

pub mod artifacts;
pub mod client;
pub mod context;
pub mod data_model;
pub mod error;

pub use artifacts::{build_artifact_refs, ArtifactKind, ArtifactRef};
pub use client::EngineClient;
pub use context::RequestContext;
pub use data_model::{
    Artifacts, BodyRequest, BodyResult, EngineMode, FitSignal, FittingRequest, FittingResult,
    GarmentAsset, GarmentImages, GarmentIntake, Gender, ImageWarning, Job, JobStatus, PingResult,
    ProductStatus, SellerProduct, SizeRange, WarningLevel, DEFAULT_AGE,
};
pub use error::EngineError;

/// Pipeline version stamped into mock provenance
pub const PIPELINE_VERSION: &str = "v0.1.0";
