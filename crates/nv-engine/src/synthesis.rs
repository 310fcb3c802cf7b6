//! Deterministic body synthesis for inputs no smoke scenario covers
//!
//! Pure functions of the request: the same input always yields the same
//! prototype and measurements. No jitter is ever applied.

use nv_core::{BodyRequest, BodyResult, Gender};
use std::collections::BTreeMap;

/// Upper bounds (exclusive) of BMI bins 0..=4; anything above is bin 5.
pub const BMI_THRESHOLDS: [f64; 5] = [18.5, 22.0, 25.0, 28.0, 32.0];

/// Reference BMI at which measurements equal the gender base.
const REFERENCE_BMI: f64 = 22.0;

/// chest, waist, hip, shoulder width (cm) at the reference BMI
struct Base {
    chest: f64,
    waist: f64,
    hip: f64,
    shoulder: f64,
}

const MALE: Base = Base {
    chest: 94.0,
    waist: 79.0,
    hip: 93.0,
    shoulder: 44.5,
};

const FEMALE: Base = Base {
    chest: 85.0,
    waist: 68.0,
    hip: 92.0,
    shoulder: 38.5,
};

/// cm per BMI point
const CHEST_SLOPE: f64 = 1.6;
const WAIST_SLOPE: f64 = 2.0;
const HIP_SLOPE: f64 = 1.3;
const SHOULDER_SLOPE: f64 = 0.4;

/// Nearest 2 cm step.
pub fn quantize_height(height_cm: f64) -> u32 {
    ((height_cm / 2.0).round() * 2.0).max(0.0) as u32
}

pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight_kg / (meters * meters)
}

/// Closed-below / open-above bins over [`BMI_THRESHOLDS`].
pub fn bmi_bin(bmi: f64) -> u8 {
    BMI_THRESHOLDS
        .iter()
        .position(|&upper| bmi < upper)
        .unwrap_or(BMI_THRESHOLDS.len()) as u8
}

pub fn prototype_id(gender: Gender, height_cm: f64, weight_kg: f64) -> String {
    format!(
        "proto_{}_{}_bmi{}",
        gender,
        quantize_height(height_cm),
        bmi_bin(bmi(height_cm, weight_kg))
    )
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Formula-derived body result. Callers must reject non-positive height/weight first.
pub fn synthesize_body(req: &BodyRequest) -> BodyResult {
    let base = match req.gender {
        Gender::Male => &MALE,
        Gender::Female => &FEMALE,
    };
    let delta = bmi(req.height_cm, req.weight_kg) - REFERENCE_BMI;
    let prototype_id = prototype_id(req.gender, req.height_cm, req.weight_kg);

    let mut measurements = BTreeMap::new();
    measurements.insert("height_cm".to_string(), req.height_cm);
    measurements.insert("weight_kg".to_string(), req.weight_kg);
    measurements.insert("chest_cm".to_string(), round1(base.chest + CHEST_SLOPE * delta));
    measurements.insert("waist_cm".to_string(), round1(base.waist + WAIST_SLOPE * delta));
    measurements.insert("hip_cm".to_string(), round1(base.hip + HIP_SLOPE * delta));
    measurements.insert(
        "shoulder_width_cm".to_string(),
        round1(base.shoulder + SHOULDER_SLOPE * delta),
    );

    BodyResult {
        mesh_ref: Some(format!("mock://body_mesh/{}.npz", prototype_id)),
        prototype_id,
        body_measurements_subset: measurements,
    }
}

/// Gender encoded in a `proto_<gender>_...` id.
pub fn gender_of_prototype(prototype_id: &str) -> Option<Gender> {
    prototype_id
        .strip_prefix("proto_")
        .and_then(|rest| rest.split('_').next())
        .and_then(|g| g.parse().ok())
}
