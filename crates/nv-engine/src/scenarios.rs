//! Smoke scenarios: hand-authored end-to-end fixtures for the mock engine
//!
//! Each scenario pins one body input to the body result and fitting result the
//! real pipeline is expected to produce. The mock answers these inputs
//! verbatim so demos and UI work show stable, realistic data.

use nv_core::{
    Artifacts, BodyRequest, BodyResult, FitSignal, FittingResult, Gender, JobStatus,
    PIPELINE_VERSION,
};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct SmokeScenario {
    pub id: &'static str,
    pub label: &'static str,
    pub garment_type: &'static str,
    pub body_request: BodyRequest,
    pub expected_body: BodyResult,
    pub expected_result: FittingResult,
}

/// Allowed |Δ| between a request and a scenario for the fixture to apply
pub const HEIGHT_TOLERANCE_CM: f64 = 3.0;
pub const WEIGHT_TOLERANCE_KG: f64 = 5.0;

impl SmokeScenario {
    /// Same gender, height within ±3 cm, weight within ±5 kg.
    pub fn matches_body(&self, req: &BodyRequest) -> bool {
        self.body_request.gender == req.gender
            && (self.body_request.height_cm - req.height_cm).abs() <= HEIGHT_TOLERANCE_CM
            && (self.body_request.weight_kg - req.weight_kg).abs() <= WEIGHT_TOLERANCE_KG
    }

    /// Same prototype, or a body whose height coincides with the scenario's.
    pub fn matches_fitting(&self, body: &BodyResult) -> bool {
        body.prototype_id == self.expected_body.prototype_id
            || body.measurement("height_cm") == Some(self.body_request.height_cm)
    }
}

pub static SMOKE_SCENARIOS: Lazy<Vec<SmokeScenario>> = Lazy::new(|| {
    vec![
        scenario(Fixture {
            id: "smoke-1-male-tshirt",
            label: "Male t-shirt fitting",
            garment_type: "t-shirt",
            gender: Gender::Male,
            age: 28,
            height_cm: 175.0,
            weight_kg: 70.0,
            measurements: [95.2, 80.1, 94.5, 44.8],
            signal: FitSignal {
                collision_count: 0,
                retry_count: 0,
                quality_score: 0.95,
                warnings: Vec::new(),
            },
            artifact_prefix: "smoke1",
            retry_reason: None,
        }),
        scenario(Fixture {
            id: "smoke-2-female-blouse",
            label: "Female blouse fitting",
            garment_type: "blouse",
            gender: Gender::Female,
            age: 32,
            height_cm: 163.0,
            weight_kg: 55.0,
            measurements: [84.3, 67.2, 91.8, 38.5],
            signal: FitSignal {
                collision_count: 0,
                retry_count: 0,
                quality_score: 0.92,
                warnings: Vec::new(),
            },
            artifact_prefix: "smoke2",
            retry_reason: None,
        }),
        scenario(Fixture {
            id: "smoke-3-male-jacket",
            label: "Male jacket fitting (tight fit warning)",
            garment_type: "jacket",
            gender: Gender::Male,
            age: 40,
            height_cm: 180.0,
            weight_kg: 90.0,
            measurements: [105.8, 92.4, 101.2, 47.5],
            signal: FitSignal {
                collision_count: 3,
                retry_count: 1,
                quality_score: 0.78,
                warnings: vec![
                    "tight_fit_shoulder".to_string(),
                    "sdf_collision_resolved".to_string(),
                ],
            },
            artifact_prefix: "smoke3",
            retry_reason: Some("SDF collision at shoulder region"),
        }),
    ]
});

pub fn find_by_body(req: &BodyRequest) -> Option<&'static SmokeScenario> {
    SMOKE_SCENARIOS.iter().find(|s| s.matches_body(req))
}

pub fn find_by_fitting(body: &BodyResult) -> Option<&'static SmokeScenario> {
    SMOKE_SCENARIOS.iter().find(|s| s.matches_fitting(body))
}

struct Fixture {
    id: &'static str,
    label: &'static str,
    garment_type: &'static str,
    gender: Gender,
    age: u32,
    height_cm: f64,
    weight_kg: f64,
    /// chest, waist, hip, shoulder width
    measurements: [f64; 4],
    signal: FitSignal,
    artifact_prefix: &'static str,
    retry_reason: Option<&'static str>,
}

fn scenario(f: Fixture) -> SmokeScenario {
    let prototype_id = format!("proto_{}_{}", f.gender, f.height_cm as u32);
    let [chest, waist, hip, shoulder] = f.measurements;

    let measurements: BTreeMap<String, f64> = [
        ("height_cm", f.height_cm),
        ("weight_kg", f.weight_kg),
        ("chest_cm", chest),
        ("waist_cm", waist),
        ("hip_cm", hip),
        ("shoulder_width_cm", shoulder),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let mut provenance: Map<String, Value> = Map::new();
    provenance.insert("engine_mode".into(), json!("mock"));
    provenance.insert("pipeline_version".into(), json!(PIPELINE_VERSION));
    provenance.insert("body_prototype".into(), json!(prototype_id));
    provenance.insert("sdf_bank_version".into(), json!("mock-v0"));
    provenance.insert("generation_method".into(), json!("ControlNet+IP-Adapter"));
    if let Some(reason) = f.retry_reason {
        provenance.insert("retry_reason".into(), json!(reason));
    }

    let sample = |kind: &str| format!("/demo_artifacts/samples/{}_{}.png", f.artifact_prefix, kind);

    SmokeScenario {
        id: f.id,
        label: f.label,
        garment_type: f.garment_type,
        body_request: BodyRequest {
            gender: f.gender,
            age: f.age,
            height_cm: f.height_cm,
            weight_kg: f.weight_kg,
        },
        expected_body: BodyResult {
            mesh_ref: Some(format!("mock://body_mesh/{}.npz", prototype_id)),
            prototype_id,
            body_measurements_subset: measurements,
        },
        expected_result: FittingResult {
            job_id: f.id.to_string(),
            status: JobStatus::Completed,
            artifacts: Some(Artifacts {
                depth_png: Some(sample("depth")),
                normal_png: Some(sample("normal")),
                fit_signal: Some(f.signal),
                final_image: Some(sample("final")),
            }),
            provenance,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_scenarios() {
        assert_eq!(SMOKE_SCENARIOS.len(), 3);
        let ids: Vec<_> = SMOKE_SCENARIOS.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            ["smoke-1-male-tshirt", "smoke-2-female-blouse", "smoke-3-male-jacket"]
        );
        let garments: Vec<_> = SMOKE_SCENARIOS.iter().map(|s| s.garment_type).collect();
        assert_eq!(garments, ["t-shirt", "blouse", "jacket"]);
        assert!(SMOKE_SCENARIOS.iter().all(|s| !s.label.is_empty()));
    }

    #[test]
    fn test_tolerances_are_inclusive() {
        let req = BodyRequest {
            gender: Gender::Male,
            age: 50,
            height_cm: 178.0,
            weight_kg: 75.0,
        };
        assert_eq!(find_by_body(&req).map(|s| s.id), Some("smoke-1-male-tshirt"));

        let too_tall = BodyRequest {
            height_cm: 178.5,
            ..req.clone()
        };
        assert!(SMOKE_SCENARIOS[0].matches_body(&req));
        assert!(!SMOKE_SCENARIOS[0].matches_body(&too_tall));
    }

    #[test]
    fn test_gender_must_match() {
        let req = BodyRequest {
            gender: Gender::Female,
            age: 28,
            height_cm: 175.0,
            weight_kg: 70.0,
        };
        assert!(find_by_body(&req).is_none());
    }

    #[test]
    fn test_jacket_fixture_carries_retry() {
        let jacket = &SMOKE_SCENARIOS[2];
        let signal = jacket
            .expected_result
            .artifacts
            .as_ref()
            .and_then(|a| a.fit_signal.as_ref())
            .unwrap();
        assert_eq!(signal.collision_count, 3);
        assert_eq!(signal.retry_count, 1);
        assert_eq!(signal.warnings, ["tight_fit_shoulder", "sdf_collision_resolved"]);
        assert_eq!(
            jacket.expected_result.provenance["retry_reason"],
            "SDF collision at shoulder region"
        );
    }
}
