//! Artifact references: display-friendly view over fitting outputs
use crate::data_model::Artifacts;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    DepthPng,
    NormalPng,
    FinalImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    #[serde(rename = "type")]
    pub kind: ArtifactKind,
    pub path: String,
    pub label: String,
}

/// Image artifacts in display order, skipping the ones the engine did not produce.
pub fn build_artifact_refs(artifacts: Option<&Artifacts>) -> Vec<ArtifactRef> {
    let Some(artifacts) = artifacts else {
        return Vec::new();
    };

    [
        (ArtifactKind::DepthPng, &artifacts.depth_png, "Depth Map"),
        (ArtifactKind::NormalPng, &artifacts.normal_png, "Normal Map"),
        (ArtifactKind::FinalImage, &artifacts.final_image, "Final Result"),
    ]
    .into_iter()
    .filter_map(|(kind, path, label)| {
        path.as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| ArtifactRef {
                kind,
                path: p.clone(),
                label: label.to_string(),
            })
    })
    .collect()
}
