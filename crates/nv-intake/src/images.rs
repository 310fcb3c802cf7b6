//! Image advisories
//!
//! Missing photos lower reconstruction quality but only a missing front view
//! makes intake impossible. The check reports; the caller decides what blocks.

use nv_core::{GarmentImages, ImageWarning, WarningLevel};

const FRONT_MISSING: &str = "Front image is required.";
const SIDE_MISSING: &str = "Without a side image the proxy mesh is less precise.";
const BACK_MISSING: &str = "Back image recommended: improves texture DNA completeness.";
const HERO_MISSING: &str = "Hero image recommended: used for the showcase display.";

/// Advisories for every missing or empty image slot, front to hero.
pub fn check_image_warnings(images: &GarmentImages) -> Vec<ImageWarning> {
    let slots = [
        (images.front.as_deref(), "images.front", WarningLevel::Error, FRONT_MISSING),
        (images.side.as_deref(), "images.side", WarningLevel::Warning, SIDE_MISSING),
        (images.back.as_deref(), "images.back", WarningLevel::Info, BACK_MISSING),
        (images.hero.as_deref(), "images.hero", WarningLevel::Info, HERO_MISSING),
    ];

    slots
        .into_iter()
        .filter(|(value, ..)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(_, field, level, message)| ImageWarning {
            field: field.to_string(),
            level,
            message: message.to_string(),
        })
        .collect()
}

/// Whether any advisory is severe enough to reject the upload.
pub fn has_blocking(warnings: &[ImageWarning]) -> bool {
    warnings.iter().any(|w| w.level == WarningLevel::Error)
}
