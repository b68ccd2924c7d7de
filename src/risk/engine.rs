use super::narrative;
use super::soil::{base_strength, effective_strength, RainBand};
use super::special;
use super::stability::{classify, infinite_slope, level_for_probability};
use super::types::{FeatureSet, PredictionDetails, PredictionResult};

/// Evaluate landslide risk for one feature snapshot.
///
/// Pure and total: water and snow/ice terrain short-circuit to fixed results,
/// everything else runs texture strength -> saturation -> infinite-slope
/// stability -> probability -> level, with the narrative built from the
/// clauses that fire.
pub fn evaluate(features: &FeatureSet) -> PredictionResult {
    if let Some(case) = special::classify(features) {
        return case.result(features);
    }

    let band = RainBand::from_rain(features.rain);
    let base = base_strength(features);
    let effective = effective_strength(base, band);
    let stability = infinite_slope(features.slope, features.bulk_density, effective, band);
    let (fos, probability) = classify(features.slope, stability.fos);

    PredictionResult {
        level: level_for_probability(probability),
        reason: narrative::compose(features),
        details: PredictionDetails {
            fos,
            cohesion_base: base.cohesion,
            friction_base: base.friction,
            cohesion_effective: effective.cohesion,
            friction_effective: effective.friction,
            shear_strength: stability.resisting,
            shear_stress: stability.driving,
        },
        probability: Some(probability),
    }
}
