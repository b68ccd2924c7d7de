use super::types::{FeatureSet, PredictionDetails, PredictionResult, RiskLevel};

/// WMO codes for snow fall, snow grains and snow showers.
pub const SNOW_ICE_CODES: [i32; 6] = [71, 73, 75, 77, 85, 86];

const WATER_REASON: &str =
    "This location is open water or has no soil cover, so landslide analysis does not apply.";
const SNOW_REASON: &str = "Snow or ice conditions detected. The main hazard here is avalanche or \
thaw slump rather than soil shear failure.";

/// Terrain that bypasses the soil stability model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialCase {
    Water,
    SnowIce,
}

/// Water is checked before snow/ice; the first hit wins.
pub fn classify(features: &FeatureSet) -> Option<SpecialCase> {
    if is_water(features) {
        Some(SpecialCase::Water)
    } else if is_snow_ice(features) {
        Some(SpecialCase::SnowIce)
    } else {
        None
    }
}

pub fn is_water(features: &FeatureSet) -> bool {
    features.is_water
        || ((-5.0..=5.0).contains(&features.elevation)
            && features.slope.abs() < 0.5
            && features.bulk_density < 20.0)
}

pub fn is_snow_ice(features: &FeatureSet) -> bool {
    SNOW_ICE_CODES.contains(&features.code) || features.temp < -1.0
}

impl SpecialCase {
    /// Fixed result for this terrain class.
    pub fn result(&self, features: &FeatureSet) -> PredictionResult {
        match self {
            SpecialCase::Water => PredictionResult {
                level: RiskLevel::Safe,
                reason: WATER_REASON.to_string(),
                details: PredictionDetails {
                    fos: 100.0,
                    cohesion_base: 0.0,
                    friction_base: 0.0,
                    cohesion_effective: 0.0,
                    friction_effective: 0.0,
                    shear_strength: 0.0,
                    shear_stress: 0.0,
                },
                probability: None,
            },
            SpecialCase::SnowIce => {
                let steep = features.slope > 30.0;
                PredictionResult {
                    level: if steep { RiskLevel::High } else { RiskLevel::Medium },
                    reason: SNOW_REASON.to_string(),
                    details: PredictionDetails {
                        // Literal stand-ins, not Mohr-Coulomb output
                        fos: if steep { 0.9 } else { 1.5 },
                        cohesion_base: 50.0,
                        friction_base: 10.0,
                        cohesion_effective: 50.0,
                        friction_effective: 10.0,
                        shear_strength: 0.0,
                        shear_stress: 0.0,
                    },
                    probability: None,
                }
            }
        }
    }
}
