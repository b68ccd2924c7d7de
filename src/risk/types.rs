use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized environmental snapshot for a single point.
///
/// Assembled from the weather, soil and terrain collaborators (plus an
/// optional rainfall override) before the engine runs. Field names follow
/// the JSON shape served by `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Scaled rainfall intensity proxy (precipitation x 10), mm
    pub rain: f64,
    /// Raw precipitation, mm (live or simulated)
    pub precip_real: f64,
    /// Ground inclination, degrees
    pub slope: f64,
    /// Meters above datum
    pub elevation: f64,
    /// Air temperature, °C
    pub temp: f64,
    /// WMO weather condition code
    pub code: i32,
    /// Bulk density on the x100 soil-survey scale (130 ≈ 1.3 g/cm³)
    pub bulk_density: f64,
    pub clay: f64,
    pub sand: f64,
    pub silt: f64,
    #[serde(rename = "isWater")]
    pub is_water: bool,
}

impl FeatureSet {
    /// Texture fractions (clay, sand, silt) in 0..1. Not re-normalized.
    pub fn fractions(&self) -> (f64, f64, f64) {
        (self.clay / 100.0, self.sand / 100.0, self.silt / 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionDetails {
    #[serde(rename = "FoS")]
    pub fos: f64,
    pub cohesion_base: f64,
    pub friction_base: f64,
    pub cohesion_effective: f64,
    pub friction_effective: f64,
    pub shear_strength: f64,
    pub shear_stress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub level: RiskLevel,
    pub reason: String,
    pub details: PredictionDetails,
    /// Failure probability; only set when the stability model ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}
