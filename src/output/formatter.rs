use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::risk::{PredictionResult, RiskLevel};
use crate::service::PredictResponse;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Upper-case level label, colored by severity
pub fn format_level(level: RiskLevel, use_colors: bool) -> String {
    let label = level.as_str().to_uppercase();
    if !use_colors {
        return label;
    }
    match level {
        RiskLevel::Safe => label.cyan().bold().to_string(),
        RiskLevel::Low => label.green().bold().to_string(),
        RiskLevel::Medium => label.yellow().bold().to_string(),
        RiskLevel::High => label.red().bold().to_string(),
    }
}

/// FoS with two decimals; values >= 100 are shown whole (fixed overrides)
pub fn format_fos(fos: f64) -> String {
    if fos >= 100.0 {
        format!("{:.0}", fos)
    } else {
        format!("{:.2}", fos)
    }
}

/// Engine result only: level, reason and the stress breakdown
pub fn format_prediction(prediction: &PredictionResult, use_colors: bool) -> String {
    let d = &prediction.details;
    let probability = prediction
        .probability
        .map(|p| format!("{:.0}%", p * 100.0))
        .unwrap_or_else(|| "n/a".to_string());
    let reason = if use_colors {
        prediction.reason.italic().to_string()
    } else {
        prediction.reason.clone()
    };

    format!(
        "Risk: {}\n  {}\n  Factor of safety: {}\n  Failure probability: {}\n  \
Cohesion: {:.2} kPa base, {:.2} kPa effective\n  Friction: {:.2}° base, {:.2}° effective\n  \
Shear: {:.2} kPa resisting / {:.2} kPa driving",
        format_level(prediction.level, use_colors),
        reason,
        format_fos(d.fos),
        probability,
        d.cohesion_base,
        d.cohesion_effective,
        d.friction_base,
        d.friction_effective,
        d.shear_strength,
        d.shear_stress,
    )
}

/// Full response: location, inputs, then the prediction
pub fn format_response(response: &PredictResponse, use_colors: bool) -> String {
    let f = &response.data.features;
    let location = format!("{:.4}, {:.4}", response.location.lat, response.location.lng);
    let rain_note = if response.is_simulated { " (simulated)" } else { "" };

    let mut lines = vec![
        if use_colors {
            format!("Location: {}", location.bold())
        } else {
            format!("Location: {}", location)
        },
        format!(
            "  Weather: {:.1}°C, {:.0}% humidity, {} mm precipitation{}, code {}",
            f.temp, response.data.humidity, f.precip_real, rain_note, f.code
        ),
        format!("  Terrain: {:.0} m elevation, {:.1}° slope", f.elevation, f.slope),
        if f.is_water {
            "  Soil: none (open water)".to_string()
        } else {
            format!(
                "  Soil: {:.0}% clay, {:.0}% sand, {:.0}% silt, bulk density {:.0}",
                f.clay, f.sand, f.silt, f.bulk_density
            )
        },
    ];

    if !response.fallbacks.is_empty() {
        let note = format!("  Defaults used for: {}", response.fallbacks.join(", "));
        lines.push(if use_colors { note.dimmed().to_string() } else { note });
    }

    lines.push(String::new());
    lines.push(format_prediction(&response.prediction, use_colors));
    lines.join("\n")
}

/// Pretty JSON in the same shape `POST /predict` returns
pub fn format_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::{evaluate, FeatureSet};
    use crate::service::SiteData;
    use crate::sources::Location;

    fn features() -> FeatureSet {
        FeatureSet {
            rain: 900.0,
            precip_real: 90.0,
            slope: 40.0,
            elevation: 1320.0,
            temp: 17.0,
            code: 65,
            bulk_density: 130.0,
            clay: 10.0,
            sand: 80.0,
            silt: 10.0,
            is_water: false,
        }
    }

    #[test]
    fn test_format_fos() {
        assert_eq!(format_fos(0.38454), "0.38");
        assert_eq!(format_fos(20.0), "20.00");
        assert_eq!(format_fos(100.0), "100");
    }

    #[test]
    fn test_format_level_plain() {
        assert_eq!(format_level(RiskLevel::High, false), "HIGH");
        assert_eq!(format_level(RiskLevel::Safe, false), "SAFE");
    }

    #[test]
    fn test_format_level_colored_contains_label() {
        let colored = format_level(RiskLevel::Medium, true);
        assert!(colored.contains("MEDIUM"));
        assert_ne!(colored, "MEDIUM");
    }

    #[test]
    fn test_format_prediction_plain() {
        let output = format_prediction(&evaluate(&features()), false);
        assert!(output.starts_with("Risk: HIGH"));
        assert!(output.contains("Factor of safety: 0.38"));
        assert!(output.contains("Failure probability: 95%"));
        assert!(output.contains("Sandy soil (80% sand)"));
    }

    #[test]
    fn test_format_response_simulated_with_fallbacks() {
        let features = features();
        let response = PredictResponse {
            location: Location { lat: 28.2096, lng: 83.9856 },
            prediction: evaluate(&features),
            data: SiteData {
                features,
                humidity: 95.0,
            },
            is_simulated: true,
            fallbacks: vec!["soil".to_string()],
        };
        let output = format_response(&response, false);
        assert!(output.starts_with("Location: 28.2096, 83.9856"));
        assert!(output.contains("90 mm precipitation (simulated)"));
        assert!(output.contains("Defaults used for: soil"));
        assert!(output.contains("Risk: HIGH"));
    }

    #[test]
    fn test_format_water_prediction() {
        let mut f = features();
        f.is_water = true;
        let output = format_prediction(&evaluate(&f), false);
        assert!(output.starts_with("Risk: SAFE"));
        assert!(output.contains("Factor of safety: 100"));
        assert!(output.contains("Failure probability: n/a"));
    }
}
