pub mod client;
pub mod soil;
pub mod terrain;
pub mod weather;

pub use client::{create_client, SourceClient};
pub use soil::SoilReading;
pub use terrain::TerrainReading;
pub use weather::WeatherReading;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::risk::FeatureSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            anyhow::bail!("lat must be between -90 and 90, got {}", self.lat);
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            anyhow::bail!("lng must be between -180 and 180, got {}", self.lng);
        }
        Ok(())
    }
}

/// Result of one upstream call. Failures carry the default value to use instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(T),
    Fallback { value: T, cause: String },
}

impl<T> FetchOutcome<T> {
    pub fn from_result(result: Result<T>, fallback: impl FnOnce() -> T) -> Self {
        match result {
            Ok(value) => FetchOutcome::Fetched(value),
            Err(e) => FetchOutcome::Fallback {
                value: fallback(),
                cause: format!("{:#}", e),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FetchOutcome::Fallback { .. })
    }

    /// Collapse to the value, logging a warning when it is a fallback.
    pub fn into_value(self, source: &str) -> T {
        match self {
            FetchOutcome::Fetched(value) => value,
            FetchOutcome::Fallback { value, cause } => {
                crate::warn_eprintln!("{} data unavailable, using defaults: {}", source, cause);
                value
            }
        }
    }
}

/// Everything the three collaborators reported for one point.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteReadings {
    pub weather: WeatherReading,
    pub soil: SoilReading,
    pub terrain: TerrainReading,
    /// Sources that fell back to defaults
    pub fallbacks: Vec<&'static str>,
}

/// Query weather, soil and terrain concurrently. Never fails: each source
/// falls back to its defaults on its own.
pub async fn fetch_site(client: &SourceClient, location: &Location) -> SiteReadings {
    let (weather, soil, terrain) = futures::join!(
        weather::fetch_weather(client, location),
        soil::fetch_soil(client, location),
        terrain::fetch_terrain(client, location)
    );

    let mut fallbacks = Vec::new();
    if weather.is_fallback() {
        fallbacks.push("weather");
    }
    if soil.is_fallback() {
        fallbacks.push("soil");
    }
    if terrain.is_fallback() {
        fallbacks.push("terrain");
    }

    SiteReadings {
        weather: weather.into_value("weather"),
        soil: soil.into_value("soil"),
        terrain: terrain.into_value("terrain"),
        fallbacks,
    }
}

/// Merge the readings into the engine's input. A manual rainfall override
/// (mm) replaces the live precipitation.
pub fn normalize(readings: &SiteReadings, manual_rain: Option<f64>) -> FeatureSet {
    let (precip_real, rain) = match manual_rain {
        Some(mm) => (mm, mm * 10.0),
        None => (readings.weather.precip_real, readings.weather.rain),
    };

    FeatureSet {
        rain,
        precip_real,
        slope: readings.terrain.slope,
        elevation: readings.terrain.elevation,
        temp: readings.weather.temp,
        code: readings.weather.code,
        bulk_density: readings.soil.bulk_density,
        clay: readings.soil.clay,
        sand: readings.soil.sand,
        silt: readings.soil.silt,
        is_water: readings.soil.is_water,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourcesConfig;

    fn readings() -> SiteReadings {
        SiteReadings {
            weather: WeatherReading {
                temp: 14.0,
                humidity: 80.0,
                rain: 32.0,
                precip_real: 3.2,
                code: 61,
            },
            soil: SoilReading::from_texture(125.0, 38.0, 30.0),
            terrain: TerrainReading {
                elevation: 1450.0,
                slope: 31.4,
            },
            fallbacks: vec![],
        }
    }

    #[test]
    fn test_location_validation() {
        assert!(Location { lat: 45.0, lng: 7.0 }.validate().is_ok());
        assert!(Location { lat: 90.0, lng: -180.0 }.validate().is_ok());
        assert!(Location { lat: 91.0, lng: 7.0 }.validate().is_err());
        assert!(Location { lat: 45.0, lng: 180.5 }.validate().is_err());
        assert!(Location { lat: f64::NAN, lng: 0.0 }.validate().is_err());
    }

    #[test]
    fn test_normalize_live_rain() {
        let features = normalize(&readings(), None);
        assert_eq!(features.rain, 32.0);
        assert_eq!(features.precip_real, 3.2);
        assert_eq!(features.slope, 31.4);
        assert_eq!(features.elevation, 1450.0);
        assert_eq!(features.code, 61);
        assert_eq!(features.silt, 32.0);
        assert!(!features.is_water);
    }

    #[test]
    fn test_normalize_manual_rain_override() {
        let features = normalize(&readings(), Some(55.0));
        assert_eq!(features.precip_real, 55.0);
        assert_eq!(features.rain, 550.0);
        assert_eq!(features.temp, 14.0);
    }

    #[test]
    fn test_fetch_outcome_fallback() {
        let outcome: FetchOutcome<TerrainReading> =
            FetchOutcome::from_result(Err(anyhow::anyhow!("boom")), TerrainReading::default);
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_value("terrain"), TerrainReading::default());
    }

    #[tokio::test]
    async fn test_unreachable_sources_fall_back_to_defaults() {
        let config = SourcesConfig {
            weather_url: "http://127.0.0.1:9/forecast".to_string(),
            soil_url: "http://127.0.0.1:9/soil".to_string(),
            elevation_url: "http://127.0.0.1:9/elevation".to_string(),
            timeout: "1s".to_string(),
            retries: 0,
        };
        let client = create_client(&config).unwrap();
        let site = fetch_site(&client, &Location { lat: 1.0, lng: 2.0 }).await;

        assert_eq!(site.fallbacks, vec!["weather", "soil", "terrain"]);
        assert_eq!(site.weather, WeatherReading::default());
        assert_eq!(site.soil, SoilReading::default());
        assert_eq!(site.terrain, TerrainReading::default());
    }
}
