use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::client::SourceClient;
use super::{FetchOutcome, Location};

/// Sampling offset for the slope estimate, degrees (~111 m north-south)
const SAMPLE_OFFSET_DEG: f64 = 0.001;
const METERS_PER_DEG_LAT: f64 = 111_320.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainReading {
    pub elevation: f64,
    /// Degrees, one decimal
    pub slope: f64,
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    elevation: Vec<f64>,
}

/// Slope in degrees from the point and its north/east neighbors.
pub fn slope_degrees(lat: f64, center: f64, north: f64, east: f64, offset_deg: f64) -> f64 {
    let dy = offset_deg * METERS_PER_DEG_LAT;
    let dx = (offset_deg * METERS_PER_DEG_LAT * lat.to_radians().cos()).max(f64::EPSILON);
    let gradient = ((north - center) / dy).hypot((east - center) / dx);
    let degrees = gradient.atan().to_degrees();
    (degrees * 10.0).round() / 10.0
}

fn elevation_url(base: &str, location: &Location) -> Result<Url> {
    let north = location.lat + SAMPLE_OFFSET_DEG;
    let east = location.lng + SAMPLE_OFFSET_DEG;
    Url::parse_with_params(
        base,
        &[
            (
                "latitude",
                format!("{},{},{}", location.lat, north, location.lat),
            ),
            (
                "longitude",
                format!("{},{},{}", location.lng, location.lng, east),
            ),
        ],
    )
    .with_context(|| format!("Invalid elevation URL '{}'", base))
}

fn reading_from(location: &Location, response: ElevationResponse) -> Result<TerrainReading> {
    let [center, north, east] = match response.elevation.as_slice() {
        [c, n, e, ..] => [*c, *n, *e],
        other => anyhow::bail!("Expected 3 elevation samples, got {}", other.len()),
    };
    Ok(TerrainReading {
        elevation: center,
        slope: slope_degrees(location.lat, center, north, east, SAMPLE_OFFSET_DEG),
    })
}

async fn fetch(client: &SourceClient, location: &Location) -> Result<TerrainReading> {
    let url = elevation_url(&client.config.elevation_url, location)?;
    let response: ElevationResponse = client.get_json(url).await?;
    reading_from(location, response)
}

/// Elevation and slope, or flat ground at sea level when the service fails.
pub async fn fetch_terrain(client: &SourceClient, location: &Location) -> FetchOutcome<TerrainReading> {
    FetchOutcome::from_result(fetch(client, location).await, TerrainReading::default)
}
