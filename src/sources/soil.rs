use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::client::SourceClient;
use super::{FetchOutcome, Location};

/// Topsoil texture and density at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    /// x100 scale (cg/cm³)
    pub bulk_density: f64,
    pub clay: f64,
    pub sand: f64,
    /// 100 - clay - sand, never negative
    pub silt: f64,
    #[serde(rename = "isWater")]
    pub is_water: bool,
}

impl Default for SoilReading {
    fn default() -> Self {
        Self {
            bulk_density: 130.0,
            clay: 33.0,
            sand: 33.0,
            silt: 34.0,
            is_water: false,
        }
    }
}

impl SoilReading {
    /// What an empty soil response means: open water.
    pub fn water() -> Self {
        Self {
            bulk_density: 0.0,
            clay: 0.0,
            sand: 0.0,
            silt: 0.0,
            is_water: true,
        }
    }

    pub fn from_texture(bulk_density: f64, clay: f64, sand: f64) -> Self {
        Self {
            bulk_density,
            clay,
            sand,
            silt: (100.0 - clay - sand).max(0.0),
            is_water: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SoilGridsResponse {
    properties: SoilGridsProperties,
}

#[derive(Debug, Default, Deserialize)]
struct SoilGridsProperties {
    #[serde(default)]
    layers: Vec<SoilLayer>,
}

#[derive(Debug, Deserialize)]
struct SoilLayer {
    name: String,
    #[serde(default)]
    depths: Vec<SoilDepth>,
}

#[derive(Debug, Deserialize)]
struct SoilDepth {
    values: SoilValues,
}

#[derive(Debug, Deserialize)]
struct SoilValues {
    mean: Option<f64>,
}

impl SoilGridsProperties {
    fn mean(&self, name: &str) -> Option<f64> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .and_then(|layer| layer.depths.first())
            .and_then(|depth| depth.values.mean)
    }
}

impl From<SoilGridsResponse> for SoilReading {
    fn from(response: SoilGridsResponse) -> Self {
        let props = response.properties;
        let bdod = props.mean("bdod");
        // SoilGrids reports clay and sand in g/kg
        let clay = props.mean("clay").map(|v| v / 10.0);
        let sand = props.mean("sand").map(|v| v / 10.0);

        if bdod.is_none() && clay.is_none() && sand.is_none() {
            return SoilReading::water();
        }

        let defaults = SoilReading::default();
        SoilReading::from_texture(
            bdod.unwrap_or(defaults.bulk_density),
            clay.unwrap_or(defaults.clay),
            sand.unwrap_or(defaults.sand),
        )
    }
}

fn soilgrids_url(base: &str, location: &Location) -> Result<Url> {
    Url::parse_with_params(
        base,
        &[
            ("lon", location.lng.to_string()),
            ("lat", location.lat.to_string()),
            ("property", "bdod".to_string()),
            ("property", "clay".to_string()),
            ("property", "sand".to_string()),
            ("depth", "0-5cm".to_string()),
            ("value", "mean".to_string()),
        ],
    )
    .with_context(|| format!("Invalid soil URL '{}'", base))
}

async fn fetch(client: &SourceClient, location: &Location) -> Result<SoilReading> {
    let url = soilgrids_url(&client.config.soil_url, location)?;
    let response: SoilGridsResponse = client.get_json(url).await?;
    Ok(response.into())
}

/// Soil texture, or the documented defaults when the service fails.
pub async fn fetch_soil(client: &SourceClient, location: &Location) -> FetchOutcome<SoilReading> {
    FetchOutcome::from_result(fetch(client, location).await, SoilReading::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SoilReading {
        let response: SoilGridsResponse = serde_json::from_str(json).unwrap();
        response.into()
    }

    #[test]
    fn test_parse_soilgrids_layers() {
        let reading = parse(
            r#"{
            "type": "Feature",
            "properties": {"layers": [
                {"name": "bdod", "unit_measure": {"d_factor": 100},
                 "depths": [{"label": "0-5cm", "values": {"mean": 128}}]},
                {"name": "clay", "unit_measure": {"d_factor": 10},
                 "depths": [{"label": "0-5cm", "values": {"mean": 412}}]},
                {"name": "sand", "unit_measure": {"d_factor": 10},
                 "depths": [{"label": "0-5cm", "values": {"mean": 255}}]}
            ]}
        }"#,
        );
        assert_eq!(reading.bulk_density, 128.0);
        assert!((reading.clay - 41.2).abs() < 1e-9);
        assert!((reading.sand - 25.5).abs() < 1e-9);
        assert!((reading.silt - 33.3).abs() < 1e-9);
        assert!(!reading.is_water);
    }

    #[test]
    fn test_null_means_are_water() {
        let reading = parse(
            r#"{"properties": {"layers": [
                {"name": "bdod", "depths": [{"values": {"mean": null}}]},
                {"name": "clay", "depths": [{"values": {"mean": null}}]},
                {"name": "sand", "depths": [{"values": {"mean": null}}]}
            ]}}"#,
        );
        assert_eq!(reading, SoilReading::water());
    }

    #[test]
    fn test_no_layers_is_water() {
        assert_eq!(parse(r#"{"properties": {"layers": []}}"#), SoilReading::water());
        assert_eq!(parse(r#"{"properties": {}}"#), SoilReading::water());
    }

    #[test]
    fn test_partial_layers_fill_defaults() {
        let reading = parse(
            r#"{"properties": {"layers": [
                {"name": "clay", "depths": [{"values": {"mean": 500}}]}
            ]}}"#,
        );
        assert_eq!(reading.bulk_density, 130.0);
        assert_eq!(reading.clay, 50.0);
        assert_eq!(reading.sand, 33.0);
        assert_eq!(reading.silt, 17.0);
    }

    #[test]
    fn test_silt_clipped_at_zero() {
        let reading = SoilReading::from_texture(140.0, 70.0, 45.0);
        assert_eq!(reading.silt, 0.0);
    }

    #[test]
    fn test_soilgrids_url_repeats_property() {
        let url = soilgrids_url(
            "https://rest.isric.org/soilgrids/v2.0/properties/query",
            &Location { lat: -8.4, lng: 115.2 },
        )
        .unwrap();
        let query = url.query().unwrap();
        assert_eq!(query.matches("property=").count(), 3);
        assert!(query.contains("depth=0-5cm"));
    }
}
