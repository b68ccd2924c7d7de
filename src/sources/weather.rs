use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::client::SourceClient;
use super::{FetchOutcome, Location};

/// Current conditions at a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temp: f64,
    pub humidity: f64,
    /// Precipitation x 10
    pub rain: f64,
    pub precip_real: f64,
    pub code: i32,
}

impl Default for WeatherReading {
    fn default() -> Self {
        Self {
            temp: 25.0,
            humidity: 50.0,
            rain: 0.0,
            precip_real: 0.0,
            code: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    precipitation: Option<f64>,
    weather_code: Option<i32>,
}

impl From<ForecastResponse> for WeatherReading {
    fn from(response: ForecastResponse) -> Self {
        let defaults = WeatherReading::default();
        let current = response.current;
        let precip = current.precipitation.unwrap_or(defaults.precip_real);
        WeatherReading {
            temp: current.temperature_2m.unwrap_or(defaults.temp),
            humidity: current.relative_humidity_2m.unwrap_or(defaults.humidity),
            rain: precip * 10.0,
            precip_real: precip,
            code: current.weather_code.unwrap_or(defaults.code),
        }
    }
}

fn forecast_url(base: &str, location: &Location) -> Result<Url> {
    Url::parse_with_params(
        base,
        &[
            ("latitude", location.lat.to_string()),
            ("longitude", location.lng.to_string()),
            (
                "current",
                "temperature_2m,relative_humidity_2m,precipitation,weather_code".to_string(),
            ),
        ],
    )
    .with_context(|| format!("Invalid weather URL '{}'", base))
}

async fn fetch(client: &SourceClient, location: &Location) -> Result<WeatherReading> {
    let url = forecast_url(&client.config.weather_url, location)?;
    let response: ForecastResponse = client.get_json(url).await?;
    Ok(response.into())
}

/// Current weather, or the documented defaults when the service fails.
pub async fn fetch_weather(client: &SourceClient, location: &Location) -> FetchOutcome<WeatherReading> {
    FetchOutcome::from_result(fetch(client, location).await, WeatherReading::default)
}
