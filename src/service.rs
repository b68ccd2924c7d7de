use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::cache::{self, CachedPrediction};
use crate::config::Config;
use crate::risk::{evaluate, FeatureSet, PredictionResult};
use crate::sources::{self, create_client, Location, SourceClient};
use crate::debug_eprintln;

/// A request rejected before any upstream call. Callers map it to a client error.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidInput(pub String);

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvalidInput {}

/// The engine input plus the humidity reading it does not use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteData {
    #[serde(flatten)]
    pub features: FeatureSet,
    pub humidity: f64,
}

/// Body of a `POST /predict` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub location: Location,
    pub data: SiteData,
    pub prediction: PredictionResult,
    #[serde(rename = "isSimulated")]
    pub is_simulated: bool,
    /// Sources that fell back to defaults; not part of the wire format
    #[serde(skip)]
    pub fallbacks: Vec<String>,
}

/// Everything a prediction needs besides its inputs.
#[derive(Debug, Clone)]
pub struct PredictContext {
    pub client: SourceClient,
    cache: Option<CacheOptions>,
}

#[derive(Debug, Clone)]
struct CacheOptions {
    path: PathBuf,
    ttl: Duration,
    precision: u32,
}

impl PredictContext {
    /// Build the HTTP client and cache settings. `use_cache = false` (--no-cache)
    /// disables the cache regardless of config.
    pub fn new(config: &Config, use_cache: bool) -> Result<Self> {
        let client = create_client(&config.sources)?;
        let cache = if use_cache && config.cache.enabled {
            Some(CacheOptions {
                path: cache::get_cache_path(),
                ttl: config
                    .cache
                    .ttl_duration()
                    .with_context(|| format!("Invalid cache.ttl '{}'", config.cache.ttl))?,
                precision: config.cache.precision,
            })
        } else {
            None
        };
        Ok(Self { client, cache })
    }

    pub fn with_cache_path(mut self, path: PathBuf) -> Self {
        if let Some(cache) = self.cache.as_mut() {
            cache.path = path;
        }
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }
}

/// Assemble the response for already-fetched readings.
pub fn build_response(
    location: Location,
    readings: &sources::SiteReadings,
    manual_rain: Option<f64>,
) -> PredictResponse {
    let features = sources::normalize(readings, manual_rain);
    let prediction = evaluate(&features);
    PredictResponse {
        location,
        data: SiteData {
            features,
            humidity: readings.weather.humidity,
        },
        prediction,
        is_simulated: manual_rain.is_some(),
        fallbacks: readings.fallbacks.iter().map(|s| s.to_string()).collect(),
    }
}

/// Fetch, normalize and evaluate one point, going through the cache when enabled.
pub async fn predict(
    ctx: &PredictContext,
    location: Location,
    manual_rain: Option<f64>,
) -> Result<PredictResponse> {
    location
        .validate()
        .map_err(|e| InvalidInput(e.to_string()))?;
    if let Some(mm) = manual_rain {
        if !mm.is_finite() || mm < 0.0 {
            return Err(InvalidInput(format!(
                "manualRain must be a non-negative number, got {}",
                mm
            ))
            .into());
        }
    }

    let key = ctx
        .cache
        .as_ref()
        .map(|c| cache::cache_key(&location, manual_rain, c.precision));

    if let (Some(opts), Some(key)) = (&ctx.cache, &key) {
        if let Some(cached) = cache::read_cached(&opts.path, key) {
            if cached.is_fresh(opts.ttl, Utc::now()) {
                debug_eprintln!("Cache hit: {}", key);
                return Ok(cached.response);
            }
            debug_eprintln!("Cache stale: {}", key);
        }
    }

    let start = Instant::now();
    let readings = sources::fetch_site(&ctx.client, &location).await;
    debug_eprintln!(
        "Fetched site data for {}, {} in {:?}",
        location.lat,
        location.lng,
        start.elapsed()
    );

    let response = build_response(location, &readings, manual_rain);

    // Only fully fetched sites are cached
    if let (Some(opts), Some(key)) = (&ctx.cache, &key) {
        if readings.fallbacks.is_empty() {
            let entry = CachedPrediction {
                response: response.clone(),
                cached_at: Utc::now(),
            };
            if let Err(e) = cache::write_cached(&opts.path, key, &entry) {
                crate::warn_eprintln!("Failed to write prediction cache: {:#}", e);
            }
        }
    }

    Ok(response)
}
