use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration.
///
/// Every section is optional; omitted values fall back to the defaults below.
///
/// Example YAML:
/// ```yaml
/// sources:
///   timeout: "5s"
///   retries: 1
/// server:
///   port: 8080
/// cache:
///   ttl: "30m"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Upstream weather, soil and elevation services.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct SourcesConfig {
    pub weather_url: String,
    pub soil_url: String,
    pub elevation_url: String,
    /// Per-request timeout, humantime format (e.g. "10s")
    pub timeout: String,
    /// Extra attempts after a failed upstream call
    pub retries: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            weather_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            soil_url: "https://rest.isric.org/soilgrids/v2.0/properties/query".to_string(),
            elevation_url: "https://api.open-meteo.com/v1/elevation".to_string(),
            timeout: "10s".to_string(),
            retries: 2,
        }
    }
}

impl SourcesConfig {
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        Ok(humantime::parse_duration(self.timeout.trim())?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// On-disk prediction cache.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// How long a cached prediction stays fresh, humantime format
    pub ttl: String,
    /// Decimal places coordinates are rounded to when building cache keys
    pub precision: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: "15m".to_string(),
            precision: 3,
        }
    }
}

impl CacheSettings {
    pub fn ttl_duration(&self) -> anyhow::Result<Duration> {
        Ok(humantime::parse_duration(self.ttl.trim())?)
    }
}
