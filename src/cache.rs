use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::service::PredictResponse;
use crate::sources::Location;

/// Get the platform-appropriate cache directory
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("landslide-risk/predictions"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/landslide-risk/predictions",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the prediction cache directory
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Cache key: coordinates rounded to `precision` decimals plus the rainfall override.
pub fn cache_key(location: &Location, manual_rain: Option<f64>, precision: u32) -> String {
    let p = precision as usize;
    let rain = match manual_rain {
        Some(mm) => format!("{}", mm),
        None => "live".to_string(),
    };
    format!("prediction:{:.*}:{:.*}:{}", p, location.lat, p, location.lng, rain)
}

/// A stored prediction with the time it was computed
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedPrediction {
    pub response: PredictResponse,
    pub cached_at: DateTime<Utc>,
}

impl CachedPrediction {
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.cached_at < ttl,
            Err(_) => true,
        }
    }
}

/// Read a cached prediction from disk
pub fn read_cached(cache_path: &Path, key: &str) -> Option<CachedPrediction> {
    let bytes = cacache::read_sync(cache_path, key).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Write a prediction to the cache.
///
/// A key is only ever overwritten, never evicted. Stale entries stay on disk
/// until `clear-cache` removes the whole directory.
pub fn write_cached(cache_path: &Path, key: &str, entry: &CachedPrediction) -> Result<()> {
    let json = serde_json::to_vec(entry)?;
    cacache::write_sync(cache_path, key, json)?;
    Ok(())
}
