use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// File name of the single snapshot slot.
const CACHE_FILE: &str = "forecast.json";

/// Envelope persisted to disk with the raw provider payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedForecast {
    pub payload: Value,
    pub cached_at: DateTime<Utc>,
}

/// Persists the latest forecast payload verbatim. There is exactly one
/// slot; every save overwrites the previous snapshot.
#[derive(Debug)]
pub struct WeatherCache {
    path: PathBuf,
}

impl WeatherCache {
    pub fn new(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self {
            path: cache_dir.join(CACHE_FILE),
        })
    }

    pub fn save(&self, payload: &Value) -> Result<()> {
        let cached = CachedForecast {
            payload: payload.clone(),
            cached_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write cache file: {}", self.path.display()))?;
        Ok(())
    }

    /// The stored snapshot, or `None` when absent or unreadable. Unreadable
    /// files are treated like a miss.
    pub fn load(&self) -> Option<CachedForecast> {
        if !self.path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(error = %e, "failed to read weather cache");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(cached) => Some(cached),
            Err(e) => {
                debug!(error = %e, "failed to parse weather cache");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = WeatherCache::new(dir.path()).expect("cache");

        let payload = json!({"city": {"name": "Berlin"}, "list": [{"dt_txt": "2026-02-10 09:00:00"}]});
        cache.save(&payload).expect("save");

        let cached = cache.load().expect("present");
        assert_eq!(cached.payload, payload);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = WeatherCache::new(dir.path()).expect("cache");

        cache.save(&json!({"list": [1]})).expect("save");
        cache.save(&json!({"list": [2]})).expect("save");

        let cached = cache.load().expect("present");
        assert_eq!(cached.payload, json!({"list": [2]}));
    }

    #[test]
    fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = WeatherCache::new(dir.path()).expect("cache");
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_load_corrupt_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cache = WeatherCache::new(dir.path()).expect("cache");
        std::fs::write(dir.path().join(CACHE_FILE), "{ nope").expect("write");
        assert!(cache.load().is_none());
    }
}
