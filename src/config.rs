//! Application configuration.
//!
//! Two concerns live here: the `Settings` struct handed to the sync engine
//! at construction (timeouts, refresh interval, default coordinate), and
//! the resolution chain for the weather API credentials: process
//! environment, then a `.env` file, then the bundled fallback.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::api::WeatherError;
use crate::models::{Coordinate, LocationRecord, LocationSource};

/// Application name used for config/cache/data directory paths
const APP_NAME: &str = "wetterblick";

/// Bundled fallback endpoint. The release workflow injects the matching
/// API key; local development uses the `.env` file or the environment.
const BUNDLED_URL: Option<&str> = Some("https://api.openweathermap.org/data/2.5/forecast");
const BUNDLED_API_KEY: Option<&str> = None;

/// Runtime tunables, passed to the sync engine and the location flow.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Hard bound on a single weather request.
    pub request_timeout: Duration,
    /// Minimum time between non-forced weather fetches.
    pub refresh_interval: Duration,
    /// How long to wait for a live fix before falling back.
    pub gps_timeout: Duration,
    /// Applied when neither a live fix nor a cached location exists.
    pub default_location: LocationRecord,
    /// Prefix location labels with their source (GPS/Fallback).
    pub show_source_prefix: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            refresh_interval: Duration::from_secs(60),
            gps_timeout: Duration::from_secs(45),
            default_location: LocationRecord::new(
                // London
                Coordinate {
                    lat: 51.5074,
                    lon: -0.1278,
                },
                None,
                LocationSource::Default,
            ),
            show_source_prefix: false,
        }
    }
}

/// Resolved weather API endpoint and key.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub base_url: String,
    pub api_key: String,
}

impl ApiCredentials {
    /// Resolve credentials through the configured chain. Resolution happens
    /// per fetch, so a `.env` file created after startup is picked up.
    pub fn resolve() -> Result<Self, WeatherError> {
        Self::from_sources(
            std::env::var("URL").ok(),
            std::env::var("API_KEY").ok(),
            load_env_file(),
        )
    }

    /// Chain each value independently: environment, then `.env` file, then
    /// bundled fallback. The error distinguishes a missing `.env` file from
    /// an incomplete configuration.
    fn from_sources(
        env_url: Option<String>,
        env_key: Option<String>,
        env_file: Result<HashMap<String, String>, WeatherError>,
    ) -> Result<Self, WeatherError> {
        let (file_vars, file_missing) = match env_file {
            Ok(vars) => (vars, None),
            Err(err) => {
                debug!(error = %err, "no .env file found");
                (HashMap::new(), Some(err))
            }
        };

        let base_url = non_empty(env_url)
            .or_else(|| non_empty(file_vars.get("URL").cloned()))
            .or_else(|| BUNDLED_URL.map(str::to_string));
        let api_key = non_empty(env_key)
            .or_else(|| non_empty(file_vars.get("API_KEY").cloned()))
            .or_else(|| BUNDLED_API_KEY.map(str::to_string));

        match (base_url, api_key) {
            (Some(base_url), Some(api_key)) => Ok(Self { base_url, api_key }),
            _ => match file_missing {
                Some(err) => Err(err),
                None => Err(WeatherError::ConfigMissing),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Candidate `.env` locations: working directory, then the per-app config
/// directory.
fn env_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join(APP_NAME).join(".env"));
    }
    candidates
}

fn load_env_file() -> Result<HashMap<String, String>, WeatherError> {
    let candidates = env_file_candidates();
    for candidate in &candidates {
        if !candidate.exists() {
            continue;
        }
        let Ok(iter) = dotenvy::from_path_iter(candidate) else {
            continue;
        };
        return Ok(iter.flatten().collect());
    }

    let searched = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(WeatherError::EnvFileMissing(format!(
        "looked in: {}",
        searched
    )))
}

pub fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
    Ok(dir.join(APP_NAME))
}

pub fn cache_dir() -> Result<PathBuf> {
    let dir =
        dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
    Ok(dir.join(APP_NAME))
}

pub fn log_dir() -> Result<PathBuf> {
    Ok(cache_dir()?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_vars(pairs: &[(&str, &str)]) -> Result<HashMap<String, String>, WeatherError> {
        Ok(pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }

    fn file_absent() -> Result<HashMap<String, String>, WeatherError> {
        Err(WeatherError::EnvFileMissing("looked in: .env".into()))
    }

    #[test]
    fn test_environment_wins() {
        let creds = ApiCredentials::from_sources(
            Some("https://example.test/forecast".into()),
            Some("env-key".into()),
            file_vars(&[("URL", "https://file.test"), ("API_KEY", "file-key")]),
        )
        .expect("resolves");
        assert_eq!(creds.base_url, "https://example.test/forecast");
        assert_eq!(creds.api_key, "env-key");
    }

    #[test]
    fn test_env_file_fills_gaps() {
        let creds = ApiCredentials::from_sources(
            None,
            Some("env-key".into()),
            file_vars(&[("URL", "https://file.test/forecast")]),
        )
        .expect("resolves");
        assert_eq!(creds.base_url, "https://file.test/forecast");
        assert_eq!(creds.api_key, "env-key");
    }

    #[test]
    fn test_bundled_url_backstops() {
        let creds =
            ApiCredentials::from_sources(None, Some("env-key".into()), file_absent())
                .expect("resolves");
        assert_eq!(
            creds.base_url,
            "https://api.openweathermap.org/data/2.5/forecast"
        );
    }

    #[test]
    fn test_missing_env_file_is_distinct() {
        let err = ApiCredentials::from_sources(None, None, file_absent())
            .expect_err("must not resolve");
        assert!(matches!(err, WeatherError::EnvFileMissing(_)));
    }

    #[test]
    fn test_incomplete_config_without_key() {
        let err = ApiCredentials::from_sources(
            None,
            None,
            file_vars(&[("URL", "https://file.test/forecast")]),
        )
        .expect_err("must not resolve");
        assert!(matches!(err, WeatherError::ConfigMissing));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let err = ApiCredentials::from_sources(
            Some("  ".into()),
            None,
            file_vars(&[("API_KEY", "")]),
        )
        .expect_err("must not resolve");
        assert!(matches!(err, WeatherError::ConfigMissing));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.refresh_interval, Duration::from_secs(60));
        assert_eq!(settings.gps_timeout, Duration::from_secs(45));
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.default_location.coordinate.lat, 51.5074);
        assert_eq!(settings.default_location.coordinate.lon, -0.1278);
    }
}
