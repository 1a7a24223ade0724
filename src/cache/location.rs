use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Coordinate, LocationRecord, LocationSource};

/// File name of the persisted last-known location.
const CACHE_FILE: &str = "last_location.json";

/// On-disk shape: `{"lat": f64, "lon": f64, "label": string|null}`.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLocation {
    lat: f64,
    lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

/// Persists the most recent successful live-GPS fix. Cached and default
/// locations are never written back; only live fixes reach `save`.
///
/// Cache I/O failures are deliberately quiet: positioning must keep
/// working without a readable cache, so problems surface as debug
/// diagnostics only.
#[derive(Debug)]
pub struct LocationCache {
    path: PathBuf,
    default: LocationRecord,
}

impl LocationCache {
    pub fn new(data_dir: &Path, default: LocationRecord) -> Self {
        Self {
            path: data_dir.join(CACHE_FILE),
            default,
        }
    }

    /// Persist a live fix. Out-of-range values never reach this point
    /// (`Coordinate` is validated at construction); write failures are
    /// swallowed after a debug diagnostic.
    pub fn save(&self, coordinate: Coordinate, label: Option<&str>) {
        let stored = StoredLocation {
            lat: coordinate.lat,
            lon: coordinate.lon,
            label: label.map(str::to_string),
        };

        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string(&stored)?;
            std::fs::write(&self.path, contents)
        };

        if let Err(e) = write() {
            debug!(error = %e, "failed to store last known location");
        }
    }

    /// The cached record, or `None` when absent, unreadable, or holding
    /// out-of-range coordinates.
    pub fn load(&self) -> Option<LocationRecord> {
        if !self.path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(error = %e, "failed to read location cache");
                return None;
            }
        };

        let stored: StoredLocation = match serde_json::from_str(&contents) {
            Ok(stored) => stored,
            Err(e) => {
                debug!(error = %e, "failed to parse location cache");
                return None;
            }
        };

        let Some(coordinate) = Coordinate::new(stored.lat, stored.lon) else {
            debug!(
                lat = stored.lat,
                lon = stored.lon,
                "ignoring out-of-range cached location"
            );
            return None;
        };

        let label = stored
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        Some(LocationRecord::new(
            coordinate,
            label,
            LocationSource::Cached,
        ))
    }

    /// The fixed fallback applied when no cached record exists.
    pub fn default_location(&self) -> LocationRecord {
        self.default.clone()
    }
}
