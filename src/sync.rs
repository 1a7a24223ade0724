//! Weather sync engine.
//!
//! The single writer of display state. Location updates arrive here (live
//! fixes and fallback requests), get validated, throttled, and turned into
//! weather fetches; results and failures are resolved against the disk
//! caches before they reach the views.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{WeatherClient, WeatherError};
use crate::cache::{LocationCache, WeatherCache};
use crate::config::Settings;
use crate::models::{check_roundtrip, Coordinate, ForecastResponse, LocationRecord, LocationSource, WeatherSnapshot};

/// A displayable forecast: the raw snapshot plus its typed view.
#[derive(Debug, Clone)]
pub struct ForecastView {
    pub snapshot: WeatherSnapshot,
    pub parsed: ForecastResponse,
}

/// What the views render. Only the sync engine writes to this.
#[derive(Debug, Default)]
pub struct DisplayState {
    /// Resolved location label, or the localized failure message when a
    /// fetch fails with nothing to fall back on.
    pub location_label: String,
    pub view: Option<ForecastView>,
}

pub struct SyncEngine {
    client: WeatherClient,
    weather_cache: WeatherCache,
    location_cache: LocationCache,
    settings: Settings,
    /// Monotonic instant of the last successful fetch.
    last_fetch: Option<Instant>,
    /// Most recent live fix, seeded from the location cache at startup.
    last_known: Option<LocationRecord>,
    /// Coordinate currently applied to the display.
    current: Option<Coordinate>,
    display: DisplayState,
}

impl SyncEngine {
    pub fn new(
        client: WeatherClient,
        weather_cache: WeatherCache,
        location_cache: LocationCache,
        settings: Settings,
    ) -> Self {
        let last_known = location_cache.load();
        if let Some(record) = &last_known {
            debug!(location = %record.coordinate, "loaded last known location");
        }

        let location_label = last_known
            .as_ref()
            .and_then(|r| r.label.clone())
            .unwrap_or_else(|| "Standort wird geladen...".to_string());

        Self {
            client,
            weather_cache,
            location_cache,
            settings,
            last_fetch: None,
            last_known,
            current: None,
            display: DisplayState {
                location_label,
                view: None,
            },
        }
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Apply a resolved coordinate. Out-of-range input is dropped without
    /// user-visible effect; live fixes are persisted before the fetch so a
    /// failing network still leaves the fix cached.
    pub async fn apply_location(&mut self, lat: f64, lon: f64, force_refresh: bool, live: bool) {
        let Some(coordinate) = Coordinate::new(lat, lon) else {
            debug!(lat, lon, "dropping out-of-range coordinate");
            return;
        };

        let source = if live { "live GPS" } else { "fallback/cached location" };
        info!(location = %coordinate, force_refresh, source, "applying location");
        self.current = Some(coordinate);

        if live {
            let label = self.last_known.as_ref().and_then(|r| r.label.clone());
            self.location_cache.save(coordinate, label.as_deref());
            self.last_known = Some(LocationRecord::new(
                coordinate,
                label,
                LocationSource::LiveGps,
            ));
        }

        if !force_refresh && !self.interval_elapsed() {
            debug!(
                interval_secs = self.settings.refresh_interval.as_secs(),
                "skipping weather refresh due to interval throttle"
            );
            return;
        }

        if live {
            self.display.location_label = "GPS erkannt, Standort wird geladen...".to_string();
        }

        match self.client.fetch(Some(coordinate)).await {
            Ok(payload) => self.apply_fetched(coordinate, payload, live),
            Err(err) => self.apply_failure(err),
        }
    }

    /// Resolve the fallback chain: last known live fix when present, the
    /// configured default coordinate otherwise.
    pub async fn apply_fallback(&mut self, reason: &str) {
        if let Some(record) = self.last_known.clone() {
            info!(
                reason,
                location = %record.coordinate,
                source = ?record.source,
                "no live GPS fix, using last successful GPS location"
            );
            if let Some(label) = &record.label {
                self.display.location_label = label.clone();
            }
            self.apply_location(record.coordinate.lat, record.coordinate.lon, false, false)
                .await;
            return;
        }

        info!(reason, "no live GPS fix and no cached GPS location, using default");
        let default = self.location_cache.default_location();
        self.display.location_label = format_location_label(
            "Standort wird geladen...",
            false,
            self.settings.show_source_prefix,
        );
        self.apply_location(default.coordinate.lat, default.coordinate.lon, false, false)
            .await;
    }

    /// Manually re-fetch at the currently applied coordinate, bypassing
    /// the throttle.
    pub async fn refresh(&mut self) {
        if let Some(coordinate) = self.current {
            self.apply_location(coordinate.lat, coordinate.lon, true, false)
                .await;
        }
    }

    fn interval_elapsed(&self) -> bool {
        match self.last_fetch {
            None => true,
            Some(at) => at.elapsed() >= self.settings.refresh_interval,
        }
    }

    fn apply_fetched(&mut self, requested: Coordinate, payload: Value, live: bool) {
        let snapshot = WeatherSnapshot::fresh(payload);
        let parsed = snapshot.forecast();

        if let Some(forecast) = &parsed {
            check_roundtrip(requested, forecast);
        }

        let city_label = parsed.as_ref().and_then(|f| f.location_label());
        self.display.location_label = format_location_label(
            city_label.as_deref().unwrap_or("Standort nicht verfuegbar"),
            live,
            self.settings.show_source_prefix,
        );

        if live {
            // re-persist the fix together with its resolved label
            self.location_cache.save(requested, city_label.as_deref());
            self.last_known = Some(LocationRecord::new(
                requested,
                city_label,
                LocationSource::LiveGps,
            ));
        }

        if let Err(e) = self.weather_cache.save(&snapshot.payload) {
            warn!(error = %e, "failed to persist weather snapshot");
        }
        self.last_fetch = Some(Instant::now());

        if let Some(parsed) = parsed {
            self.display.view = Some(ForecastView { snapshot, parsed });
        }
    }

    fn apply_failure(&mut self, err: WeatherError) {
        warn!(error = %err, "error fetching weather for coordinates");

        if let Some(cached) = self.weather_cache.load() {
            let snapshot = WeatherSnapshot::cached(cached.payload, cached.cached_at);
            if let Some(parsed) = snapshot.forecast() {
                info!("falling back to cached weather snapshot");
                self.display.location_label = self
                    .last_known
                    .as_ref()
                    .and_then(|r| r.label.clone())
                    .or_else(|| parsed.location_label())
                    .unwrap_or_else(|| "Standort nicht verfuegbar".to_string());
                self.display.view = Some(ForecastView { snapshot, parsed });
                return;
            }
        }

        match self.last_known.as_ref().and_then(|r| r.label.clone()) {
            Some(label) => self.display.location_label = label,
            None => self.display.location_label = err.display_message().to_string(),
        }
    }
}

/// Prefix a location label with its source when configured to do so.
fn format_location_label(label: &str, is_live_gps: bool, show_prefix: bool) -> String {
    if !show_prefix {
        return label.to_string();
    }
    let source = if is_live_gps { "GPS" } else { "Fallback" };
    format!("{}: {}", source, label)
}
