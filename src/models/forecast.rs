//! Forecast payload models and view aggregation.
//!
//! The provider payload is kept verbatim as JSON for persistence; the typed
//! views in this module are parsed from it on demand. Temperatures arrive in
//! Kelvin at 3-hour granularity.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::Coordinate;
use crate::utils::format::{celsius_rounded, celsius_truncated, day_label};

/// Maximum divergence between the requested coordinate and the coordinate
/// echoed by the API before the round-trip check flags it.
const ROUNDTRIP_TOLERANCE_DEG: f64 = 1.0;

/// The latest weather payload held for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Raw provider JSON, persisted and restored verbatim.
    pub payload: Value,
    /// True when this snapshot was read back from disk after a failed fetch.
    pub from_cache: bool,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn fresh(payload: Value) -> Self {
        Self {
            payload,
            from_cache: false,
            fetched_at: Utc::now(),
        }
    }

    pub fn cached(payload: Value, fetched_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            from_cache: true,
            fetched_at,
        }
    }

    /// Typed view of the payload, `None` when the payload has an
    /// unexpected shape.
    pub fn forecast(&self) -> Option<ForecastResponse> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub city: City,
    #[serde(default, rename = "list")]
    pub entries: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct City {
    pub name: Option<String>,
    pub country: Option<String>,
    pub coord: Option<CityCoord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CityCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(default)]
    pub dt_txt: String,
    #[serde(default)]
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionTag>,
    #[serde(default)]
    pub wind: Wind,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MainReadings {
    /// Kelvin.
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionTag {
    pub main: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Wind {
    /// Meters per second.
    pub speed: Option<f64>,
}

impl ForecastEntry {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.dt_txt, "%Y-%m-%d %H:%M:%S").ok()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp().map(|ts| ts.date())
    }

    pub fn hour(&self) -> Option<u32> {
        use chrono::Timelike;
        self.timestamp().map(|ts| ts.hour())
    }

    /// "09:00" style label for the hourly strip.
    pub fn time_label(&self) -> Option<String> {
        self.timestamp().map(|ts| ts.format("%H:%M").to_string())
    }

    pub fn temp_celsius(&self) -> Option<i32> {
        self.main.temp.map(celsius_rounded)
    }

    pub fn condition(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.main.as_deref())
    }

    pub fn icon(&self) -> Option<&str> {
        self.weather.first().and_then(|w| w.icon.as_deref())
    }
}

impl ForecastResponse {
    /// "Berlin, DE" style label, `None` when the payload has no city name.
    pub fn location_label(&self) -> Option<String> {
        match (self.city.name.as_deref(), self.city.country.as_deref()) {
            (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
            (Some(city), None) => Some(city.to_string()),
            _ => None,
        }
    }

    /// The entry closest to now, i.e. the first one in the list.
    pub fn current(&self) -> Option<&ForecastEntry> {
        self.entries.first()
    }

    /// Entries for the day after the first entry's date.
    pub fn tomorrow_entries(&self) -> Vec<&ForecastEntry> {
        let Some(today) = self.current().and_then(|e| e.date()) else {
            return Vec::new();
        };
        let tomorrow = today + chrono::Duration::days(1);
        self.entries
            .iter()
            .filter(|e| e.date() == Some(tomorrow))
            .collect()
    }

    /// Min/max for tomorrow in rounded degrees Celsius.
    pub fn tomorrow_minmax(&self) -> Option<(i32, i32)> {
        let temps: Vec<f64> = self
            .tomorrow_entries()
            .iter()
            .filter_map(|e| e.main.temp)
            .collect();
        if temps.is_empty() {
            return None;
        }
        let min = temps.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((celsius_rounded(min), celsius_rounded(max)))
    }

    /// Aggregate the 3-hourly entries into at most `max_days` daily rows.
    pub fn daily_summaries(&self, max_days: usize) -> Vec<DaySummary> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastEntry>> = BTreeMap::new();
        for entry in &self.entries {
            if let Some(date) = entry.date() {
                by_date.entry(date).or_default().push(entry);
            }
        }

        by_date
            .into_iter()
            .take(max_days)
            .filter_map(|(date, entries)| DaySummary::from_entries(date, &entries))
            .collect()
    }
}

/// One row of the 5-day view.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// "Mo, 22.01." style label.
    pub date_label: String,
    /// Icon code of the midmost entry of the day.
    pub icon: String,
    pub min_c: i32,
    pub max_c: i32,
    pub dayparts: DayParts,
}

impl DaySummary {
    fn from_entries(date: NaiveDate, entries: &[&ForecastEntry]) -> Option<Self> {
        let temps: Vec<f64> = entries.iter().filter_map(|e| e.main.temp).collect();
        if temps.is_empty() {
            return None;
        }
        let min = temps.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = temps.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let midday_idx = entries.len() / 2;
        let icon = entries[midday_idx].icon().unwrap_or("01d").to_string();

        Some(Self {
            date,
            date_label: day_label(date),
            icon,
            min_c: celsius_truncated(min),
            max_c: celsius_truncated(max),
            dayparts: DayParts::from_entries(entries),
        })
    }

    pub fn minmax_text(&self) -> String {
        format!("{}° / {}°", self.min_c, self.max_c)
    }
}

/// Temperatures by time of day; the first entry falling into each window
/// wins. Windows: morning 06-11, midday 12-17, evening 18-20, night 21-05.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayParts {
    pub morning: Option<i32>,
    pub midday: Option<i32>,
    pub evening: Option<i32>,
    pub night: Option<i32>,
}

impl DayParts {
    fn from_entries(entries: &[&ForecastEntry]) -> Self {
        let mut parts = Self::default();
        for entry in entries {
            let (Some(hour), Some(temp)) = (entry.hour(), entry.main.temp) else {
                continue;
            };
            let celsius = celsius_truncated(temp);
            match hour {
                6..=11 if parts.morning.is_none() => parts.morning = Some(celsius),
                12..=17 if parts.midday.is_none() => parts.midday = Some(celsius),
                18..=20 if parts.evening.is_none() => parts.evening = Some(celsius),
                21..=23 | 0..=5 if parts.night.is_none() => parts.night = Some(celsius),
                _ => {}
            }
        }
        parts
    }

    /// "3° 7° 5° --" style display line.
    pub fn text(&self) -> String {
        let part = |value: Option<i32>| match value {
            Some(v) => format!("{}°", v),
            None => "--".to_string(),
        };
        format!(
            "{} {} {} {}",
            part(self.morning),
            part(self.midday),
            part(self.evening),
            part(self.night)
        )
    }
}

/// Compare the coordinate echoed in the payload's city block against the
/// requested one. Divergence above one degree on either axis is flagged in
/// the log; the result is diagnostic only and never fails a sync.
pub fn check_roundtrip(requested: Coordinate, forecast: &ForecastResponse) -> bool {
    let Some(coord) = forecast.city.coord else {
        return false;
    };

    let delta_lat = (coord.lat - requested.lat).abs();
    let delta_lon = (coord.lon - requested.lon).abs();
    let city = forecast
        .location_label()
        .unwrap_or_else(|| "unknown".to_string());

    info!(
        requested = %requested,
        api_city = %city,
        api_lat = coord.lat,
        api_lon = coord.lon,
        delta_lat,
        delta_lon,
        "location round-trip"
    );

    let flagged = delta_lat > ROUNDTRIP_TOLERANCE_DEG || delta_lon > ROUNDTRIP_TOLERANCE_DEG;
    if flagged {
        warn!(
            requested = %requested,
            api_city = %city,
            "significant difference between requested coordinates and API city coordinates"
        );
    }
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "city": {
                "name": "Berlin",
                "country": "DE",
                "coord": {"lat": 52.52, "lon": 13.40}
            },
            "list": [
                {
                    "dt_txt": "2026-02-10 09:00:00",
                    "main": {"temp": 280.0, "humidity": 82.0},
                    "weather": [{"main": "Clouds", "icon": "02d"}],
                    "wind": {"speed": 3.4}
                },
                {
                    "dt_txt": "2026-02-10 12:00:00",
                    "main": {"temp": 281.4, "humidity": 75.0},
                    "weather": [{"main": "Clouds", "icon": "03d"}],
                    "wind": {"speed": 4.1}
                },
                {
                    "dt_txt": "2026-02-10 21:00:00",
                    "main": {"temp": 276.2, "humidity": 88.0},
                    "weather": [{"main": "Clear", "icon": "01n"}],
                    "wind": {"speed": 2.2}
                },
                {
                    "dt_txt": "2026-02-11 06:00:00",
                    "main": {"temp": 285.0, "humidity": 70.0},
                    "weather": [{"main": "Rain", "icon": "10d"}],
                    "wind": {"speed": 5.6}
                },
                {
                    "dt_txt": "2026-02-11 12:00:00",
                    "main": {"temp": 290.6, "humidity": 60.0},
                    "weather": [{"main": "Rain", "icon": "10d"}],
                    "wind": {"speed": 6.0}
                }
            ]
        })
    }

    fn sample_forecast() -> ForecastResponse {
        serde_json::from_value(sample_payload()).expect("sample payload parses")
    }

    #[test]
    fn test_location_label() {
        let forecast = sample_forecast();
        assert_eq!(forecast.location_label().as_deref(), Some("Berlin, DE"));

        let city_only: ForecastResponse =
            serde_json::from_value(json!({"city": {"name": "Berlin"}, "list": []}))
                .expect("parses");
        assert_eq!(city_only.location_label().as_deref(), Some("Berlin"));

        let empty = ForecastResponse::default();
        assert_eq!(empty.location_label(), None);
    }

    #[test]
    fn test_current_entry() {
        let forecast = sample_forecast();
        let current = forecast.current().expect("has entries");
        assert_eq!(current.temp_celsius(), Some(7)); // 280.0 K -> 6.85 -> 7
        assert_eq!(current.condition(), Some("Clouds"));
        assert_eq!(current.time_label().as_deref(), Some("09:00"));
    }

    #[test]
    fn test_tomorrow_entries_and_minmax() {
        let forecast = sample_forecast();
        let tomorrow = forecast.tomorrow_entries();
        assert_eq!(tomorrow.len(), 2);
        assert!(tomorrow.iter().all(|e| e.dt_txt.starts_with("2026-02-11")));

        // 285.0 K -> 11.85 -> 12; 290.6 K -> 17.45 -> 17
        assert_eq!(forecast.tomorrow_minmax(), Some((12, 17)));
    }

    #[test]
    fn test_daily_summaries() {
        let forecast = sample_forecast();
        let days = forecast.daily_summaries(5);
        assert_eq!(days.len(), 2);

        let first = &days[0];
        assert_eq!(first.date_label, "Di, 10.02.");
        // min 276.2 K -> 3.05 -> 3 (truncated), max 281.4 K -> 8.25 -> 8
        assert_eq!(first.minmax_text(), "3° / 8°");
        // midmost of three entries is the 12:00 one
        assert_eq!(first.icon, "03d");
        assert_eq!(first.dayparts.morning, Some(6));
        assert_eq!(first.dayparts.midday, Some(8));
        assert_eq!(first.dayparts.evening, None);
        assert_eq!(first.dayparts.night, Some(3));
        assert_eq!(first.dayparts.text(), "6° 8° -- 3°");

        let second = &days[1];
        assert_eq!(second.date_label, "Mi, 11.02.");
        assert_eq!(second.minmax_text(), "11° / 17°");
    }

    #[test]
    fn test_daily_summaries_caps_days() {
        let forecast = sample_forecast();
        assert_eq!(forecast.daily_summaries(1).len(), 1);
    }

    #[test]
    fn test_snapshot_roundtrip_is_verbatim() {
        let snapshot = WeatherSnapshot::fresh(sample_payload());
        assert!(!snapshot.from_cache);
        assert_eq!(snapshot.payload, sample_payload());

        let restored = WeatherSnapshot::cached(snapshot.payload.clone(), snapshot.fetched_at);
        assert!(restored.from_cache);
        assert_eq!(restored.payload, sample_payload());
    }

    #[test]
    fn test_roundtrip_check_flags_divergence() {
        let forecast: ForecastResponse = serde_json::from_value(json!({
            "city": {"name": "Hamburg", "country": "DE", "coord": {"lat": 53.5, "lon": 10.0}},
            "list": []
        }))
        .expect("parses");

        let requested = Coordinate::new(52.5, 13.4).expect("valid");
        assert!(check_roundtrip(requested, &forecast));
    }

    #[test]
    fn test_roundtrip_check_accepts_nearby() {
        let forecast = sample_forecast();
        let requested = Coordinate::new(52.6, 13.5).expect("valid");
        assert!(!check_roundtrip(requested, &forecast));
    }

    #[test]
    fn test_roundtrip_check_without_coord_is_silent() {
        let forecast = ForecastResponse::default();
        let requested = Coordinate::new(52.5, 13.4).expect("valid");
        assert!(!check_roundtrip(requested, &forecast));
    }
}
