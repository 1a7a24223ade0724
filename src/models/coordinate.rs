use serde::{Deserialize, Serialize};

/// Geographic coordinate. Range-checked at construction so that anything
/// holding a `Coordinate` can assume it is valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        if Self::in_range(lat, lon) {
            Some(Self { lat, lon })
        } else {
            None
        }
    }

    pub fn in_range(lat: f64, lon: f64) -> bool {
        (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Where a location came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    LiveGps,
    Cached,
    Default,
}

/// A resolved location with an optional display label.
///
/// Only live-GPS fixes are ever written back to disk; cached and default
/// records exist in memory as fallback inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub coordinate: Coordinate,
    pub label: Option<String>,
    pub source: LocationSource,
}

impl LocationRecord {
    pub fn new(coordinate: Coordinate, label: Option<String>, source: LocationSource) -> Self {
        Self {
            coordinate,
            label,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_accepts_bounds() {
        assert!(Coordinate::in_range(90.0, 180.0));
        assert!(Coordinate::in_range(-90.0, -180.0));
        assert!(Coordinate::in_range(0.0, 0.0));
        assert!(Coordinate::in_range(51.5074, -0.1278));
    }

    #[test]
    fn test_in_range_rejects_out_of_range() {
        assert!(!Coordinate::in_range(90.1, 0.0));
        assert!(!Coordinate::in_range(-90.1, 0.0));
        assert!(!Coordinate::in_range(0.0, 180.1));
        assert!(!Coordinate::in_range(0.0, -180.1));
        assert!(!Coordinate::in_range(f64::NAN, 0.0));
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert!(Coordinate::new(91.0, 0.0).is_none());
        assert!(Coordinate::new(0.0, -181.0).is_none());

        let c = Coordinate::new(52.52, 13.4).expect("valid coordinate");
        assert_eq!(c.lat, 52.52);
        assert_eq!(c.lon, 13.4);
    }
}
