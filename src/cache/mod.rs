//! Local caching for offline fallback.
//!
//! Two small JSON caches, both with overwrite semantics and no history:
//!
//! - `WeatherCache`: the last successful forecast payload, read back when
//!   a fetch fails
//! - `LocationCache`: the last successful live-GPS fix, read back when no
//!   live fix is available

pub mod location;
pub mod weather;

pub use location::LocationCache;
pub use weather::WeatherCache;
