//! Location providers and the acquisition flow.
//!
//! A `LocationProvider` is a platform backend that emits raw
//! `ProviderEvent`s over a channel; it never touches shared state. The
//! acquisition flow in `flow` turns those events into `LocationUpdate`s
//! for the application loop, enforcing the permission/timeout state
//! machine along the way.
//!
//! Providers:
//! - `GeoclueProvider` (Linux): live fixes via the GeoClue2 D-Bus service
//! - `NullProvider`: platforms without live positioning; the flow
//!   short-circuits straight to the cached-or-default fallback

pub mod flow;
#[cfg(target_os = "linux")]
pub mod geoclue;
pub mod null;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use flow::{run_acquisition, LocationUpdate};
pub use null::NullProvider;

/// Raw events emitted by a platform provider.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    PermissionGranted,
    PermissionDenied,
    /// A position update. Coordinates are unvalidated at this point.
    Fix {
        lat: f64,
        lon: f64,
        accuracy: Option<f64>,
    },
    /// The provider is still registered but its service degraded.
    Degraded(String),
    /// The provider could not be started at all.
    Failed(String),
}

/// A platform positioning backend.
pub trait LocationProvider: Send + 'static {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this provider can deliver live fixes at all.
    fn is_live(&self) -> bool;

    /// Spawn the platform listener. Events flow until the receiving side
    /// is dropped, at which point the listener registration is released.
    fn spawn(self: Box<Self>, events: mpsc::Sender<ProviderEvent>) -> JoinHandle<()>;
}

/// Pick the provider for this platform.
pub fn select_provider() -> Box<dyn LocationProvider> {
    #[cfg(target_os = "linux")]
    {
        Box::new(geoclue::GeoclueProvider::new())
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(NullProvider)
    }
}
