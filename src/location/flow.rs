//! The location acquisition flow.
//!
//! Drives a provider through `RequestingPermission → Acquiring → Fixed |
//! TimedOut | Denied` and translates its events into `LocationUpdate`s for
//! the application loop. The flow never resolves the fallback itself; it
//! only reports that a fallback is needed, and the sync engine picks
//! cached-or-default.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::models::Coordinate;

use super::{LocationProvider, ProviderEvent};

/// Messages delivered to the application loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    /// A validated live fix. `first` is set exactly once per session and
    /// forces a weather refresh past the throttle.
    Fix {
        lat: f64,
        lon: f64,
        accuracy: Option<f64>,
        first: bool,
    },
    /// No usable live fix; apply the cached-or-default chain.
    Fallback { reason: String },
}

impl LocationUpdate {
    fn fallback(reason: impl Into<String>) -> Self {
        Self::Fallback {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    RequestingPermission,
    Acquiring,
    Fixed,
    TimedOut,
    Denied,
}

/// Run the acquisition flow until the update channel closes or the
/// provider goes away. On platforms without live positioning this is a
/// single fallback emission.
pub async fn run_acquisition(
    provider: Box<dyn LocationProvider>,
    gps_timeout: Duration,
    updates: mpsc::Sender<LocationUpdate>,
) {
    if !provider.is_live() {
        debug!(
            provider = provider.name(),
            "live positioning unavailable on this platform"
        );
        let _ = updates
            .send(LocationUpdate::fallback(
                "live positioning not supported on this platform",
            ))
            .await;
        return;
    }

    info!(provider = provider.name(), "starting location acquisition");
    let (events_tx, events_rx) = mpsc::channel(16);
    let listener = provider.spawn(events_tx);

    drive(events_rx, gps_timeout, updates).await;

    // Dropping the event receiver above tells the listener task to release
    // its registration; wait for that to finish.
    let _ = listener.await;
}

async fn drive(
    mut events: mpsc::Receiver<ProviderEvent>,
    gps_timeout: Duration,
    updates: mpsc::Sender<LocationUpdate>,
) {
    let mut phase = Phase::RequestingPermission;
    let deadline = tokio::time::sleep(gps_timeout);
    tokio::pin!(deadline);
    let mut timeout_armed = true;

    loop {
        tokio::select! {
            _ = &mut deadline, if timeout_armed => {
                timeout_armed = false;
                if phase != Phase::Fixed {
                    phase = Phase::TimedOut;
                    warn!(
                        timeout_secs = gps_timeout.as_secs(),
                        "GPS timeout with no fix"
                    );
                    if updates.send(LocationUpdate::fallback("GPS timeout")).await.is_err() {
                        return;
                    }
                }
            }
            event = events.recv() => {
                let Some(event) = event else { return };
                match event {
                    ProviderEvent::PermissionGranted => {
                        if phase == Phase::RequestingPermission {
                            debug!("location permission granted");
                            phase = Phase::Acquiring;
                            // the acquisition window starts now
                            deadline.as_mut().reset(tokio::time::Instant::now() + gps_timeout);
                        }
                    }
                    ProviderEvent::PermissionDenied => {
                        info!("location permission denied");
                        phase = Phase::Denied;
                        timeout_armed = false;
                        if updates
                            .send(LocationUpdate::fallback("location permission denied"))
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    ProviderEvent::Failed(reason) => {
                        warn!(reason = %reason, "failed to start positioning");
                        timeout_armed = false;
                        if updates.send(LocationUpdate::fallback(reason)).await.is_err() {
                            return;
                        }
                    }
                    ProviderEvent::Degraded(status) => {
                        debug!(status = %status, "GPS status changed");
                        if matches!(phase, Phase::RequestingPermission | Phase::Acquiring)
                            && updates
                                .send(LocationUpdate::fallback(format!("GPS status: {}", status)))
                                .await
                                .is_err()
                        {
                            return;
                        }
                    }
                    ProviderEvent::Fix { lat, lon, accuracy } => {
                        // any fix message cancels the pending timeout
                        timeout_armed = false;
                        if !Coordinate::in_range(lat, lon) {
                            debug!(lat, lon, "ignoring out-of-range GPS coordinates");
                            if updates
                                .send(LocationUpdate::fallback("out-of-range GPS coordinates"))
                                .await
                                .is_err()
                            {
                                return;
                            }
                            continue;
                        }

                        let first = phase != Phase::Fixed;
                        phase = Phase::Fixed;
                        debug!(lat, lon, ?accuracy, first, "GPS fix");
                        if updates
                            .send(LocationUpdate::Fix { lat, lon, accuracy, first })
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                }
            }
            _ = updates.closed() => return,
        }
    }
}
