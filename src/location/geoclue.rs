//! GeoClue2 location provider (Linux).
//!
//! Talks to the system GeoClue service over D-Bus. Authorization is
//! mediated by the GeoClue agent: a denied `Start` call surfaces as
//! `PermissionDenied`, a missing service or bus as `Failed`, and a
//! deactivated client as `Degraded`.

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use zbus::zvariant::OwnedObjectPath;

use super::{LocationProvider, ProviderEvent};

/// Desktop id reported to the GeoClue agent.
const DESKTOP_ID: &str = "wetterblick";

/// GCLUE_ACCURACY_LEVEL_EXACT
const ACCURACY_LEVEL_EXACT: u32 = 8;

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Manager",
    default_service = "org.freedesktop.GeoClue2",
    default_path = "/org/freedesktop/GeoClue2/Manager"
)]
trait Manager {
    fn get_client(&self) -> zbus::Result<OwnedObjectPath>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Client",
    default_service = "org.freedesktop.GeoClue2"
)]
trait Client {
    fn start(&self) -> zbus::Result<()>;
    fn stop(&self) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_desktop_id(&self, id: &str) -> zbus::Result<()>;

    #[zbus(property)]
    fn set_requested_accuracy_level(&self, level: u32) -> zbus::Result<()>;

    #[zbus(property)]
    fn active(&self) -> zbus::Result<bool>;

    #[zbus(signal)]
    fn location_updated(&self, old: OwnedObjectPath, new: OwnedObjectPath)
        -> zbus::Result<()>;
}

#[zbus::proxy(
    interface = "org.freedesktop.GeoClue2.Location",
    default_service = "org.freedesktop.GeoClue2"
)]
trait Location {
    #[zbus(property)]
    fn latitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn longitude(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn accuracy(&self) -> zbus::Result<f64>;
}

#[derive(Debug, Default)]
pub struct GeoclueProvider;

impl GeoclueProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LocationProvider for GeoclueProvider {
    fn name(&self) -> &'static str {
        "geoclue"
    }

    fn is_live(&self) -> bool {
        true
    }

    fn spawn(self: Box<Self>, events: mpsc::Sender<ProviderEvent>) -> JoinHandle<()> {
        tokio::spawn(async move { run(events).await })
    }
}

struct Session {
    connection: zbus::Connection,
    client: ClientProxy<'static>,
}

enum StartError {
    Denied,
    Other(String),
}

async fn run(events: mpsc::Sender<ProviderEvent>) {
    let session = match start_session().await {
        Ok(session) => session,
        Err(StartError::Denied) => {
            let _ = events.send(ProviderEvent::PermissionDenied).await;
            return;
        }
        Err(StartError::Other(reason)) => {
            let _ = events.send(ProviderEvent::Failed(reason)).await;
            return;
        }
    };

    if events.send(ProviderEvent::PermissionGranted).await.is_err() {
        let _ = session.client.stop().await;
        return;
    }

    listen(session, &events).await;
}

async fn start_session() -> Result<Session, StartError> {
    let connection = zbus::Connection::system()
        .await
        .map_err(|e| StartError::Other(format!("system bus unavailable: {}", e)))?;

    let manager = ManagerProxy::new(&connection)
        .await
        .map_err(|e| StartError::Other(format!("GeoClue manager unavailable: {}", e)))?;
    let client_path = manager
        .get_client()
        .await
        .map_err(|e| StartError::Other(format!("could not create GeoClue client: {}", e)))?;

    let client = ClientProxy::builder(&connection)
        .path(client_path)
        .map_err(|e| StartError::Other(format!("invalid GeoClue client path: {}", e)))?
        .build()
        .await
        .map_err(|e| StartError::Other(format!("could not build GeoClue client: {}", e)))?;

    client
        .set_desktop_id(DESKTOP_ID)
        .await
        .map_err(|e| StartError::Other(format!("could not set desktop id: {}", e)))?;
    client
        .set_requested_accuracy_level(ACCURACY_LEVEL_EXACT)
        .await
        .map_err(|e| StartError::Other(format!("could not set accuracy level: {}", e)))?;

    match client.start().await {
        Ok(()) => Ok(Session { connection, client }),
        Err(e) if is_access_denied(&e) => Err(StartError::Denied),
        Err(e) => Err(StartError::Other(format!("could not start GeoClue client: {}", e))),
    }
}

fn is_access_denied(err: &zbus::Error) -> bool {
    matches!(err, zbus::Error::MethodError(name, _, _) if name.as_str().ends_with("AccessDenied"))
}

async fn listen(session: Session, events: &mpsc::Sender<ProviderEvent>) {
    let mut updates = match session.client.receive_location_updated().await {
        Ok(stream) => stream,
        Err(e) => {
            let _ = events
                .send(ProviderEvent::Failed(format!(
                    "location updates unavailable: {}",
                    e
                )))
                .await;
            return;
        }
    };
    let mut active_changes = session.client.receive_active_changed().await;

    loop {
        tokio::select! {
            signal = updates.next() => {
                match signal {
                    Some(signal) => {
                        let Ok(args) = signal.args() else { continue };
                        emit_fix(&session.connection, args.new, events).await;
                    }
                    None => {
                        let _ = events
                            .send(ProviderEvent::Degraded("GeoClue signal stream closed".into()))
                            .await;
                        break;
                    }
                }
            }
            change = active_changes.next() => {
                if let Some(change) = change {
                    if let Ok(active) = change.get().await {
                        if !active {
                            let _ = events
                                .send(ProviderEvent::Degraded("GeoClue client deactivated".into()))
                                .await;
                        }
                    }
                }
            }
            _ = events.closed() => break,
        }
    }

    match session.client.stop().await {
        Ok(()) => debug!("stopped GeoClue location updates"),
        Err(e) => debug!(error = %e, "failed to stop GeoClue client"),
    }
}

async fn emit_fix(
    connection: &zbus::Connection,
    path: OwnedObjectPath,
    events: &mpsc::Sender<ProviderEvent>,
) {
    let location = match LocationProxy::builder(connection).path(path) {
        Ok(builder) => match builder.build().await {
            Ok(location) => location,
            Err(e) => {
                debug!(error = %e, "could not build GeoClue location proxy");
                return;
            }
        },
        Err(e) => {
            debug!(error = %e, "invalid GeoClue location path");
            return;
        }
    };

    let (lat, lon) = match (location.latitude().await, location.longitude().await) {
        (Ok(lat), Ok(lon)) => (lat, lon),
        _ => {
            debug!("GeoClue location without coordinates");
            return;
        }
    };

    // GeoClue reports 0 when the accuracy is unknown
    let accuracy = location.accuracy().await.ok().filter(|a| *a > 0.0);

    let _ = events.send(ProviderEvent::Fix { lat, lon, accuracy }).await;
}
