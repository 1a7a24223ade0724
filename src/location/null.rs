use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{LocationProvider, ProviderEvent};

/// Provider for platforms without live positioning. Never emits events;
/// the acquisition flow short-circuits to the fallback chain instead of
/// starting it.
#[derive(Debug, Default)]
pub struct NullProvider;

impl LocationProvider for NullProvider {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_live(&self) -> bool {
        false
    }

    fn spawn(self: Box<Self>, _events: mpsc::Sender<ProviderEvent>) -> JoinHandle<()> {
        tokio::spawn(async {})
    }
}
