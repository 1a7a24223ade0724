//! Application state.
//!
//! `App` glues the sync engine to the UI: it owns the tab selection and
//! drains the location update channel, so every state mutation happens on
//! the main loop.

use tokio::sync::mpsc;
use tracing::debug;

use crate::location::LocationUpdate;
use crate::sync::SyncEngine;

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Today,
    Tomorrow,
    FiveDays,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Today => "Heute",
            Tab::Tomorrow => "Morgen",
            Tab::FiveDays => "5 Tage",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Today => Tab::Tomorrow,
            Tab::Tomorrow => Tab::FiveDays,
            Tab::FiveDays => Tab::Today,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Today => Tab::FiveDays,
            Tab::Tomorrow => Tab::Today,
            Tab::FiveDays => Tab::Tomorrow,
        }
    }
}

pub struct App {
    pub current_tab: Tab,
    pub sync: SyncEngine,
    location_updates: mpsc::Receiver<LocationUpdate>,
}

impl App {
    pub fn new(sync: SyncEngine, location_updates: mpsc::Receiver<LocationUpdate>) -> Self {
        Self {
            current_tab: Tab::Today,
            sync,
            location_updates,
        }
    }

    /// Drain pending location events. Fixes and fallbacks both end up in
    /// the sync engine, which is the only writer of display state.
    pub async fn drain_location_updates(&mut self) {
        while let Ok(update) = self.location_updates.try_recv() {
            match update {
                LocationUpdate::Fix {
                    lat,
                    lon,
                    accuracy,
                    first,
                } => {
                    debug!(lat, lon, ?accuracy, first, "location fix received");
                    self.sync.apply_location(lat, lon, first, true).await;
                }
                LocationUpdate::Fallback { reason } => {
                    self.sync.apply_fallback(&reason).await;
                }
            }
        }
    }
}
