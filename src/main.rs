//! Wetterblick - a keyboard-driven weather TUI.
//!
//! Fetches the 3-hourly forecast for the current location, with a
//! cached-location/default fallback when live positioning is unavailable
//! and a cached-snapshot fallback when the network is.

mod api;
mod app;
mod cache;
mod config;
mod location;
mod models;
mod sync;
mod ui;
mod utils;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::WeatherClient;
use app::App;
use cache::{LocationCache, WeatherCache};
use config::Settings;
use sync::SyncEngine;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Capacity of the location update channel
const LOCATION_CHANNEL_SIZE: usize = 16;

/// Initialize the tracing subscriber, logging to a file since the
/// terminal belongs to the TUI. Use RUST_LOG to control the level.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = config::log_dir().ok()?;
    std::fs::create_dir_all(&log_dir).ok()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let appender = tracing_appender::rolling::never(log_dir, "wetterblick.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found); the
    // credential chain re-checks it per fetch as well.
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();
    info!("wetterblick starting");

    let settings = Settings::default();
    let client = WeatherClient::new(settings.request_timeout)?;
    let weather_cache = WeatherCache::new(&config::cache_dir()?)?;
    let location_cache = LocationCache::new(&config::data_dir()?, settings.default_location.clone());
    let sync = SyncEngine::new(client, weather_cache, location_cache, settings.clone());

    // Location events are marshaled through this channel so all state
    // mutation happens on the main loop.
    let (updates_tx, updates_rx) = mpsc::channel(LOCATION_CHANNEL_SIZE);
    let provider = location::select_provider();
    let acquisition = tokio::spawn(location::run_acquisition(
        provider,
        settings.gps_timeout,
        updates_tx,
    ));

    let mut app = App::new(sync, updates_rx);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Dropping the app closes the update channel, which releases any
    // active listener registration.
    drop(app);
    let _ = acquisition.await;

    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }

    info!("wetterblick shutting down");
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow location updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    if handle_input(app, key).await? {
                        return Ok(());
                    }
                }
            }
        }

        // Apply pending location fixes and fallbacks
        app.drain_location_updates().await;
    }
}
