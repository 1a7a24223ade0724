//! Keyboard input handling for the TUI.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, Tab};

/// Handle a key event. Returns `true` when the application should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Char('1') => app.current_tab = Tab::Today,
        KeyCode::Char('2') => app.current_tab = Tab::Tomorrow,
        KeyCode::Char('3') => app.current_tab = Tab::FiveDays,
        KeyCode::Tab | KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::BackTab | KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Char('r') => app.sync.refresh().await,
        _ => {}
    }
    Ok(false)
}
