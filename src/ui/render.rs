use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Tab};

use super::styles;
use super::tabs::{five_days, today, tomorrow};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Wetterblick";
    let location = app.sync.display().location_label.as_str();

    let padding = area
        .width
        .saturating_sub(title.len() as u16 + location.chars().count() as u16 + 4)
        as usize;

    let line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(location, styles::highlight_style()),
        Span::raw("  "),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [(Tab::Today, '1'), (Tab::Tomorrow, '2'), (Tab::FiveDays, '3')];

    let mut spans = vec![Span::raw(" ")];
    for (i, (tab, key)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(
            format!("[{}] {}", key, tab.title()),
            styles::tab_style(app.current_tab == *tab),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Today => today::render(frame, app, area),
        Tab::Tomorrow => tomorrow::render(frame, app, area),
        Tab::FiveDays => five_days::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    if let Some(view) = &app.sync.display().view {
        if view.snapshot.from_cache {
            spans.push(Span::styled(
                format!(
                    "Daten aus Cache (Stand {})",
                    view.snapshot.fetched_at.format("%d.%m. %H:%M")
                ),
                styles::error_style(),
            ));
            spans.push(Span::raw("  "));
        } else {
            spans.push(Span::styled(
                format!("Stand {}", view.snapshot.fetched_at.format("%H:%M")),
                styles::muted_style(),
            ));
            spans.push(Span::raw("  "));
        }
    }

    spans.push(Span::styled(
        "[r] Aktualisieren  [Tab] Ansicht  [q] Beenden",
        styles::muted_style(),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}
