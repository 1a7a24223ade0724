use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::{icon_symbol, wind_kmh};

use super::render_loading;

/// Number of 3-hour entries shown in the hourly strip.
const HOURLY_COLUMNS: usize = 8;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.sync.display().view else {
        render_loading(frame, area);
        return;
    };
    let Some(current) = view.parsed.current() else {
        render_loading(frame, area);
        return;
    };

    let temp = current
        .temp_celsius()
        .map(|t| format!("{}°C", t))
        .unwrap_or_else(|| "--".to_string());
    let condition = current.condition().unwrap_or("Unbekannt");
    let humidity = current
        .main
        .humidity
        .map(|h| format!("{}%", h.round()))
        .unwrap_or_else(|| "--".to_string());
    let wind = current
        .wind
        .speed
        .map(|s| format!("{} km/h", wind_kmh(s)))
        .unwrap_or_else(|| "--".to_string());

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(format!("  {}", temp), styles::value_style())),
        Line::from(Span::styled(
            format!("  {} {}", icon_symbol(current.icon().unwrap_or("")), condition),
            styles::highlight_style(),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Luftfeuchte: ", styles::muted_style()),
            Span::raw(humidity),
            Span::styled("   Wind: ", styles::muted_style()),
            Span::raw(wind),
        ]),
        Line::raw(""),
    ];

    // horizontal strip of the next 3-hourly entries
    let mut hours = vec![Span::raw("  ")];
    let mut temps = vec![Span::raw("  ")];
    for entry in view.parsed.entries.iter().take(HOURLY_COLUMNS) {
        let time = entry.time_label().unwrap_or_else(|| "--:--".to_string());
        let temp = entry
            .temp_celsius()
            .map(|t| format!("{}°", t))
            .unwrap_or_else(|| "--".to_string());
        hours.push(Span::styled(format!("{:<7}", time), styles::muted_style()));
        temps.push(Span::raw(format!("{:<7}", temp)));
    }
    lines.push(Line::from(hours));
    lines.push(Line::from(temps));

    frame.render_widget(Paragraph::new(lines), area);
}
