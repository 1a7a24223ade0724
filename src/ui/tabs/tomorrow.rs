use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::icon_symbol;

use super::render_loading;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.sync.display().view else {
        render_loading(frame, area);
        return;
    };

    let entries = view.parsed.tomorrow_entries();
    let Some(first) = entries.first() else {
        render_loading(frame, area);
        return;
    };

    let minmax = view
        .parsed
        .tomorrow_minmax()
        .map(|(min, max)| format!("{}° / {}°", min, max))
        .unwrap_or_else(|| "--".to_string());
    let condition = first.condition().unwrap_or("Unbekannt");

    // the second daily summary is tomorrow's
    let dayparts = view
        .parsed
        .daily_summaries(2)
        .get(1)
        .map(|day| day.dayparts.text());

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(format!("  {}", minmax), styles::value_style())),
        Line::from(Span::styled(
            format!("  {} {}", icon_symbol(first.icon().unwrap_or("")), condition),
            styles::highlight_style(),
        )),
        Line::raw(""),
    ];

    if let Some(dayparts) = dayparts {
        lines.push(Line::from(vec![
            Span::styled("  Morgen / Mittag / Abend / Nacht: ", styles::muted_style()),
            Span::raw(dayparts),
        ]));
        lines.push(Line::raw(""));
    }

    let mut hours = vec![Span::raw("  ")];
    let mut temps = vec![Span::raw("  ")];
    for entry in &entries {
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
