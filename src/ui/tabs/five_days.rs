use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format::icon_symbol;

use super::render_loading;

/// Days shown in the forecast table.
const FORECAST_DAYS: usize = 5;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.sync.display().view else {
        render_loading(frame, area);
        return;
    };

    let days = view.parsed.daily_summaries(FORECAST_DAYS);
    if days.is_empty() {
        render_loading(frame, area);
        return;
    }

    let header = Row::new([
        Cell::from("Tag"),
        Cell::from(""),
        Cell::from("Min / Max"),
        Cell::from("Morgen Mittag Abend Nacht"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = days
        .iter()
        .map(|day| {
            Row::new([
                Cell::from(day.date_label.clone()),
                Cell::from(icon_symbol(&day.icon)),
                Cell::from(day.minmax_text()),
                Cell::from(day.dayparts.text()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(2),
            Constraint::Length(12),
            Constraint::Min(24),
        ],
    )
    .header(header)
    .column_spacing(2);

    frame.render_widget(table, area);
}
