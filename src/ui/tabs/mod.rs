pub mod five_days;
pub mod today;
pub mod tomorrow;

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::styles;

/// Shown while no forecast has been applied yet.
pub(super) fn render_loading(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new("Wetterdaten werden geladen...")
        .style(styles::muted_style())
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(paragraph, area);
}
