//! Simulated fingerprint reader prompt

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::ui::{layout::centered_rect_fixed, Theme};

/// Render the fingerprint prompt
pub fn render(frame: &mut Frame, area: Rect, prompt: &str, theme: &Theme) {
    let dialog_area = centered_rect_fixed(60, 10, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .title(" Touch ID ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let message = Paragraph::new(prompt)
        .style(theme.text())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, chunks[0]);

    let help = Paragraph::new(vec![
        Line::from("[y] Touch sensor   [x] Wrong finger"),
        Line::from("[p] Use pin   [n] Cancel"),
    ])
    .style(theme.text_muted())
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}
