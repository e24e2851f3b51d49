//! Decorative logo banner
//!
//! Hidden when a screen reader is active.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::Theme;

const LOGO: [&str; 4] = [
    "┬─┐┌─┐╔╦╗┌─┐┌┬┐",
    "├┬┘├┤ ║║║├┤ │││",
    "┴└─└─┘╩ ╩└─┘┴ ┴",
    "your notes, kept safe",
];

/// Render the banner
pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
    if area.height == 0 {
        return;
    }

    let lines: Vec<Line> = LOGO
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i + 1 == LOGO.len() {
                theme.text_muted()
            } else {
                theme.title()
            };
            Line::styled(*row, style)
        })
        .collect();

    let banner = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(banner, area);
}
