//! Masked PIN input field

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::MAX_PIN_INPUT;
use crate::ui::Theme;

/// Render the PIN field showing one dot per typed character
pub fn render(frame: &mut Frame, area: Rect, pin_length: usize, focused: bool, theme: &Theme) {
    let block = Block::default()
        .title(" PIN ")
        .borders(Borders::ALL)
        .border_style(if focused {
            theme.border_focused()
        } else {
            theme.border()
        });

    let mut spans = vec![Span::styled("[ ", theme.text_muted())];
    for i in 0..MAX_PIN_INPUT {
        if i < pin_length {
            spans.push(Span::styled("●", theme.pin_dot()));
        } else {
            spans.push(Span::styled("○", theme.pin_placeholder()));
        }
        if i + 1 < MAX_PIN_INPUT {
            spans.push(Span::raw(" "));
        }
    }
    spans.push(Span::styled(" ]", theme.text_muted()));

    let field = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(field, area);
}
