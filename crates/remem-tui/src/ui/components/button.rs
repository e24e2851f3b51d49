//! Push button with a key hint

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use remem_core::ButtonView;

use crate::ui::Theme;

/// Render `button`, prefixed with the key that presses it
///
/// With `spoken` set the screen reader label is drawn instead of the
/// caption, since terminal screen readers read what is on screen.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    button: &ButtonView,
    key: &str,
    spoken: bool,
    theme: &Theme,
) {
    let caption = if spoken {
        let mut text = button.accessibility_label.clone();
        if !button.enabled {
            text.push_str(" (disabled)");
        }
        text
    } else {
        button.title.to_string()
    };

    let line = Line::from(vec![
        Span::styled(format!("[{}] ", key), theme.text_muted()),
        Span::styled(format!(" {} ", caption), theme.button(button.enabled)),
    ]);

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
