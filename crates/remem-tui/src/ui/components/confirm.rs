//! Confirmation dialog component

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::ui::{layout::centered_rect_fixed, Theme};

/// Yes/no confirmation dialog
pub struct ConfirmDialog<'a> {
    /// Dialog title
    pub title: &'a str,
    /// Warning message
    pub message: &'a str,
    /// Whether this is a dangerous operation
    pub dangerous: bool,
}

impl<'a> ConfirmDialog<'a> {
    /// Create a dialog for an irreversible action
    pub fn dangerous(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            dangerous: true,
        }
    }

    /// Render the dialog
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect_fixed(52, 9, area);

        // Clear the background
        frame.render_widget(Clear, dialog_area);

        let accent = if self.dangerous {
            theme.danger()
        } else {
            theme.border_focused()
        };

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(accent)
            .borders(Borders::ALL)
            .border_style(accent);

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(2), Constraint::Length(1)])
            .split(inner);

        let message = Paragraph::new(self.message)
            .style(theme.text())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        let help = Paragraph::new("[y] Yes    [n] No")
            .style(theme.text_muted())
            .alignment(Alignment::Center);
        frame.render_widget(help, chunks[1]);
    }
}
