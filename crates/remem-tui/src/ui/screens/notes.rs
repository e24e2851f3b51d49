//! Authenticated: the notes

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};
use remem_core::ScreenView;

use crate::app::AppState;
use crate::ui::components::button;
use crate::ui::Theme;

/// Draw the notes screen
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let ScreenView::Notes {
        notes,
        log_out,
        destroy,
    } = &state.view.screen
    else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .constraints([
            Constraint::Length(2), // Heading
            Constraint::Min(4),    // Notes
            Constraint::Length(1), // Log out
            Constraint::Length(1), // Destroy pin
        ])
        .split(area);

    frame.render_widget(
        Line::styled(state.view.title(), theme.title()).alignment(Alignment::Center),
        chunks[0],
    );

    let items: Vec<ListItem> = notes
        .iter()
        .map(|note| {
            if state.view.accessibility_mode {
                return ListItem::new(Line::styled(note.accessibility_label(), theme.text()));
            }
            ListItem::new(vec![
                Line::styled(format!("\u{201C}{}\u{201D}", note.text), theme.text()),
                Line::styled(format!("    - {}", note.author), theme.text_secondary()),
                Line::default(),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(list, chunks[1]);

    let spoken = state.view.accessibility_mode;
    button::render(frame, chunks[2], log_out, "l", spoken, theme);
    button::render(frame, chunks[3], destroy, "d", spoken, theme);
}
