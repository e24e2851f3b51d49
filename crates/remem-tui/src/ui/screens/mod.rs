//! Screen modules for each gate state

pub mod login;
pub mod notes;
pub mod registration;

use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use remem_core::GateView;

use crate::ui::Theme;

/// Render the heading and the explanatory line under it
fn render_heading(frame: &mut Frame, area: Rect, view: &GateView, theme: &Theme) {
    let mut lines = vec![Line::styled(view.title(), theme.title())];
    if let Some(subtitle) = view.subtitle() {
        lines.push(Line::default());
        lines.push(Line::styled(subtitle, theme.text_secondary()));
    }

    let heading = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(heading, area);
}

/// Rows of a PIN form: heading, field, then `buttons` one-line rows
fn pin_form_rows(area: Rect, buttons: usize) -> Vec<Rect> {
    let mut constraints = vec![
        Constraint::Length(3), // Heading
        Constraint::Length(1),
        Constraint::Length(3), // PIN field
        Constraint::Length(1),
    ];
    constraints.extend(std::iter::repeat(Constraint::Length(1)).take(buttons));
    constraints.push(Constraint::Min(0));

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}
