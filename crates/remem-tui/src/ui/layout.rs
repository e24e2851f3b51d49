//! Layout helpers for consistent screen structure

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::Theme;

/// Height of the decorative banner
pub const BANNER_HEIGHT: u16 = 5;

/// Standard screen layout with header, banner, content, and footer
pub struct ScreenLayout {
    /// Header area
    pub header: Rect,
    /// Banner area (zero height when hidden)
    pub banner: Rect,
    /// Main content area
    pub content: Rect,
    /// Footer/help area
    pub footer: Rect,
}

impl ScreenLayout {
    /// Create a standard layout from the total area
    pub fn new(area: Rect, show_banner: bool) -> Self {
        let banner_height = if show_banner { BANNER_HEIGHT } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),             // Header
                Constraint::Length(banner_height), // Banner
                Constraint::Min(8),                // Content
                Constraint::Length(2),             // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            banner: chunks[1],
            content: chunks[2],
            footer: chunks[3],
        }
    }
}

/// Create a fixed-size centered box
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Render the header bar with app name and clock
pub fn render_header(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(8)])
        .split(inner);

    let name = Paragraph::new(" reMem").style(theme.title());
    frame.render_widget(name, chunks[0]);

    let time = chrono::Local::now().format("%H:%M").to_string();
    let time_widget = Paragraph::new(time)
        .style(theme.text_muted())
        .alignment(Alignment::Right);
    frame.render_widget(time_widget, chunks[1]);
}

/// Render a standard footer with help hints
pub fn render_footer(
    frame: &mut Frame,
    area: Rect,
    hints: &[(&str, &str)],
    status: Option<&str>,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(theme.border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut hint_text: String = hints
        .iter()
        .map(|(key, action)| format!("[{}] {}", key, action))
        .collect::<Vec<_>>()
        .join("  ");
    if let Some(status) = status {
        hint_text = format!("{}  {}", status, hint_text);
    }

    let footer = Paragraph::new(hint_text)
        .style(theme.text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(footer, inner);
}
