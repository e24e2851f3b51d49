//! First run: choose a PIN

use ratatui::prelude::*;
use remem_core::ScreenView;

use crate::app::AppState;
use crate::ui::components::{button, pin_field};
use crate::ui::layout::centered_rect_fixed;
use crate::ui::Theme;

/// Draw the registration screen
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let ScreenView::Registration {
        pin_length,
        set_pin,
    } = &state.view.screen
    else {
        return;
    };

    let form = centered_rect_fixed(72, 11, area);
    let rows = super::pin_form_rows(form, 1);

    super::render_heading(frame, rows[0], &state.view, theme);
    pin_field::render(frame, rows[2], *pin_length, state.pin_focused, theme);
    button::render(
        frame,
        rows[4],
        set_pin,
        "Enter",
        state.view.accessibility_mode,
        theme,
    );
}
