//! PIN stored: log in with the PIN or a fingerprint

use ratatui::prelude::*;
use remem_core::ScreenView;

use crate::app::AppState;
use crate::ui::components::{button, pin_field};
use crate::ui::layout::centered_rect_fixed;
use crate::ui::Theme;

/// Draw the login screen
pub fn render(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let ScreenView::Login {
        pin_length,
        log_in,
        biometric,
    } = &state.view.screen
    else {
        return;
    };

    let spoken = state.view.accessibility_mode;
    let form = centered_rect_fixed(72, 13, area);
    let rows = super::pin_form_rows(form, 3);

    super::render_heading(frame, rows[0], &state.view, theme);
    pin_field::render(frame, rows[2], *pin_length, state.pin_focused, theme);
    button::render(frame, rows[4], log_in, "Enter", spoken, theme);

    if let Some(biometric) = biometric {
        button::render(frame, rows[6], biometric, "f", spoken, theme);
    }
}
