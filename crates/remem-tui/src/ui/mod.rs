//! UI rendering

pub mod components;
pub mod layout;
pub mod screens;
pub mod theme;

pub use theme::Theme;

use ratatui::prelude::*;
use remem_core::ScreenView;

use crate::app::{AppState, Overlay};
use components::{banner, confirm::ConfirmDialog, fingerprint};
use layout::{render_footer, render_header, ScreenLayout};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Main render function - delegates to the screen for the gate state
pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let view = &state.view;
    let layout = ScreenLayout::new(frame.area(), !view.accessibility_mode);

    render_header(frame, layout.header, theme);
    banner::render(frame, layout.banner, theme);

    match view.screen {
        ScreenView::Registration { .. } => {
            screens::registration::render(frame, layout.content, state, theme)
        }
        ScreenView::Login { .. } => screens::login::render(frame, layout.content, state, theme),
        ScreenView::Notes { .. } => screens::notes::render(frame, layout.content, state, theme),
    }

    let busy = view
        .busy
        .then(|| format!("{} working", SPINNER[(state.tick % SPINNER.len() as u64) as usize]));
    render_footer(
        frame,
        layout.footer,
        footer_hints(state),
        busy.as_deref(),
        theme,
    );

    match &state.overlay {
        Some(Overlay::ConfirmDestroy) => ConfirmDialog::dangerous(
            "Destroy pin",
            "Your pin will be removed from this device. Continue?",
        )
        .render(frame, frame.area(), theme),
        Some(Overlay::Fingerprint(request)) => {
            fingerprint::render(frame, frame.area(), &request.prompt, theme)
        }
        None => {}
    }
}

fn footer_hints(state: &AppState) -> &'static [(&'static str, &'static str)] {
    if state.overlay.is_some() {
        return &[];
    }
    match state.view.screen {
        ScreenView::Registration { .. } => {
            &[("0-9", "Type pin"), ("Enter", "Set pin"), ("Esc", "Quit")]
        }
        ScreenView::Login {
            biometric: Some(_), ..
        } => &[
            ("0-9", "Type pin"),
            ("Enter", "Log in"),
            ("f", "Touch ID"),
            ("Esc", "Quit"),
        ],
        ScreenView::Login { .. } => &[("0-9", "Type pin"), ("Enter", "Log in"), ("Esc", "Quit")],
        ScreenView::Notes { .. } => &[("l", "Log out"), ("d", "Destroy pin"), ("q", "Quit")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use remem_core::{ButtonView, NOTES};

    fn draw(state: &AppState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(80, 32)).unwrap();
        terminal
            .draw(|frame| render(frame, state, &Theme::default()))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn text(buffer: &Buffer) -> String {
        let mut out = String::new();
        for row in buffer.content.chunks(buffer.area.width as usize) {
            for cell in row {
                out.push_str(cell.symbol());
            }
            out.push('\n');
        }
        out
    }

    fn notes_state(accessibility_mode: bool) -> AppState {
        let mut state = AppState::new();
        state.view.screen = ScreenView::Notes {
            notes: &NOTES,
            log_out: ButtonView::new("Log out"),
            destroy: ButtonView::new("Destroy pin"),
        };
        state.view.accessibility_mode = accessibility_mode;
        state
    }

    #[test]
    fn test_registration_screen() {
        let screen = text(&draw(&AppState::new()));
        assert!(screen.contains("Welcome new user!"));
        assert!(screen.contains("Please set a pincode to protect your notes."));
        assert!(screen.contains("Set pin"));
        assert!(screen.contains("your notes, kept safe"));
    }

    #[test]
    fn test_login_screen_offers_touch_id() {
        let mut state = AppState::new();
        state.view.screen = ScreenView::Login {
            pin_length: 3,
            log_in: ButtonView::gated("Log in with pin", false),
            biometric: Some(ButtonView::new("Log in with Touch ID")),
        };
        let screen = text(&draw(&state));
        assert!(screen.contains("Welcome user!"));
        assert!(screen.contains("Log in with Touch ID"));
        assert_eq!(screen.matches('●').count(), 3);
    }

    #[test]
    fn test_notes_screen() {
        let screen = text(&draw(&notes_state(false)));
        assert!(screen.contains("Your notes:"));
        assert!(screen.contains("Oscar Wilde"));
        assert!(screen.contains("Destroy pin"));
    }

    #[test]
    fn test_accessibility_mode_hides_banner() {
        let screen = text(&draw(&notes_state(true)));
        assert!(!screen.contains("your notes, kept safe"));
        assert!(screen.contains("Author: Oscar Wilde"));
    }

    #[test]
    fn test_disabled_button_label_is_spoken() {
        let mut state = AppState::new();
        state.view.screen = ScreenView::Login {
            pin_length: 0,
            log_in: ButtonView::gated("Log in with pin", false)
                .with_accessibility_label("Log in with pin. Enter your pin code first."),
            biometric: None,
        };
        state.view.accessibility_mode = true;
        let screen = text(&draw(&state));
        assert!(screen.contains("Enter your pin code first. (disabled)"));
    }

    #[test]
    fn test_destroy_confirmation_overlay() {
        let mut state = notes_state(false);
        state.overlay = Some(Overlay::ConfirmDestroy);
        let screen = text(&draw(&state));
        assert!(screen.contains("[y] Yes"));
    }

    #[test]
    fn test_busy_spinner() {
        let mut state = AppState::new();
        state.view.busy = true;
        let screen = text(&draw(&state));
        assert!(screen.contains("working"));
    }
}
