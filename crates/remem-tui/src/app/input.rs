//! Key bindings
//!
//! Keys are turned into [`Action`]s using only the current render model and
//! overlay, so the mapping can be tested without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use remem_core::{BiometricError, BiometricOutcome, GateEvent, ScreenView};

use super::state::{AppState, Overlay};

/// Longest PIN the field accepts
pub const MAX_PIN_INPUT: usize = 12;

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward to the gate
    Gate(GateEvent),
    /// Ask before destroying the PIN
    OpenDestroyConfirm,
    /// Destroy confirmed
    ConfirmDestroy,
    /// Dismiss the confirmation
    CloseOverlay,
    /// Answer the fingerprint prompt
    AnswerFingerprint(BiometricOutcome),
    /// Leave the app
    Quit,
}

/// Map a key press to an action
pub fn map_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match &state.overlay {
        Some(Overlay::Fingerprint(_)) => return map_fingerprint_key(key.code),
        Some(Overlay::ConfirmDestroy) => return map_confirm_key(key.code),
        None => {}
    }

    match &state.view.screen {
        ScreenView::Registration { pin_length, set_pin } => match key.code {
            KeyCode::Enter if set_pin.enabled => Some(Action::Gate(GateEvent::SetPinPressed)),
            code => map_pin_key(code, *pin_length),
        },
        ScreenView::Login {
            pin_length,
            log_in,
            biometric,
        } => match key.code {
            KeyCode::Enter if log_in.enabled => Some(Action::Gate(GateEvent::LoginPressed)),
            KeyCode::Char('f') if biometric.is_some() => {
                Some(Action::Gate(GateEvent::BiometricPressed))
            }
            code => map_pin_key(code, *pin_length),
        },
        ScreenView::Notes { .. } => match key.code {
            KeyCode::Char('l') => Some(Action::Gate(GateEvent::LogoutPressed)),
            KeyCode::Char('d') => Some(Action::OpenDestroyConfirm),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
    }
}

fn map_pin_key(code: KeyCode, pin_length: usize) -> Option<Action> {
    match code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            (pin_length < MAX_PIN_INPUT).then_some(Action::Gate(GateEvent::PinDigit(c)))
        }
        KeyCode::Backspace => Some(Action::Gate(GateEvent::PinBackspace)),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

fn map_confirm_key(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmDestroy),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseOverlay),
        _ => None,
    }
}

fn map_fingerprint_key(code: KeyCode) -> Option<Action> {
    let outcome = match code {
        KeyCode::Char('y') | KeyCode::Enter => BiometricOutcome::success(),
        KeyCode::Char('p') => BiometricOutcome::failure(BiometricError::UserFallback),
        KeyCode::Char('x') => BiometricOutcome::failure(BiometricError::AuthenticationFailed),
        KeyCode::Char('n') | KeyCode::Esc => BiometricOutcome::failure(BiometricError::UserCancel),
        _ => return None,
    };
    Some(Action::AnswerFingerprint(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use remem_core::ButtonView;
    use rstest::rstest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn registration(pin_length: usize, enabled: bool) -> AppState {
        let mut state = AppState::new();
        state.view.screen = ScreenView::Registration {
            pin_length,
            set_pin: ButtonView::gated("Set pin", enabled),
        };
        state
    }

    fn login(enabled: bool, biometric: bool) -> AppState {
        let mut state = AppState::new();
        state.view.screen = ScreenView::Login {
            pin_length: 0,
            log_in: ButtonView::gated("Log in with pin", enabled),
            biometric: biometric.then(|| ButtonView::new("Log in with Touch ID")),
        };
        state
    }

    fn notes() -> AppState {
        let mut state = AppState::new();
        state.view.screen = ScreenView::Notes {
            notes: &remem_core::NOTES,
            log_out: ButtonView::new("Log out"),
            destroy: ButtonView::new("Destroy pin"),
        };
        state
    }

    #[rstest]
    #[case(KeyCode::Char('7'), Some(Action::Gate(GateEvent::PinDigit('7'))))]
    #[case(KeyCode::Backspace, Some(Action::Gate(GateEvent::PinBackspace)))]
    #[case(KeyCode::Char('a'), None)]
    #[case(KeyCode::Enter, None)]
    #[case(KeyCode::Esc, Some(Action::Quit))]
    fn test_registration_keys(#[case] code: KeyCode, #[case] expected: Option<Action>) {
        assert_eq!(map_key(&registration(2, false), press(code)), expected);
    }

    #[test]
    fn test_enter_follows_button_state() {
        assert_eq!(
            map_key(&registration(5, true), press(KeyCode::Enter)),
            Some(Action::Gate(GateEvent::SetPinPressed))
        );
        assert_eq!(
            map_key(&login(true, false), press(KeyCode::Enter)),
            Some(Action::Gate(GateEvent::LoginPressed))
        );
        assert_eq!(map_key(&login(false, false), press(KeyCode::Enter)), None);
    }

    #[test]
    fn test_pin_field_is_capped() {
        let state = registration(MAX_PIN_INPUT, true);
        assert_eq!(map_key(&state, press(KeyCode::Char('1'))), None);
        assert_eq!(
            map_key(&state, press(KeyCode::Backspace)),
            Some(Action::Gate(GateEvent::PinBackspace))
        );
    }

    #[rstest]
    #[case(true, Some(Action::Gate(GateEvent::BiometricPressed)))]
    #[case(false, None)]
    fn test_fingerprint_key_needs_button(#[case] offered: bool, #[case] expected: Option<Action>) {
        assert_eq!(map_key(&login(false, offered), press(KeyCode::Char('f'))), expected);
    }

    #[rstest]
    #[case(KeyCode::Char('l'), Some(Action::Gate(GateEvent::LogoutPressed)))]
    #[case(KeyCode::Char('d'), Some(Action::OpenDestroyConfirm))]
    #[case(KeyCode::Char('1'), None)]
    #[case(KeyCode::Char('q'), Some(Action::Quit))]
    fn test_notes_keys(#[case] code: KeyCode, #[case] expected: Option<Action>) {
        assert_eq!(map_key(&notes(), press(code)), expected);
    }

    #[rstest]
    #[case(KeyCode::Char('y'), Some(Action::ConfirmDestroy))]
    #[case(KeyCode::Char('n'), Some(Action::CloseOverlay))]
    #[case(KeyCode::Esc, Some(Action::CloseOverlay))]
    #[case(KeyCode::Char('l'), None)]
    fn test_confirm_overlay_keys(#[case] code: KeyCode, #[case] expected: Option<Action>) {
        let mut state = notes();
        state.overlay = Some(Overlay::ConfirmDestroy);
        assert_eq!(map_key(&state, press(code)), expected);
    }

    #[rstest]
    #[case(KeyCode::Enter, BiometricOutcome::success())]
    #[case(KeyCode::Char('p'), BiometricOutcome::failure(BiometricError::UserFallback))]
    #[case(KeyCode::Char('x'), BiometricOutcome::failure(BiometricError::AuthenticationFailed))]
    #[case(KeyCode::Esc, BiometricOutcome::failure(BiometricError::UserCancel))]
    fn test_fingerprint_overlay_keys(#[case] code: KeyCode, #[case] outcome: BiometricOutcome) {
        assert_eq!(map_fingerprint_key(code), Some(Action::AnswerFingerprint(outcome)));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut state = notes();
        state.overlay = Some(Overlay::ConfirmDestroy);
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&state, key), Some(Action::Quit));
    }
}
