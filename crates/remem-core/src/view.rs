//! Render model derived from the access gate
//!
//! Front-ends draw a [`GateView`] and turn user input back into gate events.
//! They never decide on their own which screen is visible or whether an
//! action may run.

use crate::gate::{AccessGate, GateState};
use crate::notes::{Note, NOTES};

/// A pressable action
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    /// Visible caption
    pub title: &'static str,
    /// Whether pressing it does anything
    pub enabled: bool,
    /// Text read out by screen readers
    pub accessibility_label: String,
}

impl ButtonView {
    /// An enabled button labelled with its caption
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            enabled: true,
            accessibility_label: title.to_string(),
        }
    }

    /// A button that is enabled only when `enabled` holds
    pub fn gated(title: &'static str, enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::new(title)
        }
    }

    /// Replace the screen reader label
    pub fn with_accessibility_label(mut self, label: impl Into<String>) -> Self {
        self.accessibility_label = label.into();
        self
    }

    /// Accessibility traits: always `button`, plus `disabled` when inert
    pub fn accessibility_traits(&self) -> Vec<&'static str> {
        let mut traits = vec!["button"];
        if !self.enabled {
            traits.push("disabled");
        }
        traits
    }
}

/// Screen-specific content
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenView {
    /// First run: choose a PIN
    Registration {
        /// Number of characters typed
        pin_length: usize,
        /// "Set pin"
        set_pin: ButtonView,
    },
    /// PIN stored: log in
    Login {
        /// Number of characters typed
        pin_length: usize,
        /// "Log in with pin"
        log_in: ButtonView,
        /// Fingerprint affordance, when the device supports it
        biometric: Option<ButtonView>,
    },
    /// Authenticated: the notes
    Notes {
        /// Notes to show
        notes: &'static [Note],
        /// "Log out"
        log_out: ButtonView,
        /// "Destroy pin"
        destroy: ButtonView,
    },
}

/// Everything a front-end needs to draw the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateView {
    /// Screen content
    pub screen: ScreenView,
    /// Skip decorative UI
    pub accessibility_mode: bool,
    /// A credential or biometric operation is pending
    pub busy: bool,
}

impl GateView {
    /// Heading shown at the top of the screen
    pub fn title(&self) -> &'static str {
        match self.screen {
            ScreenView::Registration { .. } => "Welcome new user!",
            ScreenView::Login { .. } => "Welcome user!",
            ScreenView::Notes { .. } => "Your notes:",
        }
    }

    /// Explanatory line under the heading
    pub fn subtitle(&self) -> Option<&'static str> {
        match self.screen {
            ScreenView::Registration { .. } => {
                Some("Please set a pincode to protect your notes.")
            }
            ScreenView::Login { .. } => Some("Please log in with your pin code."),
            ScreenView::Notes { .. } => None,
        }
    }

    /// Number of PIN characters typed, `None` when no PIN field is shown
    pub fn pin_length(&self) -> Option<usize> {
        match self.screen {
            ScreenView::Registration { pin_length, .. } | ScreenView::Login { pin_length, .. } => {
                Some(pin_length)
            }
            ScreenView::Notes { .. } => None,
        }
    }

    /// The button activated by submitting the PIN field
    pub fn primary_button(&self) -> Option<&ButtonView> {
        match &self.screen {
            ScreenView::Registration { set_pin, .. } => Some(set_pin),
            ScreenView::Login { log_in, .. } => Some(log_in),
            ScreenView::Notes { .. } => None,
        }
    }
}

impl From<&AccessGate> for GateView {
    fn from(gate: &AccessGate) -> Self {
        let pin_length = gate.pin_input().len();
        let can_submit = gate.can_submit();

        let screen = match gate.state() {
            GateState::Unregistered => ScreenView::Registration {
                pin_length,
                set_pin: ButtonView::gated("Set pin", can_submit),
            },
            GateState::Locked => {
                let mut log_in = ButtonView::gated("Log in with pin", can_submit);
                if !can_submit {
                    log_in = log_in
                        .with_accessibility_label("Log in with pin. Enter your pin code first.");
                }
                ScreenView::Login {
                    pin_length,
                    log_in,
                    biometric: gate
                        .biometric_login_available()
                        .then(|| ButtonView::new("Log in with Touch ID")),
                }
            }
            GateState::Authenticated => ScreenView::Notes {
                notes: &NOTES,
                log_out: ButtonView::new("Log out"),
                destroy: ButtonView::new("Destroy pin"),
            },
        };

        Self {
            screen,
            accessibility_mode: gate.accessibility_mode(),
            busy: gate.is_busy(),
        }
    }
}

impl Default for GateView {
    fn default() -> Self {
        Self::from(&AccessGate::new())
    }
}
