//! Application state

use remem_core::GateView;

use crate::platform::BiometricRequest;

/// Modal drawn over the current screen
#[derive(Debug)]
pub enum Overlay {
    /// "Destroy pin?" confirmation
    ConfirmDestroy,
    /// Simulated fingerprint reader waiting for an answer
    Fingerprint(BiometricRequest),
}

/// Application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Latest render model from the gate
    pub view: GateView,

    /// Whether the PIN field has input focus
    pub pin_focused: bool,

    /// Active modal, if any
    pub overlay: Option<Overlay>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter for the busy spinner
    pub tick: u64,
}

impl AppState {
    /// Create a new application state
    pub fn new() -> Self {
        Self {
            pin_focused: true,
            ..Self::default()
        }
    }
}
