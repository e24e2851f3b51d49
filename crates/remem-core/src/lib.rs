//! reMem core - PIN and fingerprint gated notes
//!
//! This crate provides everything behind the reMem screens that is not
//! rendering:
//! - The access gate state machine (registration, locked, authenticated)
//! - A render model derived from the gate
//! - Async traits for the platform secure store, biometric authenticator
//!   and accessibility probe, plus file and in-memory implementations
//! - A tokio driver that executes the gate's commands against those services
//!
//! The gate itself performs no I/O. Every external call is described as a
//! [`GateCommand`] and its completion is fed back as a [`GateEvent`].

pub mod driver;
pub mod error;
pub mod gate;
pub mod notes;
pub mod pin;
pub mod services;
pub mod view;

pub use driver::{GateDriver, Services, UiCommand};
pub use error::{Error, Result};
pub use gate::{AccessGate, BiometricSupport, GateCommand, GateEvent, GateState, Ticket};
pub use notes::{Note, NOTES};
pub use pin::Pin;
pub use services::{
    AccessibilityProbe, BiometricAuthenticator, BiometricError, BiometricOutcome, SecureStore,
};
pub use view::{ButtonView, GateView, ScreenView};

/// Secure store key under which the PIN is kept
pub const PIN_STORE_KEY: &str = "reMem-pin";

/// Minimum number of characters before "Set pin" / "Log in" can be used
pub const MIN_PIN_LENGTH: usize = 5;

/// Prompt shown by the biometric authenticator
pub const BIOMETRIC_PROMPT: &str = "Your notes are safe. Unlock them with your fingerprint";
