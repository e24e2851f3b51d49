//! Platform service abstractions
//!
//! The access gate talks to three platform services:
//! - A secure store holding string values under fixed keys
//! - A biometric authenticator (fingerprint reader)
//! - An accessibility probe reporting whether a screen reader is active
//!
//! Each is an async trait so that real platform bindings, the terminal
//! simulation and test doubles can be swapped freely.

mod file;
mod memory;

pub use file::FileSecureStore;
pub use memory::{MemorySecureStore, StaticAccessibility, StaticBiometrics};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque key/value string store
#[async_trait]
pub trait SecureStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    ///
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Fingerprint (or similar) authenticator
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    /// Whether the device has biometric hardware
    async fn has_hardware(&self) -> bool;

    /// Whether at least one biometric credential is enrolled
    async fn is_enrolled(&self) -> bool;

    /// Ask the user to authenticate, showing `prompt`
    async fn authenticate(&self, prompt: &str) -> BiometricOutcome;
}

/// Reports platform accessibility state
#[async_trait]
pub trait AccessibilityProbe: Send + Sync {
    /// Whether a screen reader is currently active
    async fn screen_reader_enabled(&self) -> bool;
}

/// Reason a biometric authentication did not succeed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometricError {
    /// The user dismissed the prompt
    UserCancel,
    /// The user asked to use their PIN instead
    UserFallback,
    /// The system dismissed the prompt (app switch, incoming call)
    SystemCancel,
    /// Too many failed attempts, the sensor is locked
    Lockout,
    /// No fingerprints enrolled
    NotEnrolled,
    /// No usable hardware
    NotAvailable,
    /// The fingerprint did not match
    AuthenticationFailed,
    /// Anything the platform did not classify
    Unknown,
}

impl BiometricError {
    /// Platform reason code
    pub fn as_str(&self) -> &'static str {
        match self {
            BiometricError::UserCancel => "user_cancel",
            BiometricError::UserFallback => "user_fallback",
            BiometricError::SystemCancel => "system_cancel",
            BiometricError::Lockout => "lockout",
            BiometricError::NotEnrolled => "not_enrolled",
            BiometricError::NotAvailable => "not_available",
            BiometricError::AuthenticationFailed => "authentication_failed",
            BiometricError::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BiometricError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a biometric authentication attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricOutcome {
    /// Whether the user was verified
    pub success: bool,
    /// Why verification failed, if it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BiometricError>,
}

impl BiometricOutcome {
    /// A successful verification
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failed verification with the given reason
    pub fn failure(reason: BiometricError) -> Self {
        Self {
            success: false,
            error: Some(reason),
        }
    }

    /// Whether the user asked to fall back to their PIN
    pub fn is_fallback(&self) -> bool {
        !self.success && self.error == Some(BiometricError::UserFallback)
    }
}
