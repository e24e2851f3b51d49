//! In-memory service implementations
//!
//! Used for ephemeral sessions (`--ephemeral`) and as test doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AccessibilityProbe, BiometricAuthenticator, BiometricOutcome, SecureStore};
use crate::error::{Error, Result};

/// Secure store that forgets everything on drop
#[derive(Default)]
pub struct MemorySecureStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// Biometric authenticator with fixed capabilities and a scripted answer
pub struct StaticBiometrics {
    hardware: bool,
    enrolled: bool,
    outcome: BiometricOutcome,
    attempts: AtomicUsize,
}

impl StaticBiometrics {
    /// Hardware present and enrolled, every attempt answers `outcome`
    pub fn new(outcome: BiometricOutcome) -> Self {
        Self {
            hardware: true,
            enrolled: true,
            outcome,
            attempts: AtomicUsize::new(0),
        }
    }

    /// A device without a fingerprint reader
    pub fn unavailable() -> Self {
        Self {
            hardware: false,
            enrolled: false,
            outcome: BiometricOutcome::failure(super::BiometricError::NotAvailable),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Override the capability flags
    pub fn with_capabilities(mut self, hardware: bool, enrolled: bool) -> Self {
        self.hardware = hardware;
        self.enrolled = enrolled;
        self
    }

    /// Number of times `authenticate` was called
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BiometricAuthenticator for StaticBiometrics {
    async fn has_hardware(&self) -> bool {
        self.hardware
    }

    async fn is_enrolled(&self) -> bool {
        self.enrolled
    }

    async fn authenticate(&self, _prompt: &str) -> BiometricOutcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}

/// Accessibility probe with a fixed answer
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticAccessibility {
    /// Whether a screen reader is reported as active
    pub screen_reader: bool,
}

impl StaticAccessibility {
    /// Create a probe reporting `screen_reader`
    pub fn new(screen_reader: bool) -> Self {
        Self { screen_reader }
    }
}

#[async_trait]
impl AccessibilityProbe for StaticAccessibility {
    async fn screen_reader_enabled(&self) -> bool {
        self.screen_reader
    }
}
