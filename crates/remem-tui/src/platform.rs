//! Terminal stand-ins for platform services
//!
//! A terminal has no fingerprint reader and no accessibility API, so:
//! - [`TerminalBiometrics`] asks the UI to show a fingerprint prompt and
//!   waits for the user to answer it with a key press
//! - [`TerminalAccessibility`] reads a config override or the
//!   `REMEM_SCREEN_READER` environment variable

use async_trait::async_trait;
use remem_core::{AccessibilityProbe, BiometricAuthenticator, BiometricError, BiometricOutcome};
use tokio::sync::{mpsc, oneshot};

use crate::app::BiometricConfig;

/// Environment variable reporting an active screen reader
pub const SCREEN_READER_ENV: &str = "REMEM_SCREEN_READER";

/// A fingerprint prompt waiting for the user
#[derive(Debug)]
pub struct BiometricRequest {
    /// Text to show
    pub prompt: String,
    /// Where the answer goes
    reply: oneshot::Sender<BiometricOutcome>,
}

impl BiometricRequest {
    /// Answer the prompt
    pub fn answer(self, outcome: BiometricOutcome) {
        if self.reply.send(outcome).is_err() {
            tracing::debug!("Fingerprint prompt answered after it was abandoned");
        }
    }
}

/// Fingerprint reader simulated through a UI prompt
pub struct TerminalBiometrics {
    support: BiometricConfig,
    requests: mpsc::UnboundedSender<BiometricRequest>,
}

impl TerminalBiometrics {
    /// Create the authenticator and the receiver the UI reads prompts from
    pub fn new(support: BiometricConfig) -> (Self, mpsc::UnboundedReceiver<BiometricRequest>) {
        let (requests, prompts) = mpsc::unbounded_channel();
        (Self { support, requests }, prompts)
    }
}

#[async_trait]
impl BiometricAuthenticator for TerminalBiometrics {
    async fn has_hardware(&self) -> bool {
        self.support.hardware
    }

    async fn is_enrolled(&self) -> bool {
        self.support.enrolled
    }

    async fn authenticate(&self, prompt: &str) -> BiometricOutcome {
        if !self.support.hardware {
            return BiometricOutcome::failure(BiometricError::NotAvailable);
        }
        if !self.support.enrolled {
            return BiometricOutcome::failure(BiometricError::NotEnrolled);
        }

        let (reply, answer) = oneshot::channel();
        let request = BiometricRequest {
            prompt: prompt.to_string(),
            reply,
        };
        if self.requests.send(request).is_err() {
            return BiometricOutcome::failure(BiometricError::SystemCancel);
        }

        // The UI dropping the prompt (e.g. on quit) counts as a system cancel
        answer
            .await
            .unwrap_or(BiometricOutcome::failure(BiometricError::SystemCancel))
    }
}

/// Screen reader detection for terminals
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalAccessibility {
    /// Forced answer from the config file
    configured: Option<bool>,
}

impl TerminalAccessibility {
    /// Create a probe, `configured` wins over the environment
    pub fn new(configured: Option<bool>) -> Self {
        Self { configured }
    }
}

#[async_trait]
impl AccessibilityProbe for TerminalAccessibility {
    async fn screen_reader_enabled(&self) -> bool {
        if let Some(enabled) = self.configured {
            return enabled;
        }
        std::env::var(SCREEN_READER_ENV)
            .map(|value| parse_flag(&value))
            .unwrap_or(false)
    }
}

/// Interpret an environment flag
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
