//! Access gate state machine
//!
//! The gate decides which of three screens the user sees and which calls go
//! out to the secure store and the biometric authenticator. It is driven
//! entirely through [`AccessGate::update`]: user actions and service
//! completions come in as [`GateEvent`]s, and the I/O the gate wants
//! performed goes out as [`GateCommand`]s.
//!
//! # Rules
//!
//! - Every service request carries a [`Ticket`]. Completions whose ticket is
//!   not the one the gate is waiting for are discarded, so results landing
//!   after an unmount (or from a previous mount) never touch the session.
//! - At most one credential or biometric operation is in flight. Actions
//!   arriving while one is pending are ignored.
//! - The startup credential read is abandoned once a new PIN is stored or
//!   the credential is deleted; its answer would describe the old store. An
//!   answer arriving while a PIN write is pending counts only if the write
//!   fails.
//! - Failures are never surfaced. A failed read looks like "no credential",
//!   a failed write or delete leaves the state as it was.

use crate::pin::Pin;
use crate::services::BiometricOutcome;
use crate::BIOMETRIC_PROMPT;

/// Which screen the gate is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GateState {
    /// No PIN stored; registration screen
    #[default]
    Unregistered,
    /// PIN stored, session not yet authenticated; login screen
    Locked,
    /// Session authenticated; notes are visible
    Authenticated,
}

/// Identifies one service request
///
/// Tickets are unique within a gate and carry the mount epoch they were
/// issued in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

/// Biometric capabilities reported by the device
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiometricSupport {
    /// Fingerprint hardware is present
    pub hardware: bool,
    /// At least one fingerprint is enrolled
    pub enrolled: bool,
}

impl BiometricSupport {
    /// Whether biometric login can be offered
    pub fn available(&self) -> bool {
        self.hardware && self.enrolled
    }
}

/// Inputs to the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// The gate became visible; triggers the startup probes
    Mounted,
    /// The gate was torn down; pending results will be discarded
    Unmounted,

    /// The PIN field content was replaced
    PinChanged(Pin),
    /// A digit was typed into the PIN field
    PinDigit(char),
    /// The last character of the PIN field was erased
    PinBackspace,

    /// "Set pin" was activated
    SetPinPressed,
    /// "Log in with pin" was activated
    LoginPressed,
    /// The fingerprint affordance was activated
    BiometricPressed,
    /// "Log out" was activated
    LogoutPressed,
    /// "Destroy pin" was activated
    DestroyPressed,

    /// A credential read finished; `None` when nothing is stored or the read failed
    CredentialRead { ticket: Ticket, value: Option<Pin> },
    /// A credential write finished
    CredentialWritten { ticket: Ticket, acknowledged: bool },
    /// A credential delete finished
    CredentialDeleted { ticket: Ticket, acknowledged: bool },
    /// The biometric authenticator answered
    BiometricCompleted {
        ticket: Ticket,
        outcome: BiometricOutcome,
    },
    /// Biometric capability probe finished
    CapabilitiesProbed {
        ticket: Ticket,
        hardware: bool,
        enrolled: bool,
    },
    /// Accessibility probe finished
    AccessibilityProbed { ticket: Ticket, screen_reader: bool },
}

impl GateEvent {
    /// Short name for logging (never includes PIN material)
    pub fn name(&self) -> &'static str {
        match self {
            GateEvent::Mounted => "mounted",
            GateEvent::Unmounted => "unmounted",
            GateEvent::PinChanged(_) => "pin_changed",
            GateEvent::PinDigit(_) => "pin_digit",
            GateEvent::PinBackspace => "pin_backspace",
            GateEvent::SetPinPressed => "set_pin",
            GateEvent::LoginPressed => "login",
            GateEvent::BiometricPressed => "biometric",
            GateEvent::LogoutPressed => "logout",
            GateEvent::DestroyPressed => "destroy_pin",
            GateEvent::CredentialRead { .. } => "credential_read",
            GateEvent::CredentialWritten { .. } => "credential_written",
            GateEvent::CredentialDeleted { .. } => "credential_deleted",
            GateEvent::BiometricCompleted { .. } => "biometric_completed",
            GateEvent::CapabilitiesProbed { .. } => "capabilities_probed",
            GateEvent::AccessibilityProbed { .. } => "accessibility_probed",
        }
    }

    /// Whether this event reports the completion of a service request
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            GateEvent::CredentialRead { .. }
                | GateEvent::CredentialWritten { .. }
                | GateEvent::CredentialDeleted { .. }
                | GateEvent::BiometricCompleted { .. }
                | GateEvent::CapabilitiesProbed { .. }
                | GateEvent::AccessibilityProbed { .. }
        )
    }
}

/// Outputs of the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateCommand {
    /// Read the stored PIN
    ReadCredential { ticket: Ticket },
    /// Store `pin` as the credential
    WriteCredential { ticket: Ticket, pin: Pin },
    /// Delete the stored credential
    DeleteCredential { ticket: Ticket },
    /// Run biometric authentication showing `prompt`
    Authenticate { ticket: Ticket, prompt: &'static str },
    /// Ask the authenticator for hardware and enrollment state
    ProbeCapabilities { ticket: Ticket },
    /// Ask whether a screen reader is active
    ProbeAccessibility { ticket: Ticket },
    /// Move input focus to the PIN field
    FocusPinField,
}

impl GateCommand {
    /// The ticket of a service request, `None` for UI commands
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            GateCommand::ReadCredential { ticket }
            | GateCommand::WriteCredential { ticket, .. }
            | GateCommand::DeleteCredential { ticket }
            | GateCommand::Authenticate { ticket, .. }
            | GateCommand::ProbeCapabilities { ticket }
            | GateCommand::ProbeAccessibility { ticket } => Some(*ticket),
            GateCommand::FocusPinField => None,
        }
    }
}

/// Credential or biometric operation awaiting its result
#[derive(Debug)]
enum Operation {
    SetPin,
    LoginWithPin(Pin),
    Biometric,
    DestroyPin,
}

impl Operation {
    fn name(&self) -> &'static str {
        match self {
            Operation::SetPin => "set_pin",
            Operation::LoginWithPin(_) => "login",
            Operation::Biometric => "biometric",
            Operation::DestroyPin => "destroy_pin",
        }
    }
}

#[derive(Debug)]
struct InFlight {
    ticket: Ticket,
    operation: Operation,
}

/// The authentication state machine
#[derive(Debug, Default)]
pub struct AccessGate {
    /// Current screen
    state: GateState,
    /// PIN being typed
    pin_input: Pin,
    /// Suppress decorative UI
    accessibility_mode: bool,
    /// Reported biometric capabilities
    biometrics: BiometricSupport,

    /// Whether the gate is currently mounted
    mounted: bool,
    /// Incremented on every mount
    epoch: u64,
    /// Next ticket sequence number
    next_seq: u64,

    /// Startup credential probe awaiting its answer
    startup_probe: Option<Ticket>,
    /// Startup read found a credential while a PIN write was pending
    credential_found_during_write: bool,
    /// Biometric capability probe awaiting its answer
    capability_probe: Option<Ticket>,
    /// Accessibility probe awaiting its answer
    accessibility_probe: Option<Ticket>,
    /// Credential or biometric operation awaiting its answer
    in_flight: Option<InFlight>,
}

impl AccessGate {
    /// Create an unmounted gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Current screen
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Whether a PIN is known to be stored
    pub fn pin_configured(&self) -> bool {
        self.state != GateState::Unregistered
    }

    /// Whether the session passed a credential check
    pub fn authenticated(&self) -> bool {
        self.state == GateState::Authenticated
    }

    /// PIN currently typed
    pub fn pin_input(&self) -> &Pin {
        &self.pin_input
    }

    /// Whether "Set pin" / "Log in" may be activated
    pub fn can_submit(&self) -> bool {
        self.pin_input.meets_minimum()
    }

    /// Reported biometric capabilities
    pub fn biometrics(&self) -> BiometricSupport {
        self.biometrics
    }

    /// Whether the fingerprint affordance is shown
    pub fn biometric_login_available(&self) -> bool {
        self.state == GateState::Locked && self.biometrics.available()
    }

    /// Whether decorative UI should be skipped
    pub fn accessibility_mode(&self) -> bool {
        self.accessibility_mode
    }

    /// Whether a credential or biometric operation is pending
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the gate is mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Apply one event and return the commands it produces
    pub fn update(&mut self, event: GateEvent) -> Vec<GateCommand> {
        if !self.mounted && !matches!(event, GateEvent::Mounted | GateEvent::Unmounted) {
            tracing::debug!("Ignoring {} on an unmounted gate", event.name());
            return Vec::new();
        }

        let before = self.state;
        let commands = match event {
            GateEvent::Mounted => self.mount(),
            GateEvent::Unmounted => {
                self.unmount();
                Vec::new()
            }

            GateEvent::PinChanged(pin) => {
                if self.accepts_input() {
                    self.pin_input = pin;
                }
                Vec::new()
            }
            GateEvent::PinDigit(c) => {
                if self.accepts_input() && c.is_ascii_digit() {
                    self.pin_input.push(c);
                }
                Vec::new()
            }
            GateEvent::PinBackspace => {
                if self.accepts_input() {
                    self.pin_input.pop();
                }
                Vec::new()
            }

            GateEvent::SetPinPressed => self.set_pin(),
            GateEvent::LoginPressed => self.login(),
            GateEvent::BiometricPressed => self.biometric_login(),
            GateEvent::LogoutPressed => {
                self.logout();
                Vec::new()
            }
            GateEvent::DestroyPressed => self.destroy_pin(),

            GateEvent::CredentialRead { ticket, value } => {
                self.credential_read(ticket, value);
                Vec::new()
            }
            GateEvent::CredentialWritten {
                ticket,
                acknowledged,
            } => {
                self.credential_written(ticket, acknowledged);
                Vec::new()
            }
            GateEvent::CredentialDeleted {
                ticket,
                acknowledged,
            } => {
                self.credential_deleted(ticket, acknowledged);
                Vec::new()
            }
            GateEvent::BiometricCompleted { ticket, outcome } => {
                self.biometric_completed(ticket, outcome)
            }
            GateEvent::CapabilitiesProbed {
                ticket,
                hardware,
                enrolled,
            } => {
                if self.capability_probe == Some(ticket) {
                    self.capability_probe = None;
                    self.biometrics = BiometricSupport { hardware, enrolled };
                    tracing::debug!(
                        "Biometrics: hardware={} enrolled={}",
                        hardware,
                        enrolled
                    );
                } else {
                    tracing::debug!("Discarding stale capability probe");
                }
                Vec::new()
            }
            GateEvent::AccessibilityProbed {
                ticket,
                screen_reader,
            } => {
                if self.accessibility_probe == Some(ticket) {
                    self.accessibility_probe = None;
                    self.accessibility_mode = screen_reader;
                    tracing::debug!("Screen reader active: {}", screen_reader);
                } else {
                    tracing::debug!("Discarding stale accessibility probe");
                }
                Vec::new()
            }
        };

        if self.state != before {
            tracing::info!("Gate {:?} -> {:?}", before, self.state);
        }

        commands
    }

    fn mount(&mut self) -> Vec<GateCommand> {
        if self.mounted {
            tracing::debug!("Gate already mounted");
            return Vec::new();
        }

        self.epoch += 1;
        self.mounted = true;
        self.reset_session();

        let read = self.issue();
        let capabilities = self.issue();
        let accessibility = self.issue();
        self.startup_probe = Some(read);
        self.capability_probe = Some(capabilities);
        self.accessibility_probe = Some(accessibility);

        vec![
            GateCommand::ReadCredential { ticket: read },
            GateCommand::ProbeCapabilities {
                ticket: capabilities,
            },
            GateCommand::ProbeAccessibility {
                ticket: accessibility,
            },
        ]
    }

    fn unmount(&mut self) {
        if let Some(pending) = self.in_flight.take() {
            tracing::debug!(
                "Unmounting with {} in flight; its result will be discarded",
                pending.operation.name()
            );
        }
        self.mounted = false;
        self.startup_probe = None;
        self.capability_probe = None;
        self.accessibility_probe = None;
        self.pin_input.clear();
    }

    fn reset_session(&mut self) {
        self.state = GateState::Unregistered;
        self.pin_input.clear();
        self.accessibility_mode = false;
        self.biometrics = BiometricSupport::default();
        self.in_flight = None;
        self.credential_found_during_write = false;
    }

    fn issue(&mut self) -> Ticket {
        let ticket = Ticket {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        ticket
    }

    fn accepts_input(&self) -> bool {
        self.state != GateState::Authenticated
    }

    /// Register `operation` as in flight, unless another one already is
    fn begin(&mut self, operation: Operation) -> Option<Ticket> {
        if let Some(pending) = &self.in_flight {
            tracing::debug!(
                "Ignoring {} while {} is in flight",
                operation.name(),
                pending.operation.name()
            );
            return None;
        }
        let ticket = self.issue();
        self.in_flight = Some(InFlight { ticket, operation });
        Some(ticket)
    }

    /// Take the in-flight operation if `ticket` is the one it is waiting for
    fn complete(&mut self, ticket: Ticket) -> Option<Operation> {
        match &self.in_flight {
            Some(pending) if pending.ticket == ticket => {
                self.in_flight.take().map(|pending| pending.operation)
            }
            _ => None,
        }
    }

    fn set_pin(&mut self) -> Vec<GateCommand> {
        if self.state != GateState::Unregistered || !self.can_submit() {
            tracing::debug!("Set pin not available");
            return Vec::new();
        }
        let Some(ticket) = self.begin(Operation::SetPin) else {
            return Vec::new();
        };
        self.credential_found_during_write = false;
        vec![GateCommand::WriteCredential {
            ticket,
            pin: self.pin_input.clone(),
        }]
    }

    fn login(&mut self) -> Vec<GateCommand> {
        if self.state != GateState::Locked || !self.can_submit() {
            tracing::debug!("PIN login not available");
            return Vec::new();
        }
        let candidate = self.pin_input.clone();
        match self.begin(Operation::LoginWithPin(candidate)) {
            Some(ticket) => vec![GateCommand::ReadCredential { ticket }],
            None => Vec::new(),
        }
    }

    fn biometric_login(&mut self) -> Vec<GateCommand> {
        if !self.biometric_login_available() {
            tracing::debug!("Biometric login not available");
            return Vec::new();
        }
        match self.begin(Operation::Biometric) {
            Some(ticket) => vec![GateCommand::Authenticate {
                ticket,
                prompt: BIOMETRIC_PROMPT,
            }],
            None => Vec::new(),
        }
    }

    fn logout(&mut self) {
        if self.state == GateState::Authenticated {
            self.state = GateState::Locked;
            self.pin_input.clear();
        }
    }

    fn destroy_pin(&mut self) -> Vec<GateCommand> {
        if self.state != GateState::Authenticated {
            tracing::debug!("Destroy pin not available");
            return Vec::new();
        }
        let Some(ticket) = self.begin(Operation::DestroyPin) else {
            return Vec::new();
        };
        self.startup_probe = None;
        vec![GateCommand::DeleteCredential { ticket }]
    }

    fn credential_read(&mut self, ticket: Ticket, value: Option<Pin>) {
        let stored = value.filter(|v| !v.is_empty());

        if self.startup_probe == Some(ticket) {
            self.startup_probe = None;
            if self.pin_write_pending() {
                // Applied only if the write fails
                self.credential_found_during_write = stored.is_some();
                return;
            }
            if stored.is_some() && self.state == GateState::Unregistered {
                self.state = GateState::Locked;
            }
            return;
        }

        match self.complete(ticket) {
            Some(Operation::LoginWithPin(candidate)) => {
                self.pin_input.clear();
                let matched = stored.is_some_and(|stored| stored == candidate);
                if matched && self.state == GateState::Locked {
                    self.state = GateState::Authenticated;
                } else {
                    tracing::info!("PIN login rejected");
                }
            }
            Some(other) => {
                tracing::warn!("Credential read completed {} unexpectedly", other.name());
            }
            None => tracing::debug!("Discarding stale credential read"),
        }
    }

    fn pin_write_pending(&self) -> bool {
        matches!(
            self.in_flight,
            Some(InFlight {
                operation: Operation::SetPin,
                ..
            })
        )
    }

    fn credential_written(&mut self, ticket: Ticket, acknowledged: bool) {
        match self.complete(ticket) {
            Some(Operation::SetPin) if acknowledged => {
                // The old store contents no longer matter
                self.startup_probe = None;
                self.credential_found_during_write = false;
                self.state = GateState::Authenticated;
                self.pin_input.clear();
            }
            Some(Operation::SetPin) => {
                if std::mem::take(&mut self.credential_found_during_write)
                    && self.state == GateState::Unregistered
                {
                    self.state = GateState::Locked;
                }
                tracing::debug!("PIN was not stored; now {:?}", self.state);
            }
            Some(other) => {
                tracing::warn!("Credential write completed {} unexpectedly", other.name());
            }
            None => tracing::debug!("Discarding stale credential write"),
        }
    }

    fn credential_deleted(&mut self, ticket: Ticket, acknowledged: bool) {
        match self.complete(ticket) {
            Some(Operation::DestroyPin) if acknowledged => {
                self.state = GateState::Unregistered;
                self.pin_input.clear();
            }
            Some(Operation::DestroyPin) => {
                tracing::debug!("PIN was not deleted; staying {:?}", self.state);
            }
            Some(other) => {
                tracing::warn!("Credential delete completed {} unexpectedly", other.name());
            }
            None => tracing::debug!("Discarding stale credential delete"),
        }
    }

    fn biometric_completed(&mut self, ticket: Ticket, outcome: BiometricOutcome) -> Vec<GateCommand> {
        match self.complete(ticket) {
            Some(Operation::Biometric) => {
                if outcome.success {
                    if self.state == GateState::Locked {
                        self.state = GateState::Authenticated;
                        self.pin_input.clear();
                    }
                    Vec::new()
                } else if outcome.is_fallback() {
                    vec![GateCommand::FocusPinField]
                } else {
                    tracing::debug!(
                        "Biometric login failed: {}",
                        outcome
                            .error
                            .map(|e| e.as_str())
                            .unwrap_or("no reason given")
                    );
                    Vec::new()
                }
            }
            Some(other) => {
                tracing::warn!("Biometric result completed {} unexpectedly", other.name());
                Vec::new()
            }
            None => {
                tracing::debug!("Discarding stale biometric result");
                Vec::new()
            }
        }
    }
}
