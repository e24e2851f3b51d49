//! Tokio driver for the access gate
//!
//! The driver is the only place where the gate's commands meet the platform
//! services. Each service call runs in its own task; its result comes back
//! through an inbox channel and is fed to the gate by whoever owns the
//! driver, so the gate is only ever mutated from one place.
//!
//! Renderers subscribe to a `watch` channel of [`GateView`]s and receive a
//! new view whenever the gate changes.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::gate::{AccessGate, GateCommand, GateEvent};
use crate::pin::Pin;
use crate::services::{AccessibilityProbe, BiometricAuthenticator, SecureStore};
use crate::view::GateView;
use crate::PIN_STORE_KEY;

/// Commands for the front-end that need no service call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    /// Move input focus to the PIN field
    FocusPinField,
}

/// Platform services used by the gate
#[derive(Clone)]
pub struct Services {
    /// Where the PIN is kept
    pub store: Arc<dyn SecureStore>,
    /// Fingerprint reader
    pub biometrics: Arc<dyn BiometricAuthenticator>,
    /// Screen reader detection
    pub accessibility: Arc<dyn AccessibilityProbe>,
}

impl Services {
    /// Bundle service implementations
    pub fn new(
        store: impl SecureStore + 'static,
        biometrics: impl BiometricAuthenticator + 'static,
        accessibility: impl AccessibilityProbe + 'static,
    ) -> Self {
        Self {
            store: Arc::new(store),
            biometrics: Arc::new(biometrics),
            accessibility: Arc::new(accessibility),
        }
    }
}

/// Owns an [`AccessGate`] and executes its commands
pub struct GateDriver {
    /// The state machine
    gate: AccessGate,
    /// Platform services
    services: Services,
    /// Sender cloned into every service task
    inbox_tx: mpsc::UnboundedSender<GateEvent>,
    /// Completed service calls
    inbox_rx: mpsc::UnboundedReceiver<GateEvent>,
    /// Latest render model
    view_tx: watch::Sender<GateView>,
    /// Service tasks whose completion has not been dispatched yet
    pending: usize,
}

impl GateDriver {
    /// Create a driver around an unmounted gate
    pub fn new(services: Services) -> Self {
        let gate = AccessGate::new();
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(GateView::from(&gate));

        Self {
            gate,
            services,
            inbox_tx,
            inbox_rx,
            view_tx,
            pending: 0,
        }
    }

    /// The gate being driven
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Current render model
    pub fn view(&self) -> GateView {
        self.view_tx.borrow().clone()
    }

    /// Subscribe to render model updates
    pub fn subscribe(&self) -> watch::Receiver<GateView> {
        self.view_tx.subscribe()
    }

    /// Number of service calls still running
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Feed one event to the gate and start the service calls it asks for
    ///
    /// Returns the UI commands the front-end should apply.
    pub fn dispatch(&mut self, event: GateEvent) -> Vec<UiCommand> {
        if event.is_completion() {
            self.pending = self.pending.saturating_sub(1);
        }

        let ui = self
            .gate
            .update(event)
            .into_iter()
            .filter_map(|command| self.execute(command))
            .collect();

        self.publish();
        ui
    }

    /// Wait for the next completed service call
    ///
    /// The returned event must be passed to [`dispatch`](Self::dispatch).
    pub async fn next_completion(&mut self) -> Option<GateEvent> {
        self.inbox_rx.recv().await
    }

    /// Dispatch completions until no service call is running
    pub async fn settle(&mut self) -> Vec<UiCommand> {
        let mut ui = Vec::new();
        while self.pending > 0 {
            match self.inbox_rx.recv().await {
                Some(event) => ui.extend(self.dispatch(event)),
                None => break,
            }
        }
        ui
    }

    fn publish(&self) {
        let view = GateView::from(&self.gate);
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }

    fn execute(&mut self, command: GateCommand) -> Option<UiCommand> {
        match command {
            GateCommand::ReadCredential { ticket } => {
                let store = Arc::clone(&self.services.store);
                self.spawn(async move {
                    let value = match store.get(PIN_STORE_KEY).await {
                        Ok(value) => value.map(Pin::from),
                        Err(e) => {
                            tracing::warn!("Credential read failed, treating as unset: {}", e);
                            None
                        }
                    };
                    GateEvent::CredentialRead { ticket, value }
                });
            }
            GateCommand::WriteCredential { ticket, pin } => {
                let store = Arc::clone(&self.services.store);
                self.spawn(async move {
                    let acknowledged = match store.set(PIN_STORE_KEY, pin.as_str()).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!("Credential write failed: {}", e);
                            false
                        }
                    };
                    GateEvent::CredentialWritten {
                        ticket,
                        acknowledged,
                    }
                });
            }
            GateCommand::DeleteCredential { ticket } => {
                let store = Arc::clone(&self.services.store);
                self.spawn(async move {
                    let acknowledged = match store.delete(PIN_STORE_KEY).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!("Credential delete failed: {}", e);
                            false
                        }
                    };
                    GateEvent::CredentialDeleted {
                        ticket,
                        acknowledged,
                    }
                });
            }
            GateCommand::Authenticate { ticket, prompt } => {
                let biometrics = Arc::clone(&self.services.biometrics);
                self.spawn(async move {
                    let outcome = biometrics.authenticate(prompt).await;
                    GateEvent::BiometricCompleted { ticket, outcome }
                });
            }
            GateCommand::ProbeCapabilities { ticket } => {
                let biometrics = Arc::clone(&self.services.biometrics);
                self.spawn(async move {
                    let hardware = biometrics.has_hardware().await;
                    let enrolled = biometrics.is_enrolled().await;
                    GateEvent::CapabilitiesProbed {
                        ticket,
                        hardware,
                        enrolled,
                    }
                });
            }
            GateCommand::ProbeAccessibility { ticket } => {
                let accessibility = Arc::clone(&self.services.accessibility);
                self.spawn(async move {
                    let screen_reader = accessibility.screen_reader_enabled().await;
                    GateEvent::AccessibilityProbed {
                        ticket,
                        screen_reader,
                    }
                });
            }
            GateCommand::FocusPinField => return Some(UiCommand::FocusPinField),
        }
        None
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = GateEvent> + Send + 'static,
    {
        self.pending += 1;
        let inbox = self.inbox_tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            if inbox.send(event).is_err() {
                tracing::debug!("Gate driver dropped before a service call finished");
            }
        });
    }
}
