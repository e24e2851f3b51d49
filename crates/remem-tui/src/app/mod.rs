//! Application state and event handling

mod config;
mod input;
mod state;

pub use config::{BiometricConfig, ConfigError, TuiConfig};
pub use input::{map_key, Action, MAX_PIN_INPUT};
pub use state::{AppState, Overlay};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::prelude::*;
use remem_core::{GateDriver, GateEvent, GateView, ScreenView, SecureStore, Services, UiCommand};
use tokio::sync::{mpsc, watch};

use crate::platform::{BiometricRequest, TerminalAccessibility, TerminalBiometrics};
use crate::ui::{self, Theme};

/// Application result type
pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Spinner and clock refresh rate
const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Gate and its service calls
    driver: GateDriver,

    /// Render model updates
    views: watch::Receiver<GateView>,

    /// Fingerprint prompts raised by the terminal authenticator
    prompts: mpsc::UnboundedReceiver<BiometricRequest>,

    /// Colors
    theme: Theme,
}

impl App {
    /// Create an application around the given services
    pub fn new(
        services: Services,
        prompts: mpsc::UnboundedReceiver<BiometricRequest>,
        theme: Theme,
    ) -> Self {
        let driver = GateDriver::new(services);
        let views = driver.subscribe();

        Self {
            state: AppState::new(),
            driver,
            views,
            prompts,
            theme,
        }
    }

    /// Create an application with terminal platform services
    pub fn with_config(config: &TuiConfig, store: Arc<dyn SecureStore>) -> Self {
        let (biometrics, prompts) = TerminalBiometrics::new(config.biometrics);
        let services = Services {
            store,
            biometrics: Arc::new(biometrics),
            accessibility: Arc::new(TerminalAccessibility::new(config.screen_reader)),
        };
        let theme = if config.high_contrast {
            Theme::high_contrast()
        } else {
            Theme::default()
        };

        Self::new(services, prompts, theme)
    }

    /// The gate driver
    pub fn driver(&self) -> &GateDriver {
        &self.driver
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(TICK_RATE);

        self.mount();

        let result: AppResult<()> = loop {
            if self.state.should_quit {
                break Ok(());
            }

            self.refresh_view();
            if let Err(e) = terminal.draw(|frame| ui::render(frame, &self.state, &self.theme)) {
                break Err(e.into());
            }

            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => self.state.should_quit = true,
                },
                Some(completion) = self.driver.next_completion() => {
                    let ui = self.driver.dispatch(completion);
                    self.apply_ui(ui);
                }
                Some(request) = self.prompts.recv() => {
                    tracing::debug!("Showing fingerprint prompt");
                    self.state.overlay = Some(Overlay::Fingerprint(request));
                }
                _ = ticker.tick() => {
                    self.state.tick = self.state.tick.wrapping_add(1);
                }
            }
        };

        self.unmount();
        result
    }

    /// Start the gate: reads the stored credential and probes the platform
    pub fn mount(&mut self) {
        let ui = self.driver.dispatch(GateEvent::Mounted);
        self.apply_ui(ui);
        self.refresh_view();
    }

    /// Stop the gate; late service results are ignored from here on
    pub fn unmount(&mut self) {
        self.driver.dispatch(GateEvent::Unmounted);
        // An unanswered fingerprint prompt resolves as a system cancel
        self.state.overlay = None;
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = map_key(&self.state, key) {
            self.apply(action);
        }
    }

    /// Apply a user action
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Gate(event) => {
                match event {
                    GateEvent::PinDigit(_) | GateEvent::PinBackspace => {
                        self.state.pin_focused = true;
                    }
                    GateEvent::BiometricPressed => self.state.pin_focused = false,
                    _ => {}
                }
                let ui = self.driver.dispatch(event);
                self.apply_ui(ui);
            }
            Action::OpenDestroyConfirm => {
                self.state.overlay = Some(Overlay::ConfirmDestroy);
            }
            Action::ConfirmDestroy => {
                self.state.overlay = None;
                let ui = self.driver.dispatch(GateEvent::DestroyPressed);
                self.apply_ui(ui);
            }
            Action::CloseOverlay => {
                self.state.overlay = None;
            }
            Action::AnswerFingerprint(outcome) => {
                if let Some(Overlay::Fingerprint(request)) = self.state.overlay.take() {
                    tracing::debug!("Fingerprint prompt answered: success={}", outcome.success);
                    request.answer(outcome);
                }
            }
            Action::Quit => {
                self.state.should_quit = true;
            }
        }
        self.refresh_view();
    }

    /// Dispatch completions until every service call has finished
    pub async fn settle(&mut self) {
        let ui = self.driver.settle().await;
        self.apply_ui(ui);
        self.refresh_view();
    }

    fn apply_ui(&mut self, commands: Vec<UiCommand>) {
        for command in commands {
            match command {
                UiCommand::FocusPinField => {
                    tracing::debug!("Focusing PIN field");
                    self.state.pin_focused = true;
                }
            }
        }
    }

    fn refresh_view(&mut self) {
        if self.views.has_changed().unwrap_or(false) {
            self.state.view = self.views.borrow_and_update().clone();
        }
        if matches!(self.state.overlay, Some(Overlay::ConfirmDestroy))
            && !matches!(self.state.view.screen, ScreenView::Notes { .. })
        {
            self.state.overlay = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use remem_core::services::{MemorySecureStore, StaticAccessibility, StaticBiometrics};
    use remem_core::{BiometricError, BiometricOutcome, GateState, PIN_STORE_KEY};

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn static_app(store: MemorySecureStore, biometrics: StaticBiometrics) -> App {
        let (_tx, prompts) = mpsc::unbounded_channel();
        let services = Services::new(store, biometrics, StaticAccessibility::new(false));
        App::new(services, prompts, Theme::default())
    }

    #[tokio::test]
    async fn test_register_from_keyboard() {
        let store = Arc::new(MemorySecureStore::new());
        let mut app = App::with_config(&TuiConfig::default(), store.clone());
        app.mount();
        app.settle().await;
        assert_eq!(app.state.view.title(), "Welcome new user!");

        type_keys(&mut app, "1234");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.driver().pending(), 0);

        type_keys(&mut app, "5");
        press(&mut app, KeyCode::Enter);
        app.settle().await;

        assert_eq!(app.state.view.title(), "Your notes:");
        assert_eq!(
            store.get(PIN_STORE_KEY).await.unwrap(),
            Some("12345".to_string())
        );
    }

    #[tokio::test]
    async fn test_destroy_requires_confirmation() {
        let mut app = static_app(
            MemorySecureStore::with_entry(PIN_STORE_KEY, "98765"),
            StaticBiometrics::unavailable(),
        );
        app.mount();
        app.settle().await;
        type_keys(&mut app, "98765");
        press(&mut app, KeyCode::Enter);
        app.settle().await;
        assert_eq!(app.driver().gate().state(), GateState::Authenticated);

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.state.overlay, Some(Overlay::ConfirmDestroy)));
        press(&mut app, KeyCode::Char('n'));
        assert!(app.state.overlay.is_none());
        assert_eq!(app.driver().pending(), 0);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        app.settle().await;
        assert_eq!(app.driver().gate().state(), GateState::Unregistered);
        assert_eq!(app.state.view.title(), "Welcome new user!");
    }

    #[tokio::test]
    async fn test_fallback_focuses_pin_field() {
        let mut app = static_app(
            MemorySecureStore::with_entry(PIN_STORE_KEY, "98765"),
            StaticBiometrics::new(BiometricOutcome::failure(BiometricError::UserFallback)),
        );
        app.mount();
        app.settle().await;

        press(&mut app, KeyCode::Char('f'));
        assert!(!app.state.pin_focused);
        app.settle().await;

        assert!(app.state.pin_focused);
        assert_eq!(app.driver().gate().state(), GateState::Locked);
    }

    #[tokio::test]
    async fn test_fingerprint_prompt_round_trip() {
        let store = Arc::new(MemorySecureStore::with_entry(PIN_STORE_KEY, "98765"));
        let mut app = App::with_config(&TuiConfig::default(), store);
        app.mount();
        app.settle().await;

        press(&mut app, KeyCode::Char('f'));
        let request = app.prompts.recv().await.unwrap();
        assert_eq!(request.prompt, remem_core::BIOMETRIC_PROMPT);
        app.state.overlay = Some(Overlay::Fingerprint(request));

        press(&mut app, KeyCode::Enter);
        assert!(app.state.overlay.is_none());
        app.settle().await;
        assert_eq!(app.state.view.title(), "Your notes:");
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = static_app(MemorySecureStore::new(), StaticBiometrics::unavailable());
        app.mount();
        app.settle().await;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.state.should_quit);
    }
}
