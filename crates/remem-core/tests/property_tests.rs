//! Property-based tests for the access gate using proptest

use proptest::prelude::*;
use remem_core::services::{MemorySecureStore, StaticAccessibility, StaticBiometrics};
use remem_core::{
    AccessGate, GateDriver, GateEvent, GateState, Pin, SecureStore, Services, PIN_STORE_KEY,
};

// ============================================
// Helpers
// ============================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Mounted gate whose startup probes are still outstanding
fn fresh_gate() -> AccessGate {
    let mut gate = AccessGate::new();
    gate.update(GateEvent::Mounted);
    gate
}

/// Mounted gate whose startup read found a stored PIN
fn locked_gate() -> AccessGate {
    let mut gate = AccessGate::new();
    let commands = gate.update(GateEvent::Mounted);
    let ticket = commands[0].ticket().unwrap();
    gate.update(GateEvent::CredentialRead {
        ticket,
        value: Some(Pin::from("98765")),
    });
    assert_eq!(gate.state(), GateState::Locked);
    gate
}

// ============================================
// Property Tests
// ============================================

proptest! {
    #[test]
    fn stored_pin_reads_back(pin in "[0-9]{5,12}") {
        let stored = runtime().block_on(async {
            let store = std::sync::Arc::new(MemorySecureStore::new());
            let services = Services {
                store: store.clone(),
                biometrics: std::sync::Arc::new(StaticBiometrics::unavailable()),
                accessibility: std::sync::Arc::new(StaticAccessibility::default()),
            };
            let mut driver = GateDriver::new(services);
            driver.dispatch(GateEvent::Mounted);
            driver.settle().await;

            driver.dispatch(GateEvent::PinChanged(Pin::from(pin.as_str())));
            driver.dispatch(GateEvent::SetPinPressed);
            driver.settle().await;

            assert_eq!(driver.gate().state(), GateState::Authenticated);
            store.get(PIN_STORE_KEY).await.unwrap()
        });
        prop_assert_eq!(stored, Some(pin));
    }

    #[test]
    fn short_pins_cannot_register(pin in "[0-9]{0,4}") {
        let mut gate = fresh_gate();
        gate.update(GateEvent::PinChanged(Pin::from(pin.as_str())));
        prop_assert!(!gate.can_submit());
        prop_assert!(gate.update(GateEvent::SetPinPressed).is_empty());
        prop_assert_eq!(gate.state(), GateState::Unregistered);
    }

    #[test]
    fn short_pins_cannot_log_in(pin in "[0-9]{0,4}") {
        let mut gate = locked_gate();
        gate.update(GateEvent::PinChanged(Pin::from(pin.as_str())));
        prop_assert!(!gate.can_submit());
        prop_assert!(gate.update(GateEvent::LoginPressed).is_empty());
        prop_assert_eq!(gate.state(), GateState::Locked);
        prop_assert!(!gate.is_busy());
    }

    #[test]
    fn minimum_counts_characters(pin in "\\PC{5,16}") {
        let mut gate = fresh_gate();
        gate.update(GateEvent::PinChanged(Pin::from(pin.as_str())));
        prop_assert!(gate.can_submit());
    }

    #[test]
    fn only_exact_pin_unlocks(stored in "[0-9]{5,8}", typed in "[0-9]{5,8}") {
        let state = runtime().block_on(async {
            let services = Services::new(
                MemorySecureStore::with_entry(PIN_STORE_KEY, &stored),
                StaticBiometrics::unavailable(),
                StaticAccessibility::default(),
            );
            let mut driver = GateDriver::new(services);
            driver.dispatch(GateEvent::Mounted);
            driver.settle().await;

            driver.dispatch(GateEvent::PinChanged(Pin::from(typed.as_str())));
            driver.dispatch(GateEvent::LoginPressed);
            driver.settle().await;

            assert!(driver.gate().pin_input().is_empty());
            driver.gate().state()
        });

        if stored == typed {
            prop_assert_eq!(state, GateState::Authenticated);
        } else {
            prop_assert_eq!(state, GateState::Locked);
        }
    }
}
