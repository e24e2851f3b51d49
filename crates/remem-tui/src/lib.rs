//! reMem TUI Library
//!
//! Terminal front-end for the reMem access gate: registration, login and
//! notes screens drawn with ratatui, plus terminal stand-ins for the
//! fingerprint reader and screen reader detection.

pub mod app;
pub mod platform;
pub mod ui;

pub use app::App;
