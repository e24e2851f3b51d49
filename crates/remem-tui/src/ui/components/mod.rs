//! Reusable UI components

pub mod banner;
pub mod button;
pub mod confirm;
pub mod fingerprint;
pub mod pin_field;
