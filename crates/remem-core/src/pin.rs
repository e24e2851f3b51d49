//! PIN input buffer

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

use crate::MIN_PIN_LENGTH;

/// A PIN as typed by the user
///
/// The buffer is wiped when cleared or dropped and never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Pin(Zeroizing<String>);

impl Pin {
    /// Wrap a PIN string
    pub fn new(pin: impl Into<String>) -> Self {
        Self(Zeroizing::new(pin.into()))
    }

    /// Borrow the PIN text
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether nothing has been typed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the PIN is long enough to be submitted
    pub fn meets_minimum(&self) -> bool {
        self.len() >= MIN_PIN_LENGTH
    }

    /// Append a character
    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    /// Remove the last character
    pub fn pop(&mut self) {
        self.0.pop();
    }

    /// Wipe the buffer
    pub fn clear(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pin({} chars)", self.len())
    }
}

impl From<&str> for Pin {
    fn from(pin: &str) -> Self {
        Self::new(pin)
    }
}

impl From<String> for Pin {
    fn from(pin: String) -> Self {
        Self::new(pin)
    }
}
