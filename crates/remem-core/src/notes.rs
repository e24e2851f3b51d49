//! Static note list shown once the gate is open

/// A single note
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    /// Note body
    pub text: &'static str,
    /// Who wrote it
    pub author: &'static str,
}

impl Note {
    /// Label read out by screen readers
    pub fn accessibility_label(&self) -> String {
        format!("Note: {} Author: {}", self.text, self.author)
    }
}

/// The notes behind the gate
pub const NOTES: [Note; 3] = [
    Note {
        text: "Be yourself; everyone else is already taken.",
        author: "Oscar Wilde",
    },
    Note {
        text: "Nothing is impossible, the word itself says \"I'm possible\"!",
        author: "Audrey Hepburn",
    },
    Note {
        text: "Fantasy is hardly an escape from reality. It's a way of understanding it.",
        author: "Lloyd Alexander",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessibility_label() {
        let note = NOTES[0];
        assert_eq!(
            note.accessibility_label(),
            "Note: Be yourself; everyone else is already taken. Author: Oscar Wilde"
        );
    }
}
