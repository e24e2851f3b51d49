//! Visual theme and color palette

use ratatui::style::{Color, Modifier, Style};

/// reMem color palette
#[derive(Debug, Clone)]
pub struct Theme {
    // Branding colors
    pub remem_teal: Color,

    // Status colors
    pub danger: Color,

    // UI element colors
    pub border: Color,
    pub border_focused: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub button: Color,
    pub button_disabled: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            remem_teal: Color::Rgb(0, 150, 136), // #009688

            danger: Color::Rgb(244, 67, 54), // #F44336

            border: Color::Rgb(84, 110, 122),          // #546E7A
            border_focused: Color::Rgb(0, 150, 136),   // #009688
            text_primary: Color::Rgb(250, 250, 250),   // #FAFAFA
            text_secondary: Color::Rgb(176, 190, 197), // #B0BEC5
            text_muted: Color::Rgb(120, 144, 156),     // #78909C
            button: Color::Rgb(0, 121, 107),           // #00796B
            button_disabled: Color::Rgb(69, 90, 100),  // #455A64
        }
    }
}

impl Theme {
    /// Get default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    /// Get secondary text style
    pub fn text_secondary(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    /// Get muted text style
    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.remem_teal)
            .add_modifier(Modifier::BOLD)
    }

    /// Get border style
    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get focused border style
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    /// Get danger style
    pub fn danger(&self) -> Style {
        Style::default()
            .fg(self.danger)
            .add_modifier(Modifier::BOLD)
    }

    /// Get button style
    pub fn button(&self, enabled: bool) -> Style {
        if enabled {
            Style::default()
                .fg(self.text_primary)
                .bg(self.button)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.text_muted)
                .bg(self.button_disabled)
        }
    }

    /// Get PIN dot style
    pub fn pin_dot(&self) -> Style {
        Style::default()
            .fg(self.remem_teal)
            .add_modifier(Modifier::BOLD)
    }

    /// Get PIN placeholder style
    pub fn pin_placeholder(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Create a high-contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            text_primary: Color::White,
            text_secondary: Color::White,
            text_muted: Color::Gray,
            border: Color::White,
            border_focused: Color::Yellow,
            button: Color::Blue,
            button_disabled: Color::DarkGray,
            ..Self::default()
        }
    }
}
