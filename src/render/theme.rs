//! Color theme for rendered pages, using ratatui styles
//!
//! Each field styles one kind of character the page renderer distinguishes.

use ratatui::style::{Color, Modifier, Style};

/// Styles applied while rendering a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTheme {
    /// Ordinary text (default style uses the terminal's colors)
    pub normal: Style,

    /// Title line of a page
    pub title: Style,

    /// Backtick-delimited code spans, backticks included
    pub code: Style,

    /// `<` and `>` placeholder brackets
    pub placeholder: Style,

    /// Text inside a `#` heading toggle
    pub heading: Style,

    /// Highlighted parts of status messages ("not found", listings)
    pub notice: Style,
}

impl Default for PageTheme {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            title: Style::default().fg(Color::LightYellow),
            code: Style::default().fg(Color::Blue),
            placeholder: Style::default().fg(Color::LightRed),
            heading: Style::default()
                .fg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            notice: Style::default().fg(Color::LightYellow),
        }
    }
}

impl PageTheme {
    /// Theme for terminals without color support; emits no styling at all
    pub fn monochrome() -> Self {
        Self {
            normal: Style::default(),
            title: Style::default(),
            code: Style::default(),
            placeholder: Style::default(),
            heading: Style::default(),
            notice: Style::default(),
        }
    }
}
