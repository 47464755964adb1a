//! Single-pass page renderer.
//!
//! The page text is scanned left to right exactly once. A handful of flags in
//! [`RenderState`] decide the style of each character; there is no parse tree
//! and no lookahead beyond one character (for `:` followed by a newline).
//!
//! | input        | effect                                              |
//! |--------------|-----------------------------------------------------|
//! | `\n`         | ends the title line                                 |
//! | `` ` ``      | toggles code style, emitted in code style           |
//! | `<` `>`      | emitted in placeholder style                        |
//! | `{` `}`      | dropped; the text between them is kept              |
//! | `:` + `\n`   | emitted as a lone `:`                               |
//! | `#`          | toggles heading style ([`TitleMode::HeadingToggle`]) |

use crate::render::sink::{SpanCollector, StyledSink};
use crate::render::theme::PageTheme;
use ratatui::style::Style;
use std::io;

/// How the page title is emphasized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMode {
    /// Everything before the first newline is drawn in the title style
    #[default]
    FirstLine,
    /// Each `#` toggles heading style; a newline ends the heading
    HeadingToggle,
}

/// Per-render mode flags, discarded after one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub first_line: bool,
    pub in_code: bool,
    pub in_heading: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            first_line: true,
            in_code: false,
            in_heading: false,
        }
    }
}

/// Renders page bodies through a [`StyledSink`]
#[derive(Debug, Clone, Default)]
pub struct PageRenderer {
    theme: PageTheme,
    mode: TitleMode,
}

impl PageRenderer {
    pub fn new(theme: PageTheme) -> Self {
        Self {
            theme,
            mode: TitleMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: TitleMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn theme(&self) -> &PageTheme {
        &self.theme
    }

    /// Style for an ordinary character in `state`
    fn text_style(&self, state: &RenderState) -> Style {
        match self.mode {
            TitleMode::FirstLine if state.first_line => self.theme.title,
            TitleMode::HeadingToggle if state.in_heading => self.theme.heading,
            _ if state.in_code => self.theme.code,
            _ => self.theme.normal,
        }
    }

    /// Render `body` followed by exactly one newline.
    pub fn render<S: StyledSink + ?Sized>(&self, body: &str, sink: &mut S) -> io::Result<()> {
        let mut state = RenderState::default();
        let mut chars = body.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\n' => {
                    state.first_line = false;
                    state.in_heading = false;
                    sink.put('\n', self.theme.normal)?;
                }
                ':' => {
                    sink.put(':', self.text_style(&state))?;
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                        state.first_line = false;
                        state.in_heading = false;
                    }
                }
                '<' | '>' => sink.put(ch, self.theme.placeholder)?,
                '`' => {
                    state.in_code = !state.in_code;
                    sink.put('`', self.theme.code)?;
                }
                '{' | '}' => {}
                '#' if self.mode == TitleMode::HeadingToggle => {
                    state.in_heading = !state.in_heading;
                    sink.put('#', self.theme.heading)?;
                }
                _ => sink.put(ch, self.text_style(&state))?,
            }
        }

        sink.put('\n', self.theme.normal)?;
        sink.finish()
    }

    /// Render into a [`SpanCollector`]
    pub fn render_spans(&self, body: &str) -> io::Result<SpanCollector> {
        let mut collector = SpanCollector::new();
        self.render(body, &mut collector)?;
        Ok(collector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PageRenderer {
        PageRenderer::new(PageTheme::default())
    }

    #[test]
    fn test_first_line_uses_title_style() {
        let theme = PageTheme::default();
        let out = renderer().render_spans("# tar\nbody").unwrap();
        assert_eq!(
            out.runs(),
            &[
                ("# tar".to_string(), theme.title),
                ("\nbody\n".to_string(), theme.normal),
            ]
        );
    }

    #[test]
    fn test_backticks_toggle_code_style() {
        let theme = PageTheme::default();
        let out = renderer().render_spans("t\na`b`c").unwrap();
        let styled = out.styled_chars();

        // skip "t\n"
        assert_eq!(
            &styled[2..7],
            &[
                ('a', theme.normal),
                ('`', theme.code),
                ('b', theme.code),
                ('`', theme.code),
                ('c', theme.normal),
            ]
        );
    }

    #[test]
    fn test_braces_are_elided_but_content_kept() {
        let out = renderer().render_spans("t\nfoo {bar} baz").unwrap();
        assert_eq!(out.plain(), "t\nfoo bar baz\n");
    }

    #[test]
    fn test_colon_newline_collapses() {
        let out = renderer().render_spans("t\nNote:\nmore").unwrap();
        assert_eq!(out.plain(), "t\nNote:more\n");

        let out = renderer().render_spans("t\n- List files:\n\n`ls`").unwrap();
        assert_eq!(out.plain(), "t\n- List files:\n`ls`\n");

        let out = renderer().render_spans("t\nratio 1:2").unwrap();
        assert_eq!(out.plain(), "t\nratio 1:2\n");
    }

    #[test]
    fn test_placeholders_keep_code_state() {
        let theme = PageTheme::default();
        let out = renderer().render_spans("t\n`cp <src> x`").unwrap();
        let styled = out.styled_chars();
        let find = |c: char| styled.iter().find(|(ch, _)| *ch == c).unwrap().1;

        assert_eq!(find('<'), theme.placeholder);
        assert_eq!(find('>'), theme.placeholder);
        assert_eq!(find('s'), theme.code);
        assert_eq!(find('x'), theme.code);
    }

    #[test]
    fn test_exactly_one_trailing_newline() {
        assert_eq!(renderer().render_spans("").unwrap().plain(), "\n");
        assert_eq!(renderer().render_spans("x\n").unwrap().plain(), "x\n\n");
    }

    #[test]
    fn test_heading_toggle_mode() {
        let theme = PageTheme::default();
        let out = renderer()
            .with_mode(TitleMode::HeadingToggle)
            .render_spans("# tar\nplain")
            .unwrap();
        assert_eq!(
            out.runs(),
            &[
                ("# tar".to_string(), theme.heading),
                ("\nplain\n".to_string(), theme.normal),
            ]
        );

        // '#' is ordinary text in first-line mode
        let out = renderer().render_spans("t\na # b").unwrap();
        assert!(out
            .styled_chars()
            .iter()
            .all(|(ch, style)| *ch != '#' || *style == theme.normal));
    }

    #[test]
    fn test_realistic_page() {
        let page = "# tar\n\n> Archiving utility.\n\n- Create an archive:\n\n`tar cf {{target.tar}} {{file1}}`\n";
        let out = PageRenderer::new(PageTheme::monochrome())
            .render_spans(page)
            .unwrap();
        assert_eq!(
            out.plain(),
            "# tar\n\n> Archiving utility.\n\n- Create an archive:\n`tar cf target.tar file1`\n\n"
        );
    }
}
