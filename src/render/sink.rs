//! Destinations for styled characters.
//!
//! The page renderer never talks to the terminal directly; it pushes
//! `(char, Style)` pairs into a [`StyledSink`]. [`AnsiSink`] turns them into
//! crossterm escape sequences, [`SpanCollector`] keeps them as ratatui spans.

use ratatui::crossterm::queue;
use ratatui::crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor,
};
use ratatui::style::{Modifier, Style};
use std::io::{self, Write};

/// Receiver of rendered output
pub trait StyledSink {
    /// Emit one character in `style`
    fn put(&mut self, ch: char, style: Style) -> io::Result<()>;

    /// Emit a whole string in one style
    fn put_str(&mut self, text: &str, style: Style) -> io::Result<()> {
        for ch in text.chars() {
            self.put(ch, style)?;
        }
        Ok(())
    }

    /// Restore any pending terminal state and flush
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes styled characters to a byte stream as ANSI escape sequences.
///
/// Escapes are only emitted when the style changes, so a monochrome theme
/// produces plain text.
pub struct AnsiSink<W: Write> {
    out: W,
    current: Style,
}

impl<W: Write> AnsiSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current: Style::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn apply(&mut self, style: Style) -> io::Result<()> {
        if self.current != Style::default() {
            queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        }
        if let Some(fg) = style.fg {
            queue!(self.out, SetForegroundColor(TermColor::from(fg)))?;
        }
        if style.add_modifier.contains(Modifier::BOLD) {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        self.current = style;
        Ok(())
    }
}

impl<W: Write> StyledSink for AnsiSink<W> {
    fn put(&mut self, ch: char, style: Style) -> io::Result<()> {
        if style != self.current {
            self.apply(style)?;
        }
        queue!(self.out, Print(ch))
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.current != Style::default() {
            self.apply(Style::default())?;
        }
        self.out.flush()
    }
}

/// Collects output as runs of identically styled text
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpanCollector {
    runs: Vec<(String, Style)>,
}

impl SpanCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Styled runs in output order; adjacent characters of equal style are merged
    pub fn runs(&self) -> &[(String, Style)] {
        &self.runs
    }

    /// Output text with all styling dropped
    pub fn plain(&self) -> String {
        self.runs.iter().map(|(text, _)| text.as_str()).collect()
    }

    /// Style of every output character, in order
    pub fn styled_chars(&self) -> Vec<(char, Style)> {
        self.runs
            .iter()
            .flat_map(|(text, style)| text.chars().map(move |ch| (ch, *style)))
            .collect()
    }
}

impl StyledSink for SpanCollector {
    fn put(&mut self, ch: char, style: Style) -> io::Result<()> {
        match self.runs.last_mut() {
            Some((text, last)) if *last == style => text.push(ch),
            _ => self.runs.push((ch.to_string(), style)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_collector_merges_runs() {
        let red = Style::default().fg(Color::Red);
        let mut sink = SpanCollector::new();
        sink.put_str("ab", Style::default()).unwrap();
        sink.put('c', Style::default()).unwrap();
        sink.put_str("<>", red).unwrap();

        assert_eq!(
            sink.runs(),
            &[
                ("abc".to_string(), Style::default()),
                ("<>".to_string(), red)
            ]
        );
        assert_eq!(sink.plain(), "abc<>");
    }

    #[test]
    fn test_ansi_sink_plain_for_default_style() {
        let mut sink = AnsiSink::new(Vec::new());
        sink.put_str("plain text\n", Style::default()).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.into_inner(), b"plain text\n");
    }

    #[test]
    fn test_ansi_sink_resets_after_colored_run() {
        let mut sink = AnsiSink::new(Vec::new());
        sink.put('x', Style::default().fg(Color::Red)).unwrap();
        sink.put('y', Style::default()).unwrap();
        sink.finish().unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("\u{1b}["));
        assert!(output.contains('x'));
        assert!(output.ends_with('y'));
        assert!(output.contains("\u{1b}[0m"));
    }
}
