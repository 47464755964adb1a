//! Terminal rendering of page bodies.
//!
//! [`PageRenderer`] recolors raw page text in one forward scan and writes the
//! result into a [`StyledSink`]; [`PageTheme`] supplies the styles.

pub mod page;
pub mod sink;
pub mod theme;

pub use page::{PageRenderer, RenderState, TitleMode};
pub use sink::{AnsiSink, SpanCollector, StyledSink};
pub use theme::PageTheme;
