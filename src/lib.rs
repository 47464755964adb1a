//! # tldr-pack - Offline tldr-pages Viewer
//!
//! Packs the tldr-pages corpus into a single Brotli-compressed store file and
//! renders individual pages to the terminal with lightweight highlighting.
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`store`] - Record model, store writer, and streaming store reader
//! - [`source`] - Page corpus download and local directory sources
//! - [`render`] - Single-pass Markdown-to-terminal renderer
//! - [`config`] - Runtime settings
//! - [`app`] - One invocation from store build to rendered output

// Core modules
pub mod error;
pub mod store;

pub mod config;
pub mod render;
pub mod source;

pub mod app;

// Re-export commonly used types for convenience
pub use error::{PageError, Result};

pub use app::{Application, Command, Completion};
pub use config::Settings;
pub use render::{PageRenderer, PageTheme, TitleMode};
pub use store::{LookupResult, PageRecord, Platform, StoreReader, StoreWriter};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
