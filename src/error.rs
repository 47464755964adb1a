//! Error types and handling infrastructure for tldr-pack.
//!
//! Library code returns [`PageError`] through the crate-wide [`Result`] alias; the
//! binary wraps it in `anyhow` at the very top. Every variant here is meant to end
//! up as a one-line terminal message rather than a crash.
//!
//! "Page not found" is deliberately absent: it is an ordinary lookup outcome and is
//! modelled by [`LookupResult`](crate::store::LookupResult).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tldr-pack operations.
#[derive(Error, Debug)]
pub enum PageError {
    /// File system related errors while reading or publishing the store
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The page corpus could not be downloaded or unpacked
    #[error("Fetching pages failed: {message}")]
    FetchFailed { message: String },

    /// The store ended early or contained data that does not decode
    #[error("Page store is corrupt: {message}")]
    CorruptStore { message: String },

    /// A page record cannot be represented in the store header
    #[error("Invalid page record: {message}")]
    InvalidRecord { message: String },

    /// A platform name that is not one of common, linux, osx, windows
    #[error("Unknown platform: {name}")]
    UnknownPlatform { name: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {path}: {message}")]
    ConfigError { path: PathBuf, message: String },
}

/// Standard Result type for tldr-pack operations.
pub type Result<T> = std::result::Result<T, PageError>;

impl PageError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a FetchFailed error with a descriptive message
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    /// Create a CorruptStore error with a descriptive message
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::CorruptStore {
            message: message.into(),
        }
    }

    /// Create an InvalidRecord error with a descriptive message
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    /// True for errors that mean the store on disk cannot be trusted.
    pub fn is_corrupt_store(&self) -> bool {
        matches!(self, Self::CorruptStore { .. })
    }
}

// Automatic conversion from io::Error to PageError
impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            // A decompressed stream that stops short is a truncated store, not an I/O fault
            std::io::ErrorKind::UnexpectedEof => Self::CorruptStore {
                message: format!("unexpected end of stream ({err})"),
            },
            std::io::ErrorKind::InvalidData => Self::CorruptStore {
                message: format!("undecodable data ({err})"),
            },
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
