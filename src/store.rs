//! Page store: many small pages packed into one Brotli-compressed file.
//!
//! After decompression the file is a length-prefixed index header followed by
//! every page body as a length-prefixed string:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ header: "<name> <platform> <skip>," * N              │
//! ├──────────────────────────────────────────────────────┤
//! │ body 0 │ body 1 │ ...                     │ body N-1 │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! `skip` is the ordinal of a body in the stream, not a byte offset.

pub mod codec;
pub mod header;
pub mod reader;
pub mod record;
pub mod writer;

pub use reader::{FoundPage, LookupResult, StoreReader};
pub use record::{IndexEntry, PageRecord, Platform};
pub use writer::{BuildOutcome, StorePlan, StoreWriter};
