//! Index header: `"<name> <platform> <skip>,"` repeated once per body.

use crate::error::{PageError, Result};
use crate::store::record::{IndexEntry, Platform};

/// Serialize index entries into the header string (trailing comma included)
pub fn encode_header(entries: &[IndexEntry]) -> String {
    let mut header = String::new();
    for entry in entries {
        header.push_str(&entry.name);
        header.push(' ');
        header.push_str(entry.platform.as_str());
        header.push(' ');
        header.push_str(&entry.skip.to_string());
        header.push(',');
    }
    header
}

/// Parse a header string back into entries, in header order
pub fn parse_header(header: &str) -> Result<Vec<IndexEntry>> {
    header
        .split(',')
        .filter(|chunk| !chunk.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(chunk: &str) -> Result<IndexEntry> {
    let mut fields = chunk.split(' ');
    let (Some(name), Some(platform), Some(skip), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(PageError::corrupt(format!("malformed header entry '{chunk}'")));
    };

    if name.is_empty() {
        return Err(PageError::corrupt("header entry with empty name"));
    }
    let platform = Platform::parse(platform)
        .map_err(|_| PageError::corrupt(format!("unknown platform in header entry '{chunk}'")))?;
    let skip = skip
        .parse::<u32>()
        .map_err(|_| PageError::corrupt(format!("bad skip count in header entry '{chunk}'")))?;

    Ok(IndexEntry {
        name: name.to_string(),
        platform,
        skip,
    })
}
