//! Length-prefixed string encoding used inside the decompressed store.
//!
//! Each string is its UTF-8 byte length as an unsigned LEB128 varint (at most
//! five bytes, so lengths fit a `u32`) followed by the bytes themselves.

use crate::error::{PageError, Result};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Upper bound on a single decoded string; anything larger is treated as corruption
pub const MAX_STRING_LEN: u32 = 16 * 1024 * 1024;

/// Maximum bytes in a u32 varint
const MAX_VARINT_BYTES: usize = 5;

/// Append `value` as an unsigned LEB128 varint
pub fn encode_varint(mut value: u32, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        }
        buf.push(byte | 0x80);
    }
}

/// Append a length-prefixed string
pub fn write_string(value: &str, buf: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(value.len())
        .ok()
        .filter(|len| *len <= MAX_STRING_LEN)
        .ok_or_else(|| {
            PageError::invalid_record(format!("string of {} bytes is too large", value.len()))
        })?;
    encode_varint(len, buf);
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Read a varint length prefix from the stream
pub async fn read_length<R>(reader: &mut R) -> Result<u32>
where
    R: AsyncRead + Unpin,
{
    let mut result: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let byte = reader.read_u8().await?;
        let bits = u32::from(byte & 0x7F);
        if i == MAX_VARINT_BYTES - 1 && bits > 0x0F {
            return Err(PageError::corrupt("length prefix overflows u32"));
        }
        result |= bits << (7 * i);
        if byte & 0x80 == 0 {
            if result > MAX_STRING_LEN {
                return Err(PageError::corrupt(format!(
                    "declared string length {result} exceeds limit"
                )));
            }
            return Ok(result);
        }
    }
    Err(PageError::corrupt("length prefix is longer than five bytes"))
}

/// Read one length-prefixed string
pub async fn read_string<R>(reader: &mut R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let len = read_length(reader).await?;
    let mut bytes = vec![0u8; len as usize];
    reader.read_exact(&mut bytes).await?;
    String::from_utf8(bytes).map_err(|e| PageError::corrupt(format!("string is not UTF-8: {e}")))
}

/// Consume one length-prefixed string without keeping it
pub async fn skip_string<R>(reader: &mut R) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let len = u64::from(read_length(reader).await?);
    let copied = tokio::io::copy(&mut reader.take(len), &mut tokio::io::sink()).await?;
    if copied != len {
        return Err(PageError::corrupt(format!(
            "body truncated after {copied} of {len} bytes"
        )));
    }
    Ok(())
}
