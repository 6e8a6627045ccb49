//! The string escaper (C3): emits JSON-escaped UTF-8 through a
//! [`JsonSink`], batching output in a fixed work buffer so large strings
//! never require an allocation proportional to their length.

use crate::error::JsonError;
use crate::sink::JsonSink;

/// Size of the escaper's internal work buffer. Chosen so that even a string
/// made entirely of two-byte escapes is chunked well before the buffer
/// could be asked to hold more than it can.
const WORK_BUF_LEN: usize = 512;

/// Map a byte to its short escape sequence, if RFC 8259 defines one.
/// Returns `None` for bytes that are emitted verbatim.
fn short_escape(b: u8) -> Option<&'static [u8; 2]> {
    match b {
        b'"' => Some(b"\\\""),
        b'\\' => Some(b"\\\\"),
        0x08 => Some(b"\\b"),
        0x0C => Some(b"\\f"),
        b'\n' => Some(b"\\n"),
        b'\r' => Some(b"\\r"),
        b'\t' => Some(b"\\t"),
        _ => None,
    }
}

/// Write `bytes`, JSON-escaped, to `sink` without the surrounding quotes.
///
/// Control bytes below `0x20` that have no short escape are rejected with
/// [`JsonError::InvalidCharacter`] rather than emitted as `\u00XX` — the
/// codec expects the input to already be "clean" text; see the crate
/// documentation for the rationale.
pub fn write_escaped(sink: &mut impl JsonSink, bytes: &[u8]) -> Result<(), JsonError> {
    let mut work = [0u8; WORK_BUF_LEN];
    let mut used = 0usize;

    macro_rules! flush {
        () => {
            if used > 0 {
                sink.write_all(&work[..used])?;
                used = 0;
            }
        };
    }

    for &b in bytes {
        if let Some(escape) = short_escape(b) {
            if used + 2 > work.len() {
                flush!();
            }
            work[used] = escape[0];
            work[used + 1] = escape[1];
            used += 2;
        } else if b < 0x20 {
            flush!();
            return Err(JsonError::InvalidCharacter);
        } else {
            if used + 1 > work.len() {
                flush!();
            }
            work[used] = b;
            used += 1;
        }
    }
    flush!();
    Ok(())
}

/// Write `bytes` to `sink` as a JSON-quoted, escaped string: `"`, the
/// escaped body, then `"`.
///
/// The closing quote is emitted even if the body failed partway through,
/// so a truncated document still has a chance of being well-formed up to
/// the point of failure; the first error encountered is the one returned.
pub fn write_quoted_escaped(sink: &mut impl JsonSink, bytes: &[u8]) -> Result<(), JsonError> {
    let open = sink.write_all(b"\"");
    let body = if open.is_ok() {
        write_escaped(sink, bytes)
    } else {
        open
    };
    let close = sink.write_all(b"\"");
    open.and(body).and(close)
}
