//! The encoder state machine (C4): tracks container nesting, comma and
//! indentation placement, and exposes one operation per JSON element type.

use crate::error::JsonError;
use crate::escape::{write_escaped, write_quoted_escaped};
use crate::number::{format_f64, format_i64, format_u64, FLOAT_BUF_LEN, INT_BUF_LEN};
use crate::reset::Reset;
use crate::sink::JsonSink;
use crate::stack::FixedStack;

/// Default maximum container nesting depth, matching the bit-vector width
/// the source document cites.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    is_object: bool,
    /// `true` from the moment the container is opened until its first
    /// element is begun.
    first_entry: bool,
}

/// The encoder's session state: which containers are open, whether the
/// current one is an object or array, and whether its next element needs a
/// leading comma.
///
/// `N` bounds the nesting depth at compile time (see [`crate::stack`]);
/// [`DEFAULT_MAX_DEPTH`] matches the source's documented cap.
pub struct EncodeContext<S: JsonSink, const N: usize = DEFAULT_MAX_DEPTH> {
    sink: S,
    pretty: bool,
    stack: FixedStack<Frame, N>,
    root_first_entry: bool,
}

impl<S: JsonSink, const N: usize> EncodeContext<S, N> {
    /// Begin a new encoding session, writing to `sink`. When `pretty` is
    /// set, containers are newline-separated and indented four spaces per
    /// level.
    pub fn new(pretty: bool, sink: S) -> Self {
        EncodeContext {
            sink,
            pretty,
            stack: FixedStack::new(),
            root_first_entry: true,
        }
    }

    /// Current container nesting depth (0 at the document root).
    pub fn level(&self) -> usize {
        self.stack.len()
    }

    fn is_in_object(&self) -> bool {
        self.stack.top().map(|f| f.is_object).unwrap_or(false)
    }

    fn first_entry(&self) -> bool {
        self.stack
            .top()
            .map(|f| f.first_entry)
            .unwrap_or(self.root_first_entry)
    }

    fn set_first_entry(&mut self, value: bool) {
        match self.stack.top_mut() {
            Some(frame) => frame.first_entry = value,
            None => self.root_first_entry = value,
        }
    }

    fn write_indent(&mut self, level: usize) -> Result<(), JsonError> {
        self.sink.write_all(b"\n")?;
        const SPACES: [u8; 16] = [b' '; 16];
        let mut remaining = level * 4;
        while remaining > 0 {
            let n = remaining.min(SPACES.len());
            self.sink.write_all(&SPACES[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Emit the comma/indentation/name prologue shared by every element,
    /// per the source's `beginElement`. If the current container is an
    /// object, `name` must be `Some`.
    fn begin_element(&mut self, name: Option<&str>) -> Result<(), JsonError> {
        if self.first_entry() {
            self.set_first_entry(false);
        } else {
            self.sink.write_all(b",")?;
        }
        if self.pretty && self.level() > 0 {
            self.write_indent(self.level())?;
        }
        if self.is_in_object() {
            let name = name.ok_or(JsonError::InvalidData)?;
            write_quoted_escaped(&mut self.sink, name.as_bytes())?;
            self.sink.write_all(if self.pretty { b": " } else { b":" })?;
        }
        Ok(())
    }

    fn open_container(&mut self, name: Option<&str>, is_object: bool) -> Result<(), JsonError> {
        self.begin_element(name)?;
        self.stack.push(Frame {
            is_object,
            first_entry: true,
        })?;
        self.sink.write_all(if is_object { b"{" } else { b"[" })
    }

    /// Open a JSON array as the next element.
    pub fn begin_array(&mut self, name: Option<&str>) -> Result<(), JsonError> {
        self.open_container(name, false)
    }

    /// Open a JSON object as the next element.
    pub fn begin_object(&mut self, name: Option<&str>) -> Result<(), JsonError> {
        self.open_container(name, true)
    }

    /// Close the innermost open container. A no-op (returns `Ok`) if no
    /// container is open.
    ///
    /// The closing delimiter is always attempted, even if the
    /// pretty-printing indentation write fails, so that the first error
    /// encountered is the one returned rather than one masking it.
    pub fn end_container(&mut self) -> Result<(), JsonError> {
        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        let new_level = self.stack.len();
        let indent_result = if self.pretty && !frame.first_entry {
            self.write_indent(new_level)
        } else {
            Ok(())
        };
        self.set_first_entry(false);
        let close_result = self.sink.write_all(if frame.is_object { b"}" } else { b"]" });
        indent_result.and(close_result)
    }

    /// Add a boolean element.
    pub fn add_bool(&mut self, name: Option<&str>, value: bool) -> Result<(), JsonError> {
        self.begin_element(name)?;
        self.sink.write_all(if value { b"true" } else { b"false" })
    }

    /// Add a `null` element.
    pub fn add_null(&mut self, name: Option<&str>) -> Result<(), JsonError> {
        self.begin_element(name)?;
        self.sink.write_all(b"null")
    }

    /// Add a signed 64-bit integer element.
    pub fn add_i64(&mut self, name: Option<&str>, value: i64) -> Result<(), JsonError> {
        self.begin_element(name)?;
        let mut buf = [0u8; INT_BUF_LEN];
        let text = format_i64(value, &mut buf)?;
        self.sink.write_all(text.as_bytes())
    }

    /// Add an unsigned 64-bit integer element.
    pub fn add_u64(&mut self, name: Option<&str>, value: u64) -> Result<(), JsonError> {
        self.begin_element(name)?;
        let mut buf = [0u8; INT_BUF_LEN];
        let text = format_u64(value, &mut buf)?;
        self.sink.write_all(text.as_bytes())
    }

    /// Add a floating-point element, per the number formatter's policy for
    /// non-finite values (see [`crate::number::format_f64`]).
    pub fn add_f64(&mut self, name: Option<&str>, value: f64) -> Result<(), JsonError> {
        self.begin_element(name)?;
        let mut buf = [0u8; FLOAT_BUF_LEN];
        let text = format_f64(value, &mut buf)?;
        self.sink.write_all(text.as_bytes())
    }

    /// Add a string element. `None` is reinterpreted as a null element, per
    /// the source's behavior.
    pub fn add_str(&mut self, name: Option<&str>, value: Option<&str>) -> Result<(), JsonError> {
        match value {
            None => self.add_null(name),
            Some(v) => {
                self.begin_element(name)?;
                write_quoted_escaped(&mut self.sink, v.as_bytes())
            }
        }
    }

    /// Add a binary element, encoded as a quoted, uppercase hex string (two
    /// nybbles per input byte).
    pub fn add_data(&mut self, name: Option<&str>, bytes: &[u8]) -> Result<(), JsonError> {
        self.begin_data(name)?;
        self.append_data(bytes)?;
        self.end_data()
    }

    /// Add a pre-serialized, caller-validated JSON fragment verbatim, with
    /// no further escaping or validation.
    pub fn add_raw_json(&mut self, name: Option<&str>, bytes: &[u8]) -> Result<(), JsonError> {
        self.begin_element(name)?;
        self.sink.write_all(bytes)
    }

    /// Begin a string element whose body will be supplied incrementally via
    /// [`Self::append_string`].
    pub fn begin_string(&mut self, name: Option<&str>) -> Result<(), JsonError> {
        self.begin_element(name)?;
        self.sink.write_all(b"\"")
    }

    /// Append another chunk of a streaming string element's body.
    pub fn append_string(&mut self, chunk: &str) -> Result<(), JsonError> {
        write_escaped(&mut self.sink, chunk.as_bytes())
    }

    /// Close a streaming string element opened with [`Self::begin_string`].
    pub fn end_string(&mut self) -> Result<(), JsonError> {
        self.sink.write_all(b"\"")
    }

    /// Begin a binary (hex-encoded) element whose body will be supplied
    /// incrementally via [`Self::append_data`].
    pub fn begin_data(&mut self, name: Option<&str>) -> Result<(), JsonError> {
        self.begin_element(name)?;
        self.sink.write_all(b"\"")
    }

    /// Append another chunk of a streaming binary element's body, hex
    /// encoding each byte as two uppercase nybbles.
    pub fn append_data(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
        const CHUNK_BYTES: usize = 128;
        let mut hex = [0u8; CHUNK_BYTES * 2];
        for chunk in bytes.chunks(CHUNK_BYTES) {
            for (i, &b) in chunk.iter().enumerate() {
                hex[i * 2] = HEX_DIGITS[(b >> 4) as usize];
                hex[i * 2 + 1] = HEX_DIGITS[(b & 0x0F) as usize];
            }
            self.sink.write_all(&hex[..chunk.len() * 2])?;
        }
        Ok(())
    }

    /// Close a streaming binary element opened with [`Self::begin_data`].
    pub fn end_data(&mut self) -> Result<(), JsonError> {
        self.sink.write_all(b"\"")
    }

    /// Auto-close every still-open container and hand the sink back to the
    /// caller. The first error encountered while closing aborts the
    /// remaining closes.
    pub fn finish(mut self) -> Result<S, JsonError> {
        while !self.stack.is_empty() {
            self.end_container()?;
        }
        Ok(self.sink)
    }
}

impl<S: JsonSink, const N: usize> Reset for EncodeContext<S, N> {
    /// Restore the container bookkeeping to the state a fresh session would
    /// have. The underlying sink is left untouched — if it needs to be
    /// rewound (e.g. a `Vec<u8>` cleared), the caller does that itself,
    /// since an arbitrary [`JsonSink`] has no general notion of "empty".
    fn reset(&mut self) {
        self.stack.clear();
        self.root_first_entry = true;
    }
}
