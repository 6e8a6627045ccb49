//! The sink adapter (C1): the single path by which encoded bytes leave the
//! codec.

use crate::error::JsonError;

/// A byte consumer that the encoder writes its output to.
///
/// Every byte the encoder ever produces is funneled through exactly one
/// call to [`JsonSink::write_all`]; there is no other path by which output
/// reaches the caller. A sink that cannot accept more data should return
/// [`JsonError::CannotAddData`] or [`JsonError::DataTooLong`] as
/// appropriate; the encoder propagates that error unchanged to its caller,
/// except that a container-close operation still attempts to emit its
/// closing delimiter even after a prior write failed (see
/// [`crate::encode::EncodeContext::end_container`]).
pub trait JsonSink {
    /// Append `bytes` to the output. Implementations that cannot accept all
    /// of `bytes` must return `Err` rather than silently truncating.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), JsonError>;
}

impl JsonSink for Vec<u8> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

impl JsonSink for &mut Vec<u8> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// A fixed, caller-owned byte buffer used as a sink.
///
/// This is the sink a crash handler actually reaches for: a stack-resident
/// array, filled in place, with no allocation on the write path. Writing
/// past `buf`'s length returns [`JsonError::DataTooLong`]; the buffer is
/// left filled up to (but not including) the byte that overflowed.
pub struct FixedBufSink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> FixedBufSink<'a> {
    /// Wrap `buf` as a sink, starting empty.
    pub fn new(buf: &'a mut [u8]) -> Self {
        FixedBufSink { buf, len: 0 }
    }

    /// The bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl JsonSink for FixedBufSink<'_> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        let end = self.len.checked_add(bytes.len()).ok_or(JsonError::DataTooLong)?;
        if end > self.buf.len() {
            return Err(JsonError::DataTooLong);
        }
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

/// Adapts any [`std::io::Write`] into a [`JsonSink`], mapping I/O errors to
/// [`JsonError::CannotAddData`] — the error code the spec reserves for
/// exactly this purpose.
#[cfg(feature = "std")]
pub struct IoSink<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> JsonSink for IoSink<W> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), JsonError> {
        self.0
            .write_all(bytes)
            .map_err(|_| JsonError::CannotAddData)
    }
}
