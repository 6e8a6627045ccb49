use thiserror::Error;

/// The codec's complete error taxonomy.
///
/// Every fallible operation in this crate — encoding, decoding, splicing —
/// returns one of these five variants. The set is deliberately small and
/// `repr`-stable in spirit (see [`JsonError::name`]) so that callers sitting
/// behind an FFI boundary (a crash-reporting framework, for instance) can
/// map it onto their own integer error codes without matching on message
/// text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonError {
    /// A syntactic or encoding violation: an illegal control byte in a
    /// string, a malformed escape sequence, a lone UTF-16 surrogate, or a
    /// Unicode scalar outside `0..=0x10FFFF`.
    #[error("invalid character in JSON text")]
    InvalidCharacter,

    /// An output sink, scratch buffer, or fixed work buffer was too small
    /// for the data it needed to hold.
    #[error("data too long for the available buffer")]
    DataTooLong,

    /// Reserved for [`JsonSink`](crate::sink::JsonSink) implementations:
    /// returned when the sink itself cannot accept more data (for example,
    /// an underlying `std::io::Write` failed).
    #[error("sink could not accept data")]
    CannotAddData,

    /// The input was exhausted in the middle of a token (an unterminated
    /// string, a truncated `true`/`false`/`null`, an object missing its
    /// closing brace, ...).
    #[error("incomplete JSON text")]
    Incomplete,

    /// A semantic rule was violated: an object element was begun without a
    /// name, or a container was opened past the configured nesting depth.
    #[error("invalid JSON data")]
    InvalidData,
}

impl JsonError {
    /// The short, stable identifier for this error code (C9's name lookup).
    ///
    /// Unlike [`Display`](std::fmt::Display), which may grow a longer
    /// sentence over time, this string is part of the crate's API contract.
    pub const fn name(self) -> &'static str {
        match self {
            JsonError::InvalidCharacter => "InvalidCharacter",
            JsonError::DataTooLong => "DataTooLong",
            JsonError::CannotAddData => "CannotAddData",
            JsonError::Incomplete => "Incomplete",
            JsonError::InvalidData => "InvalidData",
        }
    }
}
