//! # resilient-json
//!
//! A streaming JSON codec built for hostile environments: inside a crash
//! reporter's signal handler, where the heap may already be corrupted,
//! allocation is forbidden, and recursion depth must be statically
//! bounded. The encoder, decoder, and in-memory splicer never allocate —
//! every buffer they touch is either stack-resident or supplied by the
//! caller — and nesting depth is bounded by a fixed-capacity frame stack
//! rather than native recursion, so it can never overflow the calling
//! thread's stack regardless of how deeply the input is nested.
//!
//! ## Encoding
//!
//! ```
//! use resilient_json::encode::EncodeContext;
//!
//! let mut ctx = EncodeContext::new(false, Vec::new());
//! ctx.begin_object(None).unwrap();
//! ctx.add_i64(Some("count"), 3).unwrap();
//! ctx.add_str(Some("name"), Some("Elvis")).unwrap();
//! ctx.end_container().unwrap();
//! let bytes = ctx.finish().unwrap();
//!
//! assert_eq!(bytes, br#"{"count":3,"name":"Elvis"}"#);
//! ```
//!
//! A [`FixedBufSink`](sink::FixedBufSink) lets the same encoder write into a
//! stack-resident `[u8; N]` array instead of a `Vec`, with no allocation on
//! the write path at all — the mode a signal handler would actually use.
//!
//! ## Decoding
//!
//! ```
//! use resilient_json::decode::{decode, DecodeCallbacks};
//! use resilient_json::error::JsonError;
//!
//! struct Printer;
//! impl DecodeCallbacks for Printer {
//!     fn on_begin_array(&mut self, _name: Option<&str>) -> Result<(), JsonError> { Ok(()) }
//!     fn on_begin_object(&mut self, _name: Option<&str>) -> Result<(), JsonError> { Ok(()) }
//!     fn on_end_container(&mut self) -> Result<(), JsonError> { Ok(()) }
//!     fn on_bool(&mut self, _name: Option<&str>, _value: bool) -> Result<(), JsonError> { Ok(()) }
//!     fn on_i64(&mut self, _name: Option<&str>, _value: i64) -> Result<(), JsonError> { Ok(()) }
//!     fn on_u64(&mut self, _name: Option<&str>, _value: u64) -> Result<(), JsonError> { Ok(()) }
//!     fn on_f64(&mut self, _name: Option<&str>, _value: f64) -> Result<(), JsonError> { Ok(()) }
//!     fn on_null(&mut self, _name: Option<&str>) -> Result<(), JsonError> { Ok(()) }
//!     fn on_string(&mut self, _name: Option<&str>, _value: &str) -> Result<(), JsonError> { Ok(()) }
//! }
//!
//! let json = br#"{"name":"Elvis"}"#;
//! let mut scratch = [0u8; 256];
//! let mut callbacks = Printer;
//! decode(json, &mut scratch, &mut callbacks).unwrap();
//! ```
//!
//! ## Splicing
//!
//! [`splice::add_json_element`] inlines an already-serialized JSON fragment
//! into an encoder's current output position, as though it had been built
//! element-by-element; [`splice::add_json_from_file`] does the same from a
//! path (behind the `std` feature).
//!
//! ## Deliberate deviations from RFC 8259
//!
//! - `NaN` encodes as the literal `null`; `±Infinity` encode as the
//!   out-of-range finite literals `1e999`/`-1e999`, which most parsers
//!   overflow back to infinity. See [`number::format_f64`].
//! - Control bytes inside a string to be encoded are rejected rather than
//!   auto-escaped to `\u00XX`. See [`escape::write_escaped`].
//! - The decoder tolerates whitespace-only separation between sibling
//!   elements (a missing `,`) and tolerates a single trailing comma before
//!   `]`/`}`. See [`decode::decode`].

pub mod decode;
pub mod encode;
pub mod error;
pub mod escape;
pub mod number;
pub mod reset;
pub mod sink;
pub mod stack;
pub mod splice;
pub mod utf;

pub use decode::{decode, DecodeCallbacks};
pub use encode::EncodeContext;
pub use error::JsonError;
pub use reset::Reset;
pub use sink::JsonSink;
