//! The string decoder (C6) and element decoder (C7): an iterative-descent
//! JSON parser over a byte slice, driven by an explicit, depth-bounded
//! frame stack rather than native recursion, dispatching to a
//! [`DecodeCallbacks`] implementation.

use crate::error::JsonError;
use crate::stack::FixedStack;
use crate::utf::{combine_surrogate_pair, decode_hex4, encode_utf8_scalar};

/// Default maximum container nesting depth the decoder will follow before
/// returning [`JsonError::InvalidData`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Smallest scratch buffer [`decode`] will accept. Below this, the 1/4-name
/// / 3/4-value split leaves no room for even the shortest escaped string or
/// number.
pub const MIN_SCRATCH: usize = 16;

/// Per-token callbacks invoked by [`decode`] as it walks a JSON document.
///
/// Every method may return `Err` to abort parsing immediately; `decode`
/// then returns that error paired with the byte offset at which parsing
/// stopped.
pub trait DecodeCallbacks {
    /// An array was opened. `name` is the key if the array is an object
    /// member, `None` at the document root or inside another array.
    fn on_begin_array(&mut self, name: Option<&str>) -> Result<(), JsonError>;
    /// An object was opened. `name` follows the same convention as
    /// [`Self::on_begin_array`].
    fn on_begin_object(&mut self, name: Option<&str>) -> Result<(), JsonError>;
    /// The innermost open array or object was closed.
    fn on_end_container(&mut self) -> Result<(), JsonError>;
    /// A boolean element.
    fn on_bool(&mut self, name: Option<&str>, value: bool) -> Result<(), JsonError>;
    /// An integer element that fits (or, if negative, barely overflows) a
    /// signed 64-bit range; see §4.7's sign/overflow table.
    fn on_i64(&mut self, name: Option<&str>, value: i64) -> Result<(), JsonError>;
    /// A non-negative integer element too large for [`i64`].
    fn on_u64(&mut self, name: Option<&str>, value: u64) -> Result<(), JsonError>;
    /// A floating-point element (anything with a `.`/`e`/`E`, or an integer
    /// literal too large to represent exactly as `i64`/`u64`).
    fn on_f64(&mut self, name: Option<&str>, value: f64) -> Result<(), JsonError>;
    /// A `null` element.
    fn on_null(&mut self, name: Option<&str>) -> Result<(), JsonError>;
    /// A string element, with escapes already resolved.
    fn on_string(&mut self, name: Option<&str>, value: &str) -> Result<(), JsonError>;
}

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    is_object: bool,
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: u8) -> Result<(), JsonError> {
        match self.bump() {
            Some(b) if b == want => Ok(()),
            Some(_) => Err(JsonError::InvalidCharacter),
            None => Err(JsonError::Incomplete),
        }
    }
}

/// Either a zero-copy slice of the input, or a count of bytes resolved into
/// the caller's scratch buffer — see [`decode_string`].
enum StrResult<'a> {
    Borrowed(&'a str),
    Copied(usize),
}

/// Parse a quoted JSON string starting at the opening `"` (precondition:
/// `cursor.peek() == Some(b'"')`), resolving any escapes into `scratch`.
///
/// Returns a zero-copy [`StrResult::Borrowed`] slice of the input when no
/// escapes were present, or [`StrResult::Copied`] naming how many resolved
/// bytes were written to the front of `scratch` otherwise.
fn decode_string<'a>(cursor: &mut Cursor<'a>, scratch: &mut [u8]) -> Result<StrResult<'a>, JsonError> {
    cursor.bump(); // opening quote
    let start = cursor.pos;
    let mut has_escape = false;
    loop {
        match cursor.peek() {
            None => return Err(JsonError::Incomplete),
            Some(b'"') => break,
            Some(b'\\') => {
                has_escape = true;
                cursor.bump();
                if cursor.bump().is_none() {
                    return Err(JsonError::Incomplete);
                }
            }
            Some(_) => {
                cursor.bump();
            }
        }
    }
    let end = cursor.pos;
    cursor.bump(); // closing quote

    if !has_escape {
        let s = core::str::from_utf8(&cursor.data[start..end]).map_err(|_| JsonError::InvalidCharacter)?;
        return Ok(StrResult::Borrowed(s));
    }

    let mut out_len = 0usize;
    let mut i = start;
    while i < end {
        let b = cursor.data[i];
        if b != b'\\' {
            if out_len >= scratch.len() {
                return Err(JsonError::DataTooLong);
            }
            scratch[out_len] = b;
            out_len += 1;
            i += 1;
            continue;
        }
        i += 1;
        if i >= end {
            return Err(JsonError::InvalidCharacter);
        }
        let esc = cursor.data[i];
        i += 1;
        let direct = match esc {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            b'u' => None,
            _ => return Err(JsonError::InvalidCharacter),
        };
        let scalar = match direct {
            Some(byte) => {
                if out_len >= scratch.len() {
                    return Err(JsonError::DataTooLong);
                }
                scratch[out_len] = byte;
                out_len += 1;
                continue;
            }
            None => {
                if i + 4 > end {
                    return Err(JsonError::InvalidCharacter);
                }
                let unit = decode_hex4([cursor.data[i], cursor.data[i + 1], cursor.data[i + 2], cursor.data[i + 3]])?;
                i += 4;
                if (0xD800..=0xDBFF).contains(&unit) {
                    if i + 6 > end || cursor.data[i] != b'\\' || cursor.data[i + 1] != b'u' {
                        return Err(JsonError::InvalidCharacter);
                    }
                    let trail = decode_hex4([
                        cursor.data[i + 2],
                        cursor.data[i + 3],
                        cursor.data[i + 4],
                        cursor.data[i + 5],
                    ])?;
                    if !(0xDC00..=0xDFFF).contains(&trail) {
                        return Err(JsonError::InvalidCharacter);
                    }
                    i += 6;
                    combine_surrogate_pair(unit, trail)
                } else if (0xDC00..=0xDFFF).contains(&unit) {
                    return Err(JsonError::InvalidCharacter);
                } else {
                    unit as u32
                }
            }
        };
        let mut utf8 = [0u8; 4];
        let n = encode_utf8_scalar(scalar, &mut utf8)?;
        if out_len + n > scratch.len() {
            return Err(JsonError::DataTooLong);
        }
        scratch[out_len..out_len + n].copy_from_slice(&utf8[..n]);
        out_len += n;
    }
    Ok(StrResult::Copied(out_len))
}

fn expect_literal(cursor: &mut Cursor, literal: &[u8]) -> Result<(), JsonError> {
    for &want in literal {
        match cursor.bump() {
            Some(b) if b == want => {}
            Some(_) => return Err(JsonError::InvalidCharacter),
            None => return Err(JsonError::Incomplete),
        }
    }
    Ok(())
}

fn consume_optional_comma(cursor: &mut Cursor) {
    cursor.skip_ws();
    if cursor.peek() == Some(b',') {
        cursor.bump();
    }
}

/// Parse one number token per §4.7's sign/overflow table, invoking the
/// matching callback.
fn parse_number(
    cursor: &mut Cursor,
    name: Option<&str>,
    value_scratch: &mut [u8],
    callbacks: &mut impl DecodeCallbacks,
) -> Result<(), JsonError> {
    let start = cursor.pos;
    let negative = cursor.peek() == Some(b'-');
    if negative {
        cursor.bump();
    }

    let mut accum: u64 = 0;
    let mut overflow = false;
    let mut digits = 0u32;
    while let Some(b) = cursor.peek() {
        if !b.is_ascii_digit() {
            break;
        }
        digits += 1;
        let d = (b - b'0') as u64;
        match accum.checked_mul(10).and_then(|v| v.checked_add(d)) {
            Some(v) => accum = v,
            None => overflow = true,
        }
        cursor.bump();
    }
    if digits == 0 {
        return Err(JsonError::InvalidCharacter);
    }

    let is_float_tail = matches!(cursor.peek(), Some(b'.' | b'e' | b'E'));

    if !is_float_tail && !overflow {
        if !negative {
            return if accum <= i64::MAX as u64 {
                callbacks.on_i64(name, accum as i64)
            } else {
                callbacks.on_u64(name, accum)
            };
        }
        if accum <= i64::MAX as u64 + 1 {
            let value = if accum == i64::MAX as u64 + 1 {
                i64::MIN
            } else {
                -(accum as i64)
            };
            return callbacks.on_i64(name, value);
        }
        // Negative magnitude too large for i64: fall through to the float path.
    }

    if is_float_tail {
        while matches!(cursor.peek(), Some(b'.' | b'e' | b'E' | b'+' | b'-' | b'0'..=b'9')) {
            cursor.bump();
        }
    }
    let span = &cursor.data[start..cursor.pos];
    if span.len() > value_scratch.len() {
        return Err(JsonError::DataTooLong);
    }
    value_scratch[..span.len()].copy_from_slice(span);
    let text = core::str::from_utf8(&value_scratch[..span.len()]).expect("digits and fp syntax are ascii");
    let value: f64 = text.parse().map_err(|_| JsonError::InvalidCharacter)?;
    callbacks.on_f64(name, value)
}

/// Parse exactly one JSON value (scalar, array, or object) at the cursor's
/// current position. Returns `Ok(true)` if a container was opened (and thus
/// pushed onto `frames` — its contents are handled by the caller's driving
/// loop), `Ok(false)` if a scalar value was fully emitted.
fn parse_value<const N: usize>(
    cursor: &mut Cursor,
    name: Option<&str>,
    value_scratch: &mut [u8],
    callbacks: &mut impl DecodeCallbacks,
    frames: &mut FixedStack<Frame, N>,
) -> Result<bool, JsonError> {
    cursor.skip_ws();
    match cursor.peek() {
        None => Err(JsonError::Incomplete),
        Some(b'[') => {
            cursor.bump();
            frames.push(Frame { is_object: false })?;
            callbacks.on_begin_array(name)?;
            Ok(true)
        }
        Some(b'{') => {
            cursor.bump();
            frames.push(Frame { is_object: true })?;
            callbacks.on_begin_object(name)?;
            Ok(true)
        }
        Some(b'"') => {
            let result = decode_string(cursor, value_scratch)?;
            match result {
                StrResult::Borrowed(s) => callbacks.on_string(name, s)?,
                StrResult::Copied(len) => {
                    let s = core::str::from_utf8(&value_scratch[..len]).expect("utf8 by construction");
                    callbacks.on_string(name, s)?;
                }
            }
            Ok(false)
        }
        Some(b't') => {
            expect_literal(cursor, b"true")?;
            callbacks.on_bool(name, true)?;
            Ok(false)
        }
        Some(b'f') => {
            expect_literal(cursor, b"false")?;
            callbacks.on_bool(name, false)?;
            Ok(false)
        }
        Some(b'n') => {
            expect_literal(cursor, b"null")?;
            callbacks.on_null(name)?;
            Ok(false)
        }
        Some(b) if b == b'-' || b.is_ascii_digit() => {
            parse_number(cursor, name, value_scratch, callbacks)?;
            Ok(false)
        }
        Some(_) => Err(JsonError::InvalidCharacter),
    }
}

/// Parse one complete JSON document from `data`, invoking `callbacks` for
/// every token encountered.
///
/// `scratch` backs both the object-key scratch area (its first quarter) and
/// the string/number value scratch area (the remainder) — see the data
/// model's `DecodeContext::new` split. Nesting is bounded by
/// [`DEFAULT_MAX_DEPTH`]; exceeding it returns [`JsonError::InvalidData`].
///
/// On success, returns the number of bytes of `data` consumed. On failure,
/// returns the error paired with the byte offset at which it was detected.
pub fn decode(
    data: &[u8],
    scratch: &mut [u8],
    callbacks: &mut impl DecodeCallbacks,
) -> Result<usize, (JsonError, usize)> {
    assert!(
        scratch.len() >= MIN_SCRATCH,
        "decode scratch buffer must be at least MIN_SCRATCH bytes"
    );
    let split = scratch.len() / 4;
    let (name_scratch, value_scratch) = scratch.split_at_mut(split);
    decode_with_scratch(data, name_scratch, value_scratch, callbacks)
}

/// Lower-level entry point for callers that already maintain separate name
/// and value scratch buffers with their own sizing policy — notably
/// [`crate::splice`], whose stack-resident buffers follow the source's
/// fixed byte budgets rather than the 1/4-3/4 split [`decode`] applies to a
/// single combined buffer.
pub fn decode_with_scratch(
    data: &[u8],
    name_scratch: &mut [u8],
    value_scratch: &mut [u8],
    callbacks: &mut impl DecodeCallbacks,
) -> Result<usize, (JsonError, usize)> {
    let mut cursor = Cursor::new(data);
    let mut frames: FixedStack<Frame, DEFAULT_MAX_DEPTH> = FixedStack::new();

    match decode_inner(&mut cursor, name_scratch, value_scratch, callbacks, &mut frames) {
        Ok(()) => Ok(cursor.pos),
        Err(e) => Err((e, cursor.pos)),
    }
}

fn decode_inner<const N: usize>(
    cursor: &mut Cursor,
    name_scratch: &mut [u8],
    value_scratch: &mut [u8],
    callbacks: &mut impl DecodeCallbacks,
    frames: &mut FixedStack<Frame, N>,
) -> Result<(), JsonError> {
    let entered = parse_value(cursor, None, value_scratch, callbacks, frames)?;
    if !entered {
        return Ok(());
    }

    while let Some(&Frame { is_object }) = frames.top() {
        cursor.skip_ws();
        let close = if is_object { b'}' } else { b']' };
        if cursor.peek() == Some(close) {
            cursor.bump();
            frames.pop();
            callbacks.on_end_container()?;
            consume_optional_comma(cursor);
            continue;
        }

        let name = if is_object {
            match cursor.peek() {
                Some(b'"') => {}
                Some(_) => return Err(JsonError::InvalidCharacter),
                None => return Err(JsonError::Incomplete),
            }
            let result = decode_string(cursor, name_scratch)?;
            let key: &str = match result {
                StrResult::Borrowed(s) => s,
                StrResult::Copied(len) => {
                    core::str::from_utf8(&name_scratch[..len]).expect("utf8 by construction")
                }
            };
            cursor.skip_ws();
            cursor.expect(b':')?;
            Some(key)
        } else {
            None
        };

        let entered = parse_value(cursor, name, value_scratch, callbacks, frames)?;
        if !entered {
            consume_optional_comma(cursor);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Clone)]
    enum Event {
        BeginArray(Option<String>),
        BeginObject(Option<String>),
        End,
        Bool(Option<String>, bool),
        I64(Option<String>, i64),
        U64(Option<String>, u64),
        F64(Option<String>, f64),
        Null(Option<String>),
        Str(Option<String>, String),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl DecodeCallbacks for Recorder {
        fn on_begin_array(&mut self, name: Option<&str>) -> Result<(), JsonError> {
            self.events.push(Event::BeginArray(name.map(String::from)));
            Ok(())
        }
        fn on_begin_object(&mut self, name: Option<&str>) -> Result<(), JsonError> {
            self.events.push(Event::BeginObject(name.map(String::from)));
            Ok(())
        }
        fn on_end_container(&mut self) -> Result<(), JsonError> {
            self.events.push(Event::End);
            Ok(())
        }
        fn on_bool(&mut self, name: Option<&str>, value: bool) -> Result<(), JsonError> {
            self.events.push(Event::Bool(name.map(String::from), value));
            Ok(())
        }
        fn on_i64(&mut self, name: Option<&str>, value: i64) -> Result<(), JsonError> {
            self.events.push(Event::I64(name.map(String::from), value));
            Ok(())
        }
        fn on_u64(&mut self, name: Option<&str>, value: u64) -> Result<(), JsonError> {
            self.events.push(Event::U64(name.map(String::from), value));
            Ok(())
        }
        fn on_f64(&mut self, name: Option<&str>, value: f64) -> Result<(), JsonError> {
            self.events.push(Event::F64(name.map(String::from), value));
            Ok(())
        }
        fn on_null(&mut self, name: Option<&str>) -> Result<(), JsonError> {
            self.events.push(Event::Null(name.map(String::from)));
            Ok(())
        }
        fn on_string(&mut self, name: Option<&str>, value: &str) -> Result<(), JsonError> {
            self.events.push(Event::Str(name.map(String::from), value.to_string()));
            Ok(())
        }
    }

    fn run(json: &str) -> (Vec<Event>, usize) {
        let mut scratch = [0u8; 256];
        let mut rec = Recorder::default();
        let consumed = decode(json.as_bytes(), &mut scratch, &mut rec).unwrap();
        (rec.events, consumed)
    }

    #[test]
    fn decodes_flat_object() {
        let (events, _) = run(r#"{"a":1,"b":true}"#);
        assert_eq!(
            events,
            vec![
                Event::BeginObject(None),
                Event::I64(Some("a".into()), 1),
                Event::Bool(Some("b".into()), true),
                Event::End,
            ]
        );
    }

    #[test]
    fn decodes_nested_array() {
        let (events, _) = run(r#"[1,[2,3],null]"#);
        assert_eq!(
            events,
            vec![
                Event::BeginArray(None),
                Event::I64(None, 1),
                Event::BeginArray(None),
                Event::I64(None, 2),
                Event::I64(None, 3),
                Event::End,
                Event::Null(None),
                Event::End,
            ]
        );
    }

    #[test]
    fn missing_commas_are_tolerated() {
        let (events, _) = run(r#"[1 2 3]"#);
        assert_eq!(events, vec![
            Event::BeginArray(None),
            Event::I64(None, 1),
            Event::I64(None, 2),
            Event::I64(None, 3),
            Event::End,
        ]);
    }

    #[test]
    fn one_trailing_comma_is_tolerated() {
        let (events, _) = run(r#"[1,2,]"#);
        assert_eq!(events, vec![
            Event::BeginArray(None),
            Event::I64(None, 1),
            Event::I64(None, 2),
            Event::End,
        ]);
    }

    #[test]
    fn u64_max_dispatches_to_unsigned_callback() {
        let (events, _) = run("18446744073709551615");
        assert_eq!(events, vec![Event::U64(None, u64::MAX)]);
    }

    #[test]
    fn i64_min_dispatches_to_signed_callback() {
        let (events, _) = run("-9223372036854775808");
        assert_eq!(events, vec![Event::I64(None, i64::MIN)]);
    }

    #[test]
    fn i64_max_plus_one_falls_to_unsigned() {
        let (events, _) = run("9223372036854775808");
        assert_eq!(events, vec![Event::U64(None, i64::MAX as u64 + 1)]);
    }

    #[test]
    fn float_literal_dispatches_to_float_callback() {
        let (events, _) = run("1.5e10");
        match &events[..] {
            [Event::F64(None, v)] => assert!((v - 1.5e10).abs() < 1.0),
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn surrogate_pair_string_decodes_to_emoji() {
        let (events, _) = run(r#""😀""#);
        assert_eq!(events, vec![Event::Str(None, "\u{1F600}".to_string())]);
    }

    #[test]
    fn lone_trailing_surrogate_is_invalid_character() {
        let mut scratch = [0u8; 64];
        let mut rec = Recorder::default();
        let err = decode(br#""\ude00""#, &mut scratch, &mut rec);
        assert_eq!(err, Err((JsonError::InvalidCharacter, 8)));
    }

    #[test]
    fn unescaped_string_is_zero_copy_borrow() {
        let (events, _) = run(r#""hello""#);
        assert_eq!(events, vec![Event::Str(None, "hello".to_string())]);
    }

    #[test]
    fn truncated_object_is_incomplete() {
        let mut scratch = [0u8; 64];
        let mut rec = Recorder::default();
        let err = decode(br#"{"a":1"#, &mut scratch, &mut rec);
        assert_eq!(err, Err((JsonError::Incomplete, 6)));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut scratch = [0u8; 64];
        let mut rec = Recorder::default();
        let deep: String = "[".repeat(DEFAULT_MAX_DEPTH + 1);
        let err = decode(deep.as_bytes(), &mut scratch, &mut rec);
        assert_eq!(err, Err((JsonError::InvalidData, DEFAULT_MAX_DEPTH + 1)));
    }

    #[test]
    fn object_key_must_be_a_string() {
        let mut scratch = [0u8; 64];
        let mut rec = Recorder::default();
        let err = decode(br#"{1:2}"#, &mut scratch, &mut rec);
        assert_eq!(err, Err((JsonError::InvalidCharacter, 1)));
    }

    #[test]
    fn bad_literal_is_invalid_character() {
        let mut scratch = [0u8; 64];
        let mut rec = Recorder::default();
        let err = decode(br#"tru3"#, &mut scratch, &mut rec);
        assert_eq!(err, Err((JsonError::InvalidCharacter, 4)));
    }
}
