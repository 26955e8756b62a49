#![forbid(unsafe_code)]

//! Structural UTF-8 decoding over raw byte buffers.
//!
//! Text arriving from the wire is not guaranteed to be valid UTF-8, so this
//! module never rejects a buffer. Every byte sequence is classified by the
//! high nibble of its lead byte:
//!
//! | lead nibble | classification                    |
//! |-------------|-----------------------------------|
//! | `0..=7`     | one byte (ASCII)                  |
//! | `8..=B`     | invalid (stray continuation byte) |
//! | `C`, `D`    | two bytes                         |
//! | `E`         | three bytes                       |
//! | `F`         | four bytes                        |
//!
//! A multi-byte sequence that runs past the end of the buffer is reported as
//! [`DecodedChar::Truncated`] and is always the last character produced.
//!
//! Only the lead byte is inspected. Continuation bytes, overlong encodings and
//! encoded surrogates are accepted as-is.
//!
//! # Example
//! ```
//! use rdpx_text::utf8::{DecodedChar, Utf8Chars};
//!
//! let chars: Vec<u32> = Utf8Chars::new("a\u{e9}".as_bytes())
//!     .map(|ch| ch.code_point())
//!     .collect();
//! assert_eq!(chars, vec![0x61, 0xE9]);
//!
//! let mut tail = Utf8Chars::new(b"a\xE2\x82");
//! assert!(matches!(tail.next(), Some(DecodedChar::OneByte(b"a"))));
//! assert!(matches!(tail.next(), Some(DecodedChar::Truncated(b"\xE2\x82"))));
//! assert!(tail.next().is_none());
//! ```

use std::iter::FusedIterator;

/// Code point reported for invalid and truncated sequences.
pub const REPLACEMENT_CHARACTER: u32 = 0xFFFD;

/// Longest sequence the decoder will assemble.
pub const MAX_SEQUENCE_LEN: usize = 4;

/// A single decoded character and the source bytes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedChar<'a> {
    /// `0xxxxxxx`
    OneByte(&'a [u8]),
    /// `110xxxxx 10xxxxxx`
    TwoBytes(&'a [u8]),
    /// `1110xxxx 10xxxxxx 10xxxxxx`
    ThreeBytes(&'a [u8]),
    /// `11110xxx 10xxxxxx 10xxxxxx 10xxxxxx`
    FourBytes(&'a [u8]),
    /// A lone continuation byte. Always exactly one byte.
    Invalid(&'a [u8]),
    /// A sequence cut off by the end of the buffer. Covers every remaining byte.
    Truncated(&'a [u8]),
}

impl<'a> DecodedChar<'a> {
    /// Source bytes of this character.
    #[inline]
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        match *self {
            Self::OneByte(b)
            | Self::TwoBytes(b)
            | Self::ThreeBytes(b)
            | Self::FourBytes(b)
            | Self::Invalid(b)
            | Self::Truncated(b) => b,
        }
    }

    /// Number of source bytes consumed.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.bytes().len()
    }

    /// True for the four well-formed variants.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_) | Self::Truncated(_))
    }

    /// Resolved code point; [`REPLACEMENT_CHARACTER`] for invalid and truncated input.
    #[inline]
    #[must_use]
    pub fn code_point(&self) -> u32 {
        match *self {
            Self::OneByte(&[a, ..]) => u32::from(a),
            Self::TwoBytes(&[a, b, ..]) => ((u32::from(a) & 0x1F) << 6) | (u32::from(b) & 0x3F),
            Self::ThreeBytes(&[a, b, c, ..]) => {
                ((u32::from(a) & 0x0F) << 12) | ((u32::from(b) & 0x3F) << 6) | (u32::from(c) & 0x3F)
            }
            Self::FourBytes(&[a, b, c, d, ..]) => {
                ((u32::from(a) & 0x07) << 18)
                    | ((u32::from(b) & 0x3F) << 12)
                    | ((u32::from(c) & 0x3F) << 6)
                    | (u32::from(d) & 0x3F)
            }
            _ => REPLACEMENT_CHARACTER,
        }
    }
}

/// Decode the character at the start of `bytes`.
///
/// Returns `None` only when `bytes` is empty.
#[must_use]
pub fn decode_one(bytes: &[u8]) -> Option<DecodedChar<'_>> {
    let &lead = bytes.first()?;
    let ch = match lead >> 4 {
        0x0..=0x7 => DecodedChar::OneByte(&bytes[..1]),
        0x8..=0xB => DecodedChar::Invalid(&bytes[..1]),
        0xC | 0xD => sequence(bytes, 2, DecodedChar::TwoBytes),
        0xE => sequence(bytes, 3, DecodedChar::ThreeBytes),
        _ => sequence(bytes, MAX_SEQUENCE_LEN, DecodedChar::FourBytes),
    };
    Some(ch)
}

#[inline]
fn sequence<'a>(
    bytes: &'a [u8],
    len: usize,
    make: fn(&'a [u8]) -> DecodedChar<'a>,
) -> DecodedChar<'a> {
    match bytes.get(..len) {
        Some(seq) => make(seq),
        None => DecodedChar::Truncated(bytes),
    }
}

/// Lazy, restartable traversal over a byte buffer.
///
/// The cursor is a plain byte offset, so a consumer can remember a position
/// and [`seek`](Self::seek) back to it to scan the same region again.
#[derive(Debug, Clone)]
pub struct Utf8Chars<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Utf8Chars<'a> {
    /// Start a traversal at the beginning of `bytes`.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Byte offset of the next character.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    /// Move the cursor to `offset`, clamped to the buffer length.
    pub fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.bytes.len());
    }
}

impl<'a> Iterator for Utf8Chars<'a> {
    type Item = DecodedChar<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let ch = decode_one(self.remaining())?;
        self.pos += ch.len();
        Some(ch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.bytes.len() - self.pos;
        (left.div_ceil(MAX_SEQUENCE_LEN), Some(left))
    }
}

impl FusedIterator for Utf8Chars<'_> {}

/// What [`for_each_utf8`] does after visiting a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Move on to the next character.
    Continue,
    /// Stop; the current character is left unread.
    Stop,
    /// Resume at an absolute byte offset past the start of the current character.
    JumpTo(usize),
}

/// Visit every character of `bytes` in order.
///
/// Returns the unread tail: empty after a full traversal, starting at the
/// stopping character after [`Step::Stop`], or the truncated bytes when the
/// buffer ends mid-sequence (the truncated character is still visited).
pub fn for_each_utf8<'a, F>(bytes: &'a [u8], mut visit: F) -> &'a [u8]
where
    F: FnMut(DecodedChar<'a>) -> Step,
{
    let mut pos = 0;
    while let Some(ch) = decode_one(&bytes[pos..]) {
        if let DecodedChar::Truncated(rest) = ch {
            visit(ch);
            return rest;
        }
        match visit(ch) {
            Step::Continue => pos += ch.len(),
            Step::Stop => return &bytes[pos..],
            Step::JumpTo(offset) => {
                debug_assert!(
                    offset > pos && offset <= bytes.len(),
                    "jump to {offset} from {pos} would not progress"
                );
                pos = offset.clamp(pos + 1, bytes.len());
            }
        }
    }
    &bytes[pos..]
}
