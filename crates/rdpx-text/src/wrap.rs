#![forbid(unsafe_code)]

//! Greedy word wrapping to a pixel width budget.
//!
//! The breaker walks the input once (with a bounded rewind to the start of a
//! word that did not fit) and emits byte ranges of the input, never copies.
//!
//! Rules:
//! - Each `\n` ends the current line. A `\n` at the start of a line produces
//!   a blank line.
//! - Leading spaces are kept as indentation of the first word. If the
//!   indentation plus that word does not fit, the indentation becomes a blank
//!   line of its own and the word starts a fresh line.
//! - A run of spaces between two words is kept only when the next word fits
//!   on the same line; otherwise the run is dropped and the next word opens a
//!   new line.
//! - A word wider than the whole budget is split between characters.
//! - A single character wider than the budget gets a line of its own, so a
//!   budget of 0 yields one character per line.
//!
//! # Example
//! ```
//! use rdpx_text::font::{GlyphMetrics, GlyphTable};
//! use rdpx_text::wrap::wrap;
//!
//! let font = GlyphTable::new(16)
//!     .with_glyphs(" abcdefghijklmnopqrstuvwxyz", GlyphMetrics::new(0, 10));
//!
//! let result = wrap(&font, b"  indented words\n\nend", 80);
//! let lines: Vec<&[u8]> = result.lines().collect();
//! assert_eq!(lines, [&b""[..], b"indented", b"words", b"", b"end"]);
//! ```

use std::ops::Range;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::font::Font;
use crate::lines::WrapResult;
use crate::metrics::{char_width, decoded_width};
use crate::utf8::{DecodedChar, decode_one};

/// Wrap `text` to lines no wider than `max_width` pixels.
///
/// Empty input yields an empty result without allocating.
#[inline]
#[must_use]
pub fn wrap<'a, F: Font + ?Sized>(font: &F, text: &'a [u8], max_width: u32) -> WrapResult<'a> {
    WrapResult::new(font, text, max_width)
}

/// Like [`wrap`], but refuses inputs larger than `config.max_input_bytes`.
pub fn wrap_bounded<'a, F: Font + ?Sized>(
    font: &F,
    text: &'a [u8],
    max_width: u32,
    config: &LayoutConfig,
) -> Result<WrapResult<'a>, LayoutError> {
    if text.len() > config.max_input_bytes {
        return Err(LayoutError::InputTooLarge {
            len: text.len(),
            limit: config.max_input_bytes,
        });
    }
    Ok(wrap(font, text, max_width))
}

/// Breaker states. Every emitted line returns to `LeadingWhitespace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Skipping indentation; blank line per `\n`.
    LeadingWhitespace,
    /// Inside the first word of a line; indentation still pending.
    FirstWord,
    /// At the first space after a word.
    WordBoundary,
    /// Inside a later word of the same line.
    NextWord,
}

/// How the breaker treats one decoded character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Newline,
    Other(i32),
}

#[inline]
fn classify<F: Font + ?Sized>(font: &F, ch: &DecodedChar<'_>) -> CharClass {
    match ch.bytes() {
        b" " => CharClass::Space,
        b"\n" => CharClass::Newline,
        _ => CharClass::Other(decoded_width(font, ch)),
    }
}

#[inline]
fn overflows(line_width: i32, extra: i32, budget: i32) -> bool {
    line_width.saturating_add(extra) > budget
}

/// Charge `count` spaces one at a time, saturating exactly as
/// [`crate::metrics::measure`] sums a line.
#[inline]
fn add_spaces(width: i32, count: usize, space_width: i32) -> i32 {
    (0..count).fold(width, |width, _| width.saturating_add(space_width))
}

/// Collects emitted lines and tracks the widest one.
struct LineWriter<'o, 't, 'f, F: ?Sized> {
    out: &'o mut Vec<Range<usize>>,
    text: &'t [u8],
    font: &'f F,
    widest: i32,
}

impl<F: Font + ?Sized> LineWriter<'_, '_, '_, F> {
    fn push(&mut self, range: Range<usize>, width: i32) {
        debug_assert_eq!(
            crate::metrics::measure(self.font, &self.text[range.clone()]).width,
            width,
            "tracked width diverged for {range:?}"
        );
        self.widest = self.widest.max(width);
        self.out.push(range);
    }

    fn blank(&mut self, at: usize) {
        self.out.push(at..at);
    }
}

/// Break `text` into `out` and return the widest emitted line.
///
/// `out` should have room for [`crate::lines::line_capacity_for`] entries.
pub(crate) fn break_lines<F: Font + ?Sized>(
    font: &F,
    text: &[u8],
    max_width: u32,
    out: &mut Vec<Range<usize>>,
) -> i32 {
    let budget = i32::try_from(max_width).unwrap_or(i32::MAX);
    let space_width = char_width(font, u32::from(b' '));
    let mut lines = LineWriter {
        out,
        text,
        font,
        widest: 0,
    };

    let mut p = 0usize;
    let mut start_line = 0usize;
    let mut start_first_word = 0usize;
    let mut start_word = 0usize;
    let mut end_word = 0usize;
    let mut indent_width = 0i32;
    let mut line_width = 0i32;
    // Width of the first word alone, from `start_first_word`.
    let mut word_width = 0i32;
    let mut width_at_end_word = 0i32;
    let mut state = State::LeadingWhitespace;

    loop {
        state = match state {
            State::LeadingWhitespace => {
                start_line = p;
                loop {
                    match text.get(p) {
                        None => return lines.widest,
                        Some(b' ') => p += 1,
                        Some(b'\n') => {
                            lines.blank(p);
                            p += 1;
                            start_line = p;
                        }
                        Some(_) => break,
                    }
                }
                start_first_word = p;
                indent_width = add_spaces(0, p - start_line, space_width);
                line_width = indent_width;
                word_width = 0;
                State::FirstWord
            }

            State::FirstWord => loop {
                let Some(ch) = decode_one(&text[p..]) else {
                    lines.push(start_line..p, line_width);
                    return lines.widest;
                };
                let w = match classify(font, &ch) {
                    CharClass::Space => break State::WordBoundary,
                    CharClass::Newline => {
                        lines.push(start_line..p, line_width);
                        p += 1;
                        break State::LeadingWhitespace;
                    }
                    CharClass::Other(w) => w,
                };

                if overflows(line_width, w, budget) {
                    // Indentation cannot share a line with this word.
                    if indent_width != 0 {
                        lines.blank(start_line);
                        line_width = word_width;
                        indent_width = 0;
                        start_line = start_first_word;
                    }
                    // The word alone is too wide: cut it before this character.
                    if overflows(line_width, w, budget) {
                        if start_first_word != p {
                            lines.push(start_first_word..p, line_width);
                        }
                        line_width = 0;
                        word_width = 0;
                        start_line = p;
                        start_first_word = p;
                    }
                }

                line_width = line_width.saturating_add(w);
                word_width = word_width.saturating_add(w);
                p += ch.len();
            },

            State::WordBoundary => {
                end_word = p;
                width_at_end_word = line_width;
                p += 1;
                while text.get(p) == Some(&b' ') {
                    p += 1;
                }
                let with_separator = add_spaces(line_width, p - end_word, space_width);

                match text.get(p) {
                    None => {
                        lines.push(start_line..end_word, width_at_end_word);
                        return lines.widest;
                    }
                    Some(b'\n') => {
                        lines.push(start_line..end_word, width_at_end_word);
                        p += 1;
                        State::LeadingWhitespace
                    }
                    Some(_) if with_separator > budget => {
                        lines.push(start_line..end_word, width_at_end_word);
                        State::LeadingWhitespace
                    }
                    Some(_) => {
                        line_width = with_separator;
                        start_word = p;
                        State::NextWord
                    }
                }
            }

            State::NextWord => loop {
                let Some(ch) = decode_one(&text[p..]) else {
                    lines.push(start_line..p, line_width);
                    return lines.widest;
                };
                let w = match classify(font, &ch) {
                    CharClass::Space => break State::WordBoundary,
                    CharClass::Newline => {
                        lines.push(start_line..p, line_width);
                        p += 1;
                        break State::LeadingWhitespace;
                    }
                    CharClass::Other(w) => w,
                };

                if overflows(line_width, w, budget) {
                    // Close the line before this word and lay the word out afresh.
                    lines.push(start_line..end_word, width_at_end_word);
                    p = start_word;
                    start_line = start_word;
                    start_first_word = start_word;
                    indent_width = 0;
                    line_width = 0;
                    word_width = 0;
                    break State::FirstWord;
                }

                line_width = line_width.saturating_add(w);
                p += ch.len();
            },
        };
    }
}
