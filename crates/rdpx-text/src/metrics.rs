#![forbid(unsafe_code)]

//! Glyph width lookup and single-line text metrics.
//!
//! The width of a character is `offset_x + inc_by` of its glyph. Invalid and
//! truncated byte sequences always take the font's unknown glyph, whatever the
//! font would map U+FFFD to.
//!
//! # Example
//! ```
//! use rdpx_text::font::{GlyphMetrics, GlyphTable};
//! use rdpx_text::metrics::TextMetrics;
//!
//! let font = GlyphTable::new(18)
//!     .with_unknown(GlyphMetrics::new(0, 9))
//!     .with_glyphs("ab", GlyphMetrics::new(1, 7));
//!
//! let tm = TextMetrics::new(&font, b"ab\x80");
//! assert_eq!((tm.width, tm.height), (8 + 8 + 9, 18));
//! ```

use crate::font::Font;
use crate::utf8::{DecodedChar, Step, for_each_utf8};

/// Width of the glyph for `code_point`, using the unknown glyph when the font lacks it.
#[inline]
#[must_use]
pub fn char_width<F: Font + ?Sized>(font: &F, code_point: u32) -> i32 {
    font.glyph_or_unknown(code_point).width()
}

/// Width of a decoded character, applying the malformed-input fallback.
#[inline]
#[must_use]
pub fn decoded_width<F: Font + ?Sized>(font: &F, ch: &DecodedChar<'_>) -> i32 {
    if ch.is_valid() {
        char_width(font, ch.code_point())
    } else {
        font.unknown_glyph().width()
    }
}

/// Unwrapped extent of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextMetrics {
    /// Sum of every character's width.
    pub width: i32,
    /// The font's maximum glyph height, regardless of content.
    pub height: i32,
}

impl TextMetrics {
    /// Measure `text` as a single line.
    #[must_use]
    pub fn new<F: Font + ?Sized>(font: &F, text: &[u8]) -> Self {
        let mut width = 0i32;
        for_each_utf8(text, |ch| {
            width = width.saturating_add(decoded_width(font, &ch));
            Step::Continue
        });
        Self {
            width,
            height: i32::from(font.max_height()),
        }
    }
}

/// Measure `text` as a single line. See [`TextMetrics::new`].
#[inline]
#[must_use]
pub fn measure<F: Font + ?Sized>(font: &F, text: &[u8]) -> TextMetrics {
    TextMetrics::new(font, text)
}
