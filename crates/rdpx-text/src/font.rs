#![forbid(unsafe_code)]

//! Font collaborator interface and two in-memory implementations.
//!
//! Layout only needs three things from a font: per-glyph horizontal metrics,
//! the metrics of the glyph drawn for characters the font does not cover, and
//! the line height. Anything that can answer those queries implements
//! [`Font`].
//!
//! - [`GlyphTable`]: explicit code point to metrics table, the shape of a
//!   pre-rendered bitmap font.
//! - [`CellFont`]: derives advances from terminal cell widths
//!   (`unicode-width`), for grids where every column has the same pixel size.

use rustc_hash::FxHashMap;
use unicode_width::UnicodeWidthChar;

/// Horizontal metrics of a single glyph, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphMetrics {
    /// Offset from the pen position to the left edge of the glyph.
    pub offset_x: i16,
    /// Pen increment after drawing the glyph.
    pub inc_by: i16,
}

impl GlyphMetrics {
    #[inline]
    #[must_use]
    pub const fn new(offset_x: i16, inc_by: i16) -> Self {
        Self { offset_x, inc_by }
    }

    /// Visual width used for layout: offset plus increment.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.offset_x as i32 + self.inc_by as i32
    }
}

/// Read-only glyph metrics provider.
///
/// Implementations must be safe to query concurrently if layout is run from
/// several threads; the layout code never mutates the font.
pub trait Font {
    /// Metrics for `code_point`, or `None` when the font has no such glyph.
    fn glyph(&self, code_point: u32) -> Option<GlyphMetrics>;

    /// Metrics of the glyph drawn for missing or malformed characters.
    fn unknown_glyph(&self) -> GlyphMetrics;

    /// Tallest glyph in the font; the height of every laid-out line.
    fn max_height(&self) -> u16;

    /// Metrics for `code_point`, falling back to [`Font::unknown_glyph`].
    #[inline]
    fn glyph_or_unknown(&self, code_point: u32) -> GlyphMetrics {
        self.glyph(code_point).unwrap_or_else(|| self.unknown_glyph())
    }
}

impl<F: Font + ?Sized> Font for &F {
    #[inline]
    fn glyph(&self, code_point: u32) -> Option<GlyphMetrics> {
        (**self).glyph(code_point)
    }

    #[inline]
    fn unknown_glyph(&self) -> GlyphMetrics {
        (**self).unknown_glyph()
    }

    #[inline]
    fn max_height(&self) -> u16 {
        (**self).max_height()
    }
}

impl<F: Font + ?Sized> Font for Box<F> {
    #[inline]
    fn glyph(&self, code_point: u32) -> Option<GlyphMetrics> {
        (**self).glyph(code_point)
    }

    #[inline]
    fn unknown_glyph(&self) -> GlyphMetrics {
        (**self).unknown_glyph()
    }

    #[inline]
    fn max_height(&self) -> u16 {
        (**self).max_height()
    }
}

// ---------------------------------------------------------------------------
// GlyphTable
// ---------------------------------------------------------------------------

/// Font backed by an explicit glyph table.
///
/// ```
/// use rdpx_text::font::{Font, GlyphMetrics, GlyphTable};
///
/// let font = GlyphTable::new(18)
///     .with_glyph('a', GlyphMetrics::new(0, 8))
///     .with_glyphs("bd", GlyphMetrics::new(1, 8));
/// assert_eq!(font.glyph_or_unknown('b' as u32).width(), 9);
/// assert_eq!(font.glyph('z' as u32), None);
/// assert_eq!(font.max_height(), 18);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlyphTable {
    glyphs: FxHashMap<u32, GlyphMetrics>,
    unknown: GlyphMetrics,
    max_height: u16,
}

impl GlyphTable {
    /// Empty table with the given line height and a zero-width unknown glyph.
    #[must_use]
    pub fn new(max_height: u16) -> Self {
        Self {
            glyphs: FxHashMap::default(),
            unknown: GlyphMetrics::default(),
            max_height,
        }
    }

    /// Set the glyph used for uncovered or malformed characters.
    #[must_use]
    pub fn with_unknown(mut self, unknown: GlyphMetrics) -> Self {
        self.unknown = unknown;
        self
    }

    /// Add (or replace) one glyph.
    #[must_use]
    pub fn with_glyph(mut self, ch: char, metrics: GlyphMetrics) -> Self {
        self.insert(u32::from(ch), metrics);
        self
    }

    /// Add every character of `chars` with the same metrics.
    #[must_use]
    pub fn with_glyphs(mut self, chars: &str, metrics: GlyphMetrics) -> Self {
        for ch in chars.chars() {
            self.insert(u32::from(ch), metrics);
        }
        self
    }

    /// Insert metrics for a raw code point, which need not be a valid `char`.
    pub fn insert(&mut self, code_point: u32, metrics: GlyphMetrics) {
        self.glyphs.insert(code_point, metrics);
    }

    /// Number of covered code points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl Font for GlyphTable {
    #[inline]
    fn glyph(&self, code_point: u32) -> Option<GlyphMetrics> {
        self.glyphs.get(&code_point).copied()
    }

    #[inline]
    fn unknown_glyph(&self) -> GlyphMetrics {
        self.unknown
    }

    #[inline]
    fn max_height(&self) -> u16 {
        self.max_height
    }
}

// ---------------------------------------------------------------------------
// CellFont
// ---------------------------------------------------------------------------

/// Fixed-cell font: every glyph advances by its column count times the cell width.
///
/// Wide (CJK) characters take two cells, combining marks zero. Control
/// characters and code points that are not Unicode scalar values resolve to
/// the unknown glyph, one cell wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellFont {
    cell_width: i16,
    cell_height: u16,
}

impl CellFont {
    #[must_use]
    pub const fn new(cell_width: i16, cell_height: u16) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    #[must_use]
    pub const fn cell_width(&self) -> i16 {
        self.cell_width
    }
}

impl Font for CellFont {
    fn glyph(&self, code_point: u32) -> Option<GlyphMetrics> {
        let ch = char::from_u32(code_point).filter(|ch| !ch.is_control())?;
        let columns = ch.width()?;
        let columns = i16::try_from(columns).ok()?;
        Some(GlyphMetrics::new(0, columns.saturating_mul(self.cell_width)))
    }

    fn unknown_glyph(&self) -> GlyphMetrics {
        GlyphMetrics::new(0, self.cell_width)
    }

    fn max_height(&self) -> u16 {
        self.cell_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_width_adds_offset_and_increment() {
        assert_eq!(GlyphMetrics::new(1, 7).width(), 8);
        assert_eq!(GlyphMetrics::new(-2, 7).width(), 5);
        assert_eq!(GlyphMetrics::new(i16::MAX, i16::MAX).width(), 2 * i32::from(i16::MAX));
    }

    #[test]
    fn table_falls_back_to_unknown() {
        let font = GlyphTable::new(14)
            .with_unknown(GlyphMetrics::new(0, 6))
            .with_glyph('x', GlyphMetrics::new(0, 4));
        assert_eq!(font.glyph_or_unknown(u32::from('x')).width(), 4);
        assert_eq!(font.glyph_or_unknown(u32::from('y')).width(), 6);
        assert_eq!(font.len(), 1);
        assert!(!font.is_empty());
    }

    #[test]
    fn table_accepts_non_scalar_code_points() {
        let mut font = GlyphTable::new(14);
        font.insert(0xD800, GlyphMetrics::new(0, 3));
        assert_eq!(font.glyph(0xD800), Some(GlyphMetrics::new(0, 3)));
    }

    #[test]
    fn later_glyph_replaces_earlier() {
        let font = GlyphTable::new(14)
            .with_glyphs("ab", GlyphMetrics::new(0, 4))
            .with_glyph('a', GlyphMetrics::new(0, 9));
        assert_eq!(font.glyph(u32::from('a')).map(|g| g.width()), Some(9));
        assert_eq!(font.glyph(u32::from('b')).map(|g| g.width()), Some(4));
    }

    #[test]
    fn cell_font_uses_column_widths() {
        let font = CellFont::new(8, 16);
        assert_eq!(font.glyph_or_unknown(u32::from('a')).width(), 8);
        assert_eq!(font.glyph_or_unknown(0x4E16).width(), 16);
        assert_eq!(font.glyph_or_unknown(0x0301).width(), 0);
        assert_eq!(font.glyph(0x07), None);
        assert_eq!(font.glyph(0xD800), None);
        assert_eq!(font.glyph_or_unknown(0x07).width(), 8);
        assert_eq!(font.max_height(), 16);
    }

    #[test]
    fn references_and_boxes_are_fonts() {
        fn height(font: &impl Font) -> u16 {
            font.max_height()
        }
        let table = GlyphTable::new(12);
        let boxed: Box<dyn Font> = Box::new(CellFont::new(7, 15));
        assert_eq!(height(&&table), 12);
        assert_eq!(height(&boxed), 15);
    }
}
