#![forbid(unsafe_code)]

//! Packing text into glyph-index runs backed by a glyph cache.
//!
//! RDP draws server-side text as GlyphIndex orders: the client holds a set of
//! glyph caches, and each order names a cache and lists `(slot, delta)` byte
//! pairs, where `delta` moves the pen from the previous glyph. This module
//! assigns cache slots and cuts text into such runs; encoding the order and
//! emitting the cache updates is the sink's job.
//!
//! ```text
//! text ──▶ draw_text ──▶ GlyphCache::add_glyph (slot per code point)
//!              │
//!              ▼
//!        GlyphIndexRun ──▶ GlyphRunSink::draw_glyph_run
//! ```
//!
//! The cache is an explicit value owned by the caller (one per session), so
//! two sessions never share slot assignments.

use std::num::NonZeroUsize;

use lru::LruCache;
use smallvec::SmallVec;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::font::{Font, GlyphMetrics};
use crate::utf8::{DecodedChar, REPLACEMENT_CHARACTER, Utf8Chars};

/// Cache id used for server-drawn text.
pub const TEXT_CACHE_ID: u8 = 7;

/// Data bytes per run: 127 `(slot, delta)` pairs.
pub const MAX_RUN_DATA: usize = 254;

// ---------------------------------------------------------------------------
// GlyphCache
// ---------------------------------------------------------------------------

/// Result of [`GlyphCache::add_glyph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphCacheOutcome {
    /// Already cached; the client has it.
    Found,
    /// Stored in a free slot; the client must be sent the glyph.
    Added,
    /// Stored in the least recently used slot, evicting its glyph.
    Replaced,
}

impl GlyphCacheOutcome {
    /// True when the client needs the glyph bitmap before drawing.
    #[must_use]
    pub const fn needs_upload(self) -> bool {
        !matches!(self, Self::Found)
    }
}

/// Slot assignment for a set of client glyph caches.
#[derive(Debug)]
pub struct GlyphCache {
    caches: Vec<LruCache<u32, u8>>,
}

impl GlyphCache {
    /// Build caches sized by `config`.
    pub fn new(config: &LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self::with_sizes(config.glyph_caches, config.glyph_cache_entries))
    }

    fn with_sizes(caches: usize, entries: usize) -> Self {
        let cap = NonZeroUsize::new(entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            caches: (0..caches).map(|_| LruCache::new(cap)).collect(),
        }
    }

    /// Number of caches.
    #[must_use]
    pub fn cache_count(&self) -> usize {
        self.caches.len()
    }

    /// Slots in use in `cache_id`, or `None` for an unknown cache.
    #[must_use]
    pub fn len(&self, cache_id: u8) -> Option<usize> {
        self.caches.get(usize::from(cache_id)).map(LruCache::len)
    }

    /// Slot holding `code_point`, without touching recency.
    #[must_use]
    pub fn slot_of(&self, cache_id: u8, code_point: u32) -> Option<u8> {
        self.caches
            .get(usize::from(cache_id))?
            .peek(&code_point)
            .copied()
    }

    /// Assign a slot to `code_point` in cache `cache_id`.
    pub fn add_glyph(
        &mut self,
        cache_id: u8,
        code_point: u32,
    ) -> Result<(GlyphCacheOutcome, u8), LayoutError> {
        let caches = self.caches.len();
        let slots = self
            .caches
            .get_mut(usize::from(cache_id))
            .ok_or(LayoutError::UnknownCache { cache_id, caches })?;

        if let Some(&slot) = slots.get(&code_point) {
            return Ok((GlyphCacheOutcome::Found, slot));
        }

        // Slots are handed out in order until the cache is full, then recycled.
        let (outcome, slot) = if slots.len() < slots.cap().get() {
            let slot = u8::try_from(slots.len()).unwrap_or(u8::MAX);
            (GlyphCacheOutcome::Added, slot)
        } else {
            match slots.peek_lru() {
                Some((_, &slot)) => (GlyphCacheOutcome::Replaced, slot),
                None => (GlyphCacheOutcome::Added, 0),
            }
        };

        if let Some((evicted, _)) = slots.push(code_point, slot) {
            tracing::trace!(cache_id, slot, evicted, code_point, "glyph cache slot replaced");
        }
        Ok((outcome, slot))
    }

    /// Forget every assignment (e.g. after the client resets its caches).
    pub fn clear(&mut self) {
        for cache in &mut self.caches {
            cache.clear();
        }
    }
}

impl Default for GlyphCache {
    fn default() -> Self {
        let config = LayoutConfig::default();
        Self::with_sizes(config.glyph_caches, config.glyph_cache_entries)
    }
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// Screen rectangle, exclusive right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub cx: u16,
    pub cy: u16,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i16, y: i16, cx: u16, cy: u16) -> Self {
        Self { x, y, cx, cy }
    }

    /// First column past the rectangle.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x as i32 + self.cx as i32
    }
}

/// One glyph-index order's worth of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphIndexRun {
    pub cache_id: u8,
    /// Pen position of the first glyph.
    pub glyph_x: i16,
    pub glyph_y: i16,
    /// Background box: run width plus two pixels, font height tall.
    pub bounds: Rect,
    /// `(slot, delta)` pairs.
    pub data: SmallVec<[u8; 256]>,
}

impl GlyphIndexRun {
    /// Number of glyphs in the run.
    #[must_use]
    pub fn glyph_count(&self) -> usize {
        self.data.len() / 2
    }
}

/// Receiver of packed runs, typically an RDP order encoder.
pub trait GlyphRunSink {
    /// Draw `run` clipped to `clip`. `cache` holds the slot assignments the run refers to.
    fn draw_glyph_run(&mut self, run: &GlyphIndexRun, clip: Rect, cache: &GlyphCache);
}

impl GlyphRunSink for Vec<GlyphIndexRun> {
    fn draw_glyph_run(&mut self, run: &GlyphIndexRun, _clip: Rect, _cache: &GlyphCache) {
        self.push(run.clone());
    }
}

/// Cache key and metrics for a decoded character.
fn glyph_for<F: Font + ?Sized>(font: &F, ch: &DecodedChar<'_>) -> (u32, GlyphMetrics) {
    if ch.is_valid() {
        let code_point = ch.code_point();
        (code_point, font.glyph_or_unknown(code_point))
    } else {
        (REPLACEMENT_CHARACTER, font.unknown_glyph())
    }
}

fn saturate_i16(value: i32) -> i16 {
    i16::try_from(value).unwrap_or(if value < 0 { i16::MIN } else { i16::MAX })
}

fn saturate_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

/// Draw a single line of `text` with its pen starting at `(x, y)`.
///
/// Glyphs entirely left of `clip` are skipped when the pen starts at or before
/// the clip's left edge, and drawing stops once the pen passes its right edge.
/// Slots are assigned in [`TEXT_CACHE_ID`].
pub fn draw_text<S, F>(
    sink: &mut S,
    cache: &mut GlyphCache,
    font: &F,
    x: i16,
    y: i16,
    text: &[u8],
    clip: Rect,
) -> Result<(), LayoutError>
where
    S: GlyphRunSink + ?Sized,
    F: Font + ?Sized,
{
    let mut chars = Utf8Chars::new(text);
    let mut x = i32::from(x);
    let clip_x = i32::from(clip.x);
    let right = clip.right();

    if x <= clip_x {
        loop {
            let mark = chars.position();
            let Some(ch) = chars.next() else { break };
            let next_x = x.saturating_add(glyph_for(font, &ch).1.width());
            if next_x > clip_x {
                chars.seek(mark);
                break;
            }
            x = next_x;
        }
    }

    let height = font.max_height();
    let mut runs = 0usize;
    while !chars.remaining().is_empty() {
        let mut data = SmallVec::<[u8; 256]>::new();
        let mut total_width = 0i32;
        let mut prev_inc = 0i32;

        while data.len() < MAX_RUN_DATA && x.saturating_add(total_width) <= right {
            let Some(ch) = chars.next() else { break };
            let (key, glyph) = glyph_for(font, &ch);
            let (_, slot) = cache.add_glyph(TEXT_CACHE_ID, key)?;
            data.push(slot);
            // Pen advance since the previous glyph, 8-bit wrapping as on the wire.
            data.push((prev_inc + i32::from(glyph.offset_x)) as u8);
            prev_inc = i32::from(glyph.inc_by);
            total_width = total_width.saturating_add(glyph.width());
        }

        if data.is_empty() {
            break;
        }

        let run = GlyphIndexRun {
            cache_id: TEXT_CACHE_ID,
            glyph_x: saturate_i16(x),
            glyph_y: y,
            bounds: Rect::new(
                saturate_i16(x),
                y,
                saturate_u16(total_width.saturating_add(2)),
                height,
            ),
            data,
        };
        sink.draw_glyph_run(&run, clip, cache);
        runs += 1;

        if x.saturating_add(total_width) > right {
            break;
        }
        // Consecutive runs overlap by one pixel.
        x = x.saturating_add(total_width).saturating_sub(1);
    }

    tracing::trace!(bytes = text.len(), runs, "drew text");
    Ok(())
}
