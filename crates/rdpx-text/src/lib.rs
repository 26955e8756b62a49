#![forbid(unsafe_code)]

//! Text layout for server-drawn RDP text.
//!
//! Measures UTF-8 byte strings against a bitmap font's glyph metrics, breaks
//! them greedily into lines that fit a pixel budget, and packs single lines
//! into glyph-index runs backed by a client glyph cache.
//!
//! # Role in the proxy
//! Login banners, selector screens and error pages are rendered by the proxy
//! itself. Their text arrives as raw bytes that may not be valid UTF-8, so
//! every entry point here takes `&[u8]` and degrades malformed input to the
//! font's unknown glyph instead of failing.
//!
//! # How it fits together
//! [`utf8`] decodes leniently, [`font`] supplies glyph metrics, [`metrics`]
//! measures, [`wrap`] breaks into a [`WrapResult`], and [`glyph_run`] turns a
//! line into drawing orders. [`config`] holds the limits, read from the
//! environment.

pub mod config;
pub mod error;
pub mod font;
pub mod glyph_run;
pub mod lines;
pub mod metrics;
pub mod utf8;
pub mod wrap;

pub use config::LayoutConfig;
pub use error::{LayoutError, Result};
pub use font::{CellFont, Font, GlyphMetrics, GlyphTable};
pub use glyph_run::{
    GlyphCache, GlyphCacheOutcome, GlyphIndexRun, GlyphRunSink, Rect, TEXT_CACHE_ID, draw_text,
};
pub use lines::WrapResult;
pub use metrics::{TextMetrics, char_width, measure};
pub use utf8::{DecodedChar, Utf8Chars};
pub use wrap::{wrap, wrap_bounded};
