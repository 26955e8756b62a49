#![no_main]

use libfuzzer_sys::fuzz_target;
use rdpx_text::font::CellFont;
use rdpx_text::glyph_run::{GlyphCache, GlyphIndexRun, MAX_RUN_DATA, Rect, draw_text};
use rdpx_text::utf8::{DecodedChar, Step, Utf8Chars, for_each_utf8};
use rdpx_text::{TextMetrics, measure};

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    let font = CellFont::new(7, 14);

    // The decoder must account for every byte exactly once.
    let consumed: usize = Utf8Chars::new(data).map(|ch| ch.len()).sum();
    assert_eq!(consumed, data.len());
    // Only a truncated final character is left unread by a full traversal.
    let rest = for_each_utf8(data, |_| Step::Continue);
    match Utf8Chars::new(data).last() {
        Some(DecodedChar::Truncated(tail)) => assert_eq!(rest, tail),
        _ => assert!(rest.is_empty(), "{} bytes left unread", rest.len()),
    }

    // Measuring is additive over characters.
    let width = measure(&font, data).width;
    let summed: i32 = Utf8Chars::new(data)
        .map(|ch| TextMetrics::new(&font, ch.bytes()).width)
        .sum();
    assert_eq!(width, summed, "width must equal the sum of character widths");

    if data.is_empty() {
        assert_eq!(width, 0);
    }

    // Packing a line into runs must never panic nor overfill a run.
    let mut runs: Vec<GlyphIndexRun> = Vec::new();
    let mut cache = GlyphCache::default();
    draw_text(&mut runs, &mut cache, &font, 0, 0, data, Rect::new(0, 0, 4096, 14))
        .expect("default cache has the text cache id");
    for run in &runs {
        assert!(run.data.len() <= MAX_RUN_DATA);
    }
});
