#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rdpx_text::font::{CellFont, GlyphMetrics, GlyphTable};
use rdpx_text::lines::line_capacity_for;
use rdpx_text::utf8::Utf8Chars;
use rdpx_text::{measure, wrap};

#[derive(Debug, Arbitrary)]
struct Input {
    max_width: u16,
    space: i8,
    glyph: (i8, i8),
    text: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Cap length to keep fuzzing fast.
    if input.text.len() > 4096 {
        return;
    }
    let text = &input.text;
    let max_width = u32::from(input.max_width);

    let table = GlyphTable::new(16)
        .with_unknown(GlyphMetrics::new(0, 9))
        .with_glyph(' ', GlyphMetrics::new(0, i16::from(input.space)))
        .with_glyphs(
            "abcdefghijklmnopqrstuvwxyz",
            GlyphMetrics::new(i16::from(input.glyph.0), i16::from(input.glyph.1)),
        );
    let _ = wrap(&table, text, max_width);

    // With non-negative widths, only single characters may exceed the budget.
    let font = CellFont::new(6, 12);
    let result = wrap(&font, text, max_width);
    assert!(result.len() <= line_capacity_for(text.len()));

    let mut prev_end = 0;
    for (range, line) in result.ranges().iter().zip(&result) {
        assert!(range.start >= prev_end, "fragments overlap at {range:?}");
        prev_end = range.end;

        let width = measure(&font, line).width;
        let chars = Utf8Chars::new(line).count();
        assert!(
            chars <= 1 || width <= i32::from(input.max_width),
            "line of {chars} chars is {width}px at budget {max_width}"
        );
    }
});
