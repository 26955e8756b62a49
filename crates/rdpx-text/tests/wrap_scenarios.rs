//! End-to-end wrapping scenarios against a proportional bitmap font.
//!
//! The fixture font mimics a small sans-serif face: narrow `i`/`l`, wide
//! `m`/`w`, 5px spaces, 18px line height and a 9px unknown glyph.

use rdpx_text::font::{GlyphMetrics, GlyphTable};
use rdpx_text::{LayoutConfig, LayoutError, TextMetrics, wrap, wrap_bounded};

fn sans() -> GlyphTable {
    let w = |n: i16| GlyphMetrics::new(0, n);
    GlyphTable::new(18)
        .with_unknown(w(9))
        .with_glyphs("fijl", w(4))
        .with_glyph('t', w(5))
        .with_glyph('r', w(6))
        .with_glyphs("sz", w(7))
        .with_glyphs("ackvxy", w(8))
        // `b` carries a 1px left bearing: 1 + 8.
        .with_glyph('b', GlyphMetrics::new(1, 8))
        .with_glyphs("deghnopqu", w(9))
        .with_glyph('w', w(12))
        .with_glyph('m', w(14))
        .with_glyph(' ', w(5))
        .with_glyphs(".,", w(4))
        .with_glyph('-', w(5))
        .with_glyph('A', w(11))
        .with_glyph('\'', w(3))
        .with_glyph('é', w(9))
        .with_glyph('à', w(8))
}

fn lines(text: &[u8], max_width: u32) -> Vec<String> {
    wrap(&sans(), text, max_width)
        .lines()
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect()
}

#[track_caller]
fn assert_wraps(text: &str, max_width: u32, expected: &[&str]) {
    assert_eq!(lines(text.as_bytes(), max_width), expected, "{text:?} at {max_width}px");
}

// ═════════════════════════════════════════════════════════════════════════
// Metrics
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn text_metrics_match_glyph_sums() {
    let font = sans();
    assert_eq!(TextMetrics::new(&font, b"abc"), TextMetrics { width: 25, height: 18 });
    assert_eq!(TextMetrics::new(&font, b"abcde").width, 43);
    assert_eq!(TextMetrics::new(&font, b"Ay").width, 19);
    assert_eq!(TextMetrics::new(&font, "déjà".as_bytes()).width, 30);
    assert_eq!(TextMetrics::new(&font, b"").height, 18);
}

// ═════════════════════════════════════════════════════════════════════════
// Breaking
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn zero_budget_gives_one_character_per_line() {
    assert_wraps("ab", 0, &["a", "b"]);
    assert_wraps("ab cd", 1, &["a", "b", "c", "d"]);
    assert_wraps("abc", 1, &["a", "b", "c"]);
}

#[test]
fn short_text_stays_on_one_line() {
    assert_wraps("abc", 100, &["abc"]);
    let result = wrap(&sans(), b"abc", 100);
    assert_eq!(result.max_width(), 25);
}

#[test]
fn long_word_is_split_between_characters() {
    assert_wraps("abc", 17, &["ab", "c"]);
    assert_wraps(
        "veryverylonglonglong string",
        100,
        &["veryverylongl", "onglong", "string"],
    );
}

#[test]
fn newlines_end_lines() {
    for budget in [100, 17, 1] {
        assert_wraps("a\nb\nc", budget, &["a", "b", "c"]);
    }
    assert_wraps("abc\ndef\n", 100, &["abc", "def"]);
}

#[test]
fn consecutive_newlines_produce_blank_lines() {
    assert_wraps("\n\n", 10, &["", ""]);
    let result = wrap(&sans(), b"bla bla\n\n - abc\n - def", 100);
    let got: Vec<&[u8]> = result.lines().collect();
    assert_eq!(got, [&b"bla bla"[..], b"", b" - abc", b" - def"]);
    assert_eq!(result.ranges(), &[0..7, 8..8, 9..15, 16..22]);
}

#[test]
fn space_runs_are_dropped_at_a_break() {
    assert_wraps("ab cd", 17, &["ab", "cd"]);
    assert_wraps("ab   cd", 17, &["ab", "cd"]);
    assert_wraps("a    b", 20, &["a", "b"]);
    let result = wrap(&sans(), b"ab   cd", 17);
    assert_eq!(result.ranges(), &[0..2, 5..7]);
}

#[test]
fn whitespace_only_input_has_no_lines() {
    assert!(wrap(&sans(), b"   ", 10).is_empty());
    assert!(wrap(&sans(), b"", 10).is_empty());
}

#[test]
fn greedy_fill_of_a_sentence() {
    let text = "annvhg jgsy kfhdis hnvlkj gks hxk.hf";
    assert_wraps(
        text,
        50,
        &["annvh", "g jgsy", "kfhdis", "hnvlkj", "gks", "hxk.hf"],
    );
    assert_wraps(text, 150, &["annvhg jgsy kfhdis", "hnvlkj gks hxk.hf"]);
    assert_eq!(wrap(&sans(), text.as_bytes(), 150).max_width(), 131);
}

#[test]
fn indentation_that_does_not_fit_becomes_a_blank_line() {
    assert_wraps(
        "  veryverylonglonglong string",
        100,
        &["", "veryverylongl", "onglong", "string"],
    );
    assert_wraps(
        "  veryverylonglonglong string",
        130,
        &["", "veryverylonglongl", "ong string"],
    );
}

#[test]
fn indentation_after_a_newline_is_kept() {
    assert_wraps(
        "  veryverylonglonglong\n string",
        100,
        &["", "veryverylongl", "onglong", " string"],
    );
    assert_wraps(
        "  veryverylonglonglong \nstring",
        100,
        &["", "veryverylongl", "onglong", "string"],
    );
}

#[test]
fn multibyte_text_breaks_on_character_boundaries() {
    assert_wraps("l'été à la mer", 40, &["l'été", "à la", "mer"]);
    let result = wrap(&sans(), "déjà vu".as_bytes(), 30);
    assert_eq!(result.ranges(), &[0..6, 7..9]);
    assert_eq!(result.max_width(), 30);
}

#[test]
fn malformed_bytes_are_measured_with_the_unknown_glyph() {
    let result = wrap(&sans(), b"ab\x80cd ef", 30);
    assert_eq!(result.ranges(), &[0..3, 3..5, 6..8]);
    assert_eq!(result.max_width(), 26);

    // A truncated sequence at the end is one character.
    let result = wrap(&sans(), b"ab\xE2\x82", 100);
    assert_eq!(result.ranges(), &[0..4]);
    assert_eq!(result.max_width(), 26);

    let result = wrap(&sans(), b"\xFF\xFE", 5);
    assert_eq!(result.ranges(), &[0..2]);
}

#[test]
fn no_line_exceeds_the_budget_unless_it_is_one_character() {
    let text = "annvhg jgsy kfhdis hnvlkj gks hxk.hf veryverylonglonglong";
    let font = sans();
    for budget in [0, 9, 20, 37, 64, 100, 250] {
        let result = wrap(&font, text.as_bytes(), budget);
        for line in &result {
            let width = TextMetrics::new(&font, line).width;
            let one_char = std::str::from_utf8(line).unwrap().chars().count() == 1;
            assert!(
                one_char || width <= budget as i32,
                "{:?} is {width}px at budget {budget}",
                String::from_utf8_lossy(line)
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Bounded entry point
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn bounded_wrap_rejects_oversized_input() {
    let config = LayoutConfig {
        max_input_bytes: 8,
        ..LayoutConfig::default()
    };
    let err = wrap_bounded(&sans(), b"far too long", 100, &config).unwrap_err();
    assert_eq!(err, LayoutError::InputTooLarge { len: 12, limit: 8 });
    assert_eq!(
        err.to_string(),
        "text of 12 bytes exceeds the layout limit of 8 bytes"
    );

    let ok = wrap_bounded(&sans(), b"abc def", 100, &config).unwrap();
    assert_eq!(ok.len(), 1);
}
