//! Benchmarks for measuring, wrapping and glyph run packing.
//!
//! Run with: cargo bench -p rdpx-text --bench wrap_bench
//!
//! Workloads:
//! - **Prose**: ASCII paragraphs, the common login-banner case.
//! - **Accented**: two-byte characters mixed into prose.
//! - **Unbroken**: one long word that must be split between characters.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rdpx_text::font::{GlyphMetrics, GlyphTable};
use rdpx_text::glyph_run::{GlyphCache, GlyphIndexRun, Rect, draw_text};
use rdpx_text::{measure, wrap};
use std::hint::black_box;

fn font() -> GlyphTable {
    GlyphTable::new(18)
        .with_unknown(GlyphMetrics::new(0, 9))
        .with_glyphs("iljft.,' ", GlyphMetrics::new(0, 4))
        .with_glyphs("abcdeghknopqrsuvxyz", GlyphMetrics::new(0, 8))
        .with_glyphs("mwMW", GlyphMetrics::new(1, 13))
        .with_glyphs("éèàçô", GlyphMetrics::new(0, 8))
}

// ── Workload Generators ─────────────────────────────────────────────────

fn prose(size: usize) -> Vec<u8> {
    let words = ["access", "to", "this", "system", "is", "restricted", "and", "monitored"];
    let mut out = Vec::with_capacity(size + 16);
    let mut i = 0;
    while out.len() < size {
        out.extend_from_slice(words[i % words.len()].as_bytes());
        out.push(if i % 17 == 16 { b'\n' } else { b' ' });
        i += 1;
    }
    out
}

fn accented(size: usize) -> Vec<u8> {
    let words = ["accès", "réservé", "à", "la", "société", "contrôlé"];
    let mut out = Vec::with_capacity(size + 16);
    let mut i = 0;
    while out.len() < size {
        out.extend_from_slice(words[i % words.len()].as_bytes());
        out.push(b' ');
        i += 1;
    }
    out
}

fn unbroken(size: usize) -> Vec<u8> {
    b"abcdefghijklmnopqrstuvwxyz".iter().copied().cycle().take(size).collect()
}

// ── Benchmark Functions ─────────────────────────────────────────────────

type Workload = fn(usize) -> Vec<u8>;

const WORKLOADS: [(&str, Workload); 3] = [
    ("prose", prose),
    ("accented", accented),
    ("unbroken", unbroken),
];

fn bench_wrap(c: &mut Criterion) {
    let font = font();
    let mut group = c.benchmark_group("wrap");
    for (name, workload) in WORKLOADS {
        for size in [256usize, 4096] {
            let text = workload(size);
            group.throughput(Throughput::Bytes(text.len() as u64));
            for budget in [120u32, 640] {
                group.bench_with_input(
                    BenchmarkId::new(format!("{name}/{budget}px"), size),
                    &text,
                    |b, text| b.iter(|| black_box(wrap(&font, black_box(text), budget).len())),
                );
            }
        }
    }
    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let font = font();
    let mut group = c.benchmark_group("measure");
    for (name, workload) in WORKLOADS {
        let text = workload(4096);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new(name, text.len()), &text, |b, text| {
            b.iter(|| black_box(measure(&font, black_box(text))));
        });
    }
    group.finish();
}

fn bench_draw_text(c: &mut Criterion) {
    let font = font();
    let line = prose(400);
    let clip = Rect::new(0, 0, 1024, 768);
    c.bench_function("draw_text/prose_400", |b| {
        let mut cache = GlyphCache::default();
        let mut runs: Vec<GlyphIndexRun> = Vec::with_capacity(8);
        b.iter(|| {
            runs.clear();
            draw_text(&mut runs, &mut cache, &font, 4, 4, black_box(&line), clip)
                .expect("default cache has the text cache id");
            black_box(runs.len())
        });
    });
}

criterion_group!(benches, bench_wrap, bench_measure, bench_draw_text);
criterion_main!(benches);
