//! Benchmarks for outline inference.
//!
//! Run with: cargo bench
//!
//! Documents are synthesized in memory so the numbers measure the inference
//! engine rather than PDF decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use docoutline::analysis::group_lines;
use docoutline::{Glyph, MemorySource, OutlineConfig, OutlineExtractor, PageContent};

/// A page with one large heading and `lines` rows of body text.
fn synthetic_page(number: usize, lines: usize) -> PageContent {
    let heading = format!("{}. Chapter Heading", number);
    let mut glyphs = Glyph::run(&heading, 72.0, 80.0, 18.0, 9.0);
    let mut text = heading;

    for i in 0..lines {
        let row = "body text used to fill the page with ordinary prose";
        glyphs.extend(Glyph::run(row, 72.0, 120.0 + i as f32 * 14.0, 11.0, 5.5));
        text.push('\n');
        text.push_str(row);
    }

    PageContent::letter(number as u32)
        .with_glyphs(glyphs)
        .with_text(text)
}

fn synthetic_document(pages: usize) -> MemorySource {
    MemorySource::new((1..=pages).map(|n| synthetic_page(n, 40)).collect())
}

/// Benchmark line grouping on a dense page.
fn bench_line_grouping(c: &mut Criterion) {
    let page = synthetic_page(1, 50);

    c.bench_function("group_lines_dense_page", |b| {
        b.iter(|| group_lines(black_box(&page.glyphs), 3.0).len());
    });
}

/// Benchmark full extraction at various sizes.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_extraction");

    for page_count in [1, 10, 50].iter() {
        let source = synthetic_document(*page_count);

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            let extractor = OutlineExtractor::default();
            b.iter(|| extractor.extract(black_box(&source)));
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            let extractor = OutlineExtractor::new(OutlineConfig::default().sequential());
            b.iter(|| extractor.extract(black_box(&source)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_line_grouping, bench_extraction);
criterion_main!(benches);
