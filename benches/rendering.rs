//! Benchmarks for preview layout and HTML rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdlive::document::{PreviewMode, layout};
use mdlive::html;

const TEMPLATE: &str = include_str!("../assets/template.md");

fn long_document() -> String {
    TEMPLATE.repeat(20)
}

fn bench_layout_rendered(c: &mut Criterion) {
    let md = long_document();
    c.bench_function("layout_rendered", |b| {
        b.iter(|| layout(black_box(&md), PreviewMode::Rendered, black_box(60)))
    });
}

fn bench_markdown_to_html(c: &mut Criterion) {
    let md = long_document();
    c.bench_function("markdown_to_html", |b| {
        b.iter(|| html::markdown_to_html(black_box(&md)))
    });
}

fn bench_visible_lines(c: &mut Criterion) {
    let doc = layout(&long_document(), PreviewMode::Rendered, 60);
    c.bench_function("visible_lines", |b| {
        b.iter(|| doc.visible_lines(black_box(100), black_box(24)).len())
    });
}

criterion_group!(
    benches,
    bench_layout_rendered,
    bench_markdown_to_html,
    bench_visible_lines
);
criterion_main!(benches);
