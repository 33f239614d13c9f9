//! Benchmarks for inline style toggling.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mdlive::editor::{EditorBuffer, TextRange, toggle_style};

fn bench_wrap_and_unwrap(c: &mut Criterion) {
    c.bench_function("toggle_bold_round_trip", |b| {
        b.iter(|| {
            let mut buf = EditorBuffer::from_text("hello world");
            let wrapped = toggle_style(&mut buf, TextRange::on_line(0, 6, 11), "**", "**");
            toggle_style(&mut buf, black_box(wrapped), "**", "**")
        })
    });
}

fn bench_toggle_in_large_buffer(c: &mut Criterion) {
    let text = "Some words on a line of text.\n".repeat(5_000);
    let mut buf = EditorBuffer::from_text(&text);
    let range = TextRange::on_line(2_500, 5, 10);
    c.bench_function("toggle_underline_large_buffer", |b| {
        b.iter(|| {
            let next = toggle_style(&mut buf, black_box(range), "<u>", "</u>");
            toggle_style(&mut buf, next, "<u>", "</u>")
        })
    });
}

criterion_group!(benches, bench_wrap_and_unwrap, bench_toggle_in_large_buffer);
criterion_main!(benches);
