//! Cost of one anchor resolve (mirror build, layout, readback) for short
//! inputs and long wrapped text areas.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use core_geometry::Rect;
use core_host::{HeadlessHost, WidgetSpec};
use core_selection::{ResolveOptions, resolve};

fn paragraph(words: usize) -> String {
    let vocab = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit"];
    (0..words).map(|i| vocab[i % vocab.len()]).collect::<Vec<_>>().join(" ")
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for words in [8usize, 200, 2000] {
        let text = paragraph(words);
        let len = core_text::char_len(&text);
        let mut host = HeadlessHost::new();
        let w = host.add_widget(WidgetSpec::text_area(text, Rect::new(0.0, 0.0, 480.0, 4000.0)));
        let opts = ResolveOptions::default();
        let (start, end) = (len / 2, (len / 2 + 12).min(len));
        group.bench_with_input(BenchmarkId::from_parameter(words), &words, |b, _| {
            b.iter(|| black_box(resolve(&mut host, w, start, end, &opts)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
