use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sigfooter_core::{process_bytes, RelocationSettings};

#[path = "../tests/common/mod.rs"]
mod common;

use common::{empty_paragraph, paragraph, signature_table, DocxBuilder, SECTION};

/// A report with `paragraphs` of body text, two early signature tables and a
/// trailing one.
fn report(paragraphs: usize) -> Vec<u8> {
    let mut body = signature_table("COMPANY A", "rId7");
    for i in 0..paragraphs {
        body.push_str(&paragraph(&format!("Finding {} recorded during the inspection.", i)));
        if i == paragraphs / 2 {
            body.push_str(&signature_table("COMPANY B", "rId8"));
        }
    }
    for i in 0..5 {
        body.push_str(&empty_paragraph(i));
    }
    body.push_str(&signature_table("COMPANY C", "rId9"));
    body.push_str(SECTION);
    DocxBuilder::new(&body).build()
}

fn relocate_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("relocate");
    let settings = RelocationSettings::default();

    for paragraphs in [10usize, 500, 5000] {
        let input = report(paragraphs);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.sample_size(20);

        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &input, |b, input| {
            b.iter(|| process_bytes(input, &settings).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, relocate_benchmark);
criterion_main!(benches);
