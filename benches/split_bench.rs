use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use regex_automata::meta::Regex;
use textspan::{SplitMode, TextBuffer};

const TEST_SIZES: &[(usize, &str)] = &[
    (1_000, "small"),
    (100_000, "medium"),
    (1_000_000, "large"),
];

fn generate_test_text(byte_count: usize) -> Vec<u8> {
    let base_lines = [
        "Received: from mx.example.org by relay",
        "",
        "key=value; other=thing;; last=1",
        "The quick brown fox jumps over the lazy dog.\r",
    ];

    let mut text = Vec::with_capacity(byte_count + 64);
    let mut line_idx = 0;

    while text.len() < byte_count {
        text.extend_from_slice(base_lines[line_idx % base_lines.len()].as_bytes());
        text.push(b'\n');
        line_idx += 1;
    }

    text.truncate(byte_count);
    text
}

fn bench_cursors(c: &mut Criterion) {
    let separator = Regex::new(";+").unwrap();

    for &(size, size_name) in TEST_SIZES {
        let text = TextBuffer::from_vec(generate_test_text(size));

        let mut group = c.benchmark_group(format!("split_{size_name}"));
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_function("lines_borrowed", |b| {
            b.iter(|| black_box(&text).lines(false).count())
        });

        group.bench_function("lines_stringify", |b| {
            b.iter(|| black_box(&text).lines(true).count())
        });

        group.bench_function("pattern_borrowed", |b| {
            b.iter(|| black_box(&text).split(&separator, false).count())
        });

        group.bench_function("rejoin_lines", |b| {
            b.iter(|| textspan::rejoin(black_box(&text), &SplitMode::Lines, b"\n").unwrap())
        });

        group.finish();
    }
}

criterion_group!(benches, bench_cursors);
criterion_main!(benches);
