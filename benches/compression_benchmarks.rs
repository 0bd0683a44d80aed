use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use huff_tree::{compress, decompress};

fn text_corpus() -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog. ".repeat(2000)
}

fn bench_compress(c: &mut Criterion) {
    let data = text_corpus();
    let mut group = c.benchmark_group("huffman");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("compress_text", |b| {
        b.iter(|| compress(black_box(&data)).unwrap())
    });

    let packed = compress(&data).unwrap();
    group.bench_function("decompress_text", |b| {
        b.iter(|| decompress(black_box(&packed)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_compress);
criterion_main!(benches);
