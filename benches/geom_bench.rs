#![deny(warnings)]

use cadpath::*;
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

fn curve_benchmark(c: &mut Criterion) {
    let cubic = Cubic::new((158.0, 70.0), (210.0, 250.0), (25.0, 190.0), (219.0, 89.0));
    let mut group = c.benchmark_group("cubic");
    group
        .throughput(Throughput::Elements(1))
        .bench_function("bbox", |b| b.iter(|| black_box(cubic).bbox(None)))
        .bench_function("length", |b| b.iter(|| black_box(cubic).length()))
        .bench_function("offset", |b| {
            b.iter(|| cubic_offset(&black_box(cubic), 10.0, OffsetAlgorithm::Baioca))
        });
    group.finish();
}

fn intersect_benchmark(c: &mut Criterion) {
    let arch: Primitive = Cubic::new((0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)).into();
    let valley: Primitive = Cubic::new((0.0, 2.0), (1.0, 0.0), (2.0, 0.0), (3.0, 2.0)).into();
    let line: Primitive = Line::new((0.0, 1.0), (3.0, 1.0)).into();
    let mut group = c.benchmark_group("intersect");
    group
        .throughput(Throughput::Elements(1))
        .bench_function("curve/line", |b| {
            b.iter(|| primitive_intersect(&black_box(arch), &line, DEFAULT_TOLERANCE))
        })
        .bench_function("curve/curve", |b| {
            b.iter(|| primitive_intersect(&black_box(arch), &valley, DEFAULT_TOLERANCE))
        });
    group.finish();
}

fn edges_benchmark(c: &mut Criterion) {
    let mut builder = Path::builder();
    builder.move_to((0.0, 5.0));
    for i in 0..64 {
        let x = 1.0 + i as Scalar / 16.0;
        builder.line_to((x, 6.0 - x));
    }
    for i in (0..64).rev() {
        let x = 1.0 + i as Scalar / 16.0;
        builder.line_to((x, x - 6.0));
    }
    let source = std::rc::Rc::new(builder.build());

    let mut group = c.benchmark_group("edges");
    group.throughput(Throughput::Elements(source.segments_count() as u64));
    group.bench_function("path", |b| {
        b.iter(|| {
            let mut edges = Edges::new(&source);
            edges.path().segments_count()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    curve_benchmark,
    intersect_benchmark,
    edges_benchmark
);
criterion_main!(benches);
