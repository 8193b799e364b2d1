use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geodupe::duplicates::{
    candidates, DedupEngine, EngineConfig, EntityId, GeometryRecord, Payload, SpatialIndex,
    Tolerances,
};
use geodupe::geometry::{AxisAlignedBox, Curve, Point3};

// Helper to lay out a grid of points where every tenth point has a near copy
fn point_grid(count: usize) -> Vec<GeometryRecord> {
    let side = (count as f64).sqrt().ceil() as usize;
    let mut records = Vec::with_capacity(count + count / 10);
    let mut id = 0u64;
    for i in 0..count {
        let p = Point3::new((i % side) as f64, (i / side) as f64, 0.0);
        id += 1;
        records.push(GeometryRecord::new(
            EntityId(id),
            AxisAlignedBox::from_point(p),
            Payload::Point(p),
        ));
        if i % 10 == 0 {
            let q = Point3::new(p.x + 0.0005, p.y, p.z);
            id += 1;
            records.push(GeometryRecord::new(
                EntityId(id),
                AxisAlignedBox::from_point(q),
                Payload::Point(q),
            ));
        }
    }
    records
}

// Helper for overlapping line work, the expensive comparison path
fn line_bundle(count: usize) -> Vec<GeometryRecord> {
    (0..count)
        .map(|i| {
            let y = (i / 2) as f64 * 0.5;
            let curve = Curve::line(Point3::new(0.0, y, 0.0), Point3::new(10.0, y, 0.0));
            let bbox = curve.bounding_box().unwrap_or_else(|| {
                AxisAlignedBox::from_point(Point3::new(0.0, y, 0.0))
            });
            GeometryRecord::new(EntityId(i as u64 + 1), bbox, Payload::Curve(curve))
        })
        .collect()
}

// 1. Index Construction Benchmarks
fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_index");
    for count in [1_000, 10_000] {
        let records = point_grid(count);
        group.bench_with_input(BenchmarkId::new("build", count), &records, |b, records| {
            b.iter(|| black_box(SpatialIndex::build(records)));
        });
    }
    group.finish();
}

// 2. Candidate Generation Benchmarks
fn bench_candidates(c: &mut Criterion) {
    let records = point_grid(10_000);
    let index = SpatialIndex::build(&records);
    let tol = Tolerances::from_degrees(0.001, 1.0).unwrap();

    c.bench_function("candidates_10k_points", |b| {
        b.iter(|| black_box(candidates::generate(&records, &index, &tol)));
    });
}

// 3. Full Pipeline Benchmarks
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let tol = Tolerances::from_degrees(0.001, 1.0).unwrap();
    let engine = DedupEngine::new(EngineConfig::new(tol));

    let points = point_grid(10_000);
    group.bench_function("points_10k", |b| {
        b.iter(|| black_box(engine.find_duplicates_in_records(&points)));
    });

    let lines = line_bundle(1_000);
    group.bench_function("lines_1k", |b| {
        b.iter(|| black_box(engine.find_duplicates_in_records(&lines)));
    });
    group.finish();
}

criterion_group!(benches, bench_index, bench_candidates, bench_pipeline);
criterion_main!(benches);
