use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec2;
use murmuration::math::Rect;
use murmuration::QuadTree;

fn grid_positions(n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|i| Vec2::new((i % 100) as f32 * 10.0, (i / 100) as f32 * 10.0))
        .collect()
}

fn boundary() -> Rect {
    Rect::from_origin(Vec2::ZERO, Vec2::new(1000.0, 1000.0))
}

fn bench_quadtree_build(c: &mut Criterion) {
    let positions = grid_positions(1000);

    c.bench_function("quadtree_build_1000", |b| {
        b.iter(|| {
            let tree = QuadTree::build(boundary(), 10, &positions);
            black_box(tree)
        })
    });
}

fn bench_quadtree_query_radius(c: &mut Criterion) {
    let positions = grid_positions(1000);
    let tree = QuadTree::build(boundary(), 10, &positions);

    c.bench_function("quadtree_query_50_radius", |b| {
        b.iter(|| {
            let hits = tree.query_radius(Vec2::new(500.0, 50.0), 50.0);
            black_box(hits.len())
        })
    });

    c.bench_function("quadtree_query_10_radius", |b| {
        b.iter(|| {
            let hits = tree.query_radius(Vec2::new(500.0, 50.0), 10.0);
            black_box(hits.len())
        })
    });
}

fn bench_quadtree_query_rect(c: &mut Criterion) {
    let positions = grid_positions(1000);
    let tree = QuadTree::build(boundary(), 10, &positions);
    let window = Rect::from_origin(Vec2::new(400.0, 0.0), Vec2::new(200.0, 100.0));

    c.bench_function("quadtree_query_rect_200x100", |b| {
        b.iter(|| {
            let hits = tree.query_rect(window);
            black_box(hits.len())
        })
    });
}

criterion_group!(
    benches,
    bench_quadtree_build,
    bench_quadtree_query_radius,
    bench_quadtree_query_rect
);
criterion_main!(benches);
