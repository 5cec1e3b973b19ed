//! Rasterizer benchmarks.

use criterion::{criterion_group, criterion_main, Criterion};
use raster2d::prelude::*;

fn bench_triangle_scene(c: &mut Criterion) {
    let ctx = FloatPrecision::default();
    let window = scenes::default_window(&ctx).expect("window");
    let mut store = EntityStore::new();
    scenes::single_triangle(&mut store, &ctx).expect("scene");
    let renderer = Renderer::new(&store, &window, 150, 150, ctx).expect("renderer");

    c.bench_function("render_triangle_150x150", |b| {
        b.iter(|| std::hint::black_box(renderer.render()));
    });
}

fn bench_star_polygon_scene(c: &mut Criterion) {
    let ctx = FloatPrecision::default();
    let window = scenes::default_window(&ctx).expect("window");
    let mut store = EntityStore::new();
    scenes::star_polygon_with_hole(&mut store, &ctx).expect("scene");
    let renderer = Renderer::new(&store, &window, 150, 150, ctx).expect("renderer");

    c.bench_function("render_star_with_hole_150x150", |b| {
        b.iter(|| std::hint::black_box(renderer.render()));
    });
}

criterion_group!(benches, bench_triangle_scene, bench_star_polygon_scene);
criterion_main!(benches);
