// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use grove_bvh::{BvhConfig, FlatMap, Map, TopDownBvhTree};
use grove_collide::{Aabb, Circle, Polygon, Ray, Shape};
use kurbo::{Point, Vec2};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Mixed boxes, circles, and hexagons scattered over a square world.
fn gen_random_shapes(count: usize, world: f64) -> Vec<Shape> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let hexagon: Vec<Vec2> = (0..6)
        .map(|i| Vec2::from_angle(i as f64 * core::f64::consts::TAU / 6.0) * 6.0)
        .collect();
    (0..count)
        .map(|i| {
            let p = Point::new(rng.next_f64() * world, rng.next_f64() * world);
            match i % 3 {
                0 => Aabb::new(p, 12.0, 12.0).into(),
                1 => Circle::new(p, 6.0).into(),
                _ => Polygon::new(p, hexagon.clone()).into(),
            }
        })
        .collect()
}

fn gen_clustered_shapes(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Shape> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for _ in 0..n_clusters {
        let (cx, cy) = (rng.next_f64() * 2000.0, rng.next_f64() * 2000.0);
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb::new(Point::new(cx + dx, cy + dy), 12.0, 12.0).into());
        }
    }
    out
}

fn fill<M: Map<u32>>(map: &mut M, shapes: &[Shape]) {
    for (i, s) in shapes.iter().enumerate() {
        map.add(i as u32, s.clone());
    }
    map.rebuild();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &n in &[1024usize, 4096, 16384] {
        let shapes = gen_random_shapes(n, 2000.0);
        group.throughput(Throughput::Elements(n as u64));
        for (name, config) in [
            ("default", BvhConfig::default()),
            ("deep", BvhConfig::new(4, 16)),
        ] {
            group.bench_function(format!("{name}_n{n}"), |b| {
                b.iter_batched(
                    || {
                        let mut t = TopDownBvhTree::with_config(config);
                        for (i, s) in shapes.iter().enumerate() {
                            t.add(i as u32, s.clone());
                        }
                        t
                    },
                    |mut t| {
                        t.rebuild();
                        black_box(t.node_count());
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let shapes = gen_random_shapes(4096, 2000.0);
    let mut flat = FlatMap::new();
    fill(&mut flat, &shapes);
    let mut shallow = TopDownBvhTree::new();
    fill(&mut shallow, &shapes);
    let mut deep = TopDownBvhTree::with_config(BvhConfig::new(4, 16));
    fill(&mut deep, &shapes);

    let view: Shape = Aabb::new(Point::new(1000.0, 1000.0), 400.0, 300.0).into();
    let probe = Point::new(777.0, 1234.0);
    let ray = Ray::from_points(Point::new(0.0, 0.0), Point::new(2000.0, 1500.0));

    let mut group = c.benchmark_group("query_random_4096");
    group.bench_function("flat_region", |b| {
        b.iter(|| black_box(flat.query(black_box(&view)).map(|v| v.len())))
    });
    group.bench_function("bvh_default_region", |b| {
        b.iter(|| black_box(shallow.query(black_box(&view)).map(|v| v.len())))
    });
    group.bench_function("bvh_deep_region", |b| {
        b.iter(|| black_box(deep.query(black_box(&view)).map(|v| v.len())))
    });
    group.bench_function("flat_point", |b| {
        b.iter(|| black_box(flat.query_point(black_box(probe)).map(|v| v.len())))
    });
    group.bench_function("bvh_deep_point", |b| {
        b.iter(|| black_box(deep.query_point(black_box(probe)).map(|v| v.len())))
    });
    group.bench_function("flat_ray", |b| {
        b.iter(|| black_box(flat.query_ray(black_box(&ray))))
    });
    group.bench_function("bvh_deep_ray", |b| {
        b.iter(|| black_box(deep.query_ray(black_box(&ray))))
    });
    group.finish();
}

fn bench_clustered(c: &mut Criterion) {
    let shapes = gen_clustered_shapes(32, 256, 80.0);
    let mut flat = FlatMap::new();
    fill(&mut flat, &shapes);
    let mut deep = TopDownBvhTree::with_config(BvhConfig::new(4, 16));
    fill(&mut deep, &shapes);
    let view: Shape = Aabb::new(Point::new(1000.0, 1000.0), 600.0, 600.0).into();

    let mut group = c.benchmark_group("query_clustered_8192");
    group.bench_function("flat_region", |b| {
        b.iter(|| black_box(flat.query(black_box(&view)).map(|v| v.len())))
    });
    group.bench_function("bvh_deep_region", |b| {
        b.iter(|| black_box(deep.query(black_box(&view)).map(|v| v.len())))
    });
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let shapes = gen_random_shapes(4096, 2000.0);
    let view: Shape = Aabb::new(Point::new(1000.0, 1000.0), 400.0, 300.0).into();
    let mut group = c.benchmark_group("tick_4096");
    group.bench_function("update_rebuild_query", |b| {
        b.iter_batched(
            || {
                let mut t = TopDownBvhTree::with_config(BvhConfig::new(4, 16));
                fill(&mut t, &shapes);
                t
            },
            |mut t| {
                t.update(|k, s| s.translate(Vec2::new(f64::from(*k % 7) - 3.0, 1.0)));
                t.rebuild();
                black_box(t.query(&view).map(|v| v.len()))
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_rebuild,
    bench_queries,
    bench_clustered,
    bench_tick
);
criterion_main!(benches);
