// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Separate bodies.
//!
//! Drop a handful of overlapping bodies into a map, find colliding pairs with
//! the broad phase, and push them apart along the manifold normal until none
//! overlap.
//!
//! Run:
//! - `cargo run -p grove_demos --example separate_bodies`

use grove_bvh::{FlatMap, Map, TopDownBvhTree};
use grove_collide::{
    Aabb, Circle, CollisionError, ManifoldDispatcher, Polygon, SatResolver, Shape,
};
use kurbo::{Point, Vec2};

fn main() -> Result<(), CollisionError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut bodies: Vec<Shape> = vec![
        Aabb::new(Point::new(0.0, 0.0), 4.0, 2.0).into(),
        Circle::new(Point::new(1.5, 1.0), 1.0).into(),
        Circle::new(Point::new(2.0, 1.5), 1.0).into(),
        Polygon::new(
            Point::new(-1.5, 0.5),
            vec![
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(-1.0, 1.0),
            ],
        )
        .into(),
        Aabb::new(Point::new(0.0, 1.0), 1.0, 1.0).into(),
    ];
    let resolver = ManifoldDispatcher::new(SatResolver);
    let mut tree: TopDownBvhTree<usize> = TopDownBvhTree::new();

    for pass in 0..50 {
        tree.clear();
        for (i, body) in bodies.iter().enumerate() {
            tree.add(i, body.clone());
        }
        tree.rebuild();

        // Collect the pushes for this pass against the state at its start.
        let mut pushes = vec![Vec2::ZERO; bodies.len()];
        let mut contacts = 0;
        for (i, body) in bodies.iter().enumerate() {
            for j in tree.query(body)? {
                if j <= i {
                    continue;
                }
                let Some(m) = resolver.resolve(body, &bodies[j])? else {
                    continue;
                };
                contacts += 1;
                // Split the separation evenly, with a little slack.
                let half = m.normal * (m.penetration * 0.5 + 1e-4);
                pushes[i] -= half;
                pushes[j] += half;
            }
        }
        println!("pass {pass}: {contacts} contacts");
        if contacts == 0 {
            break;
        }
        for (body, push) in bodies.iter_mut().zip(pushes) {
            body.translate(push);
        }
    }

    // Confirm with a brute-force scan.
    let mut flat = FlatMap::new();
    for (i, body) in bodies.iter().enumerate() {
        flat.add(i, body.clone());
    }
    for (i, body) in bodies.iter().enumerate() {
        let touching: Vec<usize> = flat.query(body)?.into_iter().filter(|&j| j != i).collect();
        println!("body {i} at {:?} touches {touching:?}", body.position());
    }
    Ok(())
}
