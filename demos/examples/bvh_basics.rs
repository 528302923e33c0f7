// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BVH basics.
//!
//! Build a tree over a few shapes, print its structure, and run region, point,
//! and ray queries.
//!
//! Run:
//! - `cargo run -p grove_demos --example bvh_basics`
//! - `RUST_LOG=trace cargo run -p grove_demos --example bvh_basics` to see
//!   every split.

use grove_bvh::{Map, NodeRef, TopDownBvhTree};
use grove_collide::{Aabb, Circle, CollisionError, Polygon, Ray, Shape};
use kurbo::{Point, Vec2};

fn print_node(node: NodeRef<'_, &str>) {
    let indent = "  ".repeat(node.depth());
    match node.bounding_volume() {
        Some(bv) => {
            println!("{indent}internal {:?}", bv.to_rect());
            for child in [node.left(), node.right()].into_iter().flatten() {
                print_node(child);
            }
        }
        None => {
            let keys: Vec<&str> = node.objects().iter().map(|it| it.key()).collect();
            println!("{indent}leaf {keys:?}");
        }
    }
}

fn main() -> Result<(), CollisionError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut tree = TopDownBvhTree::new();
    tree.add("player", Aabb::new(Point::new(0.0, 0.0), 2.0, 4.0).into());
    tree.add("coin", Circle::new(Point::new(3.0, 1.0), 0.5).into());
    tree.add("slime", Circle::new(Point::new(8.0, -1.0), 1.5).into());
    tree.add(
        "spikes",
        Polygon::new(
            Point::new(14.0, -2.0),
            vec![
                Vec2::new(-2.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(0.0, 2.0),
            ],
        )
        .into(),
    );
    tree.add("door", Aabb::new(Point::new(20.0, 0.0), 2.0, 6.0).into());
    tree.add("torch", Aabb::new(Point::new(20.0, 6.0), 0.5, 1.0).into());
    tree.rebuild();

    if let Some(root) = tree.root() {
        print_node(root);
    }
    println!("{} nodes, bounds {:?}", tree.node_count(), tree.bounds());

    // Everything near the player.
    let aura: Shape = Circle::new(Point::new(0.0, 0.0), 3.5).into();
    println!("near player: {:?}", tree.query(&aura)?);

    // What is under the cursor?
    let cursor = Point::new(14.0, -1.0);
    println!("under {cursor:?}: {:?}", tree.query_point(cursor)?);

    // Line of sight from the player to the right.
    let sight = Ray::new(Point::new(1.0, 0.0), Vec2::new(1.0, 0.0), 30.0);
    println!("first thing seen: {:?}", tree.query_ray(&sight)?);

    // Moving objects leaves the tree stale until the next rebuild.
    tree.update(|key, shape| {
        if *key == "slime" {
            shape.translate(Vec2::new(-6.0, 0.0));
        }
    });
    println!("stale: {}, near player: {:?}", tree.is_stale(), tree.query(&aura)?);
    tree.rebuild();
    println!("rebuilt, near player: {:?}", tree.query(&aura)?);
    Ok(())
}
