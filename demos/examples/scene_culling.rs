// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene culling.
//!
//! Scatter sprites over a large world, then ask the tree which visible ones fall
//! inside the camera's view as the camera pans and zooms.
//!
//! Run:
//! - `cargo run -p grove_demos --example scene_culling`

use grove_bvh::{BvhConfig, FlatMap, Map, ObjectFlags, QueryFilter, TopDownBvhTree};
use grove_collide::{Aabb, AabbBvFactory, BvFactory, Circle, CollisionError, Shape, Viewport};
use kurbo::{Point, Size, Vec2};

fn main() -> Result<(), CollisionError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut tree = TopDownBvhTree::with_config(BvhConfig::new(4, 12));
    let mut reference = FlatMap::new();
    // A 100 x 100 grid of sprites, every seventh one hidden.
    for i in 0..10_000_u32 {
        let p = Point::new(f64::from(i % 100) * 20.0, f64::from(i / 100) * 20.0);
        let shape: Shape = if i % 2 == 0 {
            Aabb::new(p, 8.0, 8.0).into()
        } else {
            Circle::new(p, 4.0).into()
        };
        let flags = if i % 7 == 0 {
            ObjectFlags::PICKABLE
        } else {
            ObjectFlags::default()
        };
        tree.add_with_flags(i, shape.clone(), flags);
        reference.add_with_flags(i, shape, flags);
    }
    tree.rebuild();
    log::info!("built {tree:?}");

    let mut camera = Viewport {
        size: Size::new(800.0, 600.0),
        look_at: Point::new(400.0, 300.0),
        scale: Vec2::new(1.0, 1.0),
    };
    for frame in 0..5 {
        let view: Shape = AabbBvFactory.scene_bv(&camera, &camera).into();
        let mut drawn = tree.query_filtered(&view, QueryFilter::VISIBLE)?;
        let mut expected = reference.query_filtered(&view, QueryFilter::VISIBLE)?;
        drawn.sort_unstable();
        expected.sort_unstable();
        assert_eq!(drawn, expected, "tree and brute force agree");
        println!(
            "frame {frame}: view {:?} draws {} of {} sprites",
            view.position(),
            drawn.len(),
            tree.len()
        );

        camera.look_at += Vec2::new(150.0, 100.0);
        camera.scale *= 1.25;
    }
    Ok(())
}
