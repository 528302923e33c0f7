// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grove BVH: a broad-phase index over keyed 2D shapes.
//!
//! - [`TopDownBvhTree`]: a bounding volume hierarchy rebuilt top-down from the
//!   object list, with pluggable checker, bounding-volume factory, and
//!   partitioning strategy ([`MedianCutBvhStrategy`] by default).
//! - [`FlatMap`]: the same [`Map`] interface over a linear scan.
//!
//! Both run the narrow phase from [`grove_collide`] on candidates, so a query
//! reports exactly the objects whose shape collides with the query shape.
//!
//! Adding, removing, or moving objects only touches the backing list. Call
//! [`Map::rebuild`] once per tick before querying the tree.
//!
//! # Example
//!
//! ```rust
//! use grove_bvh::{Map, QueryFilter, TopDownBvhTree};
//! use grove_collide::{Aabb, Circle, Ray, Shape};
//! use kurbo::{Point, Vec2};
//!
//! let mut tree = TopDownBvhTree::new();
//! tree.add("crate", Aabb::new(Point::new(0.0, 0.0), 2.0, 2.0).into());
//! tree.add("barrel", Circle::new(Point::new(6.0, 0.0), 1.0).into());
//! tree.add("rock", Circle::new(Point::new(20.0, 5.0), 3.0).into());
//! tree.rebuild();
//!
//! let view: Shape = Aabb::new(Point::new(3.0, 0.0), 10.0, 4.0).into();
//! let mut visible = tree.query_filtered(&view, QueryFilter::VISIBLE).unwrap();
//! visible.sort_unstable();
//! assert_eq!(visible, ["barrel", "crate"]);
//!
//! assert_eq!(tree.query_point(Point::new(6.5, 0.0)).unwrap(), ["barrel"]);
//!
//! let shot = Ray::new(Point::new(-10.0, 0.0), Vec2::new(1.0, 0.0), 100.0);
//! assert_eq!(tree.query_ray(&shot).unwrap(), Some("crate"));
//! ```
//!
//! ## Features
//!
//! - `std` (default): use `std` float functions.
//! - `libm`: use `libm` through Kurbo for `no_std` targets.
//!
//! This crate is `no_std` (with `alloc`) when `std` is disabled.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("grove_bvh requires either the `std` or `libm` feature");

extern crate alloc;

pub mod flat;
pub mod map;
pub mod strategy;
pub mod tree;
pub mod types;

pub use flat::FlatMap;
pub use map::Map;
pub use strategy::{Axis, BvhStrategy, MedianCutBvhStrategy, Partition};
pub use tree::{LeafItem, NodeIdx, NodeKind, NodeRef, TopDownBvhNode, TopDownBvhTree};
pub use types::{BvhConfig, Entry, ObjectFlags, QueryFilter};
