// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grove Collide: Kurbo-native 2D collision geometry.
//!
//! Grove Collide is the narrow phase of the Grove scene stack.
//!
//! - [`Shape`] values ([`Aabb`], [`Circle`], convex [`Polygon`]) and finite [`Ray`]s.
//! - Bounding volumes through a pluggable [`BvFactory`] ([`AabbBvFactory`] by default).
//! - Boolean collision tests through a pluggable [`CollisionChecker`]:
//!   [`GenericChecker`] for boxes, circles, and points, and [`SatChecker`] which adds
//!   polygons and rays using the Separating Axis Theorem.
//! - Penetration depth and contact normal through a [`CollisionResolver`]
//!   ([`SatResolver`]) wrapped in a [`Manifold`].
//!
//! Shape pairs are routed to checker and resolver methods by exhaustive `match`
//! ([`collide`], [`resolve`]); asking a checker for a pair it does not implement
//! yields a [`CollisionError`] rather than a silent `false`.
//!
//! Touching shapes (zero overlap) count as colliding.
//!
//! # Example
//!
//! ```rust
//! use grove_collide::{
//!     Aabb, Circle, CollisionDispatcher, ManifoldDispatcher, SatChecker, SatResolver, Shape,
//! };
//! use kurbo::{Point, Vec2};
//!
//! let a: Shape = Circle::new(Point::new(0.0, 0.0), 1.0).into();
//! let b: Shape = Circle::new(Point::new(1.5, 0.0), 1.0).into();
//!
//! // Boolean narrow phase.
//! let checker = CollisionDispatcher::new(SatChecker);
//! assert!(checker.collide(&a, &b).unwrap());
//!
//! // Penetration and normal for separating the pair.
//! let m = ManifoldDispatcher::new(SatResolver).resolve(&a, &b).unwrap().unwrap();
//! assert!((m.penetration - 0.5).abs() < 1e-12);
//! assert_eq!(m.normal, Vec2::new(1.0, 0.0));
//!
//! // Resting on a floor counts as touching.
//! let floor: Shape = Aabb::new(Point::new(0.0, -2.0), 10.0, 2.0).into();
//! assert!(checker.collide(&a, &floor).unwrap());
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
compile_error!("grove_collide requires either the `std` or `libm` feature");

extern crate alloc;

pub mod bv;
pub mod checker;
pub mod dispatch;
pub mod error;
pub mod manifold;
pub mod ray;
pub mod resolver;
pub mod sat;
pub mod shapes;

pub use bv::{AabbBvFactory, BvFactory, CameraView, RenderTarget, Viewport};
pub use checker::{CollisionChecker, GenericChecker, SatChecker};
pub use dispatch::{CollisionDispatcher, collide, collide_aabb, contains_point, intersects_ray};
pub use error::CollisionError;
pub use manifold::{Manifold, ManifoldDispatcher, resolve};
pub use ray::Ray;
pub use resolver::{CollisionResolver, Contact, SatResolver};
pub use shapes::{Aabb, Circle, Polygon, Shape, ShapeKind};
