// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route a pair of [`Shape`]s to the matching [`CollisionChecker`] method.
//!
//! Dispatch is an exhaustive `match` over both operands' variants, so adding a
//! shape kind without routing every pair is a compile error. A routed pair the
//! checker does not support surfaces as [`CollisionError`].

use kurbo::Point;

use crate::checker::{CollisionChecker, SatChecker};
use crate::error::CollisionError;
use crate::ray::Ray;
use crate::shapes::{Aabb, Shape};

/// Test two shapes with `checker`.
pub fn collide<C: CollisionChecker + ?Sized>(
    checker: &C,
    a: &Shape,
    b: &Shape,
) -> Result<bool, CollisionError> {
    match (a, b) {
        (Shape::Aabb(a), Shape::Aabb(b)) => checker.aabb_vs_aabb(a, b),
        (Shape::Aabb(a), Shape::Circle(b)) => checker.aabb_vs_circle(a, b),
        (Shape::Aabb(a), Shape::Polygon(b)) => checker.aabb_vs_polygon(a, b),
        (Shape::Circle(a), Shape::Aabb(b)) => checker.circle_vs_aabb(a, b),
        (Shape::Circle(a), Shape::Circle(b)) => checker.circle_vs_circle(a, b),
        (Shape::Circle(a), Shape::Polygon(b)) => checker.circle_vs_polygon(a, b),
        (Shape::Polygon(a), Shape::Aabb(b)) => checker.polygon_vs_aabb(a, b),
        (Shape::Polygon(a), Shape::Circle(b)) => checker.polygon_vs_circle(a, b),
        (Shape::Polygon(a), Shape::Polygon(b)) => checker.polygon_vs_polygon(a, b),
    }
}

/// Test a shape against a box without wrapping the box in a [`Shape`].
pub fn collide_aabb<C: CollisionChecker + ?Sized>(
    checker: &C,
    a: &Shape,
    b: &Aabb,
) -> Result<bool, CollisionError> {
    match a {
        Shape::Aabb(a) => checker.aabb_vs_aabb(a, b),
        Shape::Circle(a) => checker.circle_vs_aabb(a, b),
        Shape::Polygon(a) => checker.polygon_vs_aabb(a, b),
    }
}

/// Whether `point` lies inside or on `shape`.
pub fn contains_point<C: CollisionChecker + ?Sized>(
    checker: &C,
    shape: &Shape,
    point: Point,
) -> Result<bool, CollisionError> {
    match shape {
        Shape::Aabb(a) => checker.aabb_vs_point(a, point),
        Shape::Circle(a) => checker.circle_vs_point(a, point),
        Shape::Polygon(a) => checker.polygon_vs_point(a, point),
    }
}

/// Whether `ray` touches `shape`.
pub fn intersects_ray<C: CollisionChecker + ?Sized>(
    checker: &C,
    shape: &Shape,
    ray: &Ray,
) -> Result<bool, CollisionError> {
    match shape {
        Shape::Aabb(a) => checker.aabb_vs_ray(a, ray),
        Shape::Circle(a) => checker.circle_vs_ray(a, ray),
        Shape::Polygon(a) => checker.polygon_vs_ray(a, ray),
    }
}

/// A collision checker bundled with the dispatch functions.
///
/// This is the value the broad phase holds on to. The checker is fixed at
/// construction.
#[derive(Copy, Clone, Debug, Default)]
pub struct CollisionDispatcher<C = SatChecker> {
    checker: C,
}

impl<C> CollisionDispatcher<C> {
    /// Wrap `checker`.
    pub const fn new(checker: C) -> Self {
        Self { checker }
    }

    /// The wrapped checker.
    pub const fn checker(&self) -> &C {
        &self.checker
    }
}

impl<C: CollisionChecker> CollisionDispatcher<C> {
    /// See [`collide`].
    pub fn collide(&self, a: &Shape, b: &Shape) -> Result<bool, CollisionError> {
        collide(&self.checker, a, b)
    }

    /// See [`collide_aabb`].
    pub fn collide_aabb(&self, a: &Shape, b: &Aabb) -> Result<bool, CollisionError> {
        collide_aabb(&self.checker, a, b)
    }

    /// See [`contains_point`].
    pub fn contains_point(&self, shape: &Shape, point: Point) -> Result<bool, CollisionError> {
        contains_point(&self.checker, shape, point)
    }

    /// See [`intersects_ray`].
    pub fn intersects_ray(&self, shape: &Shape, ray: &Ray) -> Result<bool, CollisionError> {
        intersects_ray(&self.checker, shape, ray)
    }
}
