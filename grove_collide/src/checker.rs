// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pairwise boolean collision tests.
//!
//! [`CollisionChecker`] has one method per unordered pair of shape kinds plus
//! the point and ray tests. The mirrored orderings (`circle_vs_aabb` and so on)
//! are provided methods that call the canonical routine, so both orderings of a
//! pair always agree.
//!
//! Pairs a checker does not implement return
//! [`CollisionError::UnsupportedPair`] or [`CollisionError::UnsupportedRay`].
//!
//! Touching shapes (zero overlap) count as colliding in every test.

use alloc::vec::Vec;

use kurbo::{Point, Vec2};

use crate::error::CollisionError;
use crate::ray::Ray;
use crate::sat::{self, Interval};
use crate::shapes::{Aabb, Circle, Polygon, ShapeKind};

/// Narrow-phase boolean tests for every pair of shape kinds.
pub trait CollisionChecker {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Box against box.
    fn aabb_vs_aabb(&self, a: &Aabb, b: &Aabb) -> Result<bool, CollisionError>;

    /// Box against circle.
    fn aabb_vs_circle(&self, a: &Aabb, b: &Circle) -> Result<bool, CollisionError>;

    /// Box against polygon.
    fn aabb_vs_polygon(&self, _a: &Aabb, _b: &Polygon) -> Result<bool, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Aabb,
            ShapeKind::Polygon,
        ))
    }

    /// Circle against circle.
    fn circle_vs_circle(&self, a: &Circle, b: &Circle) -> Result<bool, CollisionError>;

    /// Circle against polygon.
    fn circle_vs_polygon(&self, _a: &Circle, _b: &Polygon) -> Result<bool, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Circle,
            ShapeKind::Polygon,
        ))
    }

    /// Polygon against polygon.
    fn polygon_vs_polygon(&self, _a: &Polygon, _b: &Polygon) -> Result<bool, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Polygon,
            ShapeKind::Polygon,
        ))
    }

    /// Whether `point` is inside or on the box.
    fn aabb_vs_point(&self, a: &Aabb, point: Point) -> Result<bool, CollisionError>;

    /// Whether `point` is inside or on the circle.
    fn circle_vs_point(&self, a: &Circle, point: Point) -> Result<bool, CollisionError>;

    /// Whether `point` is inside or on the polygon.
    fn polygon_vs_point(&self, a: &Polygon, point: Point) -> Result<bool, CollisionError>;

    /// Box against ray.
    fn aabb_vs_ray(&self, _a: &Aabb, _ray: &Ray) -> Result<bool, CollisionError> {
        Err(CollisionError::unsupported_ray(self.name(), ShapeKind::Aabb))
    }

    /// Circle against ray.
    fn circle_vs_ray(&self, _a: &Circle, _ray: &Ray) -> Result<bool, CollisionError> {
        Err(CollisionError::unsupported_ray(self.name(), ShapeKind::Circle))
    }

    /// Polygon against ray.
    fn polygon_vs_ray(&self, _a: &Polygon, _ray: &Ray) -> Result<bool, CollisionError> {
        Err(CollisionError::unsupported_ray(self.name(), ShapeKind::Polygon))
    }

    /// Mirror of [`CollisionChecker::aabb_vs_circle`].
    fn circle_vs_aabb(&self, a: &Circle, b: &Aabb) -> Result<bool, CollisionError> {
        self.aabb_vs_circle(b, a)
    }

    /// Mirror of [`CollisionChecker::aabb_vs_polygon`].
    fn polygon_vs_aabb(&self, a: &Polygon, b: &Aabb) -> Result<bool, CollisionError> {
        self.aabb_vs_polygon(b, a)
    }

    /// Mirror of [`CollisionChecker::circle_vs_polygon`].
    fn polygon_vs_circle(&self, a: &Polygon, b: &Circle) -> Result<bool, CollisionError> {
        self.circle_vs_polygon(b, a)
    }
}

/// Direct geometric tests for boxes, circles, and points.
///
/// Polygon pairs other than circle-vs-polygon and all ray tests are left to
/// [`SatChecker`].
#[derive(Copy, Clone, Debug, Default)]
pub struct GenericChecker;

impl CollisionChecker for GenericChecker {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn aabb_vs_aabb(&self, a: &Aabb, b: &Aabb) -> Result<bool, CollisionError> {
        Ok(a.min_x() <= b.max_x()
            && b.min_x() <= a.max_x()
            && a.min_y() <= b.max_y()
            && b.min_y() <= a.max_y())
    }

    fn aabb_vs_circle(&self, a: &Aabb, b: &Circle) -> Result<bool, CollisionError> {
        let closest = a.clamp_point(b.position());
        Ok(b.contains_point(closest))
    }

    fn circle_vs_circle(&self, a: &Circle, b: &Circle) -> Result<bool, CollisionError> {
        let reach = a.radius() + b.radius();
        Ok((b.position() - a.position()).hypot2() <= reach * reach)
    }

    fn circle_vs_polygon(&self, a: &Circle, b: &Polygon) -> Result<bool, CollisionError> {
        if self.polygon_vs_point(b, a.position())? {
            return Ok(true);
        }
        let pts = b.world_vertices();
        let n = pts.len();
        Ok((0..n).any(|i| {
            let closest = sat::closest_on_segment(pts[i], pts[(i + 1) % n], a.position());
            a.contains_point(closest)
        }))
    }

    fn aabb_vs_point(&self, a: &Aabb, point: Point) -> Result<bool, CollisionError> {
        Ok(a.contains_point(point))
    }

    fn circle_vs_point(&self, a: &Circle, point: Point) -> Result<bool, CollisionError> {
        Ok(a.contains_point(point))
    }

    fn polygon_vs_point(&self, a: &Polygon, point: Point) -> Result<bool, CollisionError> {
        let pts = a.world_vertices();
        let n = pts.len();
        if n == 0 {
            return Ok(false);
        }
        let mut positive = false;
        let mut negative = false;
        for i in 0..n {
            let edge = pts[(i + 1) % n] - pts[i];
            let c = edge.cross(point - pts[i]);
            positive |= c > 0.0;
            negative |= c < 0.0;
            if positive && negative {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Separating Axis Theorem checker.
///
/// Box, circle, and point tests are shared with [`GenericChecker`]; polygon and
/// ray pairs are decided by projecting onto candidate separating axes.
#[derive(Copy, Clone, Debug, Default)]
pub struct SatChecker;

const AABB_AXES: [Vec2; 2] = [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];

impl SatChecker {
    fn segment_vs_convex(points: &[Point], ray: &Ray, mut axes: Vec<Vec2>) -> bool {
        let segment = [ray.start(), ray.end()];
        let normal = sat::unit(ray.direction()).map(sat::right_normal);
        sat::merge_axes(&mut axes, normal.as_slice());
        !sat::separated(points, &segment, &axes)
    }
}

impl CollisionChecker for SatChecker {
    fn name(&self) -> &'static str {
        "sat"
    }

    fn aabb_vs_aabb(&self, a: &Aabb, b: &Aabb) -> Result<bool, CollisionError> {
        GenericChecker.aabb_vs_aabb(a, b)
    }

    fn aabb_vs_circle(&self, a: &Aabb, b: &Circle) -> Result<bool, CollisionError> {
        GenericChecker.aabb_vs_circle(a, b)
    }

    fn aabb_vs_polygon(&self, a: &Aabb, b: &Polygon) -> Result<bool, CollisionError> {
        let corners = a.vertices();
        let axes = sat::polygon_axes(&corners, b.world_vertices());
        Ok(!sat::separated(&corners, b.world_vertices(), &axes))
    }

    fn circle_vs_circle(&self, a: &Circle, b: &Circle) -> Result<bool, CollisionError> {
        GenericChecker.circle_vs_circle(a, b)
    }

    fn circle_vs_polygon(&self, a: &Circle, b: &Polygon) -> Result<bool, CollisionError> {
        let pts = b.world_vertices();
        let center = a.position();
        let mut axes = sat::edge_normals(pts);
        // The remaining candidate runs from the nearest vertex to the center.
        let nearest = pts
            .iter()
            .min_by(|p, q| (**p - center).hypot2().total_cmp(&(**q - center).hypot2()));
        if let Some(axis) = nearest.and_then(|v| sat::unit(center - *v)) {
            sat::merge_axes(&mut axes, &[axis]);
        }
        Ok(!axes.iter().any(|&axis| {
            let ia: Interval = sat::project_circle(center, a.radius(), axis);
            ia.overlap(&sat::project(pts, axis)) < 0.0
        }))
    }

    fn polygon_vs_polygon(&self, a: &Polygon, b: &Polygon) -> Result<bool, CollisionError> {
        let (pa, pb) = (a.world_vertices(), b.world_vertices());
        let axes = sat::polygon_axes(pa, pb);
        Ok(!sat::separated(pa, pb, &axes))
    }

    fn aabb_vs_point(&self, a: &Aabb, point: Point) -> Result<bool, CollisionError> {
        GenericChecker.aabb_vs_point(a, point)
    }

    fn circle_vs_point(&self, a: &Circle, point: Point) -> Result<bool, CollisionError> {
        GenericChecker.circle_vs_point(a, point)
    }

    fn polygon_vs_point(&self, a: &Polygon, point: Point) -> Result<bool, CollisionError> {
        GenericChecker.polygon_vs_point(a, point)
    }

    fn aabb_vs_ray(&self, a: &Aabb, ray: &Ray) -> Result<bool, CollisionError> {
        Ok(Self::segment_vs_convex(&a.vertices(), ray, AABB_AXES.to_vec()))
    }

    fn circle_vs_ray(&self, a: &Circle, ray: &Ray) -> Result<bool, CollisionError> {
        let closest = sat::closest_on_segment(ray.start(), ray.end(), a.position());
        Ok(a.contains_point(closest))
    }

    fn polygon_vs_ray(&self, a: &Polygon, ray: &Ray) -> Result<bool, CollisionError> {
        let pts = a.world_vertices();
        Ok(Self::segment_vs_convex(pts, ray, sat::edge_normals(pts)))
    }
}
