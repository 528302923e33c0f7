// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Finite rays (directed segments) and ray casting against shapes.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use crate::sat::unit;
use crate::shapes::{Aabb, Circle, Polygon, Shape};

/// A ray of finite length: `start + direction * t` for `t` in `0..=length`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    start: Point,
    direction: Vec2,
    length: f64,
    end: Point,
}

impl Ray {
    /// Create a ray. `direction` is normalized; a zero direction yields a
    /// zero-length ray sitting at `start`.
    pub fn new(start: Point, direction: Vec2, length: f64) -> Self {
        let (direction, length) = match unit(direction) {
            Some(d) => (d, length.abs()),
            None => (Vec2::ZERO, 0.0),
        };
        Self {
            start,
            direction,
            length,
            end: start + direction * length,
        }
    }

    /// Create the ray from `start` through `end`.
    pub fn from_points(start: Point, end: Point) -> Self {
        let d = end - start;
        Self::new(start, d, d.hypot())
    }

    /// Origin of the ray.
    pub const fn start(&self) -> Point {
        self.start
    }

    /// Unit direction, or zero for a zero-length ray.
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Length of the ray.
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Far end of the ray.
    pub const fn end(&self) -> Point {
        self.end
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f64) -> Point {
        self.start + self.direction * t
    }

    /// Distance along the ray to the first contact with `shape`.
    ///
    /// Returns `Some(0.0)` when the ray starts inside the shape and `None`
    /// when the ray ends before reaching it.
    pub fn cast(&self, shape: &Shape) -> Option<f64> {
        match shape {
            Shape::Aabb(a) => self.cast_aabb(a),
            Shape::Circle(c) => self.cast_circle(c),
            Shape::Polygon(p) => self.cast_polygon(p),
        }
    }

    /// Slab test.
    pub fn cast_aabb(&self, aabb: &Aabb) -> Option<f64> {
        let mut t_min = 0.0_f64;
        let mut t_max = self.length;
        let axes = [
            (self.start.x, self.direction.x, aabb.min_x(), aabb.max_x()),
            (self.start.y, self.direction.y, aabb.min_y(), aabb.max_y()),
        ];
        for (s, d, lo, hi) in axes {
            if d == 0.0 {
                if s < lo || s > hi {
                    return None;
                }
                continue;
            }
            let t1 = (lo - s) / d;
            let t2 = (hi - s) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }

    /// First root of `|start + t * dir - center| = radius`.
    pub fn cast_circle(&self, circle: &Circle) -> Option<f64> {
        let m = self.start - circle.position();
        let c = m.hypot2() - circle.radius() * circle.radius();
        if c <= 0.0 {
            return Some(0.0);
        }
        let b = m.dot(self.direction);
        if b > 0.0 {
            // Outside and pointing away.
            return None;
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = (-b - disc.sqrt()).max(0.0);
        (t <= self.length).then_some(t)
    }

    /// Clip the ray against each edge half-plane of a convex polygon.
    pub fn cast_polygon(&self, polygon: &Polygon) -> Option<f64> {
        let pts = polygon.world_vertices();
        let n = pts.len();
        if n == 0 {
            return None;
        }
        // Orient outward normals from the winding.
        let area2: f64 = (0..n)
            .map(|i| pts[i].to_vec2().cross(pts[(i + 1) % n].to_vec2()))
            .sum();
        let sign = if area2 < 0.0 { -1.0 } else { 1.0 };

        let mut t_min = 0.0_f64;
        let mut t_max = self.length;
        for i in 0..n {
            let a = pts[i];
            let edge = pts[(i + 1) % n] - a;
            let outward = Vec2::new(edge.y, -edge.x) * sign;
            let denom = outward.dot(self.direction);
            let num = outward.dot(a - self.start);
            if denom == 0.0 {
                if num < 0.0 {
                    return None;
                }
                continue;
            }
            let t = num / denom;
            if denom < 0.0 {
                t_min = t_min.max(t);
            } else {
                t_max = t_max.min(t);
            }
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn end_is_start_plus_scaled_direction() {
        let r = Ray::new(Point::new(1.0, 1.0), Vec2::new(3.0, 4.0), 10.0);
        assert!(approx(r.direction().hypot(), 1.0), "direction is normalized");
        assert!(approx(r.end().x, 7.0) && approx(r.end().y, 9.0), "end {:?}", r.end());

        let r = Ray::from_points(Point::new(-1.5, -2.0), Point::new(3.0, -0.5));
        assert!(approx(r.end().x, 3.0) && approx(r.end().y, -0.5), "end {:?}", r.end());
    }

    #[test]
    fn zero_direction_gives_zero_length() {
        let r = Ray::new(Point::new(2.0, 2.0), Vec2::ZERO, 5.0);
        assert_eq!(r.length(), 0.0, "length");
        assert_eq!(r.end(), r.start(), "end collapses to start");
    }

    #[test]
    fn cast_reports_entry_distance() {
        let r = Ray::from_points(Point::new(-5.0, 0.0), Point::new(5.0, 0.0));

        let aabb = Shape::Aabb(Aabb::new(Point::ZERO, 2.0, 2.0));
        assert!(approx(r.cast(&aabb).expect("hits box"), 4.0), "box entry at x=-1");

        let circle = Shape::Circle(Circle::new(Point::new(1.0, 0.0), 1.0));
        assert!(approx(r.cast(&circle).expect("hits circle"), 5.0), "circle entry at x=0");

        let tri = Shape::Polygon(Polygon::new(
            Point::new(2.0, 0.0),
            vec![Vec2::new(0.0, -1.0), Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0)],
        ));
        let t = r.cast(&tri).expect("hits triangle");
        assert!(approx(t, 6.5), "triangle entry at x=1.5, got {t}");
    }

    #[test]
    fn cast_misses_and_inside_start() {
        let r = Ray::from_points(Point::new(-5.0, 3.0), Point::new(5.0, 3.0));
        let aabb = Shape::Aabb(Aabb::new(Point::ZERO, 2.0, 2.0));
        assert_eq!(r.cast(&aabb), None, "passes above the box");

        let short = Ray::from_points(Point::new(-5.0, 0.0), Point::new(-2.0, 0.0));
        assert_eq!(short.cast(&aabb), None, "ends before the box");

        let inside = Ray::from_points(Point::ZERO, Point::new(5.0, 0.0));
        assert_eq!(inside.cast(&aabb), Some(0.0), "starts inside the box");
        let circle = Shape::Circle(Circle::new(Point::ZERO, 1.0));
        assert_eq!(inside.cast(&circle), Some(0.0), "starts inside the circle");
    }
}
