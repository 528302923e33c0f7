// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape value types: axis-aligned boxes, circles, and convex polygons.

use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Size, Vec2};

/// Static type tag of a [`Shape`], used only to select collision routines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// An [`Aabb`].
    Aabb,
    /// A [`Circle`].
    Circle,
    /// A [`Polygon`].
    Polygon,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aabb => "AABB",
            Self::Circle => "Circle",
            Self::Polygon => "Polygon",
        })
    }
}

/// Axis-aligned bounding box, stored as its exact minimum and maximum corners.
///
/// Width and height are never negative. The center and half extents are
/// derived, so unions and containment tests on the corners are exact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb {
    rect: Rect,
}

impl Aabb {
    /// A zero-sized box at the origin.
    pub const ZERO: Self = Self { rect: Rect::ZERO };

    /// Create a box centered on `position`. Negative sizes are taken by magnitude.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            rect: Rect::from_center_size(position, Size::new(width.abs(), height.abs())),
        }
    }

    /// Create a box from two opposite corners, in any order.
    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self {
            rect: Rect::from_points(min, max),
        }
    }

    /// Create a box covering `rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect: rect.abs() }
    }

    /// Center of the box.
    pub fn position(&self) -> Point {
        self.rect.center()
    }

    /// Move the center to `position`, keeping the size.
    pub fn set_position(&mut self, position: Point) {
        self.rect = Rect::from_center_size(position, self.rect.size());
    }

    /// Move the box by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.rect = self.rect + offset;
    }

    /// Full width.
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Full height.
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Half of the width.
    pub fn half_width(&self) -> f64 {
        self.rect.width() * 0.5
    }

    /// Half of the height.
    pub fn half_height(&self) -> f64 {
        self.rect.height() * 0.5
    }

    /// Half extents as a vector.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width(), self.half_height())
    }

    /// Minimum x.
    pub const fn min_x(&self) -> f64 {
        self.rect.x0
    }

    /// Minimum y.
    pub const fn min_y(&self) -> f64 {
        self.rect.y0
    }

    /// Maximum x.
    pub const fn max_x(&self) -> f64 {
        self.rect.x1
    }

    /// Maximum y.
    pub const fn max_y(&self) -> f64 {
        self.rect.y1
    }

    /// Minimum corner.
    pub const fn min(&self) -> Point {
        Point::new(self.rect.x0, self.rect.y0)
    }

    /// Maximum corner.
    pub const fn max(&self) -> Point {
        Point::new(self.rect.x1, self.rect.y1)
    }

    /// The box as a Kurbo rectangle.
    pub const fn to_rect(&self) -> Rect {
        self.rect
    }

    /// Whether `point` lies inside or on the boundary.
    ///
    /// Unlike [`Rect::contains`], the maximum edges are inclusive.
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect.x0 <= point.x
            && point.x <= self.rect.x1
            && self.rect.y0 <= point.y
            && point.y <= self.rect.y1
    }

    /// Whether `other` lies entirely inside this box (boundaries may touch).
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.min_x() <= other.min_x()
            && self.min_y() <= other.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// The point of the box closest to `point`.
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.min_x(), self.max_x()),
            point.y.clamp(self.min_y(), self.max_y()),
        )
    }

    /// Corners in counter-clockwise order, starting at the minimum corner.
    pub fn vertices(&self) -> [Point; 4] {
        let (min, max) = (self.min(), self.max());
        [
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A circle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    position: Point,
    radius: f64,
}

impl Circle {
    /// Create a circle. A negative radius is taken by magnitude.
    pub fn new(position: Point, radius: f64) -> Self {
        Self {
            position,
            radius: radius.abs(),
        }
    }

    /// Center of the circle.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Move the center to `position`.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Move the circle by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Radius, never negative.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the radius. A negative radius is taken by magnitude.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius.abs();
    }

    /// Whether `point` lies inside or on the circle.
    pub fn contains_point(&self, point: Point) -> bool {
        (point - self.position).hypot2() <= self.radius * self.radius
    }
}

/// A convex polygon with a position and vertices relative to it.
///
/// World-space vertices (`position + vertex`) are cached. Every mutator
/// recomputes the cache before returning, so [`Polygon::world_vertices`] is
/// never stale.
///
/// Collision routines assume at least three vertices forming a convex,
/// non-degenerate polygon. This is not validated.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    position: Point,
    vertices: Vec<Vec2>,
    world: Vec<Point>,
}

impl Polygon {
    /// Create a polygon from its position and local vertices.
    pub fn new(position: Point, vertices: impl Into<Vec<Vec2>>) -> Self {
        let mut polygon = Self {
            position,
            vertices: vertices.into(),
            world: Vec::new(),
        };
        polygon.recompute();
        polygon
    }

    fn recompute(&mut self) {
        let position = self.position;
        self.world.clear();
        self.world.extend(self.vertices.iter().map(|v| position + *v));
    }

    /// Position the local vertices are relative to.
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Move the polygon so its origin sits at `position`.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
        self.recompute();
    }

    /// Move the polygon by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        for p in &mut self.world {
            *p += offset;
        }
    }

    /// Vertices relative to [`Polygon::position`].
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Replace the local vertices.
    pub fn set_vertices(&mut self, vertices: impl Into<Vec<Vec2>>) {
        self.vertices = vertices.into();
        self.recompute();
    }

    /// World-space vertices.
    pub fn world_vertices(&self) -> &[Point] {
        &self.world
    }

    /// Average of the world-space vertices, or the position when there are none.
    pub fn centroid(&self) -> Point {
        if self.world.is_empty() {
            return self.position;
        }
        let sum = self
            .world
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
        (sum / self.world.len() as f64).to_point()
    }
}

/// Any shape understood by the collision routines.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box.
    Aabb(Aabb),
    /// Circle.
    Circle(Circle),
    /// Convex polygon.
    Polygon(Polygon),
}

impl Shape {
    /// The static type tag of this shape.
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Aabb(_) => ShapeKind::Aabb,
            Self::Circle(_) => ShapeKind::Circle,
            Self::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Position of the shape (center for boxes and circles, origin for polygons).
    pub fn position(&self) -> Point {
        match self {
            Self::Aabb(a) => a.position(),
            Self::Circle(c) => c.position(),
            Self::Polygon(p) => p.position(),
        }
    }

    /// Move the shape so its position is `position`.
    pub fn set_position(&mut self, position: Point) {
        match self {
            Self::Aabb(a) => a.set_position(position),
            Self::Circle(c) => c.set_position(position),
            Self::Polygon(p) => p.set_position(position),
        }
    }

    /// Move the shape by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        match self {
            Self::Aabb(a) => a.translate(offset),
            Self::Circle(c) => c.translate(offset),
            Self::Polygon(p) => p.translate(offset),
        }
    }

    /// A copy of the shape moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        let mut out = self.clone();
        out.translate(offset);
        out
    }
}

impl From<Aabb> for Shape {
    fn from(value: Aabb) -> Self {
        Self::Aabb(value)
    }
}

impl From<Circle> for Shape {
    fn from(value: Circle) -> Self {
        Self::Circle(value)
    }
}

impl From<Polygon> for Shape {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn aabb_extents_follow_position() {
        let mut a = Aabb::new(Point::new(1.0, 2.0), 4.0, -2.0);
        assert_eq!(a.width(), 4.0, "width is the magnitude of the input");
        assert_eq!(a.height(), 2.0, "height is the magnitude of the input");
        assert_eq!(a.min(), Point::new(-1.0, 1.0), "min corner");
        assert_eq!(a.max(), Point::new(3.0, 3.0), "max corner");
        a.translate(Vec2::new(1.0, 0.0));
        assert_eq!(a.min_x(), 0.0, "min follows the moved center");
        assert_eq!(a.max_x(), 4.0, "max follows the moved center");
    }

    #[test]
    fn aabb_from_corners_in_any_order() {
        let a = Aabb::from_min_max(Point::new(3.0, 4.0), Point::new(-1.0, 0.0));
        assert_eq!(a.position(), Point::new(1.0, 2.0), "center of the corners");
        assert_eq!(a.width(), 4.0, "width");
        assert_eq!(a.height(), 4.0, "height");
        assert_eq!(a.to_rect(), Rect::new(-1.0, 0.0, 3.0, 4.0), "round trip to rect");
    }

    #[test]
    fn aabb_corners_are_stored_exactly() {
        let lo = Point::new(0.1, 0.7);
        let hi = Point::new(0.1 + 0.2, 0.7 * 3.0);
        let mut a = Aabb::from_min_max(hi, lo);
        assert_eq!((a.min(), a.max()), (lo, hi), "corners survive unrounded");
        assert!(a.contains_point(lo) && a.contains_point(hi), "both corners inside");
        assert!(a.contains_point(Point::new(hi.x, lo.y)), "mixed corner inside");
        assert!(
            !a.contains_point(Point::new(f64::from_bits(hi.x.to_bits() + 1), hi.y)),
            "one ulp past max x is outside"
        );
        a.translate(Vec2::new(0.0, 0.0));
        assert_eq!(a.to_rect(), Rect::new(lo.x, lo.y, hi.x, hi.y), "zero move is a no-op");
    }

    #[test]
    fn aabb_contains_point_is_inclusive() {
        let a = Aabb::new(Point::ZERO, 2.0, 2.0);
        assert!(a.contains_point(Point::new(1.0, 1.0)), "max corner is inside");
        assert!(a.contains_point(Point::new(-1.0, 0.0)), "min edge is inside");
        assert!(!a.contains_point(Point::new(1.0, 1.0001)), "just outside");
    }

    #[test]
    fn polygon_cache_tracks_every_mutation() {
        let mut p = Polygon::new(
            Point::new(1.0, 1.0),
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
        assert_eq!(p.world_vertices()[1], Point::new(2.0, 1.0), "initial cache");

        p.set_position(Point::new(-1.0, 0.0));
        assert_eq!(p.world_vertices()[1], Point::new(0.0, 0.0), "after set_position");

        p.translate(Vec2::new(0.0, 2.0));
        assert_eq!(p.world_vertices()[2], Point::new(-1.0, 3.0), "after translate");

        p.set_vertices(vec![Vec2::new(5.0, 5.0)]);
        assert_eq!(p.world_vertices(), &[Point::new(4.0, 7.0)], "after set_vertices");
    }

    #[test]
    fn shape_reports_kind_and_position() {
        let s: Shape = Circle::new(Point::new(3.0, 4.0), -2.0).into();
        assert_eq!(s.kind(), ShapeKind::Circle, "kind tag");
        assert_eq!(s.position(), Point::new(3.0, 4.0), "position");
        let Shape::Circle(c) = s.translated(Vec2::new(1.0, 1.0)) else {
            panic!("translation keeps the variant");
        };
        assert_eq!(c.radius(), 2.0, "radius is stored by magnitude");
        assert_eq!(c.position(), Point::new(4.0, 5.0), "translated copy");
    }
}
