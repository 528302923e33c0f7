// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding volumes.
//!
//! A [`BvFactory`] turns any [`Shape`] into an [`Aabb`] that encloses it and
//! merges boxes into their union. [`AabbBvFactory`] is the standard
//! implementation; hierarchies take the factory by value so it can be swapped.

use kurbo::{Point, Size, Vec2};

use crate::shapes::{Aabb, Circle, Polygon, Shape};

/// Something with a drawable area, such as a renderer's output surface.
pub trait RenderTarget {
    /// Size of the surface in pixels.
    fn size(&self) -> Size;
}

/// A 2D camera looking at the scene.
pub trait CameraView {
    /// World-space point at the center of the view.
    fn look_at(&self) -> Point;
    /// Pixels per world unit on each axis.
    fn scale(&self) -> Vec2;
}

/// Plain viewport description implementing both [`RenderTarget`] and [`CameraView`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Output surface size in pixels.
    pub size: Size,
    /// World-space center of the view.
    pub look_at: Point,
    /// Pixels per world unit.
    pub scale: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            look_at: Point::ZERO,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl RenderTarget for Viewport {
    fn size(&self) -> Size {
        self.size
    }
}

impl CameraView for Viewport {
    fn look_at(&self) -> Point {
        self.look_at
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }
}

/// Builds and combines bounding volumes.
pub trait BvFactory {
    /// Bounding volume of a box (the box itself).
    fn aabb_bv(&self, aabb: &Aabb) -> Aabb;

    /// Bounding volume of a circle.
    fn circle_bv(&self, circle: &Circle) -> Aabb;

    /// Bounding volume of a polygon.
    fn polygon_bv(&self, polygon: &Polygon) -> Aabb;

    /// World-space region visible through `camera` on `target`.
    fn scene_bv(&self, target: &dyn RenderTarget, camera: &dyn CameraView) -> Aabb;

    /// Smallest volume containing both `a` and `b`.
    fn merge(&self, a: &Aabb, b: &Aabb) -> Aabb;

    /// Sentinel volume for nodes whose volume is not computed.
    fn placeholder(&self) -> Aabb;

    /// Bounding volume of any shape.
    fn shape_bv(&self, shape: &Shape) -> Aabb {
        match shape {
            Shape::Aabb(a) => self.aabb_bv(a),
            Shape::Circle(c) => self.circle_bv(c),
            Shape::Polygon(p) => self.polygon_bv(p),
        }
    }

    /// Fold [`BvFactory::merge`] over `boxes`, left to right.
    ///
    /// Returns [`BvFactory::placeholder`] when `boxes` is empty.
    fn merge_all<'a, I>(&self, boxes: I) -> Aabb
    where
        I: IntoIterator<Item = &'a Aabb>,
        Self: Sized,
    {
        let mut it = boxes.into_iter();
        match it.next() {
            Some(first) => it.fold(*first, |acc, b| self.merge(&acc, b)),
            None => self.placeholder(),
        }
    }
}

/// Axis-aligned bounding box factory.
#[derive(Copy, Clone, Debug, Default)]
pub struct AabbBvFactory;

impl BvFactory for AabbBvFactory {
    fn aabb_bv(&self, aabb: &Aabb) -> Aabb {
        *aabb
    }

    fn circle_bv(&self, circle: &Circle) -> Aabb {
        let c = circle.position();
        let r = Vec2::new(circle.radius(), circle.radius());
        Aabb::from_min_max(c - r, c + r)
    }

    fn polygon_bv(&self, polygon: &Polygon) -> Aabb {
        let mut pts = polygon.world_vertices().iter();
        let Some(first) = pts.next() else {
            return Aabb::new(polygon.position(), 0.0, 0.0);
        };
        let (min, max) = pts.fold((*first, *first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        });
        Aabb::from_min_max(min, max)
    }

    fn scene_bv(&self, target: &dyn RenderTarget, camera: &dyn CameraView) -> Aabb {
        let size = target.size();
        let scale = camera.scale();
        Aabb::new(
            camera.look_at(),
            size.width / scale.x,
            size.height / scale.y,
        )
    }

    fn merge(&self, a: &Aabb, b: &Aabb) -> Aabb {
        Aabb::from_min_max(
            Point::new(a.min_x().min(b.min_x()), a.min_y().min(b.min_y())),
            Point::new(a.max_x().max(b.max_x()), a.max_y().max(b.max_y())),
        )
    }

    fn placeholder(&self) -> Aabb {
        Aabb::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn assert_box(actual: Aabb, center: (f64, f64), w: f64, h: f64, what: &str) {
        let ok = (actual.position().x - center.0).abs() < 1e-9
            && (actual.position().y - center.1).abs() < 1e-9
            && (actual.width() - w).abs() < 1e-9
            && (actual.height() - h).abs() < 1e-9;
        assert!(ok, "{what}: got {actual:?}");
    }

    #[test]
    fn shapes_to_boxes() {
        let f = AabbBvFactory;
        let a = Aabb::new(Point::new(1.0, 1.0), 2.0, 3.0);
        assert_eq!(f.aabb_bv(&a), a, "boxes are their own volume");

        let c = Circle::new(Point::new(-1.0, 2.0), 1.5);
        assert_box(f.circle_bv(&c), (-1.0, 2.0), 3.0, 3.0, "circle");

        let p = Polygon::new(
            Point::new(1.0, 1.0),
            vec![Vec2::new(-1.0, 0.0), Vec2::new(2.0, -1.0), Vec2::new(0.0, 3.0)],
        );
        assert_box(f.polygon_bv(&p), (1.5, 2.0), 3.0, 4.0, "polygon");
        assert_eq!(
            f.shape_bv(&Shape::Polygon(p.clone())),
            f.polygon_bv(&p),
            "shape_bv dispatches"
        );
    }

    #[test]
    fn merge_cases() {
        let f = AabbBvFactory;
        let a = Aabb::new(Point::new(-1.0, 1.0), 2.0, 2.0);
        let cases = [
            ((1.0, -1.5), (0.0, 0.0), 4.0, 4.0),
            ((-0.5, 0.0), (-0.75, 0.75), 2.5, 2.5),
            ((0.5, 1.0), (-0.25, 1.0), 3.5, 2.0),
            ((-1.0, 1.0), (-1.0, 1.0), 2.0, 2.0),
        ];
        for ((bx, by), center, w, h) in cases {
            let b = Aabb::new(Point::new(bx, by), 2.0, 1.0);
            assert_box(f.merge(&a, &b), center, w, h, "merge with 2x1 box");
        }
    }

    #[test]
    fn merge_keeps_non_dyadic_corners_exact() {
        let f = AabbBvFactory;
        let boxes: Vec<Aabb> = (0..8_u32)
            .map(|i| {
                let lo = Point::new(0.1 * f64::from(i), 0.7 * f64::from(i));
                let hi = Point::new(lo.x + 0.7, lo.y + 0.1);
                Aabb::from_min_max(lo, hi)
            })
            .collect();
        for a in &boxes {
            for b in &boxes {
                let m = f.merge(a, b);
                assert!(m.contains_aabb(a), "{m:?} must contain {a:?}");
                assert!(m.contains_aabb(b), "{m:?} must contain {b:?}");
                assert_eq!(m.min_x(), a.min_x().min(b.min_x()), "min corner is exact");
                assert_eq!(m.max_y(), a.max_y().max(b.max_y()), "max corner is exact");
            }
        }
        let all = f.merge_all(&boxes);
        assert!(boxes.iter().all(|b| all.contains_aabb(b)), "fold contains every box");
    }

    #[test]
    fn polygon_and_circle_volumes_hit_extremes_exactly() {
        let f = AabbBvFactory;
        let p = Polygon::new(
            Point::new(0.1, 0.7),
            vec![Vec2::new(0.2, 0.0), Vec2::new(0.0, 0.3), Vec2::new(-0.1, -0.1)],
        );
        let bv = f.polygon_bv(&p);
        for v in p.world_vertices() {
            assert!(bv.contains_point(*v), "vertex {v:?} inside {bv:?}");
        }
        let w = p.world_vertices();
        assert_eq!(bv.max_x(), w[0].x, "max x is a vertex coordinate");
        assert_eq!(bv.max_y(), w[1].y, "max y is a vertex coordinate");

        let c = Circle::new(Point::new(0.1, 0.2), 0.3);
        let bv = f.circle_bv(&c);
        assert_eq!(bv.min_x(), 0.1 - 0.3, "left extreme");
        assert_eq!(bv.max_y(), 0.2 + 0.3, "top extreme");
    }

    #[test]
    fn merge_all_of_nothing_is_placeholder() {
        let f = AabbBvFactory;
        assert_eq!(f.merge_all(&[]), f.placeholder(), "empty fold");
        assert_eq!(f.placeholder(), Aabb::ZERO, "zero-sized sentinel");
    }

    #[test]
    fn scene_bv_covers_viewport() {
        let f = AabbBvFactory;
        let v = Viewport {
            size: Size::new(800.0, 600.0),
            look_at: Point::new(10.0, -5.0),
            scale: Vec2::new(2.0, 4.0),
        };
        assert_box(f.scene_bv(&v, &v), (10.0, -5.0), 400.0, 150.0, "viewport");
    }

    fn arb_aabb() -> impl Strategy<Value = Aabb> {
        (-50.0..50.0_f64, -50.0..50.0_f64, 0.0..20.0_f64, 0.0..20.0_f64)
            .prop_map(|(x, y, w, h)| Aabb::new(Point::new(x, y), w, h))
    }

    proptest! {
        #[test]
        fn merge_contains_both_and_commutes(a in arb_aabb(), b in arb_aabb()) {
            let f = AabbBvFactory;
            let m = f.merge(&a, &b);
            prop_assert_eq!(m, f.merge(&b, &a));
            prop_assert!(m.contains_aabb(&a));
            prop_assert!(m.contains_aabb(&b));
        }
    }
}
