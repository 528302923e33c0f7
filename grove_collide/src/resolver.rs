// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Penetration depth and contact normal for overlapping shapes.

use alloc::vec::Vec;

use kurbo::Vec2;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::error::CollisionError;
use crate::sat;
use crate::shapes::{Aabb, Circle, Polygon, ShapeKind};

/// Result of resolving one overlapping pair.
///
/// `normal` is a unit vector pointing from the first operand toward the
/// second. Moving the second operand by `normal * penetration` (or the first
/// by the negation) brings the pair to touching.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// Overlap distance along `normal`, never negative.
    pub penetration: f64,
    /// Unit contact normal from the first operand toward the second.
    pub normal: Vec2,
}

impl Contact {
    /// The same contact seen from the other operand.
    #[must_use]
    pub fn inverted(self) -> Self {
        Self {
            penetration: self.penetration,
            normal: -self.normal,
        }
    }
}

/// Overlap of `[a0, a1]` and `[b0, b1]`, negative when disjoint, with the
/// direction (`1.0` or `-1.0`) to move `b` along to clear it.
///
/// Equal overlaps on both sides move `b` forward.
fn interval_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> (f64, f64) {
    let forward = a1 - b0;
    let backward = b1 - a0;
    if backward < forward {
        (backward, -1.0)
    } else {
        (forward, 1.0)
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Computes [`Contact`]s for every unordered pair of shape kinds.
///
/// Each method returns `Ok(None)` when the shapes do not overlap. The mirrored
/// orderings are provided and invert the canonical result.
pub trait CollisionResolver {
    /// Short name used in error messages.
    fn name(&self) -> &'static str;

    /// Box against box.
    fn aabb_vs_aabb(&self, a: &Aabb, b: &Aabb) -> Result<Option<Contact>, CollisionError>;

    /// Circle against circle.
    fn circle_vs_circle(
        &self,
        a: &Circle,
        b: &Circle,
    ) -> Result<Option<Contact>, CollisionError>;

    /// Box against circle.
    fn aabb_vs_circle(&self, _a: &Aabb, _b: &Circle) -> Result<Option<Contact>, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Aabb,
            ShapeKind::Circle,
        ))
    }

    /// Box against polygon.
    fn aabb_vs_polygon(
        &self,
        _a: &Aabb,
        _b: &Polygon,
    ) -> Result<Option<Contact>, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Aabb,
            ShapeKind::Polygon,
        ))
    }

    /// Circle against polygon.
    fn circle_vs_polygon(
        &self,
        _a: &Circle,
        _b: &Polygon,
    ) -> Result<Option<Contact>, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Circle,
            ShapeKind::Polygon,
        ))
    }

    /// Polygon against polygon.
    fn polygon_vs_polygon(
        &self,
        _a: &Polygon,
        _b: &Polygon,
    ) -> Result<Option<Contact>, CollisionError> {
        Err(CollisionError::unsupported(
            self.name(),
            ShapeKind::Polygon,
            ShapeKind::Polygon,
        ))
    }

    /// Mirror of [`CollisionResolver::aabb_vs_circle`].
    fn circle_vs_aabb(&self, a: &Circle, b: &Aabb) -> Result<Option<Contact>, CollisionError> {
        Ok(self.aabb_vs_circle(b, a)?.map(Contact::inverted))
    }

    /// Mirror of [`CollisionResolver::aabb_vs_polygon`].
    fn polygon_vs_aabb(&self, a: &Polygon, b: &Aabb) -> Result<Option<Contact>, CollisionError> {
        Ok(self.aabb_vs_polygon(b, a)?.map(Contact::inverted))
    }

    /// Mirror of [`CollisionResolver::circle_vs_polygon`].
    fn polygon_vs_circle(
        &self,
        a: &Polygon,
        b: &Circle,
    ) -> Result<Option<Contact>, CollisionError> {
        Ok(self.circle_vs_polygon(b, a)?.map(Contact::inverted))
    }
}

/// Minimum-translation resolver built on the Separating Axis Theorem.
///
/// Circles with coincident centers resolve along `+x` with a penetration equal
/// to the sum of their radii. Boxes whose x and y overlaps are equal resolve
/// along y.
#[derive(Copy, Clone, Debug, Default)]
pub struct SatResolver;

impl CollisionResolver for SatResolver {
    fn name(&self) -> &'static str {
        "sat"
    }

    fn aabb_vs_aabb(&self, a: &Aabb, b: &Aabb) -> Result<Option<Contact>, CollisionError> {
        let (x_overlap, x_dir) = interval_overlap(a.min_x(), a.max_x(), b.min_x(), b.max_x());
        let (y_overlap, y_dir) = interval_overlap(a.min_y(), a.max_y(), b.min_y(), b.max_y());
        if x_overlap < 0.0 || y_overlap < 0.0 {
            return Ok(None);
        }
        Ok(Some(if x_overlap < y_overlap {
            Contact {
                penetration: x_overlap,
                normal: Vec2::new(x_dir, 0.0),
            }
        } else {
            Contact {
                penetration: y_overlap,
                normal: Vec2::new(0.0, y_dir),
            }
        }))
    }

    fn circle_vs_circle(
        &self,
        a: &Circle,
        b: &Circle,
    ) -> Result<Option<Contact>, CollisionError> {
        let n = b.position() - a.position();
        let reach = a.radius() + b.radius();
        let d2 = n.hypot2();
        if d2 > reach * reach {
            return Ok(None);
        }
        let d = d2.sqrt();
        Ok(Some(if d == 0.0 {
            // Coincident centers: any direction separates.
            Contact {
                penetration: reach,
                normal: Vec2::new(1.0, 0.0),
            }
        } else {
            Contact {
                penetration: reach - d,
                normal: n / d,
            }
        }))
    }

    fn aabb_vs_circle(&self, a: &Aabb, b: &Circle) -> Result<Option<Contact>, CollisionError> {
        let n = b.position() - a.position();
        let ext = a.half_extents();
        let closest = Vec2::new(n.x.clamp(-ext.x, ext.x), n.y.clamp(-ext.y, ext.y));
        let r = b.radius();

        if closest == n {
            // Center inside the box: leave through the nearest face.
            let dx = ext.x - n.x.abs();
            let dy = ext.y - n.y.abs();
            return Ok(Some(if dx < dy {
                Contact {
                    penetration: r + dx,
                    normal: Vec2::new(sign(n.x), 0.0),
                }
            } else {
                Contact {
                    penetration: r + dy,
                    normal: Vec2::new(0.0, sign(n.y)),
                }
            }));
        }

        let delta = n - closest;
        let d2 = delta.hypot2();
        if d2 > r * r {
            return Ok(None);
        }
        let d = d2.sqrt();
        Ok(Some(Contact {
            penetration: r - d,
            normal: delta / d,
        }))
    }

    fn aabb_vs_polygon(&self, a: &Aabb, b: &Polygon) -> Result<Option<Contact>, CollisionError> {
        let corners = a.vertices();
        let axes = sat::polygon_axes(&corners, b.world_vertices());
        Ok(sat::min_translation(&corners, b.world_vertices(), &axes)
            .map(|(penetration, normal)| Contact { penetration, normal }))
    }

    fn circle_vs_polygon(
        &self,
        a: &Circle,
        b: &Polygon,
    ) -> Result<Option<Contact>, CollisionError> {
        let pts = b.world_vertices();
        let center = a.position();
        let mut axes = sat::edge_normals(pts);
        let to_center: Vec<Vec2> =
            pts.iter().filter_map(|v| sat::unit(center - *v)).collect();
        sat::merge_axes(&mut axes, &to_center);

        let mut best: Option<Contact> = None;
        for axis in axes {
            let ia = sat::project_circle(center, a.radius(), axis);
            let ib = sat::project(pts, axis);
            let Some((penetration, normal)) = sat::orient(&ia, &ib, axis) else {
                return Ok(None);
            };
            if best.is_none_or(|c| penetration < c.penetration) {
                best = Some(Contact { penetration, normal });
            }
        }
        Ok(best)
    }

    fn polygon_vs_polygon(
        &self,
        a: &Polygon,
        b: &Polygon,
    ) -> Result<Option<Contact>, CollisionError> {
        let (pa, pb) = (a.world_vertices(), b.world_vertices());
        let axes = sat::polygon_axes(pa, pb);
        Ok(sat::min_translation(pa, pb, &axes)
            .map(|(penetration, normal)| Contact { penetration, normal }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use kurbo::Point;

    fn approx_vec(v: Vec2, x: f64, y: f64) -> bool {
        (v.x - x).abs() < 1e-9 && (v.y - y).abs() < 1e-9
    }

    #[test]
    fn circles_one_and_a_half_apart() {
        let a = Circle::new(Point::ZERO, 1.0);
        let b = Circle::new(Point::new(1.5, 0.0), 1.0);
        let c = SatResolver.circle_vs_circle(&a, &b).unwrap().expect("overlapping");
        assert!((c.penetration - 0.5).abs() < 1e-12, "penetration {}", c.penetration);
        assert!(approx_vec(c.normal, 1.0, 0.0), "normal {:?}", c.normal);
    }

    #[test]
    fn coincident_circles_use_fixed_normal() {
        let a = Circle::new(Point::new(2.0, 2.0), 1.0);
        let b = Circle::new(Point::new(2.0, 2.0), 0.5);
        let c = SatResolver.circle_vs_circle(&a, &b).unwrap().expect("overlapping");
        assert_eq!(c.normal, Vec2::new(1.0, 0.0), "unit x fallback");
        assert_eq!(c.penetration, 1.5, "full radius sum");
    }

    #[test]
    fn boxes_resolve_along_smaller_overlap() {
        let a = Aabb::new(Point::ZERO, 4.0, 2.0);
        let b = Aabb::new(Point::new(-3.5, 0.2), 4.0, 2.0);
        let c = SatResolver.aabb_vs_aabb(&a, &b).unwrap().expect("overlapping");
        assert!((c.penetration - 0.5).abs() < 1e-12, "x overlap wins");
        assert_eq!(c.normal, Vec2::new(-1.0, 0.0), "points toward b");

        let c = SatResolver
            .aabb_vs_aabb(&a, &Aabb::new(Point::new(0.0, 2.99), 2.0, 4.0))
            .unwrap()
            .expect("overlapping");
        assert!((c.penetration - 0.01).abs() < 1e-9, "y overlap wins");
        assert_eq!(c.normal, Vec2::new(0.0, 1.0), "points up toward b");

        let far = Aabb::new(Point::new(0.0, 5.0), 2.0, 4.0);
        assert_eq!(SatResolver.aabb_vs_aabb(&a, &far), Ok(None), "apart");
    }

    #[test]
    fn circle_inside_box_leaves_through_nearest_face() {
        let a = Aabb::new(Point::ZERO, 4.0, 2.0);
        let b = Circle::new(Point::new(1.5, 0.2), 0.25);
        let c = SatResolver.aabb_vs_circle(&a, &b).unwrap().expect("inside");
        assert!(approx_vec(c.normal, 1.0, 0.0), "right face, got {:?}", c.normal);
        assert!((c.penetration - 0.75).abs() < 1e-12, "radius plus face distance");

        let outside = Circle::new(Point::new(3.0, 0.0), 1.5);
        let c = SatResolver.aabb_vs_circle(&a, &outside).unwrap().expect("touching side");
        assert!(approx_vec(c.normal, 1.0, 0.0), "normal {:?}", c.normal);
        assert!((c.penetration - 0.5).abs() < 1e-12, "penetration {}", c.penetration);
    }

    #[test]
    fn mirrored_pairs_invert_the_normal() {
        let a = Aabb::new(Point::ZERO, 2.0, 2.0);
        let c = Circle::new(Point::new(1.5, 0.0), 1.0);
        let ab = SatResolver.aabb_vs_circle(&a, &c).unwrap().expect("overlap");
        let ba = SatResolver.circle_vs_aabb(&c, &a).unwrap().expect("overlap");
        assert_eq!(ab.penetration, ba.penetration, "same depth");
        assert_eq!(ab.normal, -ba.normal, "opposite normals");
    }

    #[test]
    fn polygon_depth_picks_minimum_axis() {
        let square = |x: f64, y: f64| {
            Polygon::new(
                Point::new(x, y),
                vec![
                    Vec2::new(-1.0, -1.0),
                    Vec2::new(1.0, -1.0),
                    Vec2::new(1.0, 1.0),
                    Vec2::new(-1.0, 1.0),
                ],
            )
        };
        let c = SatResolver
            .polygon_vs_polygon(&square(0.0, 0.0), &square(0.3, -1.8))
            .unwrap()
            .expect("overlap");
        assert!((c.penetration - 0.2).abs() < 1e-9, "penetration {}", c.penetration);
        assert!(approx_vec(c.normal, 0.0, -1.0), "normal {:?}", c.normal);

        let unsupported = CollisionError::unsupported("sat", ShapeKind::Aabb, ShapeKind::Polygon);
        assert_ne!(
            SatResolver.polygon_vs_aabb(&square(0.0, 0.0), &Aabb::ZERO),
            Err(unsupported),
            "sat resolver handles boxes against polygons"
        );
    }
}
