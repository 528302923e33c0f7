// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Separating Axis Theorem building blocks.
//!
//! Two convex point sets are disjoint iff some axis separates their
//! projections. For polygons the candidate axes are the edge normals of both
//! shapes; a segment contributes its own normal.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// Cross products at or below this magnitude mark two unit axes as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// Closed 1D interval produced by projecting a shape onto an axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Interval {
    /// Create an interval. Bounds are swapped if given out of order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Signed overlap with `other`.
    ///
    /// This is the smallest distance either interval has to move for the two
    /// to stop overlapping. Negative when they are apart, zero when they touch.
    pub fn overlap(&self, other: &Self) -> f64 {
        (self.max - other.min).min(other.max - self.min)
    }

    /// Distance `other` has to move along the positive axis to clear `self`.
    pub fn push_forward(&self, other: &Self) -> f64 {
        self.max - other.min
    }

    /// Distance `other` has to move along the negative axis to clear `self`.
    pub fn push_back(&self, other: &Self) -> f64 {
        other.max - self.min
    }
}

/// Unit vector in the direction of `v`, or `None` for a zero vector.
pub fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len > 0.0).then(|| v / len)
}

/// Right normal `(-y, x)` of `v`.
pub fn right_normal(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Whether two unit axes point along the same line.
pub fn is_parallel(a: Vec2, b: Vec2) -> bool {
    a.cross(b).abs() <= PARALLEL_EPSILON
}

/// Project every point onto `axis`.
///
/// An empty point set yields an inverted interval that overlaps nothing.
pub fn project(points: &[Point], axis: Vec2) -> Interval {
    points.iter().fold(
        Interval {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        },
        |acc, p| {
            let d = p.to_vec2().dot(axis);
            Interval {
                min: acc.min.min(d),
                max: acc.max.max(d),
            }
        },
    )
}

/// Project a circle onto a unit `axis`.
pub fn project_circle(center: Point, radius: f64, axis: Vec2) -> Interval {
    let c = center.to_vec2().dot(axis);
    Interval {
        min: c - radius,
        max: c + radius,
    }
}

/// Unit right normals of each edge of a closed polygon. Zero-length edges are skipped.
pub fn edge_normals(points: &[Point]) -> Vec<Vec2> {
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let edge = points[(i + 1) % n] - points[i];
        if let Some(u) = unit(edge) {
            out.push(right_normal(u));
        }
    }
    out
}

/// Append every axis of `extra` not parallel to one already in `axes`.
pub fn merge_axes(axes: &mut Vec<Vec2>, extra: &[Vec2]) {
    for &candidate in extra {
        if !axes.iter().any(|&a| is_parallel(a, candidate)) {
            axes.push(candidate);
        }
    }
}

/// Deduplicated separating-axis candidates of two closed polygons.
pub fn polygon_axes(a: &[Point], b: &[Point]) -> Vec<Vec2> {
    let mut axes = Vec::new();
    merge_axes(&mut axes, &edge_normals(a));
    merge_axes(&mut axes, &edge_normals(b));
    axes
}

/// Whether any of `axes` separates the two point sets.
pub fn separated(a: &[Point], b: &[Point], axes: &[Vec2]) -> bool {
    axes.iter()
        .any(|&axis| project(a, axis).overlap(&project(b, axis)) < 0.0)
}

/// Minimum-overlap axis between two point sets.
///
/// Returns the overlap and the axis oriented so that moving `b` along it by the
/// overlap separates the sets. `None` if any axis separates them.
pub fn min_translation(a: &[Point], b: &[Point], axes: &[Vec2]) -> Option<(f64, Vec2)> {
    let mut best: Option<(f64, Vec2)> = None;
    for &axis in axes {
        let ia = project(a, axis);
        let ib = project(b, axis);
        let candidate = orient(&ia, &ib, axis)?;
        if best.is_none_or(|(depth, _)| candidate.0 < depth) {
            best = Some(candidate);
        }
    }
    best
}

/// Overlap of `ib` against `ia` and the direction `ib` should move to clear it.
///
/// `None` when the intervals are apart.
pub fn orient(ia: &Interval, ib: &Interval, axis: Vec2) -> Option<(f64, Vec2)> {
    let forward = ia.push_forward(ib);
    let back = ia.push_back(ib);
    if forward.min(back) < 0.0 {
        return None;
    }
    Some(if forward <= back {
        (forward, axis)
    } else {
        (back, -axis)
    })
}

/// The point of segment `a`-`b` closest to `p`.
pub fn closest_on_segment(a: Point, b: Point, p: Point) -> Point {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}
