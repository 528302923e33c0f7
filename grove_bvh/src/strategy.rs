// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Partitioning strategies used while building a tree.

use alloc::vec::Vec;
use core::fmt::Debug;

use grove_collide::Aabb;
use kurbo::{Point, Rect};

/// Coordinate axis a split was taken along.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// The component of `p` along this axis.
    pub const fn coord(self, p: Point) -> f64 {
        match self {
            Self::X => p.x,
            Self::Y => p.y,
        }
    }
}

/// Outcome of partitioning one node's objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Partition {
    /// The objects cannot be separated; the node must become a leaf.
    EndState,
    /// Indices into the input slice for each child.
    Split {
        /// Objects for the left child.
        left: Vec<usize>,
        /// Objects for the right child.
        right: Vec<usize>,
        /// Axis the split was taken along.
        axis: Axis,
    },
}

/// Decides how the objects of a node are divided between its two children.
///
/// `boxes` holds the bounding volume of every object in the node. A `Split`
/// must assign every index to exactly one side.
pub trait BvhStrategy: Debug {
    /// Partition `boxes`.
    fn solve(&self, boxes: &[Aabb]) -> Partition;
}

/// Whether every box in `boxes` has the same center.
///
/// True for zero or one box.
pub fn centers_coincide(boxes: &[Aabb]) -> bool {
    let mut it = boxes.iter().map(Aabb::position);
    let Some(first) = it.next() else {
        return true;
    };
    it.all(|c| c == first)
}

/// Split `boxes` into halves by the rank of their centers along `axis`.
///
/// The lower `len / 2` centers go left and the rest go right, so both sides
/// are non-empty whenever there are at least two boxes. Equal coordinates keep
/// their input order. Each side lists its indices in ascending order.
pub fn split_by_rank(boxes: &[Aabb], axis: Axis) -> (Vec<usize>, Vec<usize>) {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        axis.coord(boxes[a].position())
            .total_cmp(&axis.coord(boxes[b].position()))
    });
    let mut right = order.split_off(boxes.len() / 2);
    let mut left = order;
    left.sort_unstable();
    right.sort_unstable();
    (left, right)
}

/// Splits at the midpoint of the longer side of the bounding rectangle of the
/// box centers.
///
/// Ties between the two sides go to [`Axis::X`]. Objects whose center lies
/// strictly past the midpoint go right; the rest go left. When every center
/// coincides there is nothing to split and the result is
/// [`Partition::EndState`].
///
/// Centers only a few ulps apart can round the midpoint onto the outermost
/// center and leave one side empty. The split then falls back to
/// [`split_by_rank`] along the same axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MedianCutBvhStrategy;

impl MedianCutBvhStrategy {
    fn centers_rect(boxes: &[Aabb]) -> Option<Rect> {
        let mut it = boxes.iter().map(Aabb::position);
        let first = it.next()?;
        Some(it.fold(Rect::from_points(first, first), |acc, c| {
            acc.union_pt(c)
        }))
    }
}

impl BvhStrategy for MedianCutBvhStrategy {
    fn solve(&self, boxes: &[Aabb]) -> Partition {
        let Some(rect) = Self::centers_rect(boxes) else {
            return Partition::EndState;
        };
        let (w, h) = (rect.width(), rect.height());
        if w <= 0.0 && h <= 0.0 {
            return Partition::EndState;
        }
        let axis = if w >= h { Axis::X } else { Axis::Y };
        let mid = axis.coord(rect.center());

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (i, b) in boxes.iter().enumerate() {
            if axis.coord(b.position()) > mid {
                right.push(i);
            } else {
                left.push(i);
            }
        }
        if left.is_empty() || right.is_empty() {
            (left, right) = split_by_rank(boxes, axis);
        }
        Partition::Split { left, right, axis }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn unit_box(x: f64, y: f64) -> Aabb {
        Aabb::new(Point::new(x, y), 1.0, 1.0)
    }

    #[test]
    fn splits_along_longer_extent() {
        let boxes = [
            unit_box(0.0, 0.0),
            unit_box(1.0, 10.0),
            unit_box(2.0, 3.0),
            unit_box(0.5, 8.0),
        ];
        assert_eq!(
            MedianCutBvhStrategy.solve(&boxes),
            Partition::Split {
                left: vec![0, 2],
                right: vec![1, 3],
                axis: Axis::Y,
            },
            "y extent 10 beats x extent 2"
        );
    }

    #[test]
    fn square_extent_ties_to_x() {
        let boxes = [unit_box(0.0, 0.0), unit_box(4.0, 4.0)];
        let Partition::Split { axis, left, right } = MedianCutBvhStrategy.solve(&boxes) else {
            panic!("distinct centers must split");
        };
        assert_eq!(axis, Axis::X, "tie goes to x");
        assert_eq!((left, right), (vec![0], vec![1]), "one per side");
    }

    #[test]
    fn center_on_midpoint_goes_left() {
        let boxes = [unit_box(0.0, 0.0), unit_box(1.0, 0.0), unit_box(2.0, 0.0)];
        let Partition::Split { left, right, .. } = MedianCutBvhStrategy.solve(&boxes) else {
            panic!("distinct centers must split");
        };
        assert_eq!(left, vec![0, 1], "midpoint is not strictly greater");
        assert_eq!(right, vec![2], "only the far box goes right");
    }

    #[test]
    fn coincident_centers_end() {
        let boxes = [
            Aabb::new(Point::new(3.0, 3.0), 1.0, 1.0),
            Aabb::new(Point::new(3.0, 3.0), 5.0, 2.0),
            Aabb::new(Point::new(3.0, 3.0), 0.0, 0.0),
        ];
        assert_eq!(MedianCutBvhStrategy.solve(&boxes), Partition::EndState, "degenerate guard");
        assert_eq!(MedianCutBvhStrategy.solve(&[]), Partition::EndState, "nothing to split");
    }

    #[test]
    fn ulp_neighbours_split_by_rank() {
        let a = f64::from_bits(1.0_f64.to_bits() + 1);
        let b = f64::from_bits(a.to_bits() + 1);
        let boxes = [unit_box(a, 0.0), unit_box(b, 0.0), unit_box(a, 0.0), unit_box(b, 0.0)];
        assert!(boxes[0].position().x < boxes[1].position().x, "centers stay distinct");
        assert_eq!(
            MedianCutBvhStrategy.solve(&boxes),
            Partition::Split {
                left: vec![0, 2],
                right: vec![1, 3],
                axis: Axis::X,
            },
            "a rounded midpoint must not leave a side empty"
        );
    }

    #[test]
    fn rank_split_halves_and_keeps_order() {
        let boxes = [unit_box(5.0, 0.0), unit_box(1.0, 9.0), unit_box(3.0, 1.0)];
        assert_eq!(
            split_by_rank(&boxes, Axis::X),
            (vec![1], vec![0, 2]),
            "lowest x alone on the left"
        );
        assert_eq!(
            split_by_rank(&boxes, Axis::Y),
            (vec![0], vec![1, 2]),
            "lowest y alone on the left"
        );
        let tied = [unit_box(0.0, 0.0), unit_box(0.0, 0.0), unit_box(0.0, 1.0)];
        assert_eq!(split_by_rank(&tied, Axis::X), (vec![0], vec![1, 2]), "ties keep input order");
        assert!(centers_coincide(&tied[..2]), "same center");
        assert!(!centers_coincide(&tied), "one differs");
        assert!(centers_coincide(&[]), "vacuous");
    }

    #[test]
    fn collinear_centers_still_split() {
        let boxes = [unit_box(2.0, 0.0), unit_box(2.0, 5.0), unit_box(2.0, 6.0)];
        let Partition::Split { left, right, axis } = MedianCutBvhStrategy.solve(&boxes) else {
            panic!("zero width but non-zero height must split");
        };
        assert_eq!(axis, Axis::Y, "only y has extent");
        assert_eq!((left, right), (vec![0], vec![1, 2]), "split at y = 3");
    }
}
