// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene-facing map abstraction shared by the tree and the flat baseline.

use alloc::vec::Vec;
use core::fmt::Debug;

use grove_collide::{CollisionError, Ray, Shape};
use kurbo::Point;

use crate::types::{ObjectFlags, QueryFilter};

/// A keyed collection of shapes answering region, point, and ray queries.
///
/// Mutations (`add`, `remove`, `update`, `set_flags`) touch only the backing
/// list. Implementations with a spatial structure keep answering from their
/// last [`Map::rebuild`] until it is called again.
pub trait Map<K: Copy + PartialEq + Debug> {
    /// Store `shape` under `key` with the given flags.
    fn add_with_flags(&mut self, key: K, shape: Shape, flags: ObjectFlags);

    /// Store `shape` under `key`, visible and pickable.
    fn add(&mut self, key: K, shape: Shape) {
        self.add_with_flags(key, shape, ObjectFlags::default());
    }

    /// Remove the first object stored under `key`, returning its shape.
    fn remove(&mut self, key: &K) -> Option<Shape>;

    /// Replace the flags of the first object stored under `key`.
    ///
    /// Returns `false` if no such object exists.
    fn set_flags(&mut self, key: &K, flags: ObjectFlags) -> bool;

    /// Number of stored objects.
    fn len(&self) -> usize;

    /// Whether the map holds no objects.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bring any spatial structure up to date with the backing list.
    fn rebuild(&mut self);

    /// Drop every object and any spatial structure.
    fn clear(&mut self);

    /// Mutate every stored shape in place, in insertion order.
    fn update<F>(&mut self, f: F)
    where
        F: FnMut(&K, &mut Shape),
        Self: Sized;

    /// Keys of objects passing `filter` whose shape collides with `region`.
    fn query_filtered(&self, region: &Shape, filter: QueryFilter)
    -> Result<Vec<K>, CollisionError>;

    /// Keys of objects passing `filter` whose shape contains `point`.
    fn query_point_filtered(
        &self,
        point: Point,
        filter: QueryFilter,
    ) -> Result<Vec<K>, CollisionError>;

    /// Key of the object passing `filter` that `ray` meets first.
    ///
    /// Hits at equal distance go to the object inserted first.
    fn query_ray_filtered(&self, ray: &Ray, filter: QueryFilter)
    -> Result<Option<K>, CollisionError>;

    /// [`Map::query_filtered`] with [`QueryFilter::ALL`].
    fn query(&self, region: &Shape) -> Result<Vec<K>, CollisionError> {
        self.query_filtered(region, QueryFilter::ALL)
    }

    /// [`Map::query_point_filtered`] with [`QueryFilter::ALL`].
    fn query_point(&self, point: Point) -> Result<Vec<K>, CollisionError> {
        self.query_point_filtered(point, QueryFilter::ALL)
    }

    /// [`Map::query_ray_filtered`] with [`QueryFilter::ALL`].
    fn query_ray(&self, ray: &Ray) -> Result<Option<K>, CollisionError> {
        self.query_ray_filtered(ray, QueryFilter::ALL)
    }
}

/// Running nearest hit for ray queries, ordered by `(distance, order)`.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Nearest<K> {
    best: Option<(f64, usize, K)>,
}

impl<K: Copy> Nearest<K> {
    pub(crate) const fn new() -> Self {
        Self { best: None }
    }

    /// Offer a shape the ray is known to intersect.
    ///
    /// `order` is the object's insertion position.
    pub(crate) fn offer(&mut self, ray: &Ray, shape: &Shape, order: usize, key: K) {
        // Grazing hits the cast cannot resolve rank at the far end.
        let t = ray.cast(shape).unwrap_or(ray.length());
        let closer = match self.best {
            None => true,
            Some((bt, bo, _)) => t < bt || (t == bt && order < bo),
        };
        if closer {
            self.best = Some((t, order, key));
        }
    }

    pub(crate) fn key(&self) -> Option<K> {
        self.best.map(|(_, _, k)| k)
    }
}
