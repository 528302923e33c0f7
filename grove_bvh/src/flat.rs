// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat list map with linear scans. Small and simple; good for tiny sets and as
//! a reference for the tree.

use alloc::vec::Vec;
use core::fmt::Debug;

use grove_collide::{CollisionChecker, CollisionDispatcher, CollisionError, Ray, SatChecker, Shape};
use kurbo::Point;

use crate::map::{Map, Nearest};
use crate::types::{Entry, ObjectFlags, QueryFilter};

/// Map that runs the narrow phase against every stored object.
///
/// Queries always reflect the current list; [`Map::rebuild`] does nothing.
pub struct FlatMap<K, C = SatChecker> {
    entries: Vec<Entry<K>>,
    dispatcher: CollisionDispatcher<C>,
}

impl<K> FlatMap<K> {
    /// An empty map using [`SatChecker`].
    pub fn new() -> Self {
        Self::with_checker(SatChecker)
    }
}

impl<K> Default for FlatMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> FlatMap<K, C> {
    /// An empty map using `checker` for the narrow phase.
    pub fn with_checker(checker: C) -> Self {
        Self {
            entries: Vec::new(),
            dispatcher: CollisionDispatcher::new(checker),
        }
    }

    /// Stored objects in insertion order.
    pub fn entries(&self) -> &[Entry<K>] {
        &self.entries
    }

    /// The narrow-phase checker.
    pub fn checker(&self) -> &C {
        self.dispatcher.checker()
    }
}

impl<K, C> Debug for FlatMap<K, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatMap")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K, C> Map<K> for FlatMap<K, C>
where
    K: Copy + PartialEq + Debug,
    C: CollisionChecker,
{
    fn add_with_flags(&mut self, key: K, shape: Shape, flags: ObjectFlags) {
        self.entries.push(Entry { key, shape, flags });
    }

    fn remove(&mut self, key: &K) -> Option<Shape> {
        let i = self.entries.iter().position(|e| e.key == *key)?;
        Some(self.entries.remove(i).shape)
    }

    fn set_flags(&mut self, key: &K, flags: ObjectFlags) -> bool {
        match self.entries.iter_mut().find(|e| e.key == *key) {
            Some(e) => {
                e.flags = flags;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn rebuild(&mut self) {}

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn update<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut Shape),
    {
        for e in &mut self.entries {
            f(&e.key, &mut e.shape);
        }
    }

    fn query_filtered(
        &self,
        region: &Shape,
        filter: QueryFilter,
    ) -> Result<Vec<K>, CollisionError> {
        let mut out = Vec::new();
        for e in &self.entries {
            if filter.matches(e.flags) && self.dispatcher.collide(region, &e.shape)? {
                out.push(e.key);
            }
        }
        Ok(out)
    }

    fn query_point_filtered(
        &self,
        point: Point,
        filter: QueryFilter,
    ) -> Result<Vec<K>, CollisionError> {
        let mut out = Vec::new();
        for e in &self.entries {
            if filter.matches(e.flags) && self.dispatcher.contains_point(&e.shape, point)? {
                out.push(e.key);
            }
        }
        Ok(out)
    }

    fn query_ray_filtered(
        &self,
        ray: &Ray,
        filter: QueryFilter,
    ) -> Result<Option<K>, CollisionError> {
        let mut nearest = Nearest::new();
        for (i, e) in self.entries.iter().enumerate() {
            if filter.matches(e.flags) && self.dispatcher.intersects_ray(&e.shape, ray)? {
                nearest.offer(ray, &e.shape, i, e.key);
            }
        }
        Ok(nearest.key())
    }
}
