// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types shared by the maps: object flags, query filters, and build configuration.

use bitflags::bitflags;
use grove_collide::Shape;

bitflags! {
    /// Object flags controlling visibility and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Object is visible (participates in viewport culling queries).
        const VISIBLE  = 0b0000_0001;
        /// Object is pickable (participates in point and ray picking).
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Restricts query results by [`ObjectFlags`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// If true, only report objects marked [`ObjectFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only report objects marked [`ObjectFlags::PICKABLE`].
    pub pickable_only: bool,
}

impl QueryFilter {
    /// Accept every object.
    pub const ALL: Self = Self {
        visible_only: false,
        pickable_only: false,
    };

    /// Only visible objects.
    pub const VISIBLE: Self = Self {
        visible_only: true,
        pickable_only: false,
    };

    /// Only pickable objects.
    pub const PICKABLE: Self = Self {
        visible_only: false,
        pickable_only: true,
    };

    /// Whether an object with `flags` passes the filter.
    pub fn matches(&self, flags: ObjectFlags) -> bool {
        (!self.visible_only || flags.contains(ObjectFlags::VISIBLE))
            && (!self.pickable_only || flags.contains(ObjectFlags::PICKABLE))
    }
}

/// An object stored in a map: user key, shape, and flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<K> {
    /// Caller-supplied key reported by queries.
    pub key: K,
    /// The object's shape, tested by the narrow phase.
    pub shape: Shape,
    /// Visibility and picking flags.
    pub flags: ObjectFlags,
}

/// Tree build parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BvhConfig {
    /// A node with at most this many objects becomes a leaf.
    pub per_leaf: usize,
    /// A node at this depth becomes a leaf regardless of its object count.
    pub max_depth: usize,
}

impl BvhConfig {
    /// Default objects per leaf.
    pub const DEFAULT_PER_LEAF: usize = 2;
    /// Default maximum depth; the root is at depth 0.
    pub const DEFAULT_MAX_DEPTH: usize = 5;

    /// Create a configuration. `per_leaf` is raised to at least 1.
    pub const fn new(per_leaf: usize, max_depth: usize) -> Self {
        Self {
            per_leaf: if per_leaf == 0 { 1 } else { per_leaf },
            max_depth,
        }
    }

    /// Same configuration with a different leaf threshold.
    #[must_use]
    pub const fn with_per_leaf(self, per_leaf: usize) -> Self {
        Self::new(per_leaf, self.max_depth)
    }

    /// Same configuration with a different depth limit.
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self::new(self.per_leaf, max_depth)
    }
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PER_LEAF, Self::DEFAULT_MAX_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches_flags() {
        let hidden = ObjectFlags::PICKABLE;
        assert!(QueryFilter::ALL.matches(ObjectFlags::empty()), "ALL accepts anything");
        assert!(!QueryFilter::VISIBLE.matches(hidden), "hidden object filtered");
        assert!(QueryFilter::PICKABLE.matches(hidden), "still pickable");
        let both = QueryFilter {
            visible_only: true,
            pickable_only: true,
        };
        assert!(both.matches(ObjectFlags::default()), "defaults pass both");
    }

    #[test]
    fn config_defaults_and_clamp() {
        let c = BvhConfig::default();
        assert_eq!((c.per_leaf, c.max_depth), (2, 5), "defaults");
        assert_eq!(c.with_per_leaf(0).per_leaf, 1, "leaf threshold clamps to 1");
        assert_eq!(c.with_max_depth(9).max_depth, 9, "depth override");
    }
}
