// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-down bounding volume hierarchy rebuilt wholesale from a flat object list.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use grove_collide::{
    Aabb, AabbBvFactory, BvFactory, CollisionChecker, CollisionDispatcher, CollisionError, Ray,
    SatChecker, Shape,
};
use kurbo::Point;
use log::{debug, trace};

use crate::map::{Map, Nearest};
use crate::strategy::{
    BvhStrategy, MedianCutBvhStrategy, Partition, centers_coincide, split_by_rank,
};
use crate::types::{BvhConfig, Entry, ObjectFlags, QueryFilter};

/// Index of a node in a tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    /// Position in the arena.
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Snapshot of an object taken when its leaf was built.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafItem<K> {
    order: usize,
    entry: Entry<K>,
}

impl<K: Copy> LeafItem<K> {
    /// The object's key.
    pub fn key(&self) -> K {
        self.entry.key
    }

    /// The object's shape at build time.
    pub fn shape(&self) -> &Shape {
        &self.entry.shape
    }

    /// The object's flags at build time.
    pub fn flags(&self) -> ObjectFlags {
        self.entry.flags
    }

    /// Insertion position of the object when the tree was built.
    pub fn order(&self) -> usize {
        self.order
    }
}

/// Payload of a node.
#[derive(Clone, Debug)]
pub enum NodeKind<K> {
    /// Terminal node owning its objects.
    Leaf(Vec<LeafItem<K>>),
    /// Node with two children and the union of their objects' bounding volumes.
    Internal {
        /// Bounding volume of every object below this node.
        bv: Aabb,
        /// Left child.
        left: NodeIdx,
        /// Right child.
        right: NodeIdx,
    },
}

/// A node of a [`TopDownBvhTree`].
#[derive(Clone, Debug)]
pub struct TopDownBvhNode<K> {
    depth: usize,
    parent: Option<NodeIdx>,
    kind: NodeKind<K>,
}

impl<K> TopDownBvhNode<K> {
    /// Distance from the root, which is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parent index, `None` for the root.
    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    /// Leaf or internal payload.
    pub fn kind(&self) -> &NodeKind<K> {
        &self.kind
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Bounding volume of an internal node. Leaves do not store one.
    pub fn bounding_volume(&self) -> Option<&Aabb> {
        match &self.kind {
            NodeKind::Internal { bv, .. } => Some(bv),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Objects of a leaf; empty for internal nodes.
    pub fn objects(&self) -> &[LeafItem<K>] {
        match &self.kind {
            NodeKind::Leaf(items) => items,
            NodeKind::Internal { .. } => &[],
        }
    }
}

/// Borrowed view of a node that can walk to its relatives.
pub struct NodeRef<'a, K> {
    arena: &'a [TopDownBvhNode<K>],
    idx: NodeIdx,
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K: Debug> Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("idx", &self.idx)
            .field("node", self.node())
            .finish()
    }
}

impl<'a, K> NodeRef<'a, K> {
    fn at(&self, idx: NodeIdx) -> Self {
        Self {
            arena: self.arena,
            idx,
        }
    }

    /// Arena index of this node.
    pub fn index(&self) -> NodeIdx {
        self.idx
    }

    /// The node itself.
    pub fn node(&self) -> &'a TopDownBvhNode<K> {
        &self.arena[self.idx.get()]
    }

    /// See [`TopDownBvhNode::is_leaf`].
    pub fn is_leaf(&self) -> bool {
        self.node().is_leaf()
    }

    /// See [`TopDownBvhNode::depth`].
    pub fn depth(&self) -> usize {
        self.node().depth()
    }

    /// See [`TopDownBvhNode::bounding_volume`].
    pub fn bounding_volume(&self) -> Option<&'a Aabb> {
        self.node().bounding_volume()
    }

    /// See [`TopDownBvhNode::objects`].
    pub fn objects(&self) -> &'a [LeafItem<K>] {
        self.node().objects()
    }

    /// Left child of an internal node.
    pub fn left(&self) -> Option<Self> {
        match self.node().kind {
            NodeKind::Internal { left, .. } => Some(self.at(left)),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Right child of an internal node.
    pub fn right(&self) -> Option<Self> {
        match self.node().kind {
            NodeKind::Internal { right, .. } => Some(self.at(right)),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|p| self.at(p))
    }
}

/// Bounding volume hierarchy over keyed shapes.
///
/// The tree is built top-down by [`Map::rebuild`]: a node with more than
/// [`BvhConfig::per_leaf`] objects, above [`BvhConfig::max_depth`], is split by
/// the strategy `S` into two children, and stores the union of its objects'
/// bounding volumes from the factory `F`. Queries prune subtrees whose volume
/// misses the query and run the narrow phase of checker `C` at the leaves.
///
/// Mutations only touch the backing list. Until the next rebuild, queries
/// answer for the objects as they were at the last rebuild (see
/// [`TopDownBvhTree::is_stale`]).
pub struct TopDownBvhTree<K, C = SatChecker, F = AabbBvFactory, S = MedianCutBvhStrategy> {
    config: BvhConfig,
    entries: Vec<Entry<K>>,
    arena: Vec<TopDownBvhNode<K>>,
    root: Option<NodeIdx>,
    dispatcher: CollisionDispatcher<C>,
    factory: F,
    strategy: S,
    stale: bool,
}

impl<K> TopDownBvhTree<K> {
    /// An empty tree with the default configuration and parts.
    pub fn new() -> Self {
        Self::with_config(BvhConfig::default())
    }

    /// An empty tree with the default parts.
    pub fn with_config(config: BvhConfig) -> Self {
        Self::with_parts(config, SatChecker, AabbBvFactory, MedianCutBvhStrategy)
    }
}

impl<K> Default for TopDownBvhTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C, F, S> TopDownBvhTree<K, C, F, S> {
    /// An empty tree with every part injected.
    pub fn with_parts(config: BvhConfig, checker: C, factory: F, strategy: S) -> Self {
        Self {
            config,
            entries: Vec::new(),
            arena: Vec::new(),
            root: None,
            dispatcher: CollisionDispatcher::new(checker),
            factory,
            strategy,
            stale: false,
        }
    }

    /// Build parameters.
    pub fn config(&self) -> BvhConfig {
        self.config
    }

    /// The narrow-phase checker.
    pub fn checker(&self) -> &C {
        self.dispatcher.checker()
    }

    /// The bounding-volume factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// The partitioning strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Objects in insertion order, including changes since the last rebuild.
    pub fn entries(&self) -> &[Entry<K>] {
        &self.entries
    }

    /// Whether the object list changed since the last rebuild.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Root of the last built tree; `None` if it was built from no objects.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.map(|idx| NodeRef {
            arena: &self.arena,
            idx,
        })
    }

    /// Node at `idx`, if it exists.
    pub fn node(&self, idx: NodeIdx) -> Option<NodeRef<'_, K>> {
        (idx.get() < self.arena.len()).then_some(NodeRef {
            arena: &self.arena,
            idx,
        })
    }

    /// Every node in arena order; the root comes first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_, K>> + '_ {
        (0..self.arena.len()).map(|i| NodeRef {
            arena: &self.arena,
            idx: NodeIdx::new(i),
        })
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

impl<K, C, F, S> TopDownBvhTree<K, C, F, S>
where
    K: Copy,
    F: BvFactory,
{
    /// Bounding volume of everything in the last built tree.
    pub fn bounds(&self) -> Option<Aabb> {
        let root = self.root()?;
        if let Some(bv) = root.bounding_volume() {
            return Some(*bv);
        }
        let boxes: Vec<Aabb> = root
            .objects()
            .iter()
            .map(|it| self.factory.shape_bv(it.shape()))
            .collect();
        (!boxes.is_empty()).then(|| self.factory.merge_all(&boxes))
    }
}

impl<K, C, F, S> Debug for TopDownBvhTree<K, C, F, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TopDownBvhTree")
            .field("config", &self.config)
            .field("len", &self.entries.len())
            .field("arena_nodes", &self.arena.len())
            .field("has_root", &self.root.is_some())
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}

struct Builder<'a, K, F, S> {
    config: BvhConfig,
    factory: &'a F,
    strategy: &'a S,
    arena: Vec<TopDownBvhNode<K>>,
    leaves: usize,
    deepest: usize,
}

impl<K: Copy, F: BvFactory, S: BvhStrategy> Builder<'_, K, F, S> {
    fn build(&mut self, items: Vec<LeafItem<K>>, depth: usize, parent: Option<NodeIdx>) -> NodeIdx {
        let idx = NodeIdx::new(self.arena.len());
        self.arena.push(TopDownBvhNode {
            depth,
            parent,
            kind: NodeKind::Leaf(Vec::new()),
        });
        self.deepest = self.deepest.max(depth);

        if items.len() <= self.config.per_leaf || depth >= self.config.max_depth {
            return self.leaf(idx, items);
        }

        let boxes: Vec<Aabb> = items
            .iter()
            .map(|it| self.factory.shape_bv(it.shape()))
            .collect();
        let (left, right) = match self.strategy.solve(&boxes) {
            Partition::EndState => {
                trace!("end state at depth {depth} with {} objects", items.len());
                return self.leaf(idx, items);
            }
            Partition::Split { left, right, axis } if left.is_empty() || right.is_empty() => {
                if centers_coincide(&boxes) {
                    trace!("forced leaf at depth {depth} with {} objects", items.len());
                    return self.leaf(idx, items);
                }
                trace!("one-sided split at depth {depth}, ranking along {axis:?}");
                split_by_rank(&boxes, axis)
            }
            Partition::Split { left, right, axis } => {
                trace!(
                    "split at depth {depth} along {axis:?}: {} left, {} right",
                    left.len(),
                    right.len()
                );
                (left, right)
            }
        };

        let bv = self.factory.merge_all(&boxes);
        let (left_items, right_items) = take_sides(items, &left, &right);
        let l = self.build(left_items, depth + 1, Some(idx));
        let r = self.build(right_items, depth + 1, Some(idx));
        self.arena[idx.get()].kind = NodeKind::Internal {
            bv,
            left: l,
            right: r,
        };
        idx
    }

    fn leaf(&mut self, idx: NodeIdx, items: Vec<LeafItem<K>>) -> NodeIdx {
        self.leaves += 1;
        self.arena[idx.get()].kind = NodeKind::Leaf(items);
        idx
    }
}

/// Move items into the sides named by `left` and `right`.
///
/// Indices the strategy left unassigned go left so no object is dropped.
fn take_sides<K>(
    items: Vec<LeafItem<K>>,
    left: &[usize],
    right: &[usize],
) -> (Vec<LeafItem<K>>, Vec<LeafItem<K>>) {
    let mut slots: Vec<Option<LeafItem<K>>> = items.into_iter().map(Some).collect();
    let mut take = |ids: &[usize]| -> Vec<LeafItem<K>> {
        ids.iter()
            .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
            .collect()
    };
    let mut l = take(left);
    let r = take(right);
    l.extend(slots.into_iter().flatten());
    (l, r)
}

impl<K, C, F, S> Map<K> for TopDownBvhTree<K, C, F, S>
where
    K: Copy + PartialEq + Debug,
    C: CollisionChecker,
    F: BvFactory,
    S: BvhStrategy,
{
    fn add_with_flags(&mut self, key: K, shape: Shape, flags: ObjectFlags) {
        self.entries.push(Entry { key, shape, flags });
        self.stale = true;
    }

    fn remove(&mut self, key: &K) -> Option<Shape> {
        let i = self.entries.iter().position(|e| e.key == *key)?;
        self.stale = true;
        Some(self.entries.remove(i).shape)
    }

    fn set_flags(&mut self, key: &K, flags: ObjectFlags) -> bool {
        match self.entries.iter_mut().find(|e| e.key == *key) {
            Some(e) => {
                e.flags = flags;
                self.stale = true;
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn rebuild(&mut self) {
        let items: Vec<LeafItem<K>> = self
            .entries
            .iter()
            .enumerate()
            .map(|(order, e)| LeafItem {
                order,
                entry: e.clone(),
            })
            .collect();
        self.stale = false;
        if items.is_empty() {
            self.arena.clear();
            self.root = None;
            debug!("rebuilt empty BVH");
            return;
        }

        let mut builder = Builder {
            config: self.config,
            factory: &self.factory,
            strategy: &self.strategy,
            arena: Vec::with_capacity(2 * items.len()),
            leaves: 0,
            deepest: 0,
        };
        let root = builder.build(items, 0, None);
        debug!(
            "rebuilt BVH: {} objects, {} nodes, {} leaves, depth {}",
            self.entries.len(),
            builder.arena.len(),
            builder.leaves,
            builder.deepest
        );
        self.arena = builder.arena;
        self.root = Some(root);
    }

    fn clear(&mut self) {
        debug!("cleared BVH with {} objects", self.entries.len());
        self.entries.clear();
        self.arena.clear();
        self.root = None;
        self.stale = false;
    }

    fn update<G>(&mut self, mut f: G)
    where
        G: FnMut(&K, &mut Shape),
    {
        for e in &mut self.entries {
            f(&e.key, &mut e.shape);
        }
        self.stale = true;
    }

    fn query_filtered(
        &self,
        region: &Shape,
        filter: QueryFilter,
    ) -> Result<Vec<K>, CollisionError> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return Ok(out);
        };
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            match &self.arena[i.get()].kind {
                NodeKind::Leaf(items) => {
                    for it in items {
                        if filter.matches(it.flags())
                            && self.dispatcher.collide(region, it.shape())?
                        {
                            out.push(it.key());
                        }
                    }
                }
                NodeKind::Internal { bv, left, right } => {
                    if self.dispatcher.collide_aabb(region, bv)? {
                        stack.push(*right);
                        stack.push(*left);
                    }
                }
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
        let Some(root) = self.root else {
            return Ok(out);
        };
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            match &self.arena[i.get()].kind {
                NodeKind::Leaf(items) => {
                    for it in items {
                        if filter.matches(it.flags())
                            && self.dispatcher.contains_point(it.shape(), point)?
                        {
                            out.push(it.key());
                        }
                    }
                }
                NodeKind::Internal { bv, left, right } => {
                    if bv.contains_point(point) {
                        stack.push(*right);
                        stack.push(*left);
                    }
                }
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
        let Some(root) = self.root else {
            return Ok(None);
        };
        let checker = self.dispatcher.checker();
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            match &self.arena[i.get()].kind {
                NodeKind::Leaf(items) => {
                    for it in items {
                        if filter.matches(it.flags())
                            && self.dispatcher.intersects_ray(it.shape(), ray)?
                        {
                            nearest.offer(ray, it.shape(), it.order(), it.key());
                        }
                    }
                }
                NodeKind::Internal { bv, left, right } => {
                    if checker.aabb_vs_ray(bv, ray)? {
                        stack.push(*right);
                        stack.push(*left);
                    }
                }
            }
        }
        Ok(nearest.key())
    }
}
