// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision manifolds and their dispatch to a [`CollisionResolver`].

use kurbo::Vec2;

use crate::error::CollisionError;
use crate::resolver::{CollisionResolver, Contact, SatResolver};
use crate::shapes::Shape;

/// Geometric result of a collision between two borrowed shapes.
///
/// `normal` points from [`Manifold::a`] toward [`Manifold::b`]. A manifold with
/// a zero normal holds no contact, which is the state [`Manifold::new`] starts in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Manifold<'a> {
    a: &'a Shape,
    b: &'a Shape,
    /// Overlap distance along `normal`.
    pub penetration: f64,
    /// Unit contact normal from `a` toward `b`, or zero when there is no contact.
    pub normal: Vec2,
}

impl<'a> Manifold<'a> {
    /// An empty manifold for the pair.
    pub const fn new(a: &'a Shape, b: &'a Shape) -> Self {
        Self {
            a,
            b,
            penetration: 0.0,
            normal: Vec2::ZERO,
        }
    }

    /// A manifold carrying `contact`.
    pub const fn with_contact(a: &'a Shape, b: &'a Shape, contact: Contact) -> Self {
        Self {
            a,
            b,
            penetration: contact.penetration,
            normal: contact.normal,
        }
    }

    /// First shape.
    pub const fn a(&self) -> &'a Shape {
        self.a
    }

    /// Second shape.
    pub const fn b(&self) -> &'a Shape {
        self.b
    }

    /// Swap the shapes and negate the normal.
    pub fn invert(&mut self) {
        core::mem::swap(&mut self.a, &mut self.b);
        self.normal = -self.normal;
    }

    /// Whether the last resolution found a contact.
    pub fn is_colliding(&self) -> bool {
        self.normal != Vec2::ZERO
    }

    /// Translation that moves `b` out of `a`.
    pub fn separation(&self) -> Vec2 {
        self.normal * self.penetration
    }

    /// Forget any previous contact.
    pub fn clear(&mut self) {
        self.penetration = 0.0;
        self.normal = Vec2::ZERO;
    }
}

/// Resolve a pair of shapes with `resolver`.
///
/// Reverse orderings (`Circle` vs `Aabb` and so on) run the canonical routine
/// with the operands swapped and invert the result, so the normal always points
/// from `a` toward `b`.
pub fn resolve<'a, R: CollisionResolver + ?Sized>(
    resolver: &R,
    a: &'a Shape,
    b: &'a Shape,
) -> Result<Option<Manifold<'a>>, CollisionError> {
    let contact = match (a, b) {
        (Shape::Aabb(x), Shape::Aabb(y)) => resolver.aabb_vs_aabb(x, y)?,
        (Shape::Aabb(x), Shape::Circle(y)) => resolver.aabb_vs_circle(x, y)?,
        (Shape::Aabb(x), Shape::Polygon(y)) => resolver.aabb_vs_polygon(x, y)?,
        (Shape::Circle(x), Shape::Aabb(y)) => resolver.circle_vs_aabb(x, y)?,
        (Shape::Circle(x), Shape::Circle(y)) => resolver.circle_vs_circle(x, y)?,
        (Shape::Circle(x), Shape::Polygon(y)) => resolver.circle_vs_polygon(x, y)?,
        (Shape::Polygon(x), Shape::Aabb(y)) => resolver.polygon_vs_aabb(x, y)?,
        (Shape::Polygon(x), Shape::Circle(y)) => resolver.polygon_vs_circle(x, y)?,
        (Shape::Polygon(x), Shape::Polygon(y)) => resolver.polygon_vs_polygon(x, y)?,
    };
    Ok(contact.map(|c| Manifold::with_contact(a, b, c)))
}

/// A resolver bundled with manifold dispatch.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManifoldDispatcher<R = SatResolver> {
    resolver: R,
}

impl<R: CollisionResolver> ManifoldDispatcher<R> {
    /// Wrap `resolver`.
    pub const fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// The wrapped resolver.
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// See [`resolve`].
    pub fn resolve<'a>(
        &self,
        a: &'a Shape,
        b: &'a Shape,
    ) -> Result<Option<Manifold<'a>>, CollisionError> {
        resolve(&self.resolver, a, b)
    }

    /// Fill `manifold` in place from its current shapes.
    ///
    /// Returns whether the shapes collide. On `false` the manifold is cleared.
    pub fn solve(&self, manifold: &mut Manifold<'_>) -> Result<bool, CollisionError> {
        match resolve(&self.resolver, manifold.a, manifold.b)? {
            Some(found) => {
                manifold.penetration = found.penetration;
                manifold.normal = found.normal;
                Ok(true)
            }
            None => {
                manifold.clear();
                Ok(false)
            }
        }
    }
}
