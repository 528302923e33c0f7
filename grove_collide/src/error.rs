// Copyright 2025 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision errors.

use thiserror::Error;

use crate::shapes::ShapeKind;

/// Error returned when a collision routine is asked for a combination it has no handler for.
///
/// Geometric degeneracies (coincident circles, zero-length rays) are handled
/// in place and never produce an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum CollisionError {
    /// The checker or resolver has no routine for this pair of shape kinds.
    #[error("{checker} has no handler for {a} vs {b}")]
    UnsupportedPair {
        /// Name of the checker or resolver that was asked.
        checker: &'static str,
        /// Kind of the first operand.
        a: ShapeKind,
        /// Kind of the second operand.
        b: ShapeKind,
    },
    /// The checker cannot test this shape kind against a ray.
    #[error("{checker} has no handler for {kind} vs Ray")]
    UnsupportedRay {
        /// Name of the checker that was asked.
        checker: &'static str,
        /// Kind of the shape operand.
        kind: ShapeKind,
    },
}

impl CollisionError {
    /// Shorthand for [`CollisionError::UnsupportedPair`].
    pub const fn unsupported(checker: &'static str, a: ShapeKind, b: ShapeKind) -> Self {
        Self::UnsupportedPair { checker, a, b }
    }

    /// Shorthand for [`CollisionError::UnsupportedRay`].
    pub const fn unsupported_ray(checker: &'static str, kind: ShapeKind) -> Self {
        Self::UnsupportedRay { checker, kind }
    }
}
