// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};

/// Uniform pan + zoom camera applied to all rendered geometry.
///
/// A world point `p` lands at `translate + scale * p` in container space.
/// Transforms are recomputed on every state transition and never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    /// Translation in container pixels.
    pub translate: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
}

impl Transform {
    /// The camera that shows both halves unscaled.
    pub const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    /// Creates a transform from its translation and scale.
    #[must_use]
    pub const fn new(translate: Vec2, scale: f64) -> Self {
        Self { translate, scale }
    }

    /// The equivalent [`Affine`].
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Maps a world point into container space.
    #[must_use]
    pub fn apply(self, pt: Point) -> Point {
        (pt.to_vec2() * self.scale + self.translate).to_point()
    }

    /// Maps a world rectangle into container space.
    #[must_use]
    pub fn apply_rect(self, rect: Rect) -> Rect {
        Rect::from_points(
            self.apply(rect.origin()),
            self.apply(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Maps a container point back into world space.
    ///
    /// A zero scale maps everything onto the translation origin.
    #[must_use]
    pub fn invert(self, pt: Point) -> Point {
        if self.scale == 0.0 {
            return Point::ZERO;
        }
        ((pt.to_vec2() - self.translate) / self.scale).to_point()
    }

    /// Returns this transform with the world pre-shifted by `offset`.
    ///
    /// `t.with_world_offset(o).apply(p) == t.apply(p + o)`.
    #[must_use]
    pub fn with_world_offset(self, offset: Vec2) -> Self {
        Self {
            translate: self.translate + offset * self.scale,
            scale: self.scale,
        }
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.translate.is_finite() && self.scale.is_finite()
    }

    /// Component-wise comparison with an absolute tolerance.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.translate.x - other.translate.x).abs() <= eps
            && (self.translate.y - other.translate.y).abs() <= eps
            && (self.scale - other.scale).abs() <= eps
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform> for Affine {
    fn from(t: Transform) -> Self {
        t.to_affine()
    }
}
