// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

use crate::modes::Half;

/// Pixel size of the whole split render surface.
///
/// The surface holds two half-width sub-viewports, left and right, each
/// `width / 2 × height`. Only resize events change it.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Container width in pixels.
    pub width: f64,
    /// Container height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport of the given container size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either side is zero, negative, or not finite.
    ///
    /// Nothing is framed against an empty viewport.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Width of a single half.
    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Size of a single half-viewport; projections are fit against this.
    #[must_use]
    pub fn half_size(&self) -> Size {
        Size::new(self.half_width(), self.height)
    }

    /// Horizontal offset of `half` inside the container.
    #[must_use]
    pub fn half_offset(&self, half: Half) -> f64 {
        match half {
            Half::Left => 0.0,
            Half::Right => self.half_width(),
        }
    }

    /// Offset of `half` as a vector.
    #[must_use]
    pub fn half_offset_vec(&self, half: Half) -> Vec2 {
        Vec2::new(self.half_offset(half), 0.0)
    }

    /// The rectangle `half` occupies in container coordinates.
    #[must_use]
    pub fn half_rect(&self, half: Half) -> Rect {
        let x0 = self.half_offset(half);
        Rect::new(x0, 0.0, x0 + self.half_width(), self.height)
    }

    /// Returns the half whose rectangle contains `pt`, if any.
    ///
    /// The shared edge at `width / 2` belongs to the right half.
    #[must_use]
    pub fn half_at(&self, pt: Point) -> Option<Half> {
        if self.is_empty() || pt.y < 0.0 || pt.y > self.height {
            return None;
        }
        if pt.x >= 0.0 && pt.x < self.half_width() {
            Some(Half::Left)
        } else if pt.x >= self.half_width() && pt.x <= self.width {
            Some(Half::Right)
        } else {
            None
        }
    }

    /// Center of the whole container.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The whole container as a rectangle at the origin.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl From<Size> for Viewport {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_partition_the_container() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.half_rect(Half::Left), Rect::new(0.0, 0.0, 400.0, 600.0));
        assert_eq!(
            vp.half_rect(Half::Right),
            Rect::new(400.0, 0.0, 800.0, 600.0)
        );
        assert_eq!(vp.half_at(Point::new(10.0, 10.0)), Some(Half::Left));
        assert_eq!(vp.half_at(Point::new(400.0, 10.0)), Some(Half::Right));
        assert_eq!(vp.half_at(Point::new(801.0, 10.0)), None);
    }

    #[test]
    fn degenerate_sizes_are_empty() {
        assert!(Viewport::new(0.0, 600.0).is_empty());
        assert!(Viewport::new(800.0, -1.0).is_empty());
        assert!(Viewport::new(f64::NAN, 600.0).is_empty());
        assert!(!Viewport::new(1.0, 1.0).is_empty());
        assert_eq!(Viewport::default().half_at(Point::ZERO), None);
    }
}
