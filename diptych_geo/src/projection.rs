// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map projections at unit scale, plus fitting them to a viewport.
//!
//! Projections here produce *unit* planar coordinates with `y` pointing
//! down; [`Fit`] then scales and translates them into pixels. Because every
//! projection is linear in its scale and translation, fitting is a single
//! affine step applied after projection.

use core::f64::consts::PI;

use kurbo::{Point, Rect, Size, Vec2};

/// Converts geographic positions into unit-scale planar coordinates.
pub trait GeoProjection {
    /// Projects a `(longitude, latitude)` position in degrees.
    ///
    /// Returns `None` for positions the projection does not cover.
    fn project_point(&self, lon_lat: Point) -> Option<Point>;

    /// Projects a ring or line, appending the projected points to `out`.
    ///
    /// The default projects each position independently and drops the ones
    /// that are not covered.
    fn project_line(&self, line: &[Point], out: &mut Vec<Point>) {
        out.extend(line.iter().filter_map(|&p| self.project_point(p)));
    }
}

impl<P: GeoProjection + ?Sized> GeoProjection for &P {
    fn project_point(&self, lon_lat: Point) -> Option<Point> {
        (**self).project_point(lon_lat)
    }

    fn project_line(&self, line: &[Point], out: &mut Vec<Point>) {
        (**self).project_line(line, out);
    }
}

/// Planar passthrough for topologies that are already projected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl GeoProjection for Identity {
    fn project_point(&self, p: Point) -> Option<Point> {
        Some(p)
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

/// Albers conic equal-area projection with configurable standard parallels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConicEqualArea {
    n: f64,
    c: f64,
    r0: f64,
    rotate: f64,
    origin: Point,
}

impl ConicEqualArea {
    /// Creates a projection.
    ///
    /// - `parallels`: the two standard parallels, in degrees.
    /// - `rotate`: degrees added to every longitude before projecting.
    /// - `center`: the rotated `(longitude, latitude)` that maps to the origin.
    #[must_use]
    pub fn new(parallels: [f64; 2], rotate: f64, center: Point) -> Self {
        let sy0 = parallels[0].to_radians().sin();
        let n = (sy0 + parallels[1].to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let r0 = c.sqrt() / n;
        let mut projection = Self {
            n,
            c,
            r0,
            rotate: rotate.to_radians(),
            origin: Point::ZERO,
        };
        projection.origin = projection.raw(center.x.to_radians(), center.y.to_radians());
        projection
    }

    /// The reference projection for the contiguous United States.
    #[must_use]
    pub fn albers() -> Self {
        Self::new([29.5, 45.5], 96.0, Point::new(-0.6, 38.7))
    }

    fn raw(&self, lambda: f64, phi: f64) -> Point {
        let r = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let x = lambda * self.n;
        Point::new(r * x.sin(), self.r0 - r * x.cos())
    }
}

impl GeoProjection for ConicEqualArea {
    fn project_point(&self, lon_lat: Point) -> Option<Point> {
        if !(lon_lat.x.is_finite() && lon_lat.y.is_finite()) {
            return None;
        }
        let lambda = wrap_longitude(lon_lat.x.to_radians() + self.rotate);
        let p = self.raw(lambda, lon_lat.y.to_radians());
        Some(Point::new(p.x - self.origin.x, self.origin.y - p.y))
    }
}

/// One member of a composite projection: a projection placed at an offset
/// and scale, valid only inside its clip extent.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Inset {
    projection: ConicEqualArea,
    scale: f64,
    offset: Vec2,
    extent: Rect,
}

impl Inset {
    fn place(&self, lon_lat: Point) -> Option<Point> {
        let p = self.projection.project_point(lon_lat)?;
        Some((p.to_vec2() * self.scale + self.offset).to_point())
    }

    fn accepts(&self, lon_lat: Point) -> Option<Point> {
        self.place(lon_lat).filter(|p| self.extent.contains(*p))
    }
}

/// Composite projection of the United States: the lower 48 states with
/// Alaska and Hawaii drawn as insets below the southwest.
///
/// Each ring is placed by the first member (lower 48, then Alaska, then
/// Hawaii) whose clip extent contains the ring's first vertex, and the whole
/// ring is projected with that member so shapes are never split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlbersUsa {
    insets: [Inset; 3],
}

impl AlbersUsa {
    /// Creates the composite at unit scale.
    #[must_use]
    pub fn new() -> Self {
        const EPS: f64 = 1e-9;
        let lower48 = Inset {
            projection: ConicEqualArea::albers(),
            scale: 1.0,
            offset: Vec2::ZERO,
            extent: Rect::new(-0.455, -0.238, 0.455, 0.238),
        };
        let alaska = Inset {
            projection: ConicEqualArea::new([55.0, 65.0], 154.0, Point::new(-2.0, 58.5)),
            scale: 0.35,
            offset: Vec2::new(-0.307, 0.201),
            extent: Rect::new(-0.425 + EPS, 0.120 + EPS, -0.214 - EPS, 0.234 - EPS),
        };
        let hawaii = Inset {
            projection: ConicEqualArea::new([8.0, 18.0], 157.0, Point::new(-3.0, 19.9)),
            scale: 1.0,
            offset: Vec2::new(-0.205, 0.212),
            extent: Rect::new(-0.214 + EPS, 0.166 + EPS, -0.115 - EPS, 0.234 - EPS),
        };
        Self {
            insets: [lower48, alaska, hawaii],
        }
    }

    fn inset_for(&self, lon_lat: Point) -> Option<&Inset> {
        self.insets.iter().find(|i| i.accepts(lon_lat).is_some())
    }
}

impl Default for AlbersUsa {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoProjection for AlbersUsa {
    fn project_point(&self, lon_lat: Point) -> Option<Point> {
        self.insets.iter().find_map(|i| i.accepts(lon_lat))
    }

    fn project_line(&self, line: &[Point], out: &mut Vec<Point>) {
        let Some(inset) = line.first().and_then(|&p| self.inset_for(p)) else {
            return;
        };
        out.extend(line.iter().filter_map(|&p| inset.place(p)));
    }
}

/// Scale and translation that place unit projection output into pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    /// Pixels per unit.
    pub scale: f64,
    /// Pixel offset applied after scaling.
    pub translate: Vec2,
}

impl Fit {
    /// Leaves unit coordinates untouched.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    /// Computes the fit that centers `unit_bounds` in a `size` box as large
    /// as possible without distortion.
    ///
    /// Zero-width or zero-height bounds are constrained only by the other
    /// axis; empty bounds or an empty box yield [`Fit::IDENTITY`].
    #[must_use]
    pub fn to_size(unit_bounds: Rect, size: Size) -> Self {
        let (w, h) = (size.width, size.height);
        if !(w > 0.0 && h > 0.0) || !unit_bounds.is_finite() {
            return Self::IDENTITY;
        }
        let sx = if unit_bounds.width() > 0.0 {
            w / unit_bounds.width()
        } else {
            f64::INFINITY
        };
        let sy = if unit_bounds.height() > 0.0 {
            h / unit_bounds.height()
        } else {
            f64::INFINITY
        };
        let scale = sx.min(sy);
        let scale = if scale.is_finite() { scale } else { 1.0 };
        let translate = Vec2::new(
            (w - scale * (unit_bounds.x0 + unit_bounds.x1)) / 2.0,
            (h - scale * (unit_bounds.y0 + unit_bounds.y1)) / 2.0,
        );
        Self { scale, translate }
    }

    /// Places a unit point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        (p.to_vec2() * self.scale + self.translate).to_point()
    }
}
