// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based interpolation between two camera transforms.
//!
//! A [`Transition`] is a value: it knows where it started, where it ends and
//! how long it takes, and can be sampled at any timestamp. It holds no timer
//! and schedules nothing; hosts advance it from their render loop. Replacing
//! a transition with a new one (starting from the current sampled transform)
//! is how an in-flight animation is superseded.

use core::f64::consts::SQRT_2;
use core::time::Duration;

use kurbo::{Point, Vec2};

use crate::transform::Transform;
use crate::viewport::Viewport;

/// Easing curve applied to normalized transition time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    /// No easing.
    Linear,
    /// Decelerating cubic.
    CubicOut,
    /// Symmetric cubic, slow at both ends.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps normalized time `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// How the camera travels between two transforms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Interpolation {
    /// Smooth zoom along the van Wijk & Nuij optimal path: zoom out, pan,
    /// zoom in, so long pans stay legible.
    #[default]
    Smooth,
    /// Component-wise linear interpolation of translation and scale.
    Linear,
}

/// Timing and path settings for camera transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitionConfig {
    /// Total transition time in milliseconds.
    pub duration_ms: u64,
    /// Easing applied to normalized time.
    pub easing: Easing,
    /// Path the camera follows.
    pub interpolation: Interpolation,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 750,
            easing: Easing::default(),
            interpolation: Interpolation::default(),
        }
    }
}

impl TransitionConfig {
    /// The configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

const RHO: f64 = SQRT_2;
const RHO2: f64 = 2.0;
const RHO4: f64 = 4.0;
const EPSILON2: f64 = 1e-12;

/// Optimal zoom/pan path between two views, each given as a world-space
/// center and a world-space visible extent.
#[derive(Clone, Copy, Debug)]
struct SmoothZoom {
    u0: Point,
    w0: f64,
    delta: Vec2,
    d1: f64,
    r0: f64,
    s: f64,
    straight: bool,
}

impl SmoothZoom {
    fn new(u0: Point, w0: f64, u1: Point, w1: f64) -> Self {
        let delta = u1 - u0;
        let d2 = delta.hypot2();
        if d2 < EPSILON2 {
            return Self {
                u0,
                w0,
                delta,
                d1: 0.0,
                r0: 0.0,
                s: (w1 / w0).ln() / RHO,
                straight: true,
            };
        }
        let d1 = d2.sqrt();
        let b0 = (w1 * w1 - w0 * w0 + RHO4 * d2) / (2.0 * w0 * RHO2 * d1);
        let b1 = (w1 * w1 - w0 * w0 - RHO4 * d2) / (2.0 * w1 * RHO2 * d1);
        let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
        let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
        Self {
            u0,
            w0,
            delta,
            d1,
            r0,
            s: (r1 - r0) / RHO,
            straight: false,
        }
    }

    fn at(&self, t: f64) -> (Point, f64) {
        if self.straight {
            return (self.u0 + self.delta * t, self.w0 * (RHO * t * self.s).exp());
        }
        let s = t * self.s;
        let cosh_r0 = self.r0.cosh();
        let u = self.w0 / (RHO2 * self.d1)
            * (cosh_r0 * (RHO * s + self.r0).tanh() - self.r0.sinh());
        (
            self.u0 + self.delta * u,
            self.w0 * cosh_r0 / (RHO * s + self.r0).cosh(),
        )
    }
}

#[derive(Clone, Copy, Debug)]
enum Path {
    Linear,
    Smooth {
        center: Point,
        extent: f64,
        zoom: SmoothZoom,
    },
}

/// An eased camera move from one transform to another.
#[derive(Clone, Copy, Debug)]
pub struct Transition {
    from: Transform,
    to: Transform,
    start: Duration,
    duration: Duration,
    easing: Easing,
    path: Path,
}

impl Transition {
    /// Creates a transition that starts at `start` (a host timestamp).
    ///
    /// Smooth interpolation needs a non-empty viewport and positive scales on
    /// both ends; otherwise the transition falls back to linear.
    #[must_use]
    pub fn new(
        from: Transform,
        to: Transform,
        viewport: Viewport,
        start: Duration,
        config: &TransitionConfig,
    ) -> Self {
        let smooth_ok = !viewport.is_empty()
            && from.scale > 0.0
            && to.scale > 0.0
            && from.is_finite()
            && to.is_finite();
        let path = match config.interpolation {
            Interpolation::Smooth if smooth_ok => {
                let center = viewport.center();
                let extent = viewport.width.max(viewport.height);
                let zoom = SmoothZoom::new(
                    from.invert(center),
                    extent / from.scale,
                    to.invert(center),
                    extent / to.scale,
                );
                Path::Smooth {
                    center,
                    extent,
                    zoom,
                }
            }
            _ => Path::Linear,
        };
        Self {
            from,
            to,
            start,
            duration: config.duration(),
            easing: config.easing,
            path,
        }
    }

    /// Transform at the start of the transition.
    #[must_use]
    pub fn from(&self) -> Transform {
        self.from
    }

    /// Transform the transition settles on.
    #[must_use]
    pub fn target(&self) -> Transform {
        self.to
    }

    /// Normalized, un-eased progress at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Returns `true` once `now` has reached the end of the transition.
    #[must_use]
    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// Samples the camera at `now`. The final sample is exactly the target.
    #[must_use]
    pub fn sample(&self, now: Duration) -> Transform {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let e = self.easing.apply(t);
        let sampled = match self.path {
            Path::Linear => Transform::new(
                self.from.translate + (self.to.translate - self.from.translate) * e,
                self.from.scale + (self.to.scale - self.from.scale) * e,
            ),
            Path::Smooth {
                center,
                extent,
                zoom,
            } => {
                let (u, w) = zoom.at(e);
                let k = extent / w;
                Transform::new(center.to_vec2() - u.to_vec2() * k, k)
            }
        };
        if sampled.is_finite() { sampled } else { self.to }
    }
}
