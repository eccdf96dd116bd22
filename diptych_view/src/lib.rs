// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diptych View: camera primitives for a split, two-copy map surface.
//!
//! The render surface shows two identical copies of a map side by side. This
//! crate holds the headless math that decides where the camera looks:
//! - [`Viewport`]: the container size and its two half-viewports.
//! - [`Transform`]: a uniform translate + scale camera.
//! - [`frame`] and [`FramingConfig`]: which transform fits a target rectangle
//!   into a half (region clicks) or the whole container (home views).
//! - [`Transition`]: an eased, optionally smooth-zoom interpolation between
//!   two transforms, sampled at host timestamps.
//!
//! It does **not** own any scene, geometry, or timer. Callers feed it
//! rectangles already in projected (pixel) space and sample transitions from
//! their own render loop.
//!
//! ## Framing a clicked region
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use diptych_view::{FramingConfig, Half, Viewport};
//!
//! let viewport = Viewport::new(800.0, 600.0);
//! let config = FramingConfig::default();
//!
//! // A 100x100 region in the left half fills 90% of the 400px half width,
//! // capped at the region ceiling of 8.
//! let t = config.frame_region(Rect::new(0.0, 0.0, 100.0, 100.0), viewport, Half::Left);
//! assert!((t.scale - 3.6).abs() < 1e-9);
//!
//! // The region's center lands on the container center.
//! let c = t.apply(Point::new(50.0, 50.0));
//! assert!((c - viewport.center()).hypot() < 1e-9);
//! ```
//!
//! ## Animating
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Vec2;
//! use diptych_view::{Transform, Transition, TransitionConfig, Viewport};
//!
//! let viewport = Viewport::new(800.0, 600.0);
//! let target = Transform::new(Vec2::new(220.0, 120.0), 3.6);
//! let tr = Transition::new(
//!     Transform::IDENTITY,
//!     target,
//!     viewport,
//!     Duration::ZERO,
//!     &TransitionConfig::default(),
//! );
//! assert_eq!(tr.sample(Duration::from_millis(750)), target);
//! ```

mod framing;
mod modes;
mod transform;
mod transition;
mod viewport;

pub use framing::{
    FrameParams, FrameWidth, FramingConfig, MIN_TARGET_EXTENT, ScaleExtent, frame, identity,
};
pub use modes::{Half, LogicalView, ParseViewError};
pub use transform::Transform;
pub use transition::{Easing, Interpolation, Transition, TransitionConfig};
pub use viewport::Viewport;
