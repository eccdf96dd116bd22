// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure framing math: which [`Transform`] puts a target rectangle in view.

use kurbo::{Rect, Vec2};

use crate::modes::{Half, LogicalView};
use crate::transform::Transform;
use crate::viewport::Viewport;

/// Smallest extent a target rectangle is treated as having.
///
/// Degenerate (zero-area) targets are framed as if they were this large
/// instead of dividing by zero.
pub const MIN_TARGET_EXTENT: f64 = 1e-6;

/// Inclusive range of scale factors the camera may settle on.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleExtent {
    /// Lowest allowed scale.
    pub min: f64,
    /// Highest allowed scale.
    pub max: f64,
}

impl ScaleExtent {
    /// Creates an extent, swapping the bounds if they are given out of order.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamps `scale` into this extent.
    ///
    /// An inverted extent (possible when deserialized) settles on `max`.
    #[must_use]
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }

    /// Returns `true` if `scale` lies inside this extent.
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}

impl Default for ScaleExtent {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 12.0,
        }
    }
}

/// Which part of the viewport a framed target must fit into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FrameWidth {
    /// A single half-viewport (`width / 2 × height`).
    #[default]
    Half,
    /// The whole container (`width × height`).
    Full,
}

/// Parameters of a single [`frame`] computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    /// Width the target is fit against.
    pub frame_width: FrameWidth,
    /// Fraction of the frame the target may occupy along its tighter axis.
    pub padding: f64,
    /// Floor applied to the fitted scale.
    pub min_scale: f64,
    /// Ceiling applied to the fitted scale.
    pub max_scale: f64,
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            frame_width: FrameWidth::Half,
            padding: 0.9,
            min_scale: 0.0,
            max_scale: f64::INFINITY,
        }
    }
}

/// The camera showing both halves, unscaled.
#[must_use]
pub fn identity() -> Transform {
    Transform::IDENTITY
}

/// Computes the transform that frames `target` inside `viewport`.
///
/// The target's center, shifted right by `half_offset`, lands on the
/// viewport center. The transform is composed as translate-to-center, then
/// scale, then translate by the negated target center, so zooming happens
/// about the viewport center rather than the origin.
///
/// Never produces NaN: an empty viewport or a non-finite target yields
/// [`identity`], and degenerate targets are widened to
/// [`MIN_TARGET_EXTENT`].
#[must_use]
pub fn frame(
    target: Rect,
    viewport: Viewport,
    half_offset: f64,
    params: &FrameParams,
) -> Transform {
    if viewport.is_empty() || !target.is_finite() || !half_offset.is_finite() {
        return identity();
    }
    let frame_width = match params.frame_width {
        FrameWidth::Half => viewport.half_width(),
        FrameWidth::Full => viewport.width,
    };
    let w = target.width().abs().max(MIN_TARGET_EXTENT);
    let h = target.height().abs().max(MIN_TARGET_EXTENT);
    let fit = params.padding / (w / frame_width).max(h / viewport.height);
    let scale = fit.min(params.max_scale).max(params.min_scale);
    if !scale.is_finite() || scale <= 0.0 {
        return identity();
    }

    let target_center = target.center().to_vec2() + Vec2::new(half_offset, 0.0);
    let view_center = viewport.center().to_vec2();
    Transform::new(view_center - target_center * scale, scale)
}

/// Framing constants shared by region clicks and home views.
///
/// Region clicks and home views use two different ceilings: region framing
/// never exceeds `region_max_scale`, while home framing is only bounded by
/// `scale_extent`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FramingConfig {
    /// Fraction of the frame a framed target occupies.
    pub padding: f64,
    /// Ceiling for region-click framing.
    pub region_max_scale: f64,
    /// Global scale range every produced transform lies in.
    pub scale_extent: ScaleExtent,
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            padding: 0.9,
            region_max_scale: 8.0,
            scale_extent: ScaleExtent::default(),
        }
    }
}

impl FramingConfig {
    /// Parameters used when a region is clicked.
    #[must_use]
    pub fn region_params(&self) -> FrameParams {
        FrameParams {
            frame_width: FrameWidth::Half,
            padding: self.padding,
            min_scale: self.scale_extent.min,
            max_scale: self.region_max_scale.min(self.scale_extent.max),
        }
    }

    /// Parameters used to frame a whole copy of the map as "home".
    #[must_use]
    pub fn home_params(&self) -> FrameParams {
        FrameParams {
            frame_width: FrameWidth::Full,
            padding: self.padding,
            min_scale: self.scale_extent.min,
            max_scale: self.scale_extent.max,
        }
    }

    /// Frames a region's bounds within the half it was clicked in.
    #[must_use]
    pub fn frame_region(&self, bounds: Rect, viewport: Viewport, half: Half) -> Transform {
        frame(
            bounds,
            viewport,
            viewport.half_offset(half),
            &self.region_params(),
        )
    }

    /// Frames the home content for `view`.
    ///
    /// [`LogicalView::Both`] is always the identity; a single-half view
    /// frames `collection_bounds` inside the whole container.
    #[must_use]
    pub fn frame_home(
        &self,
        collection_bounds: Rect,
        viewport: Viewport,
        view: LogicalView,
    ) -> Transform {
        match view.half() {
            None => identity(),
            Some(half) => frame(
                collection_bounds,
                viewport,
                viewport.half_offset(half),
                &self.home_params(),
            ),
        }
    }
}
