// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diptych Surface: the split, two-copy render surface.
//!
//! The surface shows the same projected map twice, side by side. Instead of
//! clearing and redrawing on every change, the controller edits a [`Scene`]
//! (status, layout, geometry, highlight) and a [`Presenter`] reconciles it
//! onto any [`RenderSurface`], issuing only the calls that changed. Scenes
//! carry a generation; a presenter never applies a scene older than the one
//! it already shows.
//!
//! Clicks are resolved by [`Scene::hit`], which scopes each click to the half
//! it landed in so left and right copies of a region stay distinct.
//!
//! Two surfaces are provided:
//! - [`RecordingSurface`]: records every call as a [`SurfaceOp`].
//! - [`SvgSurface`]: retains the latest state and exports it as SVG, with
//!   strokes compensated for the camera scale.

extern crate alloc;

mod recording;
mod scene;
mod surface;
mod svg;

pub use recording::{RecordingSurface, SurfaceOp};
pub use scene::{HalfLayer, Hit, Scene, SurfaceStatus};
pub use surface::{Presenter, RenderSurface};
pub use svg::{SvgStyle, SvgSurface};
