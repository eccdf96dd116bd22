// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use diptych_geo::RegionId;
use diptych_state::ActiveRegion;
use diptych_view::Transform;

use crate::scene::{HalfLayer, Scene, SurfaceStatus};

/// A split two-copy surface the camera is applied to.
///
/// Implementations draw what they are told and keep no interaction state;
/// clicks are resolved against the [`Scene`].
pub trait RenderSurface {
    /// Shows the loading, failure, or ready presentation.
    fn set_status(&mut self, status: &SurfaceStatus);

    /// Replaces the regions drawn in `layer.half`.
    fn draw_regions(&mut self, layer: &HalfLayer);

    /// Replaces the border mesh drawn in `layer.half`.
    fn draw_borders(&mut self, layer: &HalfLayer);

    /// Highlights `active`, or nothing.
    fn set_active(&mut self, active: Option<&ActiveRegion<RegionId>>);

    /// Applies the camera. `animate` is `true` for intermediate frames of an
    /// animated transition and `false` for jumps and final frames.
    fn apply_transform(&mut self, transform: Transform, animate: bool);
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    fn set_status(&mut self, status: &SurfaceStatus) {
        (**self).set_status(status);
    }

    fn draw_regions(&mut self, layer: &HalfLayer) {
        (**self).draw_regions(layer);
    }

    fn draw_borders(&mut self, layer: &HalfLayer) {
        (**self).draw_borders(layer);
    }

    fn set_active(&mut self, active: Option<&ActiveRegion<RegionId>>) {
        (**self).set_active(active);
    }

    fn apply_transform(&mut self, transform: Transform, animate: bool) {
        (**self).apply_transform(transform, animate);
    }
}

#[derive(Clone, Debug)]
struct Presented {
    generation: u64,
    status: SurfaceStatus,
    active: Option<ActiveRegion<RegionId>>,
}

/// Reconciles a [`Scene`] onto a [`RenderSurface`], issuing only the calls
/// needed to move from what was last presented.
#[derive(Debug)]
pub struct Presenter<S> {
    surface: S,
    presented: Option<Presented>,
}

impl<S: RenderSurface> Presenter<S> {
    /// Wraps a surface that has shown nothing yet.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            presented: None,
        }
    }

    /// The wrapped surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The wrapped surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwraps the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Generation of the last presented scene.
    pub fn presented_generation(&self) -> Option<u64> {
        self.presented.as_ref().map(|p| p.generation)
    }

    /// Brings the surface in line with `scene`.
    ///
    /// Returns `false` without touching the surface if `scene` is older than
    /// what was already presented.
    pub fn present(&mut self, scene: &Scene) -> bool {
        let previous = self.presented.take();
        if let Some(p) = &previous
            && scene.generation() < p.generation
        {
            self.presented = previous;
            return false;
        }
        let fresh = previous
            .as_ref()
            .is_none_or(|p| p.generation != scene.generation());

        if fresh || previous.as_ref().is_none_or(|p| &p.status != scene.status()) {
            self.surface.set_status(scene.status());
        }
        if fresh {
            for layer in scene.layers() {
                self.surface.draw_regions(&layer);
                self.surface.draw_borders(&layer);
            }
        }
        if fresh || previous.as_ref().is_none_or(|p| p.active.as_ref() != scene.active()) {
            self.surface.set_active(scene.active());
        }

        self.presented = Some(Presented {
            generation: scene.generation(),
            status: scene.status().clone(),
            active: scene.active().cloned(),
        });
        true
    }

    /// Applies the camera to the surface.
    pub fn apply_transform(&mut self, transform: Transform, animate: bool) {
        self.surface.apply_transform(transform, animate);
    }
}
