// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use diptych_geo::RegionId;
use diptych_state::ActiveRegion;
use diptych_view::{Half, Transform};

use crate::scene::{HalfLayer, SurfaceStatus};
use crate::surface::RenderSurface;

/// One call received by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// [`RenderSurface::set_status`].
    Status(SurfaceStatus),
    /// [`RenderSurface::draw_regions`].
    Regions {
        /// Half that was drawn.
        half: Half,
        /// Scene generation of the layer.
        generation: u64,
        /// Number of regions drawn.
        count: usize,
    },
    /// [`RenderSurface::draw_borders`].
    Borders {
        /// Half that was drawn.
        half: Half,
        /// Scene generation of the layer.
        generation: u64,
    },
    /// [`RenderSurface::set_active`].
    Active(Option<ActiveRegion<RegionId>>),
    /// [`RenderSurface::apply_transform`].
    Transform {
        /// The applied camera.
        transform: Transform,
        /// Whether it was an intermediate animation frame.
        animate: bool,
    },
}

/// A surface that records every call, for tests and inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Drains the recording.
    pub fn take(&mut self) -> Vec<SurfaceOp> {
        core::mem::take(&mut self.ops)
    }

    /// The most recently applied camera.
    #[must_use]
    pub fn last_transform(&self) -> Option<Transform> {
        self.ops.iter().rev().find_map(|op| match op {
            SurfaceOp::Transform { transform, .. } => Some(*transform),
            _ => None,
        })
    }

    /// The most recently shown status.
    #[must_use]
    pub fn last_status(&self) -> Option<&SurfaceStatus> {
        self.ops.iter().rev().find_map(|op| match op {
            SurfaceOp::Status(status) => Some(status),
            _ => None,
        })
    }

    /// Number of region draws, across both halves.
    #[must_use]
    pub fn region_draws(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Regions { .. }))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn set_status(&mut self, status: &SurfaceStatus) {
        self.ops.push(SurfaceOp::Status(status.clone()));
    }

    fn draw_regions(&mut self, layer: &HalfLayer) {
        self.ops.push(SurfaceOp::Regions {
            half: layer.half,
            generation: layer.generation,
            count: layer.map.regions().len(),
        });
    }

    fn draw_borders(&mut self, layer: &HalfLayer) {
        self.ops.push(SurfaceOp::Borders {
            half: layer.half,
            generation: layer.generation,
        });
    }

    fn set_active(&mut self, active: Option<&ActiveRegion<RegionId>>) {
        self.ops.push(SurfaceOp::Active(active.cloned()));
    }

    fn apply_transform(&mut self, transform: Transform, animate: bool) {
        self.ops.push(SurfaceOp::Transform { transform, animate });
    }
}
