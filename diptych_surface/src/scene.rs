// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The declarative description of what the surface should show.

use alloc::sync::Arc;

use diptych_geo::{LoadState, ProjectedMap, RegionId};
use diptych_state::ActiveRegion;
use diptych_view::{Half, Transform, Viewport};
use kurbo::{Point, Vec2};

/// Presentation state of the surface, derived from the load lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SurfaceStatus {
    /// Nothing requested yet; nothing is shown.
    #[default]
    Idle,
    /// A loading indicator is shown and region clicks are not accepted.
    Loading,
    /// The failure reason is shown next to a retry action.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
    /// The map is interactive.
    Ready,
}

impl From<&LoadState> for SurfaceStatus {
    fn from(state: &LoadState) -> Self {
        match state {
            LoadState::Idle => Self::Idle,
            LoadState::Loading => Self::Loading,
            LoadState::Loaded => Self::Ready,
            LoadState::Failed(reason) => Self::Failed {
                reason: reason.clone(),
            },
        }
    }
}

/// One half's copy of the projected map.
///
/// Both halves share the same [`ProjectedMap`]; only `offset` differs.
#[derive(Clone, Debug)]
pub struct HalfLayer {
    /// Scene generation this layer was built for.
    pub generation: u64,
    /// Which copy this is.
    pub half: Half,
    /// Where the half's origin sits in container space.
    pub offset: Vec2,
    /// Shared projected geometry, in half-local pixels.
    pub map: Arc<ProjectedMap>,
}

/// Result of hit-testing a click.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    /// The click landed on a region in one half.
    Region(ActiveRegion<RegionId>),
    /// The click landed outside every region.
    Background,
}

/// What the surface should show.
///
/// The controller edits a `Scene`; a [`Presenter`](crate::Presenter)
/// reconciles it onto a [`RenderSurface`](crate::RenderSurface). Every
/// rebuild bumps the generation so results from older passes can be told
/// apart and dropped.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    generation: u64,
    viewport: Viewport,
    map: Option<Arc<ProjectedMap>>,
    status: SurfaceStatus,
    active: Option<ActiveRegion<RegionId>>,
}

impl Scene {
    /// Creates an idle, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every [`Scene::rebuild`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The container the scene was laid out for.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The projected map, once one is available.
    #[must_use]
    pub fn map(&self) -> Option<&Arc<ProjectedMap>> {
        self.map.as_ref()
    }

    /// Presentation status.
    #[must_use]
    pub fn status(&self) -> &SurfaceStatus {
        &self.status
    }

    /// The highlighted region.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveRegion<RegionId>> {
        self.active.as_ref()
    }

    /// Sets the presentation status.
    pub fn set_status(&mut self, status: SurfaceStatus) {
        self.status = status;
    }

    /// Sets the highlighted region.
    pub fn set_active(&mut self, active: Option<ActiveRegion<RegionId>>) {
        self.active = active;
    }

    /// Replaces the layout and geometry, starting a new generation.
    ///
    /// The highlight is cleared since it referred to the old geometry.
    pub fn rebuild(&mut self, viewport: Viewport, map: Option<Arc<ProjectedMap>>) -> u64 {
        self.generation += 1;
        self.viewport = viewport;
        self.map = map;
        self.active = None;
        self.generation
    }

    /// The two half layers, left first, or nothing before a map is set.
    pub fn layers(&self) -> impl Iterator<Item = HalfLayer> + '_ {
        self.map.iter().flat_map(move |map| {
            Half::ALL.into_iter().map(move |half| HalfLayer {
                generation: self.generation,
                half,
                offset: self.viewport.half_offset_vec(half),
                map: Arc::clone(map),
            })
        })
    }

    /// Hit-tests a click at `point` in container coordinates, with the
    /// camera at `transform`.
    ///
    /// The click is mapped into world space, scoped to the half containing
    /// it, and tested against that half's regions. Returns `None` until the
    /// scene is ready.
    #[must_use]
    pub fn hit(&self, point: Point, transform: Transform) -> Option<Hit> {
        if self.status != SurfaceStatus::Ready {
            return None;
        }
        let map = self.map.as_ref()?;
        let world = transform.invert(point);
        let Some(half) = self.viewport.half_at(world) else {
            return Some(Hit::Background);
        };
        let local = world - self.viewport.half_offset_vec(half);
        Some(match map.region_at(local) {
            Some(region) => Hit::Region(ActiveRegion {
                id: region.id.clone(),
                half,
            }),
            None => Hit::Background,
        })
    }
}

#[cfg(test)]
mod tests {
    use diptych_geo::{BorderMesh, FeatureCollection, Identity, MapData, ProjectionAdapter, Region};
    use kurbo::Size;

    use super::*;

    fn scene() -> Scene {
        let square = Region {
            id: "sq".into(),
            name: None,
            polygons: vec![vec![vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(0.0, 10.0),
                Point::new(0.0, 0.0),
            ]]],
        };
        let data = MapData {
            features: FeatureCollection::new(vec![square]),
            borders: BorderMesh::default(),
        };
        let viewport = Viewport::new(200.0, 100.0);
        let map = ProjectionAdapter::new(Identity).fit(Size::new(100.0, 100.0), &data);
        let mut scene = Scene::new();
        scene.rebuild(viewport, Some(Arc::new(map)));
        scene.set_status(SurfaceStatus::Ready);
        scene
    }

    #[test]
    fn hits_are_scoped_to_halves() {
        let scene = scene();
        let t = Transform::IDENTITY;
        let left = scene.hit(Point::new(50.0, 50.0), t);
        let right = scene.hit(Point::new(150.0, 50.0), t);
        assert_eq!(
            left,
            Some(Hit::Region(ActiveRegion {
                id: "sq".into(),
                half: Half::Left
            }))
        );
        assert_eq!(
            right,
            Some(Hit::Region(ActiveRegion {
                id: "sq".into(),
                half: Half::Right
            }))
        );
    }

    #[test]
    fn hits_follow_the_camera() {
        let scene = scene();
        // Zoomed 2x about the origin: the left square now covers 0..200.
        let t = Transform::new(Vec2::ZERO, 2.0);
        assert!(matches!(
            scene.hit(Point::new(190.0, 50.0), t),
            Some(Hit::Region(ActiveRegion {
                half: Half::Left,
                ..
            }))
        ));
        // Outside the container in world space.
        let t = Transform::new(Vec2::new(500.0, 0.0), 1.0);
        assert_eq!(scene.hit(Point::new(10.0, 10.0), t), Some(Hit::Background));
    }

    #[test]
    fn no_hits_until_ready() {
        let mut scene = scene();
        scene.set_status(SurfaceStatus::Loading);
        assert_eq!(scene.hit(Point::new(50.0, 50.0), Transform::IDENTITY), None);
    }

    #[test]
    fn rebuild_bumps_generation_and_clears_highlight() {
        let mut scene = scene();
        scene.set_active(Some(ActiveRegion {
            id: "sq".into(),
            half: Half::Left,
        }));
        let before = scene.generation();
        assert_eq!(scene.layers().count(), 2);
        let after = scene.rebuild(Viewport::new(100.0, 100.0), None);
        assert!(after > before);
        assert_eq!(scene.active(), None);
        assert_eq!(scene.layers().count(), 0);
    }
}
