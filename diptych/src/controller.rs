// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::time::Duration;

use diptych_geo::{
    FeatureStore, GeoProjection, LoadError, LoadOutcome, LoadState, LoadTicket, MapData,
    ProjectedMap, ProjectionAdapter, RegionId, TopologySource, fetch_map,
};
use diptych_state::{FrameSource, Step, ViewEvent, ViewState};
use diptych_surface::{Hit, Presenter, RenderSurface, Scene, SurfaceStatus};
use diptych_view::{Transform, Viewport};
use kurbo::{Point, Rect};
use tracing::{debug, info, warn};

use crate::animator::Animator;
use crate::config::MapConfig;
use crate::events::{Attached, EventSource, HostEvent, SourceId};

/// Frames against the geometry of the current layout.
struct Layout<'a> {
    viewport: Viewport,
    map: Option<&'a ProjectedMap>,
}

impl FrameSource<RegionId> for Layout<'_> {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn collection_bounds(&self) -> Option<Rect> {
        self.map?.collection_bounds()
    }

    fn region_bounds(&self, id: &RegionId) -> Option<Rect> {
        self.map?.region_bounds(id)
    }
}

/// The interaction controller of a split, two-copy map.
///
/// It owns the load lifecycle, the view state, the camera animation, and the
/// surface it presents to. Hosts feed it [`HostEvent`]s, either directly via
/// [`handle`](Self::handle) or through attached [`EventSource`]s drained by
/// [`pump`](Self::pump), and call [`tick`](Self::tick) from their render loop
/// with a monotonic timestamp.
///
/// Loading is split so the network boundary stays with the host:
/// [`mount`](Self::mount) or [`retry`](Self::retry) hands out a
/// [`LoadTicket`], and [`complete_load`](Self::complete_load) accepts the
/// result for the latest ticket only. [`load_from`](Self::load_from) does all
/// three against a [`TopologySource`].
#[derive(Debug)]
pub struct MapController<S, P> {
    config: MapConfig,
    presenter: Presenter<S>,
    adapter: ProjectionAdapter<P>,
    store: FeatureStore,
    state: ViewState<RegionId>,
    scene: Scene,
    viewport: Viewport,
    projected: Option<Arc<ProjectedMap>>,
    animator: Animator,
    sources: Attached,
}

impl<S: RenderSurface, P: GeoProjection> MapController<S, P> {
    /// Creates an idle controller. Nothing is shown until [`mount`](Self::mount).
    pub fn new(config: MapConfig, surface: S, projection: P) -> Self {
        let animator = Animator::new(config.transition);
        let state = ViewState::with_framing(config.framing);
        Self {
            config,
            presenter: Presenter::new(surface),
            adapter: ProjectionAdapter::new(projection),
            store: FeatureStore::new(),
            state,
            scene: Scene::new(),
            viewport: Viewport::default(),
            projected: None,
            animator,
            sources: Attached::new(),
        }
    }

    /// Subscribes to `source`; its events are handled by [`pump`](Self::pump).
    pub fn attach(&mut self, source: impl EventSource + 'static) -> SourceId {
        let id = self.sources.attach(Box::new(source));
        debug!(?id, "event source attached");
        id
    }

    /// Unsubscribes from a source. Returns `false` if it was not attached.
    pub fn detach(&mut self, id: SourceId) -> bool {
        let detached = self.sources.detach(id);
        if detached {
            debug!(?id, "event source detached");
        }
        detached
    }

    /// Starts the first load: the surface shows its loading presentation.
    ///
    /// The caller fetches the topology and passes the result to
    /// [`complete_load`](Self::complete_load) with the returned ticket.
    pub fn mount(&mut self) -> LoadTicket {
        self.begin_load()
    }

    /// Starts another load after a failure. Returns `None` in any other state.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        if !matches!(self.store.state(), LoadState::Failed(_)) {
            debug!(state = %self.store.state(), "retry ignored");
            return None;
        }
        Some(self.begin_load())
    }

    fn begin_load(&mut self) -> LoadTicket {
        let ticket = self.store.begin_load();
        info!(
            generation = ticket.generation(),
            url = %self.config.source_url,
            "loading map data"
        );
        self.scene.set_status(SurfaceStatus::Loading);
        self.present();
        ticket
    }

    /// Accepts the result of the load identified by `ticket`.
    ///
    /// Results for superseded tickets are dropped. On success the projection
    /// is fit to the current layout, the active region is cleared, and the
    /// camera jumps to the home framing of the current view.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<MapData, LoadError>,
    ) -> LoadOutcome {
        let outcome = self.store.finish_load(ticket, result);
        match outcome {
            LoadOutcome::Stale => {
                warn!(
                    generation = ticket.generation(),
                    "dropping stale load result"
                );
            }
            LoadOutcome::Failed => {
                let reason = self.store.state().failure().unwrap_or_default().to_owned();
                warn!(generation = ticket.generation(), %reason, "map data failed to load");
                self.scene.set_status(SurfaceStatus::Failed { reason });
                self.present();
            }
            LoadOutcome::Loaded => {
                let regions = self.store.data().map_or(0, |d| d.features.len());
                info!(generation = ticket.generation(), regions, "map data loaded");
                self.scene.set_status(SurfaceStatus::Ready);
                self.relayout();
            }
        }
        outcome
    }

    /// Runs a whole load against `source`: starts it (or retries after a
    /// failure), fetches, decodes, and completes it.
    pub async fn load_from<T: TopologySource>(&mut self, source: &T) -> LoadOutcome {
        let ticket = match self.retry() {
            Some(ticket) => ticket,
            None => self.mount(),
        };
        let result = fetch_map(source, &self.config.source_url, &self.config.object_name).await;
        self.complete_load(ticket, result)
    }

    /// Handles one host event at timestamp `now`.
    ///
    /// Returns a ticket when the event started a load the host must fulfil.
    pub fn handle(&mut self, event: HostEvent, now: Duration) -> Option<LoadTicket> {
        match event {
            HostEvent::Resize(size) => {
                self.resize(Viewport::from(size));
                None
            }
            HostEvent::Retry => self.retry(),
            HostEvent::SetView(view) => {
                if !self.store.state().is_loaded() {
                    debug!(%view, "view recorded before load");
                    self.state.set_view(view);
                    return None;
                }
                self.transition(ViewEvent::SetView(view), now);
                None
            }
            HostEvent::ClickRegion { id, half } => {
                if self.is_interactive() {
                    self.transition(ViewEvent::ClickRegion { id, half }, now);
                } else {
                    debug!(%id, "region click ignored while not ready");
                }
                None
            }
            HostEvent::Click(point) => {
                self.click(point, now);
                None
            }
        }
    }

    /// Drains every attached source, oldest event first per source, handles
    /// the events, then advances the animation.
    ///
    /// Returns the ticket of a load started by a drained event, if any.
    pub fn pump(&mut self, now: Duration) -> Option<LoadTicket> {
        let mut ticket = None;
        for event in self.sources.drain() {
            if let Some(started) = self.handle(event, now) {
                ticket = Some(started);
            }
        }
        self.tick(now);
        ticket
    }

    /// Advances the camera animation and applies the frame to the surface.
    ///
    /// Returns `true` while an animation is still running.
    pub fn tick(&mut self, now: Duration) -> bool {
        if let Some(frame) = self.animator.tick(now) {
            self.presenter.apply_transform(frame.transform, !frame.finished);
        }
        self.animator.is_animating()
    }

    fn is_interactive(&self) -> bool {
        self.store.state().is_loaded()
            && self.projected.is_some()
            && !self.viewport.is_empty()
    }

    fn click(&mut self, point: Point, now: Duration) {
        if !self.is_interactive() {
            debug!(?point, "click ignored while not ready");
            return;
        }
        match self.scene.hit(point, self.animator.current()) {
            Some(Hit::Region(active)) => self.transition(
                ViewEvent::ClickRegion {
                    id: active.id,
                    half: active.half,
                },
                now,
            ),
            Some(Hit::Background) => self.transition(ViewEvent::ClickBackground, now),
            None => {}
        }
    }

    fn transition(&mut self, event: ViewEvent<RegionId>, now: Duration) {
        let layout = Layout {
            viewport: self.viewport,
            map: self.projected.as_deref(),
        };
        let Step { target, transform } = self.state.handle(event, &layout);
        let Some(target) = target else {
            debug!("view event ignored");
            return;
        };
        debug!(
            ?target,
            view = %self.state.view(),
            revision = self.state.revision(),
            "view state changed"
        );
        self.scene.set_active(self.state.active().cloned());
        self.present();
        if let Some(transform) = transform {
            self.animator.animate_to(transform, self.viewport, now);
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if viewport.is_empty() {
            debug!(
                width = viewport.width,
                height = viewport.height,
                "empty container, layout kept"
            );
            return;
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            "container resized"
        );
        self.relayout();
    }

    /// Refits the projection to the current viewport and rebuilds the scene.
    ///
    /// Once data is loaded this also drops the active region and jumps the
    /// camera to the current view's home framing.
    fn relayout(&mut self) {
        let loaded = self.store.state().is_loaded();
        self.projected = match self.store.data() {
            Some(data) if loaded && !self.viewport.is_empty() => Some(Arc::new(
                self.adapter.fit(self.viewport.half_size(), data),
            )),
            _ => None,
        };
        self.scene.rebuild(self.viewport, self.projected.clone());
        if !loaded {
            self.present();
            return;
        }

        let layout = Layout {
            viewport: self.viewport,
            map: self.projected.as_deref(),
        };
        let step = self.state.handle(ViewEvent::Reloaded, &layout);
        self.present();

        let home = step.transform.unwrap_or(Transform::IDENTITY);
        debug!(?home, view = %self.state.view(), "layout rebuilt");
        self.animator.jump_to(home);
        self.presenter.apply_transform(home, false);
    }

    fn present(&mut self) {
        self.presenter.present(&self.scene);
    }

    /// The configuration the controller was created with.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Load state of the feature store.
    pub fn load_state(&self) -> &LoadState {
        self.store.state()
    }

    /// The view state machine.
    pub fn view_state(&self) -> &ViewState<RegionId> {
        &self.state
    }

    /// The camera as last applied to the surface.
    pub fn transform(&self) -> Transform {
        self.animator.current()
    }

    /// Where the camera is heading.
    pub fn target_transform(&self) -> Transform {
        self.animator.target()
    }

    /// Returns `true` while a camera animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// The current container size.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Projected geometry of the current layout.
    pub fn projected(&self) -> Option<&Arc<ProjectedMap>> {
        self.projected.as_ref()
    }

    /// The scene last presented.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The render surface.
    pub fn surface(&self) -> &S {
        self.presenter.surface()
    }

    /// The render surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        self.presenter.surface_mut()
    }

    /// Number of attached event sources.
    pub fn attached_sources(&self) -> usize {
        self.sources.len()
    }
}
