// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diptych State: the view state machine of a split, two-copy map.
//!
//! [`ViewState`] is the single source of truth for *what should be visible*:
//! - the [`LogicalView`] chosen by the surrounding UI, and
//! - the [`ActiveRegion`] the user clicked into, if any.
//!
//! Each [`ViewEvent`] moves the machine and yields a [`Step`] naming the
//! [`FrameTarget`] to show and the camera [`Transform`] that frames it. The
//! machine never animates and never touches a surface; geometry comes in
//! through the [`FrameSource`] trait, so the state stays a plain value that
//! tests can drive directly.
//!
//! | Event | Guard | New state | Frames |
//! |---|---|---|---|
//! | `SetView(v)` | none | `(v, None)` | home of `v` |
//! | `ClickRegion(r, h)` | `active != (r, h)` | `(view, Some(r, h))` | `r` in half `h` |
//! | `ClickRegion(r, h)` | `active == (r, h)` | `(view, None)` | home of `view` |
//! | `ClickBackground` | `active != None` | `(view, None)` | home of `view` |
//! | `Reloaded` | none | `(view, None)` | home of `view` |
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use diptych_state::{FrameSource, ViewEvent, ViewState};
//! use diptych_view::{Half, LogicalView, Viewport};
//!
//! struct Frames;
//!
//! impl FrameSource<&'static str> for Frames {
//!     fn viewport(&self) -> Viewport {
//!         Viewport::new(800.0, 600.0)
//!     }
//!     fn collection_bounds(&self) -> Option<Rect> {
//!         Some(Rect::new(0.0, 0.0, 400.0, 600.0))
//!     }
//!     fn region_bounds(&self, id: &&'static str) -> Option<Rect> {
//!         (*id == "A").then(|| Rect::new(0.0, 0.0, 100.0, 100.0))
//!     }
//! }
//!
//! let mut state = ViewState::new();
//! let zoom = state.handle(ViewEvent::ClickRegion { id: "A", half: Half::Left }, &Frames);
//! let zoom = zoom.transform.unwrap();
//! assert!((zoom.scale - 3.6).abs() < 1e-9);
//!
//! // Clicking the same region again returns home.
//! let home = state.handle(ViewEvent::ClickRegion { id: "A", half: Half::Left }, &Frames);
//! assert_eq!(home.transform, Some(diptych_view::identity()));
//! assert_eq!(state.active(), None);
//! assert_eq!(state.view(), LogicalView::Both);
//! ```

use diptych_view::{FramingConfig, Half, LogicalView, Transform, Viewport};
use kurbo::Rect;

/// The region currently framed by a click, and the half it was clicked in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveRegion<K> {
    /// Identity of the region.
    pub id: K,
    /// Half whose copy of the region was clicked.
    pub half: Half,
}

/// Input to [`ViewState::handle`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewEvent<K> {
    /// The surrounding UI selected a logical view.
    SetView(LogicalView),
    /// A region was clicked in one half.
    ClickRegion {
        /// Identity of the clicked region.
        id: K,
        /// Half the click landed in.
        half: Half,
    },
    /// A click landed outside every region.
    ClickBackground,
    /// Data or layout was rebuilt; region bounds from before are stale.
    Reloaded,
}

/// What the camera should show.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameTarget<K> {
    /// The home content of a logical view.
    Home(LogicalView),
    /// A clicked region.
    Region(ActiveRegion<K>),
}

/// Geometry the machine frames against.
pub trait FrameSource<K> {
    /// The current container size.
    fn viewport(&self) -> Viewport;

    /// Bounds of the whole collection, in half-local pixels.
    fn collection_bounds(&self) -> Option<Rect>;

    /// Bounds of one region, in half-local pixels.
    fn region_bounds(&self, id: &K) -> Option<Rect>;
}

/// Result of one [`ViewState::handle`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<K> {
    /// The new frame target, or `None` if the event was ignored.
    pub target: Option<FrameTarget<K>>,
    /// The transform framing `target`.
    pub transform: Option<Transform>,
}

impl<K> Step<K> {
    fn ignored() -> Self {
        Self {
            target: None,
            transform: None,
        }
    }

    /// Returns `true` if the event changed nothing.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.target.is_none()
    }
}

/// The `(LogicalView, ActiveRegion)` state machine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewState<K> {
    view: LogicalView,
    active: Option<ActiveRegion<K>>,
    framing: FramingConfig,
    revision: u64,
}

impl<K> Default for ViewState<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ViewState<K> {
    /// Creates the initial state `(Both, None)` with default framing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_framing(FramingConfig::default())
    }

    /// Creates the initial state with custom framing constants.
    #[must_use]
    pub fn with_framing(framing: FramingConfig) -> Self {
        Self {
            view: LogicalView::Both,
            active: None,
            framing,
            revision: 0,
        }
    }

    /// The current logical view.
    #[must_use]
    pub fn view(&self) -> LogicalView {
        self.view
    }

    /// The focused region, if any.
    #[must_use]
    pub fn active(&self) -> Option<&ActiveRegion<K>> {
        self.active.as_ref()
    }

    /// Framing constants.
    #[must_use]
    pub fn framing(&self) -> &FramingConfig {
        &self.framing
    }

    /// Monotonic counter bumped whenever the view or the active region changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl<K: Clone + PartialEq> ViewState<K> {
    /// The target implied by the current state.
    #[must_use]
    pub fn target(&self) -> FrameTarget<K> {
        match &self.active {
            Some(active) => FrameTarget::Region(active.clone()),
            None => FrameTarget::Home(self.view),
        }
    }

    /// Records a view without framing anything.
    ///
    /// Used before data is available; clears the active region.
    pub fn set_view(&mut self, view: LogicalView) {
        if self.view != view || self.active.is_some() {
            self.view = view;
            self.active = None;
            self.bump_revision();
        }
    }

    /// Applies `event` and returns what to frame next.
    ///
    /// Clicks on regions `frames` has no bounds for, and background clicks
    /// while nothing is focused, are ignored.
    pub fn handle(&mut self, event: ViewEvent<K>, frames: &impl FrameSource<K>) -> Step<K> {
        match event {
            ViewEvent::SetView(view) => {
                self.set_view(view);
                self.go_home(frames)
            }
            ViewEvent::ClickRegion { id, half } => {
                let clicked = ActiveRegion { id, half };
                if self.active.as_ref() == Some(&clicked) {
                    self.active = None;
                    self.bump_revision();
                    return self.go_home(frames);
                }
                let Some(transform) = self.frame(&FrameTarget::Region(clicked.clone()), frames)
                else {
                    return Step::ignored();
                };
                self.active = Some(clicked.clone());
                self.bump_revision();
                Step {
                    target: Some(FrameTarget::Region(clicked)),
                    transform: Some(transform),
                }
            }
            ViewEvent::ClickBackground => {
                if self.active.take().is_none() {
                    return Step::ignored();
                }
                self.bump_revision();
                self.go_home(frames)
            }
            ViewEvent::Reloaded => {
                if self.active.take().is_some() {
                    self.bump_revision();
                }
                self.go_home(frames)
            }
        }
    }

    /// Transform for the current state, without changing it.
    #[must_use]
    pub fn resolve(&self, frames: &impl FrameSource<K>) -> Option<Transform> {
        self.frame(&self.target(), frames)
    }

    /// Transform framing `target` against `frames`.
    ///
    /// Home targets always resolve; with no collection bounds they fall back
    /// to the identity. Region targets need the region's bounds.
    #[must_use]
    pub fn frame(
        &self,
        target: &FrameTarget<K>,
        frames: &impl FrameSource<K>,
    ) -> Option<Transform> {
        let viewport = frames.viewport();
        match target {
            FrameTarget::Home(view) => Some(match frames.collection_bounds() {
                Some(bounds) => self.framing.frame_home(bounds, viewport, *view),
                None => diptych_view::identity(),
            }),
            FrameTarget::Region(active) => {
                let bounds = frames.region_bounds(&active.id)?;
                Some(self.framing.frame_region(bounds, viewport, active.half))
            }
        }
    }

    fn go_home(&self, frames: &impl FrameSource<K>) -> Step<K> {
        let target = FrameTarget::Home(self.view);
        let transform = self.frame(&target, frames);
        Step {
            target: Some(target),
            transform,
        }
    }
}
