// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diptych: a split-screen dual map with click-to-zoom framing.
//!
//! Two identical copies of a map sit side by side. The surrounding UI picks
//! which copy (or both) is home, clicking a region zooms the camera onto it,
//! and clicking it again or the background zooms back out. [`MapController`]
//! keeps the camera, the view state, the container size, and the
//! asynchronous load mutually consistent:
//!
//! - Loading goes `Idle → Loading → Loaded | Failed(reason)`; a failure shows
//!   its reason with a retry action, and results of superseded loads are
//!   dropped.
//! - Clicks and view changes animate the camera over a fixed duration; a new
//!   target replaces the one in flight.
//! - Resizes refit the projection, drop the focused region, and jump to the
//!   current view's home framing.
//!
//! The building blocks live in their own crates and are re-exported here:
//! [`diptych_view`] (camera math), [`diptych_geo`] (data and projection),
//! [`diptych_state`] (view state machine), and [`diptych_surface`] (render
//! surfaces).
//!
//! ## Driving a controller
//!
//! ```rust
//! use core::time::Duration;
//! use diptych::{HostEvent, MapConfig, MapController};
//! use diptych::geo::{Identity, LoadState, StaticSource};
//! use diptych::surface::RecordingSurface;
//! use diptych::view::{Half, LogicalView};
//! use kurbo::{Point, Size};
//!
//! let topology = r#"{
//!     "type": "Topology",
//!     "arcs": [[[0, 0], [100, 0], [100, 100], [0, 100], [0, 0]]],
//!     "objects": {"states": {"type": "GeometryCollection", "geometries": [
//!         {"type": "Polygon", "id": "A", "arcs": [[0]]}
//!     ]}}
//! }"#;
//!
//! let mut map = MapController::new(MapConfig::default(), RecordingSurface::new(), Identity);
//! map.handle(HostEvent::Resize(Size::new(800.0, 600.0)), Duration::ZERO);
//! pollster::block_on(map.load_from(&StaticSource::new(topology.as_bytes())));
//! assert_eq!(map.load_state(), &LoadState::Loaded);
//!
//! // Click the left copy of "A", then let the animation finish.
//! map.handle(HostEvent::Click(Point::new(200.0, 300.0)), Duration::ZERO);
//! map.tick(Duration::from_millis(750));
//! assert_eq!(map.view_state().active().map(|a| a.half), Some(Half::Left));
//! assert_eq!(map.view_state().view(), LogicalView::Both);
//! ```

extern crate alloc;

mod animator;
mod config;
mod controller;
mod events;

pub use animator::{AnimationHandle, Animator, Frame};
pub use config::{ConfigError, DEFAULT_OBJECT_NAME, DEFAULT_SOURCE_URL, MapConfig};
pub use controller::MapController;
pub use events::{EventQueue, EventSource, HostEvent, SourceId};

pub use diptych_geo as geo;
pub use diptych_state as state;
pub use diptych_surface as surface;
pub use diptych_view as view;
