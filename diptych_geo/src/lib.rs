// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diptych Geo: the map data behind a split, two-copy map surface.
//!
//! This crate turns a topology document into the pixel-space geometry both
//! halves of the surface draw:
//! - [`Topology`]: TopoJSON decoding into regions ([`FeatureCollection`]) and
//!   the border mesh between adjacent regions ([`BorderMesh`]).
//! - [`GeoProjection`]: the fixed [`AlbersUsa`] composite, its
//!   [`ConicEqualArea`] members, and a planar [`Identity`].
//! - [`ProjectionAdapter`]: fits a projection to one half-viewport and
//!   produces a [`ProjectedMap`] with per-region paths, cached bounds, and
//!   hit-testing.
//! - [`FeatureStore`]: the [`LoadState`] lifecycle, guarded by
//!   [`LoadTicket`] generations so stale loads are dropped.
//!
//! Fetching goes through the [`TopologySource`] trait. [`StaticSource`]
//! serves in-memory bytes; with the `http` feature, `HttpSource` fetches
//! over HTTP(S) using `ureq`.
//!
//! ## Decoding and fitting
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use diptych_geo::{Identity, ProjectionAdapter, Topology};
//!
//! // Two unit squares sharing one edge (arc 1).
//! let json = r#"{
//!     "type": "Topology",
//!     "arcs": [
//!         [[1, 1], [0, 1], [0, 0], [1, 0]],
//!         [[1, 0], [1, 1]],
//!         [[1, 0], [2, 0], [2, 1], [1, 1]]
//!     ],
//!     "objects": {"states": {"type": "GeometryCollection", "geometries": [
//!         {"type": "Polygon", "id": "A", "arcs": [[0, 1]]},
//!         {"type": "Polygon", "id": "B", "arcs": [[2, -2]]}
//!     ]}}
//! }"#;
//! let data = Topology::from_json(json)?.map_data("states")?;
//! assert_eq!(data.features.len(), 2);
//! assert_eq!(data.borders.lines.len(), 1);
//!
//! let map = ProjectionAdapter::new(Identity).fit(Size::new(400.0, 200.0), &data);
//! let hit = map.region_at(Point::new(300.0, 100.0)).map(|r| r.id.as_str());
//! assert_eq!(hit, Some("B"));
//! # Ok::<(), diptych_geo::TopologyError>(())
//! ```

extern crate alloc;

mod adapter;
mod error;
mod feature;
mod projection;
mod store;
mod topology;

pub use adapter::{ProjectedMap, ProjectedRegion, ProjectionAdapter};
pub use error::{LoadError, TopologyError};
pub use feature::{BorderMesh, FeatureCollection, MapData, Polygon, Region, RegionId, Ring};
pub use projection::{AlbersUsa, ConicEqualArea, Fit, GeoProjection, Identity};
#[cfg(feature = "http")]
pub use store::HttpSource;
pub use store::{
    FeatureStore, LoadOutcome, LoadState, LoadTicket, StaticSource, TopologySource, fetch_map,
};
pub use topology::{MeshFilter, Topology, decode_map};
