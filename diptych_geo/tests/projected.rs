// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests: decode a small topology, fit it, and query it.

use diptych_geo::{
    FeatureStore, Identity, LoadOutcome, LoadState, MeshFilter, ProjectionAdapter, StaticSource,
    Topology,
};
use kurbo::{Point, Rect, Size};

const TWO_REGIONS: &str = include_str!("data/two_regions.json");
const UNNAMED_REGION: &str = include_str!("data/unnamed_region.json");

#[test]
fn decodes_regions_with_names_and_closed_rings() {
    let topology = Topology::from_json(TWO_REGIONS).unwrap();
    assert_eq!(topology.arc_count(), 3);
    assert_eq!(topology.object_names().collect::<Vec<_>>(), ["states"]);

    let features = topology.features("states").unwrap();
    let ids: Vec<_> = features.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["A", "B"]);
    assert_eq!(features.regions()[1].name.as_deref(), Some("Beta"));
    for region in features.iter() {
        for ring in region.rings() {
            assert_eq!(ring.first(), ring.last(), "{:?} ring is open", region.id);
        }
    }
}

#[test]
fn mesh_filters_select_shared_or_outer_arcs() {
    let topology = Topology::from_json(TWO_REGIONS).unwrap();
    let interior = topology.mesh("states", MeshFilter::Interior).unwrap();
    assert_eq!(
        interior.lines,
        vec![vec![Point::new(100.0, 0.0), Point::new(100.0, 100.0)]]
    );
    let exterior = topology.mesh("states", MeshFilter::Exterior).unwrap();
    assert_eq!(exterior.lines.len(), 2);
    let all = topology.mesh("states", MeshFilter::All).unwrap();
    assert_eq!(all.lines.len(), 3);
}

#[test]
fn fitting_to_half_and_quarter_viewports() {
    let data = Topology::from_json(TWO_REGIONS)
        .unwrap()
        .map_data("states")
        .unwrap();
    let adapter = ProjectionAdapter::new(Identity);

    let half = adapter.fit(Size::new(400.0, 600.0), &data);
    assert_eq!(half.fit().scale, 1.0);
    assert_eq!(
        half.region_bounds(&"A".into()),
        Some(Rect::new(0.0, 0.0, 100.0, 100.0))
    );
    assert_eq!(
        half.collection_bounds(),
        Some(Rect::new(0.0, 0.0, 400.0, 600.0))
    );

    // A 200px half halves the scale and centers vertically.
    let narrow = adapter.fit(Size::new(200.0, 600.0), &data);
    assert_eq!(narrow.fit().scale, 0.5);
    assert_eq!(
        narrow.collection_bounds(),
        Some(Rect::new(0.0, 150.0, 200.0, 450.0))
    );
    assert_eq!(
        narrow.region_at(Point::new(25.0, 175.0)).map(|r| r.id.as_str()),
        Some("A")
    );
}

#[test]
fn positional_ids_never_shadow_numeric_ids() {
    let data = Topology::from_json(UNNAMED_REGION)
        .unwrap()
        .map_data("states")
        .unwrap();
    let ids: Vec<_> = data.features.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["1", "1#2"]);

    let map = ProjectionAdapter::new(Identity).fit(Size::new(400.0, 600.0), &data);
    for region in map.regions() {
        assert_eq!(
            map.region_bounds(&region.id),
            region.bounds,
            "{}",
            region.id
        );
    }
    let hit = map.region_at(Point::new(50.0, 50.0)).unwrap();
    assert_eq!(hit.id.as_str(), "1");
    assert_eq!(
        map.region_bounds(&hit.id),
        Some(Rect::new(0.0, 0.0, 100.0, 100.0))
    );
}

#[test]
fn store_loads_fixture_through_a_source() {
    let mut store = FeatureStore::new();
    let source = StaticSource::new(TWO_REGIONS.as_bytes());
    let outcome = pollster::block_on(store.load(&source, "mem://two", "states"));
    assert_eq!(outcome, LoadOutcome::Loaded);
    assert_eq!(store.state(), &LoadState::Loaded);

    let outcome = pollster::block_on(store.load(&source, "mem://two", "counties"));
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(
        store.state().failure(),
        Some("topology has no object named \"counties\"")
    );
}
