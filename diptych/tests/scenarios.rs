// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of the controller against a recording surface.

use core::time::Duration;

use diptych::geo::{Identity, LoadOutcome, LoadState, MapData, RegionId, StaticSource, Topology};
use diptych::state::ActiveRegion;
use diptych::surface::{RecordingSurface, SurfaceOp, SurfaceStatus};
use diptych::view::{FramingConfig, Half, LogicalView, Transform, Viewport};
use diptych::{EventQueue, HostEvent, MapConfig, MapController};
use kurbo::{Point, Rect, Size, Vec2};

const TWO_REGIONS: &str = include_str!("../../diptych_geo/tests/data/two_regions.json");

type Controller = MapController<RecordingSurface, Identity>;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn map_data() -> MapData {
    Topology::from_json(TWO_REGIONS)
        .unwrap()
        .map_data("states")
        .unwrap()
}

fn controller(width: f64, height: f64) -> Controller {
    let mut map = MapController::new(MapConfig::default(), RecordingSurface::new(), Identity);
    map.handle(HostEvent::Resize(Size::new(width, height)), ms(0));
    map
}

fn loaded(width: f64, height: f64) -> Controller {
    let mut map = controller(width, height);
    let source = StaticSource::new(TWO_REGIONS.as_bytes());
    assert_eq!(
        pollster::block_on(map.load_from(&source)),
        LoadOutcome::Loaded
    );
    map
}

fn click_region(id: &str, half: Half) -> HostEvent {
    HostEvent::ClickRegion {
        id: RegionId::new(id),
        half,
    }
}

fn assert_transform(actual: Transform, scale: f64, x: f64, y: f64) {
    let expected = Transform::new(Vec2::new(x, y), scale);
    assert!(
        actual.approx_eq(&expected, 1e-9),
        "{actual:?} != {expected:?}"
    );
}

#[test]
fn load_then_zoom_onto_a_region() {
    let mut map = controller(800.0, 600.0);
    assert_eq!(map.load_state(), &LoadState::Idle);

    let ticket = map.mount();
    assert_eq!(map.load_state(), &LoadState::Loading);
    assert_eq!(map.surface().last_status(), Some(&SurfaceStatus::Loading));

    assert_eq!(
        map.complete_load(ticket, Ok(map_data())),
        LoadOutcome::Loaded
    );
    assert_eq!(map.load_state(), &LoadState::Loaded);
    assert_eq!(map.surface().last_status(), Some(&SurfaceStatus::Ready));
    assert_eq!(map.surface().region_draws(), 2);
    assert_eq!(map.transform(), Transform::IDENTITY);

    map.handle(click_region("A", Half::Left), ms(0));
    assert!(map.is_animating());
    assert_transform(map.target_transform(), 3.6, 220.0, 120.0);

    assert!(map.tick(ms(375)));
    assert!(!map.tick(ms(750)));
    assert_transform(map.transform(), 3.6, 220.0, 120.0);
    assert_eq!(
        map.surface().ops().last(),
        Some(&SurfaceOp::Transform {
            transform: map.transform(),
            animate: false,
        })
    );
    assert_eq!(
        map.view_state().active(),
        Some(&ActiveRegion {
            id: RegionId::new("A"),
            half: Half::Left,
        })
    );
}

#[test]
fn pointer_clicks_are_hit_tested_through_the_camera() {
    let mut map = loaded(800.0, 600.0);

    // Region "B" in the right copy.
    map.handle(HostEvent::Click(Point::new(650.0, 300.0)), ms(0));
    assert_eq!(
        map.view_state().active(),
        Some(&ActiveRegion {
            id: RegionId::new("B"),
            half: Half::Right,
        })
    );
    map.tick(ms(750));

    // Clicking the zoomed region again, at its framed center, goes home.
    map.handle(HostEvent::Click(Point::new(400.0, 300.0)), ms(1000));
    assert_eq!(map.view_state().active(), None);
    map.tick(ms(2000));
    assert_eq!(map.transform(), Transform::IDENTITY);
}

#[test]
fn background_click_resets_a_focused_region() {
    let mut map = loaded(800.0, 600.0);
    // Nothing is focused: the background click is ignored.
    map.handle(HostEvent::Click(Point::new(50.0, 300.0)), ms(0));
    assert!(!map.is_animating());

    map.handle(click_region("A", Half::Left), ms(0));
    map.tick(ms(750));
    // Far corner of the zoomed camera, outside both regions.
    map.handle(HostEvent::Click(Point::new(230.0, 590.0)), ms(800));
    assert_eq!(map.view_state().active(), None);
    assert_eq!(map.target_transform(), Transform::IDENTITY);
}

#[test]
fn failed_load_surfaces_reason_and_retries() {
    let mut map = controller(800.0, 600.0);
    let outcome = pollster::block_on(map.load_from(&StaticSource::failing("network error")));
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(
        map.load_state(),
        &LoadState::Failed("network error".to_owned())
    );
    assert_eq!(
        map.surface().last_status(),
        Some(&SurfaceStatus::Failed {
            reason: "network error".to_owned()
        })
    );
    // Interaction is disabled until the data arrives.
    map.handle(click_region("A", Half::Left), ms(0));
    assert!(!map.is_animating());

    let ticket = map.handle(HostEvent::Retry, ms(0)).unwrap();
    assert_eq!(map.load_state(), &LoadState::Loading);
    assert_eq!(map.surface().last_status(), Some(&SurfaceStatus::Loading));

    assert_eq!(
        map.complete_load(ticket, Ok(map_data())),
        LoadOutcome::Loaded
    );
    assert_eq!(map.load_state(), &LoadState::Loaded);
    assert_eq!(map.view_state().active(), None);
    assert_eq!(map.retry(), None);
}

#[test]
fn view_change_while_focused_frames_the_half() {
    let mut map = loaded(800.0, 600.0);
    map.handle(click_region("A", Half::Left), ms(0));
    map.tick(ms(750));

    map.handle(HostEvent::SetView(LogicalView::Left), ms(1000));
    assert_eq!(map.view_state().active(), None);
    assert_eq!(map.view_state().view(), LogicalView::Left);
    assert_eq!(map.scene().active(), None);

    let expected = FramingConfig::default().frame_home(
        Rect::new(0.0, 0.0, 400.0, 600.0),
        Viewport::new(800.0, 600.0),
        LogicalView::Left,
    );
    assert_eq!(map.target_transform(), expected);
    map.tick(ms(1750));
    assert_eq!(map.transform(), expected);
}

#[test]
fn resize_refits_and_jumps_home() {
    let mut map = loaded(800.0, 600.0);
    map.handle(HostEvent::SetView(LogicalView::Right), ms(0));
    map.handle(click_region("A", Half::Right), ms(100));
    assert!(map.is_animating());
    map.surface_mut().take();

    map.handle(HostEvent::Resize(Size::new(400.0, 600.0)), ms(200));
    assert!(!map.is_animating());
    assert_eq!(map.view_state().active(), None);
    assert_eq!(map.view_state().view(), LogicalView::Right);
    assert_transform(map.transform(), 1.8, -340.0, -240.0);
    assert_eq!(
        map.projected().map(|p| p.size()),
        Some(Size::new(200.0, 600.0))
    );

    let ops = map.surface_mut().take();
    assert!(ops.contains(&SurfaceOp::Regions {
        half: Half::Left,
        generation: map.scene().generation(),
        count: 2,
    }));
    assert_eq!(
        ops.last(),
        Some(&SurfaceOp::Transform {
            transform: map.transform(),
            animate: false,
        })
    );
}

#[test]
fn empty_container_is_kept_until_it_grows() {
    let mut map = loaded(800.0, 600.0);
    map.surface_mut().take();
    let generation = map.scene().generation();

    map.handle(HostEvent::Resize(Size::ZERO), ms(0));
    assert!(map.surface().ops().is_empty());
    assert_eq!(map.scene().generation(), generation);
    map.handle(click_region("A", Half::Left), ms(0));
    assert!(!map.is_animating());

    map.handle(HostEvent::Resize(Size::new(800.0, 600.0)), ms(0));
    assert!(map.scene().generation() > generation);
    assert_eq!(map.surface().region_draws(), 2);
}

#[test]
fn superseded_loads_are_dropped() {
    let mut map = controller(800.0, 600.0);
    let first = map.mount();
    let second = map.mount();

    assert_eq!(map.complete_load(first, Ok(map_data())), LoadOutcome::Stale);
    assert_eq!(map.load_state(), &LoadState::Loading);
    assert!(map.projected().is_none());

    assert_eq!(
        map.complete_load(second, Ok(map_data())),
        LoadOutcome::Loaded
    );
    assert_eq!(map.projected().map(|p| p.regions().len()), Some(2));
}

#[test]
fn view_selected_before_load_frames_the_first_layout() {
    let mut map = controller(800.0, 600.0);
    map.handle(HostEvent::SetView(LogicalView::Left), ms(0));
    assert_eq!(map.view_state().view(), LogicalView::Left);
    assert!(!map.is_animating());

    let source = StaticSource::new(TWO_REGIONS.as_bytes());
    pollster::block_on(map.load_from(&source));
    let expected = FramingConfig::default().frame_home(
        Rect::new(0.0, 0.0, 400.0, 600.0),
        Viewport::new(800.0, 600.0),
        LogicalView::Left,
    );
    assert_eq!(map.transform(), expected);
    assert_eq!(map.surface().last_transform(), Some(expected));
}

#[test]
fn attached_queue_feeds_the_controller() {
    let host = EventQueue::new();
    let mut map = MapController::new(MapConfig::default(), RecordingSurface::new(), Identity);
    let id = map.attach(host.clone());
    assert!(host.is_subscribed());
    assert_eq!(map.attached_sources(), 1);

    host.push(HostEvent::Resize(Size::new(800.0, 600.0)));
    host.push(HostEvent::SetView(LogicalView::Right));
    assert_eq!(map.pump(ms(0)), None);
    assert_eq!(map.viewport(), Viewport::new(800.0, 600.0));
    assert_eq!(map.view_state().view(), LogicalView::Right);

    let ticket = map.mount();
    map.complete_load(ticket, Ok(map_data()));
    host.push(click_region("B", Half::Left));
    map.pump(ms(0));
    assert!(map.is_animating());
    map.pump(ms(750));
    assert!(!map.is_animating());

    assert!(map.detach(id));
    assert!(!host.is_subscribed());
    assert!(!host.push(HostEvent::Retry));
}

#[test]
fn clicking_a_region_sharing_a_positional_id_frames_it() {
    let topology = include_str!("../../diptych_geo/tests/data/unnamed_region.json");
    let mut map = controller(800.0, 600.0);
    let source = StaticSource::new(topology.as_bytes());
    assert_eq!(
        pollster::block_on(map.load_from(&source)),
        LoadOutcome::Loaded
    );

    map.handle(HostEvent::Click(Point::new(50.0, 50.0)), ms(0));
    assert_eq!(map.view_state().active().map(|a| a.id.as_str()), Some("1"));
    assert_transform(map.target_transform(), 3.6, 220.0, 120.0);

    // The unnamed region is a different region, not a toggle.
    map.handle(HostEvent::Click(Point::new(250.0, 300.0)), ms(0));
    map.tick(ms(750));
    assert_eq!(
        map.view_state().active().map(|a| a.id.as_str()),
        Some("1#2")
    );
}

#[test]
fn view_state_round_trips_through_json() {
    let mut map = loaded(800.0, 600.0);
    map.handle(HostEvent::SetView(LogicalView::Right), ms(0));
    map.handle(click_region("A", Half::Right), ms(0));

    let json = serde_json::to_string(map.view_state()).unwrap();
    let back: diptych::state::ViewState<RegionId> = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, map.view_state());
}

#[test]
fn dropping_the_controller_unsubscribes() {
    let host = EventQueue::new();
    {
        let mut map = controller(800.0, 600.0);
        map.attach(host.clone());
        assert!(host.is_subscribed());
    }
    assert!(!host.is_subscribed());
}
