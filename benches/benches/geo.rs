// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use diptych_geo::{Identity, MeshFilter, ProjectionAdapter, Topology, decode_map};
use diptych_surface::{Scene, SurfaceStatus};
use diptych_view::{Transform, Viewport};
use kurbo::{Point, Size};
use serde_json::json;

/// A `side` x `side` grid of unit cells. Vertical edges are shared arcs, so
/// the interior mesh is non-trivial.
fn grid_topology(side: usize) -> String {
    let mut arcs = Vec::new();
    // Vertical edge arcs: column `x` (0..=side), row `y`.
    for x in 0..=side {
        for y in 0..side {
            arcs.push(json!([[x, y], [x, y + 1]]));
        }
    }
    let vertical = |x: usize, y: usize| (x * side + y) as i64;
    let mut geometries = Vec::new();
    for y in 0..side {
        for x in 0..side {
            // Bottom and top edges are private to the cell.
            let top = arcs.len() as i64;
            arcs.push(json!([[x, y + 1], [x + 1, y + 1]]));
            let bottom = arcs.len() as i64;
            arcs.push(json!([[x + 1, y], [x, y]]));
            let ring = [vertical(x, y), top, !vertical(x + 1, y), bottom];
            geometries.push(json!({
                "type": "Polygon",
                "id": format!("{x}-{y}"),
                "arcs": [ring],
            }));
        }
    }
    json!({
        "type": "Topology",
        "arcs": arcs,
        "objects": {"cells": {"type": "GeometryCollection", "geometries": geometries}},
    })
    .to_string()
}

fn bench_decode_and_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo/decode_fit");
    for side in [8usize, 32, 64] {
        let text = grid_topology(side);
        group.throughput(Throughput::Elements((side * side) as u64));

        group.bench_with_input(BenchmarkId::new("decode", side), &text, |b, text| {
            b.iter(|| black_box(decode_map(text.as_bytes(), "cells")));
        });

        let topology = Topology::from_json(&text).unwrap();
        group.bench_with_input(
            BenchmarkId::new("mesh_interior", side),
            &topology,
            |b, topology| {
                b.iter(|| black_box(topology.mesh("cells", MeshFilter::Interior)));
            },
        );

        let data = topology.map_data("cells").unwrap();
        let adapter = ProjectionAdapter::new(Identity);
        group.bench_with_input(BenchmarkId::new("fit", side), &data, |b, data| {
            b.iter(|| black_box(adapter.fit(Size::new(480.0, 500.0), data)));
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("geo/hit");
    let viewport = Viewport::new(960.0, 500.0);
    for side in [8usize, 32, 64] {
        let data = decode_map(grid_topology(side).as_bytes(), "cells").unwrap();
        let map = ProjectionAdapter::new(Identity).fit(viewport.half_size(), &data);
        let mut scene = Scene::new();
        scene.rebuild(viewport, Some(Arc::new(map)));
        scene.set_status(SurfaceStatus::Ready);

        let points: Vec<Point> = (0..256)
            .map(|i| {
                let (x, y) = (i * 37 % 960, i * 53 % 500);
                Point::new(f64::from(x), f64::from(y))
            })
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::new("scene_hit", side), &points, |b, points| {
            b.iter(|| {
                for &pt in points {
                    black_box(scene.hit(pt, Transform::IDENTITY));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode_and_fit, bench_hit_test);
criterion_main!(benches);
