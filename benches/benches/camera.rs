// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use diptych_view::{
    FramingConfig, Half, Interpolation, LogicalView, Transform, Transition, TransitionConfig,
    Viewport,
};
use kurbo::{Rect, Vec2};

fn bench_framing(c: &mut Criterion) {
    let mut group = c.benchmark_group("camera/framing");
    let config = FramingConfig::default();
    let viewport = Viewport::new(960.0, 500.0);
    let collection = Rect::new(0.0, 25.0, 480.0, 475.0);
    let regions: Vec<Rect> = (0..64)
        .map(|i| {
            let x = f64::from(i % 8) * 60.0;
            let y = f64::from(i / 8) * 56.0 + 25.0;
            Rect::new(x, y, x + 20.0 + f64::from(i % 5) * 8.0, y + 30.0)
        })
        .collect();

    group.bench_function("frame_region", |b| {
        b.iter(|| {
            for (i, bounds) in regions.iter().enumerate() {
                let half = Half::ALL[i % 2];
                black_box(config.frame_region(*bounds, viewport, half));
            }
        });
    });
    group.bench_function("frame_home", |b| {
        b.iter(|| {
            for view in [LogicalView::Both, LogicalView::Left, LogicalView::Right] {
                black_box(config.frame_home(collection, viewport, view));
            }
        });
    });
    group.finish();
}

fn bench_transition_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("camera/transition");
    let viewport = Viewport::new(960.0, 500.0);
    let target = Transform::new(Vec2::new(-1180.0, -640.0), 6.5);
    for interpolation in [Interpolation::Linear, Interpolation::Smooth] {
        let config = TransitionConfig {
            interpolation,
            ..TransitionConfig::default()
        };
        let transition = Transition::new(
            Transform::IDENTITY,
            target,
            viewport,
            Duration::ZERO,
            &config,
        );
        // One second of frames at 60 Hz.
        let frames: Vec<Duration> = (0..60).map(|i| Duration::from_micros(i * 16_667)).collect();
        group.bench_with_input(
            BenchmarkId::new("sample_60", format!("{interpolation:?}")),
            &frames,
            |b, frames| {
                b.iter(|| {
                    for &now in frames {
                        black_box(transition.sample(now));
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_framing, bench_transition_sampling);
criterion_main!(benches);
