// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A surface that keeps the latest drawn state and exports it as SVG.

use alloc::sync::Arc;
use core::fmt::Write as _;

use diptych_geo::{ProjectedMap, RegionId};
use diptych_state::ActiveRegion;
use diptych_view::{Half, Transform};
use kurbo::{BezPath, PathEl, Vec2};
use peniko::Color;

use crate::scene::{HalfLayer, SurfaceStatus};
use crate::surface::RenderSurface;

/// Colors and widths used by [`SvgSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SvgStyle {
    /// Region fill.
    pub fill: Color,
    /// Fill of the active region.
    pub active_fill: Color,
    /// Region outline and border mesh color.
    pub stroke: Color,
    /// On-screen outline width; divided by the camera scale when drawn.
    pub stroke_width: f64,
    /// Status text color.
    pub text: Color,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            fill: Color::from_rgba8(0xaa, 0xaa, 0xaa, 0xff),
            active_fill: Color::from_rgba8(0xff, 0xa5, 0x00, 0xff),
            stroke: Color::from_rgba8(0xff, 0xff, 0xff, 0xff),
            stroke_width: 0.5,
            text: Color::from_rgba8(0x33, 0x33, 0x33, 0xff),
        }
    }
}

#[derive(Clone, Debug)]
struct SvgLayer {
    offset: Vec2,
    map: Arc<ProjectedMap>,
    borders: bool,
}

/// Retains the latest status, layers, highlight, and camera, and writes them
/// out as an SVG document.
///
/// Halves are emitted as `<g class="regions map1">` and
/// `<g class="regions map2">`; the active region is drawn last in its half
/// with an extra `active` class.
#[derive(Clone, Debug, Default)]
pub struct SvgSurface {
    style: SvgStyle,
    status: SurfaceStatus,
    layers: [Option<SvgLayer>; 2],
    active: Option<ActiveRegion<RegionId>>,
    transform: Transform,
    frames: usize,
}

impl SvgSurface {
    /// Creates a surface with the default style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a surface with a custom style.
    #[must_use]
    pub fn with_style(style: SvgStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// The current camera.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Number of camera applications received.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Exports the current state as an SVG document of `width` x `height`.
    #[must_use]
    pub fn to_svg(&self, width: u32, height: u32) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" \
             viewBox=\"0 0 {width} {height}\">"
        );

        if self.status == SurfaceStatus::Ready {
            let stroke_width = if self.transform.scale > 0.0 {
                self.style.stroke_width / self.transform.scale
            } else {
                self.style.stroke_width
            };
            let camera = transform_attr(self.transform);
            let _ = write!(svg, "<g class=\"camera\"{camera}>");
            for half in Half::ALL {
                if let Some(layer) = &self.layers[half.index()] {
                    self.write_layer(&mut svg, half, layer, stroke_width);
                }
            }
            svg.push_str("</g>");
        }

        self.write_status(&mut svg, f64::from(width), f64::from(height));
        svg.push_str("</svg>");
        svg
    }

    fn write_layer(&self, out: &mut String, half: Half, layer: &SvgLayer, stroke_width: f64) {
        let class = match half {
            Half::Left => "map1",
            Half::Right => "map2",
        };
        let _ = write!(out, "<g class=\"regions {class}\"");
        if layer.offset != Vec2::ZERO {
            let _ = write!(
                out,
                " transform=\"translate({} {})\"",
                fmt_f64(layer.offset.x),
                fmt_f64(layer.offset.y)
            );
        }
        out.push('>');

        let (stroke, stroke_opacity) = color_to_svg(self.style.stroke);
        let width = fmt_f64(stroke_width);
        let active = self
            .active
            .as_ref()
            .filter(|a| a.half == half)
            .map(|a| &a.id);
        let regions = layer.map.regions();
        let ordered = regions
            .iter()
            .filter(|r| Some(&r.id) != active)
            .chain(regions.iter().filter(|r| Some(&r.id) == active));
        for region in ordered {
            let is_active = Some(&region.id) == active;
            let (fill, fill_opacity) = color_to_svg(if is_active {
                self.style.active_fill
            } else {
                self.style.fill
            });
            let _ = write!(
                out,
                "<path class=\"region{}\" data-id=\"{}\" d=\"{}\" fill=\"{fill}\"",
                if is_active { " active" } else { "" },
                escape_xml(region.id.as_str()),
                bez_path_to_svg_d(&region.path),
            );
            write_opacity(out, "fill-opacity", fill_opacity);
            let _ = write!(out, " stroke=\"{stroke}\" stroke-width=\"{width}\"");
            write_opacity(out, "stroke-opacity", stroke_opacity);
            out.push_str("/>");
        }

        if layer.borders && !layer.map.borders().elements().is_empty() {
            let _ = write!(
                out,
                "<path class=\"region-borders\" d=\"{}\" fill=\"none\" stroke=\"{stroke}\" \
                 stroke-width=\"{width}\" stroke-linejoin=\"round\"",
                bez_path_to_svg_d(layer.map.borders()),
            );
            write_opacity(out, "stroke-opacity", stroke_opacity);
            out.push_str("/>");
        }
        out.push_str("</g>");
    }

    fn write_status(&self, out: &mut String, width: f64, height: f64) {
        let (text, _) = color_to_svg(self.style.text);
        let (cx, cy) = (fmt_f64(width / 2.0), fmt_f64(height / 2.0));
        match &self.status {
            SurfaceStatus::Idle | SurfaceStatus::Ready => {}
            SurfaceStatus::Loading => {
                let _ = write!(
                    out,
                    "<text class=\"status loading\" x=\"{cx}\" y=\"{cy}\" \
                     text-anchor=\"middle\" fill=\"{text}\">Loading map\u{2026}</text>"
                );
            }
            SurfaceStatus::Failed { reason } => {
                let _ = write!(
                    out,
                    "<text class=\"status error\" x=\"{cx}\" y=\"{cy}\" \
                     text-anchor=\"middle\" fill=\"{text}\">{}</text>",
                    escape_xml(reason)
                );
                let _ = write!(
                    out,
                    "<text class=\"retry\" x=\"{cx}\" y=\"{}\" \
                     text-anchor=\"middle\" fill=\"{text}\">Retry</text>",
                    fmt_f64(height / 2.0 + 24.0)
                );
            }
        }
    }
}

impl RenderSurface for SvgSurface {
    fn set_status(&mut self, status: &SurfaceStatus) {
        self.status = status.clone();
    }

    fn draw_regions(&mut self, layer: &HalfLayer) {
        self.layers[layer.half.index()] = Some(SvgLayer {
            offset: layer.offset,
            map: Arc::clone(&layer.map),
            borders: false,
        });
    }

    fn draw_borders(&mut self, layer: &HalfLayer) {
        match &mut self.layers[layer.half.index()] {
            Some(existing) if Arc::ptr_eq(&existing.map, &layer.map) => existing.borders = true,
            slot => {
                *slot = Some(SvgLayer {
                    offset: layer.offset,
                    map: Arc::clone(&layer.map),
                    borders: true,
                });
            }
        }
    }

    fn set_active(&mut self, active: Option<&ActiveRegion<RegionId>>) {
        self.active = active.cloned();
    }

    fn apply_transform(&mut self, transform: Transform, _animate: bool) {
        self.transform = transform;
        self.frames += 1;
    }
}

fn transform_attr(transform: Transform) -> String {
    if transform == Transform::IDENTITY {
        return String::new();
    }
    let c = transform.to_affine().as_coeffs();
    format!(
        " transform=\"matrix({} {} {} {} {} {})\"",
        fmt_f64(c[0]),
        fmt_f64(c[1]),
        fmt_f64(c[2]),
        fmt_f64(c[3]),
        fmt_f64(c[4]),
        fmt_f64(c[5]),
    )
}

fn write_opacity(out: &mut String, attr: &str, opacity: f32) {
    if opacity < 1.0 {
        let _ = write!(out, " {attr}=\"{}\"", fmt_f32(opacity));
    }
}

fn color_to_svg(color: Color) -> (String, f32) {
    let rgba = color.to_rgba8();
    let a = f32::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

fn bez_path_to_svg_d(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => {
                let _ = write!(d, "M{} {}", fmt_f64(p.x), fmt_f64(p.y));
            }
            PathEl::LineTo(p) => {
                let _ = write!(d, "L{} {}", fmt_f64(p.x), fmt_f64(p.y));
            }
            PathEl::QuadTo(p1, p2) => {
                let _ = write!(
                    d,
                    "Q{} {} {} {}",
                    fmt_f64(p1.x),
                    fmt_f64(p1.y),
                    fmt_f64(p2.x),
                    fmt_f64(p2.y)
                );
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let _ = write!(
                    d,
                    "C{} {} {} {} {} {}",
                    fmt_f64(p1.x),
                    fmt_f64(p1.y),
                    fmt_f64(p2.x),
                    fmt_f64(p2.y),
                    fmt_f64(p3.x),
                    fmt_f64(p3.y)
                );
            }
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "SVG coordinates are written with f32 precision"
)]
fn fmt_f64(v: f64) -> String {
    fmt_f32(v as f32)
}

fn fmt_f32(v: f32) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    if v.fract().abs() < 1e-6 && v.abs() < 1e9 {
        let r = v.round();
        return if r == 0.0 { "0".into() } else { format!("{r}") };
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}
