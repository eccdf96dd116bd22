// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders the split map to an SVG snapshot.
//!
//! The topology is read from a local file, or fetched over HTTP when
//! `--source` is a URL (or omitted, in which case the configured default
//! URL is used). Clicks are replayed in order and each animation is run to
//! completion before the snapshot is written.
//!
//! Examples:
//!   `cargo run -p diptych_demos -- --out us.svg`
//!   `cargo run -p diptych_demos -- --source states-10m.json --view left`
//!   `cargo run -p diptych_demos -- --click 240,180 --click 240,180 --out toggled.svg`
//!
//! Set `RUST_LOG=diptych=debug` to follow the state transitions.

use core::time::Duration;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use diptych::geo::{
    AlbersUsa, GeoProjection, Identity, LoadError, LoadOutcome, StaticSource, TopologySource,
};
use diptych::surface::SvgSurface;
use diptych::view::LogicalView;
use diptych::{HostEvent, MapConfig, MapController};
use kurbo::{Point, Size};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a split-screen dual map to SVG")]
struct Args {
    /// Topology file path or URL (default: the configured source URL)
    #[arg(long)]
    source: Option<String>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Container width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Container height in pixels
    #[arg(long, default_value_t = 500)]
    height: u32,

    /// Home view: left, right or both
    #[arg(long, default_value = "both")]
    view: LogicalView,

    /// Projection applied to the topology coordinates
    #[arg(long, value_enum, default_value_t = ProjectionKind::AlbersUsa)]
    projection: ProjectionKind,

    /// Pointer click in container pixels, as `x,y`; may repeat
    #[arg(long, value_parser = parse_point)]
    click: Vec<Point>,

    /// Output SVG file
    #[arg(long, default_value = "diptych.svg")]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProjectionKind {
    /// Albers equal-area with Alaska and Hawaii insets, for longitude/latitude data
    AlbersUsa,
    /// Coordinates are already planar
    Identity,
}

fn parse_point(text: &str) -> Result<Point, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {text:?}"))?;
    let x = x.trim().parse::<f64>().map_err(|err| err.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|err| err.to_string())?;
    Ok(Point::new(x, y))
}

/// Where the topology bytes come from.
enum Source {
    File(StaticSource),
    #[cfg(feature = "http")]
    Http(diptych::geo::HttpSource),
}

impl Source {
    fn open(location: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let is_url = location.starts_with("http://") || location.starts_with("https://");
        if !is_url {
            let bytes = fs::read(Path::new(location))?;
            info!(path = location, bytes = bytes.len(), "read topology file");
            return Ok(Self::File(StaticSource::new(bytes)));
        }
        #[cfg(feature = "http")]
        {
            Ok(Self::Http(diptych::geo::HttpSource::new()))
        }
        #[cfg(not(feature = "http"))]
        {
            let reason = format!("{location} is a URL, but the `http` feature is disabled");
            Err(reason.into())
        }
    }
}

impl TopologySource for Source {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            Self::File(source) => source.fetch(url).await,
            #[cfg(feature = "http")]
            Self::Http(source) => source.fetch(url).await,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => MapConfig::from_json_str(&fs::read_to_string(path)?)?,
        None => MapConfig::default(),
    };
    if let Some(source) = &args.source {
        config.source_url.clone_from(source);
    }

    match args.projection {
        ProjectionKind::AlbersUsa => render(&args, config, AlbersUsa::new()),
        ProjectionKind::Identity => render(&args, config, Identity),
    }
}

fn render<P: GeoProjection>(
    args: &Args,
    config: MapConfig,
    projection: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = Source::open(&config.source_url)?;
    let settle = config.transition.duration();
    let mut map = MapController::new(config, SvgSurface::new(), projection);

    let mut now = Duration::ZERO;
    let size = Size::new(f64::from(args.width), f64::from(args.height));
    map.handle(HostEvent::Resize(size), now);
    map.handle(HostEvent::SetView(args.view), now);

    match pollster::block_on(map.load_from(&source)) {
        LoadOutcome::Loaded => {
            let regions = map.projected().map_or(0, |p| p.regions().len());
            info!(regions, "map ready");
        }
        LoadOutcome::Failed => {
            error!(state = %map.load_state(), "load failed, writing the error presentation");
        }
        LoadOutcome::Stale => warn!("load superseded"),
    }

    for &point in &args.click {
        map.handle(HostEvent::Click(point), now);
        now += settle;
        map.tick(now);
        match map.view_state().active() {
            Some(active) => {
                let (region, half) = (&active.id, active.half);
                info!(x = point.x, y = point.y, %region, ?half, "focused");
            }
            None => {
                info!(x = point.x, y = point.y, view = %map.view_state().view(), "home");
            }
        }
    }

    let svg = map.surface().to_svg(args.width, args.height);
    fs::write(&args.out, svg)?;
    info!(
        path = %args.out.display(),
        frames = map.surface().frames(),
        "snapshot written"
    );
    Ok(())
}
