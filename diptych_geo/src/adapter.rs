// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projection adapter: fits a projection to one half-viewport and builds the
//! pixel-space paths both halves draw.

use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect, Shape, Size};

use crate::feature::{MapData, Region, RegionId};
use crate::projection::{Fit, GeoProjection};

/// A region projected into half-local pixel space.
#[derive(Clone, Debug)]
pub struct ProjectedRegion {
    /// Stable identity.
    pub id: RegionId,
    /// Optional display name.
    pub name: Option<String>,
    /// Closed outline of every ring, filled with the non-zero rule.
    pub path: BezPath,
    /// Bounding box of `path`, `None` when nothing was projected.
    pub bounds: Option<Rect>,
}

/// Fits a [`GeoProjection`] to a half-viewport.
#[derive(Clone, Debug, Default)]
pub struct ProjectionAdapter<P> {
    projection: P,
}

impl<P: GeoProjection> ProjectionAdapter<P> {
    /// Wraps a projection.
    #[must_use]
    pub fn new(projection: P) -> Self {
        Self { projection }
    }

    /// The wrapped projection.
    #[must_use]
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Projects `data`, fitting its regions into a box of `half_size`.
    ///
    /// The result is in the local coordinates of a single half; the right
    /// half draws the same geometry shifted by the half width.
    #[must_use]
    pub fn fit(&self, half_size: Size, data: &MapData) -> ProjectedMap {
        let unit: Vec<Vec<Vec<Point>>> = data
            .features
            .iter()
            .map(|region| self.project_region(region))
            .collect();
        let unit_bounds = unit
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc: Option<Rect>, &p| Some(grow(acc, p)));
        let fit = unit_bounds.map_or(Fit::IDENTITY, |b| Fit::to_size(b, half_size));

        let mut regions = Vec::with_capacity(unit.len());
        let mut index = HashMap::with_capacity(unit.len());
        for (region, rings) in data.features.iter().zip(&unit) {
            let mut path = BezPath::new();
            for ring in rings {
                trace_line(&mut path, ring.iter().map(|&p| fit.apply(p)), true);
            }
            let bounds = (!path.elements().is_empty()).then(|| path.bounding_box());
            // First region wins, like `FeatureCollection::get`.
            index.entry(region.id.clone()).or_insert(regions.len());
            regions.push(ProjectedRegion {
                id: region.id.clone(),
                name: region.name.clone(),
                path,
                bounds,
            });
        }

        let mut borders = BezPath::new();
        let mut line = Vec::new();
        for source in &data.borders.lines {
            line.clear();
            self.projection.project_line(source, &mut line);
            trace_line(&mut borders, line.iter().map(|&p| fit.apply(p)), false);
        }

        let collection_bounds = regions
            .iter()
            .filter_map(|r| r.bounds)
            .reduce(|a, b| a.union(b));

        ProjectedMap {
            size: half_size,
            fit,
            regions,
            index,
            borders,
            collection_bounds,
        }
    }

    fn project_region(&self, region: &Region) -> Vec<Vec<Point>> {
        region
            .rings()
            .map(|ring| {
                let mut out = Vec::with_capacity(ring.len());
                self.projection.project_line(ring, &mut out);
                out
            })
            .filter(|ring| !ring.is_empty())
            .collect()
    }
}

fn grow(acc: Option<Rect>, p: Point) -> Rect {
    match acc {
        Some(r) => r.union_pt(p),
        None => Rect::from_points(p, p),
    }
}

fn trace_line(path: &mut BezPath, mut points: impl Iterator<Item = Point>, close: bool) {
    let Some(first) = points.next() else {
        return;
    };
    path.move_to(first);
    let mut segments = 0;
    for p in points {
        path.line_to(p);
        segments += 1;
    }
    if close && segments > 0 {
        path.close_path();
    }
}

/// Projected geometry shared by both halves of the surface.
#[derive(Clone, Debug)]
pub struct ProjectedMap {
    size: Size,
    fit: Fit,
    regions: Vec<ProjectedRegion>,
    index: HashMap<RegionId, usize>,
    borders: BezPath,
    collection_bounds: Option<Rect>,
}

impl ProjectedMap {
    /// The half-viewport size the projection was fit to.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// The unit-to-pixel fit that was applied.
    #[must_use]
    pub fn fit(&self) -> Fit {
        self.fit
    }

    /// Regions in draw order.
    #[must_use]
    pub fn regions(&self) -> &[ProjectedRegion] {
        &self.regions
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn region(&self, id: &RegionId) -> Option<&ProjectedRegion> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    /// Bounding box of one region, in half-local pixels.
    #[must_use]
    pub fn region_bounds(&self, id: &RegionId) -> Option<Rect> {
        self.region(id).and_then(|r| r.bounds)
    }

    /// Union of every region's bounds, in half-local pixels.
    #[must_use]
    pub fn collection_bounds(&self) -> Option<Rect> {
        self.collection_bounds
    }

    /// The border mesh as open polylines.
    #[must_use]
    pub fn borders(&self) -> &BezPath {
        &self.borders
    }

    /// Returns the topmost region containing `local`, a point in half-local
    /// pixels.
    #[must_use]
    pub fn region_at(&self, local: Point) -> Option<&ProjectedRegion> {
        self.regions.iter().rev().find(|r| {
            r.bounds.is_some_and(|b| b.contains(local)) && r.path.contains(local)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{BorderMesh, FeatureCollection};
    use crate::projection::Identity;

    fn square(id: &str, x0: f64, y0: f64, side: f64) -> Region {
        Region {
            id: id.into(),
            name: None,
            polygons: vec![vec![vec![
                Point::new(x0, y0),
                Point::new(x0 + side, y0),
                Point::new(x0 + side, y0 + side),
                Point::new(x0, y0 + side),
                Point::new(x0, y0),
            ]]],
        }
    }

    fn data() -> MapData {
        MapData {
            features: FeatureCollection::new(vec![
                square("a", 0.0, 0.0, 10.0),
                square("b", 10.0, 0.0, 10.0),
            ]),
            borders: BorderMesh {
                lines: vec![vec![Point::new(10.0, 0.0), Point::new(10.0, 10.0)]],
            },
        }
    }

    #[test]
    fn fits_collection_into_half() {
        let adapter = ProjectionAdapter::new(Identity);
        let map = adapter.fit(Size::new(200.0, 200.0), &data());
        // 20x10 collection scaled by 10, centered vertically.
        assert_eq!(map.fit().scale, 10.0);
        assert_eq!(
            map.collection_bounds(),
            Some(Rect::new(0.0, 50.0, 200.0, 150.0))
        );
        assert_eq!(
            map.region_bounds(&"b".into()),
            Some(Rect::new(100.0, 50.0, 200.0, 150.0))
        );
        assert!(!map.borders().elements().is_empty());
    }

    #[test]
    fn hit_tests_in_local_space() {
        let map = ProjectionAdapter::new(Identity).fit(Size::new(200.0, 200.0), &data());
        let hit = |x, y| map.region_at(Point::new(x, y)).map(|r| r.id.as_str().to_owned());
        assert_eq!(hit(50.0, 100.0).as_deref(), Some("a"));
        assert_eq!(hit(150.0, 100.0).as_deref(), Some("b"));
        assert_eq!(hit(50.0, 10.0), None);
    }

    #[test]
    fn empty_data_has_no_bounds() {
        let map =
            ProjectionAdapter::new(Identity).fit(Size::new(200.0, 200.0), &MapData::default());
        assert!(map.regions().is_empty());
        assert_eq!(map.collection_bounds(), None);
        assert_eq!(map.fit(), Fit::IDENTITY);
    }
}
