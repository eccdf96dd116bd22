// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! TopoJSON decoding.
//!
//! A topology stores every boundary once as an *arc*; geometries reference
//! arcs by index, with `~i` (that is, `-i - 1`) meaning arc `i` reversed.
//! Quantized topologies carry a `transform` and delta-encode each arc.
//!
//! [`Topology::features`] rebuilds region rings from arcs, and
//! [`Topology::mesh`] emits the arcs selected by a [`MeshFilter`], which is
//! how the border mesh between adjacent regions is produced.

use alloc::collections::BTreeMap;

use kurbo::Point;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TopologyError;
use crate::feature::{BorderMesh, FeatureCollection, MapData, Polygon, Region, RegionId, Ring};

#[derive(Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Quantization>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, Geometry>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct Quantization {
    scale: [f64; 2],
    translate: [f64; 2],
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    GeometryCollection {
        #[serde(default)]
        geometries: Vec<Geometry>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
    },
    LineString {
        arcs: Vec<i64>,
    },
    MultiLineString {
        arcs: Vec<Vec<i64>>,
    },
    Point {},
    MultiPoint {},
}

/// Which arcs [`Topology::mesh`] keeps.
///
/// Each arc is judged by the first and last leaf geometry that references
/// it; an arc used by a single geometry has the same geometry on both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MeshFilter {
    /// Every referenced arc.
    All,
    /// Arcs shared by two distinct geometries (internal borders).
    #[default]
    Interior,
    /// Arcs used by a single geometry (the outer coastline).
    Exterior,
}

impl MeshFilter {
    fn keep(self, a: usize, b: usize) -> bool {
        match self {
            Self::All => true,
            Self::Interior => a != b,
            Self::Exterior => a == b,
        }
    }
}

/// A decoded TopoJSON topology with absolute arc coordinates.
#[derive(Debug)]
pub struct Topology {
    arcs: Vec<Vec<Point>>,
    objects: BTreeMap<String, Geometry>,
}

impl Topology {
    /// Parses a TopoJSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    /// Parses a TopoJSON document from a string.
    pub fn from_json(text: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTopology) -> Result<Self, TopologyError> {
        if raw.kind != "Topology" {
            return Err(TopologyError::NotATopology(raw.kind));
        }
        let arcs = raw
            .arcs
            .iter()
            .enumerate()
            .map(|(index, arc)| decode_arc(index, arc, raw.transform))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            arcs,
            objects: raw.objects,
        })
    }

    /// Names of the top-level objects, in sorted order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Number of arcs.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    fn object(&self, name: &str) -> Result<&Geometry, TopologyError> {
        self.objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_owned()))
    }

    /// Converts the named object into regions, one per areal leaf geometry.
    ///
    /// Leaves without an `id` are identified by their position among the
    /// object's leaf geometries. Line and point geometries produce nothing.
    pub fn features(&self, object: &str) -> Result<FeatureCollection, TopologyError> {
        let mut regions = Vec::new();
        let mut leaf = 0_usize;
        self.collect_regions(self.object(object)?, &mut leaf, &mut regions)?;
        Ok(FeatureCollection::new(regions))
    }

    fn collect_regions(
        &self,
        geometry: &Geometry,
        leaf: &mut usize,
        out: &mut Vec<Region>,
    ) -> Result<(), TopologyError> {
        let (polygons, id, properties) = match geometry {
            Geometry::GeometryCollection { geometries } => {
                for child in geometries {
                    self.collect_regions(child, leaf, out)?;
                }
                return Ok(());
            }
            Geometry::Polygon {
                arcs,
                id,
                properties,
            } => (vec![self.polygon(arcs)?], id, properties),
            Geometry::MultiPolygon {
                arcs,
                id,
                properties,
            } => (
                arcs.iter()
                    .map(|p| self.polygon(p))
                    .collect::<Result<Vec<_>, _>>()?,
                id,
                properties,
            ),
            _ => {
                *leaf += 1;
                return Ok(());
            }
        };
        let id = match id {
            Some(Value::String(s)) => RegionId::new(s.as_str()),
            Some(Value::Number(n)) => RegionId::new(n.to_string()),
            _ => RegionId::new(leaf.to_string()),
        };
        let name = properties
            .as_ref()
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        *leaf += 1;
        out.push(Region { id, name, polygons });
        Ok(())
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Polygon, TopologyError> {
        rings.iter().map(|r| self.ring(r)).collect()
    }

    fn ring(&self, arcs: &[i64]) -> Result<Ring, TopologyError> {
        let mut points = Vec::new();
        for &index in arcs {
            self.push_arc(index, &mut points)?;
        }
        // Pad degenerate rings to the four points of a closed ring.
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn push_arc(&self, index: i64, points: &mut Vec<Point>) -> Result<(), TopologyError> {
        // Consecutive arcs share their joint; keep only one copy.
        points.pop();
        let arc = self.arc(index)?;
        if index < 0 {
            points.extend(arc.iter().rev().copied());
        } else {
            points.extend(arc.iter().copied());
        }
        Ok(())
    }

    fn arc(&self, index: i64) -> Result<&[Point], TopologyError> {
        let resolved = if index < 0 { !index } else { index };
        usize::try_from(resolved)
            .ok()
            .and_then(|i| self.arcs.get(i))
            .map(Vec::as_slice)
            .ok_or(TopologyError::ArcOutOfRange(index))
    }

    /// Returns the arcs of the named object accepted by `filter`, as lines.
    ///
    /// Arcs are emitted in index order, each oriented the way its first
    /// referencing geometry walks it.
    pub fn mesh(&self, object: &str, filter: MeshFilter) -> Result<BorderMesh, TopologyError> {
        // arc index -> (signed reference of the first user, first leaf, last leaf)
        let mut users: BTreeMap<usize, (i64, usize, usize)> = BTreeMap::new();
        let mut leaf = 0_usize;
        self.collect_arc_users(self.object(object)?, &mut leaf, &mut users)?;

        let mut lines = Vec::new();
        for (_, (signed, first, last)) in users {
            if filter.keep(first, last) {
                let mut line = Vec::new();
                self.push_arc(signed, &mut line)?;
                lines.push(line);
            }
        }
        Ok(BorderMesh { lines })
    }

    fn collect_arc_users(
        &self,
        geometry: &Geometry,
        leaf: &mut usize,
        users: &mut BTreeMap<usize, (i64, usize, usize)>,
    ) -> Result<(), TopologyError> {
        if let Geometry::GeometryCollection { geometries } = geometry {
            for child in geometries {
                self.collect_arc_users(child, leaf, users)?;
            }
            return Ok(());
        }
        let current = *leaf;
        let mut note = |index: i64| -> Result<(), TopologyError> {
            let resolved = if index < 0 { !index } else { index };
            let key = usize::try_from(resolved)
                .ok()
                .filter(|&i| i < self.arcs.len())
                .ok_or(TopologyError::ArcOutOfRange(index))?;
            users
                .entry(key)
                .and_modify(|entry| entry.2 = current)
                .or_insert((index, current, current));
            Ok(())
        };
        match geometry {
            Geometry::GeometryCollection { .. } | Geometry::Point {} | Geometry::MultiPoint {} => {}
            Geometry::LineString { arcs } => {
                for &a in arcs {
                    note(a)?;
                }
            }
            Geometry::MultiLineString { arcs } | Geometry::Polygon { arcs, .. } => {
                for &a in arcs.iter().flatten() {
                    note(a)?;
                }
            }
            Geometry::MultiPolygon { arcs, .. } => {
                for &a in arcs.iter().flatten().flatten() {
                    note(a)?;
                }
            }
        }
        *leaf += 1;
        Ok(())
    }

    /// Decodes the regions of `object` and the interior border mesh between them.
    pub fn map_data(&self, object: &str) -> Result<MapData, TopologyError> {
        Ok(MapData {
            features: self.features(object)?,
            borders: self.mesh(object, MeshFilter::Interior)?,
        })
    }
}

fn decode_arc(
    index: usize,
    arc: &[Vec<f64>],
    quantization: Option<Quantization>,
) -> Result<Vec<Point>, TopologyError> {
    let mut x = 0.0;
    let mut y = 0.0;
    arc.iter()
        .map(|position| {
            let (&px, &py) = match position.as_slice() {
                [px, py, ..] => (px, py),
                _ => return Err(TopologyError::ShortPosition { arc: index }),
            };
            Ok(match quantization {
                Some(q) => {
                    x += px;
                    y += py;
                    Point::new(
                        x * q.scale[0] + q.translate[0],
                        y * q.scale[1] + q.translate[1],
                    )
                }
                None => Point::new(px, py),
            })
        })
        .collect()
}

/// Decodes a TopoJSON document and extracts the regions and interior
/// borders of `object`.
pub fn decode_map(bytes: &[u8], object: &str) -> Result<MapData, TopologyError> {
    Topology::from_slice(bytes)?.map_data(object)
}
