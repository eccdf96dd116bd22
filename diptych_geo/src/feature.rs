// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded map content: regions, their geographic rings, and the border mesh.

use alloc::sync::Arc;
use core::fmt;

use hashbrown::HashSet;
use kurbo::Point;

/// Stable identity of a region, taken from the source geometry's `id`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(Arc<str>);

impl RegionId {
    /// Creates an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({:?})", &*self.0)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for RegionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for RegionId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <String as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::new)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A closed ring of `(longitude, latitude)` points, stored as `Point { x: lon, y: lat }`.
///
/// For planar (pre-projected) data the coordinates are already pixels.
pub type Ring = Vec<Point>;

/// A polygon: an exterior ring followed by any holes.
pub type Polygon = Vec<Ring>;

/// One addressable geographic unit (for example a state).
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Stable identity.
    pub id: RegionId,
    /// Optional display name from `properties.name`.
    pub name: Option<String>,
    /// Areal geometry; a single polygon or several for archipelagos.
    pub polygons: Vec<Polygon>,
}

impl Region {
    /// Iterates over every ring of every polygon.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }
}

/// The ordered set of regions of a loaded dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    regions: Vec<Region>,
}

impl FeatureCollection {
    /// Wraps regions in their draw order.
    ///
    /// Ids are made unique: the first region keeps a repeated id and later
    /// ones become `"{id}#{n}"` with the smallest free `n >= 2`.
    #[must_use]
    pub fn new(mut regions: Vec<Region>) -> Self {
        let mut taken: HashSet<RegionId> = regions.iter().map(|r| r.id.clone()).collect();
        let mut seen = HashSet::with_capacity(regions.len());
        for region in &mut regions {
            if seen.insert(region.id.clone()) {
                continue;
            }
            let mut n = 2_usize;
            let unique = loop {
                let candidate = RegionId::new(format!("{}#{n}", region.id));
                if !taken.contains(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            taken.insert(unique.clone());
            seen.insert(unique.clone());
            region.id = unique;
        }
        Self { regions }
    }

    /// Regions in draw order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Looks up a region by id.
    #[must_use]
    pub fn get(&self, id: &RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| &r.id == id)
    }

    /// Number of regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if there are no regions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Iterates over regions in draw order.
    pub fn iter(&self) -> core::slice::Iter<'_, Region> {
        self.regions.iter()
    }
}

/// Open polylines along boundaries, used only for drawing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BorderMesh {
    /// Each line is a run of `(longitude, latitude)` points.
    pub lines: Vec<Vec<Point>>,
}

impl BorderMesh {
    /// Returns `true` if the mesh has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Everything a successful load produces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapData {
    /// The regions.
    pub features: FeatureCollection,
    /// Borders shared by two distinct regions.
    pub borders: BorderMesh,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str) -> Region {
        Region {
            id: id.into(),
            name: None,
            polygons: Vec::new(),
        }
    }

    #[test]
    fn repeated_ids_are_renamed_in_draw_order() {
        let regions = vec![region("1"), region("1"), region("1#2"), region("1")];
        let features = FeatureCollection::new(regions);
        let ids: Vec<_> = features.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "1#3", "1#2", "1#4"]);
        assert_eq!(features.get(&"1".into()), Some(&features.regions()[0]));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = RegionId::new("06");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"06\"");
        assert_eq!(serde_json::from_str::<RegionId>("\"06\"").unwrap(), id);
    }
}
