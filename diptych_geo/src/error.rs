// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use core::fmt;

/// Error produced while decoding a TopoJSON document.
#[derive(Debug)]
pub enum TopologyError {
    /// The document is not valid JSON or does not have the TopoJSON shape.
    Json(serde_json::Error),
    /// The document's `type` is not `"Topology"`.
    NotATopology(String),
    /// The requested object is not present in `objects`.
    MissingObject(String),
    /// A geometry references an arc that does not exist.
    ArcOutOfRange(i64),
    /// An arc position has fewer than two coordinates.
    ShortPosition {
        /// Index of the offending arc.
        arc: usize,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed topology: {err}"),
            Self::NotATopology(kind) => write!(f, "expected a Topology, found {kind:?}"),
            Self::MissingObject(name) => write!(f, "topology has no object named {name:?}"),
            Self::ArcOutOfRange(index) => write!(f, "arc index {index} is out of range"),
            Self::ShortPosition { arc } => {
                write!(
                    f,
                    "arc {arc} has a position with fewer than two coordinates"
                )
            }
        }
    }
}

impl core::error::Error for TopologyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Error surfaced when loading map data fails.
///
/// Its [`Display`](fmt::Display) output is the human-readable reason shown
/// next to the retry affordance.
#[derive(Debug)]
pub enum LoadError {
    /// The resource could not be fetched.
    Network(String),
    /// The resource was fetched but could not be decoded.
    Decode(TopologyError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(reason) => f.write_str(reason),
            Self::Decode(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Network(_) => None,
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<TopologyError> for LoadError {
    fn from(err: TopologyError) -> Self {
        Self::Decode(err)
    }
}
