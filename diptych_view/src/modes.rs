// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

/// One of the two side-by-side copies of the map.
///
/// Both halves render identical geometry; the right half is the left half
/// shifted horizontally by half the container width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Half {
    /// The left copy, drawn at the container origin.
    Left,
    /// The right copy, drawn at `width / 2`.
    Right,
}

impl Half {
    /// Both halves, left first.
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    /// Index of this half in `[Left, Right]` order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Which half (or both halves) of the split surface is considered "home".
///
/// This is an input owned by the surrounding UI; the camera frames the
/// home content whenever no region is focused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LogicalView {
    /// Only the left copy is home.
    Left,
    /// Only the right copy is home.
    Right,
    /// Both copies are visible, unscaled.
    #[default]
    Both,
}

impl LogicalView {
    /// Returns the single half this view frames, or `None` for [`LogicalView::Both`].
    #[must_use]
    pub const fn half(self) -> Option<Half> {
        match self {
            Self::Left => Some(Half::Left),
            Self::Right => Some(Half::Right),
            Self::Both => None,
        }
    }

    /// The canonical lowercase name of this view.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

impl From<Half> for LogicalView {
    fn from(half: Half) -> Self {
        match half {
            Half::Left => Self::Left,
            Half::Right => Self::Right,
        }
    }
}

impl fmt::Display for LogicalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`LogicalView`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseViewError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown view {:?}, expected \"left\", \"right\" or \"both\"",
            self.input
        )
    }
}

impl core::error::Error for ParseViewError {}

impl FromStr for LogicalView {
    type Err = ParseViewError;

    /// Parses `left`/`right`/`both`; `map1`/`map2` are accepted as aliases
    /// for the left and right copies.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "map1" => Ok(Self::Left),
            "right" | "map2" => Ok(Self::Right),
            "both" => Ok(Self::Both),
            _ => Err(ParseViewError {
                input: s.to_owned(),
            }),
        }
    }
}
