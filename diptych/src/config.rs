// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use diptych_view::{FramingConfig, TransitionConfig};
use serde::{Deserialize, Serialize};

/// Where the default topology is fetched from.
pub const DEFAULT_SOURCE_URL: &str = "https://cdn.jsdelivr.net/npm/us-atlas@3/states-10m.json";

/// Object of the default topology holding the regions.
pub const DEFAULT_OBJECT_NAME: &str = "states";

/// Settings of a [`MapController`](crate::MapController).
///
/// Every field has a default, so a JSON document only needs the overrides:
///
/// ```rust
/// use diptych::MapConfig;
///
/// let config = MapConfig::from_json_str(r#"{"transition": {"duration_ms": 300}}"#)?;
/// assert_eq!(config.transition.duration_ms, 300);
/// assert_eq!(config.object_name, "states");
/// assert_eq!(config.framing.region_max_scale, 8.0);
/// # Ok::<(), diptych::ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// URL of the topology document.
    pub source_url: String,
    /// Name of the topology object holding the regions.
    pub object_name: String,
    /// Padding and scale ceilings.
    pub framing: FramingConfig,
    /// Camera animation settings.
    pub transition: TransitionConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            object_name: DEFAULT_OBJECT_NAME.to_owned(),
            framing: FramingConfig::default(),
            transition: TransitionConfig::default(),
        }
    }
}

impl MapConfig {
    /// Parses a JSON document, filling missing fields with defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the framing constants can produce finite transforms.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let framing = &self.framing;
        if !is_positive(framing.padding) {
            return Err(ConfigError::Invalid("framing.padding must be positive"));
        }
        if !is_positive(framing.region_max_scale) {
            return Err(ConfigError::Invalid(
                "framing.region_max_scale must be positive",
            ));
        }
        let extent = framing.scale_extent;
        if !is_positive(extent.min) || extent.max.is_nan() || extent.min > extent.max {
            return Err(ConfigError::Invalid(
                "framing.scale_extent must satisfy 0 < min <= max",
            ));
        }
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Error produced when a configuration document is rejected.
#[derive(Debug)]
pub enum ConfigError {
    /// The document is not valid JSON for [`MapConfig`].
    Json(serde_json::Error),
    /// A value is out of range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid map configuration: {err}"),
            Self::Invalid(reason) => write!(f, "invalid map configuration: {reason}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[cfg(test)]
mod tests {
    use diptych_view::{Easing, Interpolation, ScaleExtent};

    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = MapConfig::default();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.framing.padding, 0.9);
        assert_eq!(config.framing.scale_extent, ScaleExtent::new(1.0, 12.0));
        assert_eq!(config.transition.duration_ms, 750);
        assert_eq!(config.transition.easing, Easing::CubicInOut);
        assert_eq!(config.transition.interpolation, Interpolation::Smooth);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            MapConfig::from_json_str("{}").unwrap(),
            MapConfig::default()
        );
    }

    #[test]
    fn parses_nested_overrides() {
        let config = MapConfig::from_json_str(
            r#"{
                "object_name": "counties",
                "framing": {"padding": 0.8, "scale_extent": {"min": 1, "max": 20}},
                "transition": {"easing": "cubic-out", "interpolation": "linear"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.object_name, "counties");
        assert_eq!(config.framing.padding, 0.8);
        assert_eq!(config.framing.region_max_scale, 8.0);
        assert_eq!(config.framing.scale_extent.max, 20.0);
        assert_eq!(config.transition.easing, Easing::CubicOut);
        assert_eq!(config.transition.interpolation, Interpolation::Linear);
        assert_eq!(config.transition.duration_ms, 750);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            MapConfig::from_json_str(r#"{"framing": {"padding": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_json_str(r#"{"framing": {"scale_extent": {"min": 5, "max": 2}}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            MapConfig::from_json_str("[1, 2]"),
            Err(ConfigError::Json(_))
        ));
    }
}
