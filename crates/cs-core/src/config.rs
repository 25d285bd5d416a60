//! Store configuration.

use serde::Deserialize;

/// Configuration for a `Space`.
///
/// Every field has a default, so hosts can deserialize a partial JSON
/// object and only override what they care about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpaceConfig {
    /// Lower bound for card coordinates on both axes. Default: **0**.
    /// Never below 0: the canvas has no negative region.
    pub min_offset: f64,

    /// Prefix for generated connection type names (`"Connection 3"`).
    pub connection_type_prefix: String,

    /// Card-relative position of the connector a path starts/ends at.
    pub connector_offset: (f64, f64),

    /// Offset of the quadratic control point from the start anchor.
    pub curve_control: (f64, f64),
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            min_offset: 0.0,
            connection_type_prefix: "Connection".into(),
            connector_offset: (8.0, 8.0),
            curve_control: (90.0, 40.0),
        }
    }
}

impl SpaceConfig {
    /// Parse a JSON config, filling unspecified fields with defaults.
    ///
    /// # Errors
    /// Returns the serde error message if the JSON is malformed, or a
    /// message if `minOffset` is negative.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if config.min_offset < 0.0 {
            return Err(format!("minOffset must be >= 0, got {}", config.min_offset));
        }
        Ok(config)
    }

    /// Pull out-of-range values back into range.
    pub(crate) fn sanitized(mut self) -> Self {
        // f64::max also maps NaN to 0
        self.min_offset = self.min_offset.max(0.0);
        self
    }
}
