//! Per-request parameters and their validation.

use serde::Deserialize;

use crate::error::{Error, Result};

/// `size` used when the request does not name one.
pub const DEFAULT_SIZE: i64 = 10;

/// Smallest accepted `size`.
pub const MIN_SIZE: i64 = 1;

/// Which of the two output shapes to render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Ordered records under repeated `pin` keys.
    #[default]
    Pins,
    /// Flat list of records with sorted keys.
    Compact,
}

/// Clustering parameters of one query.
///
/// ```rust
/// use geopin::{ClusteringRequest, OutputShape};
///
/// let request: ClusteringRequest = serde_json::from_str(
///     r#"{"spatial-clustering": true, "spatial-clustering.size": 25}"#,
/// )
/// .unwrap();
/// assert!(request.enabled);
/// assert_eq!(request.size, 25);
/// assert_eq!(request.min_result_count, 1);
/// assert_eq!(request.shape, OutputShape::Pins);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClusteringRequest {
    /// Whether clustering runs at all.
    #[serde(rename = "spatial-clustering")]
    pub enabled: bool,
    /// Requested capacity K.
    #[serde(rename = "spatial-clustering.size")]
    pub size: i64,
    /// Minimum candidate count for clustering to run.
    #[serde(rename = "spatial-clustering.min-result-count")]
    pub min_result_count: i64,
    /// Output shape.
    #[serde(rename = "spatial-clustering.format")]
    pub shape: OutputShape,
}

impl Default for ClusteringRequest {
    fn default() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_SIZE,
            min_result_count: 1,
            shape: OutputShape::Pins,
        }
    }
}

impl ClusteringRequest {
    /// An enabled request for `size` clusters.
    pub fn new(size: i64) -> Self {
        Self {
            enabled: true,
            size,
            ..Self::default()
        }
    }

    /// Set the minimum candidate count.
    pub fn with_min_result_count(mut self, min_result_count: i64) -> Self {
        self.min_result_count = min_result_count;
        self
    }

    /// Set the output shape.
    pub fn with_shape(mut self, shape: OutputShape) -> Self {
        self.shape = shape;
        self
    }
}

/// Outcome of [`validate`] when the parameters are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Too few candidates; produce no output.
    Skip,
    /// Run the engine with this capacity.
    Run {
        /// Capacity K.
        capacity: usize,
    },
}

/// Check request parameters before the engine is built.
///
/// Rules, in order:
/// 1. fewer candidates than `min_result_count` → [`Validation::Skip`];
/// 2. `requested_size < 1` → "size must be at least 1";
/// 3. `requested_size > configured_max_size` → "size exceeds configured maximum of N".
///
/// `requested_size` may exceed `actual_result_count`.
pub fn validate(
    requested_size: i64,
    configured_max_size: usize,
    min_result_count: i64,
    actual_result_count: usize,
) -> Result<Validation> {
    let actual = i64::try_from(actual_result_count).unwrap_or(i64::MAX);
    if actual < min_result_count {
        return Ok(Validation::Skip);
    }

    if requested_size < MIN_SIZE {
        return Err(Error::invalid_parameter(
            "size",
            format!("size must be at least {MIN_SIZE}"),
        ));
    }

    let capacity = usize::try_from(requested_size).unwrap_or(usize::MAX);
    if capacity > configured_max_size {
        return Err(Error::invalid_parameter(
            "size",
            format!("size exceeds configured maximum of {configured_max_size}"),
        ));
    }

    Ok(Validation::Run { capacity })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run() {
        assert_eq!(validate(10, 100, 1, 5), Ok(Validation::Run { capacity: 10 }));
        assert_eq!(validate(100, 100, 0, 0), Ok(Validation::Run { capacity: 100 }));
    }

    #[test]
    fn test_threshold_skip_wins() {
        // Checked before size, so a bad size is not reported.
        assert_eq!(validate(0, 100, 1001, 1000), Ok(Validation::Skip));
        assert_eq!(validate(i64::MAX, 100, 2, 1), Ok(Validation::Skip));
    }

    #[test]
    fn test_size_below_min() {
        let err = validate(0, 100, 1, 10).unwrap_err();
        assert_eq!(err.to_string(), "size must be at least 1");
        assert!(validate(-5, 100, 1, 10).is_err());
    }

    #[test]
    fn test_size_above_max() {
        let err = validate(10_001, 10_000, 1, 10).unwrap_err();
        assert_eq!(err.to_string(), "size exceeds configured maximum of 10000");
        let err = validate(i64::MAX, 10_000, 1, 10).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "size", .. }));
    }

    #[test]
    fn test_request_defaults() {
        let request: ClusteringRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, ClusteringRequest::default());
        assert!(!request.enabled);
        assert_eq!(request.size, DEFAULT_SIZE);
    }

    #[test]
    fn test_request_compact_shape() {
        let request: ClusteringRequest = serde_json::from_str(
            r#"{"spatial-clustering": true, "spatial-clustering.format": "compact",
                "spatial-clustering.min-result-count": 5}"#,
        )
        .unwrap();
        assert_eq!(request.shape, OutputShape::Compact);
        assert_eq!(request.min_result_count, 5);
        assert_eq!(
            ClusteringRequest::new(3).with_shape(OutputShape::Compact).with_min_result_count(5),
            ClusteringRequest { size: 3, ..request }
        );
    }
}
