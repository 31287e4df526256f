//! Component configuration, fixed at construction.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default ceiling for the per-request `size`.
pub const DEFAULT_MAX_SIZE: usize = 1_000_000;

/// Immutable configuration of a [`SpatialClustering`](crate::SpatialClustering).
///
/// Deserializes from the init-arg keys `fieldId`, `fieldLon`, `fieldLat` and
/// the optional `maxSize`, with the same validation as [`ClusteringConfig::new`].
///
/// ```rust
/// use geopin::ClusteringConfig;
///
/// let config: ClusteringConfig = serde_json::from_str(
///     r#"{"fieldId": "id", "fieldLon": "lon", "fieldLat": "lat", "maxSize": 10000}"#,
/// )
/// .unwrap();
/// assert_eq!(config.max_size(), 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawConfig")]
pub struct ClusteringConfig {
    field_id: String,
    field_lon: String,
    field_lat: String,
    max_size: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    field_id: Option<String>,
    field_lon: Option<String>,
    field_lat: Option<String>,
    max_size: Option<i64>,
}

impl ClusteringConfig {
    /// Bind the identifier, longitude and latitude field names.
    ///
    /// Fails with [`Error::Configuration`] if any name is blank.
    pub fn new(
        field_id: impl Into<String>,
        field_lon: impl Into<String>,
        field_lat: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            field_id: require("fieldId", Some(field_id.into()))?,
            field_lon: require("fieldLon", Some(field_lon.into()))?,
            field_lat: require("fieldLat", Some(field_lat.into()))?,
            max_size: DEFAULT_MAX_SIZE,
        })
    }

    /// Set the ceiling for the per-request `size`.
    pub fn with_max_size(mut self, max_size: usize) -> Result<Self> {
        if max_size < 1 {
            return Err(Error::configuration(
                "maxSize",
                format!("value for parameter 'maxSize' must be at least 1, but it was {max_size}"),
            ));
        }
        self.max_size = max_size;
        Ok(self)
    }

    /// Document field holding the identifier.
    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    /// Document field holding the longitude.
    pub fn field_lon(&self) -> &str {
        &self.field_lon
    }

    /// Document field holding the latitude.
    pub fn field_lat(&self) -> &str {
        &self.field_lat
    }

    /// Ceiling for the per-request `size`.
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl TryFrom<RawConfig> for ClusteringConfig {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let config = Self {
            field_id: require("fieldId", raw.field_id)?,
            field_lon: require("fieldLon", raw.field_lon)?,
            field_lat: require("fieldLat", raw.field_lat)?,
            max_size: DEFAULT_MAX_SIZE,
        };
        match raw.max_size {
            None => Ok(config),
            Some(n) if n < 1 => Err(Error::configuration(
                "maxSize",
                format!("value for parameter 'maxSize' must be at least 1, but it was {n}"),
            )),
            Some(n) => config.with_max_size(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

fn require(parameter: &'static str, value: Option<String>) -> Result<String> {
    match value {
        None => Err(Error::configuration(
            parameter,
            format!("no value for parameter '{parameter}' specified"),
        )),
        Some(v) if v.trim().is_empty() => Err(Error::configuration(
            parameter,
            format!("value for parameter '{parameter}' was empty"),
        )),
        Some(v) => Ok(v),
    }
}
