//! Map pins from search results.
//!
//! `geopin` folds a large stream of located search results into at most K
//! weighted pins. Nearby points collapse into clusters; isolated points stay
//! singletons and keep their identifier.
//!
//! The core is under [`cluster`]: a bounded online agglomerative clusterer that
//! merges the cheapest pair under Ward's criterion whenever a point would push
//! it past capacity. Around it:
//! - [`ClusteringConfig`]: field bindings and the size ceiling
//! - [`ClusteringRequest`] and [`request::validate`]: per-query parameters
//! - [`document`]: reading coordinates out of host documents
//! - [`format`]: the two output shapes
//! - [`SpatialClustering`]: the whole pipeline for one query
//!
//! ```rust
//! use geopin::{ClusteringConfig, ClusteringRequest, SpatialClustering};
//! use serde_json::json;
//!
//! let config = ClusteringConfig::new("id", "lon", "lat").unwrap();
//! let clustering = SpatialClustering::new(config);
//!
//! let docs: Vec<serde_json::Map<String, serde_json::Value>> = [
//!     json!({"id": "1", "lon": 9.00, "lat": 47.00}),
//!     json!({"id": "2", "lon": 9.01, "lat": 47.01}),
//!     json!({"id": "3", "lon": 16.37, "lat": 48.21}),
//! ]
//! .into_iter()
//! .filter_map(|v| v.as_object().cloned())
//! .collect();
//!
//! let output = clustering
//!     .process(&ClusteringRequest::new(2), &docs)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(output.len(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod component;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod request;

pub use cluster::{
    cluster_points, Cluster, ClusterId, ClusterStore, CostCache, EngineState, Point,
    SpatialClusterer,
};
pub use component::{SpatialClustering, RESPONSE_FIELD};
pub use config::ClusteringConfig;
pub use document::{extract_point, FieldSource, FieldValue};
pub use error::{Error, Result};
pub use format::{ClusteringOutput, CompactPins, Pin, PinList, PinType};
pub use request::{ClusteringRequest, OutputShape, Validation};
