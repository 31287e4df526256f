//! Bounded online clustering of 2D points.
//!
//! Three layers, leaf first:
//!
//! - [`ClusterStore`]: arena owning every live [`Cluster`], addressed by
//!   [`ClusterId`] handles. Insert and merge primitives.
//! - [`CostCache`]: satellite index over the store that knows the cheapest
//!   merge partner of each cluster.
//! - [`SpatialClusterer`]: feeds points in, enforces the capacity K by merging
//!   the globally cheapest pair.
//!
//! ## Merge arithmetic
//!
//! A merge is the only place coordinates are combined:
//!
//! ```text
//! w = wₐ + wᵦ
//! μ = (μₐ·wₐ + μᵦ·wᵦ) / w
//! ```
//!
//! computed in `f64`, so the centroid is the exact weighted mean of every point
//! ever absorbed without keeping the points around.
//!
//! ## Usage
//!
//! ```rust
//! use geopin::cluster::{cluster_points, Point};
//!
//! let points = vec![
//!     Point::new(9.00, 47.00, "a"),
//!     Point::new(9.01, 47.01, "b"),
//!     Point::new(16.3, 48.2, "c"),
//! ];
//!
//! let clusters = cluster_points(points, 2).unwrap();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].representative_key(), Some("c"));
//! assert_eq!(clusters[1].weight(), 2);
//! ```

mod cost;
mod engine;
mod point;
mod store;
mod util;

pub use cost::CostCache;
pub use engine::{cluster_points, EngineState, SpatialClusterer};
pub use point::{Cluster, ClusterId, Point};
pub use store::ClusterStore;
